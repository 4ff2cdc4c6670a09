//! # Hierarchical Router
//!
//! A tree of routers, each owning a stack of child components. Routers are
//! generic over the configuration type `C` describing their children and the
//! deep link type `L` their children accept.
//!
//! ```text
//!                    ┌──────────────────────────┐
//!                    │  TabCoordinator (root)   │
//!                    │  Router<TabConfig, Link> │
//!                    └────────────┬─────────────┘
//!            ┌────────────────────┼────────────────────┐
//!            ▼                    ▼                    ▼
//!     ┌────────────┐       ┌────────────┐       ┌────────────┐
//!     │  Archive   │       │   Device   │       │    Hub     │
//!     │  Router    │       │   Router   │       │   Router   │
//!     └────────────┘       └────────────┘       └─────┬──────┘
//!                                                     ▼
//!                                              ┌────────────┐
//!                                              │  FapHub    │
//!                                              │  Router    │
//!                                              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`configuration`]: the `Configuration` trait describing a child
//! - [`component`]: what a factory produces, and its capabilities
//! - [`navigation`]: `Navigator` handles children use to drive their parent
//! - [`stack`]: the `Router` itself, which is also the instance cache
//! - [`deeplink`]: resolving a deep link one level at a time
//! - [`tabs`]: the tab-switching root with persisted selection
//! - [`back`]: innermost-first back handling

pub mod back;
pub mod component;
pub mod configuration;
pub mod deeplink;
pub mod navigation;
pub mod stack;
pub mod tabs;

pub use back::{BackDispatcher, BackHandler, BackOutcome, BackRegistration, BackRegistry};
pub use component::{
    Component, ComponentContext, DeepLinkHandler, InstanceId, NodeContext, ResetTab,
};
pub use configuration::Configuration;
pub use deeplink::{DeepLinkRoute, DeepLinkStep, DispatchOutcome, dispatch, dispatch_link};
pub use navigation::{NavCommand, Navigator};
pub use stack::{
    ChildStack, EntrySnapshot, NodeView, Router, RouterError, RouterOptions, StackPolicy,
};
pub use tabs::{SELECTED_TAB_KEY, TabConfiguration, TabCoordinator, TabKey, initial_tab};
