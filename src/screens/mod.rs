//! # Screens
//!
//! The concrete navigation graph hosted by the terminal UI.
//!
//! ```text
//! BottomBar (tabs)
//! ├── Archive ── Home ─▶ Category(c) ─▶ Search
//! ├── Device  ── Update(web update?) ─▶ FullInfo | Options
//! └── Hub     ── Home ─▶ FapHub ── Home ─▶ Category(name) ─▶ App(id)
//! ```
//!
//! ## Modules
//!
//! - [`deeplink`]: `DeepLink` model and its `tab/...`, `hub/...` text form
//! - [`bottom_bar`]: the root tab coordinator
//! - [`archive`], [`device`], [`hub`], [`faphub`]: per-tab routers
//! - [`screen`]: leaf screens driven by key shortcuts

pub mod archive;
pub mod bottom_bar;
pub mod deeplink;
pub mod device;
pub mod faphub;
pub mod hub;
pub mod screen;

pub use bottom_bar::{BottomBar, BottomBarConfig};
pub use deeplink::{DeepLink, DeepLinkParseError, Tab};
