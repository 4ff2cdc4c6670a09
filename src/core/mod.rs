//! # Core Services
//!
//! Process-level services the navigation tree depends on. Nothing here knows
//! about routers or screens.
//!
//! ```text
//!     ┌────────────┐        ┌──────────────────────────┐
//!     │   main     │──────▶ │  config (TOML, env, CLI) │
//!     └─────┬──────┘        └──────────────────────────┘
//!           │
//!           ▼
//!     ┌────────────┐        ┌──────────────────────────┐
//!     │    tabs    │──────▶ │  settings (selected tab) │
//!     └────────────┘        └──────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`]: layered configuration resolved into `ResolvedConfig`
//! - [`settings`]: the async `SettingsStore` used to persist the selected tab

pub mod config;
pub mod settings;
