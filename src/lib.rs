//! Navstack library exports for testing

pub mod core;
pub mod router;
pub mod screens;
pub mod tui;

#[cfg(test)]
pub mod test_support;
