//! # Configurations
//!
//! A configuration is the value a router stores to say "this is what should be
//! on screen". Every router node owns its own closed enum of configurations.
//!
//! Two configurations are equal iff all their parameters are equal. That
//! equality drives stack deduplication and `bring_to_front` matching. The
//! *kind* is coarser: it names the variant and ignores parameters, which is
//! what deep-link lookups match on.

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub trait Configuration: Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static {
    /// Variant tag with the parameters stripped off.
    type Kind: Copy + Eq + Debug;

    fn kind(&self) -> Self::Kind;
}

#[cfg(test)]
mod tests {
    use crate::test_support::{TestConfig, TestKind};

    use super::*;

    #[test]
    fn test_kind_ignores_parameters() {
        assert_eq!(TestConfig::ScreenB(5).kind(), TestConfig::ScreenB(9).kind());
        assert_ne!(TestConfig::ScreenB(5), TestConfig::ScreenB(9));
        assert_eq!(TestConfig::Root.kind(), TestKind::Root);
    }

    #[test]
    fn test_configuration_serializes() {
        let json = serde_json::to_string(&TestConfig::ScreenB(7)).unwrap();
        let back: TestConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TestConfig::ScreenB(7));
    }
}
