//! # Components and Capabilities
//!
//! A component is whatever a router's child factory produces for a
//! configuration. Most are leaves; some own a router of their own.
//!
//! Capabilities are declared statically by the implementor: a component that
//! can take a deep link returns `Some(self)` from [`Component::deep_link_handler`],
//! a resettable one returns `Some(self)` from [`Component::resettable`], and so
//! on. Callers check the capability, never the concrete type.
//!
//! ```text
//! Router<C, L>
//! └── StackEntry { configuration: C, instance: Box<dyn Component<L>> }
//!         ├── deep_link_handler() -> Option<&mut dyn DeepLinkHandler<L>>
//!         ├── resettable()        -> Option<&mut dyn ResetTab>
//!         └── back_handler()      -> Option<&mut dyn BackHandler>
//! ```

use std::fmt;

use uuid::Uuid;

use super::back::{BackHandler, BackRegistry};
use super::configuration::Configuration;
use super::navigation::Navigator;
use super::stack::NodeView;

/// Identity of one live component instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceId(Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        write!(f, "{}", &simple[..8])
    }
}

/// A child of a router whose links are of type `L`.
pub trait Component<L> {
    /// Human-readable name, used for logs and by the host when drawing.
    fn title(&self) -> String;

    fn deep_link_handler(&mut self) -> Option<&mut dyn DeepLinkHandler<L>> {
        None
    }

    fn resettable(&mut self) -> Option<&mut dyn ResetTab> {
        None
    }

    /// Components owning a router expose it here so back events reach it first.
    fn back_handler(&mut self) -> Option<&mut dyn BackHandler> {
        None
    }

    /// A key forwarded from the UI layer. Returns true if consumed.
    fn on_input(&mut self, _key: char) -> bool {
        false
    }

    /// Keys `on_input` currently reacts to, with a short label.
    fn shortcuts(&self) -> Vec<(char, String)> {
        Vec::new()
    }

    /// Nested entries for components that own a router.
    fn children(&self) -> Option<Vec<NodeView>> {
        None
    }

    /// Titles of the visible path starting at this component.
    fn breadcrumbs(&self, out: &mut Vec<String>) {
        out.push(self.title());
    }

    /// Called exactly once, right before the instance is dropped by its router.
    fn on_destroy(&mut self) {}
}

/// Accepts the remainder of a deep link instead of being rebuilt.
pub trait DeepLinkHandler<L> {
    fn handle_deep_link(&mut self, link: L);
}

/// Collapses the component's own navigation back to its root.
pub trait ResetTab {
    fn on_reset_tab(&mut self);
}

/// Scope shared by a router node and everything below it.
#[derive(Clone, Debug)]
pub struct NodeContext {
    pub path: String,
    pub back: BackRegistry,
}

impl NodeContext {
    pub fn root(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            back: BackRegistry::new(),
        }
    }

    pub fn child(&self, name: &str) -> Self {
        Self {
            path: format!("{}/{}", self.path, name),
            back: self.back.clone(),
        }
    }
}

/// Handed to a child factory alongside the configuration.
pub struct ComponentContext<C: Configuration> {
    /// Weak handle on the router that owns the new instance.
    pub navigator: Navigator<C>,
    /// Scope for routers the new instance may create.
    pub node: NodeContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_ids_are_unique() {
        assert_ne!(InstanceId::new(), InstanceId::new());
    }

    #[test]
    fn test_instance_id_display_is_short() {
        assert_eq!(InstanceId::new().to_string().len(), 8);
    }

    #[test]
    fn test_child_context_extends_path_and_shares_registry() {
        let root = NodeContext::root("bottom_bar");
        let child = root.child("archive");
        assert_eq!(child.path, "bottom_bar/archive");
        let _guard = child.back.register("bottom_bar/archive");
        assert!(root.back.is_registered("bottom_bar/archive"));
    }
}
