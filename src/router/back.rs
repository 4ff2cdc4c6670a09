//! # Back Dispatch
//!
//! Back events travel innermost-first. Each router offers the event to its
//! front-most child before trying to pop itself, so the deepest active node
//! answers first and "not handled" bubbles outward through return values.
//! When even the root cannot pop, the [`BackDispatcher`] calls the host's
//! close callback.
//!
//! ```text
//! host ──dispatch──▶ root.on_back()
//!                      └─▶ front child.on_back()
//!                            └─▶ front grandchild.on_back()   (asked first)
//!                   ◀── Unhandled at every level ──
//! host close()  (exactly once)
//! ```
//!
//! Which nodes may pop is tracked in a [`BackRegistry`]. A node registers on
//! activation and holds a [`BackRegistration`] guard; dropping the guard
//! deregisters it, so a torn-down node can never be asked to pop.
//! Registering a label that is already live adds no second entry: the
//! guards share it and it leaves when the last one drops.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    Handled,
    Unhandled,
}

impl BackOutcome {
    pub fn is_handled(self) -> bool {
        self == BackOutcome::Handled
    }
}

pub trait BackHandler {
    fn on_back(&mut self) -> BackOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

#[derive(Debug)]
struct Registered {
    id: HandlerId,
    label: String,
    guards: usize,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    handlers: Vec<Registered>,
}

/// Registered back handlers, in registration order.
#[derive(Debug, Clone, Default)]
pub struct BackRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl BackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, label: impl Into<String>) -> BackRegistration {
        let label = label.into();
        let mut inner = self.inner.borrow_mut();
        let id = match inner.handlers.iter().position(|h| h.label == label) {
            Some(pos) => {
                inner.handlers[pos].guards += 1;
                inner.handlers[pos].id
            }
            None => {
                let id = HandlerId(inner.next_id);
                inner.next_id += 1;
                debug!("Back handler registered: {}", label);
                inner.handlers.push(Registered {
                    id,
                    label,
                    guards: 1,
                });
                id
            }
        };
        BackRegistration {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    pub fn is_registered(&self, label: &str) -> bool {
        self.inner
            .borrow()
            .handlers
            .iter()
            .any(|h| h.label == label)
    }

    pub fn active(&self) -> Vec<String> {
        self.inner
            .borrow()
            .handlers
            .iter()
            .map(|h| h.label.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Live registration. Deregisters on drop.
#[derive(Debug)]
pub struct BackRegistration {
    id: HandlerId,
    registry: Weak<RefCell<RegistryInner>>,
}

impl BackRegistration {
    pub fn id(&self) -> HandlerId {
        self.id
    }
}

impl Drop for BackRegistration {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            let mut inner = inner.borrow_mut();
            if let Some(pos) = inner.handlers.iter().position(|h| h.id == self.id) {
                inner.handlers[pos].guards -= 1;
                if inner.handlers[pos].guards == 0 {
                    let handler = inner.handlers.remove(pos);
                    debug!("Back handler unregistered: {}", handler.label);
                }
            }
        }
    }
}

/// Entry point for back events coming from the host.
pub struct BackDispatcher {
    registry: BackRegistry,
    on_close: Box<dyn FnMut()>,
}

impl BackDispatcher {
    pub fn new(registry: BackRegistry, on_close: impl FnMut() + 'static) -> Self {
        Self {
            registry,
            on_close: Box::new(on_close),
        }
    }

    pub fn registry(&self) -> &BackRegistry {
        &self.registry
    }

    /// Offers the event to `root`; closes the host if nothing could pop.
    pub fn dispatch(&mut self, root: &mut dyn BackHandler) -> BackOutcome {
        if !self.registry.is_empty() && root.on_back().is_handled() {
            return BackOutcome::Handled;
        }
        info!("Back event reached the host, closing");
        (self.on_close)();
        BackOutcome::Unhandled
    }
}
