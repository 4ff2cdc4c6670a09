//! # Navigator
//!
//! A child never touches its parent's stack. It holds a [`Navigator`], a weak
//! handle on the owning router's command queue, and asks for mutations through
//! it. The router applies queued commands in order the next time it regains
//! control (see `Router::process_commands`).
//!
//! The handle is weak: it never keeps a router alive, and sending through it
//! after the router is gone is a logged no-op.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use log::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum NavCommand<C> {
    Push(C),
    Pop,
    PopToRoot,
    BringToFront(C),
    ReplaceAll(Vec<C>),
}

pub(crate) type CommandQueue<C> = Rc<RefCell<VecDeque<NavCommand<C>>>>;

pub struct Navigator<C> {
    queue: Weak<RefCell<VecDeque<NavCommand<C>>>>,
}

impl<C> Navigator<C> {
    pub(crate) fn attached(queue: &CommandQueue<C>) -> Self {
        Self {
            queue: Rc::downgrade(queue),
        }
    }

    /// A navigator bound to nothing. Every send is dropped.
    pub fn detached() -> Self {
        Self { queue: Weak::new() }
    }

    pub fn is_attached(&self) -> bool {
        self.queue.strong_count() > 0
    }

    /// Queues `command` on the owning router. Returns false if it is gone.
    pub fn send(&self, command: NavCommand<C>) -> bool
    where
        C: fmt::Debug,
    {
        match self.queue.upgrade() {
            Some(queue) => {
                queue.borrow_mut().push_back(command);
                true
            }
            None => {
                warn!("Dropping {:?}: owning router no longer exists", command);
                false
            }
        }
    }

    pub fn push(&self, configuration: C) -> bool
    where
        C: fmt::Debug,
    {
        self.send(NavCommand::Push(configuration))
    }

    pub fn pop(&self) -> bool
    where
        C: fmt::Debug,
    {
        self.send(NavCommand::Pop)
    }

    pub fn pop_to_root(&self) -> bool
    where
        C: fmt::Debug,
    {
        self.send(NavCommand::PopToRoot)
    }

    pub fn bring_to_front(&self, configuration: C) -> bool
    where
        C: fmt::Debug,
    {
        self.send(NavCommand::BringToFront(configuration))
    }

    pub fn replace_all(&self, configurations: Vec<C>) -> bool
    where
        C: fmt::Debug,
    {
        self.send(NavCommand::ReplaceAll(configurations))
    }
}

impl<C> Clone for Navigator<C> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
        }
    }
}

impl<C> fmt::Debug for Navigator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("attached", &self.is_attached())
            .finish()
    }
}
