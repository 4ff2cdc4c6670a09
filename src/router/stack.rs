//! # Router Node
//!
//! One navigational scope: an ordered stack of configurations, each bound to
//! the live component instance created for it. The last entry is the visible
//! one.
//!
//! ```text
//! Router<C, L>
//! ├── stack: Vec<StackEntry>        // front = last, never empty
//! │   └── StackEntry { configuration, id, instance }
//! ├── factory: C -> Box<dyn Component<L>>
//! ├── commands: queue fed by Navigator handles held by children
//! ├── subscribers: notified with a ChildStack after every mutation
//! └── back_registration: present while this node may pop on back
//! ```
//!
//! ## Instance cache
//!
//! The stack doubles as the instance cache. An instance is created when its
//! entry is created, moved (never recreated) by `bring_to_front` and
//! `retarget`, and disposed exactly once when its entry leaves the stack,
//! either by pop, replacement or router teardown. Disposal runs `on_destroy`
//! and then drops the instance.
//!
//! ## Publishing
//!
//! Every mutation builds the new stack completely, then hands a snapshot to
//! each subscriber before returning. Subscribers never see a half-applied
//! change and mutations are never batched.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::back::{BackHandler, BackOutcome, BackRegistration};
use super::component::{Component, ComponentContext, InstanceId, NodeContext};
use super::configuration::Configuration;
use super::navigation::{CommandQueue, NavCommand, Navigator};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum RouterError {
    /// A router was asked to hold zero entries. Programmer error.
    EmptyStack { path: String },
    /// Saved state could not be encoded.
    State(serde_json::Error),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::EmptyStack { path } => {
                write!(f, "router {path} requires at least one configuration")
            }
            RouterError::State(e) => write!(f, "router state error: {e}"),
        }
    }
}

impl std::error::Error for RouterError {}

// ============================================================================
// Options & Snapshots
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackPolicy {
    /// Pushing a configuration that is already on the stack brings it to front.
    #[default]
    UniqueConfigurations,
    AllowDuplicates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterOptions {
    pub policy: StackPolicy,
    /// Whether this node pops itself on back. Children are asked first either way.
    pub handle_back_button: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            policy: StackPolicy::default(),
            handle_back_button: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntrySnapshot<C> {
    pub configuration: C,
    pub instance: InstanceId,
}

/// Immutable view of a router's stack, front = last.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStack<C> {
    pub entries: Vec<EntrySnapshot<C>>,
}

impl<C> ChildStack<C> {
    pub fn active(&self) -> Option<&EntrySnapshot<C>> {
        self.entries.last()
    }

    pub fn configurations(&self) -> Vec<&C> {
        self.entries.iter().map(|e| &e.configuration).collect()
    }

    pub fn instances(&self) -> Vec<InstanceId> {
        self.entries.iter().map(|e| e.instance).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One live entry and, for components owning a router, its nested entries.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub title: String,
    pub instance: InstanceId,
    pub children: Option<Vec<NodeView>>,
}

impl NodeView {
    /// Descends through the front-most entries along `titles`.
    pub fn find_path(nodes: &[NodeView], titles: &[&str]) -> Option<NodeView> {
        let (first, rest) = titles.split_first()?;
        let node = nodes.iter().rev().find(|n| n.title == *first)?;
        if rest.is_empty() {
            return Some(node.clone());
        }
        Self::find_path(node.children.as_deref()?, rest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Serialize, Deserialize)]
struct SavedStack<C> {
    configurations: Vec<C>,
}

// ============================================================================
// Router
// ============================================================================

struct StackEntry<C, L: 'static> {
    configuration: C,
    id: InstanceId,
    instance: Box<dyn Component<L>>,
}

type ChildFactory<C, L> = Box<dyn FnMut(&C, ComponentContext<C>) -> Box<dyn Component<L>>>;
type Subscriber<C> = Box<dyn FnMut(&ChildStack<C>)>;

pub struct Router<C: Configuration, L: 'static> {
    node: NodeContext,
    options: RouterOptions,
    stack: Vec<StackEntry<C, L>>,
    factory: ChildFactory<C, L>,
    commands: CommandQueue<C>,
    subscribers: Vec<(SubscriptionId, Subscriber<C>)>,
    next_subscription: u64,
    back_registration: Option<BackRegistration>,
}

impl<C: Configuration, L: 'static> Router<C, L> {
    /// Builds the initial stack, creating one instance per configuration.
    pub fn new(
        node: NodeContext,
        initial: Vec<C>,
        options: RouterOptions,
        factory: impl FnMut(&C, ComponentContext<C>) -> Box<dyn Component<L>> + 'static,
    ) -> Result<Self, RouterError> {
        let mut initial = initial.into_iter();
        let Some(root) = initial.next() else {
            return Err(RouterError::EmptyStack { path: node.path });
        };
        Ok(Self::with_root(node, root, initial.collect(), options, factory))
    }

    /// Like `new`, for callers that always have a root entry.
    pub fn with_root(
        node: NodeContext,
        root: C,
        above: Vec<C>,
        options: RouterOptions,
        factory: impl FnMut(&C, ComponentContext<C>) -> Box<dyn Component<L>> + 'static,
    ) -> Self {
        let mut router = Self {
            node,
            options,
            stack: Vec::with_capacity(above.len() + 1),
            factory: Box::new(factory),
            commands: Rc::new(RefCell::new(VecDeque::new())),
            subscribers: Vec::new(),
            next_subscription: 0,
            back_registration: None,
        };
        for configuration in std::iter::once(root).chain(above) {
            let entry = router.create_entry(configuration);
            router.stack.push(entry);
        }
        if router.options.handle_back_button {
            router.register_back();
        }

        info!(
            "Router {} created with {} entries",
            router.node.path,
            router.stack.len()
        );
        router
    }

    /// Rebuilds a router from `save_state` output, or from `fallback` if the
    /// saved stack is empty or unreadable.
    pub fn restore(
        node: NodeContext,
        saved: &str,
        fallback: Vec<C>,
        options: RouterOptions,
        factory: impl FnMut(&C, ComponentContext<C>) -> Box<dyn Component<L>> + 'static,
    ) -> Result<Self, RouterError> {
        let initial = match serde_json::from_str::<SavedStack<C>>(saved) {
            Ok(state) if !state.configurations.is_empty() => state.configurations,
            Ok(_) => {
                warn!("Saved stack for {} is empty, using fallback", node.path);
                fallback
            }
            Err(e) => {
                warn!("Saved stack for {} unreadable ({}), using fallback", node.path, e);
                fallback
            }
        };
        Self::new(node, initial, options, factory)
    }

    pub fn save_state(&self) -> Result<String, RouterError> {
        let state = SavedStack {
            configurations: self.configurations(),
        };
        serde_json::to_string(&state).map_err(RouterError::State)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn path(&self) -> &str {
        &self.node.path
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn snapshot(&self) -> ChildStack<C> {
        ChildStack {
            entries: self
                .stack
                .iter()
                .map(|entry| EntrySnapshot {
                    configuration: entry.configuration.clone(),
                    instance: entry.id,
                })
                .collect(),
        }
    }

    pub fn configurations(&self) -> Vec<C> {
        self.stack.iter().map(|e| e.configuration.clone()).collect()
    }

    pub fn active_configuration(&self) -> Option<&C> {
        self.stack.last().map(|e| &e.configuration)
    }

    pub fn contains(&self, configuration: &C) -> bool {
        self.position_of(configuration).is_some()
    }

    /// Front-most live instance whose configuration satisfies `predicate`.
    pub fn find_by_config(
        &mut self,
        predicate: impl Fn(&C) -> bool,
    ) -> Option<&mut dyn Component<L>> {
        for entry in self.stack.iter_mut().rev() {
            if predicate(&entry.configuration) {
                let instance: &mut dyn Component<L> = &mut *entry.instance;
                return Some(instance);
            }
        }
        None
    }

    pub fn find(&self, predicate: impl Fn(&C) -> bool) -> Option<&dyn Component<L>> {
        self.stack
            .iter()
            .rev()
            .find(|e| predicate(&e.configuration))
            .map(|e| &*e.instance)
    }

    pub fn find_by_kind(&mut self, kind: C::Kind) -> Option<&mut dyn Component<L>> {
        self.find_by_config(|c| c.kind() == kind)
    }

    pub fn active_instance(&mut self) -> Option<&mut dyn Component<L>> {
        let entry = self.stack.last_mut()?;
        let instance: &mut dyn Component<L> = &mut *entry.instance;
        Some(instance)
    }

    /// The whole subtree below this router, front last.
    pub fn view(&self) -> Vec<NodeView> {
        self.stack
            .iter()
            .map(|entry| NodeView {
                title: entry.instance.title(),
                instance: entry.id,
                children: entry.instance.children(),
            })
            .collect()
    }

    /// Keys the front-most instance reacts to.
    pub fn shortcuts(&self) -> Vec<(char, String)> {
        match self.stack.last() {
            Some(entry) => entry.instance.shortcuts(),
            None => Vec::new(),
        }
    }

    /// Titles along the visible path below this router.
    pub fn breadcrumbs(&self, out: &mut Vec<String>) {
        if let Some(entry) = self.stack.last() {
            entry.instance.breadcrumbs(out);
        }
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    pub fn push(&mut self, configuration: C) {
        if self.options.policy == StackPolicy::UniqueConfigurations && self.contains(&configuration)
        {
            debug!(
                "{}: {:?} already on stack, bringing to front",
                self.node.path, configuration
            );
            self.bring_to_front(configuration);
            return;
        }
        let entry = self.create_entry(configuration);
        self.stack.push(entry);
        self.publish();
    }

    /// Removes the front entry. Returns false, touching nothing, at the root.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() <= 1 {
            debug!("{}: pop at root ignored", self.node.path);
            return false;
        }
        if let Some(entry) = self.stack.pop() {
            Self::dispose(&self.node.path, entry);
        }
        self.publish();
        true
    }

    pub fn pop_to_root(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        while self.stack.len() > 1 {
            if let Some(entry) = self.stack.pop() {
                Self::dispose(&self.node.path, entry);
            }
        }
        self.publish();
        true
    }

    /// Swaps the whole stack for fresh instances of `configurations`.
    pub fn replace_all(&mut self, configurations: Vec<C>) -> Result<(), RouterError> {
        if configurations.is_empty() {
            return Err(RouterError::EmptyStack {
                path: self.node.path.clone(),
            });
        }
        let fresh: Vec<_> = configurations
            .into_iter()
            .map(|c| self.create_entry(c))
            .collect();
        let old = std::mem::replace(&mut self.stack, fresh);
        for entry in old.into_iter().rev() {
            Self::dispose(&self.node.path, entry);
        }
        self.publish();
        Ok(())
    }

    /// Moves an equal entry to the front without recreating it, or pushes.
    /// Publishes even when the entry already is in front.
    pub fn bring_to_front(&mut self, configuration: C) {
        match self.position_of(&configuration) {
            Some(pos) => {
                if pos + 1 != self.stack.len() {
                    let entry = self.stack.remove(pos);
                    self.stack.push(entry);
                }
            }
            None => {
                let entry = self.create_entry(configuration);
                self.stack.push(entry);
            }
        }
        self.publish();
    }

    /// Gives the live entry of `configuration`'s kind the new parameters,
    /// keeping its instance, and moves it to front. False if no such entry.
    pub fn retarget(&mut self, configuration: C) -> bool {
        let kind = configuration.kind();
        let Some(pos) = self
            .stack
            .iter()
            .rposition(|e| e.configuration.kind() == kind)
        else {
            return false;
        };
        let mut entry = self.stack.remove(pos);
        if self.options.policy == StackPolicy::UniqueConfigurations {
            self.remove_where(|e| e.configuration == configuration);
        }
        debug!(
            "{}: retarget {} {:?} -> {:?}",
            self.node.path, entry.id, entry.configuration, configuration
        );
        entry.configuration = configuration;
        self.stack.push(entry);
        self.publish();
        true
    }

    /// Disposes every entry of `configuration`'s kind and brings a fresh
    /// instance of `configuration` to front.
    pub fn replace_kind(&mut self, configuration: C) {
        self.replace_kind_settled(configuration.clone(), configuration);
    }

    /// Like [`Router::replace_kind`], but the new entry records `settled`
    /// instead of the configuration it was built from. Both must share a kind.
    pub fn replace_kind_settled(&mut self, build: C, settled: C) {
        let kind = build.kind();
        let mut entry = self.create_entry(build);
        if settled.kind() != kind {
            warn!(
                "{}: settled {:?} differs in kind from {:?}, keeping the latter",
                self.node.path, settled, entry.configuration
            );
        } else {
            entry.configuration = settled;
        }
        self.remove_where(|e| e.configuration.kind() == kind);
        self.stack.push(entry);
        self.publish();
    }

    /// Applies commands queued through `Navigator` handles, in order.
    pub fn process_commands(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let next = self.commands.borrow_mut().pop_front();
            let Some(command) = next else {
                break;
            };
            self.apply(command);
            applied += 1;
        }
        applied
    }

    pub fn navigator(&self) -> Navigator<C> {
        Navigator::attached(&self.commands)
    }

    /// Offers a UI key to the front-most instance.
    pub fn forward_input(&mut self, key: char) -> bool {
        let consumed = match self.stack.last_mut() {
            Some(entry) => entry.instance.on_input(key),
            None => false,
        };
        self.process_commands();
        consumed
    }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    pub fn subscribe(&mut self, subscriber: impl FnMut(&ChildStack<C>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    // ------------------------------------------------------------------------
    // Back registration
    // ------------------------------------------------------------------------

    /// Registering twice is a no-op.
    pub fn register_back(&mut self) {
        if self.back_registration.is_none() {
            self.back_registration = Some(self.node.back.register(self.node.path.clone()));
        }
    }

    pub fn unregister_back(&mut self) {
        self.back_registration = None;
    }

    pub fn is_back_registered(&self) -> bool {
        self.back_registration.is_some()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn position_of(&self, configuration: &C) -> Option<usize> {
        self.stack
            .iter()
            .rposition(|e| &e.configuration == configuration)
    }

    fn create_entry(&mut self, configuration: C) -> StackEntry<C, L> {
        let name = format!("{:?}", configuration.kind()).to_lowercase();
        let context = ComponentContext {
            navigator: Navigator::attached(&self.commands),
            node: self.node.child(&name),
        };
        let instance = (self.factory)(&configuration, context);
        let id = InstanceId::new();
        debug!("{}: created {} for {:?}", self.node.path, id, configuration);
        StackEntry {
            configuration,
            id,
            instance,
        }
    }

    fn dispose(path: &str, mut entry: StackEntry<C, L>) {
        debug!("{}: disposing {} {:?}", path, entry.id, entry.configuration);
        entry.instance.on_destroy();
    }

    /// Removes matching entries, disposing them front-to-back.
    fn remove_where(&mut self, predicate: impl Fn(&StackEntry<C, L>) -> bool) -> usize {
        let mut removed = 0;
        let mut index = self.stack.len();
        while index > 0 {
            index -= 1;
            if predicate(&self.stack[index]) {
                let entry = self.stack.remove(index);
                Self::dispose(&self.node.path, entry);
                removed += 1;
            }
        }
        removed
    }

    fn apply(&mut self, command: NavCommand<C>) {
        debug!("{}: applying {:?}", self.node.path, command);
        match command {
            NavCommand::Push(configuration) => self.push(configuration),
            NavCommand::Pop => {
                self.pop();
            }
            NavCommand::PopToRoot => {
                self.pop_to_root();
            }
            NavCommand::BringToFront(configuration) => self.bring_to_front(configuration),
            NavCommand::ReplaceAll(configurations) => {
                if let Err(e) = self.replace_all(configurations) {
                    warn!("Ignoring queued replace: {}", e);
                }
            }
        }
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&snapshot);
        }
    }
}

impl<C: Configuration, L: 'static> BackHandler for Router<C, L> {
    /// Front child first, then this node's own pop.
    fn on_back(&mut self) -> BackOutcome {
        let child = match self.stack.last_mut().and_then(|e| e.instance.back_handler()) {
            Some(handler) => handler.on_back(),
            None => BackOutcome::Unhandled,
        };
        self.process_commands();
        if child.is_handled() {
            return BackOutcome::Handled;
        }
        if self.back_registration.is_some() && self.pop() {
            BackOutcome::Handled
        } else {
            BackOutcome::Unhandled
        }
    }
}

impl<C: Configuration, L: 'static> Drop for Router<C, L> {
    fn drop(&mut self) {
        self.back_registration = None;
        while let Some(entry) = self.stack.pop() {
            Self::dispose(&self.node.path, entry);
        }
        debug!("Router {} destroyed", self.node.path);
    }
}

impl<C: Configuration, L: 'static> fmt::Debug for Router<C, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("path", &self.node.path)
            .field("stack", &self.configurations())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::test_support::{
        TestConfig, TestKind, event_log, recorder_factory, take_log, test_router,
    };

    use TestConfig::{Root, ScreenA, ScreenB};

    #[test]
    fn test_new_rejects_empty_stack() {
        let result: Result<Router<TestConfig, u32>, _> = Router::new(
            NodeContext::root("test"),
            vec![],
            RouterOptions::default(),
            recorder_factory(event_log()),
        );
        assert!(matches!(result, Err(RouterError::EmptyStack { .. })));
    }

    #[test]
    fn test_push_then_pop_restores_prior_stack() {
        let log = event_log();
        let mut router = test_router(vec![Root, ScreenA], log.clone());
        let before = router.snapshot();

        router.push(ScreenB(5));
        assert_eq!(router.len(), 3);
        assert!(router.pop());

        assert_eq!(router.snapshot(), before);
        assert_eq!(take_log(&log).last().unwrap(), "destroy ScreenB(5)");
    }

    #[test]
    fn test_pop_at_root_is_noop() {
        let log = event_log();
        let mut router = test_router(vec![Root], log.clone());
        take_log(&log);

        assert!(!router.pop());
        assert_eq!(router.len(), 1);
        assert!(take_log(&log).is_empty());
    }

    #[test]
    fn test_pop_to_root_disposes_front_to_back() {
        let log = event_log();
        let mut router = test_router(vec![Root, ScreenA, ScreenB(1)], log.clone());
        take_log(&log);

        assert!(router.pop_to_root());
        assert_eq!(router.configurations(), vec![Root]);
        assert_eq!(take_log(&log), vec!["destroy ScreenB(1)", "destroy ScreenA"]);
        assert!(!router.pop_to_root());
    }

    #[test]
    fn test_replace_all_disposes_everything_and_creates_fresh() {
        let log = event_log();
        let mut router = test_router(vec![Root, ScreenA], log.clone());
        let old = router.snapshot().instances();
        take_log(&log);

        router.replace_all(vec![Root, ScreenB(2)]).unwrap();

        assert_eq!(router.configurations(), vec![Root, ScreenB(2)]);
        assert!(router.snapshot().instances().iter().all(|id| !old.contains(id)));
        assert_eq!(
            take_log(&log),
            vec!["create Root", "create ScreenB(2)", "destroy ScreenA", "destroy Root"]
        );
    }

    #[test]
    fn test_replace_all_empty_is_rejected_and_keeps_stack() {
        let mut router = test_router(vec![Root, ScreenA], event_log());
        assert!(router.replace_all(vec![]).is_err());
        assert_eq!(router.configurations(), vec![Root, ScreenA]);
    }

    #[test]
    fn test_bring_to_front_moves_without_recreating() {
        let log = event_log();
        let mut router = test_router(vec![Root, ScreenA, ScreenB(1)], log.clone());
        let a_id = router.snapshot().entries[1].instance;
        take_log(&log);

        router.bring_to_front(ScreenA);

        let snapshot = router.snapshot();
        assert_eq!(snapshot.configurations(), vec![&Root, &ScreenB(1), &ScreenA]);
        assert_eq!(snapshot.active().unwrap().instance, a_id);
        assert!(take_log(&log).is_empty());
    }

    #[test]
    fn test_bring_to_front_is_idempotent() {
        let mut router = test_router(vec![Root, ScreenA, ScreenB(1)], event_log());
        router.bring_to_front(Root);
        let first = router.snapshot();
        router.bring_to_front(Root);
        assert_eq!(router.snapshot(), first);
    }

    #[test]
    fn test_bring_to_front_missing_pushes() {
        let mut router = test_router(vec![Root], event_log());
        router.bring_to_front(ScreenB(3));
        assert_eq!(router.configurations(), vec![Root, ScreenB(3)]);
    }

    #[test]
    fn test_bring_to_front_on_front_entry_still_publishes() {
        let mut router = test_router(vec![Root, ScreenA], event_log());
        let published = Rc::new(RefCell::new(0));
        let counter = published.clone();
        router.subscribe(move |_| *counter.borrow_mut() += 1);

        router.bring_to_front(ScreenA);
        assert_eq!(*published.borrow(), 1);
    }

    #[test]
    fn test_unique_policy_turns_duplicate_push_into_bring_to_front() {
        let mut router = test_router(vec![Root, ScreenA, ScreenB(1)], event_log());
        router.push(ScreenA);
        assert_eq!(router.configurations(), vec![Root, ScreenB(1), ScreenA]);
    }

    #[test]
    fn test_allow_duplicates_policy_pushes_again() {
        let options = RouterOptions {
            policy: StackPolicy::AllowDuplicates,
            ..Default::default()
        };
        let mut router: Router<TestConfig, u32> = Router::new(
            NodeContext::root("dupes"),
            vec![Root, ScreenA],
            options,
            recorder_factory(event_log()),
        )
        .unwrap();

        router.push(ScreenA);
        assert_eq!(router.configurations(), vec![Root, ScreenA, ScreenA]);
    }

    #[test]
    fn test_find_by_kind_ignores_parameters() {
        let mut router = test_router(vec![Root, ScreenB(5)], event_log());
        let found = router.find_by_kind(TestKind::ScreenB).map(|c| c.title());
        assert_eq!(found.as_deref(), Some("ScreenB(5)"));
        assert!(router.find_by_kind(TestKind::ScreenA).is_none());
        assert!(router.find_by_config(|c| *c == ScreenB(6)).is_none());
    }

    #[test]
    fn test_retarget_keeps_instance_and_fronts_it() {
        let mut router = test_router(vec![Root, ScreenB(5), ScreenA], event_log());
        let b_id = router.snapshot().entries[1].instance;

        assert!(router.retarget(ScreenB(9)));

        let snapshot = router.snapshot();
        assert_eq!(snapshot.configurations(), vec![&Root, &ScreenA, &ScreenB(9)]);
        assert_eq!(snapshot.active().unwrap().instance, b_id);
    }

    #[test]
    fn test_replace_kind_swaps_instance() {
        let log = event_log();
        let mut router = test_router(vec![Root, ScreenB(5)], log.clone());
        take_log(&log);

        router.replace_kind(ScreenB(6));

        assert_eq!(router.configurations(), vec![Root, ScreenB(6)]);
        assert_eq!(take_log(&log), vec!["create ScreenB(6)", "destroy ScreenB(5)"]);
    }

    #[test]
    fn test_replace_kind_settled_records_settled_configuration() {
        let log = event_log();
        let mut router = test_router(vec![Root, ScreenB(5)], log.clone());
        take_log(&log);

        router.replace_kind_settled(ScreenB(6), ScreenB(0));

        assert_eq!(router.configurations(), vec![Root, ScreenB(0)]);
        assert_eq!(take_log(&log), vec!["create ScreenB(6)", "destroy ScreenB(5)"]);
    }

    #[test]
    fn test_subscribers_see_every_mutation_synchronously() {
        let mut router = test_router(vec![Root], event_log());
        let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = router.subscribe(move |stack| sink.borrow_mut().push(stack.len()));

        router.push(ScreenA);
        router.push(ScreenB(1));
        router.pop();
        router.pop_to_root();
        assert_eq!(*seen.borrow(), vec![2, 3, 2, 1]);

        assert!(router.unsubscribe(id));
        router.push(ScreenA);
        assert_eq!(seen.borrow().len(), 4);
    }

    #[test]
    fn test_navigator_commands_apply_after_input() {
        let mut router = test_router(vec![Root, ScreenA], event_log());

        assert!(router.forward_input('b'));
        assert_eq!(router.configurations(), vec![Root, ScreenA, ScreenB(1)]);
        assert!(!router.forward_input('x'));
    }

    #[test]
    fn test_external_navigator_queues_until_processed() {
        let mut router = test_router(vec![Root], event_log());
        let navigator = router.navigator();
        navigator.push(ScreenA);
        navigator.replace_all(vec![]);
        assert_eq!(router.len(), 1);

        assert_eq!(router.process_commands(), 2);
        assert_eq!(router.configurations(), vec![Root, ScreenA]);
    }

    #[test]
    fn test_save_and_restore_round_trip() {
        let router = test_router(vec![Root, ScreenB(4)], event_log());
        let saved = router.save_state().unwrap();

        let restored: Router<TestConfig, u32> = Router::restore(
            NodeContext::root("restored"),
            &saved,
            vec![Root],
            RouterOptions::default(),
            recorder_factory(event_log()),
        )
        .unwrap();
        assert_eq!(restored.configurations(), vec![Root, ScreenB(4)]);
    }

    #[test]
    fn test_restore_garbage_uses_fallback() {
        let restored: Router<TestConfig, u32> = Router::restore(
            NodeContext::root("restored"),
            "not json",
            vec![Root],
            RouterOptions::default(),
            recorder_factory(event_log()),
        )
        .unwrap();
        assert_eq!(restored.configurations(), vec![Root]);
    }

    #[test]
    fn test_drop_disposes_all_and_unregisters_back() {
        let log = event_log();
        let node = NodeContext::root("scoped");
        let registry = node.back.clone();
        let router: Router<TestConfig, u32> = Router::new(
            node,
            vec![Root, ScreenA],
            RouterOptions::default(),
            recorder_factory(log.clone()),
        )
        .unwrap();
        assert!(registry.is_registered("scoped"));
        take_log(&log);

        drop(router);

        assert_eq!(take_log(&log), vec!["destroy ScreenA", "destroy Root"]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_back_is_idempotent() {
        let node = NodeContext::root("once");
        let registry = node.back.clone();
        let mut router: Router<TestConfig, u32> = Router::new(
            node,
            vec![Root],
            RouterOptions::default(),
            recorder_factory(event_log()),
        )
        .unwrap();

        router.register_back();
        router.register_back();
        assert_eq!(registry.len(), 1);

        router.unregister_back();
        assert!(registry.is_empty());
        assert!(!router.is_back_registered());
    }

    #[test]
    fn test_on_back_pops_until_root() {
        let mut router = test_router(vec![Root, ScreenA], event_log());
        assert_eq!(router.on_back(), BackOutcome::Handled);
        assert_eq!(router.on_back(), BackOutcome::Unhandled);
        assert_eq!(router.configurations(), vec![Root]);
    }

    #[test]
    fn test_on_back_without_registration_never_pops() {
        let options = RouterOptions {
            handle_back_button: false,
            ..Default::default()
        };
        let mut router: Router<TestConfig, u32> = Router::new(
            NodeContext::root("passive"),
            vec![Root, ScreenA],
            options,
            recorder_factory(event_log()),
        )
        .unwrap();

        assert_eq!(router.on_back(), BackOutcome::Unhandled);
        assert_eq!(router.len(), 2);
    }

    #[test]
    fn test_view_lists_entries_with_instance_ids() {
        let router = test_router(vec![Root, ScreenA], event_log());
        let view = router.view();
        let snapshot = router.snapshot();

        assert_eq!(view.len(), 2);
        assert_eq!(view[1].title, "ScreenA");
        assert_eq!(view[1].instance, snapshot.entries[1].instance);
        assert!(view[0].children.is_none());

        let found = NodeView::find_path(&view, &["Root"]).unwrap();
        assert_eq!(found.instance, snapshot.entries[0].instance);
        assert!(NodeView::find_path(&view, &["Root", "Nested"]).is_none());
    }

    #[test]
    fn test_find_is_front_most() {
        let router = test_router(vec![Root, ScreenB(1), ScreenB(2)], event_log());
        let found = router.find(|c| matches!(c, ScreenB(_))).unwrap();
        assert_eq!(found.title(), "ScreenB(2)");
        assert!(router.find(|c| *c == ScreenA).is_none());
    }
}
