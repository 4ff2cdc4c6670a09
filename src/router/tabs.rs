//! # Tab Coordinator
//!
//! The top-level router specialised for tabs. Tabs are switched with
//! `bring_to_front`, so every visited tab keeps its instance (and its nested
//! stack) until something explicitly removes it, and the stack order records
//! visiting order.
//!
//! `go_to_tab(tab, force)`:
//!
//! ```text
//! persist tab (spawned, never awaited)
//! tab live?  no  ──▶ bring_to_front(for_tab(tab)), done
//!            yes ──▶ bring_to_front(existing)
//!                    force? ──▶ look the instance up again ──▶ resettable? on_reset_tab()
//! ```
//!
//! Deep links that switch tabs go through [`TabCoordinator::dispatch`], so
//! the persisted selection follows them too.

use std::fmt::Debug;
use std::sync::Arc;

use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::back::{BackHandler, BackOutcome};
use super::configuration::Configuration;
use super::deeplink::{DeepLinkStep, DispatchOutcome, dispatch};
use super::stack::Router;
use crate::core::settings::SettingsStore;

pub const SELECTED_TAB_KEY: &str = "selected_tab";

/// A tab identifier with a stable string form for persistence.
pub trait TabKey: Copy + Eq + Debug + 'static {
    fn id(self) -> &'static str;

    fn from_id(id: &str) -> Option<Self>;
}

pub trait TabConfiguration: Configuration {
    type Tab: TabKey;

    fn tab(&self) -> Self::Tab;

    /// Configuration used when a tab is opened fresh.
    fn for_tab(tab: Self::Tab) -> Self;
}

/// Picks the tab shown first: an explicitly requested one, else the persisted
/// one, else `default`.
pub fn initial_tab<T: TabKey>(requested: Option<T>, store: &dyn SettingsStore, default: T) -> T {
    if let Some(tab) = requested {
        return tab;
    }
    match store.get(SELECTED_TAB_KEY) {
        Some(id) => T::from_id(&id).unwrap_or_else(|| {
            warn!("Unknown persisted tab {:?}, using {:?}", id, default);
            default
        }),
        None => default,
    }
}

pub struct TabCoordinator<C: TabConfiguration, L: 'static> {
    router: Router<C, L>,
    store: Arc<dyn SettingsStore>,
    pending: Vec<JoinHandle<()>>,
}

impl<C: TabConfiguration, L: 'static> TabCoordinator<C, L> {
    pub fn new(router: Router<C, L>, store: Arc<dyn SettingsStore>) -> Self {
        Self {
            router,
            store,
            pending: Vec::new(),
        }
    }

    pub fn router(&self) -> &Router<C, L> {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut Router<C, L> {
        &mut self.router
    }

    pub fn selected_tab(&self) -> Option<C::Tab> {
        self.router.active_configuration().map(|c| c.tab())
    }

    pub fn go_to_tab(&mut self, tab: C::Tab, force: bool) {
        self.persist(tab);

        let existing = self
            .router
            .configurations()
            .into_iter()
            .rev()
            .find(|c| c.tab() == tab);
        let Some(existing) = existing else {
            debug!("Opening tab {:?}", tab);
            self.router.bring_to_front(C::for_tab(tab));
            return;
        };

        self.router.bring_to_front(existing.clone());
        if !force {
            return;
        }

        // Fresh lookup: never act on an instance found before the move.
        let reset = match self
            .router
            .find_by_config(|c| *c == existing)
            .and_then(|instance| instance.resettable())
        {
            Some(resettable) => {
                resettable.on_reset_tab();
                true
            }
            None => false,
        };
        if reset {
            debug!("Tab {:?} reset", tab);
        } else {
            debug!("Tab {:?} has nothing to reset", tab);
        }
        self.router.process_commands();
    }

    /// Resolves a deep link step against the tab router, then persists the
    /// tab it left in front.
    pub fn dispatch(
        &mut self,
        step: DeepLinkStep<C, L>,
        defaults: impl FnOnce() -> Vec<C>,
    ) -> DispatchOutcome {
        let outcome = dispatch(&mut self.router, step, defaults);
        self.persist_selected();
        outcome
    }

    pub fn persist_selected(&mut self) {
        if let Some(tab) = self.selected_tab() {
            self.persist(tab);
        }
    }

    /// Waits for selected-tab writes issued so far. Navigation never needs this.
    pub async fn settle(&mut self) {
        for handle in self.pending.drain(..) {
            if let Err(e) = handle.await {
                warn!("Selected tab write task failed: {}", e);
            }
        }
    }

    fn persist(&mut self, tab: C::Tab) {
        self.pending.retain(|handle| !handle.is_finished());
        let id = tab.id();
        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime; selected tab {} not persisted", id);
            return;
        };
        let store = self.store.clone();
        let task = runtime.spawn(async move {
            match store.set(SELECTED_TAB_KEY, id.to_string()).await {
                Ok(()) => debug!("Persisted selected tab {}", id),
                Err(e) => warn!("Failed to persist selected tab {}: {}", id, e),
            }
        });
        self.pending.push(task);
    }
}

impl<C: TabConfiguration, L: 'static> BackHandler for TabCoordinator<C, L> {
    fn on_back(&mut self) -> BackOutcome {
        self.router.on_back()
    }
}
