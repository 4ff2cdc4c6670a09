//! # Bottom Bar
//!
//! The application root: one tab per [`Tab`], switched by a
//! [`TabCoordinator`]. Tab links are delegated to the live tab when there is
//! one; `OpenTab` links behave like re-selecting the tab by hand.

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use super::archive::ArchiveTab;
use super::deeplink::{ArchiveLink, DeepLink, DeviceLink, HubLink, Tab};
use super::device::DeviceTab;
use super::hub::HubTab;
use crate::core::settings::SettingsStore;
use crate::router::{
    BackHandler, BackOutcome, Component, ComponentContext, Configuration, DeepLinkHandler,
    DeepLinkStep, NodeContext, NodeView, Router, RouterOptions, TabConfiguration, TabCoordinator,
    initial_tab,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BottomBarConfig {
    Archive(Option<ArchiveLink>),
    Device(Option<DeviceLink>),
    Hub(Option<HubLink>),
}

impl Configuration for BottomBarConfig {
    type Kind = Tab;

    fn kind(&self) -> Tab {
        self.tab()
    }
}

impl TabConfiguration for BottomBarConfig {
    type Tab = Tab;

    fn tab(&self) -> Tab {
        match self {
            BottomBarConfig::Archive(_) => Tab::Archive,
            BottomBarConfig::Device(_) => Tab::Device,
            BottomBarConfig::Hub(_) => Tab::Hub,
        }
    }

    fn for_tab(tab: Tab) -> Self {
        match tab {
            Tab::Archive => BottomBarConfig::Archive(None),
            Tab::Device => BottomBarConfig::Device(None),
            Tab::Hub => BottomBarConfig::Hub(None),
        }
    }
}

impl BottomBarConfig {
    /// The tab configuration a link opens. `OpenTab` opens the bare tab.
    pub fn for_link(link: &DeepLink) -> Self {
        match link {
            DeepLink::ArchiveTab(link) => BottomBarConfig::Archive(Some(link.clone())),
            DeepLink::DeviceTab(link) => BottomBarConfig::Device(Some(link.clone())),
            DeepLink::HubTab(link) => BottomBarConfig::Hub(Some(link.clone())),
            DeepLink::OpenTab(tab) => Self::for_tab(*tab),
        }
    }
}

pub struct BottomBar {
    tabs: TabCoordinator<BottomBarConfig, DeepLink>,
    default_tab: Tab,
}

impl BottomBar {
    /// Opens on the tab `link` points to, else the persisted tab, else
    /// `default_tab`. A tab opened by `link` becomes the persisted one.
    pub fn new(
        node: NodeContext,
        link: Option<DeepLink>,
        store: Arc<dyn SettingsStore>,
        default_tab: Tab,
    ) -> Self {
        let initial = match &link {
            Some(link) => BottomBarConfig::for_link(link),
            None => BottomBarConfig::for_tab(initial_tab(None, store.as_ref(), default_tab)),
        };
        info!("Bottom bar opening on {:?}", initial);
        let tab = initial.tab();
        let mut router = Router::with_root(node, initial, Vec::new(), RouterOptions::default(), child);
        // The tab has consumed its opening link once built.
        router.retarget(BottomBarConfig::for_tab(tab));
        let mut tabs = TabCoordinator::new(router, store);
        if link.is_some() {
            tabs.persist_selected();
        }
        Self { tabs, default_tab }
    }

    pub fn router(&self) -> &Router<BottomBarConfig, DeepLink> {
        self.tabs.router()
    }

    pub fn selected_tab(&self) -> Tab {
        self.tabs.selected_tab().unwrap_or(self.default_tab)
    }

    pub fn go_to_tab(&mut self, tab: Tab, force: bool) {
        self.tabs.go_to_tab(tab, force);
    }

    /// Offers a key to the visible screen.
    pub fn on_input(&mut self, key: char) -> bool {
        self.tabs.router_mut().forward_input(key)
    }

    pub fn shortcuts(&self) -> Vec<(char, String)> {
        self.tabs.router().shortcuts()
    }

    pub fn view(&self) -> Vec<NodeView> {
        self.tabs.router().view()
    }

    pub fn breadcrumbs(&self) -> Vec<String> {
        let mut crumbs = Vec::new();
        self.tabs.router().breadcrumbs(&mut crumbs);
        crumbs
    }

    pub async fn settle(&mut self) {
        self.tabs.settle().await;
    }
}

fn child(config: &BottomBarConfig, context: ComponentContext<BottomBarConfig>) -> Box<dyn Component<DeepLink>> {
    match config {
        BottomBarConfig::Archive(link) => Box::new(ArchiveTab::new(context.node, link.clone())),
        BottomBarConfig::Device(link) => Box::new(DeviceTab::new(context.node, link.clone())),
        BottomBarConfig::Hub(link) => Box::new(HubTab::new(context.node, link.clone())),
    }
}

impl DeepLinkHandler<DeepLink> for BottomBar {
    fn handle_deep_link(&mut self, link: DeepLink) {
        info!("Deep link {}", link);
        if let DeepLink::OpenTab(tab) = link {
            self.tabs.go_to_tab(tab, true);
            return;
        }
        let default_tab = self.default_tab;
        let target = BottomBarConfig::for_link(&link);
        let settled = BottomBarConfig::for_tab(target.tab());
        let step = DeepLinkStep::Child {
            target,
            link,
            settled,
        };
        self.tabs.dispatch(step, || vec![BottomBarConfig::for_tab(default_tab)]);
    }
}

impl BackHandler for BottomBar {
    /// Inner stacks first, then previously visited tabs.
    fn on_back(&mut self) -> BackOutcome {
        self.tabs.on_back()
    }
}
