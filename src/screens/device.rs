//! # Device Tab
//!
//! Rooted at the update screen. Update links always leave a single `Update`
//! entry, carrying the web update if there is one.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::deeplink::{DeepLink, DeviceLink, WebUpdate};
use super::screen::Screen;
use crate::router::{
    BackHandler, Component, ComponentContext, Configuration, DeepLinkHandler, DeepLinkStep,
    NavCommand, NodeContext, NodeView, ResetTab, Router, RouterOptions, dispatch,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceConfig {
    Update(Option<WebUpdate>),
    FullInfo,
    Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Update,
    FullInfo,
    Options,
}

impl Configuration for DeviceConfig {
    type Kind = DeviceKind;

    fn kind(&self) -> DeviceKind {
        match self {
            DeviceConfig::Update(_) => DeviceKind::Update,
            DeviceConfig::FullInfo => DeviceKind::FullInfo,
            DeviceConfig::Options => DeviceKind::Options,
        }
    }
}

impl DeviceConfig {
    pub fn for_link(link: Option<DeviceLink>) -> Self {
        match link {
            Some(DeviceLink::WebUpdate(update)) => DeviceConfig::Update(Some(update)),
            Some(DeviceLink::OpenUpdate) | None => DeviceConfig::Update(None),
        }
    }
}

pub struct DeviceTab {
    router: Router<DeviceConfig, ()>,
}

impl DeviceTab {
    pub fn new(node: NodeContext, link: Option<DeviceLink>) -> Self {
        let router = Router::with_root(
            node,
            DeviceConfig::for_link(link),
            Vec::new(),
            RouterOptions::default(),
            child,
        );
        Self { router }
    }

    pub fn router(&self) -> &Router<DeviceConfig, ()> {
        &self.router
    }
}

fn child(config: &DeviceConfig, context: ComponentContext<DeviceConfig>) -> Box<dyn Component<()>> {
    let screen = match config {
        DeviceConfig::Update(update) => {
            let title = match update {
                Some(update) => format!("Update: {}", update.url),
                None => "Update".to_string(),
            };
            Screen::new(title, context.navigator)
                .with_shortcut('f', "Full info", NavCommand::Push(DeviceConfig::FullInfo))
                .with_shortcut('o', "Options", NavCommand::Push(DeviceConfig::Options))
                .with_reset()
        }
        DeviceConfig::FullInfo => {
            Screen::new("Full info", context.navigator).with_shortcut('x', "Close", NavCommand::Pop)
        }
        DeviceConfig::Options => Screen::new("Options", context.navigator),
    };
    Box::new(screen)
}

impl Component<DeepLink> for DeviceTab {
    fn title(&self) -> String {
        "Device".to_string()
    }

    fn deep_link_handler(&mut self) -> Option<&mut dyn DeepLinkHandler<DeepLink>> {
        Some(self)
    }

    fn resettable(&mut self) -> Option<&mut dyn ResetTab> {
        Some(self)
    }

    fn back_handler(&mut self) -> Option<&mut dyn BackHandler> {
        Some(&mut self.router)
    }

    fn on_input(&mut self, key: char) -> bool {
        self.router.forward_input(key)
    }

    fn shortcuts(&self) -> Vec<(char, String)> {
        self.router.shortcuts()
    }

    fn children(&self) -> Option<Vec<NodeView>> {
        Some(self.router.view())
    }

    fn breadcrumbs(&self, out: &mut Vec<String>) {
        out.push("Device".to_string());
        self.router.breadcrumbs(out);
    }
}

impl DeepLinkHandler<DeepLink> for DeviceTab {
    fn handle_deep_link(&mut self, link: DeepLink) {
        match link {
            DeepLink::DeviceTab(link) => {
                let step = DeepLinkStep::Replace(vec![DeviceConfig::for_link(Some(link))]);
                dispatch(&mut self.router, step, || vec![DeviceConfig::Update(None)]);
            }
            other => warn!("Device tab ignores deep link {}", other),
        }
    }
}

impl ResetTab for DeviceTab {
    fn on_reset_tab(&mut self) {
        self.router.pop_to_root();
        match self
            .router
            .find_by_kind(DeviceKind::Update)
            .and_then(|update| update.resettable())
        {
            Some(update) => update.on_reset_tab(),
            None => debug!("Device update screen is not resettable"),
        }
        self.router.process_commands();
    }
}
