//! # FapHub
//!
//! The application catalog nested inside the Hub tab. It owns its own router,
//! so links that reach a live FapHub are resolved here without recreating it.

use log::warn;
use serde::{Deserialize, Serialize};

use super::deeplink::{FapHubLink, HubLink};
use super::screen::Screen;
use crate::router::{
    BackHandler, Component, ComponentContext, Configuration, DeepLinkHandler, DeepLinkRoute,
    DeepLinkStep, NavCommand, NodeContext, NodeView, Router, RouterOptions, dispatch_link,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FapHubConfig {
    Main,
    Category(String),
    App(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FapHubKind {
    Main,
    Category,
    App,
}

impl Configuration for FapHubConfig {
    type Kind = FapHubKind;

    fn kind(&self) -> FapHubKind {
        match self {
            FapHubConfig::Main => FapHubKind::Main,
            FapHubConfig::Category(_) => FapHubKind::Category,
            FapHubConfig::App(_) => FapHubKind::App,
        }
    }
}

impl DeepLinkRoute<FapHubLink> for FapHubConfig {
    fn route(link: FapHubLink) -> DeepLinkStep<Self, FapHubLink> {
        match link {
            FapHubLink::Main => DeepLinkStep::Replace(vec![FapHubConfig::Main]),
            FapHubLink::Category(name) => {
                DeepLinkStep::Replace(vec![FapHubConfig::Main, FapHubConfig::Category(name)])
            }
            // Apps open on top of whatever is being browsed.
            FapHubLink::App(id) => DeepLinkStep::Show(FapHubConfig::App(id)),
        }
    }

    fn defaults() -> Vec<Self> {
        vec![FapHubConfig::Main]
    }
}

pub struct FapHub {
    router: Router<FapHubConfig, FapHubLink>,
}

impl FapHub {
    pub fn new(node: NodeContext, link: Option<FapHubLink>) -> Self {
        let above = match link {
            Some(FapHubLink::Category(name)) => vec![FapHubConfig::Category(name)],
            Some(FapHubLink::App(id)) => vec![FapHubConfig::App(id)],
            Some(FapHubLink::Main) | None => Vec::new(),
        };
        let router = Router::with_root(
            node,
            FapHubConfig::Main,
            above,
            RouterOptions::default(),
            child,
        );
        Self { router }
    }

    pub fn router(&self) -> &Router<FapHubConfig, FapHubLink> {
        &self.router
    }
}

fn child(
    config: &FapHubConfig,
    context: ComponentContext<FapHubConfig>,
) -> Box<dyn Component<FapHubLink>> {
    let screen = match config {
        FapHubConfig::Main => Screen::new("FapHub home", context.navigator)
            .with_shortcut(
                'g',
                "Games",
                NavCommand::Push(FapHubConfig::Category("games".to_string())),
            )
            .with_shortcut(
                't',
                "Tools",
                NavCommand::Push(FapHubConfig::Category("tools".to_string())),
            ),
        FapHubConfig::Category(name) => Screen::new(format!("Category: {name}"), context.navigator)
            .with_shortcut(
                'a',
                "Top app",
                NavCommand::Push(FapHubConfig::App(format!("{name}-top"))),
            ),
        FapHubConfig::App(id) => {
            Screen::new(format!("App: {id}"), context.navigator).with_shortcut('x', "Close", NavCommand::Pop)
        }
    };
    Box::new(screen)
}

impl Component<HubLink> for FapHub {
    fn title(&self) -> String {
        "FapHub".to_string()
    }

    fn deep_link_handler(&mut self) -> Option<&mut dyn DeepLinkHandler<HubLink>> {
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
        out.push("FapHub".to_string());
        self.router.breadcrumbs(out);
    }
}

impl DeepLinkHandler<HubLink> for FapHub {
    fn handle_deep_link(&mut self, link: HubLink) {
        match link {
            HubLink::FapHub(link) => {
                dispatch_link(&mut self.router, link);
            }
            HubLink::Main => warn!("FapHub ignores hub main link"),
        }
    }
}
