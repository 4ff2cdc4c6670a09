//! # Hub Tab
//!
//! The hub home plus the nested FapHub catalog. FapHub links are handed to a
//! live FapHub instead of rebuilding it, so its own stack survives.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::deeplink::{DeepLink, FapHubLink, HubLink};
use super::faphub::FapHub;
use super::screen::Screen;
use crate::router::{
    BackHandler, Component, ComponentContext, Configuration, DeepLinkHandler, DeepLinkRoute,
    DeepLinkStep, NavCommand, NodeContext, NodeView, ResetTab, Router, RouterOptions,
    dispatch_link,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HubConfig {
    Main,
    FapHub(Option<FapHubLink>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubKind {
    Main,
    FapHub,
}

impl Configuration for HubConfig {
    type Kind = HubKind;

    fn kind(&self) -> HubKind {
        match self {
            HubConfig::Main => HubKind::Main,
            HubConfig::FapHub(_) => HubKind::FapHub,
        }
    }
}

impl DeepLinkRoute<HubLink> for HubConfig {
    fn route(link: HubLink) -> DeepLinkStep<Self, HubLink> {
        match link {
            HubLink::Main => DeepLinkStep::Replace(vec![HubConfig::Main]),
            HubLink::FapHub(faphub) => DeepLinkStep::Child {
                target: HubConfig::FapHub(Some(faphub.clone())),
                link: HubLink::FapHub(faphub),
                settled: HubConfig::FapHub(None),
            },
        }
    }

    fn defaults() -> Vec<Self> {
        vec![HubConfig::Main]
    }
}

pub struct HubTab {
    router: Router<HubConfig, HubLink>,
}

impl HubTab {
    pub fn new(node: NodeContext, link: Option<HubLink>) -> Self {
        let above = match link {
            Some(HubLink::FapHub(faphub)) => vec![HubConfig::FapHub(Some(faphub))],
            Some(HubLink::Main) | None => Vec::new(),
        };
        let settle = !above.is_empty();
        let mut router = Router::with_root(
            node,
            HubConfig::Main,
            above,
            RouterOptions::default(),
            child,
        );
        // The FapHub has consumed the link by now.
        if settle {
            router.retarget(HubConfig::FapHub(None));
        }
        Self { router }
    }

    pub fn router(&self) -> &Router<HubConfig, HubLink> {
        &self.router
    }
}

fn child(config: &HubConfig, context: ComponentContext<HubConfig>) -> Box<dyn Component<HubLink>> {
    match config {
        HubConfig::Main => Box::new(
            Screen::new("Hub home", context.navigator)
                .with_shortcut('f', "FapHub", NavCommand::Push(HubConfig::FapHub(None)))
                .with_reset(),
        ),
        HubConfig::FapHub(link) => Box::new(FapHub::new(context.node, link.clone())),
    }
}

impl Component<DeepLink> for HubTab {
    fn title(&self) -> String {
        "Hub".to_string()
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
        out.push("Hub".to_string());
        self.router.breadcrumbs(out);
    }
}

impl DeepLinkHandler<DeepLink> for HubTab {
    fn handle_deep_link(&mut self, link: DeepLink) {
        match link {
            DeepLink::HubTab(link) => {
                dispatch_link(&mut self.router, link);
            }
            other => warn!("Hub tab ignores deep link {}", other),
        }
    }
}

impl ResetTab for HubTab {
    fn on_reset_tab(&mut self) {
        self.router.pop_to_root();
        match self
            .router
            .find_by_kind(HubKind::Main)
            .and_then(|main| main.resettable())
        {
            Some(main) => main.on_reset_tab(),
            None => debug!("Hub home is not resettable"),
        }
        self.router.process_commands();
    }
}
