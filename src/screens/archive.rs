//! # Archive Tab
//!
//! Home, category listings and search. Deep links rebuild the whole stack;
//! a forced tab switch returns to the home screen and resets it.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::deeplink::{ArchiveLink, CategoryType, DeepLink};
use super::screen::Screen;
use crate::router::{
    BackHandler, Component, ComponentContext, Configuration, DeepLinkHandler, DeepLinkStep,
    NavCommand, NodeContext, NodeView, ResetTab, Router, RouterOptions, dispatch,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArchiveConfig {
    Home,
    Category(CategoryType),
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Home,
    Category,
    Search,
}

impl Configuration for ArchiveConfig {
    type Kind = ArchiveKind;

    fn kind(&self) -> ArchiveKind {
        match self {
            ArchiveConfig::Home => ArchiveKind::Home,
            ArchiveConfig::Category(_) => ArchiveKind::Category,
            ArchiveConfig::Search => ArchiveKind::Search,
        }
    }
}

impl ArchiveConfig {
    /// The screen a link opens on top of `Home`.
    fn for_link(link: &ArchiveLink) -> Self {
        match link {
            ArchiveLink::OpenCategory(category) => ArchiveConfig::Category(*category),
            ArchiveLink::OpenSearch => ArchiveConfig::Search,
        }
    }

    pub fn stack_for(link: &ArchiveLink) -> Vec<Self> {
        vec![ArchiveConfig::Home, Self::for_link(link)]
    }
}

pub struct ArchiveTab {
    router: Router<ArchiveConfig, ()>,
}

impl ArchiveTab {
    pub fn new(node: NodeContext, link: Option<ArchiveLink>) -> Self {
        let above = link.iter().map(ArchiveConfig::for_link).collect();
        let router = Router::with_root(
            node,
            ArchiveConfig::Home,
            above,
            RouterOptions::default(),
            child,
        );
        Self { router }
    }

    pub fn router(&self) -> &Router<ArchiveConfig, ()> {
        &self.router
    }
}

fn child(config: &ArchiveConfig, context: ComponentContext<ArchiveConfig>) -> Box<dyn Component<()>> {
    let screen = match config {
        ArchiveConfig::Home => Screen::new("Archive home", context.navigator)
            .with_shortcut(
                'i',
                "Infrared",
                NavCommand::Push(ArchiveConfig::Category(CategoryType::Infrared)),
            )
            .with_shortcut(
                'n',
                "NFC",
                NavCommand::Push(ArchiveConfig::Category(CategoryType::Nfc)),
            )
            .with_shortcut('s', "Search", NavCommand::Push(ArchiveConfig::Search))
            .with_reset(),
        ArchiveConfig::Category(category) => {
            Screen::new(format!("Category: {}", category.id()), context.navigator)
                .with_shortcut('s', "Search", NavCommand::Push(ArchiveConfig::Search))
        }
        ArchiveConfig::Search => Screen::new("Search", context.navigator),
    };
    Box::new(screen)
}

impl Component<DeepLink> for ArchiveTab {
    fn title(&self) -> String {
        "Archive".to_string()
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
        out.push(Component::<DeepLink>::title(self));
        self.router.breadcrumbs(out);
    }
}

impl DeepLinkHandler<DeepLink> for ArchiveTab {
    fn handle_deep_link(&mut self, link: DeepLink) {
        match link {
            DeepLink::ArchiveTab(link) => {
                let step = DeepLinkStep::Replace(ArchiveConfig::stack_for(&link));
                dispatch(&mut self.router, step, || vec![ArchiveConfig::Home]);
            }
            other => warn!("Archive tab ignores deep link {}", other),
        }
    }
}

impl ResetTab for ArchiveTab {
    fn on_reset_tab(&mut self) {
        self.router.pop_to_root();
        match self
            .router
            .find_by_kind(ArchiveKind::Home)
            .and_then(|home| home.resettable())
        {
            Some(home) => home.on_reset_tab(),
            None => debug!("Archive home is not resettable"),
        }
        self.router.process_commands();
    }
}
