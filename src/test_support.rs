//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::settings::{SettingsError, SettingsStore};
use crate::router::{
    Component, ComponentContext, Configuration, DeepLinkHandler, NavCommand, Navigator,
    NodeContext, ResetTab, Router, RouterOptions,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestConfig {
    Root,
    ScreenA,
    ScreenB(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    Root,
    ScreenA,
    ScreenB,
}

impl Configuration for TestConfig {
    type Kind = TestKind;

    fn kind(&self) -> TestKind {
        match self {
            TestConfig::Root => TestKind::Root,
            TestConfig::ScreenA => TestKind::ScreenA,
            TestConfig::ScreenB(_) => TestKind::ScreenB,
        }
    }
}

/// Shared, ordered record of lifecycle and capability calls.
pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// A component that writes everything that happens to it into an `EventLog`.
pub struct Recorder {
    pub title: String,
    pub log: EventLog,
    pub handles_links: bool,
    pub resettable: bool,
    pub navigator: Navigator<TestConfig>,
    pub shortcut: Option<(char, NavCommand<TestConfig>)>,
}

impl Recorder {
    pub fn new(title: impl Into<String>, log: EventLog) -> Self {
        Self {
            title: title.into(),
            log,
            handles_links: false,
            resettable: false,
            navigator: Navigator::detached(),
            shortcut: None,
        }
    }
}

impl<L: Debug> Component<L> for Recorder {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn deep_link_handler(&mut self) -> Option<&mut dyn DeepLinkHandler<L>> {
        if self.handles_links { Some(self) } else { None }
    }

    fn resettable(&mut self) -> Option<&mut dyn ResetTab> {
        if self.resettable { Some(self) } else { None }
    }

    fn on_input(&mut self, key: char) -> bool {
        match &self.shortcut {
            Some((shortcut, command)) if *shortcut == key => self.navigator.send(command.clone()),
            _ => false,
        }
    }

    fn on_destroy(&mut self) {
        self.log.borrow_mut().push(format!("destroy {}", self.title));
    }
}

impl<L: Debug> DeepLinkHandler<L> for Recorder {
    fn handle_deep_link(&mut self, link: L) {
        self.log
            .borrow_mut()
            .push(format!("link {} {:?}", self.title, link));
    }
}

impl ResetTab for Recorder {
    fn on_reset_tab(&mut self) {
        self.log.borrow_mut().push(format!("reset {}", self.title));
    }
}

/// Factory used by most router tests: `ScreenB` handles deep links, `Root`
/// is resettable, and `ScreenA` pushes `ScreenB(1)` on `'b'`.
pub fn recorder_factory(
    log: EventLog,
) -> impl FnMut(&TestConfig, ComponentContext<TestConfig>) -> Box<dyn Component<u32>> + 'static {
    move |configuration, context| {
        let mut recorder = Recorder::new(format!("{:?}", configuration), log.clone());
        recorder.navigator = context.navigator;
        match configuration {
            TestConfig::Root => recorder.resettable = true,
            TestConfig::ScreenA => {
                recorder.shortcut = Some(('b', NavCommand::Push(TestConfig::ScreenB(1))));
            }
            TestConfig::ScreenB(_) => recorder.handles_links = true,
        }
        log.borrow_mut().push(format!("create {}", recorder.title));
        Box::new(recorder)
    }
}

pub fn test_router(initial: Vec<TestConfig>, log: EventLog) -> Router<TestConfig, u32> {
    Router::new(
        NodeContext::root("test"),
        initial,
        RouterOptions::default(),
        recorder_factory(log),
    )
    .unwrap()
}

pub fn take_log(log: &EventLog) -> Vec<String> {
    log.borrow_mut().drain(..).collect()
}

/// A settings store whose writes always fail.
pub struct FailingSettingsStore;

#[async_trait]
impl SettingsStore for FailingSettingsStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), SettingsError> {
        Err(SettingsError::Unavailable("disk full".to_string()))
    }
}
