//! Leaf screens: a title and a few keys that drive the owning router.

use log::info;

use crate::router::{Component, Configuration, NavCommand, Navigator, ResetTab};

#[derive(Debug, Clone)]
pub struct Shortcut<C> {
    pub key: char,
    pub label: &'static str,
    pub command: NavCommand<C>,
}

pub struct Screen<C: Configuration> {
    title: String,
    navigator: Navigator<C>,
    shortcuts: Vec<Shortcut<C>>,
    resettable: bool,
    resets: u32,
}

impl<C: Configuration> Screen<C> {
    pub fn new(title: impl Into<String>, navigator: Navigator<C>) -> Self {
        Self {
            title: title.into(),
            navigator,
            shortcuts: Vec::new(),
            resettable: false,
            resets: 0,
        }
    }

    pub fn with_shortcut(mut self, key: char, label: &'static str, command: NavCommand<C>) -> Self {
        self.shortcuts.push(Shortcut {
            key,
            label,
            command,
        });
        self
    }

    /// Tab roots reset their scroll and filter state on a forced tab switch.
    pub fn with_reset(mut self) -> Self {
        self.resettable = true;
        self
    }

    pub fn resets(&self) -> u32 {
        self.resets
    }
}

impl<C: Configuration, L> Component<L> for Screen<C> {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn resettable(&mut self) -> Option<&mut dyn ResetTab> {
        if self.resettable { Some(self) } else { None }
    }

    fn on_input(&mut self, key: char) -> bool {
        match self.shortcuts.iter().find(|s| s.key == key) {
            Some(shortcut) => self.navigator.send(shortcut.command.clone()),
            None => false,
        }
    }

    fn shortcuts(&self) -> Vec<(char, String)> {
        self.shortcuts
            .iter()
            .map(|s| (s.key, s.label.to_string()))
            .collect()
    }
}

impl<C: Configuration> ResetTab for Screen<C> {
    fn on_reset_tab(&mut self) {
        self.resets += 1;
        info!("{} reset ({} so far)", self.title, self.resets);
    }
}
