//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, draws the tab bar and the
//! navigation tree, and turns keys into navigation calls on the root.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Keys
//!
//! - `1` `2` `3`: select Archive, Device, Hub. Selecting the current tab again
//!   resets it.
//! - `Esc` / `Backspace`: back. Closing the root quits.
//! - `:`: type a deep link (`hub/faphub/app/snake`), `Enter` to open it.
//! - `q` / `Ctrl+C`: quit.
//! - Anything else goes to the visible screen.
//!
//! ## Redraw Strategy
//!
//! Navigation only changes on input, so the loop sleeps up to 500ms and only
//! redraws after events or a terminal resize.

mod event;
mod ui;

use std::cell::Cell;
use std::io::stdout;
use std::rc::Rc;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::router::{BackDispatcher, BackRegistry, DeepLinkHandler, TabKey};
use crate::screens::{BottomBar, DeepLink, Tab};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys navigate
    Navigate,
    /// Keys edit the deep link buffer
    DeepLink,
}

/// TUI-specific presentation state (not part of navigation state)
pub struct TuiState {
    pub input_mode: InputMode,
    pub link_buffer: String,
    pub status_message: String,
    quit: Rc<Cell<bool>>,
    back: BackDispatcher,
}

impl TuiState {
    /// `registry` must be the one the root was built with.
    pub fn new(registry: BackRegistry) -> Self {
        let quit = Rc::new(Cell::new(false));
        let close = quit.clone();
        let back = BackDispatcher::new(registry, move || {
            info!("Root closed by back");
            close.set(true);
        });
        Self {
            input_mode: InputMode::Navigate,
            link_buffer: String::new(),
            status_message: String::new(),
            quit,
            back,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit.get()
    }

    fn quit(&self) {
        self.quit.set(true);
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            Hide,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (hidden cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, Show);
    }
}

pub fn run(root: &mut BottomBar, registry: BackRegistry) -> std::io::Result<()> {
    let mut tui = TuiState::new(registry);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable terminal modes: {}", e);
            None
        }
    };
    let mut needs_redraw = true; // Force first frame

    let result = loop {
        if needs_redraw {
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, root, &tui)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let first_event = match poll_event_timeout(Duration::from_millis(500)) {
            Ok(event) => event,
            Err(e) => break Err(e),
        };
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            handle_event(&mut tui, root, event);
            if tui.should_quit() {
                break;
            }
        }
        if tui.should_quit() {
            break Ok(());
        }
    };

    ratatui::restore();
    result
}

/// Applies one event to the root. Separate from `run` so it can be tested
/// without a terminal.
pub fn handle_event(tui: &mut TuiState, root: &mut BottomBar, event: TuiEvent) {
    match (tui.input_mode, event) {
        (_, TuiEvent::ForceQuit) => tui.quit(),
        (_, TuiEvent::Resize) => {}

        (InputMode::DeepLink, TuiEvent::Char(c)) => tui.link_buffer.push(c),
        (InputMode::DeepLink, TuiEvent::Backspace) => {
            tui.link_buffer.pop();
        }
        (InputMode::DeepLink, TuiEvent::Esc) => {
            tui.link_buffer.clear();
            tui.input_mode = InputMode::Navigate;
        }
        (InputMode::DeepLink, TuiEvent::Enter) => {
            let text = std::mem::take(&mut tui.link_buffer);
            tui.input_mode = InputMode::Navigate;
            match text.parse::<DeepLink>() {
                Ok(link) => {
                    tui.status_message = format!("Opened {link}");
                    root.handle_deep_link(link);
                }
                Err(e) => {
                    warn!("Rejected deep link {:?}: {}", text, e);
                    tui.status_message = e.to_string();
                }
            }
        }

        (InputMode::Navigate, TuiEvent::Esc | TuiEvent::Backspace) => {
            let outcome = tui.back.dispatch(root);
            debug!("Back: {:?}", outcome);
            tui.status_message.clear();
        }
        (InputMode::Navigate, TuiEvent::Char(':')) => {
            tui.input_mode = InputMode::DeepLink;
            tui.status_message.clear();
        }
        (InputMode::Navigate, TuiEvent::Char('q')) => tui.quit(),
        (InputMode::Navigate, TuiEvent::Char(c @ '1'..='3')) => {
            let index = c as usize - '1' as usize;
            let tab = Tab::ALL[index];
            let force = root.selected_tab() == tab;
            root.go_to_tab(tab, force);
            tui.status_message = if force {
                format!("Reset {}", tab.id())
            } else {
                String::new()
            };
        }
        (InputMode::Navigate, TuiEvent::Char(c)) => {
            if root.on_input(c) {
                tui.status_message.clear();
            } else {
                tui.status_message = format!("No action for '{c}'");
            }
        }
        (InputMode::Navigate, TuiEvent::Enter) => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::settings::MemorySettingsStore;
    use crate::router::NodeContext;

    fn setup() -> (TuiState, BottomBar) {
        let node = NodeContext::root("bottombar");
        let tui = TuiState::new(node.back.clone());
        let root = BottomBar::new(node, None, Arc::new(MemorySettingsStore::new()), Tab::Device);
        (tui, root)
    }

    fn type_text(tui: &mut TuiState, root: &mut BottomBar, text: &str) {
        for c in text.chars() {
            handle_event(tui, root, TuiEvent::Char(c));
        }
    }

    #[test]
    fn test_number_keys_switch_and_reset_tabs() {
        let (mut tui, mut root) = setup();

        handle_event(&mut tui, &mut root, TuiEvent::Char('1'));
        assert_eq!(root.selected_tab(), Tab::Archive);

        handle_event(&mut tui, &mut root, TuiEvent::Char('i'));
        assert_eq!(root.breadcrumbs(), vec!["Archive", "Category: infrared"]);

        handle_event(&mut tui, &mut root, TuiEvent::Char('1'));
        assert_eq!(root.breadcrumbs(), vec!["Archive", "Archive home"]);
        assert_eq!(tui.status_message, "Reset archive");
    }

    #[test]
    fn test_deep_link_prompt() {
        let (mut tui, mut root) = setup();

        handle_event(&mut tui, &mut root, TuiEvent::Char(':'));
        assert_eq!(tui.input_mode, InputMode::DeepLink);
        type_text(&mut tui, &mut root, "hub/faphub/app/snake");
        handle_event(&mut tui, &mut root, TuiEvent::Enter);

        assert_eq!(tui.input_mode, InputMode::Navigate);
        assert_eq!(root.breadcrumbs(), vec!["Hub", "FapHub", "App: snake"]);
    }

    #[test]
    fn test_bad_deep_link_reports_error() {
        let (mut tui, mut root) = setup();

        handle_event(&mut tui, &mut root, TuiEvent::Char(':'));
        type_text(&mut tui, &mut root, "tab/nowhere");
        handle_event(&mut tui, &mut root, TuiEvent::Enter);

        assert_eq!(tui.status_message, "unknown tab: nowhere");
        assert_eq!(root.selected_tab(), Tab::Device);
    }

    #[test]
    fn test_back_closes_once_at_root() {
        let (mut tui, mut root) = setup();
        handle_event(&mut tui, &mut root, TuiEvent::Char('f'));

        handle_event(&mut tui, &mut root, TuiEvent::Esc);
        assert!(!tui.should_quit());
        assert_eq!(root.breadcrumbs(), vec!["Device", "Update"]);

        handle_event(&mut tui, &mut root, TuiEvent::Esc);
        assert!(tui.should_quit());
    }

    #[test]
    fn test_unknown_key_sets_status() {
        let (mut tui, mut root) = setup();
        handle_event(&mut tui, &mut root, TuiEvent::Char('z'));
        assert_eq!(tui.status_message, "No action for 'z'");
    }
}
