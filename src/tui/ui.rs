use crate::router::{NodeView, TabKey};
use crate::screens::{BottomBar, Tab};
use crate::tui::{InputMode, TuiState};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Paragraph, Tabs};

/// One row of the navigation tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLine {
    pub depth: usize,
    pub title: String,
    pub instance: String,
    /// On the visible path from the root.
    pub active: bool,
}

/// Flattens the tree depth-first. Front entries are last at every level.
pub fn tree_lines(nodes: &[NodeView]) -> Vec<TreeLine> {
    let mut out = Vec::new();
    collect_lines(nodes, 0, true, &mut out);
    out
}

fn collect_lines(nodes: &[NodeView], depth: usize, on_path: bool, out: &mut Vec<TreeLine>) {
    let front = nodes.len().saturating_sub(1);
    for (index, node) in nodes.iter().enumerate() {
        let active = on_path && index == front;
        out.push(TreeLine {
            depth,
            title: node.title.clone(),
            instance: node.instance.to_string(),
            active,
        });
        if let Some(children) = &node.children {
            collect_lines(children, depth + 1, active, out);
        }
    }
}

pub fn draw_ui(frame: &mut Frame, root: &BottomBar, tui: &TuiState) {
    use Constraint::{Length, Min, Percentage};
    let layout = Layout::vertical([Length(1), Length(3), Min(0), Length(3)]);
    let [title_area, tabs_area, main_area, input_area] = layout.areas(frame.area());

    // Title bar
    let crumbs = root.breadcrumbs().join(" › ");
    let title_text = if tui.status_message.is_empty() {
        format!("Navstack | {crumbs}")
    } else {
        format!("Navstack | {crumbs} | {}", tui.status_message)
    };
    frame.render_widget(Span::raw(title_text), title_area);

    draw_tabs(frame, tabs_area, root.selected_tab());

    let [tree_area, keys_area] = Layout::horizontal([Percentage(65), Percentage(35)]).areas(main_area);
    draw_tree(frame, tree_area, &root.view());
    draw_shortcuts(frame, keys_area, &root.shortcuts());

    // Input area
    let input = match tui.input_mode {
        InputMode::DeepLink => {
            Paragraph::new(format!(":{}", tui.link_buffer)).block(Block::bordered().title("Deep link"))
        }
        InputMode::Navigate => Paragraph::new("1-3 tabs · : deep link · Esc back · q quit")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(Block::bordered().title("Help")),
    };
    frame.render_widget(input, input_area);
}

fn draw_tabs(frame: &mut Frame, area: Rect, selected: Tab) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()))
        .collect();
    let index = Tab::ALL.iter().position(|t| *t == selected).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(index)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::bordered().title(format!("Tabs ({})", selected.id())));
    frame.render_widget(tabs, area);
}

fn draw_tree(frame: &mut Frame, area: Rect, nodes: &[NodeView]) {
    let items: Vec<ListItem> = tree_lines(nodes)
        .into_iter()
        .map(|line| {
            let marker = if line.active { "▶ " } else { "  " };
            let style = if line.active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            ListItem::new(Line::from(vec![
                Span::raw("  ".repeat(line.depth)),
                Span::styled(format!("{marker}{}", line.title), style),
                Span::styled(
                    format!("  #{}", line.instance),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    let list = List::new(items).block(Block::bordered().title("Navigation"));
    frame.render_widget(list, area);
}

fn draw_shortcuts(frame: &mut Frame, area: Rect, shortcuts: &[(char, String)]) {
    let items: Vec<ListItem> = shortcuts
        .iter()
        .map(|(key, label)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{key} "), Style::default().fg(Color::Yellow)),
                Span::raw(label.clone()),
            ]))
        })
        .collect();
    let list = List::new(items).block(Block::bordered().title("Keys"));
    frame.render_widget(list, area);
}
