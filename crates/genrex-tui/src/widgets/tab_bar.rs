//! Tab bar widget: renders the strip of tabs at the top of the screen.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::Line,
    widgets::{Tabs, Widget},
};

/// One tab's label and whether it carries state worth flagging.
#[derive(Debug, Clone, Copy)]
pub struct TabLabel<'a> {
    pub label: &'a str,
    pub marked: bool,
}

/// Renders the 1-line tab strip.
///
/// The active tab is highlighted; a `●` suffix marks tabs with state (the
/// search tab while properties are selected). Keybinding hints
/// (`q:quit  ?:help`) are right-aligned in the same row.
pub struct TabBar<'a> {
    tabs: &'a [TabLabel<'a>],
    active: usize,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [TabLabel<'a>], active: usize, theme: &'a Theme) -> Self {
        Self { tabs, active, theme }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let labels: Vec<Line> = self
            .tabs
            .iter()
            .map(|tab| {
                let mark = if tab.marked { " ●" } else { "" };
                Line::from(format!(" {}{} ", tab.label, mark))
            })
            .collect();

        Tabs::new(labels)
            .select(self.active)
            .highlight_style(self.theme.highlight.add_modifier(Modifier::BOLD))
            .divider("")
            .render(area, buf);

        let hint = " q:quit  ?:help ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(hint_x, area.y, hint, self.theme.muted);
    }
}
