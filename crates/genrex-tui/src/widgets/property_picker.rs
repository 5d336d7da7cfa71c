//! Property picker: the left pane of the search tab.
//!
//! Lists every property the knowledge base knows, narrowed by the filter
//! text. The app shell toggles the property under the cursor in its
//! [`SearchRequest`]; this widget only tracks the cursor and renders the
//! selection marks.

use crate::event::{AppEvent, Direction};
use crate::format::format_property_text;
use crate::theme::Theme;
use genrex_core::SearchRequest;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct PropertyPickerState {
    pub properties: Vec<String>,
    filter: String,
    /// Index into the filtered list.
    pub cursor: usize,
}

impl PropertyPickerState {
    pub fn new(properties: Vec<String>) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    /// Narrow the list to properties containing `filter` (case-insensitive,
    /// raw or display form).
    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.trim().to_lowercase();
        self.clamp_cursor();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn visible(&self) -> Vec<&str> {
        self.properties
            .iter()
            .map(String::as_str)
            .filter(|p| {
                self.filter.is_empty()
                    || p.to_lowercase().contains(&self.filter)
                    || format_property_text(p).to_lowercase().contains(&self.filter)
            })
            .collect()
    }

    /// Property under the cursor.
    pub fn current(&self) -> Option<&str> {
        self.visible().get(self.cursor).copied()
    }

    pub fn handle(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            AppEvent::Nav(Direction::Down) => {
                if self.cursor + 1 < self.visible().len() {
                    self.cursor += 1;
                }
            }
            _ => return,
        }
        tracing::debug!(cursor = self.cursor, "picker: cursor moved");
    }

    fn clamp_cursor(&mut self) {
        let max = self.visible().len().saturating_sub(1);
        if self.cursor > max {
            self.cursor = max;
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct PropertyPicker<'a> {
    state: &'a PropertyPickerState,
    request: &'a SearchRequest,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> PropertyPicker<'a> {
    pub fn new(
        state: &'a PropertyPickerState,
        request: &'a SearchRequest,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            request,
            focused,
            theme,
        }
    }
}

impl Widget for PropertyPicker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = self.state.visible();
        let title = if self.state.filter.is_empty() {
            format!(" Properties ({} selected) ", self.request.len())
        } else {
            format!(
                " Properties /{} ({} of {}) ",
                self.state.filter,
                visible.len(),
                self.state.properties.len()
            )
        };
        let block = Block::bordered()
            .title(title)
            .border_style(self.theme.border(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = visible
            .iter()
            .map(|property| {
                let (mark, style) = if self.request.contains(property) {
                    ("[x] ", self.theme.picker_selected)
                } else {
                    ("[ ] ", self.theme.picker_unselected)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, style),
                    Span::styled(format_property_text(property), style),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(self.theme.highlight);
        let mut list_state = ListState::default().with_selected(Some(self.state.cursor));
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
