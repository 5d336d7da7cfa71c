//! Text pane: a scrollable read-only pane used for the genre detail and the
//! search results.
//!
//! # Navigation (when the pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Scroll up one line |
//! | `↓` / `j` | Scroll down one line |
//! | `PageUp` / `Ctrl+u` | Scroll up one page |
//! | `PageDown` / `Ctrl+d` | Scroll down one page |
//!
//! `scroll` is the index of the first visible line. Replacing the text
//! resets it to the top.

use std::cell::Cell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct TextPaneState {
    pub title: String,
    pub lines: Vec<String>,
    pub scroll: usize,
    /// Cached from the last render so `handle()` can page by screenfuls.
    last_height: Cell<usize>,
}

impl TextPaneState {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            scroll: 0,
            last_height: Cell::new(20),
        }
    }

    /// Replace the content with `text`, one entry per line.
    pub fn set_text(&mut self, text: &str) {
        self.set_lines(text.lines().map(str::to_string).collect());
    }

    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.scroll = 0;
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn page(&self) -> usize {
        self.last_height.get().max(1)
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.page())
    }

    pub fn handle(&mut self, event: &AppEvent) {
        let before = self.scroll;
        match event {
            AppEvent::Nav(Direction::Up) => self.scroll = self.scroll.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => {
                self.scroll = (self.scroll + 1).min(self.max_scroll())
            }
            AppEvent::ScrollUp => self.scroll = self.scroll.saturating_sub(self.page()),
            AppEvent::ScrollDown => {
                self.scroll = (self.scroll + self.page()).min(self.max_scroll())
            }
            _ => return,
        }
        if self.scroll != before {
            tracing::debug!(pane = %self.title, scroll = self.scroll, "text pane: scrolled");
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct TextPane<'a> {
    state: &'a TextPaneState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> TextPane<'a> {
    pub fn new(state: &'a TextPaneState, focused: bool, theme: &'a Theme) -> Self {
        Self {
            state,
            focused,
            theme,
        }
    }
}

impl Widget for TextPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(Span::styled(format!(" {} ", self.state.title), self.theme.title))
            .border_style(self.theme.border(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let height = inner.height as usize;
        self.state.last_height.set(height);

        let lines: Vec<Line> = self
            .state
            .lines
            .iter()
            .skip(self.state.scroll)
            .take(height)
            .map(|l| Line::from(l.as_str()))
            .collect();
        Paragraph::new(lines).render(inner, buf);

        if self.state.lines.len() > height {
            let mut scrollbar = ScrollbarState::new(self.state.lines.len().saturating_sub(height))
                .position(self.state.scroll);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(self.theme.muted)
                .render(area, buf, &mut scrollbar);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
