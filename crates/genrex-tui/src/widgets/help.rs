//! Help popup: floating overlay listing the keybindings, grouped by what
//! they act on. Toggle with `?`; close with `?` or `Escape`.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

type Section = (&'static str, &'static [(&'static str, &'static str)]);

const SECTIONS: &[Section] = &[
    (
        "Genres",
        &[
            ("j k  ↑ ↓", "move through the tree"),
            ("h l  ← →", "collapse / expand a genre"),
            ("Enter", "toggle the genre under the cursor"),
        ],
    ),
    (
        "Search",
        &[
            ("Space", "select / deselect a property"),
            ("Enter", "preview one property on its own"),
            ("m", "match ALL or ANY"),
            ("c", "clear the selection"),
            ("/", "filter properties (Esc leaves)"),
        ],
    ),
    (
        "Anywhere",
        &[
            ("1 2", "genres tab / search tab"),
            ("Tab", "next pane"),
            ("PgUp PgDn  ^u ^d", "scroll the text pane"),
            (":", "command: q, help, theme, mode, clear"),
            ("?", "this popup"),
            ("q  ^c", "quit"),
        ],
    ),
];

const KEY_COLUMN: usize = 20;

pub struct HelpPopup<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let key_style = self.theme.title.add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();
        for (i, (heading, bindings)) in SECTIONS.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            lines.push(Line::from(Span::styled(*heading, self.theme.muted)));
            lines.extend(bindings.iter().map(|(keys, action)| {
                Line::from(vec![
                    Span::styled(format!("  {keys:<KEY_COLUMN$}"), key_style),
                    Span::raw(*action),
                ])
            }));
        }
        lines
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 4;
        let popup = centre(area, width, lines.len() as u16 + 2);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" keys (? closes) ")
            .border_style(self.theme.border_focused);
        let inner = block.inner(popup);
        block.render(popup, buf);
        Paragraph::new(lines).render(inner, buf);
    }
}

fn centre(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
