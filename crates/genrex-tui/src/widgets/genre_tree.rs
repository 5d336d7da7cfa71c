//! Genre tree widget: the collapsible taxonomy in the left pane of the
//! genres tab.
//!
//! # Navigation
//! - `↑`/`k` and `↓`/`j` move the cursor up and down the visible list.
//! - `→`/`l` expands the focused node; `←`/`h` collapses it, or jumps to the
//!   parent when the node is already collapsed or a leaf.
//! - `Enter` toggles expansion.

use crate::event::{AppEvent, Direction};
use crate::format::format_display_text;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Tree node
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Genre identifier as stored in the knowledge base.
    pub id: String,
    pub expanded: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            expanded: true,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }
}

/// A flattened, visible row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub depth: usize,
    pub node: &'a TreeNode,
    /// Top-level genre this row descends from.
    pub family: &'a str,
}

// ---------------------------------------------------------------------------
// Tree state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct GenreTreeState {
    pub nodes: Vec<TreeNode>,
    /// Index into the currently-visible (flattened) list.
    pub cursor: usize,
}

impl GenreTreeState {
    /// Build the forest from `(genre, parent)` pairs in enumeration order.
    ///
    /// A genre whose parent is `None` or not itself listed becomes a
    /// top-level node.
    pub fn from_parents(pairs: &[(String, Option<String>)]) -> Self {
        let known: std::collections::HashSet<&str> =
            pairs.iter().map(|(genre, _)| genre.as_str()).collect();
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut tops = Vec::new();

        for (genre, parent) in pairs {
            match parent.as_deref().filter(|p| known.contains(p) && *p != genre.as_str()) {
                Some(p) => children.entry(p).or_default().push(genre),
                None => tops.push(genre.as_str()),
            }
        }

        fn build(id: &str, children: &HashMap<&str, Vec<&str>>, depth: usize) -> TreeNode {
            let kids: Vec<TreeNode> = match children.get(id) {
                // depth guard against malformed parent cycles
                Some(kids) if depth < 64 => kids
                    .iter()
                    .map(|kid| build(kid, children, depth + 1))
                    .collect(),
                _ => Vec::new(),
            };
            TreeNode::new(id).with_children(kids)
        }

        Self {
            nodes: tops.into_iter().map(|id| build(id, &children, 0)).collect(),
            cursor: 0,
        }
    }

    /// Flatten the tree into rows, respecting expanded state.
    pub fn visible(&self) -> Vec<Row<'_>> {
        let mut out = Vec::new();
        for node in &self.nodes {
            flatten(node, 0, &node.id, &mut out);
        }
        out
    }

    /// Genre under the cursor.
    pub fn cursor_id(&self) -> Option<String> {
        self.visible().get(self.cursor).map(|row| row.node.id.clone())
    }

    /// Handle an [`AppEvent`], mutating state as appropriate.
    pub fn handle(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
                tracing::debug!(cursor = self.cursor, "tree: cursor up");
            }
            AppEvent::Nav(Direction::Down) => {
                let max = self.visible().len().saturating_sub(1);
                if self.cursor < max {
                    self.cursor += 1;
                }
                tracing::debug!(cursor = self.cursor, "tree: cursor down");
            }
            AppEvent::Nav(Direction::Right) => {
                if let Some(id) = self.cursor_id() {
                    tracing::debug!(node = %id, "tree: expand");
                    set_expanded(&mut self.nodes, &id, true);
                }
            }
            AppEvent::Nav(Direction::Left) => self.collapse_or_climb(),
            AppEvent::Enter => {
                if let Some(id) = self.cursor_id() {
                    tracing::debug!(node = %id, "tree: toggle expand");
                    toggle_expanded(&mut self.nodes, &id);
                    self.clamp_cursor();
                }
            }
            _ => {}
        }
    }

    fn collapse_or_climb(&mut self) {
        let rows = self.visible();
        let Some(row) = rows.get(self.cursor) else {
            return;
        };
        if row.node.expanded && !row.node.children.is_empty() {
            let id = row.node.id.clone();
            tracing::debug!(node = %id, "tree: collapse");
            set_expanded(&mut self.nodes, &id, false);
        } else if row.depth > 0 {
            // nearest row above with a smaller depth is the parent
            let parent = rows[..self.cursor]
                .iter()
                .rposition(|r| r.depth < row.depth)
                .unwrap_or(0);
            tracing::debug!(from = self.cursor, to = parent, "tree: jump to parent");
            self.cursor = parent;
        }
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let max = self.visible().len().saturating_sub(1);
        if self.cursor > max {
            self.cursor = max;
        }
    }
}

// ---------------------------------------------------------------------------
// Recursive tree helpers
// ---------------------------------------------------------------------------

fn flatten<'a>(node: &'a TreeNode, depth: usize, family: &'a str, out: &mut Vec<Row<'a>>) {
    out.push(Row { depth, node, family });
    if node.expanded {
        for child in &node.children {
            flatten(child, depth + 1, family, out);
        }
    }
}

/// Set the `expanded` flag on the node with `id`. Returns `true` if found.
fn set_expanded(nodes: &mut [TreeNode], id: &str, expanded: bool) -> bool {
    for node in nodes.iter_mut() {
        if node.id == id {
            node.expanded = expanded;
            return true;
        }
        if set_expanded(&mut node.children, id, expanded) {
            return true;
        }
    }
    false
}

/// Flip the `expanded` flag on the node with `id`. Returns `true` if found.
fn toggle_expanded(nodes: &mut [TreeNode], id: &str) -> bool {
    for node in nodes.iter_mut() {
        if node.id == id {
            node.expanded = !node.expanded;
            return true;
        }
        if toggle_expanded(&mut node.children, id) {
            return true;
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct GenreTree<'a> {
    state: &'a GenreTreeState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> GenreTree<'a> {
    pub fn new(state: &'a GenreTreeState, focused: bool, theme: &'a Theme) -> Self {
        Self {
            state,
            focused,
            theme,
        }
    }
}

impl Widget for GenreTree<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = self.state.visible();
        let block = Block::bordered()
            .title(format!(" Genres ({}) ", visible.len()))
            .border_style(self.theme.border(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = visible
            .iter()
            .map(|row| {
                let indent = "  ".repeat(row.depth);
                let (expand, style) = if row.node.children.is_empty() {
                    ("  ", self.theme.tree_leaf)
                } else if row.node.expanded {
                    ("▼ ", self.theme.tree_branch)
                } else {
                    ("▶ ", self.theme.tree_branch)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(indent),
                    Span::styled("▍", self.theme.family_style(row.family)),
                    Span::raw(expand),
                    Span::styled(format_display_text(&row.node.id), style),
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
