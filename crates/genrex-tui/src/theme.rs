//! Colour theme for the genrex TUI.
//!
//! Themes are defined as TOML files. Both shipped themes are embedded in the
//! binary via [`include_str!`] so the application works without any files on
//! disk. [`Theme::by_name`] picks one from the `[ui] theme` setting or the
//! `:theme` command.
//!
//! # Family colours
//!
//! Top-level genres (the direct children of the root) are hashed to a stable
//! index into the palette, so a family keeps its colour however the
//! taxonomy is ordered.

use config::{Config, File, FileFormat};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const GRUVBOX_DARK_THEME_SRC: &str = include_str!("themes/gruvbox_dark.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types: mirror the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    command_bar: RawStyle,
    unfocused: RawStyle,
}

#[derive(Debug, Default, Deserialize)]
struct RawTree {
    #[serde(default)]
    branch: RawStyle,
    #[serde(default)]
    leaf: RawStyle,
}

#[derive(Debug, Default, Deserialize)]
struct RawPicker {
    #[serde(default)]
    selected: RawStyle,
    #[serde(default)]
    unselected: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    mode_all: RawStyle,
    mode_any: RawStyle,
    highlight: RawStyle,
}

#[derive(Debug, Default, Deserialize)]
struct RawText {
    #[serde(default)]
    title: RawStyle,
    #[serde(default)]
    muted: RawStyle,
}

#[derive(Debug, Default, Deserialize)]
struct RawFamilies {
    #[serde(default)]
    palette: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    borders: RawBorders,
    #[serde(default)]
    tree: RawTree,
    #[serde(default)]
    picker: RawPicker,
    search: RawSearch,
    #[serde(default)]
    text: RawText,
    #[serde(default)]
    families: RawFamilies,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Application colour theme. All styles are resolved when the theme loads.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    pub border_focused: Style,
    pub border_command_bar: Style,
    pub border_unfocused: Style,

    /// Genres with children.
    pub tree_branch: Style,
    pub tree_leaf: Style,

    /// Property picker rows, by selection state.
    pub picker_selected: Style,
    pub picker_unselected: Style,

    /// Match-mode badge.
    pub mode_all: Style,
    pub mode_any: Style,
    /// Cursor row in lists.
    pub highlight: Style,

    pub title: Style,
    pub muted: Style,

    family_palette: Vec<Color>,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_default() -> Self {
        Self::from_toml_str("default", DEFAULT_THEME_SRC)
            .expect("embedded default theme must be valid TOML")
    }

    /// Load and parse the embedded Gruvbox Dark theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_gruvbox_dark() -> Self {
        Self::from_toml_str("gruvbox_dark", GRUVBOX_DARK_THEME_SRC)
            .expect("embedded gruvbox dark theme must be valid TOML")
    }

    /// Look up a shipped theme by name; unknown names fall back to the
    /// default theme.
    pub fn by_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "gruvbox" | "gruvbox_dark" | "gruvbox-dark" => Self::load_gruvbox_dark(),
            "default" => Self::load_default(),
            other => {
                tracing::warn!(theme = other, "unknown theme, using default");
                Self::load_default()
            }
        }
    }

    /// Parse a theme from a TOML string.
    pub fn from_toml_str(name: &str, src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            name: name.to_string(),
            border_focused: raw.borders.focused.into_style(),
            border_command_bar: raw.borders.command_bar.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            tree_branch: raw.tree.branch.into_style(),
            tree_leaf: raw.tree.leaf.into_style(),
            picker_selected: raw.picker.selected.into_style(),
            picker_unselected: raw.picker.unselected.into_style(),
            mode_all: raw.search.mode_all.into_style(),
            mode_any: raw.search.mode_any.into_style(),
            highlight: raw.search.highlight.into_style(),
            title: raw.text.title.into_style(),
            muted: raw.text.muted.into_style(),
            family_palette: raw
                .families
                .palette
                .iter()
                .filter_map(|s| parse_color(s))
                .collect(),
        })
    }

    /// Border style for a pane.
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.border_focused
        } else {
            self.border_unfocused
        }
    }

    /// Stable style for a top-level genre family.
    pub fn family_style(&self, family: &str) -> Style {
        if self.family_palette.is_empty() {
            return Style::default();
        }
        let idx = stable_hash(family) % self.family_palette.len();
        Style::default().fg(self.family_palette[idx])
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// djb2-style hash, stable across Rust versions and process restarts.
fn stable_hash(s: &str) -> usize {
    s.bytes()
        .fold(5381usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize))
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("gray", Color::Gray),
    ("dark_gray", Color::DarkGray),
    ("light_red", Color::LightRed),
    ("light_green", Color::LightGreen),
    ("light_yellow", Color::LightYellow),
    ("light_blue", Color::LightBlue),
    ("light_magenta", Color::LightMagenta),
    ("light_cyan", Color::LightCyan),
    ("white", Color::White),
];

/// Theme colour syntax: a terminal colour name (`dark_gray`, `grey` and
/// `darkgrey` spellings accepted), `#rrggbb`, or `indexed:N`.
fn parse_color(spec: &str) -> Option<Color> {
    let spec = spec.trim().to_ascii_lowercase();
    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(index) = spec.strip_prefix("indexed:") {
        return index.parse().ok().map(Color::Indexed);
    }
    let name = spec.replace("grey", "gray").replace("darkgray", "dark_gray");
    NAMED_COLORS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, color)| *color)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
