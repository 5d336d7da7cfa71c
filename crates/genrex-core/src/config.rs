//! Configuration types for genrex.
//!
//! [`Config::load`] reads `~/.config/genrex/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use crate::types::MatchMode;
use serde::Deserialize;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[knowledge_base]
# "frames" reads a TOML knowledge file; "swipl" drives an SWI-Prolog process.
backend     = "frames"
# Leave empty to use the bundled sample taxonomy.
frames_path = ""

[knowledge_base.swipl]
program = "swipl"
consult = [
    "prolog/inference_engine.pl",
    "prolog/knowledge_base.pl",
    "prolog/queries.pl",
]

[taxonomy]
root = "top"

[search]
default_mode = "all"

[ui]
genre_pane_width_pct = 30
theme                = "default"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/genrex/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Which knowledge-store backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Frames,
    Swipl,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frames" => Ok(Backend::Frames),
            "swipl" | "prolog" => Ok(Backend::Swipl),
            other => Err(format!("unknown backend: {other} (expected frames or swipl)")),
        }
    }
}

/// `[knowledge_base]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBaseConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Path to a TOML knowledge file; empty selects the bundled taxonomy.
    #[serde(default)]
    pub frames_path: String,
    #[serde(default)]
    pub swipl: SwiplConfig,
}

impl KnowledgeBaseConfig {
    /// The configured frame file, if any.
    pub fn frames_file(&self) -> Option<PathBuf> {
        let path = self.frames_path.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            frames_path: String::new(),
            swipl: SwiplConfig::default(),
        }
    }
}

/// `[knowledge_base.swipl]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SwiplConfig {
    #[serde(default = "default_swipl_program")]
    pub program: String,
    /// Knowledge files consulted at startup, in order.
    #[serde(default = "default_consult")]
    pub consult: Vec<String>,
}

fn default_swipl_program() -> String { "swipl".to_string() }
fn default_consult() -> Vec<String> {
    vec![
        "prolog/inference_engine.pl".to_string(),
        "prolog/knowledge_base.pl".to_string(),
        "prolog/queries.pl".to_string(),
    ]
}

impl Default for SwiplConfig {
    fn default() -> Self {
        Self {
            program: default_swipl_program(),
            consult: default_consult(),
        }
    }
}

/// `[taxonomy]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyConfig {
    #[serde(default = "default_root")]
    pub root: String,
}

fn default_root() -> String { crate::gateway::DEFAULT_ROOT.to_string() }

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self { root: default_root() }
    }
}

/// `[search]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub default_mode: MatchMode,
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_genre_pane_width_pct")]
    pub genre_pane_width_pct: u16,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_genre_pane_width_pct() -> u16 { 30 }
fn default_theme() -> String { "default".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            genre_pane_width_pct: default_genre_pane_width_pct(),
            theme: default_theme(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/genrex/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load the defaults overlaid with `path`, which may be missing.
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Location of the user config file.
pub fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("genrex")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
