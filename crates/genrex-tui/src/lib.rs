//! genrex TUI: ratatui application shell and the text the panes display.

pub mod app;
pub mod commands;
pub mod event;
pub mod format;
pub mod theme;
pub mod widgets;

pub use app::App;

use genrex_core::{config::Config, Explorer, KnowledgeStore};

/// Run the browser over `explorer` until the user quits.
pub fn run<S: KnowledgeStore>(explorer: Explorer<S>, config: Config) -> anyhow::Result<()> {
    let theme = theme::Theme::by_name(&config.ui.theme);
    App::new(explorer, config, theme).run()
}
