//! Ratatui widgets for the genrex TUI.

pub mod command_bar;
pub mod genre_tree;
pub mod help;
pub mod property_picker;
pub mod query_bar;
pub mod tab_bar;
pub mod text_pane;
