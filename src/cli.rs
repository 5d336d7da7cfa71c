//! Command-line surface: argument definitions and the non-interactive
//! subcommands.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use genrex_core::{
    config::{Backend, Config},
    Explorer, KnowledgeStore, MatchMode, SearchRequest,
};
use genrex_tui::format::{search_results_text, GenreDetail};
use serde::Serialize;
use std::{io::Write, path::PathBuf};

#[derive(Debug, Parser)]
#[command(name = "genrex", version, about = "Browse and search a music genre taxonomy")]
pub struct Cli {
    /// Write debug logs to $TMPDIR/genrex-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    pub debug: bool,

    /// Knowledge file to load; implies the frames backend.
    #[arg(long, global = true, value_name = "PATH")]
    pub kb: Option<PathBuf>,

    /// Knowledge-store backend, overriding the config file.
    #[arg(long, global = true, value_name = "frames|swipl")]
    pub backend: Option<Backend>,

    #[command(subcommand)]
    pub command: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
    /// List every genre in enumeration order.
    Genres {
        #[arg(long)]
        json: bool,
    },
    /// List every property known to the knowledge base.
    Properties {
        #[arg(long)]
        json: bool,
    },
    /// Show a genre's ancestors, properties and description.
    Show {
        genre: String,
        #[arg(long)]
        json: bool,
    },
    /// Find genres having ALL (default) or ANY of the given properties.
    Search {
        /// Match mode; defaults to `[search] default_mode` from the config.
        #[arg(long, short)]
        mode: Option<MatchMode>,
        #[arg(long)]
        json: bool,
        properties: Vec<String>,
    },
    /// Open the terminal browser (default).
    Browse,
}

impl Cli {
    /// Apply `--kb` and `--backend` on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(backend) = self.backend {
            config.knowledge_base.backend = backend;
        }
        if let Some(ref path) = self.kb {
            config.knowledge_base.backend = Backend::Frames;
            config.knowledge_base.frames_path = path.display().to_string();
        }
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SearchOutput<'a> {
    mode: MatchMode,
    properties: &'a [String],
    genres: &'a [String],
}

pub fn genres<S: KnowledgeStore>(
    explorer: &mut Explorer<S>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    print_list(&explorer.genres(), json, out)
}

pub fn properties<S: KnowledgeStore>(
    explorer: &mut Explorer<S>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    print_list(&explorer.available_properties(), json, out)
}

pub fn show<S: KnowledgeStore>(
    explorer: &mut Explorer<S>,
    genre: &str,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if !explorer.genres().iter().any(|g| g == genre.trim()) {
        bail!("unknown genre: {genre}");
    }
    let detail = GenreDetail::load(explorer, genre);
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&detail)?)?;
    } else {
        for line in detail.lines() {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

pub fn search<S: KnowledgeStore>(
    explorer: &mut Explorer<S>,
    properties: &[String],
    mode: MatchMode,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let request = SearchRequest::from_properties(properties.iter().map(String::as_str), mode)?;
    let found = explorer.search(&request)?;

    if json {
        let output = SearchOutput {
            mode,
            properties: request.properties(),
            genres: &found,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        let total = explorer.genre_count();
        writeln!(out, "{}", search_results_text(&request, &found, total))?;
    }
    Ok(())
}

fn print_list(items: &[String], json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(items)?)?;
        return Ok(());
    }
    for item in items {
        writeln!(out, "{item}").context("writing to stdout")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
