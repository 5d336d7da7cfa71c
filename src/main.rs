mod cli;

use clap::Parser;
use cli::{Cli, Cmd};
use genrex_core::{config::Config, Explorer, KnowledgeStore, QueryGateway};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "could not load config, using defaults");
        Config::defaults()
    });
    cli.apply_overrides(&mut config);

    let store = genrex_kb::open(&config.knowledge_base)?;
    let root = store
        .declared_root()
        .map(str::to_string)
        .unwrap_or_else(|| config.taxonomy.root.clone());
    let mut explorer = Explorer::new(QueryGateway::new(store).with_root(root));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command.unwrap_or(Cmd::Browse) {
        Cmd::Genres { json } => cli::genres(&mut explorer, json, &mut out),
        Cmd::Properties { json } => cli::properties(&mut explorer, json, &mut out),
        Cmd::Show { genre, json } => cli::show(&mut explorer, &genre, json, &mut out),
        Cmd::Search { mode, json, properties } => {
            let mode = mode.unwrap_or(config.search.default_mode);
            cli::search(&mut explorer, &properties, mode, json, &mut out)
        }
        Cmd::Browse => {
            drop(out);
            genrex_tui::run(explorer, config)
        }
    }
}

/// `--debug` appends everything to a file so the TUI screen stays clean.
/// Otherwise subcommands log warnings to stderr; the browser logs nothing.
fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let filter = |default: &str| {
        tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
    };

    if cli.debug {
        let path = std::env::temp_dir().join("genrex-debug.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(filter("debug"))
            .init();
        tracing::info!("genrex debug log started, tail -f {}", path.display());
    } else if !matches!(cli.command, None | Some(Cmd::Browse)) {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter("warn"))
            .init();
    }
    Ok(())
}
