use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::ExecutableCommand;
use crossterm::cursor::Show;
use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
use iocraft::prelude::*;

use gh_my::app::App;
use gh_my::config::loader;
use gh_my::config::types::parse_duration;
use gh_my::engine::{Engine, GhEngine};
use gh_my::types::PanelKind;

#[derive(Parser)]
#[command(name = "gh-my", version, about = "Terminal dashboard of your GitHub pull requests")]
struct Cli {
    /// Tab to open first.
    #[arg(value_enum)]
    tab: Option<StartTab>,

    /// Include draft PRs.
    #[arg(short = 'd', long)]
    include_drafts: bool,

    /// Include closed and merged PRs.
    #[arg(short = 'c', long)]
    include_closed: bool,

    /// Refresh the active tab every INTERVAL (e.g. 90s, 5m, 1h30m).
    #[arg(short = 'w', long = "watch", value_name = "INTERVAL", value_parser = parse_duration)]
    watch: Option<Duration>,

    /// Path to config file (TOML, or JSON when it ends in .json).
    #[arg(short = 'f', long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging to gh-my.log.
    #[arg(long)]
    debug: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StartTab {
    Prs,
    Requests,
    All,
}

impl From<StartTab> for PanelKind {
    fn from(tab: StartTab) -> Self {
        match tab {
            StartTab::Prs => PanelKind::MyPrs,
            StartTab::Requests => PanelKind::Requested,
            StartTab::All => PanelKind::All,
        }
    }
}

/// Leave raw mode and the alternate screen so a panic message stays readable.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = std::io::stdout();
    let _ = stdout.execute(LeaveAlternateScreen);
    let _ = stdout.execute(Show);
}

fn main() -> Result<()> {
    // Install a panic hook that writes to a file, since the fullscreen TUI
    // swallows stderr.
    std::panic::set_hook(Box::new(|info| {
        restore_terminal();
        let backtrace = std::backtrace::Backtrace::force_capture();
        let msg = format!("{info}\n\n{backtrace}");
        let _ = std::fs::write("panic.log", &msg);
        eprintln!("{msg}");
    }));

    let cli = Cli::parse();

    // Set up tracing.
    if cli.debug {
        let file = std::fs::File::create("gh-my.log")?;
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    // Load config; command-line flags only ever switch inclusion on.
    let mut config = loader::load_config(cli.config.as_deref())?;
    config.include_drafts |= cli.include_drafts;
    config.include_closed |= cli.include_closed;
    if cli.watch.is_some() {
        config.interval = cli.watch;
    }
    let options = config.dashboard_options(cli.tab.map(PanelKind::from));

    // Start the search engine in a dedicated OS thread (owns its own Tokio
    // runtime). Dropping `engine_handle` at the end of `main` closes the
    // sender channel, signalling the engine to shut down.
    let engine_handle = GhEngine::new().start();

    tracing::info!("gh-my starting");

    // Enter fullscreen TUI (iocraft uses smol internally).
    smol::block_on(
        element! {
            App(
                options: &options,
                engine: &engine_handle,
            )
        }
        .fullscreen(),
    )?;

    Ok(())
}
