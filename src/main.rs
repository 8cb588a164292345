//! Terminal-style typing text.
//!
//! Run the binary to play the built-in projects header, or pass `--script`
//! to type out your own lines.  `--print-default-config` prints the config
//! file format.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::app::{
    event::spawn_event_reader,
    handler, script_runtime,
    sequencer::{Sequencer, SequencerEvent},
    state::AppState,
};
use crate::core::script::Script;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal-style typing text")]
struct Cli {
    /// Script file to type out (defaults to the built-in projects header).
    #[arg(long)]
    script: Option<PathBuf>,

    /// Default milliseconds per character for lines without their own speed.
    #[arg(long)]
    speed: Option<i64>,

    /// Never draw the blinking cursor.
    #[arg(long)]
    no_cursor: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_default_config: bool,

    /// Save the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

// ───────────────────────────────────────── logging ───────────

/// Logging is silent unless `RUST_LOG` is set.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr) // stdout belongs to the TUI
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let mut user_config = config::AppConfig::load();
    if let Some(speed) = cli.speed {
        user_config.default_speed_ms = speed;
    }
    if cli.no_cursor {
        user_config.show_cursor = false;
    }

    if cli.print_default_config {
        print!("{}", user_config.serialise());
        return Ok(());
    }
    if cli.write_config {
        user_config.save()?;
        return Ok(());
    }

    let script = match &cli.script {
        Some(path) => Script::load(path)?,
        None => Script::default_projects(),
    };
    tracing::info!(lines = script.lines.len(), "script loaded");

    let mut state = AppState::new(script, user_config);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout_handle = stdout();
    execute!(stdout_handle, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let (mut sequencer, seq_rx) = Sequencer::new();
    let result = run(&mut terminal, &mut state, &mut sequencer, seq_rx).await;
    sequencer.cancel_all();

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    match state.input_error {
        Some(reason) => Err(anyhow!("terminal input lost: {reason}")),
        None => Ok(()),
    }
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    sequencer: &mut Sequencer,
    mut seq_rx: mpsc::UnboundedReceiver<SequencerEvent>,
) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(state.config.tick_ms));
    script_runtime::launch(state, sequencer);

    loop {
        terminal.draw(|frame| ui::screen::draw(frame, state, sequencer))?;

        tokio::select! {
            biased;

            event = events.recv() => match event {
                Some(event) => handler::handle_event(state, sequencer, event),
                // Reader gone; no further input can arrive.
                None => break,
            },

            Some(update) = seq_rx.recv() => {
                script_runtime::apply_event(state, sequencer, update);
                // Fold everything already queued into one redraw.
                while let Ok(update) = seq_rx.try_recv() {
                    script_runtime::apply_event(state, sequencer, update);
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
