//! Terminal front-end: reads moves from stdin and redraws the board after each one.
mod command;
mod view;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use mineclear_core::*;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use command::{Command, HELP};
use view::TerminalView;

#[derive(Parser, Debug)]
#[command(version, about = "Reveal every safe cell without stepping on a mine")]
struct Args {
    /// Number of rows, at least 8
    #[arg(long)]
    rows: Option<Coord>,

    /// Number of columns, at least 8
    #[arg(long)]
    columns: Option<Coord>,

    /// Number of mines, defaults to 10 per 64 cells
    #[arg(long)]
    mines: Option<CellCount>,

    /// Seed for mine placement
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with default board settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct Settings {
    #[serde(flatten)]
    game: GameConfig,
    seed: Option<u64>,
}

impl Settings {
    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid settings in {}", path.display()))
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Applies a move and reports whether the board changed.
fn apply<T: Ticker, O: GameObserver + ?Sized>(
    session: &mut GameSession<T>,
    command: Command,
    observer: &mut O,
) -> mineclear_core::Result<bool> {
    match command {
        Command::Reveal(coords) => Ok(session.reveal(coords, observer)?.has_update()),
        Command::Flag(coords) => Ok(session.toggle_flag(coords, observer)?.has_update()),
        Command::NewGame => {
            session.new_game(observer);
            Ok(true)
        }
        Command::Configure(config) => session.reconfigure(config, observer).map(|()| true),
        Command::Help | Command::Quit => Ok(false),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.verbosity.tracing_level_filter().into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let config = GameConfig::new(
        args.rows.unwrap_or(settings.game.rows),
        args.columns.unwrap_or(settings.game.columns),
        args.mines.or(settings.game.mines),
    );
    let seed = args.seed.or(settings.seed).unwrap_or_else(clock_seed);
    log::info!("Starting {} board with seed {}", config, seed);

    let mut session = GameSession::new(config, Stopwatch::default(), seed)
        .with_context(|| format!("Cannot start a game with {}", config))?;
    let mut view = TerminalView::default();
    let mut out = io::stdout().lock();

    view.set_message(HELP);
    view.draw(&mut out, session.engine(), session.engine().ticker().shown())?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Could not read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let mut changed = false;
        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => view.set_message(HELP),
            Ok(command) => match apply(&mut session, command, &mut view) {
                Ok(updated) => changed = updated,
                Err(err) => view.set_message(err.to_string()),
            },
            Err(err) => view.set_message(err.to_string()),
        }

        // the clock is only refreshed between moves
        let stopwatch = session.engine_mut().ticker_mut();
        let ticked = stopwatch.poll().is_some();
        let time = stopwatch.shown();
        if changed || ticked || view.has_message() {
            view.draw(&mut out, session.engine(), time)?;
        }
    }

    writeln!(out, "bye")?;
    Ok(())
}
