//! Gobble: play a tiny Go-like game against an MCTS engine.
//!
//! ## Usage
//!
//! - `gobble` - Play on the console (same as `gobble play`)
//! - `gobble play` - Play as Black; the engine answers every move
//! - `gobble demo` - Watch the engine play itself

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use gobble::board::Color;
use gobble::config::{Config, Difficulty};
use gobble::console::{Console, render};
use gobble::logging::init_logging;
use gobble::mcts::tree_search;
use gobble::position::Position;
use gobble::scoring::{evaluate_winner, influence_map};

/// Gobble: a miniature Go game with an MCTS opponent
#[derive(Parser)]
#[command(name = "gobble")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Engine strength: discovery, guided, strategic, analytical or mastery
    #[arg(long, global = true)]
    difficulty: Option<Difficulty>,

    /// Seed for reproducible engine moves
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Mark influenced empty cells on the board
    #[arg(long, global = true)]
    show_influence: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the engine on the console
    Play,
    /// Let the engine play against itself
    Demo {
        /// Stop after this many moves
        #[arg(long, default_value_t = 12)]
        moves: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(&cli.log_level).context("starting logger")?;
    let config = build_config(&cli)?;
    info!("starting with {config:?}");

    match cli.command {
        Some(Commands::Demo { moves }) => run_demo(&config, moves),
        Some(Commands::Play) | None => {
            println!(
                "Gobble {0}x{0}: you are black. Type list_commands for help.\n",
                config.board_size
            );
            let mut console = Console::new(config).with_auto_reply(true);
            console
                .run(io::stdin().lock(), io::stdout())
                .context("console I/O failed")
        }
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.show_influence |= cli.show_influence;
    config.validate()?;
    Ok(config)
}

fn run_demo(config: &Config, moves: usize) -> anyhow::Result<()> {
    println!("Gobble: engine vs engine ({})\n", config.difficulty);

    let mut pos = Position::with_size(config.board_size);
    for _ in 0..moves {
        if pos.is_game_over() {
            break;
        }
        let color = pos.next_to_move();
        let result = tree_search(&pos, &config.search_config());
        pos.play(result.best)
            .with_context(|| format!("engine chose an illegal move {}", result.best))?;

        println!("{color} plays {} ({} simulations)", result.best, result.iterations);
        for candidate in &result.analysis {
            println!("  {candidate}");
        }
        let overlay = config.show_influence.then(|| influence_map(pos.board()));
        println!("{}", render(pos.board(), overlay.as_deref()));
    }

    let black = evaluate_winner(pos.board(), Color::Black);
    println!(
        "Final estimate: black {:.1}%, white {:.1}%",
        black * 100.0,
        (1.0 - black) * 100.0
    );
    Ok(())
}
