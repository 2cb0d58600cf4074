use std::io;

use anyhow::Context;
use clap::Parser;
use hotseat::console::Console;
use hotseat::game::Game;
use tracing_subscriber::EnvFilter;

/// Two-player chess in the terminal. Moves are entered in coordinate notation
/// (e.g. e2e4), type "help" for the list of commands.
#[derive(Parser, Debug)]
#[command(version, long_version = hotseat::version(), about)]
struct Config {
    /// Starting position in Forsyth-Edwards Notation.
    #[arg(long)]
    fen: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::parse();
    let game = match config.fen {
        Some(fen) => {
            Game::from_fen(&fen).with_context(|| format!("invalid starting position: {fen}"))?
        },
        None => Game::new(),
    };

    hotseat::print_build_info();

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    Console::new(game, &mut input, &mut output).run()
}
