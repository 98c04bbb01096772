use std::io::{self, BufReader};

use clap::Parser;
use tessera::prelude::*;
use tessera::{
    comms::{console, uci},
    utils::{
        cli::{Cli, Commands},
        log,
    },
};
use tracing::span;

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level.to_string().to_lowercase();
    }
    log::init(&config.logging)?;

    let span = span!(Level::DEBUG, "main");
    let _guard = span.enter();
    match cli.command {
        Some(Commands::Headless) => {
            trace!("Running headless");
            uci::play(&config)?;
        }
        Some(Commands::Perft { fen, depth, divide }) => {
            trace!("Running perft with fen: {fen:?}, depth: {depth}, divide: {divide}");
            let pos = Position::from_fen(&fen)?;
            println!("{pos}");
            if divide {
                println!("{}", format_divide(&perft_divide(&pos, depth)));
            } else {
                run_perft_suite(&pos, depth, &mut io::stdout().lock())?;
            }
        }
        Some(Commands::Moves { fen }) => {
            let game = Game::from_fen(&fen)?;
            let side = game.position().side_to_move();
            let moves = game.legal_moves();
            println!("{}", game.position());
            println!("{} legal moves: {}", moves.len(), moves.join(" "));
            if game.is_in_check(side) {
                println!("{side} is in check");
            }
        }
        Some(Commands::Play { fen }) => {
            trace!("Starting console with fen: {fen:?}");
            console::run(&fen, BufReader::new(io::stdin()), &mut io::stdout().lock())?;
        }
        None => {
            info!("No command given, speaking UCI");
            uci::play(&config)?;
        }
    }
    Ok(())
}
