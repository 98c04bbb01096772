use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing::Level;

use crate::consts::START_FEN;

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), version = env!("APP_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Console log level, overrides the config file
    #[arg(short, long, global = true)]
    pub log_level: Option<Level>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run headless, speaking UCI on stdin/stdout
    Headless,

    /// Run perft on given FEN and depth, or use default fen
    Perft {
        /// FEN string for starting position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        /// perft depth
        #[arg(short, long, default_value = "5")]
        depth: u8,
        /// print node counts per root move
        #[arg(long, default_value = "false")]
        divide: bool,
    },

    /// List the legal moves of a position and whether the side to move is in check
    Moves {
        /// FEN string for the position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
    },

    /// Interactive console on given FEN, or use default fen
    Play {
        /// FEN string for starting position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "game_cmd", no_binary_name = true)]
pub struct GameCommand {
    #[command(subcommand)]
    pub cmd: GameSubcommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum GameSubcommand {
    /// Make a move on the board, e.g. e2e4 or e7e8q
    #[clap(visible_alias = "m")]
    Move { uci: String },

    /// Print the current board state
    #[clap(visible_alias = "p")]
    Print,

    /// Undo the last move
    #[clap(visible_alias = "u")]
    Undo,

    /// Show the current fen of the board, or set a new one
    #[clap(visible_alias = "f")]
    Fen { set: Option<String> },

    /// List legal moves
    #[clap(visible_alias = "l")]
    Moves,

    /// Run a perft test with given depth [default: 5]
    #[clap(visible_alias = "pe")]
    Perft {
        depth: Option<u8>,
        #[arg(short, default_value = "false")]
        divide: bool,
    },

    /// Clear screen
    #[clap(visible_alias = "c")]
    Clear,

    /// Restart game with same fen
    #[clap(visible_alias = "r")]
    Restart,

    /// Quit game
    #[clap(visible_alias = "q")]
    Quit,
}

/// Splits a console line shell style and parses it as a [`GameCommand`].
/// Help and usage errors come back as the rendered clap message.
pub fn parse_game_command(line: &str) -> miette::Result<GameSubcommand> {
    let words = shell_words::split(line).into_diagnostic()?;
    let command = GameCommand::try_parse_from(words).map_err(|e| miette::miette!("{e}"))?;
    Ok(command.cmd)
}
