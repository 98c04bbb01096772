use std::io::{BufRead, Write};

use miette::IntoDiagnostic;
use tracing::{debug, warn};

use crate::{
    game::Game,
    utils::{
        cli::{GameSubcommand, parse_game_command},
        clear_screen,
        perft::{format_divide, perft, perft_divide},
    },
};

const DEFAULT_PERFT_DEPTH: u8 = 5;

/// Interactive session on `fen`: reads one command per line until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(fen: &str, input: R, out: &mut W) -> miette::Result<()> {
    let mut game = Game::from_fen(fen)?;
    writeln!(out, "{}", game.position()).into_diagnostic()?;

    for line in input.lines() {
        let line = line.into_diagnostic()?;
        if line.trim().is_empty() {
            continue;
        }
        let cmd = match parse_game_command(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                writeln!(out, "{e}").into_diagnostic()?;
                continue;
            }
        };
        debug!("console command: {cmd:?}");
        if !execute(&mut game, fen, cmd, out)? {
            break;
        }
    }
    Ok(())
}

/// Returns `false` once the session should end.
fn execute<W: Write>(
    game: &mut Game,
    start_fen: &str,
    cmd: GameSubcommand,
    out: &mut W,
) -> miette::Result<bool> {
    match cmd {
        GameSubcommand::Move { uci } => match game.apply_move(&uci) {
            Ok(_) => {
                writeln!(out, "{}", game.position()).into_diagnostic()?;
                let side = game.position().side_to_move();
                if game.legal_moves().is_empty() {
                    let verdict = if game.is_in_check(side) {
                        "Checkmate"
                    } else {
                        "Stalemate"
                    };
                    writeln!(out, "{verdict}").into_diagnostic()?;
                } else if game.is_in_check(side) {
                    writeln!(out, "{side} is in check").into_diagnostic()?;
                }
            }
            Err(e) => {
                warn!("Rejected move {uci}: {e}");
                writeln!(out, "{e}").into_diagnostic()?;
            }
        },
        GameSubcommand::Print => writeln!(out, "{}", game.position()).into_diagnostic()?,
        GameSubcommand::Undo => match game.undo() {
            Some(m) => writeln!(out, "Took back {m}").into_diagnostic()?,
            None => writeln!(out, "Nothing to undo").into_diagnostic()?,
        },
        GameSubcommand::Fen { set: None } => {
            writeln!(out, "{}", game.position().to_fen()).into_diagnostic()?
        }
        GameSubcommand::Fen { set: Some(fen) } => match game.load_fen(&fen) {
            Ok(()) => writeln!(out, "{}", game.position()).into_diagnostic()?,
            Err(e) => writeln!(out, "{e}").into_diagnostic()?,
        },
        GameSubcommand::Moves => {
            writeln!(out, "{}", game.legal_moves().join(" ")).into_diagnostic()?
        }
        GameSubcommand::Perft { depth, divide } => {
            let depth = depth.unwrap_or(DEFAULT_PERFT_DEPTH);
            if divide {
                let result = perft_divide(game.position(), depth);
                writeln!(out, "{}", format_divide(&result)).into_diagnostic()?;
            } else {
                let mut pos = game.position().clone();
                writeln!(out, "Nodes searched: {}", perft(&mut pos, depth)).into_diagnostic()?;
            }
        }
        GameSubcommand::Clear => clear_screen()?,
        GameSubcommand::Restart => {
            *game = Game::from_fen(start_fen)?;
            writeln!(out, "{}", game.position()).into_diagnostic()?;
        }
        GameSubcommand::Quit => return Ok(false),
    }
    Ok(true)
}
