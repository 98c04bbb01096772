use std::{
    io::{BufRead, BufReader, Write},
    sync::mpsc::{self, Sender},
    thread,
};

use miette::{Context, IntoDiagnostic};
use tracing::{Level, debug, info, trace, warn};

use crate::{
    comms::uci_parser::{GoParams, UciCommand, parse_line},
    game::Game,
    search::{SearchLimits, SearchResult, SearchWorker},
    utils::{
        config::EngineConfig,
        log::{set_log_level, toggle_file_logging},
    },
};

/// Everything the dispatcher reacts to arrives through one mailbox.
#[derive(Debug)]
pub enum Event {
    Input(String),
    InputClosed,
    BestMove(SearchResult),
}

/// The search the dispatcher is waiting on.
#[derive(Debug)]
struct PendingSearch {
    id: u64,
    infinite: bool,
    /// Result already reported but held back until `stop`
    held: Option<SearchResult>,
}

#[derive(Debug)]
pub struct UciState {
    game: Game,
    default_depth: u8,
    next_id: u64,
    pending: Option<PendingSearch>,
}

impl UciState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            game: Game::new(),
            default_depth: config.search.default_depth,
            next_id: 0,
            pending: None,
        }
    }

    fn reset(&mut self) {
        trace!("Resetting UciState");
        self.game = Game::new();
    }
}

/// Runs the protocol on stdin/stdout until `quit` or end of input.
pub fn play(config: &EngineConfig) -> miette::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(BufReader::new(std::io::stdin()), &mut out, config)
}

/// Dispatcher loop. Lines from `input` and reports from the search worker are
/// handled one at a time, in arrival order.
pub fn run<R, W>(input: R, output: &mut W, config: &EngineConfig) -> miette::Result<()>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let (tx, mailbox) = mpsc::channel();
    spawn_reader(input, tx.clone())?;

    let reporter = tx.clone();
    let mut worker = SearchWorker::spawn(Box::new(move |result| {
        let _ = reporter.send(Event::BestMove(result));
    }))?;
    drop(tx);

    let mut state = UciState::new(config);

    while let Ok(event) = mailbox.recv() {
        match event {
            Event::Input(line) => {
                if !handle_command(&mut state, &worker, parse_line(&line), output)? {
                    break;
                }
            }
            Event::BestMove(result) => on_best_move(&mut state, result, output)?,
            Event::InputClosed => {
                info!("Input closed");
                break;
            }
        }
    }

    // Cancel, join, then flush whatever the worker reported on the way out
    worker.shutdown();
    if let Some(pending) = state.pending.as_mut() {
        pending.infinite = false;
    }
    let held = state.pending.as_mut().and_then(|p| p.held.take());
    if let Some(result) = held {
        on_best_move(&mut state, result, output)?;
    }
    for event in mailbox.try_iter() {
        if let Event::BestMove(result) = event {
            on_best_move(&mut state, result, output)?;
        }
    }
    Ok(())
}

fn spawn_reader<R>(input: R, tx: Sender<Event>) -> miette::Result<()>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("uci-reader".into())
        .spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(Event::Input(line)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read input: {e}");
                        break;
                    }
                }
            }
            let _ = tx.send(Event::InputClosed);
        })
        .into_diagnostic()
        .context("Spawning input reader")?;
    Ok(())
}

/// Returns `false` once the dispatcher should quit.
fn handle_command<W: Write>(
    state: &mut UciState,
    worker: &SearchWorker,
    command: UciCommand,
    out: &mut W,
) -> miette::Result<bool> {
    match command {
        UciCommand::Uci => cmd_uci(out)?,
        UciCommand::IsReady => send(out, "readyok")?,
        UciCommand::UciNewGame => {
            cmd_stop(state, worker, out)?;
            state.reset();
        }
        UciCommand::Position {
            startpos,
            fen,
            moves,
        } => {
            if let Err(e) = cmd_position(state, startpos, fen, &moves) {
                warn!("Error processing position command: {e:?}");
                send(out, &format!("info string {e}"))?;
            }
        }
        UciCommand::Go(params) => cmd_go(state, worker, params, out)?,
        UciCommand::Stop => cmd_stop(state, worker, out)?,
        UciCommand::Debug(on) => {
            let level = if on { Level::DEBUG } else { Level::INFO };
            if let Err(e) = set_log_level(level) {
                send(out, &format!("info string {e}"))?;
            }
        }
        UciCommand::SetOption { name, value } => {
            if let Err(e) = cmd_setoption(&name, &value) {
                warn!("Error setting option: {e:?}");
                send(out, &format!("info string {e}"))?;
            }
        }
        UciCommand::Quit => return Ok(false),
        UciCommand::Unknown(cmd) => {
            if !cmd.trim().is_empty() {
                info!("Received unknown command: {cmd}");
                send(out, &format!("info string unknown command: {cmd}"))?;
            }
        }
    }
    Ok(true)
}

fn cmd_position(
    state: &mut UciState,
    startpos: bool,
    fen: Option<String>,
    moves: &[String],
) -> miette::Result<()> {
    let mut game = if startpos {
        Game::new()
    } else if let Some(fen_str) = fen {
        Game::from_fen(&fen_str)?
    } else {
        return Err(miette::miette!("position needs startpos or fen"));
    };

    for move_uci in moves {
        game.apply_move(move_uci)
            .with_context(|| format!("Applying move {move_uci}"))?;
    }

    state.game = game;
    Ok(())
}

fn cmd_go<W: Write>(
    state: &mut UciState,
    worker: &SearchWorker,
    params: GoParams,
    out: &mut W,
) -> miette::Result<()> {
    if state.pending.is_some() {
        return send(out, "info string search already running");
    }

    let id = state.next_id;
    state.next_id += 1;
    let limits = SearchLimits {
        depth: params.depth.unwrap_or(state.default_depth),
        infinite: params.infinite,
    };
    debug!("Starting search {id} with {limits:?}");
    worker.search(id, state.game.position().clone(), limits)?;
    state.pending = Some(PendingSearch {
        id,
        infinite: params.infinite,
        held: None,
    });
    Ok(())
}

fn cmd_stop<W: Write>(
    state: &mut UciState,
    worker: &SearchWorker,
    out: &mut W,
) -> miette::Result<()> {
    worker.stop();
    let Some(pending) = state.pending.as_mut() else {
        return Ok(());
    };
    pending.infinite = false;
    if let Some(result) = pending.held.take() {
        on_best_move(state, result, out)?;
    }
    Ok(())
}

fn on_best_move<W: Write>(
    state: &mut UciState,
    result: SearchResult,
    out: &mut W,
) -> miette::Result<()> {
    let Some(pending) = state.pending.as_mut() else {
        debug!("Dropping result of search {}, nothing pending", result.id);
        return Ok(());
    };
    if pending.id != result.id {
        debug!("Dropping stale result of search {}", result.id);
        return Ok(());
    }
    if pending.infinite {
        pending.held = Some(result);
        return Ok(());
    }

    state.pending = None;
    let best = result
        .best_move
        .map_or_else(|| "0000".to_string(), |m| m.uci());
    send(out, &format!("bestmove {best}"))
}

fn cmd_setoption(name: &str, value: &str) -> miette::Result<()> {
    match name {
        "LogFile" => {
            let enable = value.eq_ignore_ascii_case("true");
            toggle_file_logging(enable)?;
            info!("Set file logging to {enable}");
        }
        _ => {
            info!("Unknown option: {name} = {value}");
        }
    }
    Ok(())
}

fn cmd_uci<W: Write>(out: &mut W) -> miette::Result<()> {
    send(
        out,
        &format!("id name {} {}", env!("CARGO_PKG_NAME"), env!("APP_VERSION")),
    )?;
    send(out, &format!("id author {}", env!("CARGO_PKG_AUTHORS")))?;
    send(out, "option name LogFile type check default false")?;
    send(out, "uciok")
}

fn send<W: Write>(out: &mut W, line: &str) -> miette::Result<()> {
    debug!("UCI -> {line}");
    writeln!(out, "{line}").into_diagnostic()?;
    out.flush().into_diagnostic()
}
