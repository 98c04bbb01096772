//! Search worker
//!
//! The worker is an actor: it owns a thread, receives jobs over its own
//! mailbox and reports results through a callback. Cancellation goes through
//! a shared flag that the search polls between root moves.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender},
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use miette::{Context, IntoDiagnostic, miette};
use tracing::{debug, info, info_span, warn};

use crate::{board::Position, moves::move_info::Move};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: u8,
    /// Keep the result until told to stop
    pub infinite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Id of the job this result answers
    pub id: u64,
    pub best_move: Option<Move>,
    pub depth: u8,
    pub nodes_searched: u64,
    pub time_taken: Duration,
}

#[derive(Debug)]
pub enum Job {
    Search {
        id: u64,
        position: Position,
        limits: SearchLimits,
    },
    Quit,
}

pub type Reporter = Box<dyn Fn(SearchResult) + Send>;

#[derive(Debug)]
pub struct SearchWorker {
    jobs: Sender<Job>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SearchWorker {
    /// Starts the worker thread. Every finished job is passed to `report`.
    pub fn spawn(report: Reporter) -> miette::Result<Self> {
        let (jobs, mailbox) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = stop.clone();

        let handle = thread::Builder::new()
            .name("search-worker".into())
            .spawn(move || worker_loop(mailbox, worker_stop, report))
            .into_diagnostic()
            .context("Spawning search worker")?;

        Ok(Self {
            jobs,
            stop,
            handle: Some(handle),
        })
    }

    /// Queues a search. Clears any earlier cancellation.
    pub fn search(&self, id: u64, position: Position, limits: SearchLimits) -> miette::Result<()> {
        self.stop.store(false, Ordering::Relaxed);
        self.jobs
            .send(Job::Search {
                id,
                position,
                limits,
            })
            .map_err(|_| miette!("Search worker has shut down"))
    }

    /// Asks the running search to finish with what it has.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Cancels, tells the worker to quit and waits for it.
    pub fn shutdown(&mut self) {
        self.stop();
        let _ = self.jobs.send(Job::Quit);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("Search worker panicked");
        }
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(mailbox: Receiver<Job>, stop: Arc<AtomicBool>, report: Reporter) {
    debug!("Search worker started");
    while let Ok(job) = mailbox.recv() {
        match job {
            Job::Search {
                id,
                position,
                limits,
            } => {
                let result = find_best_move(id, &position, limits, &stop);
                report(result);
            }
            Job::Quit => break,
        }
    }
    debug!("Search worker exiting");
}

/// Placeholder search: walks the root moves, counting each one's replies,
/// and settles on the first legal move. Polls `stop` between root moves.
pub fn find_best_move(
    id: u64,
    position: &Position,
    limits: SearchLimits,
    stop: &AtomicBool,
) -> SearchResult {
    let span = info_span!("search_root", id);
    let _guard = span.enter();
    let start = Instant::now();

    let root_moves = position.legal_moves();
    let best_move = root_moves.as_slice().first().copied();
    let mut nodes_searched = 0;

    if limits.depth > 1 {
        let mut scratch = position.clone();
        for &m in root_moves {
            if stop.load(Ordering::Relaxed) {
                debug!("Search stopped after {nodes_searched} nodes");
                break;
            }
            scratch.apply_move(m);
            nodes_searched += 1 + scratch.legal_moves().len() as u64;
            scratch.undo_move(m);
        }
    } else {
        nodes_searched = root_moves.len() as u64;
    }

    let result = SearchResult {
        id,
        best_move,
        depth: limits.depth,
        nodes_searched,
        time_taken: start.elapsed(),
    };
    info!(
        "bestmove {} after {} nodes in {:?}",
        result.best_move.map_or_else(|| "0000".to_string(), |m| m.uci()),
        result.nodes_searched,
        result.time_taken
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::START_FEN;

    const LIMITS: SearchLimits = SearchLimits {
        depth: 3,
        infinite: false,
    };

    #[test]
    fn test_stub_picks_a_legal_move() {
        let pos = Position::from_fen(START_FEN).unwrap();
        let stop = AtomicBool::new(false);
        let result = find_best_move(7, &pos, LIMITS, &stop);
        assert_eq!(result.id, 7);
        let best = result.best_move.unwrap();
        assert!(pos.legal_moves().contains(&best));
        // 20 root moves, 20 replies each
        assert_eq!(result.nodes_searched, 20 * 21);
    }

    #[test]
    fn test_stopped_search_still_answers() {
        let pos = Position::new();
        let stop = AtomicBool::new(true);
        let result = find_best_move(1, &pos, LIMITS, &stop);
        assert!(result.best_move.is_some());
        assert_eq!(result.nodes_searched, 0);
    }

    #[test]
    fn test_no_moves_when_mated() {
        let pos =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        let result = find_best_move(2, &pos, LIMITS, &AtomicBool::new(false));
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn test_worker_reports_through_callback() {
        let (tx, rx) = mpsc::channel();
        let mut worker = SearchWorker::spawn(Box::new(move |result| {
            let _ = tx.send(result);
        }))
        .unwrap();

        worker.search(1, Position::new(), LIMITS).unwrap();
        worker.search(2, Position::new(), LIMITS).unwrap();
        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        worker.shutdown();
        assert!(worker.search(3, Position::new(), LIMITS).is_err());
    }
}
