use std::{
    io::Write,
    time::{Duration, Instant},
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use miette::IntoDiagnostic;
use tracing::{debug, info};

use crate::{
    board::Position,
    moves::{move_gen::generate_legal_moves, move_info::Move},
    precomputed::move_tables::ATTACK_TABLES,
};

#[derive(Debug)]
pub struct PerftResult {
    /// Total nodes counted
    pub nodes: u64,
    /// Time taken
    pub duration: Duration,
    /// Nodes per second
    pub nps: u64,
    /// Node count below each root move, in generation order
    pub move_counts: Vec<(Move, u64)>,
}

impl PerftResult {
    pub fn new(nodes: u64, duration: Duration, move_counts: Vec<(Move, u64)>) -> Self {
        let nanos = duration.as_nanos();
        let nps = if nanos > 0 {
            (nodes as u128 * 1_000_000_000 / nanos) as u64
        } else {
            0
        };

        Self {
            nodes,
            duration,
            nps,
            move_counts,
        }
    }
}

/// Counts leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(pos: &mut Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let legal_moves = generate_legal_moves(pos, &ATTACK_TABLES);
    if depth == 1 {
        return legal_moves.len() as u64;
    }

    let mut nodes = 0;
    for m in legal_moves {
        pos.apply_move(m);
        nodes += perft(pos, depth - 1);
        pos.undo_move(m);
    }
    nodes
}

/// Perft with a per root move breakdown.
pub fn perft_divide(pos: &Position, depth: u8) -> PerftResult {
    let start = Instant::now();
    let legal_moves: Vec<Move> = generate_legal_moves(pos, &ATTACK_TABLES).into_iter().collect();
    debug!("perft divide at depth {depth} over {} root moves", legal_moves.len());

    #[cfg(feature = "parallel")]
    let move_counts: Vec<(Move, u64)> = legal_moves
        .par_iter()
        .map_with(pos.clone(), |child, &m| count_below(child, m, depth))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let move_counts: Vec<(Move, u64)> = {
        let mut child = pos.clone();
        legal_moves
            .iter()
            .map(|&m| count_below(&mut child, m, depth))
            .collect()
    };

    let nodes = if depth == 0 {
        1
    } else {
        move_counts.iter().map(|(_, count)| count).sum()
    };

    let result = PerftResult::new(nodes, start.elapsed(), move_counts);
    info!(
        "perft({depth}) = {} in {} ms ({} nps)",
        result.nodes,
        result.duration.as_millis(),
        result.nps
    );
    result
}

fn count_below(child: &mut Position, m: Move, depth: u8) -> (Move, u64) {
    child.apply_move(m);
    let nodes = perft(child, depth.saturating_sub(1));
    child.undo_move(m);
    (m, nodes)
}

/// Divide output, one `move: count` line per root move followed by the totals.
pub fn format_divide(result: &PerftResult) -> String {
    let mut out = String::new();
    for (m, count) in &result.move_counts {
        out.push_str(&format!("{m}: {count}\n"));
    }
    out.push_str(&format!("\nNodes searched: {}\n", result.nodes));
    out.push_str(&format!(
        "Time: {} ms ({} nps)",
        result.duration.as_millis(),
        result.nps
    ));
    out
}

/// Plain perft at every depth from 1 to `max_depth`, one line per depth.
pub fn run_perft_suite<W: Write>(pos: &Position, max_depth: u8, out: &mut W) -> miette::Result<()> {
    writeln!(out, "Running Perft suite up to depth {max_depth}").into_diagnostic()?;
    writeln!(out, "----------------------------").into_diagnostic()?;

    let mut scratch = pos.clone();
    for depth in 1..=max_depth {
        let start = Instant::now();
        let nodes = perft(&mut scratch, depth);
        let result = PerftResult::new(nodes, start.elapsed(), Vec::new());
        writeln!(
            out,
            "Depth {depth}: {} nodes in {} ms ({} nps)",
            result.nodes,
            result.duration.as_millis(),
            result.nps
        )
        .into_diagnostic()?;
    }

    writeln!(out, "----------------------------").into_diagnostic()
}
