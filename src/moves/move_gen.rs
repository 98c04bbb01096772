//! Move Generation
//!
//! Pseudo-legal candidates are produced per piece kind, then narrowed to legal
//! moves by playing each one on a scratch copy of the position and rejecting
//! it when the mover's king is left attacked.

use tracing::trace;

use crate::{
    board::{
        Position,
        components::{BitBoard, Piece, PieceInfo, Side, Square},
    },
    moves::{move_buffer::MoveBuffer, move_info::Move},
    precomputed::move_tables::{
        AttackTables, bishop_attacks, pawn_attacks, queen_attacks, rook_attacks,
    },
};

/// Union of every square `side` attacks, against the current occupancy.
pub fn attacked_squares(pos: &Position, tables: &AttackTables, side: Side) -> BitBoard {
    let occupied = pos.occupied();
    let mut attacks = tables.king(pos.king_square(side));

    for sq in pos.pieces(side, Piece::Knight).iter_bits() {
        attacks |= tables.knight(sq);
    }
    for sq in pos.pieces(side, Piece::Bishop).iter_bits() {
        attacks |= bishop_attacks(sq, occupied);
    }
    for sq in pos.pieces(side, Piece::Rook).iter_bits() {
        attacks |= rook_attacks(sq, occupied);
    }
    for sq in pos.pieces(side, Piece::Queen).iter_bits() {
        attacks |= queen_attacks(sq, occupied);
    }
    attacks | pawn_attacks(pos.pieces(side, Piece::Pawn), side)
}

/// Legal moves for the side to move.
pub fn generate_legal_moves(pos: &Position, tables: &AttackTables) -> MoveBuffer {
    let side = pos.side_to_move();
    let mut moves = MoveBuffer::new();
    generate_pseudo_legal_moves(pos, tables, &mut moves);

    let mut scratch = pos.clone();
    moves.retain(|&m| {
        scratch.apply_move(m);
        let legal = !scratch.is_in_check(side);
        scratch.undo_move(m);
        if !legal {
            trace!("rejecting {m}, leaves the {side} king attacked");
        }
        legal
    });
    moves
}

/// Candidates obeying movement and occupancy rules, without the king safety check.
pub fn generate_pseudo_legal_moves(pos: &Position, tables: &AttackTables, moves: &mut MoveBuffer) {
    let enemy_attacks = attacked_squares(pos, tables, pos.side_to_move().flip());

    gen_king_moves(pos, tables, enemy_attacks, moves);
    gen_pawn_moves(pos, moves);
    gen_knight_moves(pos, tables, moves);
    gen_sliding_moves(pos, Piece::Bishop, moves);
    gen_sliding_moves(pos, Piece::Rook, moves);
    gen_sliding_moves(pos, Piece::Queen, moves);
}

/// Builds a move carrying the prior-state snapshot of `pos`.
#[inline(always)]
fn make_move(pos: &Position, from: Square, to: Square, promotion: Option<PieceInfo>) -> Move {
    Move::new(
        from,
        to,
        pos.piece_at(to),
        promotion,
        pos.castling_rights(),
        pos.en_passant_square(),
    )
    .with_halfmove_clock(pos.halfmove_clock())
}

fn push_targets(pos: &Position, from: Square, targets: BitBoard, moves: &mut MoveBuffer) {
    for to in targets.iter_bits() {
        moves.push(make_move(pos, from, to, None));
    }
}

fn gen_king_moves(
    pos: &Position,
    tables: &AttackTables,
    enemy_attacks: BitBoard,
    moves: &mut MoveBuffer,
) {
    let side = pos.side_to_move();
    let from = pos.king_square(side);
    let targets = tables.king(from) & !pos.side_bb(side) & !enemy_attacks;
    push_targets(pos, from, targets, moves);

    if enemy_attacks.contains(from) {
        return;
    }

    let occupied = pos.occupied();
    let rook = Some(PieceInfo::new(Piece::Rook, side));
    let (home, kingside_path, queenside_path) = match side {
        Side::White => (Square::E1, [Square::F1, Square::G1], [Square::D1, Square::C1]),
        Side::Black => (Square::E8, [Square::F8, Square::G8], [Square::D8, Square::C8]),
    };
    if from != home {
        return;
    }

    // Kingside
    let rook_home = kingside_path[1].step(1, 0);
    if pos.castling_rights().can_castle(side, true)
        && rook_home.is_some_and(|sq| pos.piece_at(sq) == rook)
        && kingside_path
            .iter()
            .all(|&sq| !occupied.contains(sq) && !enemy_attacks.contains(sq))
    {
        moves.push(make_move(pos, from, kingside_path[1], None));
    }

    // Queenside, the b file square only needs to be empty
    let knight_square = queenside_path[1].step(-1, 0);
    let rook_home = queenside_path[1].step(-2, 0);
    if pos.castling_rights().can_castle(side, false)
        && rook_home.is_some_and(|sq| pos.piece_at(sq) == rook)
        && knight_square.is_some_and(|sq| !occupied.contains(sq))
        && queenside_path
            .iter()
            .all(|&sq| !occupied.contains(sq) && !enemy_attacks.contains(sq))
    {
        moves.push(make_move(pos, from, queenside_path[1], None));
    }
}

fn gen_sliding_moves(pos: &Position, piece: Piece, moves: &mut MoveBuffer) {
    let side = pos.side_to_move();
    let occupied = pos.occupied();
    let friendly = pos.side_bb(side);

    for from in pos.pieces(side, piece).iter_bits() {
        let attacks = match piece {
            Piece::Bishop => bishop_attacks(from, occupied),
            Piece::Rook => rook_attacks(from, occupied),
            Piece::Queen => queen_attacks(from, occupied),
            _ => BitBoard::EMPTY,
        };
        push_targets(pos, from, attacks & !friendly, moves);
    }
}

fn gen_knight_moves(pos: &Position, tables: &AttackTables, moves: &mut MoveBuffer) {
    let side = pos.side_to_move();
    let friendly = pos.side_bb(side);

    for from in pos.pieces(side, Piece::Knight).iter_bits() {
        push_targets(pos, from, tables.knight(from) & !friendly, moves);
    }
}

fn gen_pawn_moves(pos: &Position, moves: &mut MoveBuffer) {
    let side = pos.side_to_move();
    let occupied = pos.occupied();
    let enemy = pos.side_bb(side.flip());
    let forward = side.forward();

    let mut capturable = enemy;
    let en_passant = pos.en_passant_square().filter(|&ep| !occupied.contains(ep));
    if let Some(ep) = en_passant {
        capturable.set(ep);
    }

    for from in pos.pieces(side, Piece::Pawn).iter_bits() {
        if let Some(one) = from.step(0, forward)
            && !occupied.contains(one)
        {
            add_pawn_move(pos, from, one, moves);

            if from.rank() == side.pawn_rank()
                && let Some(two) = one.step(0, forward)
                && !occupied.contains(two)
            {
                moves.push(make_move(pos, from, two, None));
            }
        }

        for file_delta in [-1, 1] {
            let Some(to) = from.step(file_delta, forward) else {
                continue;
            };
            if !capturable.contains(to) {
                continue;
            }
            if Some(to) == en_passant {
                add_en_passant(pos, from, to, moves);
            } else {
                add_pawn_move(pos, from, to, moves);
            }
        }
    }
}

/// Plain pawn move, expanded into the four promotions on the last rank.
fn add_pawn_move(pos: &Position, from: Square, to: Square, moves: &mut MoveBuffer) {
    let side = pos.side_to_move();
    if to.rank() != side.promotion_rank() {
        moves.push(make_move(pos, from, to, None));
        return;
    }
    for piece in Piece::PROMOTIONS {
        moves.push(make_move(pos, from, to, Some(PieceInfo::new(piece, side))));
    }
}

/// The victim sits one rank behind the target square and must be an enemy pawn.
fn add_en_passant(pos: &Position, from: Square, to: Square, moves: &mut MoveBuffer) {
    let side = pos.side_to_move();
    let victim = to.step(0, -side.forward()).and_then(|sq| pos.piece_at(sq));
    if victim != Some(PieceInfo::new(Piece::Pawn, side.flip())) {
        trace!("no enemy pawn behind en passant target {to}");
        return;
    }
    let m = Move::new(
        from,
        to,
        victim,
        None,
        pos.castling_rights(),
        pos.en_passant_square(),
    )
    .with_halfmove_clock(pos.halfmove_clock());
    moves.push(m);
}

