use std::{cell::OnceCell, fmt::Display};

use tracing::{error, trace};

use crate::{
    consts::{NUM_SQUARES, START_FEN},
    errors::IllegalMoveError,
    moves::{move_buffer::MoveBuffer, move_gen, move_info::Move},
    precomputed::move_tables::ATTACK_TABLES,
};

use components::{BitBoard, CastlingRights, Piece, PieceInfo, Side, Square};

pub mod components;
pub mod fen;


/// Full board state: mailbox plus occupancy sets kept in lockstep by [`Position::set_square`].
pub struct Position {
    /// Mailbox for fast-lookup. Maps square to piece info
    board: [Option<PieceInfo>; NUM_SQUARES],
    /// Boards for all pieces of white and black sides
    all_sides: [BitBoard; 2],
    /// Boards for all pieces of one kind, both colours
    /// [Pawn, Knight, Bishop, Rook, Queen, King]
    all_pieces: [BitBoard; 6],
    king_squares: [Square; 2],
    stm: Side,
    castling_rights: CastlingRights,
    enpassant_square: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    legal_moves: OnceCell<MoveBuffer>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Position {
    /// Copies the board state. The legal move cache is not carried over.
    fn clone(&self) -> Self {
        Self {
            board: self.board,
            all_sides: self.all_sides,
            all_pieces: self.all_pieces,
            king_squares: self.king_squares,
            stm: self.stm,
            castling_rights: self.castling_rights,
            enpassant_square: self.enpassant_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            legal_moves: OnceCell::new(),
        }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.all_sides == other.all_sides
            && self.all_pieces == other.all_pieces
            && self.king_squares == other.king_squares
            && self.stm == other.stm
            && self.castling_rights == other.castling_rights
            && self.enpassant_square == other.enpassant_square
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
    }
}

impl Eq for Position {}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Position").field(&self.to_fen()).finish()
    }
}

impl Position {
    /// Standard starting position
    pub fn new() -> Self {
        Self::from_fen(START_FEN).expect("START_FEN is a valid FEN record")
    }

    /// Board with no pieces, white to move. Only a starting point for the FEN decoder.
    pub(crate) fn empty() -> Self {
        Self {
            board: [None; NUM_SQUARES],
            all_sides: [BitBoard::EMPTY; 2],
            all_pieces: [BitBoard::EMPTY; 6],
            king_squares: [Square::E1, Square::E8],
            stm: Side::White,
            castling_rights: CastlingRights::NONE,
            enpassant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            legal_moves: OnceCell::new(),
        }
    }

    /// The only writer of `board`. Keeps occupancy sets and king squares in step with it.
    pub(crate) fn set_square(&mut self, square: Square, value: Option<PieceInfo>) {
        self.board[square.index()] = value;
        for side_bb in &mut self.all_sides {
            side_bb.clear(square);
        }
        for piece_bb in &mut self.all_pieces {
            piece_bb.clear(square);
        }

        if let Some(info) = value {
            self.all_sides[info.side.index()].set(square);
            self.all_pieces[info.piece.index()].set(square);
            if info.piece == Piece::King {
                self.king_squares[info.side.index()] = square;
            }
        }
    }

    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<PieceInfo> {
        self.board[square.index()]
    }

    #[inline(always)]
    pub const fn mailbox(&self) -> &[Option<PieceInfo>; NUM_SQUARES] {
        &self.board
    }

    #[inline(always)]
    pub const fn side_bb(&self, side: Side) -> BitBoard {
        self.all_sides[side.index()]
    }

    #[inline(always)]
    pub const fn piece_bb(&self, piece: Piece) -> BitBoard {
        self.all_pieces[piece.index()]
    }

    /// Pieces of one kind belonging to one side
    #[inline(always)]
    pub const fn pieces(&self, side: Side, piece: Piece) -> BitBoard {
        self.all_sides[side.index()].and(self.all_pieces[piece.index()])
    }

    #[inline(always)]
    pub const fn occupied(&self) -> BitBoard {
        self.all_sides[0].or(self.all_sides[1])
    }

    #[inline(always)]
    pub const fn king_square(&self, side: Side) -> Square {
        self.king_squares[side.index()]
    }

    #[inline(always)]
    pub const fn side_to_move(&self) -> Side {
        self.stm
    }

    #[inline(always)]
    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline(always)]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.enpassant_square
    }

    #[inline(always)]
    pub const fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline(always)]
    pub const fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Every square `side` attacks.
    pub fn attacked_by(&self, side: Side) -> BitBoard {
        move_gen::attacked_squares(self, &ATTACK_TABLES, side)
    }

    pub fn is_in_check(&self, side: Side) -> bool {
        self.attacked_by(side.flip()).contains(self.king_square(side))
    }

    /// Legal moves for the side to move, computed on first use after each mutation.
    pub fn legal_moves(&self) -> &MoveBuffer {
        self.legal_moves
            .get_or_init(|| move_gen::generate_legal_moves(self, &ATTACK_TABLES))
    }

    /// Validates a requested move and resolves it to the matching legal move.
    pub fn move_from_parts(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceInfo>,
    ) -> Result<Move, IllegalMoveError> {
        let mover = self
            .piece_at(from)
            .ok_or(IllegalMoveError::NoPieceOnOrigin(from))?;
        if mover.side != self.stm {
            return Err(IllegalMoveError::WrongColourToMove {
                square: from,
                owner: mover.side,
                to_move: self.stm,
            });
        }
        if self.piece_at(to).is_some_and(|info| info.side == self.stm) {
            return Err(IllegalMoveError::FriendlyDestination(to));
        }
        if let Some(promo) = promotion
            && promo.side != self.stm
        {
            return Err(IllegalMoveError::PromotionWrongColour(promo.side));
        }

        self.legal_moves()
            .iter()
            .copied()
            .find(|m| m.from_sq() == from && m.to_sq() == to && m.promotion() == promotion)
            .ok_or_else(|| {
                let name = match promotion {
                    Some(promo) => format!("{from}{to}{}", promo.to_char().to_ascii_lowercase()),
                    None => format!("{from}{to}"),
                };
                IllegalMoveError::NotLegal(name)
            })
    }

    /// Plays `m`. The move must come from this position's move generator.
    pub fn apply_move(&mut self, m: Move) {
        let from = m.from_sq();
        let to = m.to_sq();
        let Some(mover) = self.piece_at(from) else {
            error!("apply_move: no piece on {from} for move {m}");
            debug_assert!(false, "apply_move called with an empty origin square");
            return;
        };
        trace!("apply {m} ({mover})");

        let side = mover.side;
        let prior_ep = self.enpassant_square.take();
        let mut captured = self.piece_at(to);

        match mover.piece {
            Piece::King => {
                self.castling_rights
                    .remove_right(CastlingRights::both(side));
                if let Some((rook_from, rook_to)) = castling_rook_squares(side, from, to) {
                    self.set_square(rook_from, None);
                    self.set_square(rook_to, Some(PieceInfo::new(Piece::Rook, side)));
                }
            }
            Piece::Rook => {
                let right = CastlingRights::tied_to_rook_square(from);
                if self.castling_rights.allows(right) && rook_home_side(from) == Some(side) {
                    self.castling_rights.remove_right(right);
                }
            }
            Piece::Pawn => {
                if from.rank().abs_diff(to.rank()) == 2 {
                    self.enpassant_square = from.step(0, side.forward());
                } else if Some(to) == prior_ep && from.file() != to.file() {
                    if let Some(victim) = to.step(0, -side.forward()) {
                        captured = self.piece_at(victim);
                        self.set_square(victim, None);
                    }
                }
            }
            _ => {}
        }

        // A rook taken on its home square takes the opponent's right with it
        if captured.is_some_and(|info| info.piece == Piece::Rook)
            && rook_home_side(to) == Some(side.flip())
        {
            self.castling_rights
                .remove_right(CastlingRights::tied_to_rook_square(to));
        }

        self.set_square(from, None);
        self.set_square(to, Some(m.promotion().unwrap_or(mover)));

        if mover.piece == Piece::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if side == Side::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.stm = side.flip();
        self.legal_moves.take();
    }

    /// Reverts `m`, which must be the last move applied to this position.
    pub fn undo_move(&mut self, m: Move) {
        let from = m.from_sq();
        let to = m.to_sq();
        let side = self.stm.flip();
        let Some(landed) = self.piece_at(to) else {
            error!("undo_move: no piece on {to} for move {m}");
            debug_assert!(false, "undo_move called with an empty destination square");
            return;
        };
        trace!("undo {m} ({landed})");

        let mover = if m.promotion().is_some() {
            PieceInfo::new(Piece::Pawn, side)
        } else {
            landed
        };

        let is_en_passant = mover.piece == Piece::Pawn
            && m.prior_en_passant() == Some(to)
            && from.file() != to.file();

        self.set_square(from, Some(mover));
        if is_en_passant {
            self.set_square(to, None);
            if let Some(victim) = to.step(0, -side.forward()) {
                self.set_square(victim, m.captured());
            }
        } else {
            self.set_square(to, m.captured());
        }

        if mover.piece == Piece::King
            && let Some((rook_from, rook_to)) = castling_rook_squares(side, from, to)
        {
            self.set_square(rook_to, None);
            self.set_square(rook_from, Some(PieceInfo::new(Piece::Rook, side)));
        }

        self.castling_rights = m.prior_castling();
        self.enpassant_square = m.prior_en_passant();
        self.halfmove_clock = m.prior_halfmove_clock();
        if side == Side::Black {
            self.fullmove_number = self.fullmove_number.saturating_sub(1).max(1);
        }
        self.stm = side;
        self.legal_moves.take();
    }
}

/// Rook relocation (home, destination) when the king move is a castling move.
pub(crate) fn castling_rook_squares(side: Side, from: Square, to: Square) -> Option<(Square, Square)> {
    match (side, from, to) {
        (Side::White, Square::E1, Square::G1) => Some((Square::H1, Square::F1)),
        (Side::White, Square::E1, Square::C1) => Some((Square::A1, Square::D1)),
        (Side::Black, Square::E8, Square::G8) => Some((Square::H8, Square::F8)),
        (Side::Black, Square::E8, Square::C8) => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

/// Which side's rook starts on `square`, if it is a rook home square.
fn rook_home_side(square: Square) -> Option<Side> {
    match square {
        Square::A1 | Square::H1 => Some(Side::White),
        Square::A8 | Square::H8 => Some(Side::Black),
        _ => None,
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let square = Square::from_index(rank * 8 + file);
                match self.piece_at(square) {
                    Some(info) => write!(f, "{} ", info.piece.icon(info.side))?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        writeln!(f)?;
        writeln!(f, "FEN: {}", self.to_fen())?;
        write!(f, "{} to move", self.stm)
    }
}
