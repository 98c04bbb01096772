use std::fmt::Write;

use tracing::debug;

use crate::errors::FenError;

use super::{
    Position,
    components::{CastlingRights, Piece, PieceInfo, Side, Square},
};

impl Position {
    /// Builds a position from the six whitespace separated FEN fields.
    /// The full move number may be omitted, in which case it defaults to 1.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut parts = fen.split_whitespace();
        let mut pos = Position::empty();

        let placement = parts.next().ok_or(FenError::MissingField("piece placement"))?;
        pos.place_pieces(placement)?;

        let stm = parts.next().ok_or(FenError::MissingField("active colour"))?;
        pos.stm = parse_stm(stm)?;

        let castle = parts.next().ok_or(FenError::MissingField("castling rights"))?;
        pos.castling_rights = parse_castle(castle)?;

        let enpassant = parts.next().ok_or(FenError::MissingField("en passant"))?;
        pos.enpassant_square = parse_enpassant(enpassant, pos.stm)?;

        let half_move = parts.next().ok_or(FenError::MissingField("half move clock"))?;
        pos.halfmove_clock = half_move
            .parse::<u16>()
            .map_err(|_| FenError::InvalidHalfMoveClock(half_move.to_string()))?;

        if let Some(full_move) = parts.next() {
            pos.fullmove_number = full_move
                .parse::<u16>()
                .map_err(|_| FenError::InvalidFullMoveNumber(full_move.to_string()))?;
        }
        if let Some(extra) = parts.next() {
            return Err(FenError::TrailingField(extra.to_string()));
        }

        for side in Side::SIDES {
            let count = pos.pieces(side, Piece::King).count();
            if count != 1 {
                return Err(FenError::InvalidKingCount { side, count });
            }
        }

        debug!("loaded FEN {fen}");
        Ok(pos)
    }

    /// Reads ranks 8 down to 1, files a to h.
    fn place_pieces(&mut self, placement: &str) -> Result<(), FenError> {
        let mut rank = 7usize;
        let mut file = 0usize;

        for c in placement.chars() {
            match c {
                '/' => {
                    if file != 8 || rank == 0 {
                        return Err(FenError::MalformedBoardRow { rank, file });
                    }
                    rank -= 1;
                    file = 0;
                }
                '1'..='8' => {
                    file += c as usize - '0' as usize;
                    if file > 8 {
                        return Err(FenError::MalformedBoardRow { rank, file });
                    }
                }
                _ => {
                    let info = PieceInfo::from_char(c).ok_or(FenError::UnknownPieceLetter(c))?;
                    let square = Square::from_coords(file, rank)
                        .ok_or(FenError::MalformedBoardRow { rank, file })?;
                    self.set_square(square, Some(info));
                    file += 1;
                }
            }
        }

        if rank != 0 || file != 8 {
            return Err(FenError::MalformedBoardRow { rank, file });
        }
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(Square::from_index(rank * 8 + file)) {
                    Some(info) => {
                        if empty > 0 {
                            let _ = write!(fen, "{empty}");
                            empty = 0;
                        }
                        fen.push(info.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                let _ = write!(fen, "{empty}");
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        let stm = match self.stm {
            Side::White => 'w',
            Side::Black => 'b',
        };
        let enpassant = self
            .enpassant_square
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        let _ = write!(
            fen,
            " {stm} {} {enpassant} {} {}",
            self.castling_rights, self.halfmove_clock, self.fullmove_number
        );
        fen
    }
}

fn parse_stm(stm: &str) -> Result<Side, FenError> {
    match stm {
        "w" => Ok(Side::White),
        "b" => Ok(Side::Black),
        _ => Err(FenError::InvalidActiveColour(stm.to_string())),
    }
}

fn parse_castle(castle: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::NONE;
    if castle == "-" {
        return Ok(rights);
    }
    for c in castle.chars() {
        let right = match c {
            'K' => CastlingRights::WHITE_00,
            'Q' => CastlingRights::WHITE_000,
            'k' => CastlingRights::BLACK_00,
            'q' => CastlingRights::BLACK_000,
            _ => return Err(FenError::InvalidCastlingLetter(c)),
        };
        rights.add_right(right);
    }
    Ok(rights)
}

/// The target sits behind a pawn that just double pushed, so its rank follows the side to move.
fn parse_enpassant(enpassant: &str, stm: Side) -> Result<Option<Square>, FenError> {
    if enpassant == "-" {
        return Ok(None);
    }
    let square = enpassant
        .parse::<Square>()
        .map_err(FenError::InvalidEnPassant)?;
    let target_rank = match stm {
        Side::White => 5,
        Side::Black => 2,
    };
    if square.rank() != target_rank {
        return Err(FenError::EnPassantWrongRank {
            square,
            to_move: stm,
        });
    }
    Ok(Some(square))
}
