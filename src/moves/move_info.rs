use std::{fmt::Display, str::FromStr};

use crate::{
    board::components::{CastlingRights, Piece, PieceInfo, Square},
    errors::MoveParseError,
};

/// One ply packed into a [`u64`], carrying everything needed to undo it:
/// ```text
/// bits  0..6   from square
/// bits  6..12  to square
/// bits 12..16  captured piece   (12 = none)
/// bits 16..20  promotion piece  (12 = none)
/// bits 20..24  castling rights before the move
/// bits 24..31  en passant square before the move (64 = none)
/// bits 31..47  half move clock before the move
/// ```
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Move(pub u64);

impl Move {
    const SQUARE_MASK: u64 = 0x3f;
    const PIECE_MASK: u64 = 0xf;
    const CASTLING_MASK: u64 = 0xf;
    const EP_MASK: u64 = 0x7f;
    const CLOCK_MASK: u64 = 0xffff;

    const TO_SHIFT: u32 = 6;
    const CAPTURED_SHIFT: u32 = 12;
    const PROMOTION_SHIFT: u32 = 16;
    const CASTLING_SHIFT: u32 = 20;
    const EP_SHIFT: u32 = 24;
    const CLOCK_SHIFT: u32 = 31;

    const NO_PIECE: u64 = 12;
    const NO_SQUARE: u64 = 64;

    pub const fn new(
        from: Square,
        to: Square,
        captured: Option<PieceInfo>,
        promotion: Option<PieceInfo>,
        castling: CastlingRights,
        en_passant: Option<Square>,
    ) -> Self {
        let captured = match captured {
            Some(info) => info.code(),
            None => Self::NO_PIECE,
        };
        let promotion = match promotion {
            Some(info) => info.code(),
            None => Self::NO_PIECE,
        };
        let en_passant = match en_passant {
            Some(sq) => sq.index() as u64,
            None => Self::NO_SQUARE,
        };
        Self(
            from.index() as u64
                | (to.index() as u64) << Self::TO_SHIFT
                | captured << Self::CAPTURED_SHIFT
                | promotion << Self::PROMOTION_SHIFT
                | (castling.bits() as u64) << Self::CASTLING_SHIFT
                | en_passant << Self::EP_SHIFT,
        )
    }

    pub const fn with_halfmove_clock(self, clock: u16) -> Self {
        Self(
            (self.0 & !(Self::CLOCK_MASK << Self::CLOCK_SHIFT))
                | (clock as u64) << Self::CLOCK_SHIFT,
        )
    }

    #[inline(always)]
    pub const fn from_sq(&self) -> Square {
        Square::from_index((self.0 & Self::SQUARE_MASK) as usize)
    }

    #[inline(always)]
    pub const fn to_sq(&self) -> Square {
        Square::from_index(((self.0 >> Self::TO_SHIFT) & Self::SQUARE_MASK) as usize)
    }

    #[inline(always)]
    pub const fn captured(&self) -> Option<PieceInfo> {
        PieceInfo::from_code((self.0 >> Self::CAPTURED_SHIFT) & Self::PIECE_MASK)
    }

    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceInfo> {
        PieceInfo::from_code((self.0 >> Self::PROMOTION_SHIFT) & Self::PIECE_MASK)
    }

    #[inline(always)]
    pub const fn prior_castling(&self) -> CastlingRights {
        CastlingRights::from_bits(((self.0 >> Self::CASTLING_SHIFT) & Self::CASTLING_MASK) as u8)
    }

    #[inline(always)]
    pub const fn prior_en_passant(&self) -> Option<Square> {
        Square::new(((self.0 >> Self::EP_SHIFT) & Self::EP_MASK) as usize)
    }

    #[inline(always)]
    pub const fn prior_halfmove_clock(&self) -> u16 {
        ((self.0 >> Self::CLOCK_SHIFT) & Self::CLOCK_MASK) as u16
    }

    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.captured().is_some()
    }

    /// Coordinate notation, e.g. `e2e4` or `e7e8q`.
    pub fn uci(&self) -> String {
        self.intent().to_string()
    }

    pub fn intent(&self) -> MoveIntent {
        MoveIntent {
            from: self.from_sq(),
            to: self.to_sq(),
            promotion: self.promotion().map(|info| info.piece),
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.intent())
    }
}

/// A move as named in coordinate notation, before it is resolved against a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl MoveIntent {
    pub fn matches(&self, m: &Move) -> bool {
        *self == m.intent()
    }
}

impl FromStr for MoveIntent {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| MoveParseError::InvalidMoveString {
            input: s.to_string(),
            reason,
        };

        if !s.is_ascii() || !(s.len() == 4 || s.len() == 5) {
            return Err(invalid("expected 4 or 5 characters"));
        }
        let from: Square = s[..2].parse().map_err(|_| invalid("bad origin square"))?;
        let to: Square = s[2..4]
            .parse()
            .map_err(|_| invalid("bad destination square"))?;

        let promotion = match s.as_bytes().get(4) {
            None => None,
            Some(&letter) => {
                if to.rank() != 0 && to.rank() != 7 {
                    return Err(invalid("promotion on a non promoting rank"));
                }
                let piece = match letter {
                    b'q' => Piece::Queen,
                    b'r' => Piece::Rook,
                    b'b' => Piece::Bishop,
                    b'n' => Piece::Knight,
                    _ => return Err(invalid("promotion letter must be one of q, r, b, n")),
                };
                Some(piece)
            }
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

impl Display for MoveIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            let letter = Piece::PIECE_CHARS[1][piece.index()];
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}
