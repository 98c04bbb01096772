use std::{
    fmt::{Display, Write},
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Shl, Shr},
    str::FromStr,
};

use crate::{errors::CoordinateError, moves::Direction};

#[derive(Debug, Default, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
#[repr(transparent)]
pub struct BitBoard(pub u64);

impl BitAndAssign for BitBoard {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl BitOrAssign for BitBoard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl BitOr for BitBoard {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for BitBoard {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl Not for BitBoard {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl Shl<u32> for BitBoard {
    type Output = Self;

    #[inline(always)]
    fn shl(self, rhs: u32) -> Self::Output {
        Self(self.0 << rhs)
    }
}

impl Shr<u32> for BitBoard {
    type Output = Self;

    #[inline(always)]
    fn shr(self, rhs: u32) -> Self::Output {
        Self(self.0 >> rhs)
    }
}

impl BitBoard {
    pub const EMPTY: Self = Self(0);

    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.0)
    }

    #[inline(always)]
    pub const fn set(&mut self, square: Square) {
        self.0 |= 1 << square.0;
    }

    #[inline(always)]
    pub const fn clear(&mut self, square: Square) {
        self.0 &= !(1 << square.0);
    }

    #[inline(always)]
    pub const fn contains(&self, square: Square) -> bool {
        (self.0 & (1 << square.0)) != 0
    }

    #[inline(always)]
    pub fn count(&self) -> u32 {
        #[cfg(all(target_arch = "x86_64", target_feature = "popcnt"))]
        {
            unsafe { std::arch::x86_64::_popcnt64(self.0 as i64) as u32 }
        }
        #[cfg(not(all(target_arch = "x86_64", target_feature = "popcnt")))]
        {
            self.0.count_ones()
        }
    }

    /// Removes and returns the lowest member, or `None` (without touching the set) when empty.
    #[inline(always)]
    pub fn pop_lowest(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let idx = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1; // Clear the least significant bit
        Some(Square(idx))
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn any(&self) -> bool {
        self.0 != 0
    }

    #[inline(always)]
    pub const fn iter_bits(&self) -> BitBoardIterator {
        BitBoardIterator { remaining: self.0 }
    }

    #[inline(always)]
    pub const fn or(self, rhs: Self) -> Self {
        BitBoard(self.0 | rhs.0)
    }

    #[inline(always)]
    pub const fn and(self, rhs: Self) -> Self {
        BitBoard(self.0 & rhs.0)
    }

    pub fn print_bitboard(&self) -> String {
        let mut out = String::with_capacity(8 * 8 * 2);
        for rank in (0..8).rev() {
            let row = (0..8)
                .map(|file| {
                    if self.contains(Square(rank * 8 + file)) {
                        "1"
                    } else {
                        "0"
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(out, "{row}");
        }
        out
    }
}

impl FromIterator<Square> for BitBoard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        let mut bb = BitBoard::EMPTY;
        iter.into_iter().for_each(|sq| bb.set(sq));
        bb
    }
}

/// Iterator that yields each member of a BitBoard, lowest first
pub struct BitBoardIterator {
    remaining: u64,
}

impl Iterator for BitBoardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let idx = self.remaining.trailing_zeros() as usize;
        self.remaining &= self.remaining - 1;
        Some(Square(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let exact = self.remaining.count_ones() as usize;
        (exact, Some(exact))
    }
}

impl ExactSizeIterator for BitBoardIterator {
    fn len(&self) -> usize {
        self.remaining.count_ones() as usize
    }
}

#[derive(Default, Debug, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

impl Not for Side {
    type Output = Side;

    fn not(self) -> Self::Output {
        self.flip()
    }
}

impl Side {
    pub const SIDES: [Side; 2] = [Side::White, Side::Black];

    pub const fn flip(&self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub const fn index(&self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }

    /// Rank index pawns of this side start on
    pub const fn pawn_rank(&self) -> usize {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }

    /// Rank index pawns of this side promote on
    pub const fn promotion_rank(&self) -> usize {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }

    pub const fn forward(&self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }
}

#[derive(Default, PartialEq, Eq, Debug, PartialOrd, Clone, Copy, Hash)]
pub enum Piece {
    #[default]
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Piece::Pawn => write!(f, "Pawn"),
            Piece::Knight => write!(f, "Knight"),
            Piece::Bishop => write!(f, "Bishop"),
            Piece::Rook => write!(f, "Rook"),
            Piece::Queen => write!(f, "Queen"),
            Piece::King => write!(f, "King"),
        }
    }
}

impl Piece {
    pub const PIECES: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

    pub const PIECE_CHARS: [[char; 6]; 2] = [
        ['P', 'N', 'B', 'R', 'Q', 'K'], // White
        ['p', 'n', 'b', 'r', 'q', 'k'], // Black
    ];

    #[inline(always)]
    pub const fn index(&self) -> usize {
        match self {
            Piece::Pawn => 0,
            Piece::Knight => 1,
            Piece::Bishop => 2,
            Piece::Rook => 3,
            Piece::Queen => 4,
            Piece::King => 5,
        }
    }

    pub const fn is_slider(&self) -> bool {
        matches!(self, Piece::Bishop | Piece::Rook | Piece::Queen)
    }

    pub fn icon(&self, side: Side) -> char {
        let icons = match side {
            Side::White => ['♟', '♞', '♝', '♜', '♛', '♚'],
            Side::Black => ['♙', '♘', '♗', '♖', '♕', '♔'],
        };
        icons[self.index()]
    }
}

/// Compact struct to hold piece and side
#[derive(Debug, Default, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
pub struct PieceInfo {
    pub piece: Piece,
    pub side: Side,
}

impl PieceInfo {
    pub const fn new(piece: Piece, side: Side) -> Self {
        Self { piece, side }
    }

    /// Decodes a FEN piece letter, uppercase being white.
    pub fn from_char(c: char) -> Option<Self> {
        Side::SIDES.iter().find_map(|&side| {
            Piece::PIECE_CHARS[side.index()]
                .iter()
                .position(|&pc| pc == c)
                .map(|idx| Self::new(Piece::PIECES[idx], side))
        })
    }

    pub const fn to_char(&self) -> char {
        Piece::PIECE_CHARS[self.side.index()][self.piece.index()]
    }

    /// 4 bit code used when packing into a move. 0..=11
    pub(crate) const fn code(&self) -> u64 {
        (self.piece.index() * 2 + self.side.index()) as u64
    }

    pub(crate) const fn from_code(code: u64) -> Option<Self> {
        if code >= 12 {
            return None;
        }
        let side = if code % 2 == 0 {
            Side::White
        } else {
            Side::Black
        };
        Some(Self::new(Piece::PIECES[(code / 2) as usize], side))
    }
}

impl Display for PieceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.side, self.piece)
    }
}

/// Castling rights are stored in a [`u8`], which is divided into the following parts:
/// ```text
/// Bit: 7 6 5 4 3 2 1 0
///      - - - - q k Q K
///              | | | |
///              | | | +-- White kingside right
///              | | +---- White queenside right
///              | +------ Black kingside right
///              +-------- Black queenside right
/// ```
#[derive(Debug, Default, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
#[repr(transparent)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: Self = Self(0);
    /// White King side castling
    pub const WHITE_00: Self = Self(0b0001);
    /// White Queen side castling
    pub const WHITE_000: Self = Self(0b0010);
    /// Black King side castling
    pub const BLACK_00: Self = Self(0b0100);
    /// Black Queen side castling
    pub const BLACK_000: Self = Self(0b1000);

    pub const WHITE_CASTLING: Self = Self(Self::WHITE_00.0 | Self::WHITE_000.0);
    pub const BLACK_CASTLING: Self = Self(Self::BLACK_00.0 | Self::BLACK_000.0);
    pub const ALL: Self = Self(Self::WHITE_CASTLING.0 | Self::BLACK_CASTLING.0);

    const RIGHTS_MASK: u8 = 0b1111;

    /// Builds rights from the low four bits, anything above is dropped.
    #[inline(always)]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::RIGHTS_MASK)
    }

    #[inline(always)]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn allows(&self, rights: CastlingRights) -> bool {
        self.0 & rights.0 != 0
    }

    #[inline(always)]
    pub const fn add_right(&mut self, rights: CastlingRights) {
        self.0 |= rights.0;
    }

    #[inline(always)]
    pub const fn remove_right(&mut self, rights: CastlingRights) {
        self.0 &= !rights.0
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn for_side(side: Side, kingside: bool) -> Self {
        match (side, kingside) {
            (Side::White, true) => Self::WHITE_00,
            (Side::White, false) => Self::WHITE_000,
            (Side::Black, true) => Self::BLACK_00,
            (Side::Black, false) => Self::BLACK_000,
        }
    }

    pub const fn both(side: Side) -> Self {
        match side {
            Side::White => Self::WHITE_CASTLING,
            Side::Black => Self::BLACK_CASTLING,
        }
    }

    #[inline(always)]
    pub const fn can_castle(&self, side: Side, kingside: bool) -> bool {
        self.allows(Self::for_side(side, kingside))
    }

    /// The right lost when the rook on `square` moves or is captured.
    pub const fn tied_to_rook_square(square: Square) -> Self {
        match square.0 {
            0 => Self::WHITE_000,
            7 => Self::WHITE_00,
            56 => Self::BLACK_000,
            63 => Self::BLACK_00,
            _ => Self::NONE,
        }
    }
}

impl BitOr for CastlingRights {
    type Output = CastlingRights;

    fn bitor(self, rhs: CastlingRights) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl Display for CastlingRights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (right, c) in [
            (Self::WHITE_00, 'K'),
            (Self::WHITE_000, 'Q'),
            (Self::BLACK_00, 'k'),
            (Self::BLACK_000, 'q'),
        ] {
            if self.allows(right) {
                f.write_char(c)?;
            }
        }
        Ok(())
    }
}

/// Represents a single square on the board.
/// # Representation
/// ```text
///  A8(56), B8, C8, D8, E8, F8, G8, H8(63)
///  ...
///  A1(0),  B1, C1, D1, E1, F1, G1, H1(7)
///```
/// file = index % 8, rank = index / 8, both 0 indexed.
#[derive(Default, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[repr(transparent)]
pub struct Square(usize);

impl Square {
    pub const A1: Self = Self(0);
    pub const C1: Self = Self(2);
    pub const D1: Self = Self(3);
    pub const E1: Self = Self(4);
    pub const F1: Self = Self(5);
    pub const G1: Self = Self(6);
    pub const H1: Self = Self(7);
    pub const A8: Self = Self(56);
    pub const C8: Self = Self(58);
    pub const D8: Self = Self(59);
    pub const E8: Self = Self(60);
    pub const F8: Self = Self(61);
    pub const G8: Self = Self(62);
    pub const H8: Self = Self(63);

    /// Returns a Square from a given index, None if index is out of bounds
    #[inline(always)]
    pub const fn new(index: usize) -> Option<Self> {
        if index < 64 {
            return Some(Self(index));
        }
        None
    }

    /// Index is masked to the board, callers guarantee it is already in range.
    #[inline(always)]
    pub(crate) const fn from_index(index: usize) -> Self {
        debug_assert!(index < 64);
        Self(index & 63)
    }

    /// Returns a Square from a given file and rank, None if either is out of bounds.
    #[inline(always)]
    pub const fn from_coords(file: usize, rank: usize) -> Option<Self> {
        if file < 8 && rank < 8 {
            return Some(Square(rank * 8 + file));
        }
        None
    }

    /// (file, rank), both 0 indexed
    #[inline(always)]
    pub const fn coords(&self) -> (usize, usize) {
        (self.file(), self.rank())
    }

    #[inline(always)]
    pub const fn file(&self) -> usize {
        self.0 % 8
    }

    #[inline(always)]
    pub const fn rank(&self) -> usize {
        self.0 / 8
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Moves by the given deltas. Never wraps around an edge of the board.
    #[inline(always)]
    pub const fn step(&self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            return None;
        }
        Some(Self(rank as usize * 8 + file as usize))
    }

    #[inline(always)]
    pub const fn shift(&self, dir: Direction) -> Option<Self> {
        self.step(dir.file, dir.rank)
    }
}

impl From<Square> for usize {
    fn from(value: Square) -> Self {
        value.0
    }
}

impl FromStr for Square {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoordinateError::InvalidCoordinate(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0];
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        Ok(Self(((rank - b'1') * 8 + (file - b'a')) as usize))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = self.file() as u8 + b'a';
        let rank = self.rank() as u8 + b'1';
        write!(f, "{}{}", file as char, rank as char)
    }
}
