use miette::Diagnostic;
use thiserror::Error;

use crate::board::components::{Side, Square};

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CoordinateError {
    #[error("invalid coordinate: '{0}'")]
    #[diagnostic(
        code(tessera::coordinate),
        help("a coordinate is a file letter a-h followed by a rank digit 1-8, e.g. e4")
    )]
    InvalidCoordinate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum FenError {
    #[error("bad FEN: missing {0} field")]
    #[diagnostic(code(tessera::fen::missing_field))]
    MissingField(&'static str),

    #[error("bad FEN: malformed board row on rank {rank} (file cursor at {file})")]
    #[diagnostic(
        code(tessera::fen::board_row),
        help("every rank must describe exactly 8 squares, separated by '/'")
    )]
    MalformedBoardRow { rank: usize, file: usize },

    #[error("bad FEN: unknown piece letter '{0}'")]
    #[diagnostic(code(tessera::fen::piece_letter), help("valid letters are KQRBNP and kqrbnp"))]
    UnknownPieceLetter(char),

    #[error("bad FEN: unrecognised active colour '{0}'")]
    #[diagnostic(code(tessera::fen::active_colour), help("expected 'w' or 'b'"))]
    InvalidActiveColour(String),

    #[error("bad FEN: unrecognised character in castling rights: '{0}'")]
    #[diagnostic(code(tessera::fen::castling), help("expected '-' or any of KQkq"))]
    InvalidCastlingLetter(char),

    #[error("bad FEN: invalid en passant square")]
    #[diagnostic(code(tessera::fen::en_passant))]
    InvalidEnPassant(#[source] CoordinateError),

    #[error("bad FEN: en passant square {square} cannot be a target with {to_move} to move")]
    #[diagnostic(
        code(tessera::fen::en_passant_rank),
        help("the target lies on rank 6 when white moves and on rank 3 when black moves")
    )]
    EnPassantWrongRank { square: Square, to_move: Side },

    #[error("bad FEN: invalid half move clock '{0}'")]
    #[diagnostic(code(tessera::fen::halfmove), help("expected a non-negative integer"))]
    InvalidHalfMoveClock(String),

    #[error("bad FEN: invalid full move number '{0}'")]
    #[diagnostic(code(tessera::fen::fullmove))]
    InvalidFullMoveNumber(String),

    #[error("bad FEN: {side} has {count} kings")]
    #[diagnostic(code(tessera::fen::kings), help("each side needs exactly one king"))]
    InvalidKingCount { side: Side, count: u32 },

    #[error("bad FEN: unexpected trailing field '{0}'")]
    #[diagnostic(code(tessera::fen::trailing), help("a FEN record has at most six fields"))]
    TrailingField(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum MoveParseError {
    #[error("invalid move string '{input}': {reason}")]
    #[diagnostic(
        code(tessera::move_string),
        help("moves look like e2e4, or e7e8q when promoting")
    )]
    InvalidMoveString { input: String, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum IllegalMoveError {
    #[error("no piece to move on {0}")]
    #[diagnostic(code(tessera::illegal::empty_origin))]
    NoPieceOnOrigin(Square),

    #[error("piece on {square} belongs to {owner}, but it is {to_move}'s turn")]
    #[diagnostic(code(tessera::illegal::wrong_colour))]
    WrongColourToMove {
        square: Square,
        owner: Side,
        to_move: Side,
    },

    #[error("cannot move onto {0}, it holds a friendly piece")]
    #[diagnostic(code(tessera::illegal::friendly_destination))]
    FriendlyDestination(Square),

    #[error("cannot promote to a {0} piece")]
    #[diagnostic(code(tessera::illegal::promotion_colour))]
    PromotionWrongColour(Side),

    #[error("{0} is not a legal move in this position")]
    #[diagnostic(code(tessera::illegal::not_legal))]
    NotLegal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum GameError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] MoveParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Illegal(#[from] IllegalMoveError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Fen(#[from] FenError),
}
