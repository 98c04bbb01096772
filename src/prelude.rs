pub use crate::board::{
    self, Position,
    components::{BitBoard, BitBoardIterator, CastlingRights, Piece, PieceInfo, Side, Square},
};
pub use crate::consts::*;
pub use crate::errors::{
    CoordinateError, FenError, GameError, IllegalMoveError, MoveParseError,
};
pub use crate::game::Game;
pub use crate::moves::{
    self, Direction,
    move_buffer::MoveBuffer,
    move_gen,
    move_info::{Move, MoveIntent},
};
pub use crate::precomputed::move_tables::{ATTACK_TABLES, AttackTables};
pub use crate::search::{SearchLimits, SearchResult, SearchWorker};
pub use crate::utils::{self, config::EngineConfig, perft::*};
pub use miette::{self, Context, IntoDiagnostic, Result};
pub use tracing::{Level, debug, error, info, trace, warn};
