use tracing::{debug, info};

use crate::{
    board::{
        Position,
        components::{PieceInfo, Side},
    },
    errors::{FenError, GameError},
    moves::move_info::{Move, MoveIntent},
};

/// A position plus the moves played on it, as driven by a protocol front end.
#[derive(Debug, Clone, Default)]
pub struct Game {
    position: Position,
    history: Vec<Move>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self {
            position: Position::from_fen(fen)?,
            history: Vec::new(),
        })
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Replaces the position. On error the current game is left untouched.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let position = Position::from_fen(fen)?;
        info!("Loaded position {fen}");
        self.position = position;
        self.history.clear();
        Ok(())
    }

    /// Legal moves in coordinate notation.
    pub fn legal_moves(&self) -> Vec<String> {
        self.position.legal_moves().iter().map(Move::uci).collect()
    }

    /// Decodes, validates and plays a coordinate notation move.
    pub fn apply_move(&mut self, uci: &str) -> Result<Move, GameError> {
        let intent: MoveIntent = uci.parse()?;
        let promotion = intent
            .promotion
            .map(|piece| PieceInfo::new(piece, self.position.side_to_move()));
        let m = self
            .position
            .move_from_parts(intent.from, intent.to, promotion)?;

        self.position.apply_move(m);
        self.history.push(m);
        debug!("played {m}, now {}", self.position.to_fen());
        Ok(m)
    }

    /// Takes back the last move, if any.
    pub fn undo(&mut self) -> Option<Move> {
        let m = self.history.pop()?;
        self.position.undo_move(m);
        debug!("undid {m}");
        Some(m)
    }

    pub fn is_in_check(&self, side: Side) -> bool {
        self.position.is_in_check(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{consts::START_FEN, errors::IllegalMoveError};

    #[test]
    fn test_apply_and_undo() {
        let mut game = Game::new();
        game.apply_move("e2e4").unwrap();
        game.apply_move("e7e5").unwrap();
        assert_eq!(game.history().len(), 2);
        assert_eq!(
            game.position().to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );

        assert_eq!(game.undo().map(|m| m.uci()), Some("e7e5".to_string()));
        assert_eq!(game.undo().map(|m| m.uci()), Some("e2e4".to_string()));
        assert_eq!(game.undo(), None);
        assert_eq!(game.position().to_fen(), START_FEN);
    }

    #[test]
    fn test_bad_fen_keeps_position() {
        let mut game = Game::new();
        game.apply_move("g1f3").unwrap();
        let before = game.position().to_fen();
        assert!(game.load_fen("not a fen").is_err());
        assert_eq!(game.position().to_fen(), before);
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_legal_moves_as_strings() {
        let game = Game::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
        let moves = game.legal_moves();
        assert!(moves.contains(&"a7a8q".to_string()));
        assert!(moves.contains(&"h1g2".to_string()));
    }

    #[test]
    fn test_promotion_uses_side_to_move() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/p7/4K3 b - - 0 1").unwrap();
        let m = game.apply_move("a2a1n").unwrap();
        assert_eq!(m.promotion().map(|info| info.side), Some(Side::Black));
        assert!(!game.is_in_check(Side::White));
    }

    #[test]
    fn test_errors_surface() {
        let mut game = Game::new();
        assert!(matches!(game.apply_move("e2"), Err(GameError::Parse(_))));
        assert!(matches!(
            game.apply_move("e3e4"),
            Err(GameError::Illegal(IllegalMoveError::NoPieceOnOrigin(_)))
        ));
        assert!(matches!(
            game.apply_move("e7e5"),
            Err(GameError::Illegal(IllegalMoveError::WrongColourToMove { .. }))
        ));
        assert!(matches!(
            game.apply_move("e2e5"),
            Err(GameError::Illegal(IllegalMoveError::NotLegal(_)))
        ));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_check_detection() {
        let mut game = Game::new();
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            game.apply_move(uci).unwrap();
        }
        assert!(game.is_in_check(Side::White));
        assert!(game.legal_moves().is_empty());
    }
}
