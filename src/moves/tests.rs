use test_case::test_case;

use crate::{
    board::{
        Position,
        components::{Piece, Side},
    },
    consts::{KIWIPETE, START_FEN},
    moves::move_gen::generate_legal_moves,
    precomputed::move_tables::ATTACK_TABLES,
    utils::perft::perft,
};

const CASTLE_FIXTURE: &str = "3rkb1r/p2nqppp/5n2/1B2p1B1/4P3/1Q6/PPP2PPP/2KR3R w k - 3 13";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn legal_uci(fen: &str) -> Vec<String> {
    let pos = Position::from_fen(fen).unwrap();
    let mut moves: Vec<String> = pos.legal_moves().iter().map(|m| m.uci()).collect();
    moves.sort_unstable();
    moves
}

// verify symmetry of apply_move and undo_move
fn assert_apply_undo_symmetry(fen: &str) {
    let original = Position::from_fen(fen).unwrap();
    let mut pos = original.clone();
    let legal_moves = generate_legal_moves(&pos, &ATTACK_TABLES);

    for m in legal_moves {
        pos.apply_move(m);
        assert_ne!(
            pos, original,
            "Position should change after applying {m} on FEN {fen}"
        );
        pos.undo_move(m);
        assert_eq!(
            pos, original,
            "Position was not restored after undoing {m} on FEN {fen}"
        );
        assert_eq!(pos.to_fen(), fen);
    }
}

#[test]
fn test_castle_fixture_move_count() {
    let pos = Position::from_fen(CASTLE_FIXTURE).unwrap();
    let moves = pos.legal_moves();
    assert_eq!(moves.len(), 51);

    let non_pawn = moves
        .iter()
        .filter(|m| pos.piece_at(m.from_sq()).is_some_and(|p| p.piece != Piece::Pawn))
        .count();
    assert_eq!(non_pawn, 41);
}

#[test_case("d1d6")]
#[test_case("d1f1")]
#[test_case("h1g1")]
#[test_case("b5d7")]
#[test_case("g5h4")]
#[test_case("b3h3")]
#[test_case("b3f7")]
#[test_case("c1d2")]
fn test_castle_fixture_contains(uci: &str) {
    assert!(legal_uci(CASTLE_FIXTURE).iter().any(|m| m == uci));
}

#[test]
fn test_start_position_moves() {
    let moves = legal_uci(START_FEN);
    assert_eq!(moves.len(), 20);
    assert!(moves.contains(&"e2e4".to_string()));
    assert!(moves.contains(&"g1f3".to_string()));
    assert!(!moves.contains(&"e1e2".to_string()));
}

#[test]
fn test_castling_both_wings() {
    let moves = legal_uci("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    assert!(moves.contains(&"e1g1".to_string()));
    assert!(moves.contains(&"e1c1".to_string()));

    let moves = legal_uci("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
    assert!(moves.contains(&"e8g8".to_string()));
    assert!(moves.contains(&"e8c8".to_string()));
}

#[test]
fn test_castling_through_attacked_square() {
    // f1 covered by the f8 rook
    let moves = legal_uci("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1");
    assert!(!moves.contains(&"e1g1".to_string()));
    assert!(moves.contains(&"e1c1".to_string()));
}

#[test]
fn test_castling_queenside_b_file_may_be_attacked() {
    let moves = legal_uci("1r2k2r/8/8/8/8/8/8/R3K2R w KQk - 0 1");
    assert!(moves.contains(&"e1c1".to_string()));
}

#[test]
fn test_castling_blocked_by_knight() {
    let moves = legal_uci("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1");
    assert!(!moves.contains(&"e1g1".to_string()));
    assert!(!moves.contains(&"e1c1".to_string()));
}

#[test]
fn test_no_castling_out_of_check() {
    let moves = legal_uci("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1");
    assert!(!moves.contains(&"e1g1".to_string()));
    assert!(!moves.contains(&"e1c1".to_string()));
}

#[test]
fn test_castling_requires_rook_at_home() {
    let moves = legal_uci("r3k2r/8/8/8/8/8/8/R3K3 w KQkq - 0 1");
    assert!(!moves.contains(&"e1g1".to_string()));
    assert!(moves.contains(&"e1c1".to_string()));
}

#[test]
fn test_en_passant_generated() {
    let moves = legal_uci("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    assert!(moves.contains(&"e5f6".to_string()));
    // d5 pawn did not just double push
    assert!(!moves.contains(&"e5d6".to_string()));
}

#[test]
fn test_en_passant_exposing_king_is_illegal() {
    let moves = legal_uci("8/8/8/KPp4r/8/8/8/7k w - c6 0 2");
    assert!(!moves.contains(&"b5c6".to_string()));
    assert!(moves.contains(&"b5b6".to_string()));
}

#[test_case("4k3/8/8/3P4/8/8/8/4K3 w - e6 0 1"; "no pawn behind target")]
#[test_case("4k3/8/4N3/3P4/8/8/8/4K3 w - e6 0 1"; "friendly piece on target")]
#[test_case("4k3/8/8/3Pn3/8/8/8/4K3 w - e6 0 1"; "knight behind target")]
fn test_en_passant_needs_enemy_pawn_behind_target(fen: &str) {
    let moves = legal_uci(fen);
    assert!(!moves.contains(&"d5e6".to_string()));
    assert!(moves.contains(&"d5d6".to_string()));
}

#[test]
fn test_promotions_expand_to_four() {
    let moves = legal_uci("8/P7/8/8/8/8/8/k6K w - - 0 1");
    let promos: Vec<&String> = moves.iter().filter(|m| m.starts_with("a7a8")).collect();
    assert_eq!(promos, ["a7a8b", "a7a8n", "a7a8q", "a7a8r"]);
}

#[test]
fn test_capture_promotions() {
    let moves = legal_uci("1n5k/P7/8/8/8/8/8/K7 w - - 0 1");
    for letter in ["q", "r", "b", "n"] {
        assert!(moves.contains(&format!("a7b8{letter}")));
        assert!(moves.contains(&format!("a7a8{letter}")));
    }
}

#[test]
fn test_pinned_piece_cannot_leave_line() {
    let pos = Position::from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
    let from_bishop = pos
        .legal_moves()
        .iter()
        .filter(|m| m.from_sq().to_string() == "e2")
        .count();
    assert_eq!(from_bishop, 0);
    assert_eq!(pos.legal_moves().len(), 4);
}

#[test]
fn test_king_cannot_step_along_checking_ray() {
    let moves = legal_uci("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
    assert!(!moves.contains(&"e1f1".to_string()));
    assert!(!moves.contains(&"e1d1".to_string()));
    assert!(moves.contains(&"e1e2".to_string()));
}

#[test]
fn test_checkmate_has_no_moves() {
    let pos =
        Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
    assert!(pos.is_in_check(Side::White));
    assert!(pos.legal_moves().is_empty());
}

#[test]
fn test_stalemate_has_no_moves() {
    let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(!pos.is_in_check(Side::Black));
    assert!(pos.legal_moves().is_empty());
}

#[test_case(START_FEN; "startpos")]
#[test_case(KIWIPETE; "kiwipete")]
#[test_case(CASTLE_FIXTURE; "castle fixture")]
#[test_case(POSITION_3; "position 3")]
#[test_case(POSITION_4; "position 4 promotions")]
#[test_case(POSITION_5; "position 5")]
#[test_case("rnbqkbnr/pp1p1ppp/8/2pPp3/8/8/PPP1PPPP/RNBQKBNR w KQkq e6 0 3"; "en passant")]
#[test_case("r3k2r/pPpp1ppp/1b3nbN/nP6/BBP1P3/q4N2/P2P2PP/R2Q1RK1 b kq - 0 1"; "black to move")]
#[test_case("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1"; "castling")]
fn test_apply_undo_symmetry(fen: &str) {
    assert_apply_undo_symmetry(fen);
}

#[test_case(START_FEN, 1, 20)]
#[test_case(START_FEN, 2, 400)]
#[test_case(START_FEN, 3, 8_902)]
#[test_case(KIWIPETE, 1, 48)]
#[test_case(KIWIPETE, 2, 2_039)]
#[test_case(POSITION_3, 1, 14)]
#[test_case(POSITION_3, 2, 191)]
#[test_case(POSITION_3, 3, 2_812)]
#[test_case(POSITION_4, 1, 6)]
#[test_case(POSITION_4, 2, 264)]
#[test_case(POSITION_4, 3, 9_467)]
#[test_case(POSITION_5, 1, 44)]
#[test_case(POSITION_5, 2, 1_486)]
fn test_perft(fen: &str, depth: u8, expected: u64) {
    let mut pos = Position::from_fen(fen).unwrap();
    assert_eq!(perft(&mut pos, depth), expected, "perft({depth}) on {fen}");
}

#[test_case(START_FEN, 4, 197_281)]
#[test_case(KIWIPETE, 3, 97_862)]
#[test_case(POSITION_3, 4, 43_238)]
#[test_case(POSITION_4, 4, 422_333)]
#[test_case(POSITION_5, 3, 62_379)]
#[ignore = "slow in debug builds"]
fn test_perft_deep(fen: &str, depth: u8, expected: u64) {
    let mut pos = Position::from_fen(fen).unwrap();
    assert_eq!(perft(&mut pos, depth), expected, "perft({depth}) on {fen}");
}
