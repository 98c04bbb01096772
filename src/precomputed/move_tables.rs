use crate::{
    board::components::{BitBoard, Side, Square},
    consts::{FILE_MASKS, NUM_SQUARES},
    moves::Direction,
};

/// Leaper attack sets, indexed by origin square. Built once, never mutated.
#[derive(Debug)]
pub struct AttackTables {
    pub king_attacks: [BitBoard; NUM_SQUARES],
    pub knight_attacks: [BitBoard; NUM_SQUARES],
}

pub static ATTACK_TABLES: AttackTables = AttackTables::build();

impl Default for AttackTables {
    fn default() -> Self {
        Self::build()
    }
}

impl AttackTables {
    pub const fn build() -> Self {
        Self {
            king_attacks: leaper_table(&Direction::ALL),
            knight_attacks: leaper_table(&Direction::KNIGHT_JUMPS),
        }
    }

    #[inline(always)]
    pub const fn king(&self, square: Square) -> BitBoard {
        self.king_attacks[square.index()]
    }

    #[inline(always)]
    pub const fn knight(&self, square: Square) -> BitBoard {
        self.knight_attacks[square.index()]
    }
}

const fn leaper_table(deltas: &[Direction; 8]) -> [BitBoard; NUM_SQUARES] {
    let mut table = [BitBoard::EMPTY; NUM_SQUARES];
    let mut index = 0;
    while index < NUM_SQUARES {
        let origin = Square::from_index(index);
        let mut attacks = BitBoard::EMPTY;
        let mut i = 0;
        while i < deltas.len() {
            if let Some(target) = origin.shift(deltas[i]) {
                attacks.set(target);
            }
            i += 1;
        }
        table[index] = attacks;
        index += 1;
    }
    table
}

/// Walks each direction until the edge, stopping right after the first occupied square.
pub fn sliding_attacks(square: Square, directions: &[Direction], occupied: BitBoard) -> BitBoard {
    let mut attacks = BitBoard::EMPTY;
    for &dir in directions {
        let mut current = square;
        while let Some(next) = current.shift(dir) {
            attacks.set(next);
            if occupied.contains(next) {
                break;
            }
            current = next;
        }
    }
    attacks
}

pub fn rook_attacks(square: Square, occupied: BitBoard) -> BitBoard {
    sliding_attacks(square, &Direction::ORTHO, occupied)
}

pub fn bishop_attacks(square: Square, occupied: BitBoard) -> BitBoard {
    sliding_attacks(square, &Direction::DIAG, occupied)
}

pub fn queen_attacks(square: Square, occupied: BitBoard) -> BitBoard {
    sliding_attacks(square, &Direction::ALL, occupied)
}

/// Squares attacked by a whole set of pawns of one side.
pub fn pawn_attacks(pawns: BitBoard, side: Side) -> BitBoard {
    let not_a_file = BitBoard(!FILE_MASKS[0]);
    let not_h_file = BitBoard(!FILE_MASKS[7]);
    match side {
        // toward the h file | toward the a file
        Side::White => ((pawns << 9) & not_a_file) | ((pawns << 7) & not_h_file),
        Side::Black => ((pawns >> 7) & not_a_file) | ((pawns >> 9) & not_h_file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn squares(names: &[&str]) -> BitBoard {
        names.iter().map(|s| s.parse::<Square>().unwrap()).collect()
    }

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_king_attacks_corner() {
        let attacks = ATTACK_TABLES.king(Square::A1);
        assert_eq!(attacks, squares(&["a2", "b1", "b2"]));
        assert_eq!(attacks.count(), 3);
    }

    #[test]
    fn test_king_attacks_center() {
        let attacks = ATTACK_TABLES.king(sq("e4"));
        assert_eq!(
            attacks,
            squares(&["d3", "e3", "f3", "d4", "f4", "d5", "e5", "f5"])
        );
    }

    #[test]
    fn test_knight_attacks_f3() {
        let attacks = ATTACK_TABLES.knight(sq("f3"));
        assert_eq!(
            attacks,
            squares(&["e1", "g1", "d2", "h2", "d4", "h4", "e5", "g5"])
        );
    }

    #[test_case("b5", &["a3", "c3", "d4", "d6", "a7", "c7"])]
    #[test_case("h1", &["f2", "g3"])]
    #[test_case("a8", &["b6", "c7"])]
    #[test_case("g2", &["e1", "e3", "f4", "h4"])]
    fn test_knight_attacks_near_edges(origin: &str, expected: &[&str]) {
        assert_eq!(ATTACK_TABLES.knight(sq(origin)), squares(expected));
    }

    #[test]
    fn test_tables_never_wrap() {
        for index in 0..64 {
            let origin = Square::new(index).unwrap();
            for target in ATTACK_TABLES.king(origin).iter_bits() {
                assert!(origin.file().abs_diff(target.file()) <= 1);
                assert!(origin.rank().abs_diff(target.rank()) <= 1);
            }
            for target in ATTACK_TABLES.knight(origin).iter_bits() {
                let df = origin.file().abs_diff(target.file());
                let dr = origin.rank().abs_diff(target.rank());
                assert!((df, dr) == (1, 2) || (df, dr) == (2, 1));
            }
        }
    }

    #[test]
    fn test_rook_stops_at_blocker() {
        let occupied = squares(&["d6", "b4"]);
        let attacks = rook_attacks(sq("d4"), occupied);
        assert_eq!(
            attacks,
            squares(&[
                "d5", "d6", // north, blocker included
                "d3", "d2", "d1", // south
                "c4", "b4", // west, blocker included
                "e4", "f4", "g4", "h4", // east
            ])
        );
    }

    #[test]
    fn test_bishop_on_empty_board() {
        let attacks = bishop_attacks(sq("c3"), BitBoard::EMPTY);
        assert_eq!(
            attacks,
            squares(&[
                "a1", "b2", "d4", "e5", "f6", "g7", "h8", "b4", "a5", "d2", "e1"
            ])
        );
    }

    #[test]
    fn test_queen_is_rook_plus_bishop() {
        let occupied = squares(&["e2", "c6", "g4", "a1"]);
        for index in 0..64 {
            let origin = Square::new(index).unwrap();
            assert_eq!(
                queen_attacks(origin, occupied),
                rook_attacks(origin, occupied) | bishop_attacks(origin, occupied)
            );
        }
    }

    #[test]
    fn test_pawn_attacks_mask_wraparound() {
        let white = pawn_attacks(squares(&["a2", "h2", "d4"]), Side::White);
        assert_eq!(white, squares(&["b3", "g3", "c5", "e5"]));

        let black = pawn_attacks(squares(&["a7", "h7", "e5"]), Side::Black);
        assert_eq!(black, squares(&["b6", "g6", "d4", "f4"]));
    }
}
