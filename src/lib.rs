pub mod board;
pub mod comms;
pub mod errors;
pub mod game;
pub mod moves;
pub mod precomputed;
pub mod prelude;
pub mod search;
pub mod utils;

pub mod consts {
    pub const NUM_SQUARES: usize = 64;
    pub const NUM_FILES: usize = 8;

    pub const MAX_MOVES: usize = 256;

    pub const FILE_MASKS: [u64; NUM_FILES] = [
        0x0101010101010101, // A
        0x0202020202020202, // B
        0x0404040404040404, // C
        0x0808080808080808, // D
        0x1010101010101010, // E
        0x2020202020202020, // F
        0x4040404040404040, // G
        0x8080808080808080, // H
    ];

    pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    pub const KIWIPETE: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
}
