pub mod move_buffer;
pub mod move_gen;
pub mod move_info;

#[cfg(test)]
mod tests;

/// A (file, rank) delta. First 4 of ALL are orthogonal, rest are diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub file: i8,
    pub rank: i8,
}

impl Direction {
    pub const NORTH: Self = Self::new(0, 1);
    pub const SOUTH: Self = Self::new(0, -1);
    pub const WEST: Self = Self::new(-1, 0);
    pub const EAST: Self = Self::new(1, 0);
    pub const NORTHEAST: Self = Self::new(1, 1);
    pub const SOUTHEAST: Self = Self::new(1, -1);
    pub const SOUTHWEST: Self = Self::new(-1, -1);
    pub const NORTHWEST: Self = Self::new(-1, 1);

    pub const ORTHO: [Self; 4] = [Self::NORTH, Self::SOUTH, Self::WEST, Self::EAST];
    pub const DIAG: [Self; 4] = [
        Self::NORTHEAST,
        Self::SOUTHEAST,
        Self::SOUTHWEST,
        Self::NORTHWEST,
    ];
    pub const ALL: [Self; 8] = [
        Self::NORTH,
        Self::SOUTH,
        Self::WEST,
        Self::EAST,
        Self::NORTHEAST,
        Self::SOUTHEAST,
        Self::SOUTHWEST,
        Self::NORTHWEST,
    ];
    pub const KNIGHT_JUMPS: [Self; 8] = [
        Self::new(1, 2),
        Self::new(2, 1),
        Self::new(2, -1),
        Self::new(1, -2),
        Self::new(-1, -2),
        Self::new(-2, -1),
        Self::new(-2, 1),
        Self::new(-1, 2),
    ];

    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }
}
