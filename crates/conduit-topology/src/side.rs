//! Face directions and side sets.
//!
//! Every cable node has six faces. Per-face state (connection flags,
//! acceptance masks, severed markers) is stored as a [`SideSet`] bitmask,
//! one bit per face.

use crate::Pos;

/// One of the six face directions of a cable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Side {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

impl Side {
    /// All six sides, in index order.
    pub const ALL: [Side; 6] = [
        Side::Down,
        Side::Up,
        Side::North,
        Side::South,
        Side::West,
        Side::East,
    ];

    /// Stable index in `0..6`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The side from the stable index, if in range.
    pub const fn from_index(index: usize) -> Option<Side> {
        match index {
            0 => Some(Side::Down),
            1 => Some(Side::Up),
            2 => Some(Side::North),
            3 => Some(Side::South),
            4 => Some(Side::West),
            5 => Some(Side::East),
            _ => None,
        }
    }

    /// The opposing face.
    pub const fn opposite(self) -> Side {
        match self {
            Side::Down => Side::Up,
            Side::Up => Side::Down,
            Side::North => Side::South,
            Side::South => Side::North,
            Side::West => Side::East,
            Side::East => Side::West,
        }
    }

    /// Unit offset toward the adjacent position on this side.
    pub const fn offset(self) -> Pos {
        match self {
            Side::Down => Pos::new(0, -1, 0),
            Side::Up => Pos::new(0, 1, 0),
            Side::North => Pos::new(0, 0, -1),
            Side::South => Pos::new(0, 0, 1),
            Side::West => Pos::new(-1, 0, 0),
            Side::East => Pos::new(1, 0, 0),
        }
    }

    /// Lower-case name, stable across versions.
    pub const fn name(self) -> &'static str {
        match self {
            Side::Down => "down",
            Side::Up => "up",
            Side::North => "north",
            Side::South => "south",
            Side::West => "west",
            Side::East => "east",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of sides packed into a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideSet(u8);

impl SideSet {
    /// The empty set.
    pub const NONE: SideSet = SideSet(0);

    /// All six sides.
    pub const ALL: SideSet = SideSet(0b0011_1111);

    /// A set holding a single side.
    pub const fn only(side: Side) -> SideSet {
        SideSet(1 << side.index())
    }

    /// Whether the set contains the given side.
    #[inline]
    pub const fn contains(self, side: Side) -> bool {
        self.0 & (1 << side.index()) != 0
    }

    /// This set with the given side added.
    pub const fn with(self, side: Side) -> SideSet {
        SideSet(self.0 | (1 << side.index()))
    }

    /// This set with the given side removed.
    pub const fn without(self, side: Side) -> SideSet {
        SideSet(self.0 & !(1 << side.index()))
    }

    /// Add a side in place.
    pub fn insert(&mut self, side: Side) {
        *self = self.with(side);
    }

    /// Remove a side in place.
    pub fn remove(&mut self, side: Side) {
        *self = self.without(side);
    }

    /// Number of sides in the set.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the contained sides in index order.
    pub fn iter(self) -> impl Iterator<Item = Side> {
        Side::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl FromIterator<Side> for SideSet {
    fn from_iter<I: IntoIterator<Item = Side>>(iter: I) -> Self {
        let mut set = SideSet::NONE;
        for side in iter {
            set.insert(side);
        }
        set
    }
}
