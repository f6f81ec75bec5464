//! Compass directions for single-cell moves.

use std::fmt;

use crate::geom::Point;

/// A single axis-aligned step, or no movement at all.
///
/// Each variant carries a numeric keypad code (2 = down, 4 = left,
/// 6 = right, 8 = up, 0 = none) for hosts that speak in keypad numbers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    None,
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    /// The four movement directions in down, left, right, up order.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
    ];

    /// Numeric keypad code.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Down => 2,
            Self::Left => 4,
            Self::Right => 6,
            Self::Up => 8,
        }
    }

    /// Parse a keypad code. Diagonal and unknown codes yield `None`.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            2 => Some(Self::Down),
            4 => Some(Self::Left),
            6 => Some(Self::Right),
            8 => Some(Self::Up),
            _ => None,
        }
    }

    /// Unit offset of one step in this direction (Y grows down).
    #[inline]
    pub const fn offset(self) -> Point {
        match self {
            Self::None => Point::ZERO,
            Self::Down => Point::new(0, 1),
            Self::Left => Point::new(-1, 0),
            Self::Right => Point::new(1, 0),
            Self::Up => Point::new(0, -1),
        }
    }

    /// The opposite direction. `None` stays `None`.
    pub const fn reverse(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
        }
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
        };
        f.pad(s)
    }
}
