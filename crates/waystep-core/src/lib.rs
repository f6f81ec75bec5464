//! **waystep-core** — geometry types shared by the waystep crates.
//!
//! Provides integer cell coordinates ([`Point`]), half-open rectangles
//! ([`Range`]) and single-step compass moves ([`Direction`]).

pub mod direction;
pub mod geom;

pub use direction::Direction;
pub use geom::{Point, Range, RangeIter};
