//! Traversal-cost grids.
//!
//! [`CostGrid`] is the read-only contract every search runs against: bounds,
//! per-cell cost, optional toroidal wrap, and a distance estimate. [`CostMap`]
//! is a dense implementation that can be built by hand or parsed from text.

use std::fmt;

use waystep_core::{Direction, Point, Range};

use crate::distance::{manhattan, wrapped_delta};

/// Sentinel cost of a cell that can never be entered.
pub const IMPASSABLE: i32 = i32::MAX;

/// Per-axis toroidal wrap flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wrap {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Wrap {
    pub const NONE: Self = Self {
        horizontal: false,
        vertical: false,
    };
    pub const HORIZONTAL: Self = Self {
        horizontal: true,
        vertical: false,
    };
    pub const VERTICAL: Self = Self {
        horizontal: false,
        vertical: true,
    };
    pub const BOTH: Self = Self {
        horizontal: true,
        vertical: true,
    };
}

/// Read-only grid provider consulted by [`PathSearch`](crate::PathSearch)
/// and [`RouteCursor`](crate::RouteCursor).
///
/// Implementors supply bounds and costs; everything else has a default
/// consistent with 4-directional movement. Since nothing here takes
/// `&mut self`, a grid can back any number of independent searches.
pub trait CostGrid {
    /// Bounds of the grid. Cells outside are never entered.
    fn range(&self) -> Range;

    /// Cost of entering `p`: a positive value, or [`IMPASSABLE`].
    /// Points outside [`range`](Self::range) must report [`IMPASSABLE`].
    fn cost(&self, p: Point) -> i32;

    /// Which axes wrap around.
    fn wrap(&self) -> Wrap {
        Wrap::NONE
    }

    fn width(&self) -> i32 {
        self.range().width()
    }

    fn height(&self) -> i32 {
        self.range().height()
    }

    fn is_passable(&self, p: Point) -> bool {
        self.cost(p) != IMPASSABLE
    }

    /// Pull `p` onto the nearest in-bounds cell. Idempotent.
    fn clamp(&self, p: Point) -> Point {
        self.range().clamp(p)
    }

    /// Signed horizontal offset `a.x - b.x`, shortened across the seam on a
    /// horizontally wrapping grid.
    fn delta_x(&self, a: Point, b: Point) -> i32 {
        wrapped_delta(a.x, b.x, self.width(), self.wrap().horizontal)
    }

    /// Signed vertical offset `a.y - b.y`, shortened across the seam on a
    /// vertically wrapping grid.
    fn delta_y(&self, a: Point, b: Point) -> i32 {
        wrapped_delta(a.y, b.y, self.height(), self.wrap().vertical)
    }

    /// Admissible remaining-cost estimate between two cells.
    ///
    /// Wrap-aware Manhattan distance; admissible as long as every passable
    /// cell costs at least 1.
    fn distance(&self, a: Point, b: Point) -> i32 {
        if self.wrap() == Wrap::NONE {
            return manhattan(a, b);
        }
        self.delta_x(a, b).abs() + self.delta_y(a, b).abs()
    }

    /// The cell one step from `p` in `dir`.
    ///
    /// Wrapping axes bring the result back inside the range; on other axes
    /// the result may lie outside, where it is impassable.
    fn neighbor(&self, p: Point, dir: Direction) -> Point {
        let n = p + dir.offset();
        let rng = self.range();
        let wrap = self.wrap();
        let x = if wrap.horizontal {
            rng.min.x + (n.x - rng.min.x).rem_euclid(rng.width().max(1))
        } else {
            n.x
        };
        let y = if wrap.vertical {
            rng.min.y + (n.y - rng.min.y).rem_euclid(rng.height().max(1))
        } else {
            n.y
        };
        Point::new(x, y)
    }
}

impl<G: CostGrid + ?Sized> CostGrid for &G {
    fn range(&self) -> Range {
        (**self).range()
    }

    fn cost(&self, p: Point) -> i32 {
        (**self).cost(p)
    }

    fn wrap(&self) -> Wrap {
        (**self).wrap()
    }
}

// ---------------------------------------------------------------------------
// CostMap
// ---------------------------------------------------------------------------

/// Dense row-major cost grid anchored at (0, 0).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawCostMap")
)]
pub struct CostMap {
    width: i32,
    height: i32,
    costs: Vec<i32>,
    wrap: Wrap,
}

impl CostMap {
    /// Create a map where every cell costs 1.
    pub fn new(width: i32, height: i32) -> Self {
        Self::uniform(width, height, 1)
    }

    /// Create a map where every cell has the given cost, which must be
    /// positive.
    pub fn filled(width: i32, height: i32, cost: i32) -> Result<Self, CostMapError> {
        if cost <= 0 {
            return Err(CostMapError::InvalidCost {
                pos: Point::new(0, 0),
                cost,
            });
        }
        Ok(Self::uniform(width, height, cost))
    }

    fn uniform(width: i32, height: i32, cost: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            costs: vec![cost; width as usize * height as usize],
            wrap: Wrap::NONE,
        }
    }

    /// Set the wrap mode.
    pub fn with_wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = wrap;
        self
    }

    /// Parse a map from ASCII text, one line per row.
    ///
    /// `'1'..='9'` are costs, `'.'` costs 1, and `'#'`, `'X'`, `'0'` are
    /// impassable. Surrounding whitespace of the whole text is ignored; every
    /// line must have the same width.
    pub fn from_text(s: &str) -> Result<Self, CostMapError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CostMapError::Empty);
        }
        let mut width: Option<i32> = None;
        let mut height = 0;
        let mut costs = Vec::new();
        for (y, line) in s.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            let mut x = 0;
            for ch in line.chars() {
                let cost = match ch {
                    '.' => 1,
                    '#' | 'X' | '0' => IMPASSABLE,
                    '1'..='9' => ch as i32 - '0' as i32,
                    _ => {
                        return Err(CostMapError::InvalidCell {
                            ch,
                            pos: Point::new(x, y as i32),
                        });
                    }
                };
                costs.push(cost);
                x += 1;
            }
            match width {
                None => width = Some(x),
                Some(w) if w != x => {
                    return Err(CostMapError::InconsistentWidth {
                        line: y,
                        expected: w,
                        found: x,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }
        Ok(Self {
            width: width.unwrap_or(0),
            height,
            costs,
            wrap: Wrap::NONE,
        })
    }

    /// Set the cost of entering `p`.
    ///
    /// Costs must be positive; use [`set_impassable`](Self::set_impassable)
    /// for walls. Points outside the map are ignored.
    pub fn set_cost(&mut self, p: Point, cost: i32) -> Result<(), CostMapError> {
        if cost <= 0 {
            return Err(CostMapError::InvalidCost { pos: p, cost });
        }
        if let Some(c) = self.cell_mut(p) {
            *c = cost;
        }
        Ok(())
    }

    /// Mark `p` as impassable. Points outside the map are ignored.
    pub fn set_impassable(&mut self, p: Point) {
        if let Some(c) = self.cell_mut(p) {
            *c = IMPASSABLE;
        }
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if !self.range().contains(p) {
            return None;
        }
        Some(p.y as usize * self.width as usize + p.x as usize)
    }

    fn cell_mut(&mut self, p: Point) -> Option<&mut i32> {
        let i = self.index(p)?;
        self.costs.get_mut(i)
    }
}

/// Serialized form of a [`CostMap`], checked before it becomes one.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCostMap {
    width: i32,
    height: i32,
    costs: Vec<i32>,
    #[serde(default)]
    wrap: Wrap,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCostMap> for CostMap {
    type Error = CostMapError;

    fn try_from(raw: RawCostMap) -> Result<Self, Self::Error> {
        let width = raw.width.max(0);
        let height = raw.height.max(0);
        let expected = width as usize * height as usize;
        if raw.costs.len() != expected {
            return Err(CostMapError::SizeMismatch {
                expected,
                found: raw.costs.len(),
            });
        }
        if let Some(i) = raw.costs.iter().position(|&c| c <= 0) {
            let w = width as usize;
            return Err(CostMapError::InvalidCost {
                pos: Point::new((i % w) as i32, (i / w) as i32),
                cost: raw.costs[i],
            });
        }
        Ok(Self {
            width,
            height,
            costs: raw.costs,
            wrap: raw.wrap,
        })
    }
}

impl CostGrid for CostMap {
    fn range(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    fn cost(&self, p: Point) -> i32 {
        self.index(p)
            .and_then(|i| self.costs.get(i).copied())
            .unwrap_or(IMPASSABLE)
    }

    fn wrap(&self) -> Wrap {
        self.wrap
    }
}

impl fmt::Display for CostMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                f.write_str("\n")?;
            }
            for x in 0..self.width {
                let ch = match self.cost(Point::new(x, y)) {
                    IMPASSABLE => '#',
                    c @ 1..=9 => char::from(b'0' + c as u8),
                    _ => '+',
                };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Errors that can occur when building a [`CostMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostMapError {
    /// The text contained no cells.
    Empty,
    /// A line is wider or narrower than the first one.
    InconsistentWidth {
        line: usize,
        expected: i32,
        found: i32,
    },
    /// A character with no cost meaning was found.
    InvalidCell { ch: char, pos: Point },
    /// A non-positive cost was given for a passable cell.
    InvalidCost { pos: Point, cost: i32 },
    /// Stored costs do not cover the map exactly.
    SizeMismatch { expected: usize, found: usize },
}

impl fmt::Display for CostMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("cost map: no cells"),
            Self::InconsistentWidth {
                line,
                expected,
                found,
            } => write!(
                f,
                "cost map: line {line} has width {found}, expected {expected}"
            ),
            Self::InvalidCell { ch, pos } => {
                write!(f, "cost map: invalid cell \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::InvalidCost { pos, cost } => {
                write!(f, "cost map: cost {cost} at {pos} must be positive")
            }
            Self::SizeMismatch { expected, found } => {
                write!(f, "cost map: {found} costs for {expected} cells")
            }
        }
    }
}

impl std::error::Error for CostMapError {}
