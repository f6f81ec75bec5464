//! A* route search on weighted 2D grids.
//!
//! A search runs once, start to finish, and produces a [`Route`]: the cells
//! to walk from just after the start to the goal. A [`RouteCursor`] then
//! drains the route one [`Direction`](waystep_core::Direction) per tick.
//!
//! When the goal cannot be reached the search does not fail; the route leads
//! to the closest cell (by heuristic) it managed to expand.
//!
//! | Piece | Role |
//! |---|---|
//! | [`CostGrid`] / [`CostMap`] | per-cell entry cost, bounds, wrap, distance |
//! | [`SearchNode`] | per-search record: g, h, parent key |
//! | [`Frontier`] | open/closed sets with relaxation |
//! | [`PathSearch`] | the expansion loop and route reconstruction |
//! | [`RouteCursor`] | one direction per query |
//!
//! ```
//! use waystep_core::{Direction, Point};
//! use waystep_paths::{CostMap, RouteCursor, find_route};
//!
//! let grid = CostMap::new(5, 5);
//! let start = Point::new(0, 0);
//! let out = find_route(&grid, start, Point::new(2, 0));
//! let mut cursor = RouteCursor::new(out.route);
//! assert_eq!(cursor.next_direction(&grid, start), Direction::Right);
//! ```

mod config;
mod cursor;
mod distance;
mod frontier;
mod grid;
mod node;
mod search;

pub use config::SearchConfig;
pub use cursor::{Route, RouteCursor};
pub use distance::{manhattan, wrapped_delta};
pub use frontier::{Frontier, Relaxation, TieBreak};
pub use grid::{CostGrid, CostMap, CostMapError, IMPASSABLE, Wrap};
pub use node::SearchNode;
pub use search::{PathSearch, SearchOutcome, SearchState, find_route};
