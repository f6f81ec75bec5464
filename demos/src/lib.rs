//! A grid walker driven by waystep route searches.
//!
//! [`Walker`] plays the mover: it asks for a route once per destination and
//! then takes at most one step per [`tick`](Walker::tick), following the
//! directions handed out by its [`RouteCursor`].

use std::error::Error;
use std::fs;
use std::path::Path;

use log::{debug, info};
use waystep_core::{Direction, Point};
use waystep_paths::{CostGrid, CostMap, PathSearch, Route, RouteCursor, SearchConfig, SearchOutcome};

/// One simulation step as recorded by [`Walker::walk`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tick {
    pub step: usize,
    pub direction: Direction,
    pub pos: Point,
}

/// A mover that owns its own search and route cursor.
#[derive(Debug)]
pub struct Walker {
    pos: Point,
    search: PathSearch,
    cursor: RouteCursor,
}

impl Walker {
    pub fn new(pos: Point, config: SearchConfig) -> Self {
        Self {
            pos,
            search: PathSearch::new(config),
            cursor: RouteCursor::default(),
        }
    }

    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Unconsumed part of the current route.
    #[inline]
    pub fn remaining(&self) -> &Route {
        self.cursor.remaining()
    }

    /// Whether the current route has been fully consumed.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.cursor.is_finished()
    }

    /// Search a route from the current position to `goal`, replacing any
    /// route still being followed.
    pub fn set_destination<G: CostGrid + ?Sized>(&mut self, grid: &G, goal: Point) -> SearchOutcome {
        let outcome = self.search.find_route(grid, self.pos, goal);
        if !outcome.reached_goal {
            info!(
                "{} cannot reach {goal}; heading for {:?}",
                self.pos,
                outcome.route.last()
            );
        }
        self.cursor = RouteCursor::new(outcome.route.clone());
        outcome
    }

    /// Ask for the next direction and step one cell that way.
    ///
    /// The walker stays put on [`Direction::None`] or when the target cell is
    /// impassable.
    pub fn tick<G: CostGrid + ?Sized>(&mut self, grid: &G) -> Direction {
        let dir = self.cursor.next_direction(grid, self.pos);
        if dir.is_none() {
            return dir;
        }
        let next = grid.neighbor(self.pos, dir);
        if grid.is_passable(next) {
            self.pos = next;
        } else {
            debug!("{} blocked moving {dir} into {next}", self.pos);
        }
        dir
    }

    /// Tick until the cursor reports no movement or `max_ticks` is reached.
    ///
    /// The final no-movement tick is included in the trace.
    pub fn walk<G: CostGrid + ?Sized>(&mut self, grid: &G, max_ticks: usize) -> Vec<Tick> {
        let mut ticks = Vec::new();
        for step in 0..max_ticks {
            let direction = self.tick(grid);
            ticks.push(Tick {
                step,
                direction,
                pos: self.pos,
            });
            if direction.is_none() {
                break;
            }
        }
        ticks
    }
}

/// Parse an `x,y` pair.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got \u{201c}{s}\u{201d}"))?;
    let x = x.trim().parse::<i32>().map_err(|e| format!("bad x in {s}: {e}"))?;
    let y = y.trim().parse::<i32>().map_err(|e| format!("bad y in {s}: {e}"))?;
    Ok(Point::new(x, y))
}

/// Load a text cost map from disk.
pub fn load_map(path: &Path) -> Result<CostMap, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(CostMap::from_text(&text)?)
}

/// Load a JSON search configuration from disk. Missing fields take their
/// defaults.
pub fn load_config(path: &Path) -> Result<SearchConfig, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
