use std::collections::VecDeque;

use waystep_core::{Direction, Point};

use crate::grid::CostGrid;

/// Ordered cells from just after the start to the goal, or to the closest
/// reachable cell when the goal could not be reached.
///
/// The route also remembers the goal that was asked for, which may differ
/// from its last cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    cells: VecDeque<Point>,
    goal: Point,
}

impl Route {
    pub fn new(cells: impl IntoIterator<Item = Point>, goal: Point) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            goal,
        }
    }

    /// The goal that was requested.
    #[inline]
    pub fn goal(&self) -> Point {
        self.goal
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First unconsumed cell.
    #[inline]
    pub fn first(&self) -> Option<Point> {
        self.cells.front().copied()
    }

    /// Where the route ends.
    #[inline]
    pub fn last(&self) -> Option<Point> {
        self.cells.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().copied()
    }

    /// Remaining cells as a vector.
    pub fn cells(&self) -> Vec<Point> {
        self.iter().collect()
    }

    /// Remove and return the first cell.
    pub fn pop_front(&mut self) -> Option<Point> {
        self.cells.pop_front()
    }
}

/// Drains a [`Route`] one direction per query.
///
/// The cursor is owned by a single mover; each call consumes one waypoint
/// whether or not the mover actually manages to take the step.
#[derive(Clone, Debug, Default)]
pub struct RouteCursor {
    route: Route,
}

impl RouteCursor {
    pub fn new(route: Route) -> Self {
        Self { route }
    }

    /// The unconsumed part of the route.
    #[inline]
    pub fn remaining(&self) -> &Route {
        &self.route
    }

    #[inline]
    pub fn goal(&self) -> Point {
        self.route.goal()
    }

    /// Whether every waypoint has been consumed.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.route.is_empty()
    }

    /// Consume the next waypoint and return the step that leads from
    /// `current` towards it.
    ///
    /// Offsets are checked in the fixed order down, left, right, up, so a
    /// waypoint that is both below and left of `current` yields
    /// [`Direction::Down`]. When the waypoint is `current` itself, the step
    /// is chosen by comparing `current` with the goal instead, along the
    /// axis with the larger offset (vertical on a tie). Returns
    /// [`Direction::None`] once the route is drained or nothing is left to
    /// close.
    pub fn next_direction<G: CostGrid + ?Sized>(&mut self, grid: &G, current: Point) -> Direction {
        let Some(waypoint) = self.route.pop_front() else {
            return Direction::None;
        };

        let dx = grid.delta_x(waypoint, current);
        let dy = grid.delta_y(waypoint, current);
        if dy > 0 {
            return Direction::Down;
        } else if dx < 0 {
            return Direction::Left;
        } else if dx > 0 {
            return Direction::Right;
        } else if dy < 0 {
            return Direction::Up;
        }

        let goal = self.route.goal();
        let gx = grid.delta_x(current, goal);
        let gy = grid.delta_y(current, goal);
        if gx.abs() > gy.abs() {
            if gx > 0 { Direction::Left } else { Direction::Right }
        } else if gy != 0 {
            if gy > 0 { Direction::Up } else { Direction::Down }
        } else {
            Direction::None
        }
    }
}

impl From<Route> for RouteCursor {
    fn from(route: Route) -> Self {
        Self::new(route)
    }
}
