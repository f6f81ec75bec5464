use std::collections::VecDeque;
use std::fmt;

use log::{debug, trace, warn};
use waystep_core::{Direction, Point};

use crate::config::SearchConfig;
use crate::cursor::Route;
use crate::frontier::{Frontier, Relaxation};
use crate::grid::{CostGrid, IMPASSABLE};
use crate::node::SearchNode;

/// Phase of a [`PathSearch`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchState {
    #[default]
    Init,
    Expanding,
    GoalFound,
    Exhausted,
    RouteBuilt,
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::Expanding => "expanding",
            Self::GoalFound => "goal found",
            Self::Exhausted => "exhausted",
            Self::RouteBuilt => "route built",
        };
        f.write_str(s)
    }
}

/// Result of one [`PathSearch::find_route`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Cells to walk, start excluded.
    pub route: Route,
    /// `false` when the route only approaches the goal.
    pub reached_goal: bool,
    /// Number of nodes whose neighbours were generated.
    pub expanded: usize,
}

/// A* route search over a [`CostGrid`].
///
/// Each [`find_route`](Self::find_route) call runs one complete search. The
/// node arena is kept between calls and invalidated by generation, so a
/// mover can hold on to a single `PathSearch`.
///
/// An unreachable goal is not an error: the route then leads to the expanded
/// cell with the lowest heuristic, a best-effort approach point.
#[derive(Debug, Default)]
pub struct PathSearch {
    config: SearchConfig,
    frontier: Frontier,
    state: SearchState,
}

impl PathSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            frontier: Frontier::default(),
            state: SearchState::Init,
        }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Phase reached by the last search.
    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Open and closed sets left by the last search.
    #[inline]
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Search a route from `start` to `goal`. Both are clamped to the grid.
    pub fn find_route<G: CostGrid + ?Sized>(
        &mut self,
        grid: &G,
        start: Point,
        goal: Point,
    ) -> SearchOutcome {
        self.find_route_visiting(grid, start, goal, |_| {})
    }

    /// Like [`find_route`](Self::find_route), calling `visit` with every node
    /// taken off the open set, in order.
    pub fn find_route_visiting<G: CostGrid + ?Sized>(
        &mut self,
        grid: &G,
        start: Point,
        goal: Point,
        mut visit: impl FnMut(&SearchNode),
    ) -> SearchOutcome {
        let start = grid.clamp(start);
        let goal = grid.clamp(goal);

        self.transition(SearchState::Init);
        self.frontier.reset(grid.range(), self.config.tie_break);

        let mut start_node = SearchNode::new(start, grid);
        start_node.set_goal(goal, grid);
        start_node.set_cost_to_start(0);
        self.frontier.insert_sorted(start_node);

        let mut best = start_node;
        let mut expanded = 0;

        self.transition(SearchState::Expanding);
        let seed = loop {
            let Some(current) = self.frontier.pop_best() else {
                self.transition(SearchState::Exhausted);
                break best;
            };
            visit(&current);

            if current.pos() == goal {
                self.transition(SearchState::GoalFound);
                break current;
            }

            best = best.closer(current);

            if self.config.max_expansions.is_some_and(|limit| expanded >= limit) {
                warn!(
                    "route search {start} -> {goal}: expansion budget of {expanded} spent, \
                     settling for {}",
                    best.pos()
                );
                self.transition(SearchState::Exhausted);
                break best;
            }

            self.expand(grid, &current, goal);
            expanded += 1;
        };

        let reached_goal = self.state == SearchState::GoalFound;
        let route = self.build_route(seed, start, goal, grid.range().len());
        self.transition(SearchState::RouteBuilt);

        if reached_goal {
            debug!(
                "route search {start} -> {goal}: {} cells, cost {}, {expanded} expanded",
                route.len(),
                seed.cost_to_start()
            );
        } else {
            debug!(
                "route search {start} -> {goal}: unreachable, approaching {} \
                 ({} cells, {expanded} expanded)",
                seed.pos(),
                route.len()
            );
        }

        SearchOutcome {
            route,
            reached_goal,
            expanded,
        }
    }

    fn expand<G: CostGrid + ?Sized>(&mut self, grid: &G, current: &SearchNode, goal: Point) {
        for dir in Direction::CARDINALS {
            let np = grid.neighbor(current.pos(), dir);
            let candidate = SearchNode::step_from(np, current, goal, grid);
            if candidate.total_cost() == IMPASSABLE {
                continue;
            }
            let outcome = if self.frontier.is_closed(np) || self.frontier.is_open(np) {
                self.frontier.relax_if_cheaper(candidate)
            } else {
                self.frontier.insert_sorted(candidate);
                Relaxation::Inserted
            };
            if outcome != Relaxation::Discarded {
                trace!(
                    "{np}: {outcome:?} via {} (g={}, f={})",
                    current.pos(),
                    candidate.cost_to_start(),
                    candidate.total_cost()
                );
            }
        }
    }

    /// Walk parent links from `seed` back to `start`.
    fn build_route(&self, seed: SearchNode, start: Point, goal: Point, max_hops: usize) -> Route {
        let mut cells = VecDeque::new();
        cells.push_front(seed.pos());
        if seed.pos() == start {
            return Route::new(cells, goal);
        }

        let mut node = seed;
        while let Some(parent) = node.parent() {
            if parent == start {
                break;
            }
            if cells.len() > max_hops {
                debug_assert!(false, "parent chain from {} does not reach {start}", seed.pos());
                break;
            }
            let Some(next) = self.frontier.node(parent) else {
                break;
            };
            cells.push_front(parent);
            node = *next;
        }
        Route::new(cells, goal)
    }

    fn transition(&mut self, next: SearchState) {
        trace!("search state: {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Run a one-off search with the default configuration.
pub fn find_route<G: CostGrid + ?Sized>(grid: &G, start: Point, goal: Point) -> SearchOutcome {
    PathSearch::default().find_route(grid, start, goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouteCursor;
    use crate::frontier::TieBreak;
    use crate::grid::{CostMap, Wrap};
    use rand::{RngExt, SeedableRng};

    fn pts(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn assert_connected<G: CostGrid>(grid: &G, start: Point, route: &Route) {
        let mut prev = start;
        for p in route.iter() {
            assert_eq!(grid.distance(prev, p), 1, "{prev} -> {p} is not one step");
            assert!(grid.is_passable(p), "{p} is impassable");
            prev = p;
        }
    }

    /// Step a mover along the cursor until it reports no movement.
    fn walk<G: CostGrid>(grid: &G, start: Point, route: Route) -> (Point, Vec<Direction>) {
        let mut cursor = RouteCursor::new(route);
        let mut pos = start;
        let mut dirs = Vec::new();
        loop {
            let d = cursor.next_direction(grid, pos);
            dirs.push(d);
            if d.is_none() {
                return (pos, dirs);
            }
            let next = grid.neighbor(pos, d);
            if grid.is_passable(next) {
                pos = next;
            }
        }
    }

    #[test]
    fn straight_line_on_uniform_grid() {
        let grid = CostMap::new(5, 5);
        let start = Point::new(0, 0);
        let out = find_route(&grid, start, Point::new(4, 0));
        assert!(out.reached_goal);
        assert_eq!(out.route.cells(), pts(&[(1, 0), (2, 0), (3, 0), (4, 0)]));

        let (end, dirs) = walk(&grid, start, out.route);
        assert_eq!(end, Point::new(4, 0));
        assert_eq!(
            dirs,
            vec![
                Direction::Right,
                Direction::Right,
                Direction::Right,
                Direction::Right,
                Direction::None
            ]
        );
    }

    #[test]
    fn detours_around_a_blocked_cell() {
        let mut grid = CostMap::new(5, 5);
        grid.set_impassable(Point::new(2, 0));
        let start = Point::new(0, 0);
        let out = find_route(&grid, start, Point::new(4, 0));
        assert!(out.reached_goal);
        assert_eq!(out.route.len(), 6);
        assert_eq!(out.route.last(), Some(Point::new(4, 0)));
        assert!(!out.route.iter().any(|p| p == Point::new(2, 0)));
        assert_connected(&grid, start, &out.route);
    }

    #[test]
    fn impassable_goal_is_approached() {
        let mut grid = CostMap::new(5, 5);
        let goal = Point::new(4, 0);
        grid.set_impassable(goal);
        let start = Point::new(0, 0);
        let mut search = PathSearch::default();
        let out = search.find_route(&grid, start, goal);
        assert!(!out.reached_goal);
        assert_eq!(search.state(), SearchState::RouteBuilt);

        let last = out.route.last().unwrap();
        assert_ne!(last, goal);
        assert_eq!(grid.distance(last, goal), 1);
        assert_eq!(out.route.goal(), goal);
        assert_connected(&grid, start, &out.route);

        let (end, dirs) = walk(&grid, start, out.route.clone());
        assert_eq!(end, last);
        assert_eq!(dirs.len(), out.route.len() + 1);
        assert_eq!(dirs.last(), Some(&Direction::None));
    }

    #[test]
    fn walled_off_goal_settles_on_closest_expanded_cell() {
        let grid = CostMap::from_text(
            "\
.......
.......
....###
....#..
....#..",
        )
        .unwrap();
        let start = Point::new(0, 4);
        let goal = Point::new(6, 4);
        let mut expanded = Vec::new();
        let mut search = PathSearch::default();
        let out = search.find_route_visiting(&grid, start, goal, |n| expanded.push(*n));
        assert!(!out.reached_goal);

        let min_h = expanded.iter().map(|n| n.heuristic_cost()).min().unwrap();
        let last = out.route.last().unwrap();
        assert_eq!(grid.distance(last, goal), min_h);
        assert!(expanded.iter().any(|n| n.pos() == last));
        assert_connected(&grid, start, &out.route);
        // Every reachable cell was expanded exactly once.
        assert_eq!(out.expanded, 7 * 5 - 5 - 4);
    }

    #[test]
    fn start_equal_to_goal() {
        let grid = CostMap::new(3, 3);
        let p = Point::new(1, 1);
        let out = find_route(&grid, p, p);
        assert!(out.reached_goal);
        assert_eq!(out.route.cells(), vec![p]);
        assert_eq!(out.expanded, 0);

        let mut cursor = RouteCursor::new(out.route);
        assert_eq!(cursor.next_direction(&grid, p), Direction::None);
        assert_eq!(cursor.next_direction(&grid, p), Direction::None);
    }

    #[test]
    fn boxed_in_start_yields_single_cell_route() {
        let grid = CostMap::from_text(
            "\
.#...
#....
.....",
        )
        .unwrap();
        let start = Point::new(0, 0);
        let goal = Point::new(4, 2);
        let out = find_route(&grid, start, goal);
        assert!(!out.reached_goal);
        assert_eq!(out.route.cells(), vec![start]);

        // The lone waypoint is the mover's own cell: fall back to the goal.
        let mut cursor = RouteCursor::new(out.route);
        assert_eq!(cursor.next_direction(&grid, start), Direction::Right);
        assert_eq!(cursor.next_direction(&grid, start), Direction::None);
    }

    #[test]
    fn endpoints_are_clamped() {
        let grid = CostMap::new(4, 4);
        let out = find_route(&grid, Point::new(-5, -5), Point::new(10, 0));
        assert!(out.reached_goal);
        assert_eq!(out.route.last(), Some(Point::new(3, 0)));
        assert_eq!(out.route.goal(), Point::new(3, 0));
        assert_eq!(out.route.len(), 3);
    }

    #[test]
    fn prefers_cheaper_cells() {
        let grid = CostMap::from_text(
            "\
.9.
...",
        )
        .unwrap();
        let out = find_route(&grid, Point::new(0, 0), Point::new(2, 0));
        assert_eq!(out.route.cells(), pts(&[(0, 1), (1, 1), (2, 1), (2, 0)]));
    }

    #[test]
    fn route_through_wrapping_seam() {
        let mut grid = CostMap::new(8, 3).with_wrap(Wrap::HORIZONTAL);
        for y in 0..3 {
            grid.set_impassable(Point::new(4, y));
        }
        let start = Point::new(1, 1);
        let out = find_route(&grid, start, Point::new(6, 1));
        assert!(out.reached_goal);
        assert_eq!(out.route.cells(), pts(&[(0, 1), (7, 1), (6, 1)]));

        let (end, dirs) = walk(&grid, start, out.route);
        assert_eq!(end, Point::new(6, 1));
        assert_eq!(&dirs[..3], &[Direction::Left; 3]);
    }

    #[test]
    fn expansion_budget_degrades_to_best_effort() {
        let grid = CostMap::new(20, 20);
        let cfg = SearchConfig::default().with_max_expansions(3);
        let mut search = PathSearch::new(cfg);
        let start = Point::new(0, 0);
        let goal = Point::new(19, 19);
        let out = search.find_route(&grid, start, goal);
        assert!(!out.reached_goal);
        assert_eq!(out.expanded, 3);
        assert!(!out.route.is_empty());
        assert!(grid.distance(out.route.last().unwrap(), goal) < grid.distance(start, goal));
        assert_connected(&grid, start, &out.route);
    }

    #[test]
    fn search_instance_is_reusable() {
        let mut grid = CostMap::new(6, 6);
        grid.set_impassable(Point::new(1, 0));
        let mut search = PathSearch::default();
        let a = search.find_route(&grid, Point::new(0, 0), Point::new(5, 5));
        let b = search.find_route(&grid, Point::new(5, 5), Point::new(0, 0));
        let c = search.find_route(&grid, Point::new(0, 0), Point::new(5, 5));
        assert_eq!(a, c);
        assert_eq!(a.route.len(), 10);
        assert_eq!(b.route.len(), 10);
        assert_eq!(b.route.last(), Some(Point::new(0, 0)));
    }

    #[test]
    fn tie_break_policies_find_equally_short_routes() {
        let grid = CostMap::new(7, 7);
        let start = Point::new(1, 1);
        let goal = Point::new(5, 4);
        for tb in [TieBreak::FirstDiscovered, TieBreak::LastDiscovered] {
            let mut search = PathSearch::new(SearchConfig::default().with_tie_break(tb));
            let out = search.find_route(&grid, start, goal);
            assert!(out.reached_goal);
            assert_eq!(out.route.len(), 7, "{tb:?}");
            assert_connected(&grid, start, &out.route);
        }
    }

    #[test]
    fn uniform_grid_routes_are_manhattan_optimal() {
        let grid = CostMap::new(9, 7);
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut search = PathSearch::default();
        for _ in 0..200 {
            let a = Point::new(rng.random_range(0..9), rng.random_range(0..7));
            let b = Point::new(rng.random_range(0..9), rng.random_range(0..7));
            if a == b {
                continue;
            }
            let out = search.find_route(&grid, a, b);
            assert!(out.reached_goal);
            assert_eq!(out.route.len() as i32, grid.distance(a, b), "{a} -> {b}");
            assert_eq!(out.route.last(), Some(b));
            assert_connected(&grid, a, &out.route);
        }
    }

    #[test]
    fn popped_total_costs_never_decrease() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        for round in 0..40 {
            let mut grid = CostMap::new(12, 10);
            if round % 2 == 1 {
                grid = grid.with_wrap(Wrap::BOTH);
            }
            for p in grid.range() {
                match rng.random_range(0..10) {
                    0 | 1 => grid.set_impassable(p),
                    n => grid.set_cost(p, n).unwrap(),
                }
            }
            let a = Point::new(rng.random_range(0..12), rng.random_range(0..10));
            let b = Point::new(rng.random_range(0..12), rng.random_range(0..10));

            let mut last_f = i32::MIN;
            let mut pops = 0;
            let mut search = PathSearch::default();
            let out = search.find_route_visiting(&grid, a, b, |n| {
                assert!(n.total_cost() >= last_f, "f regressed at {}", n.pos());
                last_f = n.total_cost();
                pops += 1;
            });
            // Bounded by the cell count: the search terminates.
            assert!(pops <= grid.range().len());
            assert!(!out.route.is_empty());
            if out.reached_goal {
                assert_eq!(out.route.last(), Some(b));
            }
            if out.route.first() != Some(a) {
                assert_connected(&grid, a, &out.route);
            }
        }
    }

    #[test]
    fn relaxed_route_cost_matches_cell_costs() {
        let grid = CostMap::from_text(
            "\
1111111
1999991
1111111",
        )
        .unwrap();
        let start = Point::new(0, 1);
        let goal = Point::new(6, 1);
        let mut search = PathSearch::default();
        let out = search.find_route(&grid, start, goal);
        let walked: i32 = out.route.iter().map(|p| grid.cost(p)).sum();
        let g = search.frontier().node(goal).unwrap().cost_to_start();
        assert_eq!(walked, g);
        assert_eq!(g, 8);
    }
}
