use waystep_core::Point;

use crate::grid::{CostGrid, IMPASSABLE};

/// Per-search record for one grid cell.
///
/// Nodes are plain values: the predecessor is stored as a position key and
/// resolved through the [`Frontier`](crate::Frontier) arena, so the parent
/// links always form a tree rooted at the start cell. Two nodes are equal when
/// their positions are.
#[derive(Copy, Clone, Debug)]
pub struct SearchNode {
    pos: Point,
    move_cost: i32,
    cost_to_start: i32,
    heuristic_cost: i32,
    parent: Option<Point>,
    goal_fixed: bool,
}

impl SearchNode {
    /// Create a node for `p`, reading its entry cost from `grid`.
    pub fn new<G: CostGrid + ?Sized>(p: Point, grid: &G) -> Self {
        Self {
            pos: p,
            move_cost: grid.cost(p),
            cost_to_start: 0,
            heuristic_cost: 0,
            parent: None,
            goal_fixed: false,
        }
    }

    /// Build the node reached by stepping from `from` onto `p`, with its
    /// heuristic fixed against `goal`.
    ///
    /// `cost_to_start` is the absolute total through `from`; it saturates to
    /// [`IMPASSABLE`] when `p` cannot be entered.
    pub fn step_from<G: CostGrid + ?Sized>(
        p: Point,
        from: &SearchNode,
        goal: Point,
        grid: &G,
    ) -> Self {
        let mut node = Self::new(p, grid);
        node.set_goal(goal, grid);
        node.set_cost_to_start(node.move_cost.saturating_add(from.cost_to_start));
        node.set_parent(Some(from.pos));
        node
    }

    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.pos.y
    }

    /// Position of the predecessor on the best known path, if any.
    #[inline]
    pub fn parent(&self) -> Option<Point> {
        self.parent
    }

    #[inline]
    pub fn move_cost(&self) -> i32 {
        self.move_cost
    }

    /// Cost of the best known path from the start (g).
    #[inline]
    pub fn cost_to_start(&self) -> i32 {
        self.cost_to_start
    }

    /// Estimated remaining cost to the goal (h).
    #[inline]
    pub fn heuristic_cost(&self) -> i32 {
        self.heuristic_cost
    }

    /// Ordering key f = g + h. Saturates at [`IMPASSABLE`].
    #[inline]
    pub fn total_cost(&self) -> i32 {
        self.cost_to_start.saturating_add(self.heuristic_cost)
    }

    #[inline]
    pub fn is_passable(&self) -> bool {
        self.move_cost != IMPASSABLE
    }

    /// Fix the heuristic against `goal` using the grid's distance estimate.
    ///
    /// Must be called at most once, before the node is inserted anywhere.
    pub fn set_goal<G: CostGrid + ?Sized>(&mut self, goal: Point, grid: &G) {
        debug_assert!(!self.goal_fixed, "heuristic of {} fixed twice", self.pos);
        self.heuristic_cost = grid.distance(self.pos, goal);
        self.goal_fixed = true;
    }

    /// Assign g. Always the absolute recomputed total, never an increment.
    #[inline]
    pub fn set_cost_to_start(&mut self, g: i32) {
        self.cost_to_start = g;
    }

    #[inline]
    pub fn set_parent(&mut self, parent: Option<Point>) {
        self.parent = parent;
    }

    /// Same cell as `other`.
    #[inline]
    pub fn equal(&self, other: &SearchNode) -> bool {
        self.pos == other.pos
    }

    /// Whichever of the two nodes has the lower heuristic; `other` on a tie.
    #[inline]
    pub fn closer(self, other: SearchNode) -> SearchNode {
        if self.heuristic_cost < other.heuristic_cost {
            self
        } else {
            other
        }
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for SearchNode {}
