use std::path::Path;

use waystep_core::{Direction, Point};
use waystep_demos::{Walker, load_config, load_map};
use waystep_paths::{CostGrid, CostMap, SearchConfig};

fn courtyard() -> CostMap {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("maps/courtyard.txt");
    load_map(&path).unwrap()
}

#[test]
fn walks_into_the_courtyard_through_the_gate() {
    let grid = courtyard();
    let mut walker = Walker::new(Point::new(0, 0), SearchConfig::default());
    let outcome = walker.set_destination(&grid, Point::new(2, 2));
    assert!(outcome.reached_goal);
    assert_eq!(outcome.route.len(), 20);
    assert!(outcome.route.iter().any(|p| p == Point::new(5, 6)));

    let ticks = walker.walk(&grid, 100);
    assert_eq!(ticks.len(), 21);
    assert!(ticks[..20].iter().all(|t| !t.direction.is_none()));
    assert_eq!(ticks[20].direction, Direction::None);
    assert_eq!(walker.pos(), Point::new(2, 2));
    assert!(walker.is_idle());
}

#[test]
fn unreachable_destination_stops_next_to_it() {
    let grid = courtyard();
    let goal = Point::new(4, 4);
    assert!(!grid.is_passable(goal));

    let mut walker = Walker::new(Point::new(9, 7), SearchConfig::default());
    let outcome = walker.set_destination(&grid, goal);
    assert!(!outcome.reached_goal);

    let ticks = walker.walk(&grid, 100);
    assert_eq!(ticks.last().map(|t| t.direction), Some(Direction::None));
    assert_eq!(grid.distance(walker.pos(), goal), 1);
    assert_eq!(Some(walker.pos()), outcome.route.last());
}

#[test]
fn blocked_steps_are_skipped_without_replanning() {
    let open = CostMap::new(5, 1);
    let mut walker = Walker::new(Point::new(0, 0), SearchConfig::default());
    walker.set_destination(&open, Point::new(4, 0));
    assert_eq!(walker.remaining().len(), 4);

    let mut blocked = open.clone();
    blocked.set_impassable(Point::new(2, 0));
    let dirs: Vec<_> = walker.walk(&blocked, 10).iter().map(|t| t.direction).collect();
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
    assert_eq!(walker.pos(), Point::new(1, 0));
}

#[test]
fn new_destination_replaces_route() {
    let grid = CostMap::new(6, 6);
    let mut walker = Walker::new(Point::new(0, 0), SearchConfig::default());
    walker.set_destination(&grid, Point::new(5, 0));
    walker.tick(&grid);
    assert_eq!(walker.pos(), Point::new(1, 0));

    walker.set_destination(&grid, Point::new(1, 3));
    assert_eq!(walker.remaining().len(), 3);
    let ticks = walker.walk(&grid, 10);
    assert_eq!(
        ticks.iter().map(|t| t.direction.code()).collect::<Vec<_>>(),
        vec![2, 2, 2, 0]
    );
    assert_eq!(walker.pos(), Point::new(1, 3));
}

#[test]
fn bundled_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("maps/config.json");
    let cfg = load_config(&path).unwrap();
    assert_eq!(cfg.max_expansions, Some(10000));
    assert_eq!(cfg, SearchConfig::default().with_max_expansions(10000));
}
