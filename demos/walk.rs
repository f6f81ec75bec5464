//! Walk a text cost map from one cell to another.
//!
//! Run: cargo run --bin walk -- demos/maps/courtyard.txt --from 0,0 --to 4,4
//! Set RUST_LOG=debug (or trace) to see the search.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use waystep_core::Point;
use waystep_demos::{Walker, load_config, load_map, parse_point};
use waystep_paths::{CostGrid, SearchConfig, Wrap};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The text cost map ('.' or 1-9 passable, '#' blocked).
    map: PathBuf,

    /// Starting cell as x,y.
    #[arg(long, value_parser = parse_point)]
    from: Point,

    /// Destination cell as x,y.
    #[arg(long, value_parser = parse_point)]
    to: Point,

    /// JSON file with search settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Give up after this many ticks.
    #[arg(long, default_value_t = 1000)]
    max_ticks: usize,

    /// Let the map wrap around horizontally.
    #[arg(long)]
    wrap_x: bool,

    /// Let the map wrap around vertically.
    #[arg(long)]
    wrap_y: bool,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let grid = load_map(&args.map)?.with_wrap(Wrap {
        horizontal: args.wrap_x,
        vertical: args.wrap_y,
    });
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SearchConfig::default(),
    };

    let start = grid.clamp(args.from);
    let mut walker = Walker::new(start, config);
    let outcome = walker.set_destination(&grid, args.to);
    println!(
        "{} -> {}: {} cells, {} expanded{}",
        start,
        grid.clamp(args.to),
        outcome.route.len(),
        outcome.expanded,
        if outcome.reached_goal { "" } else { " (goal unreachable)" }
    );

    for tick in walker.walk(&grid, args.max_ticks) {
        println!(
            "{:>4}  {} {:<5}  {}",
            tick.step,
            tick.direction.code(),
            tick.direction,
            tick.pos
        );
    }
    println!("final position: {}", walker.pos());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
