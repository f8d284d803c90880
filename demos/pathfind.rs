//! Background path searches on a square grid with scattered obstacles.
//!
//! Run: cargo run --bin pathfind [seed]

use std::error::Error;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use polygrid_demos::{HEIGHT, WIDTH, render, render_costs, scatter_obstacles, square_grid};
use polygrid_grid::Grid;
use polygrid_paths::{Outcome, PathResponse, PathService, ServiceConfig};
use rand::prelude::*;

const REQUESTS: usize = 3;
const DENSITY: f64 = 0.22;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let seed = std::env::args()
        .nth(1)
        .map(|s| s.parse::<u64>())
        .transpose()?
        .unwrap_or(42);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut grid = square_grid()?;
    let corners = [0, (WIDTH * HEIGHT - 1) as usize];
    let blocked = scatter_obstacles(&mut grid, &mut rng, DENSITY, &corners);
    println!("seed {seed}: {WIDTH}x{HEIGHT} grid, {blocked} blocked tiles\n");

    let grid = Arc::new(RwLock::new(grid));
    let service = PathService::new(ServiceConfig::default())?;

    let mut pending = 0;
    for _ in 0..REQUESTS {
        let (start, target) = {
            let g = grid.read().map_err(|_| "grid lock poisoned")?;
            let a = random_floor(&g, &mut rng);
            let b = random_floor(&g, &mut rng);
            (g.world_position(a), g.world_position(b))
        };
        let view = grid.clone();
        service.submit_path(&grid, start, target, move |r| show_path(&view, r))?;
        pending += 1;
    }

    let view = grid.clone();
    let root = grid.read().map_err(|_| "grid lock poisoned")?.world_position(0);
    service.submit_reachability(&grid, root, move |r| show_costs(&view, r))?;
    pending += 1;

    while pending > 0 {
        let ran = service.pump_wait(Duration::from_secs(5));
        if ran == 0 {
            return Err("timed out waiting for the path worker".into());
        }
        pending -= ran;
    }
    Ok(())
}

fn random_floor<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> usize {
    let floor: Vec<usize> = (0..grid.len()).filter(|&t| grid.is_walkable(t)).collect();
    floor.choose(rng).copied().unwrap_or(0)
}

fn show_path(grid: &RwLock<Grid>, response: PathResponse) {
    let Ok(g) = grid.read() else {
        return;
    };
    println!("request {}:", response.id);
    match response.result {
        Ok(Outcome::Path(found)) => {
            let corners: Vec<usize> = found
                .waypoints
                .iter()
                .filter_map(|&p| g.tile_index_at(p))
                .collect();
            println!(
                "{} tiles, {} waypoints, cost {}",
                found.tiles.len(),
                found.waypoints.len(),
                found
                    .tiles
                    .windows(2)
                    .map(|p| g.edge_distance(p[0], p[1]))
                    .sum::<i32>()
            );
            let inner = corners.get(1..corners.len().saturating_sub(1)).unwrap_or(&[]);
            print!("{}", render(&g, &found.tiles, inner));
        }
        Ok(Outcome::NoPath) => println!("no path to tile {:?}", response.target),
        Ok(Outcome::Reach(_)) => {}
        Err(e) => println!("failed: {e}"),
    }
    println!();
}

fn show_costs(grid: &RwLock<Grid>, response: PathResponse) {
    let Ok(g) = grid.read() else {
        return;
    };
    match response.result {
        Ok(Outcome::Reach(tree)) => {
            println!(
                "request {}: {} tiles reach tile {}",
                response.id,
                tree.reached(),
                tree.root()
            );
            print!("{}", render_costs(&g, &tree));
        }
        Ok(_) => {}
        Err(e) => println!("request {} failed: {e}", response.id),
    }
}
