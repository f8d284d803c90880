//! Generate each polygon tiling, check it, and run a few queries on it.
//!
//! Run: cargo run --bin tilings

use std::error::Error;

use polygrid_core::Vec3;
use polygrid_grid::{Grid, GridConfig, Shape};
use polygrid_paths::{PathFinder, simplify_path};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    // A square standing on one corner.
    let diamond = vec![
        Vec3::flat(0.0, 0.5),
        Vec3::flat(0.5, 0.0),
        Vec3::flat(0.0, -0.5),
        Vec3::flat(-0.5, 0.0),
    ];

    let shapes = [
        Shape::Square {
            width: 12,
            height: 8,
        },
        Shape::Hex { layers: 6 },
        Shape::Triangle { layers: 6 },
        Shape::Polygon {
            corners: diamond,
            layers: 5,
            symmetric: true,
        },
    ];

    let mut finder = PathFinder::new();
    for shape in shapes {
        let grid = Grid::generate(GridConfig::with_shape(shape))?;
        describe(&grid, &mut finder)?;
    }
    Ok(())
}

fn describe(grid: &Grid, finder: &mut PathFinder) -> Result<(), Box<dyn Error>> {
    let report = grid.validate();
    println!("{}: {} tiles", grid.type_tag(), grid.len());
    println!(
        "  valid: {} ({} asymmetric links, {} overlaps)",
        report.is_valid(),
        report.asymmetric.len(),
        report.overlapping.len()
    );

    let far = grid.len() - 1;
    println!("  distance 0 -> {far}: {}", grid.distance(0, far));
    if let Some(path) = finder.find_path(grid, 0, far) {
        let waypoints = simplify_path(grid, &path);
        println!(
            "  path 0 -> {far}: {} tiles, {} waypoints",
            path.len(),
            waypoints.len()
        );
    }

    let probe = grid.world_position(far);
    println!("  tile under {probe}: {:?}", grid.tile_index_at(probe));

    let tree = finder.reachability(grid, 0)?;
    println!("  reachable from 0: {}", tree.reached());

    let record = grid.to_record()?;
    let mut copy = Grid::new(grid.config().clone())?;
    copy.load_record(&record)?;
    println!("  reloaded {} tiles from record\n", copy.len());
    Ok(())
}
