use polygrid_core::Vec3;

use crate::traits::Topology;

/// Squared tolerance when comparing two step directions.
const DIRECTION_EPSILON: f32 = 1e-10;

/// Collapse a tile chain into world-space waypoints.
///
/// Keeps the first and last tiles and every tile where the travel direction
/// changes. An empty chain yields no waypoints.
pub fn simplify_path<T: Topology + ?Sized>(topo: &T, tiles: &[usize]) -> Vec<Vec3> {
    let Some((&first, rest)) = tiles.split_first() else {
        return Vec::new();
    };

    let mut out = vec![topo.position(first)];
    let mut prev = out[0];
    let mut heading: Option<Vec3> = None;

    for &tile in rest {
        let pos = topo.position(tile);
        let dir = (pos - prev).normalized();
        if heading.is_some_and(|h| !h.approx_eq(dir, DIRECTION_EPSILON)) {
            out.push(prev);
        }
        heading = Some(dir);
        prev = pos;
    }

    if !rest.is_empty() {
        out.push(prev);
    }
    out
}
