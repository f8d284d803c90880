//! Integer cost metrics.
//!
//! Costs are scaled by ten so that one orthogonal step on a unit grid costs
//! 10 and one diagonal step costs 14.

use polygrid_core::Vec3;

/// Cost of `dx` columns and `dy` rows on a rectangular grid: 14 per
/// diagonal step, 10 per straight step.
pub fn diagonal_distance(dx: i32, dy: i32) -> i32 {
    let (x, y) = (dx.abs(), dy.abs());
    if x > y {
        14 * y + 10 * (x - y)
    } else {
        14 * x + 10 * (y - x)
    }
}

/// Straight-line cost between two positions without a square root.
///
/// One Newton step from `(d² + 1) / 2` towards `d`, scaled by 10. Exact at
/// unit distance and close to `10·d` nearby.
pub fn straight_distance(a: Vec3, b: Vec3) -> i32 {
    let s = (a - b).sqr_magnitude();
    let approx = 0.5 * (s + 1.0);
    (5.0 * (approx + s / approx)) as i32
}

/// Cheaper, coarser variant of [`straight_distance`]: `5·(d² + 1)`.
pub fn approx_straight_distance(a: Vec3, b: Vec3) -> i32 {
    (5.0 * ((a - b).sqr_magnitude() + 1.0)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_rule() {
        assert_eq!(diagonal_distance(0, 0), 0);
        assert_eq!(diagonal_distance(1, 0), 10);
        assert_eq!(diagonal_distance(1, 1), 14);
        assert_eq!(diagonal_distance(3, 4), 3 * 14 + 10);
        assert_eq!(diagonal_distance(-4, 3), diagonal_distance(4, -3));
    }

    #[test]
    fn straight_matches_unit_steps() {
        let o = Vec3::ZERO;
        assert_eq!(straight_distance(o, o), 2);
        assert_eq!(straight_distance(o, Vec3::flat(1.0, 0.0)), 10);
        assert_eq!(straight_distance(o, Vec3::flat(1.0, 1.0)), 14);
        assert!(straight_distance(o, Vec3::flat(3.0, 0.0)) > 30);
        assert_eq!(approx_straight_distance(o, Vec3::flat(1.0, 0.0)), 10);
        assert_eq!(approx_straight_distance(o, Vec3::flat(2.0, 0.0)), 25);
    }
}
