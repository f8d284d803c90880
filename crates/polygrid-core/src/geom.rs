//! Geometry primitives: [`Vec3`], [`Quat`], [`Snap`] and convex polygon
//! helpers.
//!
//! Grids live on the XZ plane; `y` is carried along untouched so tile
//! positions can be handed straight to a 3D host.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Squared distance below which two corners are considered the same point.
pub const CORNER_EPSILON: f32 = 1e-4;

/// Lattice step used by [`Snap`] to hash float positions.
pub const SNAP_STEP: f32 = 1e-3;

/// Slack allowed when testing whether a point lies on a polygon edge.
const EDGE_SLACK: f32 = 1e-5;

// ---------------------------------------------------------------------------
// Vec3
// ---------------------------------------------------------------------------

/// A 3D float vector. Grids use `x` and `z`; `y` is height.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// Origin (0, 0, 0).
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// (1, 1, 1).
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// A vector on the grid plane.
    #[inline]
    pub const fn flat(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn sqr_magnitude(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn magnitude(self) -> f32 {
        self.sqr_magnitude().sqrt()
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    pub fn normalized(self) -> Self {
        let m = self.magnitude();
        if m <= f32::EPSILON {
            Self::ZERO
        } else {
            self / m
        }
    }

    /// Projection of `self` onto `onto`.
    pub fn project(self, onto: Self) -> Self {
        let len = onto.sqr_magnitude();
        if len <= f32::EPSILON {
            return Self::ZERO;
        }
        onto * (self.dot(onto) / len)
    }

    /// Whether the squared distance to `other` is below `sqr_eps`.
    #[inline]
    pub fn approx_eq(self, other: Self, sqr_eps: f32) -> bool {
        (self - other).sqr_magnitude() < sqr_eps
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ---------------------------------------------------------------------------
// Snap
// ---------------------------------------------------------------------------

/// A position compared and hashed on a [`SNAP_STEP`] lattice.
///
/// Float positions reached along different paths differ in their last bits;
/// wrapping them in `Snap` lets traversals keep them in hash sets and maps.
/// The wrapped value is the first float seen, never the rounded one.
#[derive(Copy, Clone, Debug)]
pub struct Snap(pub Vec3);

impl Snap {
    #[inline]
    pub fn pos(self) -> Vec3 {
        self.0
    }

    fn lattice(self) -> (i64, i64, i64) {
        (
            (self.0.x / SNAP_STEP).round() as i64,
            (self.0.y / SNAP_STEP).round() as i64,
            (self.0.z / SNAP_STEP).round() as i64,
        )
    }
}

impl From<Vec3> for Snap {
    fn from(v: Vec3) -> Self {
        Self(v)
    }
}

impl PartialEq for Snap {
    fn eq(&self, other: &Self) -> bool {
        self.lattice() == other.lattice()
    }
}

impl Eq for Snap {}

impl Hash for Snap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lattice().hash(state);
    }
}

// ---------------------------------------------------------------------------
// Quat
// ---------------------------------------------------------------------------

/// A rotation quaternion. Only rotations about the Y axis are ever built by
/// this workspace; other values pass through persistence untouched.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Rotation of `degrees` about the Y axis.
    pub fn from_yaw_degrees(degrees: f32) -> Self {
        let half = degrees.to_radians() * 0.5;
        Self {
            x: 0.0,
            y: half.sin(),
            z: 0.0,
            w: half.cos(),
        }
    }

    /// Yaw angle in degrees, in `(-360, 360]`.
    pub fn yaw_degrees(self) -> f32 {
        (2.0 * self.y.atan2(self.w)).to_degrees()
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ---------------------------------------------------------------------------
// Convex polygons
// ---------------------------------------------------------------------------

/// Average of all points.
pub fn polygon_center(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    let mut sum = Vec3::ZERO;
    for &p in points {
        sum += p;
    }
    sum / points.len() as f32
}

/// Smallest signed distance from `p` to the edges of a convex polygon,
/// positive on the inner side. Returns `f32::NEG_INFINITY` for degenerate
/// polygons.
pub fn edge_clearance(p: Vec3, corners: &[Vec3]) -> f32 {
    if corners.len() < 3 {
        return f32::NEG_INFINITY;
    }
    let center = polygon_center(corners);
    let mut min = f32::INFINITY;
    for i in 0..corners.len() {
        let a = corners[i];
        let b = corners[(i + 1) % corners.len()];
        let foot = a + (center - a).project(b - a);
        let inward = (center - foot).normalized();
        min = min.min(inward.dot(p - foot));
    }
    min
}

/// Whether `p` lies inside the convex polygon. Points on an edge count.
pub fn point_in_convex_polygon(p: Vec3, corners: &[Vec3]) -> bool {
    edge_clearance(p, corners) >= -EDGE_SLACK
}

/// Whether `p` lies inside the convex polygon and at least `margin` away
/// from every edge.
pub fn point_strictly_in_convex_polygon(p: Vec3, corners: &[Vec3], margin: f32) -> bool {
    edge_clearance(p, corners) > margin
}
