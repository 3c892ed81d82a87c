//! 2D geometry primitives shared by the hull and kriging engines
//!
//! Points are `glam` double-precision vectors. Everything here is a pure
//! function of its inputs.

mod flat;
mod polygon;
mod rotator;

pub use flat::FlatPoints;
pub use polygon::{contains, contains_oriented, edges, perimeter, signed_area};
pub use rotator::Rotator;

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A planar coordinate `(x, y)`
pub type Point2 = DVec2;

/// A planar coordinate plus a measured value `(x, y, z)`
pub type Point3 = glam::DVec3;

/// 2D cross product (z component of the 3D cross product)
#[inline]
pub fn cross(lhs: DVec2, rhs: DVec2) -> f64 {
    lhs.perp_dot(rhs)
}

/// `true` when `v` points to the right of `o` (clockwise from it)
#[inline]
pub fn on_the_right(v: DVec2, o: DVec2) -> bool {
    cross(v, o) < 0.0
}

/// Orientation test for the triangle `(x1,y1) (x2,y2) (x3,y3)`
///
/// Positive means a strict counter-clockwise (left) turn. Colinear triples
/// return `false`.
#[inline]
pub fn is_orientation_positive(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> bool {
    // | x1 - x3  x2 - x3 |
    // | y1 - y3  y2 - y3 |
    (x1 - x3) * (y2 - y3) - (y1 - y3) * (x2 - x3) > 0.0
}

/// Lexicographic ordering: x first, then y
#[inline]
pub fn lex_cmp(a: &[f64; 2], b: &[f64; 2]) -> std::cmp::Ordering {
    a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1]))
}

/// Directed boundary segment with its outward unit normal
///
/// The normal points to the right of `start → end`, which is outward for a
/// counter-clockwise polygon.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Segment start
    pub start: DVec2,
    /// Segment end
    pub end: DVec2,
    /// Outward unit normal (zero for a degenerate segment)
    pub normal: DVec2,
}

impl Edge {
    /// Build an edge and derive its normal
    pub fn new(start: DVec2, end: DVec2) -> Self {
        let d = end - start;
        Self {
            start,
            end,
            normal: DVec2::new(d.y, -d.x).normalize_or_zero(),
        }
    }

    /// Direction vector `end - start`
    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.end - self.start
    }

    /// Signed side of `point`: positive left (inside), negative right
    #[inline]
    pub fn side(&self, point: DVec2) -> f64 {
        cross(self.direction(), point - self.start)
    }

    /// Perpendicular distance from `point` to the supporting line
    pub fn distance_to_line(&self, point: DVec2) -> f64 {
        let len = self.direction().length();
        if len == 0.0 {
            return (point - self.start).length();
        }
        self.side(point).abs() / len
    }
}

/// Axis-aligned bounding rectangle
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Lower-left corner
    pub min: DVec2,
    /// Upper-right corner
    pub max: DVec2,
}

impl Rect {
    /// An inverted rectangle that any `extend` call replaces
    pub const EMPTY: Self = Self {
        min: DVec2::splat(f64::MAX),
        max: DVec2::splat(f64::MIN),
    };

    /// Rectangle from explicit corners
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Bounding rectangle of a point set, `EMPTY` for no points
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = DVec2>,
    {
        let mut rect = Self::EMPTY;
        for p in points {
            rect.extend(p);
        }
        rect
    }

    /// Grow the rectangle to include `point`
    #[inline]
    pub fn extend(&mut self, point: DVec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// `true` until the first point is added
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Extent along x
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along y
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Inclusive containment test
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}
