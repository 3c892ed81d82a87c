//! Douglas-Peucker polyline simplification

use geo::{Coord, LineString, Simplify};
use glam::DVec2;

/// Simplify a polyline, keeping both endpoints
///
/// Vertices closer than `tolerance` to the simplified line are removed. A
/// closed ring (first vertex repeated at the end) keeps its closing vertex.
/// Non-positive tolerances and polylines shorter than three vertices are
/// returned unchanged.
pub fn simplify(polyline: &[DVec2], tolerance: f64) -> Vec<DVec2> {
    if polyline.len() < 3 || !(tolerance > 0.0) {
        return polyline.to_vec();
    }

    let line: LineString<f64> = polyline.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
    line.simplify(&tolerance)
        .into_iter()
        .map(|c| DVec2::new(c.x, c.y))
        .collect()
}
