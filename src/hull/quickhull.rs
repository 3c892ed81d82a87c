//! Divide-and-conquer convex hull over 3D vertices projected to the plane
//!
//! Used for collision-style queries on rigid shapes: the hull is computed once
//! (lazily, on first use) and then tested against points under an arbitrary
//! translation and rotation.

use std::sync::OnceLock;

use glam::{DVec2, DVec3};

use crate::geometry::{cross, lex_cmp, Edge, Rect, Rotator};

/// Convex shape built from a vertex set with QuickHull
///
/// # Example
///
/// ```
/// use terrain_kriging::*;
/// use glam::{DVec2, DVec3};
///
/// let shape = QuickHull::new(vec![
///     DVec3::new(-1.0, -1.0, 0.0),
///     DVec3::new(1.0, -1.0, 0.0),
///     DVec3::new(1.0, 1.0, 0.0),
///     DVec3::new(-1.0, 1.0, 0.0),
///     DVec3::new(0.0, 0.0, 0.0),
/// ]);
///
/// assert_eq!(shape.hull().len(), 4);
/// assert!(shape.in_hull(DVec2::new(10.0, 0.0), Rotator::new(45.0), DVec2::new(10.0, 1.2)));
/// assert!(!shape.in_hull(DVec2::ZERO, Rotator::ZERO, DVec2::new(0.0, 1.2)));
/// ```
#[derive(Debug, Default)]
pub struct QuickHull {
    vertices: Vec<DVec3>,
    hull: OnceLock<Vec<DVec2>>,
    edges: OnceLock<Vec<Edge>>,
}

impl QuickHull {
    /// Wrap a vertex set; nothing is computed until first query
    pub fn new(vertices: Vec<DVec3>) -> Self {
        Self {
            vertices,
            hull: OnceLock::new(),
            edges: OnceLock::new(),
        }
    }

    /// Source vertices
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Hull vertices in the plane, starting at the lexicographically
    /// smallest vertex and running counter-clockwise
    ///
    /// Fewer than three vertices are returned as given.
    pub fn hull(&self) -> &[DVec2] {
        self.hull.get_or_init(|| quick_hull(&self.vertices))
    }

    /// Consecutive hull edges with outward normals
    pub fn edges(&self) -> &[Edge] {
        self.edges.get_or_init(|| {
            let hull = self.hull();
            let n = hull.len();
            if n < 2 {
                return Vec::new();
            }
            (0..n).map(|i| Edge::new(hull[i], hull[(i + 1) % n])).collect()
        })
    }

    /// Axis-aligned bounding rectangle of the hull
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.hull().iter().copied())
    }

    /// Hull vertex furthest along `dir` after rotating the shape by `rotator`
    ///
    /// Returns the rotated vertex, or `None` for an empty shape.
    pub fn support(&self, dir: DVec2, rotator: Rotator) -> Option<DVec2> {
        let mut best: Option<(f64, DVec2)> = None;
        for &v in self.hull() {
            let rotated = rotator.rotate_vector(v);
            let projection = rotated.dot(dir);
            match best {
                Some((p, _)) if projection <= p => {}
                _ => best = Some((projection, rotated)),
            }
        }
        best.map(|(_, v)| v)
    }

    /// `true` when `point` is strictly inside the shape placed at `position`
    /// with rotation `rotator`
    ///
    /// Points on the boundary are outside.
    pub fn in_hull(&self, position: DVec2, rotator: Rotator, point: DVec2) -> bool {
        let edges = self.edges();
        if edges.is_empty() {
            return false;
        }
        let m = rotator.rotation_matrix();
        edges.iter().all(|edge| {
            let start = position + m * edge.start;
            let end = position + m * edge.end;
            // strictly left of every counter-clockwise edge
            cross(end - start, point - start) > 0.0
        })
    }
}

impl Clone for QuickHull {
    fn clone(&self) -> Self {
        Self::new(self.vertices.clone())
    }
}

/// Hull of `vertices` projected onto the xy plane
fn quick_hull(vertices: &[DVec3]) -> Vec<DVec2> {
    let points: Vec<DVec2> = vertices.iter().map(|v| v.truncate()).collect();
    if points.len() < 3 {
        return points;
    }

    let (min, max) = lex_extremes(&points);
    if points[min] == points[max] {
        return vec![points[min]];
    }

    let all: Vec<usize> = (0..points.len()).collect();
    let mut hull = Vec::new();
    // below the min-max line, walking from max back to min
    recurse(&points, &all, points[max], points[min], &mut hull);
    // above it, walking from min to max
    recurse(&points, &all, points[min], points[max], &mut hull);
    hull
}

/// Indexes of the lexicographically smallest and largest points
fn lex_extremes(points: &[DVec2]) -> (usize, usize) {
    let key = |p: DVec2| [p.x, p.y];
    let mut min = 0;
    let mut max = 0;
    for (i, &p) in points.iter().enumerate().skip(1) {
        if lex_cmp(&key(p), &key(points[min])).is_lt() {
            min = i;
        }
        if lex_cmp(&key(p), &key(points[max])).is_gt() {
            max = i;
        }
    }
    (min, max)
}

/// Append the hull vertices strictly left of `start → end`, followed by `end`
///
/// `candidates` are indexes into `points`. The farthest candidate from the
/// line splits the problem; ties go to the lexicographically smallest point so
/// the result does not depend on input order.
fn recurse(points: &[DVec2], candidates: &[usize], start: DVec2, end: DVec2, hull: &mut Vec<DVec2>) {
    let dir = end - start;
    let mut left = Vec::new();
    let mut farthest: Option<(f64, usize)> = None;

    for &i in candidates {
        let indicator = cross(dir, points[i] - start);
        if indicator <= 0.0 {
            continue;
        }
        left.push(i);
        farthest = match farthest {
            None => Some((indicator, i)),
            Some((best, j)) => {
                let better = indicator > best
                    || (indicator == best
                        && lex_cmp(&[points[i].x, points[i].y], &[points[j].x, points[j].y]).is_lt());
                if better {
                    Some((indicator, i))
                } else {
                    Some((best, j))
                }
            }
        };
    }

    let Some((_, f)) = farthest else {
        hull.push(end);
        return;
    };
    let apex = points[f];
    recurse(points, &left, apex, end, hull);
    recurse(points, &left, start, apex, hull);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> DVec3 {
        DVec3::new(x, y, 0.0)
    }

    #[test]
    fn test_quick_hull() {
        let shape = QuickHull::new(vec![
            v(0.0, 0.0),
            v(100.0, 0.0),
            v(100.0, -10.0),
            v(150.0, 100.0),
            v(100.0, 200.0),
            v(0.0, 210.0),
            v(-50.0, 100.0),
            v(30.0, 30.0),
            v(75.0, 30.0),
        ]);

        let expected = vec![
            DVec2::new(-50.0, 100.0),
            DVec2::new(0.0, 0.0),
            DVec2::new(100.0, -10.0),
            DVec2::new(150.0, 100.0),
            DVec2::new(100.0, 200.0),
            DVec2::new(0.0, 210.0),
        ];
        assert_eq!(shape.hull(), expected.as_slice());
    }

    #[test]
    fn test_order_independent() {
        let mut vertices = vec![
            v(0.0, 0.0),
            v(2.0, 0.0),
            v(2.0, 2.0),
            v(0.0, 2.0),
            v(1.0, 1.0),
            v(1.0, 3.0),
        ];
        let a = QuickHull::new(vertices.clone()).hull().to_vec();
        vertices.reverse();
        let b = QuickHull::new(vertices).hull().to_vec();
        assert_eq!(a, b);
    }

    #[test]
    fn test_in_hull_strict() {
        let shape = QuickHull::new(vec![v(0.0, 0.0), v(4.0, 0.0), v(4.0, 4.0), v(0.0, 4.0)]);

        assert!(shape.in_hull(DVec2::ZERO, Rotator::ZERO, DVec2::new(2.0, 2.0)));
        // on an edge
        assert!(!shape.in_hull(DVec2::ZERO, Rotator::ZERO, DVec2::new(4.0, 2.0)));
        assert!(!shape.in_hull(DVec2::ZERO, Rotator::ZERO, DVec2::new(5.0, 2.0)));

        // rotate 90 degrees: the square now covers x in [-4, 0]
        let r = Rotator::new(90.0);
        assert!(shape.in_hull(DVec2::ZERO, r, DVec2::new(-2.0, 2.0)));
        assert!(!shape.in_hull(DVec2::ZERO, r, DVec2::new(2.0, 2.0)));
        // and translated
        assert!(shape.in_hull(DVec2::new(10.0, 10.0), r, DVec2::new(8.0, 12.0)));
    }

    #[test]
    fn test_support_and_rect() {
        let shape = QuickHull::new(vec![v(0.0, 0.0), v(4.0, 0.0), v(4.0, 2.0), v(0.0, 2.0)]);

        assert_eq!(shape.support(DVec2::X, Rotator::ZERO), Some(DVec2::new(4.0, 0.0)));
        assert_eq!(shape.support(DVec2::Y, Rotator::ZERO), Some(DVec2::new(4.0, 2.0)));

        let rect = shape.rect();
        assert_eq!(rect.min, DVec2::ZERO);
        assert_eq!(rect.max, DVec2::new(4.0, 2.0));

        let edges = shape.edges();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0].normal, DVec2::new(0.0, -1.0));

        assert_eq!(QuickHull::default().support(DVec2::X, Rotator::ZERO), None);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(QuickHull::new(vec![]).hull().is_empty());
        assert_eq!(QuickHull::new(vec![v(1.0, 1.0)]).hull().len(), 1);
        let same = QuickHull::new(vec![v(1.0, 1.0); 5]);
        assert_eq!(same.hull(), &[DVec2::new(1.0, 1.0)]);
        assert!(!same.in_hull(DVec2::ZERO, Rotator::ZERO, DVec2::new(1.0, 1.0)));
    }
}
