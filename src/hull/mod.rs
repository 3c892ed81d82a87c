//! Convex and concave hull engines
//!
//! - [`convex_hull`]: monotone chain over sorted points
//! - [`QuickHull`]: divide-and-conquer hull with rigid-shape queries
//! - [`ConcaveHull`]: convex hull refined toward the data along each edge
//! - [`simplify`]: Douglas-Peucker used for the final concave boundary

mod concave;
mod convex;
mod quickhull;
mod simplify;

pub use concave::{concave_hull, ConcaveHull};
pub use convex::{convex_hull, convex_hull_flat, convex_hull_sorted};
pub use quickhull::QuickHull;
pub use simplify::simplify;
