//! Concave sample boundaries and kriging surfaces for sparse elevation data
//!
//! Given scattered `(x, y, z)` measurements in a single planar reference
//! system, this crate finds a tight boundary around the samples and
//! interpolates a continuous surface inside it.
//!
//! # Quick Start
//!
//! ```rust
//! use terrain_kriging::*;
//!
//! // 5x5 survey on a 2.5 m spacing
//! let samples: Vec<DVec3> = (0..25)
//!     .map(|i| {
//!         let (x, y) = ((i % 5) as f64 * 2.5, (i / 5) as f64 * 2.5);
//!         DVec3::new(x, y, 100.0 + 0.5 * x - 0.2 * y)
//!     })
//!     .collect();
//!
//! // Boundary of the sample cloud
//! let points: Vec<DVec2> = samples.iter().map(|s| s.truncate()).collect();
//! let config = HullConfigBuilder::new().seglength(1.0).unwrap().build().unwrap();
//! let boundary = concave_hull(&points, &config).unwrap();
//! assert_eq!(boundary.len(), 4);
//!
//! // Fit a model and predict inside the boundary
//! let mut model = Kriging::new(samples);
//! let config = KrigingConfigBuilder::new()
//!     .model(VariogramModel::Exponential)
//!     .build()
//!     .unwrap();
//! model.train_with_config(&config).unwrap();
//!
//! let values = model
//!     .predict_masked(&boundary, &[DVec2::new(4.0, 6.0), DVec2::new(50.0, 5.0)])
//!     .unwrap();
//! assert_ne!(values[0], kriging::NODATA);
//! assert_eq!(values[1], kriging::NODATA);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): fork-join parallelism with rayon for hull stages
//!   and batched predictions
//! - `serde`: serialization support for configuration and outputs

// Modules
pub mod blend;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hull;
pub mod kriging;
pub mod scratch;
pub mod spatial;

mod maybe_rayon;

// Re-export core types for convenience
pub use config::{HullConfig, HullConfigBuilder, KrigingConfig, KrigingConfigBuilder};
pub use error::{KrigingError, Result};
pub use geometry::{Edge, FlatPoints, Rect, Rotator};
pub use hull::{concave_hull, convex_hull, simplify, ConcaveHull, QuickHull};
pub use kriging::{ContourRectangle, FittedParams, GridMatrices, Kriging, VariogramModel};
pub use scratch::{HullScratch, ScratchPool};
pub use spatial::{NearestWithin, SpatialIndex};

// Re-export glam vectors for convenience
pub use glam::{DVec2, DVec3};
