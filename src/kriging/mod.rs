//! Kriging interpolation of scattered samples
//!
//! [`Kriging`] fits a [`VariogramModel`] to the empirical semivariogram of its
//! samples and predicts values at arbitrary points, on regular grids
//! ([`ContourRectangle`]) or on polygon-masked grids ([`GridMatrices`]).

mod grid;
pub mod linalg;
mod model;
mod ordinary;
mod variogram;

pub use grid::{ContourRectangle, GridMatrices, NODATA};
pub use linalg::InverseMethod;
pub use model::{FittedParams, VariogramModel, DEFAULT_SHAPE};
pub use ordinary::Kriging;
pub use variogram::{empirical_variogram, EmpiricalVariogram, MAX_LAGS};
