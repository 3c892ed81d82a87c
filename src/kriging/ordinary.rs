//! Variogram-fitted kriging interpolator
//!
//! # Training
//!
//! 1. Build the [empirical variogram](super::empirical_variogram).
//! 2. Fit `γ(lag) = w₀ + w₁·basis(lag)` by ridge regression:
//!    `W = (XᵀX + I/alpha)⁻¹·XᵀY`, giving `nugget = w₀` and
//!    `sill = w₁·range + nugget`.
//! 3. Assemble `C[i][j] = γ(|sᵢ − sⱼ|) + sigma2·δᵢⱼ`, invert it and solve
//!    the weights `M = C⁻¹·z`.
//!
//! A prediction is then `Σ γ(|p − sᵢ|)·Mᵢ`.

use std::time::Instant;

use glam::{DVec2, DVec3};

use super::grid::{ContourRectangle, GridMatrices, NODATA};
use super::linalg::{add_diagonal, invert_symmetric, multiply, transpose, InverseMethod};
use super::model::{FittedParams, VariogramModel, DEFAULT_SHAPE};
use super::variogram::{empirical_variogram, EmpiricalVariogram};
use crate::config::KrigingConfig;
use crate::error::{KrigingError, Result};
use crate::geometry::{contains, Rect};
use crate::maybe_rayon::*;

/// Everything a successful `train` produces
#[derive(Debug, Clone)]
struct Fit {
    params: FittedParams,
    variogram: EmpiricalVariogram,
    /// `C⁻¹`, row-major `n × n`
    inverse: Vec<f64>,
    /// `M = C⁻¹·z`
    weights: Vec<f64>,
    method: InverseMethod,
    srs: Option<u32>,
}

impl Fit {
    #[inline]
    fn predict(&self, samples: &[DVec3], x: f64, y: f64) -> f64 {
        let p = DVec2::new(x, y);
        samples
            .iter()
            .zip(&self.weights)
            .map(|(s, m)| self.params.semivariance(p.distance(s.truncate())) * m)
            .sum()
    }
}

/// Kriging interpolator over a fixed sample set
///
/// Created untrained; [`train`](Self::train) fits the model and every query
/// method then reads the fit. A failed `train` leaves the previous fit in
/// place. The trained model is immutable and can be queried from many
/// threads.
///
/// # Example
///
/// ```
/// use terrain_kriging::*;
/// use glam::DVec3;
///
/// let mut kriging = Kriging::new(vec![
///     DVec3::new(0.0, 0.0, 10.0),
///     DVec3::new(10.0, 0.0, 12.0),
///     DVec3::new(10.0, 10.0, 15.0),
///     DVec3::new(0.0, 10.0, 11.0),
///     DVec3::new(5.0, 5.0, 20.0),
/// ]);
///
/// kriging.train(VariogramModel::Gaussian, 0.0, 100.0).unwrap();
/// let z = kriging.predict(5.0, 5.0).unwrap();
/// assert!((z - 20.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Kriging {
    samples: Vec<DVec3>,
    fit: Option<Fit>,
}

impl Kriging {
    /// Wrap a sample set of `(x, y, value)` points
    pub fn new(samples: Vec<DVec3>) -> Self {
        Self { samples, fit: None }
    }

    /// The sample set
    pub fn samples(&self) -> &[DVec3] {
        &self.samples
    }

    /// `true` once a `train` call has succeeded
    pub fn is_trained(&self) -> bool {
        self.fit.is_some()
    }

    /// Fitted parameters of the current model
    pub fn params(&self) -> Option<&FittedParams> {
        self.fit.as_ref().map(|f| &f.params)
    }

    /// Empirical variogram the current model was fitted to
    pub fn variogram(&self) -> Option<&EmpiricalVariogram> {
        self.fit.as_ref().map(|f| &f.variogram)
    }

    /// Inverse of the covariance matrix, row-major `n × n`
    pub fn covariance_inverse(&self) -> Option<&[f64]> {
        self.fit.as_ref().map(|f| f.inverse.as_slice())
    }

    /// Sample weights `M`
    pub fn weights(&self) -> Option<&[f64]> {
        self.fit.as_ref().map(|f| f.weights.as_slice())
    }

    /// How the covariance matrix was inverted
    pub fn inverse_method(&self) -> Option<InverseMethod> {
        self.fit.as_ref().map(|f| f.method)
    }

    /// Fit `model` with noise `sigma2` and ridge strength `alpha`
    ///
    /// Shorthand for [`train_with_config`](Self::train_with_config) with the
    /// remaining fields at their defaults (no `srs`, quiet).
    ///
    /// # Arguments
    ///
    /// * `model` - Variogram shape to fit
    /// * `sigma2` - Measurement-noise variance added to the covariance
    ///   diagonal; 0 makes the model exact at the samples
    /// * `alpha` - Ridge strength of the variogram regression; the normal
    ///   matrix gets `I / alpha`
    ///
    /// # Returns
    ///
    /// The fitted nugget, sill and range, borrowed from the stored fit.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` for a negative `sigma2` or non-positive `alpha`
    /// - `InsufficientData` / `InvalidInput` for unusable samples
    /// - `InsufficientLagBins` when the variogram has fewer than two lags
    /// - `SingularMatrix` when the covariance system cannot be inverted
    pub fn train(&mut self, model: VariogramModel, sigma2: f64, alpha: f64) -> Result<&FittedParams> {
        let config = KrigingConfig {
            model,
            sigma2,
            alpha,
            ..KrigingConfig::default()
        };
        self.train_with_config(&config)
    }

    /// Fit the model described by `config`
    ///
    /// Builds the empirical variogram of the samples, regresses nugget and
    /// sill on it, then inverts the sample covariance matrix and stores the
    /// prediction weights. With `config.verbose` set, a timing summary is
    /// written to stderr. On error the previous fit, if any, is kept.
    ///
    /// # Arguments
    ///
    /// * `config` - Model, noise, regularization and reference system; it is
    ///   validated first, so hand-built values are safe to pass
    ///
    /// # Returns
    ///
    /// The fitted parameters, borrowed from the stored fit.
    ///
    /// # Errors
    ///
    /// Same as [`train`](Self::train).
    pub fn train_with_config(&mut self, config: &KrigingConfig) -> Result<&FittedParams> {
        config.validate()?;
        let total_start = Instant::now();
        let fit = fit_model(&self.samples, config)?;

        if config.verbose {
            eprintln!(
                "[Kriging] Trained {}: {} samples, {} lags, nugget={:.4}, sill={:.4}, range={:.4}, solve={:?}, total={:?}",
                config.model,
                fit.params.n,
                fit.variogram.len(),
                fit.params.nugget,
                fit.params.sill,
                fit.params.range,
                fit.method,
                total_start.elapsed()
            );
        }

        Ok(&self.fit.insert(fit).params)
    }

    fn trained(&self) -> Result<&Fit> {
        self.fit.as_ref().ok_or(KrigingError::NotTrained)
    }

    /// Predicted value at `(x, y)`
    pub fn predict(&self, x: f64, y: f64) -> Result<f64> {
        Ok(self.trained()?.predict(&self.samples, x, y))
    }

    /// Predictions at many points, computed in parallel
    pub fn predict_many(&self, queries: &[DVec2]) -> Result<Vec<f64>> {
        let fit = self.trained()?;
        Ok(queries
            .par_iter()
            .map(|q| fit.predict(&self.samples, q.x, q.y))
            .collect())
    }

    /// Predictions inside `boundary`, [`NODATA`] outside
    pub fn predict_masked(&self, boundary: &[DVec2], queries: &[DVec2]) -> Result<Vec<f64>> {
        let fit = self.trained()?;
        let bounds = Rect::from_points(boundary.iter().copied());
        Ok(queries
            .par_iter()
            .map(|q| {
                if bounds.contains(*q) && contains(boundary, q.x, q.y) {
                    fit.predict(&self.samples, q.x, q.y)
                } else {
                    NODATA
                }
            })
            .collect())
    }

    /// `x_width × y_width` grid over the sample bounding box
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if either dimension is zero.
    pub fn contour(&self, x_width: usize, y_width: usize) -> Result<ContourRectangle> {
        self.trained()?;
        let bounds = Rect::from_points(self.samples.iter().map(|s| s.truncate()));
        self.sample_rectangle(bounds, x_width, y_width)
    }

    /// Grid over `bbox` with `ceil(width)` columns
    ///
    /// The row count keeps the cells close to square.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a non-positive width, `InvalidInput` for an empty
    /// or degenerate box.
    pub fn contour_with_bbox(&self, bbox: Rect, width: f64) -> Result<ContourRectangle> {
        self.trained()?;
        if !(width.is_finite() && width > 0.0) {
            return Err(KrigingError::InvalidConfig(format!(
                "contour width must be positive (got {width})"
            )));
        }
        let (geo_x, geo_y) = (bbox.width(), bbox.height());
        if !(geo_x > 0.0 && geo_y > 0.0) {
            return Err(KrigingError::InvalidInput(format!(
                "bounding box must have positive extent (got {geo_x} x {geo_y})"
            )));
        }
        let x_width = width.ceil() as usize;
        let y_width = (x_width as f64 / (geo_x / geo_y)).ceil() as usize;
        self.sample_rectangle(bbox, x_width, y_width.max(1))
    }

    fn sample_rectangle(&self, bounds: Rect, x_width: usize, y_width: usize) -> Result<ContourRectangle> {
        let fit = self.trained()?;
        if x_width == 0 || y_width == 0 {
            return Err(KrigingError::InvalidConfig(format!(
                "contour dimensions must be non-zero (got {x_width} x {y_width})"
            )));
        }
        let x_resolution = bounds.width() / x_width as f64;
        let y_resolution = bounds.height() / y_width as f64;

        let contour = (0..x_width * y_width)
            .into_par_iter()
            .map(|cell| {
                let (row, col) = (cell / x_width, cell % x_width);
                let x = bounds.min.x + (col as f64 + 0.5) * x_resolution;
                let y = bounds.min.y + (row as f64 + 0.5) * y_resolution;
                fit.predict(&self.samples, x, y)
            })
            .collect();

        Ok(ContourRectangle {
            contour,
            x_width,
            y_width,
            xlim: [bounds.min.x, bounds.max.x],
            ylim: [bounds.min.y, bounds.max.y],
            zlim: self.zlim(),
            x_resolution,
            y_resolution,
            srs: fit.srs,
        })
    }

    /// Predictions on a `width`-spaced grid masked by `polygon`
    ///
    /// `polygon` is a set of rings; a cell is predicted when its center lies
    /// in any of them.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a non-positive width, `InvalidInput` when no ring
    /// has at least three vertices.
    pub fn grid(&self, polygon: &[Vec<DVec2>], width: f64) -> Result<GridMatrices> {
        let fit = self.trained()?;
        if !(width.is_finite() && width > 0.0) {
            return Err(KrigingError::InvalidConfig(format!(
                "grid width must be positive (got {width})"
            )));
        }
        let rings: Vec<(&[DVec2], Rect)> = polygon
            .iter()
            .filter(|ring| ring.len() >= 3)
            .map(|ring| (ring.as_slice(), Rect::from_points(ring.iter().copied())))
            .collect();
        if rings.is_empty() {
            return Err(KrigingError::InvalidInput(
                "polygon needs at least one ring with three vertices".into(),
            ));
        }

        let mut bounds = Rect::EMPTY;
        for (_, r) in &rings {
            bounds.extend(r.min);
            bounds.extend(r.max);
        }
        let cols = (bounds.width() / width).ceil() as usize + 1;
        let rows = (bounds.height() / width).ceil() as usize + 1;

        let data = (0..cols * rows)
            .into_par_iter()
            .map(|cell| {
                let (row, col) = (cell / cols, cell % cols);
                let node = DVec2::new(
                    bounds.min.x + col as f64 * width,
                    bounds.min.y + row as f64 * width,
                );
                let inside = rings
                    .iter()
                    .any(|(ring, r)| r.contains(node) && contains(ring, node.x, node.y));
                if inside {
                    fit.predict(&self.samples, node.x, node.y)
                } else {
                    NODATA
                }
            })
            .collect();

        Ok(GridMatrices {
            data,
            cols,
            rows,
            xlim: [bounds.min.x, bounds.max.x],
            ylim: [bounds.min.y, bounds.max.y],
            zlim: self.zlim(),
            width,
            nodata: NODATA,
            srs: fit.srs,
        })
    }

    /// `[min, max]` of the sample values
    pub fn zlim(&self) -> [f64; 2] {
        self.samples
            .iter()
            .fold([f64::MAX, f64::MIN], |[lo, hi], s| [lo.min(s.z), hi.max(s.z)])
    }
}

/// Run the full fit; nothing is stored unless every stage succeeds
fn fit_model(samples: &[DVec3], config: &KrigingConfig) -> Result<Fit> {
    let n = samples.len();
    if n < 2 {
        return Err(KrigingError::InsufficientData(format!(
            "at least 2 samples required (got {n})"
        )));
    }
    if let Some(bad) = samples.iter().position(|s| !s.is_finite()) {
        return Err(KrigingError::InvalidInput(format!(
            "sample {bad} has a non-finite coordinate"
        )));
    }

    let variogram = empirical_variogram(samples)?;
    let range = variogram.range();
    let a = DEFAULT_SHAPE;
    let bins = variogram.len();

    // design matrix: intercept and model shape
    let mut design = vec![1.0; bins * 2];
    for (i, &lag) in variogram.lags.iter().enumerate() {
        design[i * 2 + 1] = config.model.basis(lag, range, a);
    }
    let design_t = transpose(&design, bins, 2);
    let mut normal = multiply(&design_t, &design, 2, bins, 2);
    add_diagonal(&mut normal, 2, 1.0 / config.alpha);
    let (normal_inv, _) = invert_symmetric(&normal, 2)?;
    let w = multiply(
        &multiply(&normal_inv, &design_t, 2, 2, bins),
        &variogram.semivariance,
        2,
        bins,
        1,
    );

    let nugget = w[0];
    let params = FittedParams {
        model: config.model,
        nugget,
        sill: w[1] * range + nugget,
        range,
        a,
        n,
    };

    let mut covariance = vec![0.0; n * n];
    let at_zero = params.semivariance(0.0);
    for i in 0..n {
        covariance[i * n + i] = at_zero;
        for j in 0..i {
            let v = params.semivariance(samples[i].truncate().distance(samples[j].truncate()));
            covariance[i * n + j] = v;
            covariance[j * n + i] = v;
        }
    }
    add_diagonal(&mut covariance, n, config.sigma2);

    let (inverse, method) = invert_symmetric(&covariance, n)?;
    let values: Vec<f64> = samples.iter().map(|s| s.z).collect();
    let weights = multiply(&inverse, &values, n, n, 1);

    Ok(Fit {
        params,
        variogram,
        inverse,
        weights,
        method,
        srs: config.srs,
    })
}
