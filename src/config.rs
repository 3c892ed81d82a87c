//! Hull and kriging configuration with validating builders
//!
//! Both engines take a small `Copy` configuration value. Nothing here is
//! process-wide: two computations in different reference systems can run
//! side by side with their own configs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{KrigingError, Result};
use crate::kriging::VariogramModel;

/// Default target segment resolution for concave refinement, in coordinate units
pub const DEFAULT_SEGLENGTH: f64 = 0.001;

/// Default estimate of concave-hull vertices per convex-hull vertex
pub const DEFAULT_CONCAVE_CONVEX_RATIO: usize = 4;

/// Default measurement-noise term added to the covariance diagonal
pub const DEFAULT_SIGMA2: f64 = 0.0;

/// Default ridge regularization strength for the variogram fit
pub const DEFAULT_ALPHA: f64 = 100.0;

/// Configuration for concave hull computation
///
/// # Example
///
/// ```rust
/// use terrain_kriging::*;
///
/// let config = HullConfigBuilder::new()
///     .seglength(0.5)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.seglength, 0.5);
/// assert_eq!(config.estimated_ratio, 4);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullConfig {
    /// Target segment resolution along each convex edge
    ///
    /// Also used as the Douglas-Peucker tolerance for the final boundary.
    pub seglength: f64,

    /// Expected ratio of concave to convex vertex counts
    ///
    /// Only sizes the output buffer; a wrong guess costs a reallocation.
    pub estimated_ratio: usize,

    /// Print stage timings to stderr
    pub verbose: bool,
}

impl HullConfig {
    /// Check the fields of a configuration that was not built with
    /// [`HullConfigBuilder`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a non-positive or non-finite `seglength`
    /// or a zero `estimated_ratio`
    pub fn validate(&self) -> Result<()> {
        HullConfigBuilder::new()
            .seglength(self.seglength)?
            .estimated_ratio(self.estimated_ratio)?;
        Ok(())
    }
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            seglength: DEFAULT_SEGLENGTH,
            estimated_ratio: DEFAULT_CONCAVE_CONVEX_RATIO,
            verbose: false,
        }
    }
}

/// Builder for [`HullConfig`] with validation
#[derive(Debug, Clone)]
pub struct HullConfigBuilder {
    seglength: f64,
    estimated_ratio: usize,
    verbose: bool,
}

impl HullConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seglength: 0.001
    /// - estimated_ratio: 4
    /// - verbose: false
    pub fn new() -> Self {
        Self {
            seglength: DEFAULT_SEGLENGTH,
            estimated_ratio: DEFAULT_CONCAVE_CONVEX_RATIO,
            verbose: false,
        }
    }

    /// Set the segment resolution
    ///
    /// Each convex edge is searched in `ceil(length / seglength)` steps, and
    /// the final boundary is simplified with the same tolerance. Smaller
    /// values follow the samples more closely at a higher cost.
    ///
    /// # Arguments
    ///
    /// * `seglength` - Resolution in coordinate units
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `seglength` is not a positive finite number
    pub fn seglength(mut self, seglength: f64) -> Result<Self> {
        if !(seglength.is_finite() && seglength > 0.0) {
            return Err(KrigingError::InvalidConfig(format!(
                "seglength must be positive (got {})",
                seglength
            )));
        }
        self.seglength = seglength;
        Ok(self)
    }

    /// Set the expected concave:convex vertex ratio
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `ratio` is zero
    pub fn estimated_ratio(mut self, ratio: usize) -> Result<Self> {
        if ratio == 0 {
            return Err(KrigingError::InvalidConfig(
                "estimated concave:convex ratio must be >= 1".into(),
            ));
        }
        self.estimated_ratio = ratio;
        Ok(self)
    }

    /// Enable stderr timing output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<HullConfig> {
        Ok(HullConfig {
            seglength: self.seglength,
            estimated_ratio: self.estimated_ratio,
            verbose: self.verbose,
        })
    }
}

impl Default for HullConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for fitting a kriging model
///
/// # Example
///
/// ```rust
/// use terrain_kriging::*;
///
/// let config = KrigingConfigBuilder::new()
///     .model(VariogramModel::Spherical)
///     .alpha(50.0)
///     .unwrap()
///     .srs(4326)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.model, VariogramModel::Spherical);
/// assert_eq!(config.sigma2, 0.0);
/// assert_eq!(config.srs, Some(4326));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KrigingConfig {
    /// Variogram model shape
    pub model: VariogramModel,

    /// Measurement-noise variance added to the covariance diagonal
    ///
    /// With 0 the model interpolates its samples exactly.
    pub sigma2: f64,

    /// Ridge regularization strength for the variogram regression
    ///
    /// The regression adds `I / alpha` to the normal matrix, so larger
    /// values mean weaker regularization.
    pub alpha: f64,

    /// Reference system the samples are expressed in (e.g. an EPSG code)
    ///
    /// Never interpreted by the engine, only carried into grid outputs so
    /// callers can tell results from different systems apart.
    pub srs: Option<u32>,

    /// Print fit timings to stderr
    pub verbose: bool,
}

impl KrigingConfig {
    /// Check the numeric fields
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a negative `sigma2` or a non-positive `alpha`
    pub fn validate(&self) -> Result<()> {
        KrigingConfigBuilder::new().sigma2(self.sigma2)?.alpha(self.alpha)?;
        Ok(())
    }
}

impl Default for KrigingConfig {
    fn default() -> Self {
        Self {
            model: VariogramModel::default(),
            sigma2: DEFAULT_SIGMA2,
            alpha: DEFAULT_ALPHA,
            srs: None,
            verbose: false,
        }
    }
}

/// Builder for [`KrigingConfig`] with validation
#[derive(Debug, Clone)]
pub struct KrigingConfigBuilder {
    model: VariogramModel,
    sigma2: f64,
    alpha: f64,
    srs: Option<u32>,
    verbose: bool,
}

impl KrigingConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - model: Gaussian
    /// - sigma2: 0.0
    /// - alpha: 100.0
    /// - srs: None
    pub fn new() -> Self {
        Self {
            model: VariogramModel::default(),
            sigma2: DEFAULT_SIGMA2,
            alpha: DEFAULT_ALPHA,
            srs: None,
            verbose: false,
        }
    }

    /// Set the variogram model
    pub fn model(mut self, model: VariogramModel) -> Self {
        self.model = model;
        self
    }

    /// Set the measurement-noise variance
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `sigma2` is negative or not finite
    pub fn sigma2(mut self, sigma2: f64) -> Result<Self> {
        if !(sigma2.is_finite() && sigma2 >= 0.0) {
            return Err(KrigingError::InvalidConfig(format!(
                "sigma2 must be >= 0 (got {})",
                sigma2
            )));
        }
        self.sigma2 = sigma2;
        Ok(self)
    }

    /// Set the ridge regularization strength
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `alpha` is not a positive finite number
    pub fn alpha(mut self, alpha: f64) -> Result<Self> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(KrigingError::InvalidConfig(format!(
                "alpha must be positive (got {})",
                alpha
            )));
        }
        self.alpha = alpha;
        Ok(self)
    }

    /// Tag the configuration with a reference system code
    pub fn srs(mut self, code: u32) -> Self {
        self.srs = Some(code);
        self
    }

    /// Enable stderr timing output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<KrigingConfig> {
        Ok(KrigingConfig {
            model: self.model,
            sigma2: self.sigma2,
            alpha: self.alpha,
            srs: self.srs,
            verbose: self.verbose,
        })
    }
}

impl Default for KrigingConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hull_builder_defaults() {
        let config = HullConfigBuilder::new().build().unwrap();
        assert_eq!(config, HullConfig::default());
        assert_eq!(config.seglength, 0.001);
        assert_eq!(config.estimated_ratio, 4);
        assert!(!config.verbose);
    }

    #[test]
    fn test_hull_builder_invalid_seglength() {
        assert!(HullConfigBuilder::new().seglength(0.0).is_err());
        assert!(HullConfigBuilder::new().seglength(-1.0).is_err());
        assert!(HullConfigBuilder::new().seglength(f64::NAN).is_err());
    }

    #[test]
    fn test_hull_builder_invalid_ratio() {
        assert!(HullConfigBuilder::new().estimated_ratio(0).is_err());
        let config = HullConfigBuilder::new()
            .estimated_ratio(8)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.estimated_ratio, 8);
    }

    #[test]
    fn test_hull_validate_hand_built() {
        assert!(HullConfig::default().validate().is_ok());

        let negative = HullConfig {
            seglength: -1.0,
            ..HullConfig::default()
        };
        assert!(matches!(negative.validate(), Err(KrigingError::InvalidConfig(_))));

        let zero_ratio = HullConfig {
            estimated_ratio: 0,
            ..HullConfig::default()
        };
        assert!(zero_ratio.validate().is_err());

        let nan = HullConfig {
            seglength: f64::NAN,
            ..HullConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_kriging_builder_defaults() {
        let config = KrigingConfigBuilder::new().build().unwrap();
        assert_eq!(config, KrigingConfig::default());
        assert_eq!(config.model, VariogramModel::Gaussian);
        assert_eq!(config.sigma2, 0.0);
        assert_eq!(config.alpha, 100.0);
        assert_eq!(config.srs, None);
    }

    #[test]
    fn test_kriging_builder_validation() {
        assert!(KrigingConfigBuilder::new().sigma2(-0.1).is_err());
        assert!(KrigingConfigBuilder::new().alpha(0.0).is_err());
        assert!(KrigingConfigBuilder::new().alpha(f64::INFINITY).is_err());

        let config = KrigingConfigBuilder::new()
            .sigma2(0.25)
            .unwrap()
            .model(VariogramModel::Exponential)
            .build()
            .unwrap();
        assert_eq!(config.sigma2, 0.25);
        assert_eq!(config.model, VariogramModel::Exponential);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = KrigingConfigBuilder::new()
            .model(VariogramModel::Spherical)
            .srs(3857)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: KrigingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
