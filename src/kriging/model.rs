//! Theoretical variogram models and fitted parameters

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::KrigingError;

/// Shape constant used by every model during fitting
pub const DEFAULT_SHAPE: f64 = 1.0 / 3.0;

/// Theoretical variogram model
///
/// Parses from and displays as its lowercase name:
///
/// ```
/// use terrain_kriging::VariogramModel;
///
/// let model: VariogramModel = "spherical".parse().unwrap();
/// assert_eq!(model, VariogramModel::Spherical);
/// assert_eq!(VariogramModel::Gaussian.to_string(), "gaussian");
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VariogramModel {
    /// γ(h) = c₀ + c·[1 − exp(−(1/A)(h/a)²)]
    #[default]
    Gaussian,
    /// γ(h) = c₀ + c·[1 − exp(−(1/A)(h/a))]
    Exponential,
    /// γ(h) = c₀ + c·[1.5(h/a) − 0.5(h/a)³] for h ≤ a, saturated beyond
    Spherical,
}

impl VariogramModel {
    /// All models, in declaration order
    pub const ALL: [Self; 3] = [Self::Gaussian, Self::Exponential, Self::Spherical];

    /// Lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::Exponential => "exponential",
            Self::Spherical => "spherical",
        }
    }

    /// Unsaturated shape term used as the regression column
    ///
    /// `range` is the working range of the lag samples, `a` the shape constant.
    pub fn basis(self, lag: f64, range: f64, a: f64) -> f64 {
        let x = lag / range;
        match self {
            Self::Gaussian => 1.0 - exp(-(1.0 / a) * x * x),
            Self::Exponential => 1.0 - exp(-(1.0 / a) * x),
            Self::Spherical => 1.5 * x - 0.5 * x * x * x,
        }
    }

    /// Semivariance at separation `h` for fitted parameters
    pub fn evaluate(self, h: f64, params: &FittedParams) -> f64 {
        let slope = (params.sill - params.nugget) / params.range;
        match self {
            Self::Spherical if h > params.range => params.nugget + slope,
            _ => params.nugget + slope * self.basis(h, params.range, params.a),
        }
    }
}

/// `e^x` with `e^0` pinned to exactly one
#[inline]
fn exp(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        x.exp()
    }
}

impl fmt::Display for VariogramModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VariogramModel {
    type Err = KrigingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                KrigingError::InvalidConfig(format!(
                    "unknown variogram model '{s}' (expected gaussian, exponential or spherical)"
                ))
            })
    }
}

/// Parameters produced by a successful training run
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedParams {
    /// Model the parameters were fitted for
    pub model: VariogramModel,
    /// Semivariance intercept
    pub nugget: f64,
    /// Semivariance plateau
    pub sill: f64,
    /// Working range: spread of the lag samples
    pub range: f64,
    /// Shape constant
    pub a: f64,
    /// Number of samples
    pub n: usize,
}

impl FittedParams {
    /// Semivariance at separation `h`
    #[inline]
    pub fn semivariance(&self, h: f64) -> f64 {
        self.model.evaluate(h, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(model: VariogramModel) -> FittedParams {
        FittedParams {
            model,
            nugget: 1.0,
            sill: 5.0,
            range: 10.0,
            a: DEFAULT_SHAPE,
            n: 4,
        }
    }

    #[test]
    fn test_zero_lag_is_nugget() {
        for model in VariogramModel::ALL {
            let p = params(model);
            assert_eq!(p.semivariance(0.0), 1.0, "{model}");
        }
    }

    #[test]
    fn test_gaussian_shape() {
        let p = params(VariogramModel::Gaussian);
        // slope (5 - 1) / 10 = 0.4, basis at h = range is 1 - e^-3
        assert_relative_eq!(p.semivariance(10.0), 1.0 + 0.4 * (1.0 - (-3.0_f64).exp()), epsilon = 1e-12);
    }

    #[test]
    fn test_exponential_shape() {
        let p = params(VariogramModel::Exponential);
        assert_relative_eq!(p.semivariance(5.0), 1.0 + 0.4 * (1.0 - (-1.5_f64).exp()), epsilon = 1e-12);
    }

    #[test]
    fn test_spherical_saturates() {
        let p = params(VariogramModel::Spherical);
        assert_relative_eq!(p.semivariance(10.0), 1.0 + 0.4, epsilon = 1e-12);
        assert_eq!(p.semivariance(25.0), 1.0 + 0.4);
        assert_relative_eq!(p.semivariance(5.0), 1.0 + 0.4 * (0.75 - 0.0625), epsilon = 1e-12);
        // the regression column is not saturated
        assert!(VariogramModel::Spherical.basis(20.0, 10.0, DEFAULT_SHAPE) < 0.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Gaussian".parse::<VariogramModel>().unwrap(), VariogramModel::Gaussian);
        assert_eq!(" exponential ".parse::<VariogramModel>().unwrap(), VariogramModel::Exponential);
        assert!(matches!(
            "matern".parse::<VariogramModel>(),
            Err(KrigingError::InvalidConfig(_))
        ));
        for model in VariogramModel::ALL {
            assert_eq!(model.to_string().parse::<VariogramModel>().unwrap(), model);
        }
    }
}
