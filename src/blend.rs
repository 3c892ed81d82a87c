//! Four-corner interpolation for sampling a background raster
//!
//! When kriged output is composited over an existing elevation raster, points
//! outside the kriged area are read from the background by interpolating the
//! four surrounding pixels. Missing corners are replaced by the mean of the
//! present ones before blending.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::KrigingError;

/// Value used when every corner is missing
pub const ALL_MISSING_FALLBACK: f64 = 0.0;

/// Values of the four pixels around a sample position
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners {
    pub south_west: f64,
    pub south_east: f64,
    pub north_west: f64,
    pub north_east: f64,
}

impl Corners {
    /// Corners in `(sw, se, nw, ne)` order
    pub fn new(south_west: f64, south_east: f64, north_west: f64, north_east: f64) -> Self {
        Self {
            south_west,
            south_east,
            north_west,
            north_east,
        }
    }

    fn as_array(&self) -> [f64; 4] {
        [self.south_west, self.south_east, self.north_west, self.north_east]
    }

    /// Replace every `nodata` corner with the mean of the present ones
    ///
    /// If all four are missing they become [`ALL_MISSING_FALLBACK`].
    pub fn repaired(self, nodata: f64) -> Self {
        let fill = average_except_nodata(&self.as_array(), nodata, ALL_MISSING_FALLBACK);
        let fix = |v: f64| if is_nodata(v, nodata) { fill } else { v };
        Self {
            south_west: fix(self.south_west),
            south_east: fix(self.south_east),
            north_west: fix(self.north_west),
            north_east: fix(self.north_east),
        }
    }
}

/// Four-corner interpolation scheme
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Two vertical lerps (north to south) followed by a horizontal one
    #[default]
    Bilinear,
    /// `a00 + a10·x + a01·y + a11·x·y` anchored at the south-west corner
    Hyperbolic,
}

impl BlendMode {
    /// Interpolate at fractional offsets `x`, `y` in `[0, 1]`
    ///
    /// # Example
    ///
    /// ```
    /// use terrain_kriging::blend::{BlendMode, Corners};
    ///
    /// let c = Corners::new(0.0, 10.0, 0.0, 10.0);
    /// assert_eq!(BlendMode::Hyperbolic.interpolate(&c, 0.5, 0.5), 5.0);
    /// ```
    pub fn interpolate(self, c: &Corners, x: f64, y: f64) -> f64 {
        match self {
            Self::Bilinear => lerp(
                lerp(c.north_west, c.south_west, y),
                lerp(c.north_east, c.south_east, y),
                x,
            ),
            Self::Hyperbolic => {
                let a00 = c.south_west;
                let a10 = c.south_east - c.south_west;
                let a01 = c.north_west - c.south_west;
                let a11 = c.south_west - c.south_east - c.north_west + c.north_east;
                a00 + a10 * x + a01 * y + a11 * x * y
            }
        }
    }

    /// Repair missing corners, then interpolate
    pub fn blend(self, corners: Corners, nodata: f64, x: f64, y: f64) -> f64 {
        self.interpolate(&corners.repaired(nodata), x, y)
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bilinear => "bilinear",
            Self::Hyperbolic => "hyperbolic",
        })
    }
}

impl FromStr for BlendMode {
    type Err = KrigingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bilinear" => Ok(Self::Bilinear),
            "hyperbolic" => Ok(Self::Hyperbolic),
            other => Err(KrigingError::InvalidConfig(format!("unknown blend mode '{other}'"))),
        }
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
fn is_nodata(v: f64, nodata: f64) -> bool {
    (v - nodata).abs() <= f64::EPSILON
}

/// Mean of `values` ignoring `nodata` entries, `fallback` if none remain
pub fn average_except_nodata(values: &[f64], nodata: f64, fallback: f64) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|&&v| !is_nodata(v, nodata))
        .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));
    if count == 0 {
        fallback
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kriging::NODATA;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_modes_agree_at_corners() {
        let c = Corners::new(1.0, 2.0, 3.0, 4.0);
        for mode in [BlendMode::Bilinear, BlendMode::Hyperbolic] {
            assert_abs_diff_eq!(mode.interpolate(&c, 0.5, 0.5), 2.5, epsilon = 1e-12);
        }
        // hyperbolic anchors y = 0 at the south edge
        assert_eq!(BlendMode::Hyperbolic.interpolate(&c, 0.0, 0.0), 1.0);
        assert_eq!(BlendMode::Hyperbolic.interpolate(&c, 1.0, 1.0), 4.0);
        // bilinear anchors y = 0 at the north edge
        assert_eq!(BlendMode::Bilinear.interpolate(&c, 0.0, 0.0), 3.0);
        assert_eq!(BlendMode::Bilinear.interpolate(&c, 1.0, 1.0), 2.0);
    }

    #[test]
    fn test_average_except_nodata() {
        assert_eq!(average_except_nodata(&[2.0, NODATA, 4.0], NODATA, 0.0), 3.0);
        assert_eq!(average_except_nodata(&[NODATA, NODATA], NODATA, -1.0), -1.0);
        assert_eq!(average_except_nodata(&[], NODATA, 7.0), 7.0);
    }

    #[test]
    fn test_blend_repairs_missing_corners() {
        let c = Corners::new(NODATA, 10.0, 20.0, NODATA);
        let repaired = c.repaired(NODATA);
        assert_eq!(repaired, Corners::new(15.0, 10.0, 20.0, 15.0));
        assert_eq!(
            BlendMode::Bilinear.blend(c, NODATA, 0.0, 0.0),
            BlendMode::Bilinear.interpolate(&repaired, 0.0, 0.0)
        );

        let all_missing = Corners::new(NODATA, NODATA, NODATA, NODATA);
        assert_eq!(BlendMode::Hyperbolic.blend(all_missing, NODATA, 0.3, 0.7), 0.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Hyperbolic".parse::<BlendMode>().unwrap(), BlendMode::Hyperbolic);
        assert_eq!(BlendMode::default().to_string(), "bilinear");
        assert!("bicubic".parse::<BlendMode>().is_err());
    }
}
