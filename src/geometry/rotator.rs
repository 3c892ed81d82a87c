//! Planar rotation operator

use glam::{DMat2, DVec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rotation by an angle in degrees, counter-clockwise positive
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotator {
    /// Rotation angle in degrees
    pub degrees: f64,
}

impl Rotator {
    /// The identity rotation
    pub const ZERO: Self = Self { degrees: 0.0 };

    /// Rotation by `degrees`
    pub const fn new(degrees: f64) -> Self {
        Self { degrees }
    }

    /// Rotation by an angle given in radians
    pub fn from_radians(radians: f64) -> Self {
        Self::new(radians.to_degrees())
    }

    /// The angle in radians
    pub fn radians(&self) -> f64 {
        self.degrees.to_radians()
    }

    /// Accumulate an angle
    pub fn add(&mut self, degrees: f64) {
        self.degrees += degrees;
    }

    /// Accumulate a scaled angle (e.g. angular velocity times dt)
    pub fn add_scaled(&mut self, degrees: f64, scale: f64) {
        self.degrees += degrees * scale;
    }

    /// The equivalent 2×2 matrix
    pub fn rotation_matrix(&self) -> DMat2 {
        DMat2::from_angle(self.radians())
    }

    /// Rotate `v` about the origin
    pub fn rotate_vector(&self, v: DVec2) -> DVec2 {
        if self.degrees == 0.0 {
            return v;
        }
        self.rotation_matrix() * v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quarter_turn() {
        let r = Rotator::new(90.0);
        let v = r.rotate_vector(DVec2::X);
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_is_identity() {
        let v = DVec2::new(3.0, -7.5);
        assert_eq!(Rotator::ZERO.rotate_vector(v), v);
    }

    #[test]
    fn test_accumulate() {
        let mut r = Rotator::ZERO;
        r.add(45.0);
        r.add_scaled(90.0, 0.5);
        assert_eq!(r.degrees, 90.0);
        assert_abs_diff_eq!(r.radians(), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(Rotator::from_radians(std::f64::consts::PI).degrees, 180.0, epsilon = 1e-12);
    }
}
