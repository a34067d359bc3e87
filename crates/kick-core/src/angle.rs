use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::Vector2;

/// A heading in radians, always in [0, 2pi). Arithmetic wraps the result back into
/// range:
///
/// ```
/// # use kick_core::Angle;
/// let a = Angle::from_degrees(270.0);
/// let b = Angle::from_degrees(135.0);
/// assert!(((a + b).degrees() - 45.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);
    pub const PI: Angle = Angle(PI);
    pub const PI_2: Angle = Angle(PI / 2.0);

    /// Create a new angle from radians.
    pub fn from_radians(radians: f64) -> Self {
        Angle(wrap_positive(radians))
    }

    /// Create a new angle from degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    /// Compute the world-frame direction from point a to point b.
    pub fn between_points(a: Vector2, b: Vector2) -> Self {
        Self::from_radians((b.y - a.y).atan2(b.x - a.x))
    }

    /// Get the angle in radians, in [0, 2pi).
    pub fn radians(&self) -> f64 {
        self.0
    }

    /// Get the angle in degrees, in [0, 360).
    pub fn degrees(&self) -> f64 {
        self.0.to_degrees()
    }

    /// The same heading expressed in (-pi, pi].
    pub fn signed(&self) -> f64 {
        wrap_signed(self.0)
    }

    /// Rotate a vector by this angle.
    pub fn rotate_vector(&self, v: &Vector2) -> Vector2 {
        let rot = nalgebra::Rotation2::new(self.0);
        rot * v
    }

    /// Unit vector pointing along this heading.
    pub fn unit(&self) -> Vector2 {
        Vector2::new(self.0.cos(), self.0.sin())
    }

    /// Midpoint of the shorter arc between two headings.
    pub fn circular_mean(a: Angle, b: Angle) -> Angle {
        Angle::from_radians(a.0 + wrap_signed(b.0 - a.0) / 2.0)
    }

    /// Absolute size of the shorter arc between two headings, in [0, pi].
    pub fn distance(a: Angle, b: Angle) -> f64 {
        wrap_signed(b.0 - a.0).abs()
    }
}

impl std::ops::Add for Angle {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Angle::from_radians(self.0 + other.0)
    }
}

impl std::ops::Sub for Angle {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Angle::from_radians(self.0 - other.0)
    }
}

impl std::ops::Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self {
        Angle::from_radians(-self.0)
    }
}

impl std::ops::AddAssign for Angle {
    fn add_assign(&mut self, other: Self) {
        self.0 = wrap_positive(self.0 + other.0);
    }
}

impl std::ops::Mul<Vector2> for Angle {
    type Output = Vector2;

    fn mul(self, v: Vector2) -> Vector2 {
        self.rotate_vector(&v)
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} rad", self.0)
    }
}

impl Default for Angle {
    fn default() -> Self {
        Angle::ZERO
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        const TOLERANCE: f64 = 1e-5;
        Angle::distance(*self, *other) < TOLERANCE
    }
}

impl From<f64> for Angle {
    fn from(radians: f64) -> Self {
        Angle::from_radians(radians)
    }
}

impl From<Angle> for f64 {
    fn from(angle: Angle) -> Self {
        angle.0
    }
}

/// Wrap an angle into [0, 2pi).
pub fn wrap_positive(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly 2pi
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle into (-pi, pi].
pub fn wrap_signed(angle: f64) -> f64 {
    let wrapped = wrap_positive(angle);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}
