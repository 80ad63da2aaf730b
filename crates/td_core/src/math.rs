//! Fixed-point math utilities for deterministic simulation.
//!
//! All game simulation uses fixed-point arithmetic to ensure
//! deterministic behavior across platforms. Floating-point
//! operations can produce different results on different CPUs.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Simulation time is expressed in seconds with this type.
pub type Fixed = I32F32;

/// Convert a whole number of milliseconds into fixed-point seconds.
///
/// Whole seconds and the remainder are converted separately, so every
/// `u32` fits.
#[must_use]
pub fn millis(ms: u32) -> Fixed {
    Fixed::from_num(ms / 1000) + Fixed::from_num(ms % 1000) / Fixed::from_num(1000)
}

/// Convert a percentage modifier (`+15` = +15 %) into a multiplier (`1.15`).
#[must_use]
pub fn percent_multiplier(percent: i32) -> Fixed {
    Fixed::from_num(percent.saturating_add(100)) / Fixed::from_num(100)
}

/// Scale a whole-number stat by a fixed-point multiplier, flooring.
///
/// Computed on the raw bits in `i128`, so the result saturates at
/// `u32::MAX` and clamps negative products to zero.
#[must_use]
pub fn scale_u32(value: u32, mult: Fixed) -> u32 {
    let product = (i128::from(value) * i128::from(mult.to_bits())) >> Fixed::FRAC_NBITS;
    u32::try_from(product.max(0)).unwrap_or(u32::MAX)
}

/// Fixed-point 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2Fixed {
    /// X coordinate.
    #[serde(with = "fixed_serde")]
    pub x: Fixed,
    /// Y coordinate.
    #[serde(with = "fixed_serde")]
    pub y: Fixed,
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

impl Vec2Fixed {
    /// Create a new fixed-point vector.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Create a vector from whole-unit coordinates.
    #[must_use]
    pub fn from_ints(x: i32, y: i32) -> Self {
        Self::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    /// Zero vector.
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    /// Calculate squared distance (avoids sqrt for comparisons).
    #[must_use]
    pub fn distance_squared(self, other: Self) -> Fixed {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }
}

impl std::ops::Add for Vec2Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Axis-aligned bounding box anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Vec2Fixed,
    /// Width and height.
    pub size: Vec2Fixed,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(origin: Vec2Fixed, size: Vec2Fixed) -> Self {
        Self { origin, size }
    }

    /// Strict overlap test: rectangles that only touch at an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.origin.x < other.origin.x + other.size.x
            && other.origin.x < self.origin.x + self.size.x
            && self.origin.y < other.origin.y + other.size.y
            && other.origin.y < self.origin.y + self.size.y
    }
}
