use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A direction or displacement in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const Y: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const Z: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Unit vector in the same direction, or `None` below `eps` length.
    pub fn normalized_eps(&self, eps: f64) -> Option<Self> {
        let len = self.length();
        if len < eps {
            None
        } else {
            Some(*self / len)
        }
    }

    pub fn normalized(&self) -> Option<Self> {
        self.normalized_eps(1e-15)
    }

    /// Normalize, falling back to `Vec3::ZERO` for near-zero input.
    pub fn normalize_or_zero(&self) -> Self {
        self.normalized().unwrap_or(Self::ZERO)
    }

    /// Unit axis matching this vector's smallest-magnitude component.
    ///
    /// That axis is the one least parallel to `self`, which makes it a safe
    /// reference for building a perpendicular.
    pub fn least_aligned_axis(&self) -> Self {
        let (ax, ay, az) = (self.x.abs(), self.y.abs(), self.z.abs());
        if ax <= ay && ax <= az {
            Self::X
        } else if ay <= az {
            Self::Y
        } else {
            Self::Z
        }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn to_na(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn from_na(v: &Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self * rhs.x, self * rhs.y, self * rhs.z)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_product() {
        let result = Vec3::X.cross(&Vec3::Y);
        assert_eq!(result, Vec3::Z);
    }

    #[test]
    fn test_normalized_zero_is_none() {
        assert!(Vec3::ZERO.normalized().is_none());
        assert_eq!(Vec3::ZERO.normalize_or_zero(), Vec3::ZERO);
        let n = Vec3::new(3.0, 0.0, 4.0).normalized().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_least_aligned_axis() {
        assert_eq!(Vec3::new(0.0, 1.0, 1.0).least_aligned_axis(), Vec3::X);
        assert_eq!(Vec3::new(1.0, 0.1, 1.0).least_aligned_axis(), Vec3::Y);
        assert_eq!(Vec3::new(1.0, 1.0, 0.0).least_aligned_axis(), Vec3::Z);
    }

    #[test]
    fn test_nalgebra_round_trip() {
        let v = Vec3::new(1.0, -2.0, 3.5);
        assert_eq!(Vec3::from_na(&v.to_na()), v);
    }
}
