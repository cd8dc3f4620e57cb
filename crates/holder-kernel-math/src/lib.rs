#![warn(missing_docs)]

//! Math types for the bottle holder kernel.
//!
//! Thin wrappers around nalgebra providing the types used by the sketch,
//! sweep and grabber crates, plus the handful of cylindrical-coordinate
//! helpers every rib path is built from.
//!
//! Angles cross crate boundaries in degrees; conversion to radians happens
//! only inside the trigonometric helpers here.

use nalgebra::{Unit, Vector2, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in a 2D sketch plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-9 mm).
    pub const DEFAULT: Self = Self { linear: 1e-9 };

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Point at `radius` from the Z axis, at `angle_deg` degrees from +X, height `z`.
pub fn polar_point(radius: f64, angle_deg: f64, z: f64) -> Point3 {
    let (s, c) = angle_deg.to_radians().sin_cos();
    Point3::new(radius * c, radius * s, z)
}

/// Polar angle of `p` around the Z axis, in degrees within `(-180, 180]`.
pub fn polar_angle(p: &Point3) -> f64 {
    p.y.atan2(p.x).to_degrees()
}

/// Distance of `p` from the Z axis.
pub fn radial_distance(p: &Point3) -> f64 {
    (p.x * p.x + p.y * p.y).sqrt()
}

/// Component of `v` perpendicular to the unit vector `axis`.
pub fn reject(v: &Vec3, axis: &Dir3) -> Vec3 {
    v - v.dot(axis.as_ref()) * axis.as_ref()
}

/// Linear interpolation between two sketch points.
pub fn lerp2(a: &Point2, b: &Point2, t: f64) -> Point2 {
    Point2::from(a.coords + (b.coords - a.coords) * t)
}
