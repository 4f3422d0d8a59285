//! Canvas coordinates.
//!
//! All positions use screen orientation: x grows to the right and y grows
//! downwards. Angles are measured the way they look on screen, so an angle
//! of π/2 points up.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Normalize an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn set(&mut self, other: Point) {
        *self = other;
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Rotate counter-clockwise (as seen on screen) around `center`.
    pub fn rotate_around(&mut self, center: Point, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        self.x = center.x + dx * cos + dy * sin;
        self.y = center.y - dx * sin + dy * cos;
    }

    /// The point `length` away from `self` in direction `angle`.
    pub fn polar(self, angle: f64, length: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x + length * cos, self.y - length * sin)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Direction from `self` towards `other`, in `[0, 2π)`.
    pub fn angle_to(self, other: Point) -> f64 {
        normalize_angle((self.y - other.y).atan2(other.x - self.x))
    }

    /// Move `distance` along the segment from `self` towards `other`.
    pub fn towards(self, other: Point, distance: f64) -> Self {
        let len = self.distance_to(other);
        if len == 0.0 {
            return self;
        }
        let t = distance / len;
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn midpoint(self, other: Point) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}
