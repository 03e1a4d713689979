//! 2D vector and position types for the chamber simulation.
//!
//! Positions and displacements are kept as distinct types: subtracting two
//! `Pos2` yields a `Vec2`, and adding a `Vec2` to a `Pos2` yields a `Pos2`.
//! All coordinates are chamber-local unless noted.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A point in a chamber's local coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Pos2 {
    pub x: f32,
    pub y: f32,
}

/// A displacement or velocity in chamber-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Pos2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Dot product
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Squared vector length
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Vector length
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Scale to unit length. Undefined for zero-length vectors; callers must
    /// check before normalizing (the collision kernel treats such inputs as
    /// degenerate and bails out early).
    pub fn normalized(self) -> Vec2 {
        self * (1.0 / self.length())
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl Add<Vec2> for Pos2 {
    type Output = Pos2;
    fn add(self, rhs: Vec2) -> Pos2 {
        Pos2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign<Vec2> for Pos2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub<Vec2> for Pos2 {
    type Output = Pos2;
    fn sub(self, rhs: Vec2) -> Pos2 {
        Pos2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign<Vec2> for Pos2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Sub for Pos2 {
    type Output = Vec2;
    fn sub(self, rhs: Pos2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An oriented surface segment from `a` to `b`.
///
/// The normal points "up" when `a` is left of `b`. The orientation
/// precondition is not verified; a surface supplied with swapped endpoints
/// simply has an inverted normal.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Surface {
    pub a: Pos2,
    pub b: Pos2,
}

impl Surface {
    pub fn new(a: Pos2, b: Pos2) -> Self {
        Self { a, b }
    }

    /// Unit normal of the segment: `b - a` normalized and rotated 90°
    /// counterclockwise, i.e. `(-d.y, d.x)`.
    pub fn normal(&self) -> Vec2 {
        let d = (self.b - self.a).normalized();
        Vec2::new(-d.y, d.x)
    }
}
