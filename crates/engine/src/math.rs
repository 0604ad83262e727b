use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction. The zero vector normalizes to itself.
    pub fn normalize(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return Self::ZERO;
        }
        self.scale(1.0 / magnitude)
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).magnitude()
    }

    pub fn distance_squared(self, other: Vec2) -> f64 {
        (other - self).magnitude_squared()
    }

    /// Component-wise product, used for per-axis scroll factors.
    pub fn mul_components(self, other: Vec2) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        self.scale(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edge contact does not count as overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn translated(&self, by: Vec2) -> Rect {
        Rect::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_matches_pythagoras() {
        assert_eq!(Vec2::new(3.0, 4.0).magnitude(), 5.0);
    }

    #[test]
    fn normalize_zero_is_zero_not_nan() {
        let normalized = Vec2::ZERO.normalize();
        assert_eq!(normalized, Vec2::ZERO);
        assert!(!normalized.x.is_nan());
    }

    #[test]
    fn normalize_produces_unit_length() {
        let normalized = Vec2::new(-7.0, 24.0).normalize();
        assert!((normalized.magnitude() - 1.0).abs() < 1e-12);
        assert!((normalized.x + 0.28).abs() < 1e-12);
    }

    #[test]
    fn operators_compose() {
        let mut value = Vec2::new(1.0, 2.0) + Vec2::new(3.0, 4.0) - Vec2::new(0.5, 0.5);
        value += Vec2::new(1.0, 1.0);
        value -= Vec2::new(0.5, 0.5);
        assert_eq!(value, Vec2::new(4.0, 6.0));
        assert_eq!(-value * 0.5, Vec2::new(-2.0, -3.0));
        assert_eq!(
            Vec2::new(2.0, 3.0).mul_components(Vec2::new(0.5, 0.0)),
            Vec2::new(1.0, 0.0)
        );
    }

    #[test]
    fn rects_overlap_but_touching_edges_do_not() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(9.0, 9.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(0.0, -5.0, 10.0, 5.0)));
        assert!(a
            .translated(Vec2::new(20.0, 0.0))
            .intersects(&Rect::new(25.0, 5.0, 1.0, 1.0)));
    }
}
