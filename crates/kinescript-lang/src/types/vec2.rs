use std::ops::{Add, Mul, Sub};

/// A point or offset in logical (y-up) space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).length()
    }

    /// Unit vector, or zero for a zero-length input.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len == 0.0 { Vec2::ZERO } else { Vec2::new(self.x / len, self.y / len) }
    }

    /// Counter-clockwise perpendicular.
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    /// Exact at `t = 0` and `t = 1`.
    pub fn lerp(self, to: Vec2, t: f64) -> Vec2 {
        self * (1.0 - t) + to * t
    }

    /// Rotates about `pivot` by `angle` radians, counter-clockwise.
    pub fn rotate_about(self, pivot: Vec2, angle: f64) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        let d = self - pivot;
        Vec2::new(pivot.x + d.x * cos - d.y * sin, pivot.y + d.x * sin + d.y * cos)
    }

    pub fn scale_about(self, pivot: Vec2, factor: f64) -> Vec2 {
        pivot + (self - pivot) * factor
    }

    pub fn approx_eq(self, other: Vec2, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x + rhs.x, self.y + rhs.y) }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x - rhs.x, self.y - rhs.y) }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 { Vec2::new(self.x * rhs, self.y * rhs) }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self { Vec2::new(x, y) }
}
