//! Motion and color math: easing curves, oscillators and tints.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Create an opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color with explicit alpha.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    pub fn from_vec4(v: Vec4) -> Self {
        Self::rgba(v.x, v.y, v.z, v.w)
    }

    /// Blend towards `other`; `t` is clamped to 0.0-1.0.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color::from_vec4(self.to_vec4().lerp(other.to_vec4(), clamp01(t)))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Clamp a value to the 0.0-1.0 range. NaN maps to 0.0.
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Hermite ease-in/ease-out over 0.0-1.0 (`3t^2 - 2t^3`).
pub fn smooth_step(t: f32) -> f32 {
    let t = clamp01(t);
    t * t * (3.0 - 2.0 * t)
}

/// Triangle wave that bounces `t` between 0 and `length`.
pub fn ping_pong(t: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    let period = length * 2.0;
    let wrapped = (t - (t / period).floor() * period).clamp(0.0, period);
    length - (wrapped - length).abs()
}

/// Position along a straight path with ease-in/ease-out timing.
pub fn ease_between(start: Vec3, end: Vec3, t: f32) -> Vec3 {
    start.lerp(end, smooth_step(t))
}

/// Distance between two points on the ground (x/y) plane, ignoring depth.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    a.truncate().distance(b.truncate())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_smooth_step_endpoints() {
        assert_eq!(smooth_step(0.0), 0.0);
        assert_eq!(smooth_step(1.0), 1.0);
        assert!(approx(smooth_step(0.5), 0.5));
        assert_eq!(smooth_step(-3.0), 0.0);
        assert_eq!(smooth_step(7.0), 1.0);
    }

    #[test]
    fn test_smooth_step_is_not_linear() {
        // Slow start, slow finish.
        assert!(smooth_step(0.25) < 0.25);
        assert!(smooth_step(0.75) > 0.75);
    }

    #[test]
    fn test_ping_pong() {
        assert!(approx(ping_pong(0.0, 0.5), 0.0));
        assert!(approx(ping_pong(0.25, 0.5), 0.25));
        assert!(approx(ping_pong(0.5, 0.5), 0.5));
        assert!(approx(ping_pong(0.75, 0.5), 0.25));
        assert!(approx(ping_pong(1.0, 0.5), 0.0));
        assert!(approx(ping_pong(1.25, 0.5), 0.25));
        assert_eq!(ping_pong(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_color_lerp_clamps() {
        let storm = Color::rgb(0.2, 0.22, 0.35);
        assert_eq!(Color::BLACK.lerp(storm, 2.0), storm);
        assert_eq!(Color::BLACK.lerp(storm, -1.0), Color::BLACK);

        let half = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert!(approx(half.r, 0.5));
        assert!(approx(half.a, 1.0));
    }

    #[test]
    fn test_planar_distance_ignores_depth() {
        let a = Vec3::new(0.0, 0.0, -10.0);
        let b = Vec3::new(3.0, 4.0, 25.0);
        assert!(approx(planar_distance(a, b), 5.0));
    }

    #[test]
    fn test_ease_between() {
        let start = Vec3::new(-3.0, 3.25, 0.0);
        let end = Vec3::new(0.0, 0.5, 0.0);
        assert_eq!(ease_between(start, end, 0.0), start);
        assert_eq!(ease_between(start, end, 1.0), end);
    }
}
