//! Planar geometry helpers shared by the collision, gravity and AI passes.
//!
//! All tests operate on raw planar coordinates.  The world wraps toroidally
//! for *movement* only; two bodies straddling opposite edges are far apart
//! as far as contact and gravity are concerned.

use bevy::prelude::*;

/// A circle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    #[inline]
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Strict overlap: touching circles do not collide.
    #[inline]
    pub fn overlaps(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) < reach * reach
    }
}

/// Wrap a scalar into `[0, size)`.
///
/// `rem_euclid` can round up to exactly `size` for tiny negative inputs, so
/// that case is folded back to zero.  Non-finite input collapses to zero.
#[inline]
pub fn wrap_coord(value: f32, size: f32) -> f32 {
    if !value.is_finite() || size <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(size);
    if wrapped >= size {
        0.0
    } else {
        wrapped
    }
}

/// Wrap a position onto the torus `[0, width) × [0, height)`.
#[inline]
pub fn wrap_position(pos: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(wrap_coord(pos.x, width), wrap_coord(pos.y, height))
}

/// Clamp the magnitude of `vel` to `max`, preserving direction.
#[inline]
pub fn cap_speed(vel: Vec2, max: f32) -> Vec2 {
    let speed = vel.length();
    if speed > max && speed > 0.0 {
        vel * (max / speed)
    } else {
        vel
    }
}

/// Unit vector pointing at `angle` radians.
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector from `from` to `to`.
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Does the segment `a → b` pass within `circle.radius` of the circle centre?
pub fn segment_intersects_circle(a: Vec2, b: Vec2, circle: &Circle) -> bool {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > 0.0 {
        ((circle.center - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = a + ab * t;
    closest.distance_squared(circle.center) < circle.radius * circle.radius
}

/// Barycentric point-in-triangle test; boundary points count as inside.
///
/// Degenerate (zero-area) triangles contain nothing.
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(v0);
    let dot01 = v0.dot(v1);
    let dot02 = v0.dot(v2);
    let dot11 = v1.dot(v1);
    let dot12 = v1.dot(v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() <= f32::EPSILON {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;
    u >= 0.0 && v >= 0.0 && u + v <= 1.0
}

/// Triangle-vs-circle: any edge within reach, or the centre fully engulfed.
pub fn triangle_intersects_circle(tri: &[Vec2; 3], circle: &Circle) -> bool {
    (0..3).any(|i| segment_intersects_circle(tri[i], tri[(i + 1) % 3], circle))
        || point_in_triangle(circle.center, tri[0], tri[1], tri[2])
}
