//! Craft state and its two collision shapes.
//!
//! The craft is drawn and collided as an isosceles triangle pointing along
//! `angle`.  Callers choose between the cheap [`Craft::bounding_circle`] and
//! the exact [`Craft::precise_hull_test`] depending on what they are testing.

use crate::config::GameConfig;
use crate::constants::*;
use crate::entities::Kinetic;
use crate::geometry::{heading, point_in_triangle, triangle_intersects_circle, Circle};
use bevy::prelude::*;

use super::control::FlipTurn;

/// The single locally simulated craft.
#[derive(Debug, Clone, PartialEq)]
pub struct Craft {
    pub kin: Kinetic,
    /// Heading (rad).
    pub angle: f32,
    pub radius: f32,
    pub mass: f32,
    pub alive: bool,
    pub armor: u32,
    /// Seconds of shield remaining.
    pub shield_timer: f32,
    /// Seconds of weapon boost remaining.
    pub weapon_timer: f32,
    /// Seconds of post-spawn invulnerability remaining.
    pub invulnerability: f32,
    /// Re-armed when the fire intent is released.
    pub can_fire: bool,
    pub(crate) flip: Option<FlipTurn>,
    pub(crate) flip_held: bool,
    pub(crate) exhaust_cooldown: f32,
}

impl Default for Craft {
    fn default() -> Self {
        Self {
            kin: Kinetic::default(),
            angle: 0.0,
            radius: DEFAULT_CRAFT_RADIUS,
            mass: DEFAULT_CRAFT_MASS,
            alive: true,
            armor: CRAFT_ARMOR,
            shield_timer: 0.0,
            weapon_timer: 0.0,
            invulnerability: 0.0,
            can_fire: true,
            flip: None,
            flip_held: false,
            exhaust_cooldown: 0.0,
        }
    }
}

impl Craft {
    /// A live craft at `pos` with configured size and default armor.
    pub fn spawned(config: &GameConfig, pos: Vec2, drift: Vec2) -> Self {
        Self {
            kin: Kinetic::new(pos, drift),
            radius: config.craft_radius,
            mass: config.craft_mass,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_shielded(&self) -> bool {
        self.shield_timer > 0.0
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability > 0.0
    }

    #[inline]
    pub fn is_boosted(&self) -> bool {
        self.weapon_timer > 0.0
    }

    /// Hull vertices relative to the centre with heading zero: nose, port, starboard.
    pub fn local_hull(&self) -> [Vec2; 3] {
        let r = self.radius;
        [
            Vec2::new(r, 0.0),
            Vec2::new(-r, r / 2.0),
            Vec2::new(-r, -r / 2.0),
        ]
    }

    /// Hull vertices in world space.
    pub fn hull_points(&self) -> [Vec2; 3] {
        let rot = Vec2::from_angle(self.angle);
        self.local_hull().map(|p| self.kin.pos + rot.rotate(p))
    }

    /// World-space nose tip.
    pub fn nose(&self) -> Vec2 {
        self.kin.pos + heading(self.angle) * self.radius
    }

    /// Circle enclosing the whole hull.
    pub fn bounding_circle(&self) -> Circle {
        Circle::new(self.kin.pos, self.radius * 1.25_f32.sqrt())
    }

    /// Exact hull-vs-circle test: any hull edge within reach, or the circle
    /// centre inside the hull.
    pub fn precise_hull_test(&self, other: &Circle) -> bool {
        self.bounding_circle().overlaps(other)
            && triangle_intersects_circle(&self.hull_points(), other)
    }

    /// Is `point` inside the hull?
    pub fn contains_point(&self, point: Vec2) -> bool {
        let [a, b, c] = self.hull_points();
        point_in_triangle(point, a, b, c)
    }

    /// Count down the shield, weapon boost, invulnerability and exhaust timers.
    pub fn tick_status(&mut self, dt: f32) {
        self.shield_timer = (self.shield_timer - dt).max(0.0);
        self.weapon_timer = (self.weapon_timer - dt).max(0.0);
        self.invulnerability = (self.invulnerability - dt).max(0.0);
        self.exhaust_cooldown = (self.exhaust_cooldown - dt).max(0.0);
    }
}
