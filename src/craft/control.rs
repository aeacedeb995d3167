//! Control intents and the craft motion / weapon rules that consume them.
//!
//! Input capture lives outside the simulation; whatever maps keys or touches
//! writes a [`ControlIntent`] and the tick reads it.  Thrust constants are per
//! reference frame and are scaled by `step`, rotation by `dt`.

use crate::config::GameConfig;
use crate::constants::*;
use crate::effects::{Effects, ExhaustKind};
use crate::entities::{Kinetic, Projectile};
use crate::geometry::heading;
use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

use super::state::Craft;

// ── Intent ────────────────────────────────────────────────────────────────────

/// Per-tick control input.  All flags are "held" states.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlIntent {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust_forward: bool,
    pub thrust_back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub fire: bool,
    /// Turn to face against the current velocity.
    pub flip_heading: bool,
}

impl ControlIntent {
    /// Any linear thrust held; drag only applies when this is false.
    pub fn is_thrusting(&self) -> bool {
        self.thrust_forward || self.thrust_back || self.strafe_left || self.strafe_right
    }
}

// ── Flip animation ────────────────────────────────────────────────────────────

/// Short interpolated turn started by [`ControlIntent::flip_heading`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipTurn {
    start: f32,
    target: f32,
    remaining: f32,
}

impl FlipTurn {
    /// Turn from `angle` toward the reverse of `vel` along the shorter arc.
    /// `None` when the craft is not moving.
    pub fn toward_reverse(angle: f32, vel: Vec2) -> Option<Self> {
        if vel.length_squared() <= 0.0 {
            return None;
        }
        let target = (-vel.y).atan2(-vel.x);
        let diff = (target - angle + PI).rem_euclid(TAU) - PI;
        Some(Self {
            start: angle,
            target: angle + diff,
            remaining: FLIP_DURATION,
        })
    }

    /// Advance by `dt`; returns the interpolated heading and whether the turn is done.
    fn advance(&mut self, dt: f32) -> (f32, bool) {
        self.remaining -= dt;
        let t = 1.0 - self.remaining.max(0.0) / FLIP_DURATION;
        (self.start + (self.target - self.start) * t, self.remaining <= 0.0)
    }
}

// ── Motion ────────────────────────────────────────────────────────────────────

/// Apply rotation, flip and thrust intents to a live craft.
///
/// Exhaust puffs are emitted no more often than [`EXHAUST_INTERVAL`].
pub fn steer(craft: &mut Craft, intent: &ControlIntent, dt: f32, step: f32, effects: &mut Effects) {
    if intent.rotate_left {
        craft.angle -= CRAFT_ROTATION_SPEED * dt;
    }
    if intent.rotate_right {
        craft.angle += CRAFT_ROTATION_SPEED * dt;
    }

    if intent.flip_heading && !craft.flip_held {
        craft.flip = FlipTurn::toward_reverse(craft.angle, craft.kin.vel).or(craft.flip);
    }
    craft.flip_held = intent.flip_heading;

    if let Some(mut turn) = craft.flip {
        let (angle, done) = turn.advance(dt);
        craft.angle = angle;
        craft.flip = if done { None } else { Some(turn) };
    }

    let fwd = heading(craft.angle);
    // Port side is to the left of the nose in screen coordinates (y down).
    let port = Vec2::new(fwd.y, -fwd.x);

    let thrusts = [
        (intent.thrust_forward, fwd * CRAFT_ACCEL, -fwd, ExhaustKind::Main, EXHAUST_INTERVAL),
        (intent.thrust_back, -fwd * CRAFT_SIDE_ACCEL, fwd, ExhaustKind::Reverse, EXHAUST_INTERVAL_REVERSE),
        (intent.strafe_left, port * CRAFT_SIDE_ACCEL, -port, ExhaustKind::Side, EXHAUST_INTERVAL),
        (intent.strafe_right, -port * CRAFT_SIDE_ACCEL, port, ExhaustKind::Side, EXHAUST_INTERVAL),
    ];
    for (held, accel, nozzle, kind, interval) in thrusts {
        if !held {
            continue;
        }
        craft.kin.vel += accel * step;
        if craft.exhaust_cooldown <= 0.0 {
            effects.puff(craft.kin.pos + nozzle * craft.radius, kind);
            craft.exhaust_cooldown = interval;
        }
    }
}

/// Drag multiplier for `step` reference frames.
#[inline]
pub fn drag_factor(step: f32) -> f32 {
    CRAFT_DRAG.powf(step)
}

// ── Weapon ────────────────────────────────────────────────────────────────────

/// Edge-triggered fire: one projectile per press.
///
/// Standard rounds push the craft back; boosted rounds live twice as long and
/// have no recoil.
pub fn fire(craft: &mut Craft, intent: &ControlIntent, config: &GameConfig) -> Option<Projectile> {
    if !intent.fire {
        craft.can_fire = true;
        return None;
    }
    if !craft.can_fire {
        return None;
    }
    craft.can_fire = false;

    let dir = heading(craft.angle);
    let boosted = craft.is_boosted();
    let life = if boosted {
        config.projectile_lifetime * 2.0
    } else {
        config.projectile_lifetime
    };
    let projectile = Projectile {
        kin: Kinetic::new(
            craft.nose() + dir * MUZZLE_CLEARANCE,
            dir * PROJECTILE_SPEED + craft.kin.vel,
        ),
        life,
        boosted,
        destroyed: false,
    };
    if !boosted {
        craft.kin.vel -= dir * PROJECTILE_SPEED * config.projectile_mass / craft.mass * RECOIL_FACTOR;
    }
    Some(projectile)
}
