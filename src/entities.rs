//! World entities and the store that owns them.
//!
//! ## Design
//!
//! Every kinetic entity embeds a [`Kinetic`] (position + per-frame velocity),
//! so integration, wrapping and speed caps are written once.  Collections are
//! plain `Vec`s iterated in index order; that order is the only tie-break the
//! collision passes use, which keeps a seeded run reproducible.
//!
//! Nothing is removed mid-pass.  Passes set a `destroyed` flag and
//! [`EntityStore::compact`] drops flagged entries once the pass is over, so a
//! forward scan never skips or double-visits a neighbour.
//!
//! | Collection      | Created by                              | Removed when                         |
//! |-----------------|-----------------------------------------|--------------------------------------|
//! | `planets`       | round start                             | round restart                        |
//! | `asteroids`     | round start, scheduler, fragmentation   | HP ≤ 0, planet impact, shield hit    |
//! | `enemies`       | round start                             | any body/craft contact, HP ≤ 0       |
//! | `projectiles`   | craft fire                              | lifetime, any hit                    |
//! | `pickups`       | scheduler                               | TTL, collection, HP ≤ 0, planet      |

use crate::constants::*;
use crate::craft::Craft;
use crate::effects::Effects;
use crate::geometry::{wrap_position, Circle};
use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

// ── Shared kinetic state ──────────────────────────────────────────────────────

/// Position plus velocity expressed per reference frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Kinetic {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Kinetic {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Move by one scaled step.
    #[inline]
    pub fn advance(&mut self, step: f32) {
        self.pos += self.vel * step;
    }
}

// ── Bodies ────────────────────────────────────────────────────────────────────

/// An immovable gravity source.
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    pub pos: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub color: String,
    /// Impact feedback in `[0, 1]`, decays by `dt`.
    pub shake: f32,
}

impl Planet {
    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    /// Register an impact from a body of `impactor_mass`.
    pub fn shake_from(&mut self, impactor_mass: f32) {
        let strength = (impactor_mass / self.mass).min(1.0);
        self.shake = self.shake.max(strength);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub kin: Kinetic,
    pub radius: f32,
    /// Outline vertices relative to the centre.
    pub outline: Vec<Vec2>,
    pub hp: f32,
    pub mass: f32,
    pub color: String,
    /// While positive the asteroid ignores craft and asteroid contacts.
    pub spawn_grace: f32,
    pub destroyed: bool,
}

impl Asteroid {
    pub fn circle(&self) -> Circle {
        Circle::new(self.kin.pos, self.radius)
    }

    #[inline]
    pub fn in_grace(&self) -> bool {
        self.spawn_grace > 0.0
    }

    /// A jagged outline of `ASTEROID_POINTS_MIN..ASTEROID_POINTS_MAX` vertices.
    pub fn jagged_outline(rng: &mut impl Rng, radius: f32) -> Vec<Vec2> {
        let count = rng.gen_range(ASTEROID_POINTS_MIN..ASTEROID_POINTS_MAX);
        (0..count)
            .map(|i| {
                let angle = i as f32 / count as f32 * TAU;
                let dist = radius * rng.gen_range(ASTEROID_OUTLINE_JITTER..=1.0);
                Vec2::new(angle.cos(), angle.sin()) * dist
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kin: Kinetic,
    pub angle: f32,
    pub alerted: bool,
    pub detection_radius: f32,
    pub hp: f32,
    pub destroyed: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, detection_radius: f32) -> Self {
        Self {
            kin: Kinetic::new(pos, Vec2::ZERO),
            angle: 0.0,
            alerted: false,
            detection_radius,
            hp: ENEMY_HP,
            destroyed: false,
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.kin.pos, ENEMY_RADIUS)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub kin: Kinetic,
    /// Remaining lifetime (s).
    pub life: f32,
    /// Fired under a weapon boost.
    pub boosted: bool,
    pub destroyed: bool,
}

impl Projectile {
    pub fn circle(&self) -> Circle {
        Circle::new(self.kin.pos, PROJECTILE_RADIUS)
    }
}

/// What a pickup does when collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Shield,
    WeaponBoost,
    Heal,
    TimeBonus,
}

impl PickupKind {
    pub fn label(self) -> &'static str {
        match self {
            PickupKind::Shield => "shield",
            PickupKind::WeaponBoost => "weapon_boost",
            PickupKind::Heal => "heal",
            PickupKind::TimeBonus => "time_bonus",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub kin: Kinetic,
    pub kind: PickupKind,
    /// Time to live (s).
    pub ttl: f32,
    /// Collision radius; shrinks over the last [`PICKUP_SHRINK_WINDOW`] seconds.
    pub size: f32,
    pub hp: f32,
    pub destroyed: bool,
}

impl Pickup {
    pub fn new(kind: PickupKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            kin: Kinetic::new(pos, vel),
            kind,
            ttl: PICKUP_TTL,
            size: PICKUP_SIZE,
            hp: PICKUP_HP,
            destroyed: false,
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.kin.pos, self.size)
    }

    /// Count down the TTL and shrink near the end.  Returns `true` on expiry.
    pub fn age(&mut self, dt: f32) -> bool {
        self.ttl -= dt;
        if self.ttl < PICKUP_SHRINK_WINDOW {
            self.size = PICKUP_SIZE * (self.ttl / PICKUP_SHRINK_WINDOW).max(0.0);
        }
        self.ttl <= 0.0
    }
}

// ── Tagged references ─────────────────────────────────────────────────────────

/// Index-based handle to a body that can strike the craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRef {
    Asteroid(usize),
    Enemy(usize),
    Projectile(usize),
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Owner of every mutable entity collection in one simulation.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub craft: Craft,
    pub planets: Vec<Planet>,
    pub asteroids: Vec<Asteroid>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub effects: Effects,
}

impl EntityStore {
    /// Drop every world entity; the craft and visual debris are kept.
    pub fn clear_world(&mut self) {
        self.planets.clear();
        self.asteroids.clear();
        self.enemies.clear();
        self.projectiles.clear();
        self.pickups.clear();
    }

    /// Remove everything flagged `destroyed`.
    pub fn compact(&mut self) {
        self.asteroids.retain(|a| !a.destroyed);
        self.enemies.retain(|e| !e.destroyed);
        self.projectiles.retain(|p| !p.destroyed);
        self.pickups.retain(|p| !p.destroyed);
    }

    /// Wrap every position back onto the torus.
    pub fn wrap_all(&mut self, width: f32, height: f32) {
        let wrap = |kin: &mut Kinetic| kin.pos = wrap_position(kin.pos, width, height);
        wrap(&mut self.craft.kin);
        self.asteroids.iter_mut().for_each(|a| wrap(&mut a.kin));
        self.enemies.iter_mut().for_each(|e| wrap(&mut e.kin));
        self.projectiles.iter_mut().for_each(|p| wrap(&mut p.kin));
        self.pickups.iter_mut().for_each(|p| wrap(&mut p.kin));
        for planet in &mut self.planets {
            planet.pos = wrap_position(planet.pos, width, height);
        }
        self.effects.wrap(width, height);
    }

    /// Live asteroids (not yet compacted away).
    pub fn live_asteroid_count(&self) -> usize {
        self.asteroids.iter().filter(|a| !a.destroyed).count()
    }

    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| !e.destroyed).count()
    }

    /// Collision circle of `body`, if it still exists.
    pub fn circle(&self, body: BodyRef) -> Option<Circle> {
        match body {
            BodyRef::Asteroid(i) => self.asteroids.get(i).map(Asteroid::circle),
            BodyRef::Enemy(i) => self.enemies.get(i).map(Enemy::circle),
            BodyRef::Projectile(i) => self.projectiles.get(i).map(Projectile::circle),
        }
    }

    /// Flag `body` for removal at the next compaction.
    pub fn mark_destroyed(&mut self, body: BodyRef) {
        match body {
            BodyRef::Asteroid(i) => {
                if let Some(a) = self.asteroids.get_mut(i) {
                    a.destroyed = true;
                }
            }
            BodyRef::Enemy(i) => {
                if let Some(e) = self.enemies.get_mut(i) {
                    e.destroyed = true;
                }
            }
            BodyRef::Projectile(i) => {
                if let Some(p) = self.projectiles.get_mut(i) {
                    p.destroyed = true;
                }
            }
        }
    }
}
