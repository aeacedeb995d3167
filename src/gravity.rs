//! Inverse-square gravity between mass-bearing bodies.
//!
//! ## Pairings
//!
//! | Source   | Target                        | Reciprocal | Scaled by |
//! |----------|-------------------------------|------------|-----------|
//! | planet   | craft                         | no         | `step`    |
//! | asteroid | craft                         | yes        | `step`    |
//! | planet   | asteroid, projectile, pickup  | no         | `dt`      |
//! | asteroid | asteroid                      | yes        | `dt`      |
//!
//! The craft feels gravity per reference frame; free bodies integrate it per
//! second.  A pair interacts only when its squared distance is above
//! [`MIN_GRAVITY_DIST_SQ`] and below the source's influence radius squared.
//!
//! Distances are raw planar distances.  Bodies near opposite world edges do
//! not attract each other across the wrap seam.

use crate::config::GameConfig;
use crate::constants::{CRAFT_ACCEL, MIN_GRAVITY_DIST_SQ};
use crate::entities::{Asteroid, EntityStore, Planet};
use bevy::prelude::*;

/// Acceleration at `at` toward a source of `mass` at `source`, or `None` when
/// the pair is outside `range` or inside the singularity guard.
pub fn pull(at: Vec2, source: Vec2, mass: f32, range: f32, g: f32) -> Option<Vec2> {
    let delta = source - at;
    let dist_sq = delta.length_squared();
    if dist_sq <= MIN_GRAVITY_DIST_SQ || dist_sq >= range * range {
        return None;
    }
    Some(delta / dist_sq.sqrt() * (g * mass / dist_sq))
}

/// Summed one-way planet acceleration at `at`.
pub fn planet_field(planets: &[Planet], at: Vec2, config: &GameConfig) -> Vec2 {
    planets
        .iter()
        .filter_map(|p| {
            pull(
                at,
                p.pos,
                p.mass,
                config.influence_radius(p.mass),
                config.gravity_const,
            )
        })
        .sum()
}

/// Apply planet and asteroid gravity to the craft (and the craft's pull back
/// on each asteroid in range).
///
/// Returns the per-frame acceleration the craft felt, before `step` scaling,
/// for the gravity warning.
pub fn act_on_craft(store: &mut EntityStore, config: &GameConfig, step: f32) -> Vec2 {
    let craft_pos = store.craft.kin.pos;
    let craft_mass = store.craft.mass;
    let g = config.gravity_const;

    let mut felt = planet_field(&store.planets, craft_pos, config);

    for asteroid in store.asteroids.iter_mut().filter(|a| !a.destroyed) {
        let range = config.influence_radius(asteroid.mass);
        let Some(toward) = pull(craft_pos, asteroid.kin.pos, asteroid.mass, range, g) else {
            continue;
        };
        felt += toward;
        // Same pair, same range: the asteroid is pulled back by the craft's mass.
        let back = toward * (craft_mass / asteroid.mass);
        asteroid.kin.vel -= back * step;
    }

    store.craft.kin.vel += felt * step;
    felt
}

/// Is `accel` (per reference frame) strong enough to warn the pilot?
#[inline]
pub fn is_gravity_trap(accel: Vec2, config: &GameConfig) -> bool {
    accel.length() > CRAFT_ACCEL * config.gravity_warning_ratio
}

/// Planet gravity on every free body: asteroids, projectiles and pickups.
pub fn act_on_free_bodies(store: &mut EntityStore, config: &GameConfig, dt: f32) {
    let EntityStore {
        planets,
        asteroids,
        projectiles,
        pickups,
        ..
    } = store;
    for a in asteroids.iter_mut() {
        a.kin.vel += planet_field(planets, a.kin.pos, config) * dt;
    }
    for p in projectiles.iter_mut() {
        p.kin.vel += planet_field(planets, p.kin.pos, config) * dt;
    }
    for p in pickups.iter_mut() {
        p.kin.vel += planet_field(planets, p.kin.pos, config) * dt;
    }
}

/// Mutual asteroid attraction.  A pair interacts when it is inside *either*
/// body's influence radius.
pub fn act_between_asteroids(asteroids: &mut [Asteroid], config: &GameConfig, dt: f32) {
    let g = config.gravity_const;
    for i in 0..asteroids.len() {
        let (head, tail) = asteroids.split_at_mut(i + 1);
        let a = &mut head[i];
        if a.destroyed {
            continue;
        }
        for b in tail.iter_mut().filter(|b| !b.destroyed) {
            let delta = b.kin.pos - a.kin.pos;
            let dist_sq = delta.length_squared();
            let range_a = config.influence_radius(a.mass);
            let range_b = config.influence_radius(b.mass);
            if dist_sq <= MIN_GRAVITY_DIST_SQ
                || (dist_sq >= range_a * range_a && dist_sq >= range_b * range_b)
            {
                continue;
            }
            let dir = delta / dist_sq.sqrt();
            a.kin.vel += dir * (g * b.mass / dist_sq) * dt;
            b.kin.vel -= dir * (g * a.mass / dist_sq) * dt;
        }
    }
}
