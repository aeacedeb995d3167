//! Asteroid break-up.
//!
//! A destroyed asteroid of radius `r` splits into `N = floor(r / min)`
//! children of radius `sqrt(r² / N)`, which keeps total area.  Fewer than two
//! pieces, or children that would fall below the minimum radius, fizzle
//! into nothing.

use crate::config::GameConfig;
use crate::constants::*;
use crate::effects::Effects;
use crate::entities::{Asteroid, Kinetic};
use crate::geometry::heading;
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// Number of children and their radius, or `None` for a fizzle.
pub fn split_plan(radius: f32, min_radius: f32) -> Option<(usize, f32)> {
    if min_radius <= 0.0 {
        return None;
    }
    let pieces = (radius / min_radius).floor();
    if pieces < 2.0 {
        return None;
    }
    let child = (radius * radius / pieces).sqrt();
    (child >= min_radius).then_some((pieces as usize, child))
}

/// Children of `parent`, scattered opposite `impact_angle` and evenly spread
/// across a full turn.
pub fn fragment(
    parent: &Asteroid,
    impact_angle: f32,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Vec<Asteroid> {
    let Some((pieces, radius)) = split_plan(parent.radius, config.min_split_radius) else {
        return Vec::new();
    };
    (0..pieces)
        .map(|i| {
            let angle = impact_angle + PI + i as f32 / pieces as f32 * TAU;
            let dir = heading(angle);
            let speed = rng.gen_range(ASTEROID_SPEED_MIN..ASTEROID_SPEED_MAX);
            Asteroid {
                kin: Kinetic::new(
                    parent.kin.pos + dir * radius * FRAGMENT_OFFSET,
                    dir * speed,
                ),
                radius,
                outline: Asteroid::jagged_outline(rng, radius),
                hp: (parent.hp - 1.0).max(1.0),
                mass: config.asteroid_mass(radius),
                color: parent.color.clone(),
                spawn_grace: FRAGMENT_SPAWN_GRACE,
                destroyed: false,
            }
        })
        .collect()
}

/// Flag `asteroid` destroyed, throw its debris and queue its children.
///
/// Children go to `spawned` so the caller can append them after the current
/// pass; already-destroyed asteroids are ignored.
pub fn break_up(
    asteroid: &mut Asteroid,
    impact_angle: f32,
    config: &GameConfig,
    rng: &mut impl Rng,
    effects: &mut Effects,
    spawned: &mut Vec<Asteroid>,
) -> bool {
    if asteroid.destroyed {
        return false;
    }
    asteroid.destroyed = true;
    effects.burst(rng, asteroid.kin.pos, EXPLOSION_PARTICLES, &asteroid.color);
    effects.shatter_outline(asteroid.kin.pos, &asteroid.outline, &asteroid.color);
    spawned.extend(fragment(asteroid, impact_angle, config, rng));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parent(radius: f32, hp: f32) -> Asteroid {
        Asteroid {
            kin: Kinetic::new(Vec2::new(500.0, 500.0), Vec2::ZERO),
            radius,
            outline: vec![Vec2::X * radius, Vec2::Y * radius, Vec2::NEG_X * radius],
            hp,
            mass: radius * GRAVITY_MULT,
            color: "#f0f".into(),
            spawn_grace: 0.0,
            destroyed: false,
        }
    }

    #[test]
    fn radius_45_splits_into_three_area_preserving_children() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let children = fragment(&parent(45.0, 0.0), 0.0, &config, &mut rng);
        assert_eq!(children.len(), 3);
        for child in &children {
            assert!((child.radius - 45.0 / 3.0_f32.sqrt()).abs() < 1e-3);
            assert_eq!(child.hp, 1.0);
            assert_eq!(child.color, "#f0f");
            assert_eq!(child.spawn_grace, FRAGMENT_SPAWN_GRACE);
            assert!((child.mass - config.asteroid_mass(child.radius)).abs() < 1e-6);
        }
    }

    #[test]
    fn children_inherit_reduced_hp() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let children = fragment(&parent(60.0, 4.0), 1.0, &config, &mut rng);
        assert!(children.iter().all(|c| c.hp == 3.0));
    }

    #[test]
    fn radius_20_fizzles() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        assert!(fragment(&parent(20.0, 0.0), 0.0, &config, &mut rng).is_empty());
        assert!(split_plan(29.9, 15.0).is_none());
    }

    #[test]
    fn children_scatter_opposite_the_impact() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(6);
        let p = parent(30.0, 0.0);
        // Impact from +x: the first child heads toward -x.
        let children = fragment(&p, 0.0, &config, &mut rng);
        assert_eq!(children.len(), 2);
        assert!(children[0].kin.pos.x < p.kin.pos.x);
        assert!(children[0].kin.vel.x < 0.0);
        let offset = children[0].kin.pos.distance(p.kin.pos);
        assert!((offset - children[0].radius * FRAGMENT_OFFSET).abs() < 1e-3);
    }

    #[test]
    fn break_up_is_idempotent() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut fx = Effects::default();
        let mut spawned = Vec::new();
        let mut a = parent(45.0, 0.0);
        assert!(break_up(&mut a, 0.0, &config, &mut rng, &mut fx, &mut spawned));
        assert!(!break_up(&mut a, 0.0, &config, &mut rng, &mut fx, &mut spawned));
        assert_eq!(spawned.len(), 3);
        assert_eq!(fx.debris.len(), 3);
    }
}
