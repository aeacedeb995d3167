//! Enemy behaviour: patrol, alert, obstacle avoidance and ramming.
//!
//! Each enemy is in one of two modes, re-evaluated every tick:
//!
//! - **Patrol**: small random acceleration impulses.
//! - **Alert**: accelerate toward the craft.  Entered whenever the craft is
//!   alive and inside the detection radius; the rising edge raises a
//!   [`SimEvent::Alarm`].
//!
//! In both modes, asteroids and planets within `radius + 2 × ENEMY_RADIUS`
//! push the enemy away, and actual overlap destroys it.  Touching a live craft
//! in either mode is a ram: it goes through the normal strike rules and
//! destroys the enemy.

use crate::collision::{contact_impulse, strike_craft};
use crate::constants::*;
use crate::entities::{Asteroid, BodyRef, EntityStore};
use crate::events::SimEvent;
use crate::geometry::{cap_speed, Circle};
use crate::simulation::TickContext;
use bevy::prelude::*;
use rand::Rng;

enum Proximity {
    Clear,
    /// Inside the avoidance band; carries the repulsion for this tick.
    Near(Vec2),
    Overlap,
}

fn proximity(pos: Vec2, obstacle: &Circle, step: f32) -> Proximity {
    let away = pos - obstacle.center;
    let dist = away.length();
    if dist < obstacle.radius + ENEMY_RADIUS {
        Proximity::Overlap
    } else if dist < obstacle.radius + ENEMY_RADIUS * ENEMY_AVOID_RADIUS_FACTOR {
        let dir = away.try_normalize().unwrap_or(Vec2::X);
        Proximity::Near(dir * ENEMY_ACCEL * ENEMY_AVOID_ACCEL_FACTOR * step)
    } else {
        Proximity::Clear
    }
}

/// Advance every enemy by one tick.
pub(crate) fn update_enemies(
    store: &mut EntityStore,
    ctx: &mut TickContext,
    spawned: &mut Vec<Asteroid>,
    step: f32,
) {
    for i in 0..store.enemies.len() {
        if store.enemies[i].destroyed {
            continue;
        }

        let craft_pos = store.craft.kin.pos;
        let enemy_pos = store.enemies[i].kin.pos;

        // ── Ram ──────────────────────────────────────────────────────────────
        if store.craft.alive && store.craft.precise_hull_test(&store.enemies[i].circle()) {
            let (dv_craft, _) = contact_impulse(craft_pos, store.craft.mass, enemy_pos, ENEMY_MASS);
            store.craft.kin.vel += dv_craft;
            strike_craft(store, ctx, spawned, BodyRef::Enemy(i));
            store.effects.burst(ctx.rng, enemy_pos, EXPLOSION_PARTICLES, "#0f0");
            store.enemies[i].destroyed = true;
            continue;
        }

        // ── Mode ─────────────────────────────────────────────────────────────
        let sees_craft = store.craft.alive
            && enemy_pos.distance(craft_pos) < store.enemies[i].detection_radius;

        if sees_craft {
            let enemy = &mut store.enemies[i];
            if !enemy.alerted {
                enemy.alerted = true;
                ctx.events.push(SimEvent::Alarm { pos: enemy_pos });
            }
            let toward = (craft_pos - enemy_pos).try_normalize().unwrap_or(Vec2::X);
            enemy.kin.vel += toward * ENEMY_ACCEL * step;
        } else {
            let jitter = Vec2::new(ctx.rng.gen_range(-0.5..0.5), ctx.rng.gen_range(-0.5..0.5));
            let enemy = &mut store.enemies[i];
            enemy.alerted = false;
            enemy.kin.vel += jitter * ENEMY_ACCEL * step;
        }

        // ── Obstacles ────────────────────────────────────────────────────────
        let obstacles = store
            .asteroids
            .iter()
            .filter(|a| !a.destroyed)
            .map(|a| a.circle())
            .chain(store.planets.iter().map(|p| p.circle()));
        let mut push = Vec2::ZERO;
        let mut crashed = false;
        for obstacle in obstacles {
            match proximity(enemy_pos, &obstacle, step) {
                Proximity::Overlap => {
                    crashed = true;
                    break;
                }
                Proximity::Near(dv) => push += dv,
                Proximity::Clear => {}
            }
        }

        if crashed {
            store.effects.burst(ctx.rng, enemy_pos, EXPLOSION_PARTICLES, "#f0f");
            ctx.events.push(SimEvent::Explosion { pos: enemy_pos });
            store.enemies[i].destroyed = true;
            continue;
        }

        // ── Integrate ────────────────────────────────────────────────────────
        let enemy = &mut store.enemies[i];
        enemy.kin.vel = cap_speed(enemy.kin.vel + push, ctx.config.enemy_max_speed);
        enemy.kin.advance(step);
        if enemy.kin.vel.length_squared() > 0.0 {
            enemy.angle = enemy.kin.vel.y.atan2(enemy.kin.vel.x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entities::{Enemy, Kinetic, Planet};
    use crate::lifecycle::Round;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        config: GameConfig,
        rng: StdRng,
        round: Round,
        events: Vec<SimEvent>,
        store: EntityStore,
    }

    impl Fixture {
        fn new() -> Self {
            let config = GameConfig::default();
            let mut store = EntityStore::default();
            store.craft.kin.pos = Vec2::new(1500.0, 1500.0);
            Self {
                round: Round::new(&config),
                config,
                rng: StdRng::seed_from_u64(31),
                events: Vec::new(),
                store,
            }
        }

        fn tick(&mut self) {
            let mut ctx = TickContext {
                config: &self.config,
                rng: &mut self.rng,
                round: &mut self.round,
                events: &mut self.events,
            };
            let mut spawned = Vec::new();
            update_enemies(&mut self.store, &mut ctx, &mut spawned, 1.0);
        }

        fn alarms(&self) -> usize {
            self.events
                .iter()
                .filter(|e| matches!(e, SimEvent::Alarm { .. }))
                .count()
        }
    }

    #[test]
    fn patrol_to_alert_and_back() {
        let mut fx = Fixture::new();
        let detection = fx.config.enemy_detection_radius;
        fx.store
            .enemies
            .push(Enemy::new(Vec2::new(1500.0 - detection - 1.0, 1500.0), detection));

        fx.tick();
        assert!(!fx.store.enemies[0].alerted);

        // Same tick the distance condition first holds.
        fx.store.enemies[0].kin = Kinetic::new(Vec2::new(1500.0 - detection + 5.0, 1500.0), Vec2::ZERO);
        fx.tick();
        assert!(fx.store.enemies[0].alerted);
        assert_eq!(fx.alarms(), 1);
        assert!(fx.store.enemies[0].kin.vel.x > 0.0);

        fx.tick();
        assert_eq!(fx.alarms(), 1, "alarm fires on the rising edge only");

        fx.store.craft.alive = false;
        fx.tick();
        assert!(!fx.store.enemies[0].alerted);
    }

    #[test]
    fn ramming_damages_craft_and_destroys_enemy() {
        let mut fx = Fixture::new();
        fx.store
            .enemies
            .push(Enemy::new(Vec2::new(1525.0, 1500.0), ENEMY_DETECTION_RADIUS));
        fx.tick();
        assert!(fx.store.enemies[0].destroyed);
        assert_eq!(fx.store.craft.armor, CRAFT_ARMOR - 1);
    }

    #[test]
    fn patrolling_enemy_still_rams_on_contact() {
        let mut fx = Fixture::new();
        fx.config.enemy_detection_radius = 10.0;
        fx.store.enemies.push(Enemy::new(Vec2::new(1525.0, 1500.0), 10.0));
        fx.tick();
        assert!(!fx.store.enemies[0].alerted);
        assert!(fx.store.enemies[0].destroyed);
        assert_eq!(fx.store.craft.armor, CRAFT_ARMOR - 1);
        assert_eq!(fx.alarms(), 0);
    }

    #[test]
    fn planet_overlap_destroys_and_proximity_repels() {
        let mut fx = Fixture::new();
        fx.store.planets.push(Planet {
            pos: Vec2::new(200.0, 200.0),
            radius: 50.0,
            mass: 200.0,
            color: "#fff".into(),
            shake: 0.0,
        });
        fx.store.enemies.push(Enemy::new(Vec2::new(260.0, 200.0), ENEMY_DETECTION_RADIUS));
        fx.store.enemies.push(Enemy::new(Vec2::new(280.0, 200.0), ENEMY_DETECTION_RADIUS));
        fx.tick();
        assert!(fx.store.enemies[0].destroyed);
        assert!(!fx.store.enemies[1].destroyed);
        assert!(fx.store.enemies[1].kin.vel.x > 0.0);
    }

    #[test]
    fn enemy_speed_is_capped() {
        let mut fx = Fixture::new();
        let mut enemy = Enemy::new(Vec2::new(2500.0, 2500.0), 10.0);
        enemy.kin.vel = Vec2::new(50.0, 0.0);
        fx.store.enemies.push(enemy);
        fx.tick();
        assert!(fx.store.enemies[0].kin.vel.length() <= fx.config.enemy_max_speed + 1e-5);
    }
}
