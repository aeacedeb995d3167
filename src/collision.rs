//! Narrow-phase contact tests and responses.
//!
//! ## Passes (run in this order every live tick)
//!
//! | Pass                    | Pairing                                   |
//! |-------------------------|-------------------------------------------|
//! | [`projectiles_vs_craft`] | projectile → craft hull                  |
//! | [`projectiles_vs_targets`] | projectile → asteroid, then enemy      |
//! | [`asteroid_impacts`]    | asteroid ↔ asteroid                       |
//! | [`craft_vs_asteroids`]  | craft hull ↔ asteroid                     |
//! | [`planet_contacts`]     | planet → craft, asteroid, projectile, pickup |
//! | [`pickup_contacts`]     | pickup ↔ asteroid, projectile, craft      |
//!
//! Each pass walks its collections in index order and only flags entities as
//! destroyed; fragments are pushed to `spawned`.  The caller compacts the
//! store and appends the fragments between passes.
//!
//! Craft contacts use the triangular hull ([`Craft::precise_hull_test`]);
//! everything else is circle–circle on raw planar coordinates.
//!
//! [`Craft::precise_hull_test`]: crate::craft::Craft::precise_hull_test

use crate::constants::*;
use crate::entities::{Asteroid, BodyRef, EntityStore};
use crate::events::SimEvent;
use crate::fragmentation::break_up;
use crate::geometry::{angle_between, heading, Circle};
use crate::lifecycle::{asteroid_hit_score, destroy_craft};
use crate::simulation::TickContext;
use crate::spawn::apply_pickup;
use bevy::log::trace;
use bevy::prelude::*;

/// Outcome of something striking the craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strike {
    /// The shield took it; the attacker is destroyed.
    Absorbed,
    /// Armor lost one point (and possibly the craft).
    Damaged,
    /// Invulnerable or already dead; nothing happened to the craft.
    Ignored,
}

/// Velocity changes for two bodies in contact: a fixed separating impulse
/// along the contact normal, each side scaled by the other's mass over its own.
pub fn contact_impulse(a_pos: Vec2, a_mass: f32, b_pos: Vec2, b_mass: f32) -> (Vec2, Vec2) {
    let normal = (b_pos - a_pos).try_normalize().unwrap_or(Vec2::X);
    (
        -normal * CONTACT_IMPULSE * b_mass / a_mass,
        normal * CONTACT_IMPULSE * a_mass / b_mass,
    )
}

/// Apply the craft rules to a hit from `attacker`.
///
/// Shield up: the attacker is destroyed (asteroids break up).  Otherwise,
/// outside the invulnerability window, armor drops by one, an attacking
/// asteroid loses one hit point, and empty armor destroys the craft.
/// Projectiles and enemies are consumed by the caller whatever the outcome.
pub(crate) fn strike_craft(
    store: &mut EntityStore,
    ctx: &mut TickContext,
    spawned: &mut Vec<Asteroid>,
    attacker: BodyRef,
) -> Strike {
    let Some(contact) = store.circle(attacker).map(|c| c.center) else {
        return Strike::Ignored;
    };
    if !store.craft.alive {
        return Strike::Ignored;
    }
    let impact_angle = angle_between(store.craft.kin.pos, contact);

    if store.craft.is_shielded() {
        store.effects.burst(ctx.rng, contact, IMPACT_PARTICLES, "#ff0");
        match attacker {
            BodyRef::Asteroid(i) => {
                if let Some(a) = store.asteroids.get_mut(i) {
                    if break_up(a, impact_angle, ctx.config, ctx.rng, &mut store.effects, spawned) {
                        ctx.events.push(SimEvent::Explosion { pos: contact });
                    }
                }
            }
            other => store.mark_destroyed(other),
        }
        return Strike::Absorbed;
    }
    if store.craft.is_invulnerable() {
        return Strike::Ignored;
    }

    store.craft.armor = store.craft.armor.saturating_sub(1);
    let flash = store.craft.kin.pos + heading(impact_angle) * store.craft.radius;
    store.effects.burst(ctx.rng, flash, PICKUP_PARTICLES, "#f00");
    ctx.events.push(SimEvent::Hit { pos: flash });
    trace!("craft hit by {attacker:?}; armor {}", store.craft.armor);

    if let BodyRef::Asteroid(i) = attacker {
        if let Some(a) = store.asteroids.get_mut(i) {
            a.hp -= 1.0;
            if a.hp <= 0.0 && break_up(a, impact_angle, ctx.config, ctx.rng, &mut store.effects, spawned) {
                ctx.events.push(SimEvent::Explosion { pos: contact });
            }
        }
    }
    if store.craft.armor == 0 {
        destroy_craft(&mut store.craft, &mut store.effects, ctx);
    }
    Strike::Damaged
}

/// Projectiles that reach the craft hull (including the craft's own rounds).
pub(crate) fn projectiles_vs_craft(store: &mut EntityStore, ctx: &mut TickContext, spawned: &mut Vec<Asteroid>) {
    for i in 0..store.projectiles.len() {
        if !store.craft.alive {
            return;
        }
        let p = &store.projectiles[i];
        if p.destroyed || !store.craft.precise_hull_test(&p.circle()) {
            continue;
        }
        store.projectiles[i].destroyed = true;
        strike_craft(store, ctx, spawned, BodyRef::Projectile(i));
    }
}

/// Each projectile hits at most one target: the first asteroid it overlaps,
/// otherwise the first enemy.
pub(crate) fn projectiles_vs_targets(store: &mut EntityStore, ctx: &mut TickContext, spawned: &mut Vec<Asteroid>) {
    let EntityStore {
        projectiles,
        asteroids,
        enemies,
        effects,
        ..
    } = store;

    for p in projectiles.iter_mut().filter(|p| !p.destroyed) {
        let shot = p.circle();

        if let Some(a) = asteroids
            .iter_mut()
            .find(|a| !a.destroyed && a.circle().overlaps(&shot))
        {
            p.destroyed = true;
            ctx.round.add_score(asteroid_hit_score(a.hp));
            effects.burst(ctx.rng, p.kin.pos, IMPACT_PARTICLES, &a.color);
            ctx.events.push(SimEvent::Hit { pos: p.kin.pos });
            a.kin.vel += p.kin.vel * ctx.config.projectile_mass * KNOCKBACK_FACTOR / a.mass;
            a.hp -= 1.0;
            if a.hp <= 0.0 {
                let angle = angle_between(p.kin.pos, a.kin.pos);
                if break_up(a, angle, ctx.config, ctx.rng, effects, spawned) {
                    ctx.events.push(SimEvent::Explosion { pos: a.kin.pos });
                }
            }
            continue;
        }

        if let Some(e) = enemies
            .iter_mut()
            .find(|e| !e.destroyed && e.circle().overlaps(&shot))
        {
            p.destroyed = true;
            e.hp -= 1.0;
            effects.burst(ctx.rng, e.kin.pos, EXPLOSION_PARTICLES, "#f0f");
            ctx.events.push(SimEvent::Hit { pos: e.kin.pos });
            if e.hp <= 0.0 {
                e.destroyed = true;
                effects.burst(ctx.rng, e.kin.pos, EXPLOSION_PARTICLES, "#f0f");
                ctx.round.add_score(ENEMY_KILL_SCORE);
                ctx.events.push(SimEvent::Explosion { pos: e.kin.pos });
            }
        }
    }
}

/// Mutual asteroid impacts: separating impulse and half a hit point each.
/// Asteroids still in spawn grace are skipped.
pub(crate) fn asteroid_impacts(store: &mut EntityStore, ctx: &mut TickContext, spawned: &mut Vec<Asteroid>) {
    let EntityStore {
        asteroids, effects, ..
    } = store;

    for i in 0..asteroids.len() {
        let (head, tail) = asteroids.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if a.destroyed {
                break;
            }
            if b.destroyed || a.in_grace() || b.in_grace() || !a.circle().overlaps(&b.circle()) {
                continue;
            }
            let (dv_a, dv_b) = contact_impulse(a.kin.pos, a.mass, b.kin.pos, b.mass);
            a.kin.vel += dv_a;
            b.kin.vel += dv_b;

            let mid = (a.kin.pos + b.kin.pos) * 0.5;
            effects.burst(ctx.rng, mid, IMPACT_PARTICLES, &a.color);
            effects.burst(ctx.rng, mid, IMPACT_PARTICLES, &b.color);

            a.hp -= ASTEROID_IMPACT_DAMAGE;
            b.hp -= ASTEROID_IMPACT_DAMAGE;
            let angle = angle_between(a.kin.pos, b.kin.pos);
            if a.hp <= 0.0 && break_up(a, angle + std::f32::consts::PI, ctx.config, ctx.rng, effects, spawned) {
                ctx.events.push(SimEvent::Explosion { pos: a.kin.pos });
            }
            if b.hp <= 0.0 && break_up(b, angle, ctx.config, ctx.rng, effects, spawned) {
                ctx.events.push(SimEvent::Explosion { pos: b.kin.pos });
            }
        }
    }
}

/// Craft hull against asteroids: always an impulse, then the strike rules.
pub(crate) fn craft_vs_asteroids(store: &mut EntityStore, ctx: &mut TickContext, spawned: &mut Vec<Asteroid>) {
    for i in 0..store.asteroids.len() {
        if !store.craft.alive {
            return;
        }
        let a = &store.asteroids[i];
        if a.destroyed || a.in_grace() || !store.craft.precise_hull_test(&a.circle()) {
            continue;
        }
        let (dv_craft, dv_rock) =
            contact_impulse(store.craft.kin.pos, store.craft.mass, a.kin.pos, a.mass);
        store.craft.kin.vel += dv_craft;
        store.asteroids[i].kin.vel += dv_rock;
        strike_craft(store, ctx, spawned, BodyRef::Asteroid(i));
    }
}

/// Everything that touches a planet.
///
/// A shielded craft bounces off at no less than [`PLANET_BOUNCE_SPEED`];
/// an unshielded one is destroyed even while invulnerable.  Asteroids break
/// up, projectiles and pickups are simply destroyed.  Every impact shakes
/// the planet.
pub(crate) fn planet_contacts(store: &mut EntityStore, ctx: &mut TickContext, spawned: &mut Vec<Asteroid>) {
    let EntityStore {
        craft,
        planets,
        asteroids,
        projectiles,
        pickups,
        effects,
        ..
    } = store;

    for planet in planets.iter_mut() {
        let body = planet.circle();

        if craft.alive && craft.precise_hull_test(&body) {
            planet.shake_from(craft.mass);
            if craft.is_shielded() {
                let out = (craft.kin.pos - planet.pos).try_normalize().unwrap_or(Vec2::X);
                let speed = craft.kin.vel.length().max(PLANET_BOUNCE_SPEED);
                craft.kin.vel = out * speed;
                craft.kin.pos = planet.pos + out * (planet.radius + craft.radius + 1.0);
                effects.burst(ctx.rng, craft.kin.pos, PICKUP_PARTICLES, "#ff0");
            } else {
                effects.burst(ctx.rng, craft.kin.pos, EXPLOSION_PARTICLES, "#fff");
                destroy_craft(craft, effects, ctx);
            }
        }

        for a in asteroids.iter_mut().filter(|a| !a.destroyed) {
            if !a.circle().overlaps(&body) {
                continue;
            }
            planet.shake_from(a.mass);
            if break_up(a, angle_between(planet.pos, a.kin.pos), ctx.config, ctx.rng, effects, spawned) {
                ctx.events.push(SimEvent::Explosion { pos: a.kin.pos });
            }
        }

        for p in projectiles.iter_mut().filter(|p| !p.destroyed) {
            if p.kin.pos.distance_squared(planet.pos) < planet.radius * planet.radius {
                planet.shake_from(ctx.config.projectile_mass);
                effects.burst(ctx.rng, p.kin.pos, IMPACT_PARTICLES, "#fff");
                p.destroyed = true;
            }
        }

        for p in pickups.iter_mut().filter(|p| !p.destroyed) {
            if p.circle().overlaps(&body) {
                planet.shake_from(1.0);
                effects.burst(ctx.rng, p.kin.pos, PICKUP_PARTICLES, planet.color.as_str());
                p.destroyed = true;
            }
        }
    }
}

/// Pickups are worn down by asteroids, collected by a projectile or by the
/// craft, and destroyed without effect once their hit points run out.
pub(crate) fn pickup_contacts(store: &mut EntityStore, ctx: &mut TickContext, spawned: &mut Vec<Asteroid>) {
    let EntityStore {
        craft,
        asteroids,
        projectiles,
        pickups,
        effects,
        ..
    } = store;

    for p in pickups.iter_mut().filter(|p| !p.destroyed) {
        let zone = p.circle();

        for a in asteroids.iter_mut().filter(|a| !a.destroyed) {
            if !a.circle().overlaps(&zone) {
                continue;
            }
            effects.burst(ctx.rng, (p.kin.pos + a.kin.pos) * 0.5, IMPACT_PARTICLES, "#fff");
            p.hp -= 1.0;
            a.hp -= ASTEROID_IMPACT_DAMAGE;
            if a.hp <= 0.0 {
                let angle = angle_between(p.kin.pos, a.kin.pos);
                if break_up(a, angle, ctx.config, ctx.rng, effects, spawned) {
                    ctx.events.push(SimEvent::Explosion { pos: a.kin.pos });
                }
            }
        }

        let shot = projectiles
            .iter_mut()
            .find(|b| !b.destroyed && zone.overlaps(&Circle::new(b.kin.pos, 0.0)));
        let collected = if let Some(b) = shot {
            b.destroyed = true;
            true
        } else {
            craft.alive && Circle::new(craft.kin.pos, craft.radius).overlaps(&zone)
        };

        if collected {
            p.destroyed = true;
            effects.burst(ctx.rng, p.kin.pos, PICKUP_PARTICLES, "#ff0");
            apply_pickup(p.kind, craft, ctx);
            ctx.events.push(SimEvent::PickupCollected {
                kind: p.kind,
                pos: p.kin.pos,
            });
        } else if p.hp <= 0.0 {
            p.destroyed = true;
            effects.burst(ctx.rng, p.kin.pos, PICKUP_PARTICLES, "#888");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entities::{Enemy, Kinetic, Pickup, PickupKind, Planet, Projectile};
    use crate::lifecycle::{CraftState, Round};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        config: GameConfig,
        rng: StdRng,
        round: Round,
        events: Vec<SimEvent>,
        store: EntityStore,
        spawned: Vec<Asteroid>,
    }

    impl Fixture {
        fn new() -> Self {
            let config = GameConfig::default();
            let mut store = EntityStore::default();
            store.craft.kin.pos = Vec2::new(1000.0, 1000.0);
            Self {
                round: Round::new(&config),
                config,
                rng: StdRng::seed_from_u64(21),
                events: Vec::new(),
                store,
                spawned: Vec::new(),
            }
        }

        fn run(&mut self, pass: fn(&mut EntityStore, &mut TickContext, &mut Vec<Asteroid>)) {
            let mut ctx = TickContext {
                config: &self.config,
                rng: &mut self.rng,
                round: &mut self.round,
                events: &mut self.events,
            };
            pass(&mut self.store, &mut ctx, &mut self.spawned);
        }
    }

    fn rock(pos: Vec2, radius: f32, hp: f32) -> Asteroid {
        Asteroid {
            kin: Kinetic::new(pos, Vec2::ZERO),
            radius,
            outline: vec![Vec2::X * radius, Vec2::Y * radius, Vec2::NEG_X * radius],
            hp,
            mass: radius * GRAVITY_MULT,
            color: "#0f0".into(),
            spawn_grace: 0.0,
            destroyed: false,
        }
    }

    fn shot(pos: Vec2, vel: Vec2) -> Projectile {
        Projectile {
            kin: Kinetic::new(pos, vel),
            life: 1.0,
            boosted: false,
            destroyed: false,
        }
    }

    #[test]
    fn impulse_is_split_inversely_by_mass() {
        let (da, db) = contact_impulse(Vec2::ZERO, 10.0, Vec2::new(5.0, 0.0), 5.0);
        assert!((da.x + CONTACT_IMPULSE * 0.5).abs() < 1e-6);
        assert!((db.x - CONTACT_IMPULSE * 2.0).abs() < 1e-6);
    }

    #[test]
    fn last_armor_point_destroys_craft_in_the_same_pass() {
        let mut fx = Fixture::new();
        fx.store.craft.armor = 1;
        fx.store.asteroids.push(rock(Vec2::new(1030.0, 1000.0), 20.0, 3.0));
        fx.run(craft_vs_asteroids);

        assert_eq!(fx.store.craft.armor, 0);
        assert!(!fx.store.craft.alive);
        assert_eq!(fx.round.state, CraftState::Dead);
        assert_eq!(fx.store.asteroids[0].hp, 2.0);
        let destroyed = fx
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::CraftDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn invulnerable_craft_takes_no_damage_but_still_bounces() {
        let mut fx = Fixture::new();
        fx.store.craft.invulnerability = 2.0;
        fx.store.asteroids.push(rock(Vec2::new(1030.0, 1000.0), 20.0, 3.0));
        fx.run(craft_vs_asteroids);
        assert_eq!(fx.store.craft.armor, CRAFT_ARMOR);
        assert!(fx.store.craft.kin.vel.x < 0.0);
        assert_eq!(fx.store.asteroids[0].hp, 3.0);
    }

    #[test]
    fn shield_absorbs_and_breaks_the_asteroid() {
        let mut fx = Fixture::new();
        fx.store.craft.shield_timer = 5.0;
        fx.store.asteroids.push(rock(Vec2::new(1040.0, 1000.0), 45.0, 3.0));
        fx.run(craft_vs_asteroids);
        assert_eq!(fx.store.craft.armor, CRAFT_ARMOR);
        assert!(fx.store.asteroids[0].destroyed);
        assert_eq!(fx.spawned.len(), 3);
    }

    #[test]
    fn grace_period_exempts_craft_contact() {
        let mut fx = Fixture::new();
        let mut a = rock(Vec2::new(1030.0, 1000.0), 20.0, 3.0);
        a.spawn_grace = 0.2;
        fx.store.asteroids.push(a);
        fx.run(craft_vs_asteroids);
        assert_eq!(fx.store.craft.armor, CRAFT_ARMOR);
    }

    #[test]
    fn projectile_kill_fragments_and_scores() {
        let mut fx = Fixture::new();
        fx.store.asteroids.push(rock(Vec2::new(500.0, 500.0), 45.0, 1.0));
        fx.store.projectiles.push(shot(Vec2::new(460.0, 500.0), Vec2::new(5.0, 0.0)));
        fx.run(projectiles_vs_targets);

        assert!(fx.store.projectiles[0].destroyed);
        assert!(fx.store.asteroids[0].destroyed);
        assert_eq!(fx.round.score, 2);
        assert_eq!(fx.spawned.len(), 3);
        for child in &fx.spawned {
            assert!((child.radius - 45.0 / 3.0_f32.sqrt()).abs() < 1e-3);
            assert_eq!(child.hp, 1.0);
        }
    }

    #[test]
    fn projectile_hit_knocks_the_asteroid_back() {
        let mut fx = Fixture::new();
        fx.store.asteroids.push(rock(Vec2::new(500.0, 500.0), 60.0, 4.0));
        fx.store.projectiles.push(shot(Vec2::new(450.0, 500.0), Vec2::new(5.0, 0.0)));
        fx.run(projectiles_vs_targets);
        let a = &fx.store.asteroids[0];
        assert_eq!(a.hp, 3.0);
        assert!((a.kin.vel.x - 5.0 * PROJECTILE_MASS / a.mass).abs() < 1e-6);
        assert_eq!(fx.round.score, 16);
    }

    #[test]
    fn projectile_kills_enemy_for_fixed_score() {
        let mut fx = Fixture::new();
        fx.store.enemies.push(Enemy::new(Vec2::new(300.0, 300.0), ENEMY_DETECTION_RADIUS));
        fx.store.projectiles.push(shot(Vec2::new(310.0, 300.0), Vec2::ZERO));
        fx.run(projectiles_vs_targets);
        assert!(fx.store.enemies[0].destroyed);
        assert_eq!(fx.round.score, ENEMY_KILL_SCORE);
    }

    #[test]
    fn own_round_at_the_nose_does_not_hit_the_craft() {
        let mut fx = Fixture::new();
        let nose = fx.store.craft.nose();
        fx.store.projectiles.push(shot(nose + Vec2::X * MUZZLE_CLEARANCE, Vec2::X));
        fx.run(projectiles_vs_craft);
        assert!(!fx.store.projectiles[0].destroyed);

        fx.store.projectiles.push(shot(Vec2::new(995.0, 1000.0), Vec2::ZERO));
        fx.run(projectiles_vs_craft);
        assert!(fx.store.projectiles[1].destroyed);
        assert_eq!(fx.store.craft.armor, CRAFT_ARMOR - 1);
    }

    #[test]
    fn asteroid_pair_loses_half_a_point_each() {
        let mut fx = Fixture::new();
        fx.store.asteroids.push(rock(Vec2::new(100.0, 100.0), 30.0, 0.5));
        fx.store.asteroids.push(rock(Vec2::new(150.0, 100.0), 30.0, 2.0));
        fx.run(asteroid_impacts);
        assert!(fx.store.asteroids[0].destroyed);
        assert_eq!(fx.store.asteroids[1].hp, 1.5);
        assert!(fx.store.asteroids[0].kin.vel.x < 0.0);
        assert!(fx.store.asteroids[1].kin.vel.x > 0.0);
        assert_eq!(fx.spawned.len(), 2);
    }

    #[test]
    fn shielded_craft_bounces_off_planet() {
        let mut fx = Fixture::new();
        fx.store.craft.shield_timer = 1.0;
        fx.store.planets.push(Planet {
            pos: Vec2::new(1060.0, 1000.0),
            radius: 50.0,
            mass: 200.0,
            color: "#00f".into(),
            shake: 0.0,
        });
        fx.run(planet_contacts);
        assert!(fx.store.craft.alive);
        assert!(fx.store.craft.kin.vel.x <= -PLANET_BOUNCE_SPEED + 1e-6);
        assert!(fx.store.craft.kin.pos.distance(Vec2::new(1060.0, 1000.0)) > 50.0 + DEFAULT_CRAFT_RADIUS);
        assert!(fx.store.planets[0].shake > 0.0);
    }

    #[test]
    fn unshielded_planet_impact_kills_even_when_invulnerable() {
        let mut fx = Fixture::new();
        fx.store.craft.invulnerability = 3.0;
        fx.store.planets.push(Planet {
            pos: Vec2::new(1060.0, 1000.0),
            radius: 50.0,
            mass: 200.0,
            color: "#00f".into(),
            shake: 0.0,
        });
        fx.run(planet_contacts);
        assert!(!fx.store.craft.alive);
        assert_eq!(fx.round.lives, CRAFT_LIVES - 1);
    }

    #[test]
    fn craft_collects_pickup_and_projectile_collects_remotely() {
        let mut fx = Fixture::new();
        fx.store.pickups.push(Pickup::new(PickupKind::Shield, Vec2::new(1030.0, 1000.0), Vec2::ZERO));
        fx.store.pickups.push(Pickup::new(PickupKind::TimeBonus, Vec2::new(200.0, 200.0), Vec2::ZERO));
        fx.store.projectiles.push(shot(Vec2::new(210.0, 200.0), Vec2::ZERO));
        let timer = fx.round.timer;
        fx.run(pickup_contacts);

        assert!(fx.store.pickups.iter().all(|p| p.destroyed));
        assert_eq!(fx.store.craft.shield_timer, fx.config.shield_duration);
        assert_eq!(fx.round.score, SHIELD_PICKUP_SCORE);
        assert_eq!(fx.round.timer, timer + TIME_BONUS);
        assert!(fx.store.projectiles[0].destroyed);
    }

    #[test]
    fn worn_out_pickup_vanishes_without_effect() {
        let mut fx = Fixture::new();
        let mut p = Pickup::new(PickupKind::Heal, Vec2::new(200.0, 200.0), Vec2::ZERO);
        p.hp = 1.0;
        fx.store.pickups.push(p);
        fx.store.asteroids.push(rock(Vec2::new(230.0, 200.0), 30.0, 3.0));
        fx.round.lives = 2;
        fx.run(pickup_contacts);
        assert!(fx.store.pickups[0].destroyed);
        assert_eq!(fx.round.lives, 2);
        assert_eq!(fx.store.asteroids[0].hp, 2.5);
    }

    #[test]
    fn planet_shake_uses_configured_projectile_mass() {
        let mut fx = Fixture::new();
        fx.config.projectile_mass = 2.0;
        fx.store.planets.push(Planet {
            pos: Vec2::new(300.0, 300.0),
            radius: 50.0,
            mass: 200.0,
            color: "#00f".into(),
            shake: 0.0,
        });
        fx.store.projectiles.push(shot(Vec2::new(310.0, 300.0), Vec2::ZERO));
        fx.run(planet_contacts);
        assert!(fx.store.projectiles[0].destroyed);
        assert!((fx.store.planets[0].shake - 2.0 / 200.0).abs() < 1e-6);
    }

    #[test]
    fn craft_collects_pickups_only_within_its_radius() {
        let mut fx = Fixture::new();
        let craft_pos = fx.store.craft.kin.pos;
        let radius = fx.store.craft.radius;
        // Inside the bounding circle but outside the plain radius.
        let mut near_miss = Pickup::new(PickupKind::Heal, craft_pos + Vec2::new(radius + 1.5, 0.0), Vec2::ZERO);
        near_miss.size = 1.0;
        let mut touching = Pickup::new(PickupKind::Shield, craft_pos + Vec2::new(0.0, radius), Vec2::ZERO);
        touching.size = 1.0;
        fx.store.pickups.push(near_miss);
        fx.store.pickups.push(touching);
        fx.run(pickup_contacts);

        assert!(!fx.store.pickups[0].destroyed);
        assert!(fx.store.pickups[1].destroyed);
        assert_eq!(fx.store.craft.shield_timer, fx.config.shield_duration);
    }
}
