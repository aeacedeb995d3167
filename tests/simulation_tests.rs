//! Whole-tick scenarios driven through the public [`Simulation`] API.
//!
//! Every test uses a seeded RNG so runs are reproducible.

use bevy::prelude::*;
use skirmish::entities::{Asteroid, Kinetic, Projectile};
use skirmish::{ControlIntent, CraftState, GameConfig, SimEvent, Simulation};

const DT: f32 = 1.0 / 60.0;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config() -> GameConfig {
    GameConfig {
        world_width: 1600.0,
        world_height: 1200.0,
        min_asteroids: 15,
        max_asteroids: 25,
        ..Default::default()
    }
}

/// A simulation with nothing but the craft, parked mid-world.
fn empty_sim(config: GameConfig) -> Simulation {
    let mut sim = Simulation::with_seed(config, 7);
    let world = sim.world_mut();
    world.clear_world();
    world.craft.kin = Kinetic::new(Vec2::new(600.0, 450.0), Vec2::ZERO);
    sim
}

fn rock(pos: Vec2, radius: f32, hp: f32) -> Asteroid {
    Asteroid {
        kin: Kinetic::new(pos, Vec2::ZERO),
        radius,
        outline: vec![Vec2::X * radius, Vec2::Y * radius, Vec2::NEG_X * radius],
        hp,
        mass: radius * 0.5,
        color: "#aaa".into(),
        spawn_grace: 0.0,
        destroyed: false,
    }
}

fn in_bounds(p: Vec2, config: &GameConfig) -> bool {
    (0.0..config.world_width).contains(&p.x) && (0.0..config.world_height).contains(&p.y)
}

// ── Invariants ────────────────────────────────────────────────────────────────

#[test]
fn positions_stay_on_the_torus_and_asteroids_stay_above_min_radius() {
    let mut sim = Simulation::with_seed(config(), 42);
    let mut fire = false;
    for tick in 0..1500 {
        // Pulse fire so the edge trigger keeps re-arming.
        fire = !fire;
        sim.set_intent(ControlIntent {
            thrust_forward: tick % 300 < 200,
            rotate_left: tick % 90 < 20,
            fire,
            ..Default::default()
        });
        sim.update(DT);

        let config = sim.config().clone();
        let world = sim.world();
        assert!(in_bounds(world.craft.kin.pos, &config), "craft at tick {tick}");
        for a in &world.asteroids {
            assert!(in_bounds(a.kin.pos, &config), "asteroid at tick {tick}");
            assert!(a.radius >= config.min_split_radius);
        }
        assert!(world.enemies.iter().all(|e| in_bounds(e.kin.pos, &config)));
        assert!(world.projectiles.iter().all(|p| in_bounds(p.kin.pos, &config)));
        assert!(world.pickups.iter().all(|p| in_bounds(p.kin.pos, &config)));
        assert!(world.planets.iter().all(|p| in_bounds(p.pos, &config)));
    }
}

#[test]
fn destruction_is_reported_at_most_once_per_tick() {
    let mut sim = Simulation::with_seed(config(), 9);
    for _ in 0..3000 {
        sim.update(DT);
        let destroyed = sim
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SimEvent::CraftDestroyed { .. }))
            .count();
        assert!(destroyed <= 1);
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn projectile_kill_splits_a_large_asteroid_into_three() {
    let mut sim = empty_sim(config());
    let world = sim.world_mut();
    world.asteroids.push(rock(Vec2::new(1200.0, 800.0), 45.0, 1.0));
    world.projectiles.push(Projectile {
        kin: Kinetic::new(Vec2::new(1160.0, 800.0), Vec2::ZERO),
        life: 1.0,
        boosted: false,
        destroyed: false,
    });

    sim.update(DT);

    let children = &sim.world().asteroids;
    assert_eq!(children.len(), 3);
    for child in children {
        assert!((child.radius - 45.0 / 3.0_f32.sqrt()).abs() < 1e-3);
        assert_eq!(child.hp, 1.0);
    }
    assert_eq!(sim.round().score, 2);
    assert!(sim.world().projectiles.is_empty());
}

#[test]
fn small_asteroid_fizzles() {
    let mut sim = empty_sim(config());
    let world = sim.world_mut();
    world.asteroids.push(rock(Vec2::new(1200.0, 800.0), 20.0, 1.0));
    world.projectiles.push(Projectile {
        kin: Kinetic::new(Vec2::new(1185.0, 800.0), Vec2::ZERO),
        life: 1.0,
        boosted: false,
        destroyed: false,
    });

    sim.update(DT);
    assert!(sim.world().asteroids.is_empty());
    assert!(sim
        .drain_events()
        .iter()
        .any(|e| matches!(e, SimEvent::Explosion { .. })));
}

#[test]
fn last_armor_point_kills_then_respawns() {
    let mut sim = empty_sim(config());
    let craft_pos = sim.world().craft.kin.pos;
    let world = sim.world_mut();
    world.craft.armor = 1;
    world.asteroids.push(rock(craft_pos + Vec2::new(30.0, 0.0), 30.0, 3.0));

    sim.update(DT);
    assert_eq!(sim.world().craft.armor, 0);
    assert!(!sim.world().craft.alive);
    assert_eq!(sim.round().state, CraftState::Dead);
    let events = sim.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::CraftDestroyed { lives_left: 4, .. })));

    let mut ticks = 0;
    while sim.round().state == CraftState::Dead && ticks < 120 {
        sim.update(DT);
        ticks += 1;
    }
    assert_eq!(sim.round().state, CraftState::Alive);
    assert!((55..=65).contains(&ticks), "respawned after {ticks} ticks");
    assert_eq!(sim.world().craft.armor, 5);
    assert!(sim.world().craft.invulnerability > 0.0);
    assert!(sim.drain_events().iter().any(|e| matches!(e, SimEvent::Respawned { .. })));
}

#[test]
fn round_timer_reaching_zero_ends_the_round_with_lives_left() {
    let mut sim = empty_sim(GameConfig {
        round_time: 0.5,
        ..config()
    });
    sim.update(0.25);
    assert_eq!(sim.round().state, CraftState::Alive);
    sim.update(0.25);

    assert_eq!(sim.round().timer, 0.0);
    assert_eq!(sim.round().state, CraftState::GameOver);
    assert!(sim.round().lives > 0);
    assert!(!sim.world().craft.alive);
    let events = sim.drain_events();
    assert!(events.iter().any(|e| matches!(e, SimEvent::CraftDestroyed { .. })));
    assert!(events.contains(&SimEvent::GameOver { timed_out: true }));
    assert_eq!(sim.hud().timer_label(), "00:00");
}

#[test]
fn shield_absorbs_a_ram_and_keeps_armor() {
    let mut sim = empty_sim(config());
    let craft_pos = sim.world().craft.kin.pos;
    let world = sim.world_mut();
    world.craft.shield_timer = 10.0;
    world.asteroids.push(rock(craft_pos + Vec2::new(30.0, 0.0), 45.0, 3.0));

    sim.update(DT);
    assert_eq!(sim.world().craft.armor, 5);
    assert!(sim.world().craft.alive);
    // Broken up rather than bounced.
    assert_eq!(sim.world().asteroids.len(), 3);
}

#[test]
fn enemy_alerts_when_the_craft_comes_into_range() {
    let mut sim = empty_sim(config());
    let craft_pos = sim.world().craft.kin.pos;
    let detection = sim.config().enemy_detection_radius;
    sim.world_mut().enemies.push(skirmish::entities::Enemy::new(
        craft_pos + Vec2::new(detection + 50.0, 0.0),
        detection,
    ));

    sim.update(DT);
    assert!(!sim.world().enemies[0].alerted);

    sim.world_mut().craft.kin.pos += Vec2::new(100.0, 0.0);
    sim.update(DT);
    assert!(sim.world().enemies[0].alerted);
    assert!(sim.drain_events().iter().any(|e| matches!(e, SimEvent::Alarm { .. })));
}
