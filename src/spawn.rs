//! Round population and the pickup scheduler.
//!
//! At round start the planet, asteroid and enemy counts are each drawn
//! uniformly from their configured `[min, max]` range.  During play three
//! independent countdowns introduce pickups:
//!
//! | Countdown  | Spawns                                   | Re-arm range            |
//! |------------|------------------------------------------|-------------------------|
//! | generic    | weapon boost (70 %) or shield            | [`PICKUP_INTERVAL`]      |
//! | heal       | heal                                     | [`HEAL_PICKUP_INTERVAL`] |
//! | time       | time bonus                               | [`TIME_PICKUP_INTERVAL`] |

use crate::config::GameConfig;
use crate::constants::*;
use crate::craft::Craft;
use crate::entities::{Asteroid, EntityStore, Enemy, Kinetic, Pickup, PickupKind, Planet};
use crate::geometry::heading;
use crate::simulation::TickContext;
use bevy::log::{debug, info};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// The three pickup countdowns (s).
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnScheduler {
    pub pickup_timer: f32,
    pub heal_timer: f32,
    pub time_timer: f32,
}

impl SpawnScheduler {
    /// Freshly armed countdowns.
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            pickup_timer: draw_interval(rng, PICKUP_INTERVAL),
            heal_timer: draw_interval(rng, HEAL_PICKUP_INTERVAL),
            time_timer: draw_interval(rng, TIME_PICKUP_INTERVAL),
        }
    }

    /// Run the countdowns, spawning and re-arming each one that fires.
    pub fn tick(&mut self, store: &mut EntityStore, config: &GameConfig, rng: &mut impl Rng, dt: f32) {
        self.pickup_timer -= dt;
        if self.pickup_timer <= 0.0 {
            let kind = if rng.gen_bool(WEAPON_BOOST_PICKUP_CHANCE) {
                PickupKind::WeaponBoost
            } else {
                PickupKind::Shield
            };
            spawn_pickup(store, kind, config, rng);
            self.pickup_timer = draw_interval(rng, PICKUP_INTERVAL);
        }

        self.heal_timer -= dt;
        if self.heal_timer <= 0.0 {
            spawn_pickup(store, PickupKind::Heal, config, rng);
            self.heal_timer = draw_interval(rng, HEAL_PICKUP_INTERVAL);
        }

        self.time_timer -= dt;
        if self.time_timer <= 0.0 {
            spawn_pickup(store, PickupKind::TimeBonus, config, rng);
            self.time_timer = draw_interval(rng, TIME_PICKUP_INTERVAL);
        }
    }
}

fn draw_interval(rng: &mut impl Rng, (lo, hi): (f32, f32)) -> f32 {
    rng.gen_range(lo..hi)
}

/// Uniform draw from the inclusive range `[min, max]`.
fn draw_count(rng: &mut impl Rng, min: u32, max: u32) -> u32 {
    rng.gen_range(min.min(max)..=max.max(min))
}

fn random_point(config: &GameConfig, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.gen_range(0.0..config.world_width),
        rng.gen_range(0.0..config.world_height),
    )
}

fn random_color(rng: &mut impl Rng) -> String {
    PALETTE[rng.gen_range(0..PALETTE.len())].to_string()
}

// ── Population ────────────────────────────────────────────────────────────────

/// Fill an empty world with planets, asteroids and enemies.
pub fn populate_round(store: &mut EntityStore, config: &GameConfig, rng: &mut impl Rng) {
    let planets = draw_count(rng, config.min_planets, config.max_planets);
    let asteroids = draw_count(rng, config.min_asteroids, config.max_asteroids);
    let enemies = draw_count(rng, config.min_enemies, config.max_enemies);

    for _ in 0..planets {
        spawn_planet(store, config, rng);
    }
    for _ in 0..asteroids {
        spawn_asteroid(store, config, rng);
    }
    for _ in 0..enemies {
        spawn_enemy(store, config, rng);
    }
    info!(
        "Round populated: {} planets, {} asteroids, {} enemies",
        store.planets.len(),
        store.asteroids.len(),
        store.enemies.len()
    );
}

pub fn spawn_planet(store: &mut EntityStore, config: &GameConfig, rng: &mut impl Rng) {
    let radius = rng.gen_range(PLANET_RADIUS_MIN..PLANET_RADIUS_MAX);
    store.planets.push(Planet {
        pos: random_point(config, rng),
        radius,
        mass: config.planet_mass(radius),
        color: random_color(rng),
        shake: 0.0,
    });
}

/// Add one asteroid, unless the population ceiling is reached.
///
/// Up to [`ASTEROID_PLACEMENT_TRIES`] random spots are tried for one clear
/// of every existing asteroid by [`ASTEROID_PLACEMENT_CLEARANCE`]; after that
/// the last spot is used regardless.
pub fn spawn_asteroid(store: &mut EntityStore, config: &GameConfig, rng: &mut impl Rng) -> bool {
    if store.live_asteroid_count() >= config.max_asteroid_population as usize {
        return false;
    }

    let clear = |p: Vec2| {
        store
            .asteroids
            .iter()
            .all(|a| p.distance(a.kin.pos) > a.radius + ASTEROID_PLACEMENT_CLEARANCE)
    };
    let mut pos = random_point(config, rng);
    let mut tries = 1;
    while !clear(pos) && tries < ASTEROID_PLACEMENT_TRIES {
        pos = random_point(config, rng);
        tries += 1;
    }
    if !clear(pos) {
        debug!("No clear asteroid spot after {tries} tries; placing anyway");
    }

    let radius = rng
        .gen_range(ASTEROID_RADIUS_MIN..ASTEROID_RADIUS_MAX)
        .max(config.min_split_radius);
    let speed = rng.gen_range(ASTEROID_SPEED_MIN..ASTEROID_SPEED_MAX);
    let vel = heading(rng.gen_range(0.0..TAU)) * speed;
    let outline = Asteroid::jagged_outline(rng, radius);
    store.asteroids.push(Asteroid {
        kin: Kinetic::new(pos, vel),
        radius,
        outline,
        hp: (radius / ASTEROID_HP_RADIUS).round().max(1.0),
        mass: config.asteroid_mass(radius),
        color: random_color(rng),
        spawn_grace: ASTEROID_SPAWN_GRACE,
        destroyed: false,
    });
    true
}

pub fn spawn_enemy(store: &mut EntityStore, config: &GameConfig, rng: &mut impl Rng) {
    let pos = random_point(config, rng);
    store.enemies.push(Enemy::new(pos, config.enemy_detection_radius));
}

pub fn spawn_pickup(store: &mut EntityStore, kind: PickupKind, config: &GameConfig, rng: &mut impl Rng) {
    let pos = random_point(config, rng);
    let speed = rng.gen_range(PICKUP_SPEED_MIN..PICKUP_SPEED_MAX);
    let vel = heading(rng.gen_range(0.0..TAU)) * speed;
    store.pickups.push(Pickup::new(kind, pos, vel));
}

// ── Effects ───────────────────────────────────────────────────────────────────

/// Grant a collected pickup's effect.
pub(crate) fn apply_pickup(kind: PickupKind, craft: &mut Craft, ctx: &mut TickContext) {
    match kind {
        PickupKind::Shield => {
            craft.shield_timer = ctx.config.shield_duration;
            ctx.round.add_score(SHIELD_PICKUP_SCORE);
        }
        PickupKind::WeaponBoost => craft.weapon_timer = ctx.config.weapon_boost_duration,
        PickupKind::Heal => {
            ctx.round.lives = ctx.config.lives;
            craft.armor = CRAFT_ARMOR;
        }
        PickupKind::TimeBonus => ctx.round.timer += TIME_BONUS,
    }
    debug!("Collected {} pickup", kind.label());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn population_counts_stay_in_configured_ranges() {
        let config = GameConfig {
            min_asteroids: 4,
            max_asteroids: 6,
            min_planets: 1,
            max_planets: 2,
            min_enemies: 3,
            max_enemies: 3,
            ..Default::default()
        };
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut store = EntityStore::default();
            populate_round(&mut store, &config, &mut rng);
            assert!((4..=6).contains(&store.asteroids.len()));
            assert!((1..=2).contains(&store.planets.len()));
            assert_eq!(store.enemies.len(), 3);
        }
    }

    #[test]
    fn asteroid_ceiling_is_enforced() {
        let config = GameConfig {
            max_asteroid_population: 3,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(9);
        let mut store = EntityStore::default();
        let placed = (0..10).filter(|_| spawn_asteroid(&mut store, &config, &mut rng)).count();
        assert_eq!(placed, 3);
    }

    #[test]
    fn spawned_asteroids_follow_the_size_rules() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(10);
        let mut store = EntityStore::default();
        for _ in 0..20 {
            spawn_asteroid(&mut store, &config, &mut rng);
        }
        for a in &store.asteroids {
            assert!(a.radius >= config.min_split_radius);
            assert!(a.hp >= 1.0);
            assert_eq!(a.spawn_grace, ASTEROID_SPAWN_GRACE);
            assert!((a.mass - a.radius * config.gravity_multiplier).abs() < 1e-5);
        }
    }

    #[test]
    fn countdowns_fire_and_rearm() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(12);
        let mut store = EntityStore::default();
        let mut scheduler = SpawnScheduler::new(&mut rng);
        scheduler.tick(&mut store, &config, &mut rng, PICKUP_INTERVAL.1);
        assert_eq!(store.pickups.len(), 1);
        assert!(scheduler.pickup_timer >= PICKUP_INTERVAL.0);

        scheduler.tick(&mut store, &config, &mut rng, TIME_PICKUP_INTERVAL.1);
        let kinds: Vec<_> = store.pickups.iter().map(|p| p.kind).collect();
        assert!(kinds.contains(&PickupKind::Heal));
        assert!(kinds.contains(&PickupKind::TimeBonus));
    }
}
