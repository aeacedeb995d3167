//! Centralised physics and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::GameConfig::default`] mirrors the runtime-tunable subset;
//! the rest are fixed rules of the game.
//!
//! ## Units
//!
//! Velocities and accelerations are expressed **per reference frame** at
//! [`REFERENCE_FPS`].  The stepper scales them by `dt * REFERENCE_FPS`, so a
//! 60 Hz caller sees exactly one reference frame per tick.  Timers are in
//! seconds.

// ── Time ──────────────────────────────────────────────────────────────────────

/// Frame rate the per-frame velocity constants were tuned at.
pub const REFERENCE_FPS: f32 = 60.0;

// ── World ─────────────────────────────────────────────────────────────────────

/// Edge length of the square toroidal playfield (world units).
pub const WORLD_SIZE: f32 = 3000.0;

/// Round duration (s).  Reaching zero forces a game-over/restart cycle.
pub const ROUND_TIME: f32 = 150.0;

// ── Craft ─────────────────────────────────────────────────────────────────────

/// Default craft hull radius; the hull triangle is derived from it.
pub const DEFAULT_CRAFT_RADIUS: f32 = 20.0;

/// Default craft mass, used for gravity reciprocity and collision impulses.
pub const DEFAULT_CRAFT_MASS: f32 = 5.0;

/// Lives granted at round start and by a heal pickup.
pub const CRAFT_LIVES: u32 = 5;

/// Armor granted on (re)spawn and by a heal pickup.
pub const CRAFT_ARMOR: u32 = 5;

/// Forward thrust per reference frame.
pub const CRAFT_ACCEL: f32 = 0.035;

/// Reverse and strafe thrust per reference frame (half of forward).
pub const CRAFT_SIDE_ACCEL: f32 = 0.0175;

/// Heading change rate (rad/s).
pub const CRAFT_ROTATION_SPEED: f32 = 3.0;

/// Velocity multiplier per reference frame while no thrust intent is held.
pub const CRAFT_DRAG: f32 = 0.98;

/// Duration of the "flip heading" turn animation (s).
pub const FLIP_DURATION: f32 = 0.15;

/// Initial drift speed given to a freshly (re)spawned craft.
pub const CRAFT_SPAWN_DRIFT: f32 = 0.5;

/// Delay between craft destruction and respawn (s).
pub const RESPAWN_DELAY: f32 = 1.0;

/// Invulnerability window granted on respawn (s).
pub const SPAWN_INVULNERABILITY: f32 = 3.0;

/// Delay before a full round restart once lives are exhausted (s).
pub const GAME_OVER_RESTART_DELAY: f32 = 5.0;

/// Accelerated restart delay when the round timer expires (s).
pub const TIMEOUT_RESTART_DELAY: f32 = 2.0;

/// Extra clearance (beyond both radii) required around a respawn point.
pub const RESPAWN_CLEARANCE: f32 = 20.0;

/// Bounded number of random respawn placements before accepting an unsafe one.
pub const RESPAWN_PLACEMENT_TRIES: u32 = 50;

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Muzzle speed relative to the craft, per reference frame.
pub const PROJECTILE_SPEED: f32 = 5.0;

/// Standard projectile lifetime (s).  Boosted rounds live twice as long.
pub const PROJECTILE_LIFETIME: f32 = 3.0;

/// Projectile mass, used for recoil and asteroid knockback.
pub const PROJECTILE_MASS: f32 = 0.5;

/// Collision radius of a projectile.
pub const PROJECTILE_RADIUS: f32 = 1.0;

/// Muzzle offset beyond the craft nose so a fresh round never overlaps the hull.
pub const MUZZLE_CLEARANCE: f32 = 4.0;

/// Fraction of projectile momentum fed back into the craft as recoil.
pub const RECOIL_FACTOR: f32 = 0.5;

/// Fraction of projectile momentum delivered to an asteroid on impact.
pub const KNOCKBACK_FACTOR: f32 = 1.0;

// ── Gravity ───────────────────────────────────────────────────────────────────

/// Inverse-square gravity constant.
pub const GRAVITY_CONST: f32 = 5.0;

/// Mass per unit radius for asteroids.
pub const GRAVITY_MULT: f32 = 0.5;

/// Extra mass multiplier for planets on top of [`GRAVITY_MULT`].
pub const PLANET_GRAVITY_MULT: f32 = 8.0;

/// Influence radius = mass × this factor.
pub const GRAVITY_RANGE_FACTOR: f32 = 10.5;

/// Pairs closer than this (squared) are skipped to avoid the singularity.
pub const MIN_GRAVITY_DIST_SQ: f32 = 1.0;

/// Gravity-warning threshold as a fraction of [`CRAFT_ACCEL`].
pub const GRAVITY_WARNING_RATIO: f32 = 0.8;

// ── Speed caps ────────────────────────────────────────────────────────────────

/// Speed cap for the craft and asteroids, per reference frame.
pub const MAX_SPEED: f32 = 4.0;

/// Speed cap for enemies, per reference frame.
pub const ENEMY_MAX_SPEED: f32 = 2.0;

// ── Asteroids ─────────────────────────────────────────────────────────────────

/// Smallest radius an asteroid may have; also the fragmentation unit.
pub const MIN_SPLIT_RADIUS: f32 = 15.0;

/// Hard ceiling on the live asteroid population for scheduled spawns.
pub const MAX_ASTEROIDS: usize = 100;

pub const MIN_INITIAL_ASTEROIDS: u32 = 10;
pub const MAX_INITIAL_ASTEROIDS: u32 = 100;

pub const ASTEROID_RADIUS_MIN: f32 = 30.0;
pub const ASTEROID_RADIUS_MAX: f32 = 70.0;

pub const ASTEROID_SPEED_MIN: f32 = 0.2;
pub const ASTEROID_SPEED_MAX: f32 = 0.7;

/// Outline vertex count range (inclusive lower, exclusive upper).
pub const ASTEROID_POINTS_MIN: usize = 5;
pub const ASTEROID_POINTS_MAX: usize = 10;

/// Outline vertices sit between this fraction and 1.0 of the radius.
pub const ASTEROID_OUTLINE_JITTER: f32 = 0.7;

/// Radius that maps to one hit point at spawn.
pub const ASTEROID_HP_RADIUS: f32 = 15.0;

/// Spawn grace for freshly scheduled asteroids (s).
pub const ASTEROID_SPAWN_GRACE: f32 = 1.0;

/// Spawn grace for fragmentation children (s).
pub const FRAGMENT_SPAWN_GRACE: f32 = 0.3;

/// Children are placed this fraction of their own radius from the parent centre.
pub const FRAGMENT_OFFSET: f32 = 0.75;

/// Extra clearance required between a new asteroid and existing ones.
pub const ASTEROID_PLACEMENT_CLEARANCE: f32 = 60.0;

/// Bounded number of placement attempts before accepting an overlapping spot.
pub const ASTEROID_PLACEMENT_TRIES: u32 = 50;

/// Separating impulse magnitude for body–body contacts.
pub const CONTACT_IMPULSE: f32 = 0.5;

/// Hit points lost by each asteroid in an asteroid–asteroid impact.
pub const ASTEROID_IMPACT_DAMAGE: f32 = 0.5;

// ── Planets ───────────────────────────────────────────────────────────────────

pub const MAX_PLANETS: u32 = 3;
pub const PLANET_RADIUS_MIN: f32 = 40.0;
pub const PLANET_RADIUS_MAX: f32 = 100.0;

/// Minimum outbound speed after a shielded craft bounces off a planet.
pub const PLANET_BOUNCE_SPEED: f32 = 2.0;

// ── Enemies ───────────────────────────────────────────────────────────────────

pub const MIN_ENEMIES: u32 = 3;
pub const MAX_ENEMIES: u32 = 10;
pub const ENEMY_RADIUS: f32 = 20.0;
pub const ENEMY_MASS: f32 = 5.0;
pub const ENEMY_ACCEL: f32 = 0.025;
pub const ENEMY_DETECTION_RADIUS: f32 = 600.0;
pub const ENEMY_HP: f32 = 1.0;

/// Obstacle avoidance kicks in within `obstacle.radius + ENEMY_RADIUS * this`.
pub const ENEMY_AVOID_RADIUS_FACTOR: f32 = 2.0;

/// Avoidance acceleration as a multiple of [`ENEMY_ACCEL`].
pub const ENEMY_AVOID_ACCEL_FACTOR: f32 = 5.0;

// ── Pickups ───────────────────────────────────────────────────────────────────

/// Full pickup size (collision radius) before the end-of-life shrink.
pub const PICKUP_SIZE: f32 = DEFAULT_CRAFT_RADIUS * 2.0;

pub const PICKUP_TTL: f32 = 15.0;
pub const PICKUP_HP: f32 = 15.0;

/// Pickups shrink linearly over this many final seconds of their TTL.
pub const PICKUP_SHRINK_WINDOW: f32 = 2.0;

pub const PICKUP_SPEED_MIN: f32 = 0.1;
pub const PICKUP_SPEED_MAX: f32 = 0.4;

/// Probability that a generic pickup is a weapon boost rather than a shield.
pub const WEAPON_BOOST_PICKUP_CHANCE: f64 = 0.7;

pub const SHIELD_DURATION: f32 = 30.0;
pub const WEAPON_BOOST_DURATION: f32 = 60.0;

/// Seconds added to the round timer by a time-bonus pickup.
pub const TIME_BONUS: f32 = 30.0;

/// Re-arm interval ranges (s) for the three pickup countdowns.
pub const PICKUP_INTERVAL: (f32, f32) = (3.0, 8.0);
pub const HEAL_PICKUP_INTERVAL: (f32, f32) = (20.0, 30.0);
pub const TIME_PICKUP_INTERVAL: (f32, f32) = (30.0, 45.0);

// ── Scoring ───────────────────────────────────────────────────────────────────

pub const SCORE_CAP: u32 = 99_999;
pub const ENEMY_KILL_SCORE: u32 = 10;
pub const SHIELD_PICKUP_SCORE: u32 = 20;

// ── Networking ────────────────────────────────────────────────────────────────

/// Simulation-clock interval between latency probes (s).
pub const PING_INTERVAL: f32 = 1.0;

// ── Visual debris ─────────────────────────────────────────────────────────────

/// Particles thrown by an asteroid or enemy explosion.
pub const EXPLOSION_PARTICLES: usize = 20;

/// Particles thrown by a projectile striking something solid.
pub const IMPACT_PARTICLES: usize = 5;

/// Particles thrown when a pickup is collected or destroyed.
pub const PICKUP_PARTICLES: usize = 10;

/// Default particle lifetime (s).
pub const PARTICLE_LIFE: f32 = 1.0;

/// Particle speed range, per reference frame.
pub const PARTICLE_SPEED: (f32, f32) = (0.5, 1.5);

/// Lifetime of an asteroid outline segment after the asteroid breaks up (s).
pub const DEBRIS_LIFE: f32 = 1.0;

/// Exhaust puff lifetime (s) and growth rate (units/s).
pub const EXHAUST_LIFE: f32 = 0.7;
pub const EXHAUST_GROWTH: f32 = 40.0;

/// Minimum spacing between exhaust puffs (s); reverse thrust puffs less often.
pub const EXHAUST_INTERVAL: f32 = 0.1;
pub const EXHAUST_INTERVAL_REVERSE: f32 = 0.15;

// ── Palette ───────────────────────────────────────────────────────────────────

/// Colours handed to asteroids and planets; the presenter maps them to pixels.
pub const PALETTE: [&str; 8] = [
    "#fff", "#0ff", "#f0f", "#ff0", "#0f0", "#f00", "#00f", "#f80",
];
