//! Craft life cycle, lives, score and the round timer.
//!
//! ## State machine
//!
//! | From       | To         | Trigger                                                   |
//! |------------|------------|-----------------------------------------------------------|
//! | `Alive`    | `Dead`     | armor exhausted, unshielded planet impact (lives remain)  |
//! | `Dead`     | `Alive`    | [`RESPAWN_DELAY`] elapsed                                 |
//! | `Alive`/`Dead` | `GameOver` | last life lost, or the round timer reached zero       |
//! | `GameOver` | `Alive`    | restart delay elapsed; the whole round is rebuilt        |
//!
//! The craft record is never recreated; only its fields are reset.

use crate::config::GameConfig;
use crate::constants::*;
use crate::craft::Craft;
use crate::effects::Effects;
use crate::entities::{Asteroid, EntityStore};
use crate::events::SimEvent;
use crate::geometry::heading;
use crate::simulation::TickContext;
use bevy::log::{debug, info};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftState {
    Alive,
    /// Destroyed, waiting to respawn.
    Dead,
    /// Out of lives or out of time, waiting for a round restart.
    GameOver,
}

/// Per-round bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub state: CraftState,
    pub lives: u32,
    pub score: u32,
    /// Seconds left in the round.
    pub timer: f32,
    pub respawn_timer: f32,
    pub restart_timer: f32,
}

impl Round {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            state: CraftState::Alive,
            lives: config.lives,
            score: 0,
            timer: config.round_time,
            respawn_timer: 0.0,
            restart_timer: 0.0,
        }
    }

    /// Add `points`, saturating at [`SCORE_CAP`].
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points).min(SCORE_CAP);
    }
}

/// Points for landing a hit on an asteroid with `hp` hit points left.
pub fn asteroid_hit_score(hp: f32) -> u32 {
    2.0_f32.powf(hp.max(0.0)).round().min(SCORE_CAP as f32) as u32
}

/// Destroy the craft: throw hull wreckage, spend a life and schedule either a
/// respawn or a round restart.
///
/// Returns `false` (and does nothing) if the craft is already down, so at
/// most one destruction happens per life.
pub fn destroy_craft(craft: &mut Craft, effects: &mut Effects, ctx: &mut TickContext) -> bool {
    if !wreck_craft(craft, effects, ctx) {
        return false;
    }
    let round = &mut *ctx.round;
    if round.lives == 0 {
        round.state = CraftState::GameOver;
        round.restart_timer = GAME_OVER_RESTART_DELAY;
        ctx.events.push(SimEvent::GameOver { timed_out: false });
        info!("Craft destroyed; no lives left, restarting in {GAME_OVER_RESTART_DELAY}s");
    } else {
        round.state = CraftState::Dead;
        round.respawn_timer = RESPAWN_DELAY;
        info!("Craft destroyed; {} lives left", round.lives);
    }
    true
}

/// Take the craft down and spend a life without deciding what comes next.
fn wreck_craft(craft: &mut Craft, effects: &mut Effects, ctx: &mut TickContext) -> bool {
    if !craft.alive {
        return false;
    }
    craft.alive = false;
    craft.armor = 0;
    craft.flip = None;
    effects.shatter_hull(ctx.rng, craft.kin.pos, &craft.local_hull());

    let round = &mut *ctx.round;
    round.lives = round.lives.saturating_sub(1);
    ctx.events.push(SimEvent::CraftDestroyed {
        pos: craft.kin.pos,
        lives_left: round.lives,
    });
    true
}

/// Count the round timer down.  On expiry the craft is destroyed (if alive)
/// and the round goes to game over on the short restart delay, whatever
/// lives remain.  Returns `true` when the timer expired this tick.
pub fn tick_round_timer(store: &mut EntityStore, ctx: &mut TickContext, dt: f32) -> bool {
    ctx.round.timer -= dt;
    if ctx.round.timer > 0.0 {
        return false;
    }
    wreck_craft(&mut store.craft, &mut store.effects, ctx);
    let round = &mut *ctx.round;
    round.timer = 0.0;
    round.state = CraftState::GameOver;
    round.restart_timer = TIMEOUT_RESTART_DELAY;
    ctx.events.push(SimEvent::GameOver { timed_out: true });
    info!("Round timer expired; restarting in {TIMEOUT_RESTART_DELAY}s");
    true
}

/// While dead, count down to respawn.
pub fn tick_respawn(store: &mut EntityStore, ctx: &mut TickContext, dt: f32) {
    if ctx.round.state != CraftState::Dead {
        return;
    }
    ctx.round.respawn_timer -= dt;
    if ctx.round.respawn_timer <= 0.0 {
        respawn(store, ctx);
    }
}

/// Bring the craft back at the safest reachable spot with default size and
/// armor plus a spawn-invulnerability window.
pub fn respawn(store: &mut EntityStore, ctx: &mut TickContext) {
    let config = ctx.config;
    let pos = safe_spawn_point(&store.asteroids, config, ctx.rng);
    let drift = heading(ctx.rng.gen_range(0.0..TAU)) * CRAFT_SPAWN_DRIFT;
    store.craft = Craft {
        invulnerability: SPAWN_INVULNERABILITY,
        ..Craft::spawned(config, pos, drift)
    };
    store.effects.hull.clear();
    ctx.round.state = CraftState::Alive;
    ctx.round.respawn_timer = 0.0;
    ctx.events.push(SimEvent::Respawned { pos });
    info!("Craft respawned at ({:.0}, {:.0})", pos.x, pos.y);
}

/// World centre, unless an asteroid sits on it; then up to
/// [`RESPAWN_PLACEMENT_TRIES`] random spots.  The last spot tried is used
/// even if it is still crowded.
pub fn safe_spawn_point(asteroids: &[Asteroid], config: &GameConfig, rng: &mut impl Rng) -> Vec2 {
    let crowded = |p: Vec2| {
        asteroids.iter().any(|a| {
            !a.destroyed && p.distance(a.kin.pos) < config.craft_radius + a.radius + RESPAWN_CLEARANCE
        })
    };
    let mut pos = Vec2::new(config.world_width / 2.0, config.world_height / 2.0);
    let mut tries = 0;
    while crowded(pos) && tries < RESPAWN_PLACEMENT_TRIES {
        pos = Vec2::new(
            rng.gen_range(0.0..config.world_width),
            rng.gen_range(0.0..config.world_height),
        );
        tries += 1;
    }
    if tries == RESPAWN_PLACEMENT_TRIES && crowded(pos) {
        debug!("No clear respawn point after {tries} tries; spawning anyway");
    }
    pos
}

/// Count down the restart delay.  Returns `true` when the round should be rebuilt.
pub fn tick_game_over(round: &mut Round, dt: f32) -> bool {
    round.restart_timer -= dt;
    round.restart_timer <= 0.0
}
