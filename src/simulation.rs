//! The per-tick pipeline and its Bevy plugin.
//!
//! [`Simulation`] owns everything a round needs (config, RNG, entity store,
//! round bookkeeping, pickup scheduler, optional peer link and the outbound
//! event queue) and advances it with [`Simulation::update`].  There is no
//! global state: two simulations in one process never interact except
//! through a [`PeerChannel`].
//!
//! ## Tick order
//!
//! | #  | Phase                                                              |
//! |----|--------------------------------------------------------------------|
//! | 1  | drain the peer link; a guest adopts the newest host snapshot       |
//! | 2  | game over: only debris decays and the restart delay counts down    |
//! | 3  | planet shake decay, round timer (expiry ends the tick here)        |
//! | 4  | craft: respawn countdown, or steer → gravity → integrate → fire    |
//! | 5  | status timers, free-body integration, TTLs                         |
//! | 6  | planet gravity on free bodies, asteroid–asteroid gravity           |
//! | 7  | collision passes, each followed by compaction + fragment append    |
//! | 8  | debris decay, pickup scheduler (not on a linked guest), enemies    |
//! | 9  | craft and asteroid speed caps, torus wrap, final compaction        |
//! | 10 | publish to the peer                                                |
//!
//! Per-frame constants are tuned for a 60 Hz reference frame; `step` is
//! `dt × 60` and scales every per-frame velocity and acceleration.

use crate::collision;
use crate::config::GameConfig;
use crate::constants::REFERENCE_FPS;
use crate::craft::{drag_factor, fire, steer, ControlIntent, Craft};
use crate::effects::Effects;
use crate::enemy::update_enemies;
use crate::entities::{Asteroid, EntityStore};
use crate::events::{HudSnapshot, SimEvent};
use crate::geometry::cap_speed;
use crate::gravity;
use crate::lifecycle::{safe_spawn_point, tick_game_over, tick_respawn, tick_round_timer, CraftState, Round};
use crate::net::{self, NetRole, NetSync, PeerChannel};
use crate::spawn::{populate_round, SpawnScheduler};
use bevy::log::info;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Borrowed slice of [`Simulation`] handed to the gameplay passes.
pub(crate) struct TickContext<'a> {
    pub(crate) config: &'a GameConfig,
    pub(crate) rng: &'a mut StdRng,
    pub(crate) round: &'a mut Round,
    pub(crate) events: &'a mut Vec<SimEvent>,
}

type Pass = fn(&mut EntityStore, &mut TickContext<'_>, &mut Vec<Asteroid>);

/// One complete simulation context.
#[derive(Resource, Debug)]
pub struct Simulation {
    config: GameConfig,
    rng: StdRng,
    store: EntityStore,
    round: Round,
    scheduler: SpawnScheduler,
    intent: ControlIntent,
    net: Option<NetSync>,
    events: Vec<SimEvent>,
    gravity_warning: bool,
}

impl Simulation {
    /// A freshly populated round seeded from OS entropy.
    pub fn new(config: GameConfig) -> Self {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// A freshly populated round with a reproducible RNG stream.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: GameConfig, mut rng: StdRng) -> Self {
        let scheduler = SpawnScheduler::new(&mut rng);
        let mut sim = Self {
            round: Round::new(&config),
            store: EntityStore::default(),
            config,
            rng,
            scheduler,
            intent: ControlIntent::default(),
            net: None,
            events: Vec::new(),
            gravity_warning: false,
        };
        sim.build_round();
        sim
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &EntityStore {
        &self.store
    }

    /// Direct access for scenario setup and tooling.
    pub fn world_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn intent(&self) -> ControlIntent {
        self.intent
    }

    /// Control intent applied on every following tick until replaced.
    pub fn set_intent(&mut self, intent: ControlIntent) {
        self.intent = intent;
    }

    pub fn hud(&self) -> HudSnapshot {
        let craft = &self.store.craft;
        HudSnapshot {
            score: self.round.score,
            lives: self.round.lives,
            armor: craft.armor,
            time_remaining: self.round.timer,
            enemy_count: self.store.live_enemy_count(),
            ping_ms: self.net.as_ref().and_then(|n| n.rtt_ms),
            shield_remaining: craft.shield_timer,
            weapon_boost_remaining: craft.weapon_timer,
            state: self.round.state,
            near_gravity_trap: self.gravity_warning,
            peer: self.net.as_ref().and_then(|n| n.peer),
        }
    }

    /// Take every event raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Peer link ─────────────────────────────────────────────────────────────

    /// Attach an already-open channel to the other peer.
    pub fn connect(&mut self, role: NetRole, channel: impl PeerChannel + 'static) {
        info!("Linked to peer as {}", role.label());
        self.net = Some(NetSync::new(role, Box::new(channel)));
    }

    pub fn disconnect(&mut self) {
        if self.net.take().is_some() {
            info!("Peer link dropped; continuing locally");
        }
    }

    pub fn net(&self) -> Option<&NetSync> {
        self.net.as_ref()
    }

    fn is_linked_guest(&self) -> bool {
        self.net
            .as_ref()
            .is_some_and(|n| n.role() == NetRole::Guest && n.is_active())
    }

    // ── Round ─────────────────────────────────────────────────────────────────

    /// Rebuild the whole round: fresh world, lives, score, timer and
    /// scheduler.  Any peer link stays attached.
    pub fn restart_round(&mut self) {
        self.build_round();
        self.events.push(SimEvent::RoundRestarted);
        info!("Round restarted");
    }

    fn build_round(&mut self) {
        self.round = Round::new(&self.config);
        self.scheduler = SpawnScheduler::new(&mut self.rng);
        self.store.clear_world();
        self.store.effects = Effects::default();
        self.gravity_warning = false;
        // A linked guest receives its world from the host.
        if !self.is_linked_guest() {
            populate_round(&mut self.store, &self.config, &mut self.rng);
        }
        let pos = safe_spawn_point(&self.store.asteroids, &self.config, &mut self.rng);
        self.store.craft = Craft::spawned(&self.config, pos, Vec2::ZERO);
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    /// Advance by `dt` seconds.  Non-positive or non-finite `dt` is ignored.
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let step = dt * REFERENCE_FPS;

        if let Some(link) = self.net.as_mut() {
            link.receive();
            if let Some(snapshot) = link.take_snapshot() {
                net::apply(snapshot, &mut self.store, &mut self.config);
            }
        }

        if self.round.state == CraftState::GameOver {
            self.store.effects.decay(dt, step);
            if tick_game_over(&mut self.round, dt) {
                self.restart_round();
            }
        } else {
            self.advance(dt, step);
        }

        if let Some(link) = self.net.as_mut() {
            link.publish(&self.store, &self.config, dt);
        }
    }

    fn advance(&mut self, dt: f32, step: f32) {
        let schedule_pickups = !self.is_linked_guest();
        let Self {
            config,
            rng,
            store,
            round,
            scheduler,
            intent,
            events,
            gravity_warning,
            ..
        } = self;
        let config = &*config;
        let mut ctx = TickContext {
            config,
            rng,
            round,
            events,
        };

        for planet in &mut store.planets {
            planet.shake = (planet.shake - dt).max(0.0);
        }
        if tick_round_timer(store, &mut ctx, dt) {
            store.effects.decay(dt, step);
            store.wrap_all(config.world_width, config.world_height);
            return;
        }

        // ── Craft ────────────────────────────────────────────────────────────
        *gravity_warning = false;
        match ctx.round.state {
            CraftState::Dead => tick_respawn(store, &mut ctx, dt),
            CraftState::Alive if store.craft.alive => {
                steer(&mut store.craft, intent, dt, step, &mut store.effects);
                store.craft.kin.vel = cap_speed(store.craft.kin.vel, config.max_speed);
                let felt = gravity::act_on_craft(store, config, step);
                *gravity_warning = gravity::is_gravity_trap(felt, config);
                store.craft.kin.advance(step);
                if !intent.is_thrusting() {
                    store.craft.kin.vel *= drag_factor(step);
                }
                if let Some(shot) = fire(&mut store.craft, intent, config) {
                    ctx.events.push(SimEvent::ShotFired {
                        pos: shot.kin.pos,
                        boosted: shot.boosted,
                    });
                    store.projectiles.push(shot);
                }
            }
            _ => {}
        }
        store.craft.tick_status(dt);

        // ── Free bodies ──────────────────────────────────────────────────────
        for p in &mut store.projectiles {
            p.life -= dt;
            p.destroyed |= p.life <= 0.0;
            p.kin.advance(step);
        }
        for a in &mut store.asteroids {
            a.kin.advance(step);
            a.spawn_grace = (a.spawn_grace - dt).max(0.0);
        }
        for p in &mut store.pickups {
            p.kin.advance(step);
            if p.age(dt) {
                p.destroyed = true;
            }
        }
        gravity::act_on_free_bodies(store, config, dt);
        gravity::act_between_asteroids(&mut store.asteroids, config, dt);
        store.compact();

        // ── Contacts ─────────────────────────────────────────────────────────
        let passes: [Pass; 6] = [
            collision::projectiles_vs_craft,
            collision::projectiles_vs_targets,
            collision::asteroid_impacts,
            collision::craft_vs_asteroids,
            collision::planet_contacts,
            collision::pickup_contacts,
        ];
        let mut spawned = Vec::new();
        for pass in passes {
            pass(store, &mut ctx, &mut spawned);
            store.compact();
            store.asteroids.append(&mut spawned);
        }

        store.effects.decay(dt, step);
        if schedule_pickups {
            scheduler.tick(store, config, ctx.rng, dt);
        }
        update_enemies(store, &mut ctx, &mut spawned, step);
        store.compact();
        store.asteroids.append(&mut spawned);

        store.craft.kin.vel = cap_speed(store.craft.kin.vel, config.max_speed);
        for a in &mut store.asteroids {
            a.kin.vel = cap_speed(a.kin.vel, config.max_speed);
        }
        store.wrap_all(config.world_width, config.world_height);
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Steps the [`Simulation`] resource once per frame from Bevy's [`Time`].
///
/// The [`ControlIntent`] resource is fed in before each step and every
/// [`SimEvent`] raised is re-sent as a Bevy message.  If no `Simulation` was
/// inserted beforehand, one is built from the [`GameConfig`] resource (or
/// defaults).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<Simulation>() {
            let config = app
                .world()
                .get_resource::<GameConfig>()
                .cloned()
                .unwrap_or_default();
            app.insert_resource(Simulation::new(config));
        }
        app.init_resource::<ControlIntent>()
            .add_message::<SimEvent>()
            .add_systems(Update, step_simulation);
    }
}

pub fn step_simulation(
    time: Res<Time>,
    intent: Res<ControlIntent>,
    mut sim: ResMut<Simulation>,
    mut events: MessageWriter<SimEvent>,
) {
    sim.set_intent(*intent);
    sim.update(time.delta_secs());
    for event in sim.drain_events() {
        events.write(event);
    }
}
