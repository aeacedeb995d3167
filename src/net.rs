//! Two-peer state sync over an already-open data channel.
//!
//! ## Roles
//!
//! | Role    | Sends each tick                       | Accepts                 |
//! |---------|---------------------------------------|-------------------------|
//! | `Host`  | full [`WorldSnapshot`] (incl. pose)   | `pose`, `ping`, `pong`  |
//! | `Guest` | own [`Pose`]                          | `snapshot`, `pose`, `ping`, `pong` |
//!
//! The host is authoritative for asteroids, planets, enemies and pickups.  The
//! guest replaces those collections wholesale with each snapshot, applied at
//! the start of its tick.  Each side shows the other's last pose as a ghost
//! that is never simulated or collided.
//!
//! Payloads are JSON objects tagged by `"type"`.  Anything that fails to
//! decode, or that the receiving role never accepts, is dropped and the tick
//! carries on with the last good state.  A missing or closed channel simply
//! means single-player.

use crate::config::GameConfig;
use crate::constants::PING_INTERVAL;
use crate::entities::{Asteroid, EntityStore, Enemy, Kinetic, Pickup, PickupKind, Planet};
use crate::error::{SimError, SimResult};
use bevy::log::debug;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// ── Roles & transport ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetRole {
    Host,
    Guest,
}

impl NetRole {
    pub fn label(self) -> &'static str {
        match self {
            NetRole::Host => "host",
            NetRole::Guest => "guest",
        }
    }
}

/// An ordered, message-oriented channel to the other peer.
///
/// Implementations buffer inbound payloads until [`PeerChannel::drain`] is
/// called from inside the tick; they must never touch simulation state.
pub trait PeerChannel: Send + Sync {
    fn is_open(&self) -> bool;
    fn send(&self, payload: String);
    /// Take every payload received since the last call, oldest first.
    fn drain(&self) -> Vec<String>;
}

type Queue = Arc<Mutex<VecDeque<String>>>;

/// In-process channel pair, used for loopback play and tests.
#[derive(Debug, Clone)]
pub struct MemoryChannel {
    inbox: Queue,
    outbox: Queue,
    open: Arc<AtomicBool>,
}

impl MemoryChannel {
    /// Two connected ends sharing one open flag.
    pub fn pair() -> (Self, Self) {
        let a: Queue = Arc::default();
        let b: Queue = Arc::default();
        let open = Arc::new(AtomicBool::new(true));
        (
            Self {
                inbox: a.clone(),
                outbox: b.clone(),
                open: open.clone(),
            },
            Self {
                inbox: b,
                outbox: a,
                open,
            },
        )
    }

    /// Close both ends.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    /// Number of payloads waiting to be drained on this end.
    pub fn pending(&self) -> usize {
        self.inbox.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl PeerChannel for MemoryChannel {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn send(&self, payload: String) {
        if self.is_open() {
            self.outbox
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push_back(payload);
        }
    }

    fn drain(&self) -> Vec<String> {
        self.inbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect()
    }
}

// ── Wire records ──────────────────────────────────────────────────────────────

/// Craft position and heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidState {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub radius: f32,
    pub points: Vec<[f32; 2]>,
    pub hp: f32,
    pub mass: f32,
    pub color: String,
    pub spawn_delay: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetState {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub mass: f32,
    pub color: String,
    pub shake: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub angle: f32,
    pub alerted: bool,
    pub detection: f32,
    pub hp: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupState {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub kind: PickupKind,
    pub ttl: f32,
    pub size: f32,
    pub hp: f32,
}

/// Everything the host owns, plus its own pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub width: f32,
    pub height: f32,
    pub asteroids: Vec<AsteroidState>,
    pub planets: Vec<PlanetState>,
    pub enemies: Vec<EnemyState>,
    pub pickups: Vec<PickupState>,
    pub pose: Pose,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NetMessage {
    Snapshot(WorldSnapshot),
    Pose(Pose),
    /// Latency probe; `t` is the sender's clock in milliseconds.
    Ping { t: f64 },
    Pong { t: f64 },
}

impl NetMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            NetMessage::Snapshot(_) => "snapshot",
            NetMessage::Pose(_) => "pose",
            NetMessage::Ping { .. } => "ping",
            NetMessage::Pong { .. } => "pong",
        }
    }

    pub fn encode(&self) -> SimResult<String> {
        serde_json::to_string(self).map_err(|e| SimError::MalformedMessage {
            message: e.to_string(),
        })
    }

    pub fn decode(payload: &str) -> SimResult<Self> {
        serde_json::from_str(payload).map_err(|e| SimError::MalformedMessage {
            message: e.to_string(),
        })
    }
}

// ── Capture / apply ───────────────────────────────────────────────────────────

fn pose_of(store: &EntityStore) -> Pose {
    Pose {
        x: store.craft.kin.pos.x,
        y: store.craft.kin.pos.y,
        angle: store.craft.angle,
    }
}

/// Serialize the host-owned part of the world.
pub fn capture(store: &EntityStore, config: &GameConfig) -> WorldSnapshot {
    WorldSnapshot {
        width: config.world_width,
        height: config.world_height,
        asteroids: store
            .asteroids
            .iter()
            .filter(|a| !a.destroyed)
            .map(|a| AsteroidState {
                x: a.kin.pos.x,
                y: a.kin.pos.y,
                dx: a.kin.vel.x,
                dy: a.kin.vel.y,
                radius: a.radius,
                points: a.outline.iter().map(|p| [p.x, p.y]).collect(),
                hp: a.hp,
                mass: a.mass,
                color: a.color.clone(),
                spawn_delay: a.spawn_grace,
            })
            .collect(),
        planets: store
            .planets
            .iter()
            .map(|p| PlanetState {
                x: p.pos.x,
                y: p.pos.y,
                radius: p.radius,
                mass: p.mass,
                color: p.color.clone(),
                shake: p.shake,
            })
            .collect(),
        enemies: store
            .enemies
            .iter()
            .filter(|e| !e.destroyed)
            .map(|e| EnemyState {
                x: e.kin.pos.x,
                y: e.kin.pos.y,
                dx: e.kin.vel.x,
                dy: e.kin.vel.y,
                angle: e.angle,
                alerted: e.alerted,
                detection: e.detection_radius,
                hp: e.hp,
            })
            .collect(),
        pickups: store
            .pickups
            .iter()
            .filter(|p| !p.destroyed)
            .map(|p| PickupState {
                x: p.kin.pos.x,
                y: p.kin.pos.y,
                dx: p.kin.vel.x,
                dy: p.kin.vel.y,
                kind: p.kind,
                ttl: p.ttl,
                size: p.size,
                hp: p.hp,
            })
            .collect(),
        pose: pose_of(store),
    }
}

/// Replace the host-owned collections (and world size) with `snapshot`.
pub fn apply(snapshot: WorldSnapshot, store: &mut EntityStore, config: &mut GameConfig) {
    if snapshot.width > 0.0 && snapshot.height > 0.0 {
        config.world_width = snapshot.width;
        config.world_height = snapshot.height;
    }
    store.asteroids = snapshot
        .asteroids
        .into_iter()
        .map(|a| Asteroid {
            kin: Kinetic::new(Vec2::new(a.x, a.y), Vec2::new(a.dx, a.dy)),
            radius: a.radius,
            outline: a.points.into_iter().map(Vec2::from).collect(),
            hp: a.hp,
            mass: a.mass,
            color: a.color,
            spawn_grace: a.spawn_delay,
            destroyed: false,
        })
        .collect();
    store.planets = snapshot
        .planets
        .into_iter()
        .map(|p| Planet {
            pos: Vec2::new(p.x, p.y),
            radius: p.radius,
            mass: p.mass,
            color: p.color,
            shake: p.shake,
        })
        .collect();
    store.enemies = snapshot
        .enemies
        .into_iter()
        .map(|e| Enemy {
            kin: Kinetic::new(Vec2::new(e.x, e.y), Vec2::new(e.dx, e.dy)),
            angle: e.angle,
            alerted: e.alerted,
            detection_radius: e.detection,
            hp: e.hp,
            destroyed: false,
        })
        .collect();
    store.pickups = snapshot
        .pickups
        .into_iter()
        .map(|p| Pickup {
            kin: Kinetic::new(Vec2::new(p.x, p.y), Vec2::new(p.dx, p.dy)),
            kind: p.kind,
            ttl: p.ttl,
            size: p.size,
            hp: p.hp,
            destroyed: false,
        })
        .collect();
}

// ── Link state ────────────────────────────────────────────────────────────────

/// One side of a host/guest link.
pub struct NetSync {
    role: NetRole,
    channel: Box<dyn PeerChannel>,
    /// Last pose received from the other side.
    pub peer: Option<Pose>,
    pending: Option<WorldSnapshot>,
    /// Simulation clock (s).
    clock: f64,
    ping_timer: f32,
    /// Last measured round trip (ms).
    pub rtt_ms: Option<f32>,
}

impl std::fmt::Debug for NetSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetSync")
            .field("role", &self.role)
            .field("open", &self.channel.is_open())
            .field("peer", &self.peer)
            .field("rtt_ms", &self.rtt_ms)
            .finish()
    }
}

impl NetSync {
    pub fn new(role: NetRole, channel: Box<dyn PeerChannel>) -> Self {
        Self {
            role,
            channel,
            peer: None,
            pending: None,
            clock: 0.0,
            ping_timer: 0.0,
            rtt_ms: None,
        }
    }

    pub fn role(&self) -> NetRole {
        self.role
    }

    /// Sync only runs while the channel is open.
    pub fn is_active(&self) -> bool {
        self.channel.is_open()
    }

    /// Drain and route inbound messages.  Bad payloads are logged and dropped.
    pub fn receive(&mut self) {
        if !self.is_active() {
            return;
        }
        for payload in self.channel.drain() {
            if let Err(e) = NetMessage::decode(&payload).and_then(|msg| self.handle(msg)) {
                debug!("net: dropping message: {e}");
            }
        }
    }

    fn handle(&mut self, msg: NetMessage) -> SimResult<()> {
        match msg {
            NetMessage::Snapshot(snapshot) => {
                if self.role != NetRole::Guest {
                    return Err(SimError::UnexpectedMessage {
                        kind: "snapshot",
                        role: self.role.label(),
                    });
                }
                self.peer = Some(snapshot.pose);
                // Only the newest snapshot matters.
                self.pending = Some(snapshot);
            }
            NetMessage::Pose(pose) => self.peer = Some(pose),
            NetMessage::Ping { t } => self.send(&NetMessage::Pong { t }),
            NetMessage::Pong { t } => {
                self.rtt_ms = Some((self.clock * 1000.0 - t).max(0.0) as f32);
            }
        }
        Ok(())
    }

    /// The newest snapshot received since the last call.
    pub fn take_snapshot(&mut self) -> Option<WorldSnapshot> {
        self.pending.take()
    }

    /// Send this side's state for the tick and, once per [`PING_INTERVAL`]
    /// of simulation time, a latency probe.
    pub fn publish(&mut self, store: &EntityStore, config: &GameConfig, dt: f32) {
        self.clock += f64::from(dt);
        if !self.is_active() {
            return;
        }
        let msg = match self.role {
            NetRole::Host => NetMessage::Snapshot(capture(store, config)),
            NetRole::Guest => NetMessage::Pose(pose_of(store)),
        };
        self.send(&msg);

        self.ping_timer -= dt;
        if self.ping_timer <= 0.0 {
            self.send(&NetMessage::Ping {
                t: self.clock * 1000.0,
            });
            self.ping_timer = PING_INTERVAL;
        }
    }

    fn send(&self, msg: &NetMessage) {
        match msg.encode() {
            Ok(payload) => self.channel.send(payload),
            Err(e) => debug!("net: could not encode {}: {e}", msg.kind()),
        }
    }
}
