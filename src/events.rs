//! Read-only outputs for presentation: the per-tick event stream and the HUD.
//!
//! Audio and rendering live outside the simulation.  They learn what happened
//! from [`SimEvent`]s (drained once per tick, or received as Bevy messages
//! through [`crate::simulation::SimulationPlugin`]) and read the steady-state
//! numbers from a [`HudSnapshot`].

use crate::entities::PickupKind;
use crate::lifecycle::CraftState;
use crate::net::Pose;
use bevy::prelude::*;

/// Something the presenter may want to show or play.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum SimEvent {
    ShotFired { pos: Vec2, boosted: bool },
    /// Something took damage without being destroyed outright.
    Hit { pos: Vec2 },
    Explosion { pos: Vec2 },
    /// An enemy switched from patrol to alert.
    Alarm { pos: Vec2 },
    PickupCollected { kind: PickupKind, pos: Vec2 },
    CraftDestroyed { pos: Vec2, lives_left: u32 },
    Respawned { pos: Vec2 },
    GameOver { timed_out: bool },
    RoundRestarted,
}

/// Numbers a HUD needs, copied out of the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub score: u32,
    pub lives: u32,
    pub armor: u32,
    /// Seconds left in the round.
    pub time_remaining: f32,
    pub enemy_count: usize,
    /// Last measured round-trip time, when linked to a peer.
    pub ping_ms: Option<f32>,
    pub shield_remaining: f32,
    pub weapon_boost_remaining: f32,
    pub state: CraftState,
    pub near_gravity_trap: bool,
    /// Last pose received from the peer, drawn as a non-colliding ghost.
    pub peer: Option<Pose>,
}

impl HudSnapshot {
    /// Round timer as `MM:SS`.
    pub fn timer_label(&self) -> String {
        let secs = self.time_remaining.max(0.0) as u32;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
