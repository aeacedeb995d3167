//! Skirmish simulation library
//!
//! The headless core of a toroidal 2D space-combat arcade game: gravity,
//! collisions, asteroid fragmentation, the craft life cycle and host/guest
//! state sync.  Rendering, audio and input capture live outside this crate
//! and talk to it through [`ControlIntent`], [`SimEvent`] and [`HudSnapshot`].

pub mod collision;
pub mod config;
pub mod constants;
pub mod craft;
pub mod effects;
pub mod enemy;
pub mod entities;
pub mod error;
pub mod events;
pub mod fragmentation;
pub mod geometry;
pub mod gravity;
pub mod lifecycle;
pub mod net;
pub mod simulation;
pub mod spawn;

pub use config::{load_game_config, GameConfig};
pub use craft::ControlIntent;
pub use events::{HudSnapshot, SimEvent};
pub use lifecycle::CraftState;
pub use net::{MemoryChannel, NetRole, PeerChannel};
pub use simulation::{Simulation, SimulationPlugin};
