//! Craft module: hull geometry, status timers, control intents and weapons.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | [`Craft`] record, hull points, bounding circle and precise hull test |
//! | [`control`] | [`ControlIntent`] resource, rotation/thrust/flip steering, edge-triggered fire |
//!
//! Damage, destruction and respawn are life-cycle concerns and live in
//! [`crate::lifecycle`] and [`crate::collision`].

pub mod control;
pub mod state;

pub use control::{drag_factor, fire, steer, ControlIntent, FlipTurn};
pub use state::Craft;
