//! Headless tests for [`SimulationPlugin`].
//!
//! These use [`MinimalPlugins`] with a fixed time step so every
//! `app.update()` advances the simulation by a known amount.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use skirmish::simulation::step_simulation;
use skirmish::{ControlIntent, GameConfig, SimEvent, Simulation, SimulationPlugin};
use std::time::Duration;

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Resource, Default)]
struct Seen(Vec<SimEvent>);

fn record(mut reader: MessageReader<SimEvent>, mut seen: ResMut<Seen>) {
    seen.0.extend(reader.read().cloned());
}

fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)));
    app
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Without a pre-inserted simulation the plugin builds one from `GameConfig`.
#[test]
fn plugin_builds_simulation_from_config_resource() {
    let mut app = headless_app();
    app.insert_resource(GameConfig {
        round_time: 42.0,
        ..Default::default()
    })
    .add_plugins(SimulationPlugin);

    let sim = app.world().resource::<Simulation>();
    assert_eq!(sim.round().timer, 42.0);
    assert!(app.world().contains_resource::<ControlIntent>());
}

#[test]
fn frames_advance_the_round_timer() {
    let mut app = headless_app();
    app.insert_resource(Simulation::with_seed(GameConfig::default(), 1))
        .add_plugins(SimulationPlugin);
    for _ in 0..5 {
        app.update();
    }
    let sim = app.world().resource::<Simulation>();
    assert!(sim.round().timer < GameConfig::default().round_time);
}

/// The intent resource reaches the craft and the resulting events come back
/// out as Bevy messages.
#[test]
fn intent_in_messages_out() {
    let mut sim = Simulation::with_seed(GameConfig::default(), 2);
    sim.world_mut().clear_world();

    let mut app = headless_app();
    app.insert_resource(sim)
        .init_resource::<Seen>()
        .add_plugins(SimulationPlugin)
        .add_systems(Update, record.after(step_simulation))
        .insert_resource(ControlIntent {
            fire: true,
            ..Default::default()
        });
    for _ in 0..4 {
        app.update();
    }

    let seen = &app.world().resource::<Seen>().0;
    let shots = seen
        .iter()
        .filter(|e| matches!(e, SimEvent::ShotFired { .. }))
        .count();
    assert_eq!(shots, 1, "fire is edge-triggered");
    assert_eq!(app.world().resource::<Simulation>().world().projectiles.len(), 1);
}
