use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use skirmish::config::DEFAULT_CONFIG_PATH;
use skirmish::{load_game_config, Simulation, SimulationPlugin};
use std::env;
use std::time::Duration;

/// Seconds between HUD lines in the log.
const HUD_LOG_INTERVAL: f32 = 5.0;

#[derive(Resource)]
struct RunLimit {
    /// Wall-clock seconds to run before exiting; `None` runs forever.
    seconds: Option<f32>,
    elapsed: f32,
    since_log: f32,
}

fn log_hud(time: Res<Time>, sim: Res<Simulation>, mut limit: ResMut<RunLimit>, mut exit: MessageWriter<AppExit>) {
    limit.elapsed += time.delta_secs();
    limit.since_log += time.delta_secs();

    if limit.since_log >= HUD_LOG_INTERVAL {
        limit.since_log = 0.0;
        let hud = sim.hud();
        info!(
            "[{}] {:?} score={} lives={} armor={} enemies={} asteroids={}",
            hud.timer_label(),
            hud.state,
            hud.score,
            hud.lives,
            hud.armor,
            hud.enemy_count,
            sim.world().asteroids.len()
        );
    }

    if limit.seconds.is_some_and(|s| limit.elapsed >= s) {
        info!("Run limit reached after {:.1}s", limit.elapsed);
        exit.write(AppExit::Success);
    }
}

fn main() {
    // Optional run limit for unattended runs.
    let seconds = env::var("SKIRMISH_SECONDS")
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| *s > 0.0);

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
        LogPlugin::default(),
    ));

    // Config has to be in place before the plugin builds the simulation.
    let config = load_game_config(DEFAULT_CONFIG_PATH);
    app.insert_resource(Simulation::new(config.clone()))
        .insert_resource(config)
        .insert_resource(RunLimit {
            seconds,
            elapsed: 0.0,
            since_log: 0.0,
        })
        .add_plugins(SimulationPlugin)
        .add_systems(Update, log_hud.after(skirmish::simulation::step_simulation));

    app.run();
}
