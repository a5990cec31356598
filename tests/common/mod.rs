//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `gem_dozer::game::configure_headless` to install gameplay plugins.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use gem_dozer::common::tunables::Tunables;

pub fn app_headless() -> App {
    app_headless_with(Tunables::default())
}

/// Headless app with the given tunables in place before any plugin builds.
pub fn app_headless_with(tunables: Tunables) -> App {
    let mut app = App::new();

    // AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(tunables);

    gem_dozer::game::configure_headless(&mut app);
    // `App::run` would do this; tests drive `update()` by hand, and avian
    // initializes resources (e.g. `CollisionDiagnostics`) in `Plugin::finish`.
    app.finish();
    app.cleanup();
    app
}

/// Default tunables with an empty gem field, for tests that place their own gems.
pub fn no_gems() -> Tunables {
    let mut t = Tunables::default();
    t.gems.zones.clear();
    t
}

/// Every `app.update()` advances the clocks by exactly `frame`.
/// The very first update only starts the clock.
pub fn fixed_frames(app: &mut App, frame: Duration) {
    app.insert_resource(TimeUpdateStrategy::ManualDuration(frame));
}
