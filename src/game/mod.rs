//! Game composition root.
//!
//! `configure_full` adds the window and renderer on top of the gameplay
//! plugins; `configure_headless` is the gameplay alone, for integration tests.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::{state::GameState, tunables::Tunables};
use crate::plugins;

// Renderer override is Windows-only.
#[cfg(target_os = "windows")]
use bevy::render::{
    settings::{Backends, PowerPreference, WgpuSettings},
    RenderPlugin,
};

pub fn run() {
    App::new()
        .insert_resource(Tunables::load_from_env())
        .add_plugins(configure_full)
        .run();
}

/// Full configuration: window, renderer, gameplay, camera and lights.
pub fn configure_full(app: &mut App) {
    let default_plugins = DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Gem Dozer".into(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    });

    // Windows: force DX12 on the high-performance adapter.
    #[cfg(target_os = "windows")]
    let default_plugins = default_plugins.set(RenderPlugin {
        render_creation: WgpuSettings {
            backends: Some(Backends::DX12),
            power_preference: PowerPreference::HighPerformance,
            ..default()
        }
        .into(),
        ..default()
    });

    app.add_plugins(default_plugins);

    configure_game(app);
    plugins::register_render(app);
}

/// Headless configuration for integration tests.
///
/// No DefaultPlugins and no render-only plugins (Firefly/camera). Tests that
/// need other tunables insert them before calling this.
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

/// Configuration shared by both full and headless apps.
fn configure_game(app: &mut App) {
    app.init_state::<GameState>();
    plugins::register_gameplay(app);
}