//! Feature plugins.

use bevy::prelude::*;

pub mod collector;
pub mod contacts;
pub mod core;
pub mod dozer;
pub mod economy;
pub mod fx;
pub mod gems;
pub mod physics;
pub mod shop;
pub mod telemetry;
pub mod timestep;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
///
/// `core` goes first: the plugins after it read `Tunables` while building.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    timestep::plugin(app);
    economy::plugin(app);
    physics::plugin(app);
    contacts::plugin(app);
    fx::plugin(app);
    world::plugin(app);
    dozer::plugin(app);
    collector::plugin(app);
    gems::plugin(app);
    shop::plugin(app);
    telemetry::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
}
