//! Core plugin: shared resources and global settings.

use crate::common::tunables::Tunables;
use bevy::prelude::*;

/// Keeps a `Tunables` the host inserted earlier (the binary loads one from
/// disk); otherwise falls back to the built-in defaults.
pub fn plugin(app: &mut App) {
    app.init_resource::<Tunables>();
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));
}
