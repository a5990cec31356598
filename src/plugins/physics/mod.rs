//! Physics plugin: top-down avian world.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    let physics = app.world().resource::<Tunables>().physics.clone();
    app.add_plugins(PhysicsPlugins::default().with_length_unit(physics.pixels_per_meter));
    app.insert_resource(Gravity(Vec2::ZERO));
    app.insert_resource(SubstepCount(physics.substeps.max(1)));
}
