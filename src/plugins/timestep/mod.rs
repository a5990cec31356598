//! Fixed-timestep scheduling.
//!
//! Bevy's fixed main loop is the accumulator: every frame the (clamped) virtual
//! delta is added to `Time<Fixed>`, and `FixedMain` runs once per whole step.
//!
//! ```text
//! Update (variable dt)
//!   frame delta, clamped to max_frame_secs by Time<Virtual>
//!        |
//!        v
//! RunFixedMainLoop: while overstep >= step
//!   FixedFirst       StepCounter += 1
//!   FixedUpdate      Drive -> Shop -> Rebuild -> Rigidity
//!   FixedPostUpdate  avian step -> collision events -> Contacts -> Rules
//!        |
//!        v
//! Update: RenderAlpha = overstep / step
//! ```
//!
//! Gameplay therefore only ever sees whole steps of `1 / hz` seconds, and only
//! rendering depends on the frame rate.

use std::time::Duration;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

/// Per-step gameplay ordering inside `FixedUpdate`, before the physics step.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Drive,
    Shop,
    Rebuild,
    /// Last thing before avian integrates.
    Rigidity,
}

/// Post-step ordering inside `FixedPostUpdate`, after avian's collision events.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSet {
    Contacts,
    Rules,
}

/// Fraction of a pending fixed step left over after the last frame, in [0, 1).
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct RenderAlpha(pub f32);

/// Number of fixed steps run so far.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCounter(pub u64);

pub fn plugin(app: &mut App) {
    let hz = app.world().resource::<Tunables>().timestep.hz;

    app.insert_resource(Time::<Fixed>::from_hz(hz))
        .init_resource::<RenderAlpha>()
        .init_resource::<StepCounter>()
        .configure_sets(
            FixedUpdate,
            (SimSet::Drive, SimSet::Shop, SimSet::Rebuild, SimSet::Rigidity).chain(),
        )
        .configure_sets(
            FixedPostUpdate,
            (RuleSet::Contacts, RuleSet::Rules)
                .chain()
                .after(CollisionEventSystems),
        )
        .add_systems(Startup, clamp_frame_time)
        .add_systems(FixedFirst, count_step)
        .add_systems(Update, publish_render_alpha);
}

/// Bound catch-up work after a stall.
fn clamp_frame_time(tunables: Res<Tunables>, time: Option<ResMut<Time<Virtual>>>) {
    let Some(mut time) = time else {
        return;
    };
    let max = tunables.timestep.max_frame_secs;
    if max > 0.0 {
        time.set_max_delta(Duration::from_secs_f64(max));
    }
}

fn count_step(mut steps: ResMut<StepCounter>) {
    steps.0 += 1;
}

fn publish_render_alpha(fixed: Res<Time<Fixed>>, mut alpha: ResMut<RenderAlpha>) {
    alpha.0 = fixed.overstep_fraction();
}
