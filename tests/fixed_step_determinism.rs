mod common;

use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;
use gem_dozer::plugins::dozer::{Dozer, DriveIntent};
use gem_dozer::plugins::timestep::StepCounter;

/// Runs `frames` updates of `frame` each while driving forward and turning,
/// returning the step count and final dozer pose.
fn drive(frame: Duration, frames: u32) -> (u64, Vec2, f32) {
    let mut tunables = common::no_gems();
    tunables.timestep.hz = 50.0;
    let mut app = common::app_headless_with(tunables);
    common::fixed_frames(&mut app, frame);

    app.insert_resource(DriveIntent { throttle: 1.0, turn: 0.4, stick: None });
    for _ in 0..frames {
        app.update();
    }

    let world = app.world_mut();
    let (pos, rot) = world
        .query_filtered::<(&Position, &Rotation), With<Dozer>>()
        .single(world)
        .unwrap();
    let pose = (pos.0, rot.as_radians());
    (world.resource::<StepCounter>().0, pose.0, pose.1)
}

#[test]
fn same_sim_time_same_result_at_any_frame_rate() {
    // 1.6 s of clock either way (the first update only starts the clock).
    let (steps_slow, pos_slow, angle_slow) = drive(Duration::from_millis(100), 17);
    let (steps_fast, pos_fast, angle_fast) = drive(Duration::from_millis(10), 161);

    assert_eq!(steps_slow, 80);
    assert_eq!(steps_slow, steps_fast);
    assert!(pos_slow.distance(pos_fast) < 1e-4, "{pos_slow} vs {pos_fast}");
    assert!((angle_slow - angle_fast).abs() < 1e-4);
    // It actually went somewhere.
    assert!(pos_slow.length() > 1.0);
}
