use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;

const EPS: f32 = 1e-3;

fn layout(level: u32) -> CollectorLayout {
    CollectorLayout::build(level, &CollectorTuning::default())
}

#[test]
fn level_one_is_just_the_pickup_zone() {
    let l = layout(1);
    assert_eq!(l.center, Vec2::new(0.0, -400.0));
    assert!((l.diameter - 70.0).abs() < EPS);
    assert!(l.belts.is_empty());
}

#[test]
fn level_two_adds_side_belts_touching_the_zone() {
    let l = layout(2);
    assert_eq!(l.belts.len(), 2);
    let left = l.belts.iter().find(|b| b.side == BeltSide::Left).unwrap();
    let right = l.belts.iter().find(|b| b.side == BeltSide::Right).unwrap();

    assert_eq!(left.size, Vec2::new(50.0, 60.0));
    // Inner edge of each belt meets the rim of the pickup zone.
    assert!((right.center.x - right.size.x * 0.5 - l.diameter * 0.5).abs() < EPS);
    assert!((left.center.x + right.center.x).abs() < EPS);
    assert!((left.center.y - l.center.y).abs() < EPS);
}

#[test]
fn level_four_adds_far_belt_and_widens() {
    let l = layout(4);
    assert_eq!(l.belts.len(), 3);
    let far = l.belts.iter().find(|b| b.side == BeltSide::Far).unwrap();
    assert_eq!(far.size, Vec2::new(80.0, 150.0));
    assert!(far.center.y > l.center.y);
    assert!((far.center.x - l.center.x).abs() < EPS);
}

#[test]
fn belt_length_is_capped() {
    let l = layout(30);
    assert!(l.belts.iter().all(|b| b.size.max_element() <= 500.0));
}

#[test]
fn belt_velocity_blends_toward_target() {
    let t = ConveyorTuning::default();
    let v = belt_velocity(Vec2::new(100.0, 0.0), Vec2::ZERO, Vec2::ZERO, &t);
    assert!((v - Vec2::new(-90.0, 0.0)).length() < EPS);

    // Repeated application converges on the belt speed.
    let mut v = Vec2::new(0.0, 300.0);
    for _ in 0..30 {
        v = belt_velocity(Vec2::new(100.0, 0.0), v, Vec2::ZERO, &t);
    }
    assert!((v - Vec2::new(-t.target_speed, 0.0)).length() < 0.1);
}

#[test]
fn belt_velocity_at_target_leaves_velocity_alone() {
    let t = ConveyorTuning::default();
    let v = Vec2::new(3.0, 4.0);
    assert_eq!(belt_velocity(Vec2::ONE, v, Vec2::ONE, &t), v);
}

/// A gem dropped on a belt with nothing else acting on it gets strictly closer
/// to the collector every step until it is within one step of travel.
#[test]
fn gem_on_belt_converges_monotonically() {
    let t = ConveyorTuning::default();
    let dt = 1.0 / 60.0;
    let target = Vec2::new(0.0, -400.0);

    for start in [
        Vec2::new(-120.0, -395.0),
        Vec2::new(140.0, -410.0),
        Vec2::new(5.0, -250.0),
    ] {
        let (mut pos, mut vel) = (start, Vec2::new(20.0, -15.0));
        let mut last = pos.distance(target);
        for step in 0..600 {
            vel = belt_velocity(pos, vel, target, &t);
            pos += vel * dt;
            let d = pos.distance(target);
            if last <= t.target_speed * dt * 2.0 {
                break;
            }
            assert!(d < last + 1e-4, "start {start}: step {step} went from {last} to {d}");
            last = d;
        }
        assert!(last <= t.target_speed * dt * 2.0, "start {start} never arrived ({last})");
    }
}

#[test]
fn transport_pulls_overlapping_gems_only() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());

    let target = Vec2::new(0.0, -400.0);
    let belt = world
        .spawn(Role::Conveyor(Belt { side: BeltSide::Right, target }))
        .id();
    let on_belt = world.spawn((Position(Vec2::new(100.0, -400.0)), LinearVelocity::ZERO)).id();
    let elsewhere = world.spawn((Position(Vec2::new(100.0, 0.0)), LinearVelocity::ZERO)).id();

    let mut overlaps = ConveyorOverlaps::default();
    overlaps.insert(on_belt, belt);
    world.insert_resource(overlaps);

    run_system_once(&mut world, super::transport_gems);

    let v = world.get::<LinearVelocity>(on_belt).unwrap().0;
    assert!(v.x < 0.0 && v.y.abs() < EPS);
    assert_eq!(world.get::<LinearVelocity>(elsewhere).unwrap().0, Vec2::ZERO);
}

#[test]
fn transport_skips_stale_pairs() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    let gem = world.spawn((Position(Vec2::ZERO), LinearVelocity(Vec2::X))).id();
    let gone = world.spawn_empty().id();
    world.despawn(gone);

    let mut overlaps = ConveyorOverlaps::default();
    overlaps.insert(gem, gone);
    overlaps.insert(gone, gem);
    world.insert_resource(overlaps);

    run_system_once(&mut world, super::transport_gems);
    assert_eq!(world.get::<LinearVelocity>(gem).unwrap().0, Vec2::X);
}

fn setup(level: u32) -> World {
    let mut world = World::new();
    let tunables = Tunables::default();
    let mut economy = Economy::new(&tunables.economy);
    economy.levels.collector = level;
    world.insert_resource(tunables);
    world.insert_resource(economy);
    world.init_resource::<Messages<Upgraded>>();
    world
}

fn belts(world: &mut World) -> usize {
    world
        .query::<&Role>()
        .iter(world)
        .filter(|r| matches!(r, Role::Conveyor(_)))
        .count()
}

#[test]
fn spawn_builds_collector_for_current_level() {
    let mut world = setup(2);
    run_system_once(&mut world, super::spawn);

    let roots = world.query_filtered::<&Role, With<Collector>>().iter(&world).count();
    assert_eq!(roots, 1);
    assert_eq!(belts(&mut world), 2);
}

#[test]
fn collector_upgrade_rebuilds_with_more_belts() {
    let mut world = setup(3);
    run_system_once(&mut world, super::spawn);
    assert_eq!(belts(&mut world), 2);

    world.resource_mut::<Economy>().levels.collector = 4;
    world.write_message(Upgraded { upgrade: Upgrade::Collector, level: 4 });
    run_system_once(&mut world, super::rebuild_on_upgrade);

    let roots = world.query_filtered::<(), With<Collector>>().iter(&world).count();
    assert_eq!(roots, 1);
    assert_eq!(belts(&mut world), 3);
}

#[test]
fn other_upgrades_leave_collector_alone() {
    let mut world = setup(2);
    run_system_once(&mut world, super::spawn);
    let before = world.query_filtered::<Entity, With<Collector>>().single(&world).unwrap();

    world.write_message(Upgraded { upgrade: Upgrade::Plow, level: 2 });
    run_system_once(&mut world, super::rebuild_on_upgrade);

    let after = world.query_filtered::<Entity, With<Collector>>().single(&world).unwrap();
    assert_eq!(before, after);
}
