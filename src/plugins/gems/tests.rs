use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;
use crate::common::tunables::ZoneSpawn;

fn small_tunables() -> Tunables {
    let mut t = Tunables::default();
    t.gems.zones = vec![
        ZoneSpawn { zone: 1, count: 6, x: [-100.0, 100.0], y: [-50.0, 50.0], value: [8, 12] },
        ZoneSpawn { zone: 2, count: 4, x: [-100.0, 100.0], y: [700.0, 800.0], value: [25, 40] },
    ];
    t
}

fn setup(tunables: Tunables) -> World {
    let mut world = World::new();
    world.insert_resource(Economy::new(&tunables.economy));
    world.insert_resource(tunables);
    world.init_resource::<Messages<ContactStarted>>();
    world.init_resource::<Messages<GemCollected>>();
    world.init_resource::<Messages<Effect>>();
    world
}

fn gems(world: &mut World) -> Vec<(Gem, Vec2)> {
    world
        .query::<(&Role, &Transform)>()
        .iter(world)
        .filter_map(|(r, tf)| r.gem().map(|g| (*g, tf.translation.truncate())))
        .collect()
}

fn add_gem(world: &mut World, value: u64, zone: u8) -> Entity {
    world
        .spawn((Role::Gem(Gem::new(value, ZoneId(zone))), Transform::default()))
        .id()
}

fn touch(world: &mut World, gem: Entity, collector: Entity) {
    world.write_message(ContactStarted(Contact::GemCollector { gem, collector }));
}

fn effects(world: &mut World) -> Vec<EffectKind> {
    run_system_once(world, |mut r: MessageReader<Effect>| {
        r.read().map(|e| e.kind).collect::<Vec<_>>()
    })
}

// --------------------------------------------------------------------------------------
// Spawning
// --------------------------------------------------------------------------------------

#[test]
fn spawn_places_seeded_gems_inside_their_zones() {
    let mut world = setup(small_tunables());
    run_system_once(&mut world, super::spawn_gems);

    let all = gems(&mut world);
    assert_eq!(all.len(), 10);
    for (gem, at) in &all {
        match gem.zone.0 {
            1 => {
                assert!((8..12).contains(&gem.value));
                assert!(at.y >= -50.0 && at.y < 50.0);
            }
            2 => {
                assert!((25..40).contains(&gem.value));
                assert!(at.y >= 700.0 && at.y < 800.0);
            }
            z => panic!("unexpected zone {z}"),
        }
        assert!(!gem.collected);
    }

    let economy = world.resource::<Economy>();
    assert_eq!(economy.zone(ZoneId(1)).total, 6);
    assert_eq!(economy.zone(ZoneId(2)).total, 4);
}

#[test]
fn same_seed_same_field() {
    let mut a = setup(small_tunables());
    let mut b = setup(small_tunables());
    run_system_once(&mut a, super::spawn_gems);
    run_system_once(&mut b, super::spawn_gems);
    assert_eq!(gems(&mut a), gems(&mut b));

    let mut t = small_tunables();
    t.gems.seed ^= 1;
    let mut c = setup(t);
    run_system_once(&mut c, super::spawn_gems);
    assert_ne!(gems(&mut a), gems(&mut c));
}

#[test]
fn degenerate_ranges_do_not_panic() {
    let mut t = Tunables::default();
    t.gems.radius = [10.0, 10.0];
    t.gems.zones = vec![ZoneSpawn { zone: 1, count: 2, x: [5.0, 5.0], y: [0.0, 0.0], value: [7, 7] }];
    let mut world = setup(t);
    run_system_once(&mut world, super::spawn_gems);

    for (gem, at) in gems(&mut world) {
        assert_eq!(gem.value, 7);
        assert_eq!(at, Vec2::new(5.0, 0.0));
    }
}

// --------------------------------------------------------------------------------------
// Pickup
// --------------------------------------------------------------------------------------

#[test]
fn gem_on_collector_is_credited_and_removed() {
    let mut world = setup(Tunables::default());
    let collector = world.spawn(Role::Collector).id();
    let gem = add_gem(&mut world, 15, 1);

    touch(&mut world, gem, collector);
    run_system_once(&mut world, super::collect_gems);

    assert_eq!(world.resource::<Economy>().money, 15);
    assert!(world.get_entity(gem).is_err());
}

#[test]
fn same_gem_twice_in_one_step_pays_once() {
    let mut world = setup(Tunables::default());
    let collector = world.spawn(Role::Collector).id();
    let gem = add_gem(&mut world, 15, 1);
    let other = add_gem(&mut world, 20, 1);
    add_gem(&mut world, 1, 1);

    touch(&mut world, gem, collector);
    touch(&mut world, gem, collector);
    run_system_once(&mut world, super::collect_gems);
    assert_eq!(world.resource::<Economy>().money, 15);

    touch(&mut world, other, collector);
    run_system_once(&mut world, super::collect_gems);
    assert_eq!(world.resource::<Economy>().money, 35);
}

#[test]
fn overlap_over_many_steps_pays_once() {
    let mut world = setup(Tunables::default());
    let collector = world.spawn(Role::Collector).id();
    let gem = add_gem(&mut world, 12, 1);
    add_gem(&mut world, 1, 1);

    for _ in 0..5 {
        touch(&mut world, gem, collector);
        run_system_once(&mut world, super::collect_gems);
    }

    assert_eq!(world.resource::<Economy>().money, 12);
    assert!(world.get_entity(gem).is_err());
}

#[test]
fn zone_bonus_pays_once_at_half() {
    let mut world = setup(Tunables::default());
    world.resource_mut::<Economy>().register_gems(ZoneId(2), 4);
    let collector = world.spawn(Role::Collector).id();
    let g: Vec<Entity> = (0..4).map(|_| add_gem(&mut world, 30, 2)).collect();

    touch(&mut world, g[0], collector);
    touch(&mut world, g[1], collector);
    run_system_once(&mut world, super::collect_gems);
    assert_eq!(world.resource::<Economy>().money, 60 + 1000);
    assert!(effects(&mut world).contains(&EffectKind::ZoneBonus { zone: ZoneId(2), amount: 1000 }));

    touch(&mut world, g[2], collector);
    run_system_once(&mut world, super::collect_gems);
    assert_eq!(world.resource::<Economy>().money, 90 + 1000);
}

#[test]
fn last_gem_triggers_victory_once() {
    let mut world = setup(Tunables::default());
    let collector = world.spawn(Role::Collector).id();
    let a = add_gem(&mut world, 10, 1);
    let b = add_gem(&mut world, 10, 1);

    touch(&mut world, a, collector);
    run_system_once(&mut world, super::collect_gems);
    assert!(!world.resource::<Economy>().victory);

    touch(&mut world, b, collector);
    run_system_once(&mut world, super::collect_gems);
    assert!(world.resource::<Economy>().victory);
    assert!(effects(&mut world).contains(&EffectKind::Victory));
}

#[test]
fn other_contacts_and_missing_gems_are_ignored() {
    let mut world = setup(Tunables::default());
    let collector = world.spawn(Role::Collector).id();
    let wall = world.spawn((Role::Wall, Transform::default())).id();
    let ghost = world.spawn_empty().id();
    world.despawn(ghost);

    world.write_message(ContactStarted(Contact::DozerBump { part: wall, other: wall }));
    touch(&mut world, ghost, collector);
    // A non-gem role reported as a gem does nothing either.
    touch(&mut world, wall, collector);
    run_system_once(&mut world, super::collect_gems);

    assert_eq!(world.resource::<Economy>().money, 0);
    assert!(world.get_entity(wall).is_ok());
}

#[test]
fn pickup_reports_collected_message() {
    let mut world = setup(Tunables::default());
    let collector = world.spawn(Role::Collector).id();
    let gem = add_gem(&mut world, 9, 3);
    add_gem(&mut world, 1, 1);

    touch(&mut world, gem, collector);
    run_system_once(&mut world, super::collect_gems);

    let got = run_system_once(&mut world, |mut r: MessageReader<GemCollected>| {
        r.read().copied().collect::<Vec<_>>()
    });
    assert_eq!(got, vec![GemCollected { gem, value: 9, zone: ZoneId(3) }]);
}
