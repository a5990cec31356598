//! World plugin: arena walls, zone gates, floor.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{
    layers::wall_layers,
    roles::Role,
    state::GameState,
    tunables::{ArenaTuning, Tunables},
};
use crate::plugins::economy::{Economy, Upgrade, Upgraded};
use crate::plugins::timestep::SimSet;

const TILE: f32 = 128.0;

/// Wall between two zones, removed once the area level reaches `opens_at_area`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    pub opens_at_area: u32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), (spawn_arena, spawn_floor))
        .add_systems(
            FixedUpdate,
            open_gates
                .in_set(SimSet::Rebuild)
                .run_if(in_state(GameState::InGame)),
        );
}

fn wall_bundle(name: String, center: Vec2, size: Vec2) -> impl Bundle {
    (
        Name::new(name),
        Role::Wall,
        Sprite::from_color(Color::srgb(0.25, 0.27, 0.33), size),
        Transform::from_translation(center.extend(0.0)),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        wall_layers(),
        DespawnOnExit(GameState::InGame),
    )
}

fn spawn_arena(mut commands: Commands, tunables: Res<Tunables>, economy: Res<Economy>) {
    let arena: &ArenaTuning = &tunables.arena;
    let (min, max) = (Vec2::from(arena.min), Vec2::from(arena.max));
    let t = arena.wall_thickness;
    let center = (min + max) * 0.5;
    let extent = max - min;

    let horizontal = Vec2::new(extent.x + t * 2.0, t);
    let vertical = Vec2::new(t, extent.y);
    commands.spawn(wall_bundle("WallTop".into(), Vec2::new(center.x, max.y + t * 0.5), horizontal));
    commands.spawn(wall_bundle("WallBottom".into(), Vec2::new(center.x, min.y - t * 0.5), horizontal));
    commands.spawn(wall_bundle("WallLeft".into(), Vec2::new(min.x - t * 0.5, center.y), vertical));
    commands.spawn(wall_bundle("WallRight".into(), Vec2::new(max.x + t * 0.5, center.y), vertical));

    for gate in arena.gates.iter().filter(|g| g.opens_at_area > economy.levels.area) {
        commands.spawn((
            wall_bundle(
                format!("Gate{}", gate.opens_at_area),
                Vec2::new(center.x, gate.y),
                Vec2::new(extent.x, t),
            ),
            Gate { opens_at_area: gate.opens_at_area },
        ));
    }
}

fn open_gates(
    mut commands: Commands,
    mut upgraded: MessageReader<Upgraded>,
    economy: Res<Economy>,
    q_gates: Query<(Entity, &Gate)>,
) {
    if upgraded.read().filter(|u| u.upgrade == Upgrade::Area).count() == 0 {
        return;
    }
    for (entity, gate) in &q_gates {
        if gate.opens_at_area <= economy.levels.area {
            info!("world: area {} opens gate", economy.levels.area);
            commands.entity(entity).despawn();
        }
    }
}

/// Checkerboard floor made of solid-colour sprites, so there are no assets to load.
fn spawn_floor(mut commands: Commands, tunables: Res<Tunables>) {
    let (min, max) = (Vec2::from(tunables.arena.min), Vec2::from(tunables.arena.max));
    let cols = ((max.x - min.x) / TILE).ceil() as i32;
    let rows = ((max.y - min.y) / TILE).ceil() as i32;

    (0..rows)
        .flat_map(|y| (0..cols).map(move |x| (x, y)))
        .for_each(|(x, y)| {
            let pos = min + (Vec2::new(x as f32, y as f32) + 0.5) * TILE;
            let color = if (x + y) % 2 == 0 {
                Color::srgb(0.14, 0.14, 0.16)
            } else {
                Color::srgb(0.12, 0.12, 0.14)
            };

            commands.spawn((
                Sprite::from_color(color, Vec2::splat(TILE)),
                Transform::from_translation(pos.extend(-1.0)),
                DespawnOnExit(GameState::InGame),
            ));
        });
}
