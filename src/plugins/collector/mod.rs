//! Collector plugin: the pickup zone, its conveyor belts, and belt transport.
//!
//! The collector is a static body made of sensors: a round pickup zone plus,
//! from level 2, belts that reach out to either side (and from level 4, one
//! pointing into the field). Gems overlapping a belt are pulled toward the
//! collector every step; gems touching the pickup zone are handled by the
//! gems plugin.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{
    layers::conveyor_layers,
    roles::{Belt, BeltSide, Role},
    state::GameState,
    tunables::{CollectorTuning, ConveyorTuning, Tunables},
};
use crate::plugins::contacts::ConveyorOverlaps;
use crate::plugins::economy::{Economy, Upgrade, Upgraded};
use crate::plugins::timestep::{RuleSet, SimSet};

#[derive(Component, Debug, Clone, Copy)]
pub struct Collector;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeltSpec {
    pub side: BeltSide,
    pub center: Vec2,
    pub size: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollectorLayout {
    pub center: Vec2,
    pub diameter: f32,
    pub belts: Vec<BeltSpec>,
}

impl CollectorLayout {
    pub fn build(level: u32, t: &CollectorTuning) -> Self {
        let center = Vec2::from(t.position);
        let diameter = t.base_size + t.size_per_level * level as f32;
        let mut belts = Vec::new();

        if level >= t.belt_min_level {
            let steps = level - t.belt_min_level;
            let length = (t.belt_base_length + steps as f32 * t.belt_length_per_level).min(t.belt_max_length);
            let width = t.belt_base_width + (steps / 2) as f32 * t.belt_width_step;
            let reach = diameter * 0.5 + length * 0.5;

            belts.push(BeltSpec {
                side: BeltSide::Left,
                center: center - Vec2::X * reach,
                size: Vec2::new(length, width),
            });
            belts.push(BeltSpec {
                side: BeltSide::Right,
                center: center + Vec2::X * reach,
                size: Vec2::new(length, width),
            });
            if level >= t.far_belt_min_level {
                belts.push(BeltSpec {
                    side: BeltSide::Far,
                    center: center + Vec2::Y * reach,
                    size: Vec2::new(width, length),
                });
            }
        }

        Self { center, diameter, belts }
    }
}

/// Velocity after one step of belt pull toward `target`.
///
/// Blends toward the belt velocity instead of snapping to it, so anything
/// else pushing the gem (the dozer) still wins for a moment.
pub fn belt_velocity(position: Vec2, velocity: Vec2, target: Vec2, t: &ConveyorTuning) -> Vec2 {
    let Some(dir) = (target - position).try_normalize() else {
        return velocity;
    };
    velocity + (dir * t.target_speed - velocity) * t.blend
}

const COLLECTOR_COLOR: Color = Color::srgba(1.0, 0.8, 0.2, 0.45);
const BELT_COLOR: Color = Color::srgba(0.35, 0.35, 0.4, 0.7);
const COLLECTOR_Z: f32 = 0.5;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(
            FixedUpdate,
            rebuild_on_upgrade
                .in_set(SimSet::Rebuild)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            transport_gems
                .in_set(RuleSet::Rules)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>, economy: Res<Economy>) {
    spawn_collector(&mut commands, &tunables.collector, economy.levels.collector);
}

pub fn spawn_collector(commands: &mut Commands, t: &CollectorTuning, level: u32) -> Entity {
    let layout = CollectorLayout::build(level, t);

    let root = commands
        .spawn((
            Name::new("Collector"),
            Collector,
            Role::Collector,
            Sprite::from_color(COLLECTOR_COLOR, Vec2::splat(layout.diameter)),
            Transform::from_translation(layout.center.extend(COLLECTOR_Z)),
            RigidBody::Static,
            Collider::circle(layout.diameter * 0.5),
            Sensor,
            conveyor_layers(),
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    for belt in &layout.belts {
        commands.spawn((
            Name::new(format!("Conveyor{:?}", belt.side)),
            Role::Conveyor(Belt { side: belt.side, target: layout.center }),
            Sprite::from_color(BELT_COLOR, belt.size),
            Transform::from_translation((belt.center - layout.center).extend(-0.1)),
            Collider::rectangle(belt.size.x, belt.size.y),
            Sensor,
            conveyor_layers(),
            ChildOf(root),
        ));
    }

    info!("collector: built level {level} ({} belts)", layout.belts.len());
    root
}

fn rebuild_on_upgrade(
    mut commands: Commands,
    mut upgraded: MessageReader<Upgraded>,
    tunables: Res<Tunables>,
    economy: Res<Economy>,
    q_collector: Query<Entity, With<Collector>>,
) {
    if upgraded.read().filter(|u| u.upgrade == Upgrade::Collector).count() == 0 {
        return;
    }
    for entity in &q_collector {
        commands.entity(entity).despawn();
    }
    spawn_collector(&mut commands, &tunables.collector, economy.levels.collector);
}

pub(crate) fn transport_gems(
    tunables: Res<Tunables>,
    overlaps: Res<ConveyorOverlaps>,
    q_belts: Query<&Role>,
    mut q_gems: Query<(&Position, &mut LinearVelocity)>,
) {
    for (gem, belt) in overlaps.iter() {
        let Ok(Role::Conveyor(Belt { target, .. })) = q_belts.get(belt) else {
            continue;
        };
        let Ok((pos, mut vel)) = q_gems.get_mut(gem) else {
            continue;
        };
        // Writing the velocity also wakes a sleeping gem.
        vel.0 = belt_velocity(pos.0, vel.0, *target, &tunables.conveyor);
    }
}

#[cfg(test)]
mod tests;
