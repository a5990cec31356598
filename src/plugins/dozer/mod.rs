//! Dozer plugin: the player vehicle.
//!
//! The dozer is one dynamic rigid body (the root) with one child collider per
//! part. Part poses are frozen relative to the root when the dozer is built and
//! re-imposed every step just before avian integrates, so the plow and wings
//! stay where they were put no matter how hard the dozer is driven.
//!
//! Engine and plow purchases rebuild the whole dozer in place: the old root
//! (and its children) is despawned, then a new one is spawned at the same pose.

pub mod assembly;
pub mod controller;
pub mod rigid;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{
    layers::dozer_layers,
    roles::{PartKind, Role},
    state::GameState,
    tunables::Tunables,
};
use crate::plugins::economy::{Economy, Upgrade, Upgraded};
use crate::plugins::timestep::SimSet;

use assembly::DozerLayout;
use rigid::{Pose, RigidAssembly};

pub use controller::{DriveCommand, DriveIntent, JoystickSteering};

/// Root of the dozer. `mass` is what the controller divides drive force by.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Dozer {
    pub mass: f32,
}

/// Frozen part offsets of the dozer it is attached to.
#[derive(Component, Debug, Clone, Default)]
pub struct FrozenParts(pub RigidAssembly<Entity>);

const CHASSIS_COLOR: Color = Color::srgb(0.95, 0.7, 0.1);
const PLOW_COLOR: Color = Color::srgb(0.55, 0.57, 0.6);
const DOZER_Z: f32 = 3.0;
const DRIFT_REPORT: f32 = 1e-3;

pub fn plugin(app: &mut App) {
    app.init_resource::<DriveIntent>()
        .init_resource::<JoystickSteering>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(Update, controller::gather_input)
        .add_systems(
            FixedUpdate,
            (
                controller::drive_dozer.in_set(SimSet::Drive),
                rebuild_on_upgrade.in_set(SimSet::Rebuild),
                enforce_rigidity.in_set(SimSet::Rigidity),
            )
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>, economy: Res<Economy>) {
    spawn_dozer(&mut commands, &tunables, &economy, Pose::default());
}

/// Build a dozer for the current levels at `pose` and return its root.
pub fn spawn_dozer(commands: &mut Commands, tunables: &Tunables, economy: &Economy, pose: Pose) -> Entity {
    let t = &tunables.dozer;
    let layout = DozerLayout::build(economy.levels.dozer, economy.levels.plow, t);

    let root = commands
        .spawn((
            Name::new("Dozer"),
            Dozer { mass: layout.mass() },
            Transform::from_translation(pose.position.extend(DOZER_Z))
                .with_rotation(Quat::from_rotation_z(pose.angle)),
            RigidBody::Dynamic,
            Position(pose.position),
            Rotation::radians(pose.angle),
            LinearVelocity::ZERO,
            AngularVelocity::ZERO,
            LinearDamping(t.linear_damping),
            TranslationInterpolation,
            RotationInterpolation,
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    let parts: Vec<(Entity, Pose)> = layout
        .parts
        .iter()
        .map(|part| {
            let color = match part.kind {
                PartKind::Chassis => CHASSIS_COLOR,
                _ => PLOW_COLOR,
            };
            let entity = commands
                .spawn((
                    Name::new(format!("Dozer{:?}", part.kind)),
                    Role::DozerPart(part.kind),
                    Sprite::from_color(color, part.size),
                    Transform::from_translation(part.local.position.extend(0.0))
                        .with_rotation(Quat::from_rotation_z(part.local.angle)),
                    Collider::rectangle(part.size.x, part.size.y),
                    ColliderDensity(layout.density),
                    Friction::new(t.friction),
                    dozer_layers(),
                    CollisionEventsEnabled,
                    ChildOf(root),
                ))
                .id();
            (entity, pose.transform(part.local))
        })
        .collect();

    commands
        .entity(root)
        .insert(FrozenParts(RigidAssembly::freeze(pose, parts)));

    info!(
        "dozer: built engine {} plow {} ({} parts, mass {:.1})",
        economy.levels.dozer,
        economy.levels.plow,
        layout.parts.len(),
        layout.mass()
    );
    root
}

/// Rebuild after an engine or plow purchase, keeping position and heading.
fn rebuild_on_upgrade(
    mut commands: Commands,
    mut upgraded: MessageReader<Upgraded>,
    tunables: Res<Tunables>,
    economy: Res<Economy>,
    q_dozer: Query<(Entity, &Position, &Rotation), With<Dozer>>,
) {
    let relevant = upgraded
        .read()
        .filter(|u| matches!(u.upgrade, Upgrade::Dozer | Upgrade::Plow))
        .count();
    if relevant == 0 {
        return;
    }

    let mut pose = Pose::default();
    for (entity, pos, rot) in &q_dozer {
        pose = Pose::new(pos.0, rot.as_radians());
        commands.entity(entity).despawn();
    }
    spawn_dozer(&mut commands, &tunables, &economy, pose);
}

/// Snap every part back to its frozen offset from the root's current pose.
pub(crate) fn enforce_rigidity(
    q_dozer: Query<(&Position, &Rotation, &FrozenParts), With<Dozer>>,
    mut q_parts: Query<(&mut Transform, Option<&mut Position>, Option<&mut Rotation>), Without<Dozer>>,
) {
    for (pos, rot, frozen) in &q_dozer {
        let parent = Pose::new(pos.0, rot.as_radians());

        let actual = frozen.0.parts().filter_map(|part| {
            let (_, p, r) = q_parts.get(part.key).ok()?;
            Some((part.key, Pose::new(p?.0, r?.as_radians())))
        });
        let drift = frozen.0.max_drift(parent, actual);
        if drift > DRIFT_REPORT {
            debug!("dozer: parts drifted {drift:.4} before correction");
        }

        // `reproject` yields parts in freeze order.
        for (part, (key, world)) in frozen.0.parts().zip(frozen.0.reproject(parent)) {
            let Ok((mut tf, part_pos, part_rot)) = q_parts.get_mut(key) else {
                debug!("dozer: part {key:?} missing, skipping");
                continue;
            };

            let local_rot = Quat::from_rotation_z(part.local.angle);
            if tf.translation.truncate() != part.local.position || tf.rotation != local_rot {
                tf.translation = part.local.position.extend(tf.translation.z);
                tf.rotation = local_rot;
            }

            if let Some(mut p) = part_pos {
                p.set_if_neq(Position(world.position));
            }
            if let Some(mut r) = part_rot {
                r.set_if_neq(Rotation::radians(world.angle));
            }
        }
    }
}
