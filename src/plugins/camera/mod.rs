//! Camera plugin: smoothed follow of the dozer (render-only).
//!
//! The follow system reads the dozer's `Transform` and writes the camera's.
//! Bevy rejects a system holding `Query<&Transform>` and `Query<&mut Transform>`
//! unless it can prove the two never alias (B0001), so each query excludes the
//! other's marker with `Without<...>`.
//!
//! ```text
//! OnEnter(InGame): spawn MainCamera
//! PostUpdate:      follow_dozer (before transform propagation)
//! ```

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::dozer::Dozer;

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PostUpdate,
            follow_dozer
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera { responsiveness: 5.0 },
        FireflyConfig::default(),
        Transform::from_xyz(0.0, 0.0, 999.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_dozer(
    time: Res<Time>,
    q_dozer: Query<&Transform, (With<Dozer>, Without<MainCamera>)>,
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Dozer>>,
) {
    // The dozer is briefly absent while an upgrade rebuilds it.
    let Ok(tf_dozer) = q_dozer.single() else {
        return;
    };
    let Ok((mut tf_cam, cam)) = q_cam.single_mut() else {
        return;
    };

    let alpha = 1.0 - (-cam.responsiveness * time.delta_secs()).exp();
    let target = tf_dozer.translation.truncate();
    let current = tf_cam.translation.truncate();
    let next = current.lerp(target, alpha);

    tf_cam.translation.x = next.x;
    tf_cam.translation.y = next.y;
}
