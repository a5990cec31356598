//! Lighting plugin (Firefly) (render-only).

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::{state::GameState, tunables::Tunables};
use crate::plugins::dozer::Dozer;

#[derive(Component)]
pub struct HeadLight;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(Update, follow_dozer_light.run_if(in_state(GameState::InGame)));
}

fn setup(mut commands: Commands, tunables: Res<Tunables>) {
    commands.spawn((
        Name::new("HeadLight"),
        HeadLight,
        PointLight2d {
            color: Color::srgb(1.0, 0.9, 0.75),
            radius: 450.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));

    // Warm glow over the drop-off so it reads from a distance.
    let at = Vec2::from(tunables.collector.position);
    commands.spawn((
        Name::new("CollectorLight"),
        PointLight2d {
            color: Color::srgb(1.0, 0.8, 0.3),
            radius: 250.0,
            ..default()
        },
        Transform::from_translation(at.extend(10.0)),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_dozer_light(
    q_dozer: Query<&Transform, (With<Dozer>, Without<HeadLight>)>,
    mut q_light: Query<&mut Transform, (With<HeadLight>, Without<Dozer>)>,
) {
    let Ok(tf_dozer) = q_dozer.single() else {
        return;
    };
    let Ok(mut tf_light) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_dozer.translation.x;
    tf_light.translation.y = tf_dozer.translation.y;
}
