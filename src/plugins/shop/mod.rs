//! Shop plugin: upgrade pads and the fence that keeps gems out of the shop.
//!
//! Purchases are not collision driven. Every step the dozer's centre point is
//! tested against each pad's rectangle, so brushing a pad with the plow does
//! nothing; only parking on it does. One cooldown is shared by all pads and is
//! measured on the fixed clock.

use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{
    layers::{shop_barrier_layers, shop_pad_layers},
    roles::Role,
    state::GameState,
    tunables::Tunables,
};
use crate::plugins::dozer::Dozer;
use crate::plugins::economy::{Economy, Purchase, Upgrade, Upgraded};
use crate::plugins::fx::{Effect, EffectKind};
use crate::plugins::timestep::SimSet;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ShopPad {
    pub upgrade: Upgrade,
    pub size: Vec2,
}

/// Fixed-clock time of the last successful purchase.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopCooldown {
    pub last_purchase: Option<Duration>,
}

impl ShopCooldown {
    pub fn ready(&self, now: Duration, cooldown: Duration) -> bool {
        self.last_purchase
            .is_none_or(|last| now.saturating_sub(last) >= cooldown)
    }
}

/// Closed axis-aligned rectangle test.
#[inline]
pub fn pad_contains(pad_center: Vec2, pad_size: Vec2, point: Vec2) -> bool {
    let d = (point - pad_center).abs();
    d.x <= pad_size.x * 0.5 && d.y <= pad_size.y * 0.5
}

fn pad_color(upgrade: Upgrade) -> Color {
    match upgrade {
        Upgrade::Dozer => Color::srgba(0.9, 0.5, 0.1, 0.5),
        Upgrade::Plow => Color::srgba(0.5, 0.5, 0.9, 0.5),
        Upgrade::Collector => Color::srgba(0.9, 0.8, 0.2, 0.5),
        Upgrade::Area => Color::srgba(0.3, 0.9, 0.5, 0.5),
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<ShopCooldown>()
        .add_systems(OnEnter(GameState::InGame), spawn_shop)
        .add_systems(
            FixedUpdate,
            check_shop_pads
                .in_set(SimSet::Shop)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_shop(mut commands: Commands, tunables: Res<Tunables>, mut cooldown: ResMut<ShopCooldown>) {
    let t = &tunables.shop;
    let size = Vec2::from(t.pad_size);
    *cooldown = ShopCooldown::default();

    for pad in &t.pads {
        commands.spawn((
            Name::new(format!("ShopPad{}", pad.upgrade.label())),
            ShopPad { upgrade: pad.upgrade, size },
            Role::ShopPad(pad.upgrade),
            Sprite::from_color(pad_color(pad.upgrade), size),
            Transform::from_translation(Vec2::from(pad.position).extend(0.2)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            Sensor,
            shop_pad_layers(),
            DespawnOnExit(GameState::InGame),
        ));
    }

    let barrier = Vec2::from(t.barrier_size);
    commands.spawn((
        Name::new("ShopBarrier"),
        Role::ShopBarrier,
        Sprite::from_color(Color::srgba(0.6, 0.6, 0.7, 0.35), barrier),
        Transform::from_translation(Vec2::from(t.barrier_position).extend(0.1)),
        RigidBody::Static,
        Collider::rectangle(barrier.x, barrier.y),
        shop_barrier_layers(),
        DespawnOnExit(GameState::InGame),
    ));
}

pub(crate) fn check_shop_pads(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut cooldown: ResMut<ShopCooldown>,
    mut economy: ResMut<Economy>,
    q_dozer: Query<&Position, With<Dozer>>,
    q_pads: Query<(&ShopPad, &Transform)>,
    mut upgraded: MessageWriter<Upgraded>,
    mut effects: MessageWriter<Effect>,
) {
    let now = time.elapsed();
    if !cooldown.ready(now, Duration::from_secs_f32(tunables.shop.cooldown_secs.max(0.0))) {
        return;
    }
    let Ok(dozer) = q_dozer.single() else {
        return;
    };

    let Some((pad, at)) = q_pads
        .iter()
        .map(|(pad, tf)| (pad, tf.translation.truncate()))
        .find(|(pad, at)| pad_contains(*at, pad.size, dozer.0))
    else {
        return;
    };

    // Unaffordable and maxed pads stay quiet; the pad just does nothing.
    let Purchase::Purchased { level, cost } = economy.purchase(pad.upgrade) else {
        return;
    };
    cooldown.last_purchase = Some(now);

    info!(
        "shop: bought {} level {level} for {cost}, {} left",
        pad.upgrade.label(),
        economy.money
    );
    upgraded.write(Upgraded { upgrade: pad.upgrade, level });
    effects.write(Effect {
        kind: EffectKind::Upgraded { upgrade: pad.upgrade, level },
        at,
    });
}
