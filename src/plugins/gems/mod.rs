//! Gems plugin: seeded batch spawn per zone and pickup at the collector.
//!
//! Pickup runs on `Contact::GemCollector` starts. The gem's `collected` flag
//! flips the first time and every later contact for it (same step or not) is
//! ignored, so a gem pays out exactly once. The entity is despawned with the
//! step's commands, before avian can see it again.

use std::ops::Range;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::common::{
    layers::gem_layers,
    roles::{Gem, Role, ZoneId},
    state::GameState,
    tunables::{GemTuning, Tunables},
};
use crate::plugins::contacts::{Contact, ContactStarted};
use crate::plugins::economy::Economy;
use crate::plugins::fx::{Effect, EffectKind};
use crate::plugins::timestep::RuleSet;

const GEM_Z: f32 = 2.0;

/// A gem was credited this step.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct GemCollected {
    pub gem: Entity,
    pub value: u64,
    pub zone: ZoneId,
}

pub fn plugin(app: &mut App) {
    app.add_message::<GemCollected>()
        .add_systems(OnEnter(GameState::InGame), spawn_gems)
        .add_systems(
            FixedPostUpdate,
            collect_gems
                .in_set(RuleSet::Rules)
                .run_if(in_state(GameState::InGame)),
        );
}

fn zone_color(zone: ZoneId) -> Color {
    match zone.0 {
        1 => Color::srgb(0.3, 0.85, 1.0),
        2 => Color::srgb(0.4, 1.0, 0.45),
        3 => Color::srgb(1.0, 0.35, 0.85),
        _ => Color::WHITE,
    }
}

/// Uniform sample that tolerates empty ranges by returning the start.
fn sample_f32(rng: &mut Pcg32, [lo, hi]: [f32; 2]) -> f32 {
    if lo < hi { rng.random_range(lo..hi) } else { lo }
}

fn sample_u64(rng: &mut Pcg32, range: Range<u64>) -> u64 {
    if range.is_empty() { range.start } else { rng.random_range(range) }
}

/// Spawn one gem body.
pub fn spawn_gem(commands: &mut Commands, t: &GemTuning, at: Vec2, radius: f32, gem: Gem) -> Entity {
    commands
        .spawn((
            Name::new("Gem"),
            Role::Gem(gem),
            Sprite::from_color(zone_color(gem.zone), Vec2::splat(radius * 2.0)),
            Transform::from_translation(at.extend(GEM_Z)),
            RigidBody::Dynamic,
            Collider::circle(radius),
            ColliderDensity(t.density),
            Restitution::new(t.restitution),
            Friction::ZERO,
            LinearDamping(t.linear_damping),
            gem_layers(),
            CollisionEventsEnabled,
            TranslationInterpolation,
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

fn spawn_gems(mut commands: Commands, tunables: Res<Tunables>, mut economy: ResMut<Economy>) {
    let t = &tunables.gems;
    let mut rng = Pcg32::seed_from_u64(t.seed);

    economy.reset_zones();
    for spawn in &t.zones {
        let zone = ZoneId(spawn.zone);
        economy.register_gems(zone, spawn.count);

        for _ in 0..spawn.count {
            let at = Vec2::new(sample_f32(&mut rng, spawn.x), sample_f32(&mut rng, spawn.y));
            let radius = sample_f32(&mut rng, t.radius);
            let value = sample_u64(&mut rng, spawn.value[0]..spawn.value[1]);
            spawn_gem(&mut commands, t, at, radius, Gem::new(value, zone));
        }
    }

    info!(
        "gems: spawned {} across {} zones (seed {:#x})",
        t.zones.iter().map(|z| z.count).sum::<u32>(),
        t.zones.len(),
        t.seed
    );
}

pub(crate) fn collect_gems(
    mut commands: Commands,
    mut contacts: MessageReader<ContactStarted>,
    mut economy: ResMut<Economy>,
    mut q_roles: Query<(&mut Role, &Transform, Option<&Position>)>,
    mut collected: MessageWriter<GemCollected>,
    mut effects: MessageWriter<Effect>,
) {
    let mut any = false;

    for ContactStarted(contact) in contacts.read() {
        let Contact::GemCollector { gem: entity, .. } = *contact else {
            continue;
        };
        let Ok((mut role, tf, pos)) = q_roles.get_mut(entity) else {
            debug!("gems: pickup for missing gem {entity:?}");
            continue;
        };
        let Some(gem) = role.gem_mut() else {
            continue;
        };
        if gem.collected {
            continue;
        }
        gem.collected = true;
        let gem = *gem;
        let at = pos.map_or(tf.translation.truncate(), |p| p.0);

        economy.credit(gem.value);
        collected.write(GemCollected { gem: entity, value: gem.value, zone: gem.zone });
        effects.write(Effect { kind: EffectKind::GemCollected { value: gem.value }, at });

        if let Some(amount) = economy.record_gem(gem.zone) {
            info!("gems: zone {} bonus +{amount}", gem.zone.0);
            effects.write(Effect { kind: EffectKind::ZoneBonus { zone: gem.zone, amount }, at });
        }

        commands.entity(entity).despawn();
        any = true;
    }

    if !any || economy.victory {
        return;
    }
    let remaining = q_roles
        .iter()
        .filter(|(role, ..)| role.gem().is_some_and(|g| !g.collected))
        .count();
    if remaining == 0 {
        economy.victory = true;
        info!("gems: all collected, money {}", economy.money);
        effects.write(Effect { kind: EffectKind::Victory, at: Vec2::ZERO });
    }
}

#[cfg(test)]
mod tests;
