//! Fire-and-forget effect requests.
//!
//! Gameplay writes an `Effect` and moves on; whatever presents it (particles,
//! floating text, sound) never feeds back into the simulation. The built-in
//! consumer only logs.

use bevy::prelude::*;

use crate::common::roles::ZoneId;
use crate::plugins::economy::Upgrade;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectKind {
    GemCollected { value: u64 },
    ZoneBonus { zone: ZoneId, amount: u64 },
    Upgraded { upgrade: Upgrade, level: u32 },
    Victory,
}

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    /// World position the effect is anchored to.
    pub at: Vec2,
}

pub fn plugin(app: &mut App) {
    app.add_message::<Effect>()
        .add_systems(Update, log_effects);
}

fn log_effects(mut effects: MessageReader<Effect>) {
    for Effect { kind, at } in effects.read() {
        match kind {
            EffectKind::GemCollected { value } => debug!("fx: +{value} at {at}"),
            EffectKind::ZoneBonus { zone, amount } => {
                info!("fx: zone {} bonus +{amount}", zone.0)
            }
            EffectKind::Upgraded { upgrade, level } => {
                info!("fx: {} upgraded to level {level}", upgrade.label())
            }
            EffectKind::Victory => info!("fx: all gems collected"),
        }
    }
}
