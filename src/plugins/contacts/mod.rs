//! Contact dispatch.
//!
//! Avian reports raw collider pairs. This plugin classifies each pair exactly
//! once, by the `Role` of both colliders, and hands the result to the rules:
//!
//! ```text
//! FixedPostUpdate
//!   avian: CollisionStart / CollisionEnd
//!     |
//!     v
//!   dispatch_contacts (RuleSet::Contacts)
//!     - ContactStarted messages  -> gem pickup, telemetry
//!     - ConveyorOverlaps set     -> conveyor transport, every step while overlapping
//! ```
//!
//! Pairs involving an entity without a `Role` (or one that is already gone)
//! are simply not interactions.

use std::collections::BTreeSet;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::roles::Role;
use crate::plugins::timestep::RuleSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    GemCollector { gem: Entity, collector: Entity },
    GemConveyor { gem: Entity, belt: Entity },
    /// A dozer part touched something solid.
    DozerBump { part: Entity, other: Entity },
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactStarted(pub Contact);

/// Gem/belt pairs currently overlapping, in a stable order.
#[derive(Resource, Default, Debug)]
pub struct ConveyorOverlaps(BTreeSet<(Entity, Entity)>);

impl ConveyorOverlaps {
    pub fn insert(&mut self, gem: Entity, belt: Entity) -> bool {
        self.0.insert((gem, belt))
    }

    pub fn remove(&mut self, gem: Entity, belt: Entity) -> bool {
        self.0.remove(&(gem, belt))
    }

    /// `(gem, belt)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, Entity)> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(Entity, Entity) -> bool) {
        self.0.retain(|&(gem, belt)| keep(gem, belt));
    }
}

/// Classify a pair in either order.
pub fn classify(a: (Entity, &Role), b: (Entity, &Role)) -> Option<Contact> {
    one_way(a, b).or_else(|| one_way(b, a))
}

fn one_way((ea, ra): (Entity, &Role), (eb, rb): (Entity, &Role)) -> Option<Contact> {
    match (ra, rb) {
        (Role::Gem(_), Role::Collector) => Some(Contact::GemCollector { gem: ea, collector: eb }),
        (Role::Gem(_), Role::Conveyor(_)) => Some(Contact::GemConveyor { gem: ea, belt: eb }),
        (Role::DozerPart(_), Role::DozerPart(_)) => None,
        (Role::DozerPart(_), Role::Gem(_) | Role::Wall | Role::ShopBarrier) => {
            Some(Contact::DozerBump { part: ea, other: eb })
        }
        _ => None,
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<ConveyorOverlaps>()
        .add_message::<ContactStarted>()
        .add_systems(FixedPostUpdate, dispatch_contacts.in_set(RuleSet::Contacts));
}

pub(crate) fn dispatch_contacts(
    mut started: MessageReader<CollisionStart>,
    mut ended: MessageReader<CollisionEnd>,
    q_roles: Query<&Role>,
    mut overlaps: ResMut<ConveyorOverlaps>,
    mut out: MessageWriter<ContactStarted>,
) {
    let resolve = |a: Entity, b: Entity| {
        let (Ok(ra), Ok(rb)) = (q_roles.get(a), q_roles.get(b)) else {
            return None;
        };
        classify((a, ra), (b, rb))
    };

    for ev in started.read() {
        let Some(contact) = resolve(ev.collider1, ev.collider2) else {
            continue;
        };
        if let Contact::GemConveyor { gem, belt } = contact {
            overlaps.insert(gem, belt);
        }
        out.write(ContactStarted(contact));
    }

    for ev in ended.read() {
        if let Some(Contact::GemConveyor { gem, belt }) = resolve(ev.collider1, ev.collider2) {
            overlaps.remove(gem, belt);
        }
    }

    // Despawned gems and rebuilt belts never send a usable end event.
    if !overlaps.is_empty() {
        overlaps.retain(|gem, belt| q_roles.contains(gem) && q_roles.contains(belt));
    }
}
