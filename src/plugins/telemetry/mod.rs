//! Telemetry plugin: session counters and a read-only sensor snapshot.
//!
//! Nothing in here feeds back into the simulation. External drivers (a bot,
//! a playtest recorder) read `Session` and `SensorSnapshot` and write
//! `DriveIntent`, the same input a human produces.

use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::{roles::Role, state::GameState};
use crate::plugins::collector::Collector;
use crate::plugins::contacts::{Contact, ContactStarted};
use crate::plugins::dozer::Dozer;
use crate::plugins::economy::Economy;
use crate::plugins::gems::{self, GemCollected};
use crate::plugins::timestep::{RuleSet, StepCounter};

pub const NEAREST_GEMS: usize = 5;

/// One pickup. `money` is the balance at the end of that step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pickup {
    pub step: u64,
    pub value: u64,
    pub money: u64,
}

#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct Session {
    pub gems_collected: u64,
    pub collisions: u64,
    /// World units travelled by the dozer origin.
    pub distance: f32,
    pub last_position: Option<Vec2>,
    /// Simulated time, summed over fixed steps.
    pub elapsed: Duration,
    pub pickups: Vec<Pickup>,
}

impl Session {
    /// Distance over simulated time; zero before the first step.
    pub fn average_speed(&self) -> f32 {
        let secs = self.elapsed.as_secs_f32();
        if secs > 0.0 { self.distance / secs } else { 0.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GemSighting {
    /// From the dozer to the gem, world axes.
    pub offset: Vec2,
    pub value: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CollectorSighting {
    pub distance: f32,
    pub offset: Vec2,
}

#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct SensorSnapshot {
    pub money: u64,
    pub nearest_gems: Vec<GemSighting>,
    pub collector: Option<CollectorSighting>,
}

/// Builds a snapshot as seen from `dozer`. Gems come back nearest first.
pub fn snapshot(
    money: u64,
    dozer: Vec2,
    gems: impl IntoIterator<Item = (Vec2, u64)>,
    collector: Option<Vec2>,
) -> SensorSnapshot {
    let mut nearest: Vec<GemSighting> = gems
        .into_iter()
        .map(|(at, value)| GemSighting { offset: at - dozer, value })
        .collect();
    let by_distance =
        |a: &GemSighting, b: &GemSighting| a.offset.length_squared().total_cmp(&b.offset.length_squared());

    if nearest.len() > NEAREST_GEMS {
        nearest.select_nth_unstable_by(NEAREST_GEMS - 1, by_distance);
        nearest.truncate(NEAREST_GEMS);
    }
    nearest.sort_by(by_distance);

    SensorSnapshot {
        money,
        nearest_gems: nearest,
        collector: collector.map(|at| {
            let offset = at - dozer;
            CollectorSighting { distance: offset.length(), offset }
        }),
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Session>()
        .init_resource::<SensorSnapshot>()
        .add_systems(OnEnter(GameState::InGame), reset_session)
        .add_systems(
            FixedPostUpdate,
            (count_gems, count_bumps, track_distance, publish_snapshot)
                .in_set(RuleSet::Rules)
                .after(gems::collect_gems)
                .run_if(in_state(GameState::InGame)),
        );
}

fn reset_session(mut session: ResMut<Session>, mut sensors: ResMut<SensorSnapshot>) {
    *session = Session::default();
    *sensors = SensorSnapshot::default();
}

pub(crate) fn count_gems(
    mut session: ResMut<Session>,
    mut collected: MessageReader<GemCollected>,
    steps: Res<StepCounter>,
    economy: Res<Economy>,
) {
    for gem in collected.read() {
        session.gems_collected += 1;
        session.pickups.push(Pickup {
            step: steps.0,
            value: gem.value,
            money: economy.money,
        });
    }
}

pub(crate) fn count_bumps(mut session: ResMut<Session>, mut started: MessageReader<ContactStarted>) {
    session.collisions += started
        .read()
        .filter(|ContactStarted(c)| matches!(c, Contact::DozerBump { .. }))
        .count() as u64;
}

pub(crate) fn track_distance(
    time: Res<Time>,
    mut session: ResMut<Session>,
    q_dozer: Query<&Position, With<Dozer>>,
) {
    session.elapsed += time.delta();
    let Ok(pos) = q_dozer.single() else {
        return;
    };
    if let Some(last) = session.last_position {
        session.distance += pos.0.distance(last);
    }
    session.last_position = Some(pos.0);
}

pub(crate) fn publish_snapshot(
    economy: Res<Economy>,
    mut sensors: ResMut<SensorSnapshot>,
    q_dozer: Query<&Position, With<Dozer>>,
    q_gems: Query<(&Role, &Position)>,
    q_collector: Query<&Transform, With<Collector>>,
) {
    let Ok(dozer) = q_dozer.single() else {
        return;
    };
    let gems = q_gems.iter().filter_map(|(role, pos)| {
        role.gem().filter(|g| !g.collected).map(|g| (pos.0, g.value))
    });
    let collector = q_collector.single().ok().map(|tf| tf.translation.truncate());

    *sensors = snapshot(economy.money, dozer.0, gems, collector);
}
