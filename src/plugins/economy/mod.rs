//! Economy plugin: money, upgrade levels, escalating costs, zone progress.
//!
//! Only two kinds of event ever change this state: a gem being collected and
//! a shop purchase going through. Everything else (dozer geometry, drive
//! force, collector size) reads levels from here.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::roles::ZoneId;
use crate::common::tunables::{EconomyTuning, Tunables};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Upgrade {
    /// Engine: chassis size, density and drive force.
    Dozer,
    Plow,
    Collector,
    Area,
}

impl Upgrade {
    pub const ALL: [Upgrade; 4] = [Upgrade::Dozer, Upgrade::Plow, Upgrade::Collector, Upgrade::Area];

    pub fn label(self) -> &'static str {
        match self {
            Upgrade::Dozer => "Engine",
            Upgrade::Plow => "Plow",
            Upgrade::Collector => "Collector",
            Upgrade::Area => "Area",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Levels {
    pub dozer: u32,
    pub plow: u32,
    pub collector: u32,
    pub area: u32,
}

impl Default for Levels {
    fn default() -> Self {
        Self { dozer: 1, plow: 1, collector: 1, area: 1 }
    }
}

impl Levels {
    pub fn get(&self, upgrade: Upgrade) -> u32 {
        match upgrade {
            Upgrade::Dozer => self.dozer,
            Upgrade::Plow => self.plow,
            Upgrade::Collector => self.collector,
            Upgrade::Area => self.area,
        }
    }

    fn get_mut(&mut self, upgrade: Upgrade) -> &mut u32 {
        match upgrade {
            Upgrade::Dozer => &mut self.dozer,
            Upgrade::Plow => &mut self.plow,
            Upgrade::Collector => &mut self.collector,
            Upgrade::Area => &mut self.area,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZoneProgress {
    pub total: u32,
    pub collected: u32,
    pub bonus_awarded: bool,
}

/// Written after a purchase goes through; rebuild systems react to it.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Upgraded {
    pub upgrade: Upgrade,
    pub level: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Purchase {
    Purchased { level: u32, cost: u64 },
    Unaffordable { cost: u64 },
    Maxed,
}

#[derive(Resource, Debug, Clone)]
pub struct Economy {
    pub money: u64,
    pub levels: Levels,
    dozer_cost: u64,
    plow_cost: u64,
    collector_cost: u64,
    zones: Vec<ZoneProgress>,
    pub victory: bool,
    rules: EconomyTuning,
}

impl Economy {
    pub fn new(rules: &EconomyTuning) -> Self {
        Self {
            money: rules.starting_money,
            levels: Levels::default(),
            dozer_cost: rules.dozer_cost,
            plow_cost: rules.plow_cost,
            collector_cost: rules.collector_cost,
            zones: Vec::new(),
            victory: false,
            rules: rules.clone(),
        }
    }

    #[inline]
    pub fn level(&self, upgrade: Upgrade) -> u32 {
        self.levels.get(upgrade)
    }

    /// Current price, or `None` once the upgrade is at its cap.
    pub fn cost_of(&self, upgrade: Upgrade) -> Option<u64> {
        let level = self.level(upgrade);
        match upgrade {
            Upgrade::Area => self.rules.area_costs.get(level as usize - 1).copied(),
            _ if self.rules.max_level.is_some_and(|max| level >= max) => None,
            Upgrade::Dozer => Some(self.dozer_cost),
            Upgrade::Plow => Some(self.plow_cost),
            Upgrade::Collector => Some(self.collector_cost),
        }
    }

    /// Debit, level up and escalate the price. No-op unless affordable.
    pub fn purchase(&mut self, upgrade: Upgrade) -> Purchase {
        let Some(cost) = self.cost_of(upgrade) else {
            return Purchase::Maxed;
        };
        if self.money < cost {
            return Purchase::Unaffordable { cost };
        }

        self.money -= cost;
        let level = self.levels.get_mut(upgrade);
        *level += 1;
        let level = *level;

        let growth = self.rules.cost_growth;
        let escalate = |c: &mut u64| *c = (*c as f64 * growth).floor() as u64;
        match upgrade {
            Upgrade::Dozer => escalate(&mut self.dozer_cost),
            Upgrade::Plow => escalate(&mut self.plow_cost),
            Upgrade::Collector => escalate(&mut self.collector_cost),
            // Area prices come from the table, indexed by level.
            Upgrade::Area => {}
        }

        Purchase::Purchased { level, cost }
    }

    #[inline]
    pub fn credit(&mut self, amount: u64) {
        self.money = self.money.saturating_add(amount);
    }

    pub fn zone(&self, zone: ZoneId) -> ZoneProgress {
        self.zones.get(zone.index()).copied().unwrap_or_default()
    }

    fn zone_mut(&mut self, zone: ZoneId) -> &mut ZoneProgress {
        let i = zone.index();
        if self.zones.len() <= i {
            self.zones.resize(i + 1, ZoneProgress::default());
        }
        &mut self.zones[i]
    }

    pub fn reset_zones(&mut self) {
        self.zones.clear();
        self.victory = false;
    }

    pub fn register_gems(&mut self, zone: ZoneId, count: u32) {
        self.zone_mut(zone).total += count;
    }

    /// Count one collected gem. Returns the zone bonus if this gem earned it;
    /// the bonus is already credited.
    pub fn record_gem(&mut self, zone: ZoneId) -> Option<u64> {
        let fraction = self.rules.bonus_fraction;
        let bonus = self.rules.zone_bonus * u64::from(zone.0);

        let p = self.zone_mut(zone);
        p.collected += 1;
        if p.bonus_awarded || p.total == 0 || (p.collected as f32) < p.total as f32 * fraction {
            return None;
        }
        p.bonus_awarded = true;

        self.credit(bonus);
        Some(bonus)
    }
}

pub fn plugin(app: &mut App) {
    let rules = app.world().resource::<Tunables>().economy.clone();
    app.insert_resource(Economy::new(&rules))
        .add_message::<Upgraded>();
}

#[cfg(test)]
mod tests;
