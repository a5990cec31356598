//! Tunable gameplay constants.
//!
//! Balance numbers (force curve, densities, costs) are parameters, not rules:
//! every section can be overridden from a RON file. Missing fields fall back to
//! the defaults below, so a file only needs the values it changes.

use std::{fs, path::Path};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::plugins::economy::Upgrade;

/// Environment variable naming an alternative tunables file.
pub const TUNABLES_ENV: &str = "GEM_DOZER_TUNABLES";
pub const DEFAULT_TUNABLES_PATH: &str = "tunables.ron";

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Tunables {
    pub physics: PhysicsTuning,
    pub timestep: TimestepTuning,
    pub dozer: DozerTuning,
    pub drive: DriveTuning,
    pub conveyor: ConveyorTuning,
    pub collector: CollectorTuning,
    pub shop: ShopTuning,
    pub economy: EconomyTuning,
    pub gems: GemTuning,
    pub arena: ArenaTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub pixels_per_meter: f32,
    /// Solver substeps per fixed step. High on purpose: compound bodies under
    /// large forces stay together better with more iterations.
    pub substeps: u32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self { pixels_per_meter: 20.0, substeps: 12 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestepTuning {
    pub hz: f64,
    /// Upper bound on wall-clock time fed into the accumulator per frame.
    pub max_frame_secs: f64,
}

impl Default for TimestepTuning {
    fn default() -> Self {
        Self { hz: 60.0, max_frame_secs: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DozerTuning {
    pub chassis_size: f32,
    pub scale_per_level: f32,
    pub plow_base_width: f32,
    pub plow_width_per_level: f32,
    pub plow_width_factor: f32,
    pub plow_depth: f32,
    /// Distance from chassis centre to plow centre, along the forward axis.
    pub plow_offset: f32,
    pub wing_min_plow_level: u32,
    pub wing_length: f32,
    pub wing_width: f32,
    pub wing_scale_per_level: f32,
    /// Flare away from the forward axis, radians.
    pub wing_flare: f32,
    pub wing_overlap: f32,
    pub base_density: f32,
    pub density_per_level: f32,
    pub linear_damping: f32,
    pub friction: f32,
}

impl Default for DozerTuning {
    fn default() -> Self {
        Self {
            chassis_size: 45.0,
            scale_per_level: 0.15,
            plow_base_width: 26.0,
            plow_width_per_level: 14.0,
            plow_width_factor: 1.5,
            plow_depth: 22.0,
            plow_offset: 42.0,
            wing_min_plow_level: 3,
            wing_length: 40.0,
            wing_width: 15.0,
            wing_scale_per_level: 0.1,
            wing_flare: std::f32::consts::FRAC_PI_8,
            wing_overlap: 10.0,
            base_density: 0.002,
            density_per_level: 0.0001,
            linear_damping: 1.5,
            friction: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveTuning {
    /// Force at level 0 of the growth curve; level N gets `base * growth^N`.
    pub base_force: f32,
    pub force_growth: f32,
    /// Force change per level of engine/plow difference.
    pub load_factor_step: f32,
    /// The engine/plow level difference is clamped to +/- this many levels.
    pub load_factor_range: i32,
    /// rad/s at full turn input.
    pub turn_speed: f32,
    /// Angular velocity multiplier per step while not steering.
    pub spin_damping: f32,
    /// Fraction of sideways velocity removed per step.
    pub lateral_damping: f32,
    pub stick_deadzone: f32,
    pub steer_gain: f32,
    pub reverse_threshold: f32,
    pub forward_threshold: f32,
}

impl Default for DriveTuning {
    fn default() -> Self {
        Self {
            base_force: 4000.0,
            force_growth: 1.6,
            load_factor_step: 0.1,
            load_factor_range: 2,
            turn_speed: 2.4,
            spin_damping: 0.8,
            lateral_damping: 0.15,
            stick_deadzone: 0.1,
            steer_gain: 2.0,
            reverse_threshold: 3.0 * std::f32::consts::FRAC_PI_4,
            forward_threshold: std::f32::consts::FRAC_PI_2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConveyorTuning {
    /// px/s
    pub target_speed: f32,
    /// Share of the gap to the belt velocity closed per step.
    pub blend: f32,
}

impl Default for ConveyorTuning {
    fn default() -> Self {
        Self { target_speed: 180.0, blend: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorTuning {
    pub position: [f32; 2],
    pub base_size: f32,
    pub size_per_level: f32,
    pub belt_min_level: u32,
    pub belt_base_length: f32,
    pub belt_length_per_level: f32,
    pub belt_max_length: f32,
    pub belt_base_width: f32,
    /// Belts widen by this much every second level.
    pub belt_width_step: f32,
    pub far_belt_min_level: u32,
}

impl Default for CollectorTuning {
    fn default() -> Self {
        Self {
            position: [0.0, -400.0],
            base_size: 60.0,
            size_per_level: 10.0,
            belt_min_level: 2,
            belt_base_length: 50.0,
            belt_length_per_level: 50.0,
            belt_max_length: 500.0,
            belt_base_width: 60.0,
            belt_width_step: 20.0,
            far_belt_min_level: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadPlacement {
    pub upgrade: Upgrade,
    pub position: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopTuning {
    pub cooldown_secs: f32,
    pub pad_size: [f32; 2],
    pub pads: Vec<PadPlacement>,
    pub barrier_position: [f32; 2],
    pub barrier_size: [f32; 2],
}

impl Default for ShopTuning {
    fn default() -> Self {
        let pad = |upgrade, x, y| PadPlacement {
            upgrade,
            position: [x, y],
        };
        Self {
            cooldown_secs: 2.0,
            pad_size: [180.0, 120.0],
            pads: vec![
                pad(Upgrade::Dozer, -900.0, 0.0),
                pad(Upgrade::Plow, -900.0, -200.0),
                pad(Upgrade::Collector, -900.0, -400.0),
                pad(Upgrade::Area, -900.0, 200.0),
            ],
            barrier_position: [-600.0, -100.0],
            barrier_size: [20.0, 1000.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    pub starting_money: u64,
    pub dozer_cost: u64,
    pub plow_cost: u64,
    pub collector_cost: u64,
    /// Cost multiplier applied after each dozer/plow/collector purchase.
    pub cost_growth: f64,
    /// Cap for dozer/plow/collector levels; `None` means uncapped.
    pub max_level: Option<u32>,
    /// Price of each area level in order; the area is maxed past the end.
    pub area_costs: Vec<u64>,
    pub zone_bonus: u64,
    /// Share of a zone's gems that must be collected for its bonus.
    pub bonus_fraction: f32,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            starting_money: 0,
            dozer_cost: 100,
            plow_cost: 100,
            collector_cost: 150,
            cost_growth: 1.5,
            max_level: None,
            area_costs: vec![500, 2000],
            zone_bonus: 500,
            bonus_fraction: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpawn {
    pub zone: u8,
    pub count: u32,
    pub x: [f32; 2],
    pub y: [f32; 2],
    /// Half-open value range.
    pub value: [u64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GemTuning {
    pub seed: u64,
    pub radius: [f32; 2],
    pub density: f32,
    pub restitution: f32,
    pub linear_damping: f32,
    pub zones: Vec<ZoneSpawn>,
}

impl Default for GemTuning {
    fn default() -> Self {
        Self {
            seed: 0x6E3D_0A5E,
            radius: [8.0, 12.0],
            density: 0.001,
            restitution: 0.5,
            linear_damping: 1.2,
            zones: vec![
                ZoneSpawn {
                    zone: 1,
                    count: 400,
                    x: [-500.0, 500.0],
                    y: [-500.0, 500.0],
                    value: [8, 12],
                },
                ZoneSpawn {
                    zone: 2,
                    count: 400,
                    x: [-500.0, 500.0],
                    y: [700.0, 1700.0],
                    value: [25, 40],
                },
                ZoneSpawn {
                    zone: 3,
                    count: 400,
                    x: [-500.0, 500.0],
                    y: [1900.0, 2900.0],
                    value: [100, 200],
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateTuning {
    pub y: f32,
    pub opens_at_area: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub min: [f32; 2],
    pub max: [f32; 2],
    pub wall_thickness: f32,
    pub gates: Vec<GateTuning>,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            min: [-1200.0, -800.0],
            max: [1200.0, 3200.0],
            wall_thickness: 30.0,
            gates: vec![
                GateTuning { y: 600.0, opens_at_area: 2 },
                GateTuning { y: 1800.0, opens_at_area: 3 },
            ],
        }
    }
}

impl Tunables {
    pub fn from_ron_str(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read tunables: {e}"))?;
        Self::from_ron_str(&data)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(t) => (t, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load from `$GEM_DOZER_TUNABLES` or `tunables.ron`, logging anything odd.
    pub fn load_from_env() -> Self {
        let path = std::env::var(TUNABLES_ENV).unwrap_or_else(|_| DEFAULT_TUNABLES_PATH.into());
        let (tunables, err) = Self::load_or_default(&path);
        match err {
            Some(e) => warn!("tunables: using defaults ({path}: {e})"),
            None => info!("tunables: loaded {path}"),
        }
        for w in tunables.validate() {
            warn!("tunables: {w}");
        }
        tunables
    }

    /// Human-readable warnings for values that will misbehave at runtime.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();

        if self.timestep.hz <= 0.0 {
            w.push(format!("timestep.hz must be > 0 (got {})", self.timestep.hz));
        } else if self.timestep.max_frame_secs < 1.0 / self.timestep.hz {
            w.push(format!(
                "timestep.max_frame_secs {} is shorter than one step; the simulation will run slow",
                self.timestep.max_frame_secs
            ));
        }
        if self.physics.substeps == 0 {
            w.push("physics.substeps is 0".into());
        }

        let d = &self.drive;
        if !(0.0..=1.0).contains(&d.lateral_damping) {
            w.push(format!("drive.lateral_damping {} outside [0, 1]", d.lateral_damping));
        }
        if !(0.0..=1.0).contains(&d.spin_damping) {
            w.push(format!("drive.spin_damping {} outside [0, 1]", d.spin_damping));
        }
        if d.force_growth <= 1.0 {
            w.push(format!(
                "drive.force_growth {} <= 1; engine upgrades will not outpace added mass",
                d.force_growth
            ));
        }
        if d.forward_threshold >= d.reverse_threshold {
            w.push(format!(
                "drive.forward_threshold {} must be below reverse_threshold {} for hysteresis",
                d.forward_threshold, d.reverse_threshold
            ));
        }

        if self.dozer.base_density <= 0.0 {
            w.push("dozer.base_density must be > 0".into());
        }
        if !(0.0..=1.0).contains(&self.conveyor.blend) || self.conveyor.blend == 0.0 {
            w.push(format!("conveyor.blend {} outside (0, 1]", self.conveyor.blend));
        }
        for upgrade in Upgrade::ALL {
            if !self.shop.pads.iter().any(|p| p.upgrade == upgrade) {
                w.push(format!("shop.pads has no {} pad; it can never be bought", upgrade.label()));
            }
        }
        if self.shop.cooldown_secs < 0.0 {
            w.push(format!("shop.cooldown_secs {} negative", self.shop.cooldown_secs));
        }
        if self.economy.cost_growth < 1.0 {
            w.push(format!("economy.cost_growth {} < 1; upgrades get cheaper", self.economy.cost_growth));
        }

        if self.gems.radius[0] <= 0.0 || self.gems.radius[0] > self.gems.radius[1] {
            w.push(format!("gems.radius range {:?} invalid", self.gems.radius));
        }
        for z in &self.gems.zones {
            if z.zone == 0 {
                w.push("gems.zones: zone ids start at 1".into());
            }
            if z.x[0] > z.x[1] || z.y[0] > z.y[1] {
                w.push(format!("gems.zones[{}]: inverted spawn rectangle", z.zone));
            }
            if z.value[0] >= z.value[1] {
                w.push(format!("gems.zones[{}]: value range {:?} is empty", z.zone, z.value));
            }
        }
        w
    }
}
