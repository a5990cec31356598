//! Dozer part layout as a pure function of upgrade levels.
//!
//! Body frame: y-up, plow in front along +Y, chassis centred on the origin.

use std::f32::consts::FRAC_PI_2;

use bevy::math::Vec2;

use super::rigid::Pose;
use crate::common::roles::PartKind;
use crate::common::tunables::DozerTuning;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartSpec {
    pub kind: PartKind,
    /// Full width (local x before rotation) and height.
    pub size: Vec2,
    pub local: Pose,
}

impl PartSpec {
    #[inline]
    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DozerLayout {
    pub scale: f32,
    pub density: f32,
    pub parts: Vec<PartSpec>,
}

impl DozerLayout {
    pub fn build(dozer_level: u32, plow_level: u32, t: &DozerTuning) -> Self {
        let scale = 1.0 + (dozer_level.max(1) - 1) as f32 * t.scale_per_level;

        let chassis = t.chassis_size * scale;
        let plow_width =
            (t.plow_base_width + t.plow_width_per_level * plow_level as f32) * t.plow_width_factor * scale;
        let plow_depth = t.plow_depth * scale;
        let plow_y = t.plow_offset * scale;

        let mut parts = vec![
            PartSpec {
                kind: PartKind::Chassis,
                size: Vec2::splat(chassis),
                local: Pose::default(),
            },
            PartSpec {
                kind: PartKind::Plow,
                size: Vec2::new(plow_width, plow_depth),
                local: Pose::new(Vec2::new(0.0, plow_y), 0.0),
            },
        ];

        if plow_level >= t.wing_min_plow_level {
            let k = 1.0 + (plow_level - t.wing_min_plow_level) as f32 * t.wing_scale_per_level;
            let length = t.wing_length * k * scale;
            let width = t.wing_width * k * scale;
            let overlap = t.wing_overlap * scale;

            // Wing long axis points forward and outward; the inner end sits
            // on the plow edge, pulled in by `overlap` so there is no seam.
            let wing = |kind, edge_x: f32, angle: f32| PartSpec {
                kind,
                size: Vec2::new(length, width),
                local: Pose::new(
                    Vec2::new(edge_x, plow_y) + Vec2::from_angle(angle) * (length * 0.5),
                    angle,
                ),
            };
            parts.push(wing(
                PartKind::WingLeft,
                -plow_width * 0.5 + overlap,
                FRAC_PI_2 + t.wing_flare,
            ));
            parts.push(wing(
                PartKind::WingRight,
                plow_width * 0.5 - overlap,
                FRAC_PI_2 - t.wing_flare,
            ));
        }

        Self {
            scale,
            density: t.base_density + t.density_per_level * dozer_level as f32,
            parts,
        }
    }

    /// Total mass the drive controller divides force by.
    pub fn mass(&self) -> f32 {
        self.parts.iter().map(PartSpec::area).sum::<f32>() * self.density
    }

    pub fn part(&self, kind: PartKind) -> Option<&PartSpec> {
        self.parts.iter().find(|p| p.kind == kind)
    }

    pub fn has_wings(&self) -> bool {
        self.part(PartKind::WingLeft).is_some()
    }
}
