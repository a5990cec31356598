//! Rigid assemblies: a parent pose plus parts frozen at fixed local offsets.
//!
//! The physics engine is trusted with the parent's motion only. Each part's
//! pose is re-derived from the parent every step:
//!
//! ```text
//! part.position = parent.position + rotate(offset, parent.angle)
//! part.angle    = parent.angle + angle_offset
//! ```
//!
//! This module knows nothing about ECS or avian so it can be tested alone.

use bevy::math::Vec2;

/// 2D position and heading (radians, counter-clockwise).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub angle: f32,
}

impl Pose {
    #[inline]
    pub const fn new(position: Vec2, angle: f32) -> Self {
        Self { position, angle }
    }

    /// Compose a local pose onto this one.
    #[inline]
    pub fn transform(&self, local: Pose) -> Pose {
        Pose {
            position: self.position + Vec2::from_angle(self.angle).rotate(local.position),
            angle: self.angle + local.angle,
        }
    }

    /// Express `world` in this pose's frame.
    #[inline]
    pub fn inverse_transform(&self, world: Pose) -> Pose {
        Pose {
            position: Vec2::from_angle(-self.angle).rotate(world.position - self.position),
            angle: world.angle - self.angle,
        }
    }
}

/// A part's pose relative to its parent, captured once at assembly time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrozenPart<K> {
    pub key: K,
    pub local: Pose,
}

/// Parts of one compound body and their frozen offsets.
#[derive(Clone, Debug, PartialEq)]
pub struct RigidAssembly<K> {
    parts: Vec<FrozenPart<K>>,
}

impl<K> Default for RigidAssembly<K> {
    fn default() -> Self {
        Self { parts: Vec::new() }
    }
}

impl<K: Copy + PartialEq> RigidAssembly<K> {
    /// Freeze parts from their world poses while the assembly is undeformed.
    pub fn freeze(parent: Pose, parts: impl IntoIterator<Item = (K, Pose)>) -> Self {
        Self {
            parts: parts
                .into_iter()
                .map(|(key, world)| FrozenPart {
                    key,
                    local: parent.inverse_transform(world),
                })
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn parts(&self) -> impl Iterator<Item = &FrozenPart<K>> {
        self.parts.iter()
    }

    pub fn local(&self, key: K) -> Option<Pose> {
        self.parts.iter().find(|p| p.key == key).map(|p| p.local)
    }

    /// Where every part must be for the given parent pose.
    pub fn reproject(&self, parent: Pose) -> impl Iterator<Item = (K, Pose)> + '_ {
        self.parts.iter().map(move |p| (p.key, parent.transform(p.local)))
    }

    /// Largest positional error of the supplied part poses. Unknown keys are ignored.
    pub fn max_drift(&self, parent: Pose, actual: impl IntoIterator<Item = (K, Pose)>) -> f32 {
        actual
            .into_iter()
            .filter_map(|(key, pose)| {
                self.local(key)
                    .map(|local| parent.transform(local).position.distance(pose.position))
            })
            .fold(0.0, f32::max)
    }
}
