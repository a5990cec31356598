//! Body roles.
//!
//! Every collider that gameplay cares about carries exactly one `Role`.
//! Collision handling matches on it instead of comparing names, so adding a
//! role is a compile error everywhere a match forgot about it.

use bevy::prelude::*;

use crate::plugins::economy::Upgrade;

/// Which piece of the dozer a collider is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartKind {
    Chassis,
    Plow,
    WingLeft,
    WingRight,
}

/// Gem zones are numbered from 1, nearest the spawn first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(pub u8);

impl ZoneId {
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0.saturating_sub(1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gem {
    pub value: u64,
    pub zone: ZoneId,
    /// Set on first pickup; a collected gem is never credited again.
    pub collected: bool,
}

impl Gem {
    pub fn new(value: u64, zone: ZoneId) -> Self {
        Self {
            value,
            zone,
            collected: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeltSide {
    Left,
    Right,
    Far,
}

/// A conveyor segment and the point it carries gems towards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Belt {
    pub side: BeltSide,
    pub target: Vec2,
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub enum Role {
    DozerPart(PartKind),
    Gem(Gem),
    Collector,
    Conveyor(Belt),
    Wall,
    ShopBarrier,
    ShopPad(Upgrade),
}

impl Role {
    #[inline]
    pub fn gem(&self) -> Option<&Gem> {
        match self {
            Role::Gem(gem) => Some(gem),
            _ => None,
        }
    }

    #[inline]
    pub fn gem_mut(&mut self) -> Option<&mut Gem> {
        match self {
            Role::Gem(gem) => Some(gem),
            _ => None,
        }
    }
}
