//! Upgrades - five purchasable tracks and the combined effects they produce
//!
//! Levels are plain counters; every derived number the rest of the
//! simulation needs (damage, blast radius, scrap multiplier, weak zone,
//! drone cadence) is computed fresh by [`Upgrades::effects`] so there is
//! no cached state to fall out of sync.

use serde::{Deserialize, Serialize};

use crate::systems::economy::Economy;

/// The purchasable upgrade tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    Damage,
    Radius,
    Multiplier,
    Drone,
    Weakness,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 5] = [
        UpgradeKind::Damage,
        UpgradeKind::Radius,
        UpgradeKind::Multiplier,
        UpgradeKind::Drone,
        UpgradeKind::Weakness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UpgradeKind::Damage => "Damage per shot",
            UpgradeKind::Radius => "Blast radius",
            UpgradeKind::Multiplier => "Scrap multiplier",
            UpgradeKind::Drone => "Auto-drone",
            UpgradeKind::Weakness => "Structural Weakness",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            UpgradeKind::Damage => "Hit harder.",
            UpgradeKind::Radius => "Larger AoE.",
            UpgradeKind::Multiplier => "More Scrap from blocks.",
            UpgradeKind::Drone => "Automated shots over time.",
            UpgradeKind::Weakness => "Extra damage at base floors.",
        }
    }

    pub fn base_cost(self) -> f64 {
        match self {
            UpgradeKind::Damage => 12.0,
            UpgradeKind::Radius => 18.0,
            UpgradeKind::Multiplier => 25.0,
            UpgradeKind::Drone => 60.0,
            UpgradeKind::Weakness => 40.0,
        }
    }

    /// Geometric cost growth per level bought.
    pub fn growth(self) -> f64 {
        match self {
            UpgradeKind::Damage => 1.5,
            UpgradeKind::Radius => 1.6,
            UpgradeKind::Multiplier => 1.62,
            UpgradeKind::Drone => 1.7,
            UpgradeKind::Weakness => 1.58,
        }
    }
}

/// Owned level counters, serialized as-is into the save profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevels {
    pub damage: u32,
    pub radius: u32,
    pub multiplier: u32,
    pub drone: u32,
    pub weakness: u32,
}

impl UpgradeLevels {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Damage => self.damage,
            UpgradeKind::Radius => self.radius,
            UpgradeKind::Multiplier => self.multiplier,
            UpgradeKind::Drone => self.drone,
            UpgradeKind::Weakness => self.weakness,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::Damage => &mut self.damage,
            UpgradeKind::Radius => &mut self.radius,
            UpgradeKind::Multiplier => &mut self.multiplier,
            UpgradeKind::Drone => &mut self.drone,
            UpgradeKind::Weakness => &mut self.weakness,
        }
    }
}

/// Snapshot of every upgrade-derived number, taken once per frame and
/// passed by reference through the damage pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeEffects {
    pub damage: f32,
    pub radius: f32,
    pub scrap_multiplier: f64,
    /// Blocks below this fraction of building height take bonus damage
    pub weakness_fraction: f32,
    pub weakness_multiplier: f32,
    /// Seconds between automated drone shots
    pub drone_interval: f32,
    pub drone_level: u32,
}

impl Default for UpgradeEffects {
    /// Effects at level zero across the board.
    fn default() -> Self {
        Self {
            damage: 0.8,
            radius: 1.0,
            scrap_multiplier: 1.0,
            weakness_fraction: 0.15,
            weakness_multiplier: 1.0,
            drone_interval: 2.0,
            drone_level: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Upgrades {
    levels: UpgradeLevels,
}

impl Upgrades {
    pub fn new(levels: UpgradeLevels) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> UpgradeLevels {
        self.levels
    }

    pub fn level(&self, kind: UpgradeKind) -> u32 {
        self.levels.level(kind)
    }

    /// Price of the next level of `kind`.
    pub fn cost(&self, kind: UpgradeKind) -> f64 {
        kind.base_cost() * kind.growth().powi(self.levels.level(kind) as i32)
    }

    /// Buy one level of `kind` if the economy can cover it.
    pub fn buy(&mut self, kind: UpgradeKind, economy: &mut Economy) -> bool {
        let cost = self.cost(kind);
        if economy.scrap() < cost {
            return false;
        }
        economy.add_scrap(-cost);
        *self.levels.level_mut(kind) += 1;
        true
    }

    pub fn effects(&self) -> UpgradeEffects {
        let l = &self.levels;
        UpgradeEffects {
            damage: 0.8 + l.damage as f32 * 0.42,
            radius: 1.0 + l.radius as f32 * 0.2,
            scrap_multiplier: 1.0 + l.multiplier as f64 * 0.2,
            weakness_fraction: (0.15 + l.weakness as f32 * 0.07).min(0.78),
            weakness_multiplier: 1.0 + l.weakness as f32 * 0.32,
            drone_interval: (2.0 - l.drone as f32 * 0.18).max(0.38),
            drone_level: l.drone,
        }
    }
}
