//! Demolition Tuning
//!
//! Centralized gameplay constants for the demolition simulation. Every
//! number that shapes pacing lives here so systems never carry magic
//! values.

/// Central tuning for building durability, collapse pacing, and scrap payouts.
///
/// `Default` returns the shipped balance. Tests override individual fields
/// (e.g. pinning the block HP range) to make outcomes deterministic.
#[derive(Clone, Debug)]
pub struct DemolitionTuning {
    /// Upper clamp on a single frame step (seconds); guards against huge
    /// integration jumps after a stall
    pub max_frame_dt: f32,
    /// Delay between a finished collapse and the tier-up rebuild (seconds)
    pub respawn_delay: f32,
    /// Dead-block fraction at which a building starts collapsing
    pub collapse_threshold: f32,
    /// Randomized collapse animation duration, lower bound (seconds)
    pub collapse_duration_min: f32,
    /// Randomized collapse animation duration, upper bound (seconds)
    pub collapse_duration_max: f32,
    /// Scrap paid for one destroyed tier-1 block before multipliers
    pub base_block_value: f64,
    /// Per-tier geometric growth of block value
    pub tier_value_scale: f64,
    /// Cap on the tier value multiplier
    pub tier_value_cap: f64,
    /// Fraction of remaining block value paid out as the collapse bonus
    pub collapse_bonus_factor: f64,
    /// Per-tier geometric growth of block hit points
    pub tier_hp_scale: f32,
    /// Cap on the tier HP multiplier
    pub tier_hp_cap: f32,
    /// Base block hit points, lower bound of the per-build roll
    pub block_hp_min: f32,
    /// Base block hit points, upper bound of the per-build roll
    pub block_hp_max: f32,
    /// Maximum hours of offline drone progress credited on load
    pub offline_hours_cap: f64,
    /// Payout boost applied to offline drone shots
    pub offline_reward_factor: f64,
}

impl Default for DemolitionTuning {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.05,
            respawn_delay: 0.55,
            collapse_threshold: 0.7,
            collapse_duration_min: 0.8,
            collapse_duration_max: 1.2,
            base_block_value: 0.28,
            tier_value_scale: 1.13,
            tier_value_cap: 9.0,
            collapse_bonus_factor: 0.65,
            tier_hp_scale: 1.075,
            tier_hp_cap: 6.0,
            block_hp_min: 1.2,
            block_hp_max: 2.0,
            offline_hours_cap: 4.0,
            offline_reward_factor: 1.8,
        }
    }
}

impl DemolitionTuning {
    /// Tier multiplier applied to base block hit points, capped.
    pub fn tier_hp_multiplier(&self, tier: u32) -> f32 {
        self.tier_hp_scale
            .powi(tier.saturating_sub(1) as i32)
            .min(self.tier_hp_cap)
    }

    /// Scrap paid for destroying one block at the given tier.
    pub fn block_reward(&self, tier: u32, scrap_multiplier: f64) -> f64 {
        let tier_scale = self
            .tier_value_scale
            .powi(tier.saturating_sub(1) as i32)
            .min(self.tier_value_cap);
        self.base_block_value * tier_scale * scrap_multiplier
    }

    /// Lump bonus paid when a building tips into collapse, proportional to
    /// the blocks still standing at that moment.
    pub fn collapse_reward(&self, remaining_blocks: usize, tier: u32, scrap_multiplier: f64) -> f64 {
        remaining_blocks as f64 * self.block_reward(tier, scrap_multiplier) * self.collapse_bonus_factor
    }
}
