//! Building - a destructible lattice of blocks
//!
//! Each building is a rectangular lattice stored as parallel arrays
//! (positions, hit points, alive flags) indexed by the flattened
//! coordinate `y * (width * depth) + x * depth + z`. Damage is applied
//! as a sphere around an impact point; once enough of the lattice is
//! dead the building enters a timed collapse, then respawns one tier
//! higher and slightly larger.

use std::sync::Arc;

use glam::Vec3;

use crate::config::DemolitionTuning;
use crate::physics::{Aabb, ray_aabb_intersect};
use crate::render::{BlockInstance, pack_hsl};
use crate::systems::upgrades::UpgradeEffects;
use crate::world::debris::DebrisPool;

// ============================================================================
// SHARED PROTOTYPE AND AWARD TYPES
// ============================================================================

/// Geometry and palette shared by every block in the city. Created once and
/// handed to each building by reference.
#[derive(Debug, Clone, Copy)]
pub struct BlockPrototype {
    /// Edge length of the rendered cube; lattice spacing stays 1.0 so a
    /// small gap shows between blocks
    pub block_size: f32,
    /// Hue at the bottom layer of an undamaged building
    pub base_hue: f32,
    /// Hue shift from bottom to top layer
    pub hue_span: f32,
    /// Hue shift applied as a block loses health
    pub damage_hue_span: f32,
}

impl Default for BlockPrototype {
    fn default() -> Self {
        Self {
            block_size: 0.96,
            base_hue: 0.56,
            hue_span: 0.11,
            damage_hue_span: 0.12,
        }
    }
}

impl BlockPrototype {
    /// Half edge length, the block's collision half-extent.
    pub fn half_extent(&self) -> f32 {
        self.block_size * 0.5
    }
}

/// Where a scrap payment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapSource {
    BlockDestroyed,
    CollapseBonus,
}

/// One scrap payment emitted by the damage pipeline. Awards are collected
/// into a caller-supplied list and credited by whoever drains it, so the
/// lattice code never touches the economy directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrapAward {
    pub amount: f64,
    pub source: ScrapSource,
}

/// Lifecycle of a building's lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollapsePhase {
    Standing,
    /// Remaining blocks are being consumed in batches until the lattice is
    /// empty or `target` seconds have passed.
    Collapsing { elapsed: f32, target: f32 },
    /// Lattice is gone; the building rebuilds when the timer runs out.
    Respawning { remaining: f32 },
}

// ============================================================================
// BUILDING
// ============================================================================

#[derive(Debug)]
pub struct Building {
    origin: Vec3,
    width: usize,
    depth: usize,
    height: usize,
    tier: u32,
    total_blocks: usize,
    dead_blocks: usize,
    /// Hit points every block starts with; rolled once per (re)build
    max_hp: f32,
    phase: CollapsePhase,

    positions: Vec<Vec3>,
    hit_points: Vec<f32>,
    alive: Vec<bool>,

    instances: Vec<BlockInstance>,
    /// Set whenever instance data changes; the renderer clears it after
    /// re-uploading the buffer
    pub instances_dirty: bool,

    tuning: DemolitionTuning,
    proto: Arc<BlockPrototype>,
    rng: fastrand::Rng,
}

impl Building {
    pub fn new(
        origin: Vec3,
        width: usize,
        depth: usize,
        height: usize,
        tier: u32,
        tuning: DemolitionTuning,
        proto: Arc<BlockPrototype>,
        rng: fastrand::Rng,
    ) -> Self {
        let mut building = Self {
            origin,
            width,
            depth,
            height,
            tier,
            total_blocks: 0,
            dead_blocks: 0,
            max_hp: 0.0,
            phase: CollapsePhase::Standing,
            positions: Vec::new(),
            hit_points: Vec::new(),
            alive: Vec::new(),
            instances: Vec::new(),
            instances_dirty: false,
            tuning,
            proto,
            rng,
        };
        building.rebuild_lattice();
        building
    }

    /// Flattened lattice index for the block at `(x, y, z)`.
    pub fn block_index(&self, x: usize, y: usize, z: usize) -> usize {
        y * (self.width * self.depth) + x * self.depth + z
    }

    fn rebuild_lattice(&mut self) {
        let (w, d, h) = (self.width, self.depth, self.height);
        self.total_blocks = w * d * h;
        self.dead_blocks = 0;
        self.max_hp = (self.tuning.block_hp_min
            + self.rng.f32() * (self.tuning.block_hp_max - self.tuning.block_hp_min))
            * self.tuning.tier_hp_multiplier(self.tier);

        self.positions.clear();
        self.instances.clear();
        let x_off = -((w as f32 - 1.0) * 0.5);
        let z_off = -((d as f32 - 1.0) * 0.5);
        for y in 0..h {
            let hue = self.proto.base_hue + (y as f32 / h.max(1) as f32) * self.proto.hue_span;
            let color = pack_hsl(hue, 0.75, 0.55);
            for x in 0..w {
                for z in 0..d {
                    let world = self.origin
                        + Vec3::new(x_off + x as f32, y as f32 + 0.5, z_off + z as f32);
                    self.positions.push(world);
                    self.instances.push(BlockInstance {
                        position: world.to_array(),
                        scale: self.proto.block_size,
                        color_packed: color,
                        _pad: 0,
                    });
                }
            }
        }

        self.hit_points.clear();
        self.hit_points.resize(self.total_blocks, self.max_hp);
        self.alive.clear();
        self.alive.resize(self.total_blocks, true);
        self.instances_dirty = true;
    }

    /// Spherical area damage around `impact`. Blocks inside the radius lose
    /// hit points (doubled up by the weak-zone multiplier near ground level),
    /// dying blocks pay scrap into `awards`, and crossing the collapse
    /// threshold starts the collapse and pays the bonus for every block
    /// still standing. Returns the scrap credited for blocks destroyed by
    /// this call.
    pub fn apply_area_damage(
        &mut self,
        impact: Vec3,
        effects: &UpgradeEffects,
        debris: &mut DebrisPool,
        awards: &mut Vec<ScrapAward>,
    ) -> f64 {
        let damage = effects.damage;
        let radius = effects.radius;
        if !impact.is_finite()
            || !damage.is_finite()
            || damage <= 0.0
            || !radius.is_finite()
            || radius <= 0.0
        {
            return 0.0;
        }

        let radius_sq = radius * radius;
        let height = self.height as f32;
        let mut reward = 0.0;

        for i in 0..self.total_blocks {
            if !self.alive[i] {
                continue;
            }
            let pos = self.positions[i];
            if pos.distance_squared(impact) > radius_sq {
                continue;
            }

            let mut dealt = damage;
            let y_frac = (pos.y - self.origin.y) / height;
            if y_frac < effects.weakness_fraction {
                dealt *= effects.weakness_multiplier;
            }

            self.hit_points[i] -= dealt;
            if self.hit_points[i] <= 0.0 {
                if self.remove_block(i, debris) {
                    let value = self.tuning.block_reward(self.tier, effects.scrap_multiplier);
                    awards.push(ScrapAward {
                        amount: value,
                        source: ScrapSource::BlockDestroyed,
                    });
                    reward += value;
                }
            } else {
                // Tint toward the damaged palette as health drains.
                let frac = (self.hit_points[i] / self.max_hp).max(0.0);
                self.instances[i].color_packed = pack_hsl(
                    self.proto.base_hue + frac * self.proto.damage_hue_span,
                    0.88,
                    0.22 + frac * 0.36,
                );
                self.instances_dirty = true;
            }
        }

        if !matches!(self.phase, CollapsePhase::Collapsing { .. })
            && self.dead_blocks as f32 / self.total_blocks as f32
                >= self.tuning.collapse_threshold
        {
            self.begin_collapse(effects.scrap_multiplier, debris, awards);
        }

        reward
    }

    fn begin_collapse(
        &mut self,
        scrap_multiplier: f64,
        debris: &mut DebrisPool,
        awards: &mut Vec<ScrapAward>,
    ) {
        let target = self.tuning.collapse_duration_min
            + self.rng.f32()
                * (self.tuning.collapse_duration_max - self.tuning.collapse_duration_min);
        self.phase = CollapsePhase::Collapsing {
            elapsed: 0.0,
            target,
        };

        let remaining = self.total_blocks - self.dead_blocks;
        let bonus = self
            .tuning
            .collapse_reward(remaining, self.tier, scrap_multiplier);
        awards.push(ScrapAward {
            amount: bonus,
            source: ScrapSource::CollapseBonus,
        });

        let burst = self.origin + Vec3::new(0.0, (self.height as f32 * 0.35).max(2.0), 0.0);
        debris.spawn(burst, remaining.min(70), self.tier + 1);
    }

    /// Kill a block: zero its instance and throw a couple of debris
    /// particles. Returns false when the block was already dead.
    fn remove_block(&mut self, index: usize, debris: &mut DebrisPool) -> bool {
        if !self.alive[index] {
            return false;
        }
        self.alive[index] = false;
        self.dead_blocks += 1;
        self.hit_points[index] = 0.0;
        self.instances[index].scale = 0.0;
        self.instances[index].color_packed = 0;
        self.instances_dirty = true;
        debris.spawn(
            self.positions[index],
            2 + ((index + self.tier as usize) % 2),
            self.tier,
        );
        true
    }

    fn collapse_step(&mut self, batch: usize, debris: &mut DebrisPool) {
        let mut removed = 0;
        let mut i = 0;
        while i < self.total_blocks && removed < batch {
            if self.alive[i] {
                self.remove_block(i, debris);
                removed += 1;
            }
            i += 1;
        }
    }

    fn respawn(&mut self) {
        self.tier += 1;
        let growth = (1.0 + self.tier as f32 * 0.02).min(1.45);
        let vertical = 1.0 + self.tier as f32 * 0.015;
        self.width = ((self.width as f32 * growth).floor() as usize).clamp(3, 14);
        self.depth = ((self.depth as f32 * growth).floor() as usize).clamp(3, 14);
        self.height = ((self.height as f32 * vertical).floor() as usize).clamp(4, 22);
        self.rebuild_lattice();
        self.phase = CollapsePhase::Standing;
        log::debug!(
            "building respawned at tier {} ({}x{}x{})",
            self.tier,
            self.width,
            self.depth,
            self.height
        );
    }

    /// Advance the collapse/respawn lifecycle by `dt` seconds.
    pub fn update(&mut self, dt: f32, collapse_batch: usize, debris: &mut DebrisPool) {
        let dt = dt.max(0.0);
        match self.phase {
            CollapsePhase::Standing => {}
            CollapsePhase::Collapsing { elapsed, target } => {
                let elapsed = elapsed + dt;
                self.collapse_step(collapse_batch, debris);
                if self.dead_blocks >= self.total_blocks || elapsed >= target {
                    self.phase = CollapsePhase::Respawning {
                        remaining: self.tuning.respawn_delay,
                    };
                } else {
                    self.phase = CollapsePhase::Collapsing { elapsed, target };
                }
            }
            CollapsePhase::Respawning { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.respawn();
                } else {
                    self.phase = CollapsePhase::Respawning { remaining };
                }
            }
        }
    }

    /// Nearest living block hit by the ray, as `(block index, distance)`.
    /// Dead blocks never occlude.
    pub fn raycast_blocks(
        &self,
        ray_origin: Vec3,
        ray_dir: Vec3,
        max_dist: f32,
    ) -> Option<(usize, f32)> {
        let he = Vec3::splat(self.proto.half_extent());
        let mut best: Option<(usize, f32)> = None;
        for i in 0..self.total_blocks {
            if !self.alive[i] {
                continue;
            }
            let pos = self.positions[i];
            if let Some(t) = ray_aabb_intersect(ray_origin, ray_dir, pos - he, pos + he)
                && t <= max_dist
                && best.is_none_or(|(_, best_t)| t < best_t)
            {
                best = Some((i, t));
            }
        }
        best
    }

    /// World bounds of the whole lattice, living and dead blocks alike.
    pub fn bounds(&self) -> Aabb {
        let he = self.proto.half_extent();
        let x_span = (self.width as f32 - 1.0) * 0.5;
        let z_span = (self.depth as f32 - 1.0) * 0.5;
        Aabb::new(
            self.origin + Vec3::new(-x_span - he, 0.5 - he, -z_span - he),
            self.origin + Vec3::new(x_span + he, self.height as f32 - 0.5 + he, z_span + he),
        )
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn tier(&self) -> u32 {
        self.tier
    }

    pub fn phase(&self) -> CollapsePhase {
        self.phase
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn total_blocks(&self) -> usize {
        self.total_blocks
    }

    pub fn dead_blocks(&self) -> usize {
        self.dead_blocks
    }

    pub fn alive_count(&self) -> usize {
        self.total_blocks - self.dead_blocks
    }

    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    pub fn block_position(&self, index: usize) -> Vec3 {
        self.positions[index]
    }

    pub fn is_block_alive(&self, index: usize) -> bool {
        self.alive[index]
    }

    pub fn block_hit_points(&self, index: usize) -> f32 {
        self.hit_points[index]
    }

    pub fn instances(&self) -> &[BlockInstance] {
        &self.instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinned_tuning() -> DemolitionTuning {
        // Pin the hit point roll so damage math is exact.
        DemolitionTuning {
            block_hp_min: 2.0,
            block_hp_max: 2.0,
            ..Default::default()
        }
    }

    fn test_building(width: usize, depth: usize, height: usize) -> Building {
        Building::new(
            Vec3::ZERO,
            width,
            depth,
            height,
            1,
            pinned_tuning(),
            Arc::new(BlockPrototype::default()),
            fastrand::Rng::with_seed(11),
        )
    }

    fn kill_effects() -> UpgradeEffects {
        UpgradeEffects {
            damage: 2.5,
            radius: 0.9,
            ..Default::default()
        }
    }

    fn debris_pool() -> DebrisPool {
        DebrisPool::new(600, fastrand::Rng::with_seed(3))
    }

    #[test]
    fn lattice_layout_matches_flattened_index() {
        let b = test_building(2, 2, 3);
        assert_eq!(b.total_blocks(), 12);
        assert_eq!(b.block_index(1, 2, 1), 11);
        assert_eq!(b.block_position(b.block_index(0, 0, 0)), Vec3::new(-0.5, 0.5, -0.5));
        assert_eq!(b.block_position(b.block_index(1, 2, 1)), Vec3::new(0.5, 2.5, 0.5));
        assert_eq!(b.max_hp(), 2.0);
    }

    #[test]
    fn area_damage_kills_only_blocks_in_radius() {
        let mut b = test_building(2, 2, 3);
        let mut debris = debris_pool();
        let mut awards = Vec::new();

        // Neighbors sit 1.0 apart, outside the 0.9 radius.
        let target = b.block_position(b.block_index(0, 1, 0));
        let reward = b.apply_area_damage(target, &kill_effects(), &mut debris, &mut awards);

        assert!((reward - 0.28).abs() < 1e-9);
        assert_eq!(b.dead_blocks(), 1);
        assert!(!b.is_block_alive(b.block_index(0, 1, 0)));
        assert_eq!(awards.len(), 1);
        assert_eq!(awards[0].source, ScrapSource::BlockDestroyed);
        assert_eq!(b.instances()[b.block_index(0, 1, 0)].scale, 0.0);
        assert!(debris.count_active() > 0);
    }

    #[test]
    fn surviving_blocks_tint_toward_damage_palette() {
        let mut b = test_building(2, 2, 3);
        let mut debris = debris_pool();
        let mut awards = Vec::new();
        let idx = b.block_index(1, 2, 1);
        let effects = UpgradeEffects {
            damage: 1.0,
            radius: 0.9,
            ..Default::default()
        };

        b.apply_area_damage(b.block_position(idx), &effects, &mut debris, &mut awards);

        assert!(b.is_block_alive(idx));
        assert_eq!(b.block_hit_points(idx), 1.0);
        assert!(awards.is_empty());
        let expected = pack_hsl(0.56 + 0.5 * 0.12, 0.88, 0.22 + 0.5 * 0.36);
        assert_eq!(b.instances()[idx].color_packed, expected);
        assert!(b.instances_dirty);
    }

    #[test]
    fn weak_zone_amplifies_low_hits() {
        let mut b = test_building(2, 2, 3);
        let mut debris = debris_pool();
        let mut awards = Vec::new();
        let effects = UpgradeEffects {
            damage: 1.0,
            radius: 0.9,
            weakness_fraction: 0.5,
            weakness_multiplier: 2.0,
            ..Default::default()
        };

        // Bottom layer: y fraction 0.5/3, inside the weak zone.
        let low = b.block_index(0, 0, 0);
        b.apply_area_damage(b.block_position(low), &effects, &mut debris, &mut awards);
        assert!(!b.is_block_alive(low), "amplified hit should kill outright");

        // Top layer: y fraction 2.5/3, outside the weak zone.
        let high = b.block_index(0, 2, 0);
        b.apply_area_damage(b.block_position(high), &effects, &mut debris, &mut awards);
        assert!(b.is_block_alive(high));
        assert_eq!(b.block_hit_points(high), 1.0);
    }

    #[test]
    fn degenerate_damage_inputs_are_ignored() {
        let mut b = test_building(2, 2, 3);
        let mut debris = debris_pool();
        let mut awards = Vec::new();

        let zero_damage = UpgradeEffects {
            damage: 0.0,
            ..Default::default()
        };
        let nan_radius = UpgradeEffects {
            radius: f32::NAN,
            ..Default::default()
        };

        assert_eq!(
            b.apply_area_damage(Vec3::ZERO, &zero_damage, &mut debris, &mut awards),
            0.0
        );
        assert_eq!(
            b.apply_area_damage(Vec3::ZERO, &nan_radius, &mut debris, &mut awards),
            0.0
        );
        assert_eq!(
            b.apply_area_damage(Vec3::splat(f32::NAN), &kill_effects(), &mut debris, &mut awards),
            0.0
        );
        assert_eq!(b.dead_blocks(), 0);
        assert!(awards.is_empty());
    }

    #[test]
    fn collapse_starts_at_threshold_and_pays_bonus_once() {
        let mut b = test_building(2, 2, 3);
        let mut debris = debris_pool();
        let mut awards = Vec::new();

        // 12 blocks, threshold 0.7: the ninth kill crosses it.
        for i in 0..8 {
            b.apply_area_damage(b.block_position(i), &kill_effects(), &mut debris, &mut awards);
        }
        assert_eq!(b.phase(), CollapsePhase::Standing);
        assert!(awards.iter().all(|a| a.source == ScrapSource::BlockDestroyed));

        b.apply_area_damage(b.block_position(8), &kill_effects(), &mut debris, &mut awards);
        assert!(matches!(b.phase(), CollapsePhase::Collapsing { .. }));

        let bonuses: Vec<_> = awards
            .iter()
            .filter(|a| a.source == ScrapSource::CollapseBonus)
            .collect();
        assert_eq!(bonuses.len(), 1);
        // 3 survivors at tier 1, discounted by the collapse factor.
        assert!((bonuses[0].amount - 3.0 * 0.28 * 0.65).abs() < 1e-9);
    }

    #[test]
    fn collapse_consumes_lattice_then_respawns_bigger() {
        let mut b = test_building(2, 2, 3);
        let mut debris = debris_pool();
        let mut awards = Vec::new();

        for i in 0..9 {
            b.apply_area_damage(b.block_position(i), &kill_effects(), &mut debris, &mut awards);
        }
        assert!(matches!(b.phase(), CollapsePhase::Collapsing { .. }));

        // A generous batch empties the lattice in one step.
        b.update(0.016, 500, &mut debris);
        assert_eq!(b.alive_count(), 0);
        assert!(matches!(b.phase(), CollapsePhase::Respawning { .. }));

        b.update(0.3, 500, &mut debris);
        assert!(matches!(b.phase(), CollapsePhase::Respawning { .. }));
        b.update(0.3, 500, &mut debris);

        // Tier 2: footprint clamps up to 3x3, height to 4, fresh hit points.
        assert_eq!(b.phase(), CollapsePhase::Standing);
        assert_eq!(b.tier(), 2);
        assert_eq!((b.width(), b.depth(), b.height()), (3, 3, 4));
        assert_eq!(b.alive_count(), 36);
        assert_eq!(b.dead_blocks(), 0);
        assert!((b.max_hp() - 2.0 * 1.075).abs() < 1e-4);
    }

    #[test]
    fn respawn_growth_respects_dimension_caps() {
        let mut b = Building::new(
            Vec3::ZERO,
            14,
            14,
            22,
            40,
            pinned_tuning(),
            Arc::new(BlockPrototype::default()),
            fastrand::Rng::with_seed(5),
        );
        let mut debris = debris_pool();
        b.phase = CollapsePhase::Respawning { remaining: 0.01 };
        b.update(0.1, 500, &mut debris);

        assert_eq!(b.tier(), 41);
        assert_eq!((b.width(), b.depth(), b.height()), (14, 14, 22));
    }

    #[test]
    fn raycast_skips_dead_blocks() {
        let mut b = test_building(2, 2, 3);
        let mut debris = debris_pool();
        let mut awards = Vec::new();
        let origin = Vec3::new(-0.5, 0.5, -5.0);
        let dir = Vec3::Z;

        let (idx, t) = b.raycast_blocks(origin, dir, 100.0).expect("should hit");
        assert_eq!(idx, b.block_index(0, 0, 0));
        assert!((t - 4.02).abs() < 1e-3);

        b.apply_area_damage(b.block_position(idx), &kill_effects(), &mut debris, &mut awards);
        let (idx2, t2) = b.raycast_blocks(origin, dir, 100.0).expect("should hit");
        assert_eq!(idx2, b.block_index(0, 0, 1));
        assert!((t2 - 5.02).abs() < 1e-3);
    }

    #[test]
    fn bounds_cover_the_lattice() {
        let b = test_building(2, 2, 3);
        let bounds = b.bounds();
        assert!(bounds.contains(b.block_position(0)));
        assert!(bounds.contains(b.block_position(11)));
        assert!(!bounds.contains(Vec3::new(0.0, 10.0, 0.0)));
    }
}
