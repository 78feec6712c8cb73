//! City - the grid of destructible buildings
//!
//! Plots are laid out on a square grid centered on the world origin. Each
//! plot gets a building sized so the whole city lands near the perf
//! profile's block budget. The city owns the shared block prototype and
//! fans frame updates and ray queries out to its buildings.

use std::sync::Arc;

use glam::Vec3;

use crate::config::{DemolitionTuning, PerfProfile};
use crate::physics::{SurfaceHit, aabb_surface_normal, ray_aabb_intersect};
use crate::world::building::{BlockPrototype, Building};
use crate::world::debris::DebrisPool;

/// Minimum block budget per building regardless of profile.
const MIN_BLOCKS_PER_PLOT: usize = 350;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityStats {
    pub buildings: usize,
    pub total_blocks: usize,
    pub alive_blocks: usize,
}

pub struct City {
    buildings: Vec<Building>,
    proto: Arc<BlockPrototype>,
    tuning: DemolitionTuning,
    total_blocks: usize,
    rng: fastrand::Rng,
}

impl City {
    pub fn new(profile: &PerfProfile, tuning: DemolitionTuning, rng: fastrand::Rng) -> Self {
        let mut city = Self {
            buildings: Vec::new(),
            proto: Arc::new(BlockPrototype::default()),
            tuning,
            total_blocks: 0,
            rng,
        };
        city.rebuild(profile);
        city
    }

    /// Tear the city down and repopulate every plot at tier 1. Used at
    /// startup and when the perf profile changes its block budget.
    pub fn rebuild(&mut self, profile: &PerfProfile) {
        let grid = profile.city_grid;
        let plots = grid * grid;
        let per_plot = (profile.target_blocks / plots.max(1)).max(MIN_BLOCKS_PER_PLOT);
        let half = (grid as f32 - 1.0) * 0.5;

        self.buildings.clear();
        self.total_blocks = 0;
        for x in 0..grid {
            for z in 0..grid {
                let i = self.buildings.len();
                let width = 4 + (i % 4);
                let depth = 4 + ((i * 3) % 4);
                let height = (per_plot / (width * depth)).max(6);
                let origin = Vec3::new(
                    (x as f32 - half) * profile.plot_spacing,
                    0.0,
                    (z as f32 - half) * profile.plot_spacing,
                );
                let building = Building::new(
                    origin,
                    width,
                    depth,
                    height,
                    1,
                    self.tuning.clone(),
                    Arc::clone(&self.proto),
                    self.rng.fork(),
                );
                self.total_blocks += building.total_blocks();
                self.buildings.push(building);
            }
        }
        log::debug!(
            "city rebuilt: {} buildings, {} blocks",
            self.buildings.len(),
            self.total_blocks
        );
    }

    /// Advance every building's lifecycle. Total block count is recomputed
    /// because respawns resize lattices.
    pub fn update(&mut self, dt: f32, collapse_batch: usize, debris: &mut DebrisPool) {
        self.total_blocks = 0;
        for building in &mut self.buildings {
            building.update(dt, collapse_batch, debris);
            self.total_blocks += building.total_blocks();
        }
    }

    /// Nearest living block surface along the ray, searched with a coarse
    /// per-building bounds gate before the per-block test.
    pub fn raycast_surfaces(
        &self,
        origin: Vec3,
        dir: Vec3,
        max_dist: f32,
    ) -> Option<SurfaceHit> {
        if !dir.is_finite() || dir.length_squared() < 1e-12 {
            return None;
        }

        let mut best: Option<SurfaceHit> = None;
        for (bi, building) in self.buildings.iter().enumerate() {
            if building.alive_count() == 0 {
                continue;
            }
            let bounds = building.bounds();
            let Some(coarse) = ray_aabb_intersect(origin, dir, bounds.min, bounds.max) else {
                continue;
            };
            // A ray starting inside the bounds can hit a block at any
            // distance from zero, so only gate on entry from outside.
            let gate = if bounds.contains(origin) { 0.0 } else { coarse };
            if gate > max_dist {
                continue;
            }
            if let Some(hit) = &best
                && gate > hit.distance
            {
                continue;
            }
            if let Some((block, t)) = building.raycast_blocks(origin, dir, max_dist)
                && best.as_ref().is_none_or(|hit| t < hit.distance)
            {
                let position = origin + dir * t;
                let center = building.block_position(block);
                let he = Vec3::splat(self.proto.half_extent());
                best = Some(SurfaceHit {
                    building: bi,
                    block,
                    position,
                    normal: aabb_surface_normal(position, center - he, center + he),
                    distance: t,
                });
            }
        }
        best
    }

    /// Uniformly random building index, or None for an empty city.
    pub fn pick_random(&mut self) -> Option<usize> {
        if self.buildings.is_empty() {
            None
        } else {
            Some(self.rng.usize(..self.buildings.len()))
        }
    }

    pub fn building(&self, index: usize) -> &Building {
        &self.buildings[index]
    }

    pub fn building_mut(&mut self, index: usize) -> &mut Building {
        &mut self.buildings[index]
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn stats(&self) -> CityStats {
        CityStats {
            buildings: self.buildings.len(),
            total_blocks: self.total_blocks,
            alive_blocks: self.buildings.iter().map(|b| b.alive_count()).sum(),
        }
    }
}
