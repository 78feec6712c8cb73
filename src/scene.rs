//! DemolitionScene: high-level composition of the whole simulation.
//!
//! Owns the city, the debris/fx pools, and every runtime system
//! (projectiles, drone director, economy, upgrades). Its
//! [`update`](DemolitionScene::update) method is the single entry point
//! for per-frame logic. Read the public pool fields directly for
//! rendering data.

use glam::Vec3;

use crate::config::{DemolitionTuning, PerfMode};
use crate::systems::{
    DroneDirector, Economy, ProjectileKind, ProjectileSystem, SaveProfile, UpgradeEffects,
    UpgradeKind, Upgrades,
};
use crate::world::{City, DebrisPool, ImpactFx, ScrapAward};

/// Hitscan origin until the embedding app supplies a camera position.
pub const DEFAULT_VIEWPOINT: Vec3 = Vec3::new(4.2, 3.0, 5.4);

/// Hitscan shots reach the whole city; only the nearest surface matters.
const HITSCAN_RANGE: f32 = f32::INFINITY;

/// Assumed blocks destroyed per shot in the HUD income estimate.
const AVG_BLOCKS_PER_SHOT: f64 = 2.2;

/// HUD snapshot assembled once per render from live system state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneStats {
    pub scrap: f64,
    pub scrap_per_second: f64,
    pub buildings: usize,
    pub total_blocks: usize,
    pub alive_blocks: usize,
    pub debris_active: usize,
    /// Rough farmable-tier estimate derived from the damage level.
    pub average_tier: f32,
    pub perf_mode: PerfMode,
}

/// Complete demolition sim composing the city and all systems.
///
/// Created once from a [`SaveProfile`] and a seed. Call
/// [`update`](DemolitionScene::update) each frame with the delta time;
/// all game logic executes in the correct order. Read system fields
/// directly for rendering data.
pub struct DemolitionScene {
    // -- Config --
    tuning: DemolitionTuning,
    perf_mode: PerfMode,
    viewpoint: Vec3,

    // -- World --
    pub city: City,
    pub debris: DebrisPool,
    pub fx: ImpactFx,

    // -- Systems --
    pub projectiles: ProjectileSystem,
    drones: DroneDirector,
    pub economy: Economy,
    pub upgrades: Upgrades,

    // -- Pending scrap, credited at the end of each frame --
    awards: Vec<ScrapAward>,
}

impl DemolitionScene {
    /// Build the scene a saved profile describes: city sized by the
    /// profile's perf mode, economy seeded with its scrap, upgrades at
    /// its levels. The seed fixes every random stream in the sim.
    pub fn new(profile: &SaveProfile, tuning: DemolitionTuning, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let perf = profile.perf_mode.profile();
        let city = City::new(&perf, tuning.clone(), rng.fork());
        let debris = DebrisPool::new(perf.debris_cap, rng.fork());

        Self {
            tuning,
            perf_mode: profile.perf_mode,
            viewpoint: DEFAULT_VIEWPOINT,
            city,
            debris,
            fx: ImpactFx::new(DEFAULT_VIEWPOINT),
            projectiles: ProjectileSystem::new(),
            drones: DroneDirector::new(rng.fork()),
            economy: Economy::new(profile.scrap),
            upgrades: Upgrades::new(profile.upgrades),
            awards: Vec::new(),
        }
    }

    /// Advance the sim by one frame:
    /// 1. Clamp `dt` so a backgrounded tab can't feed a huge step.
    /// 2. Snapshot upgrade effects once for every consumer this frame.
    /// 3. Integrate projectiles and resolve their impacts.
    /// 4. Run drone shots that came due.
    /// 5. Advance building damage states, collapses, and respawns.
    /// 6. Age debris particles.
    /// 7. Age impact rings and tracers.
    /// 8. Credit the scrap banked during the frame.
    pub fn update(&mut self, dt: f32) {
        // 1.
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.tuning.max_frame_dt)
        } else {
            0.0
        };

        // 2.
        let effects = self.upgrades.effects();

        // 3.
        self.projectiles.update(
            dt,
            &mut self.city,
            &effects,
            &mut self.fx,
            &mut self.debris,
            &mut self.awards,
        );

        // 4.
        let due = self.drones.update(dt, &effects);
        for _ in 0..due {
            if let Some(target) = self.drones.acquire_target(&mut self.city) {
                self.resolve_hitscan(self.viewpoint, target - self.viewpoint, &effects, true);
            }
        }

        // 5.
        let batch = self.perf_mode.profile().collapse_batch;
        self.city.update(dt, batch, &mut self.debris);

        // 6.
        self.debris.update(dt);

        // 7.
        self.fx.update(dt);

        // 8.
        self.drain_awards();
    }

    /// Player hitscan shot from `origin` along `dir`. Damage lands and
    /// scrap is credited before this returns; the return value is the
    /// per-block total of the hit (zero on a miss) for floaters and logs.
    pub fn fire_ray(&mut self, origin: Vec3, dir: Vec3) -> f64 {
        let effects = self.upgrades.effects();
        let reward = self.resolve_hitscan(origin, dir, &effects, false);
        self.drain_awards();
        reward
    }

    /// Lob an arcing shell. Its impact resolves inside a later
    /// [`update`](DemolitionScene::update), not here.
    pub fn fire_projectile(&mut self, origin: Vec3, dir: Vec3, speed: f32, kind: ProjectileKind) {
        self.projectiles.spawn(origin, dir, speed, kind);
    }

    /// Buy one level of `kind` if the economy can afford it.
    pub fn buy_upgrade(&mut self, kind: UpgradeKind) -> bool {
        self.upgrades.buy(kind, &mut self.economy)
    }

    /// Switch perf mode: rebuilds the city to the new block budget and
    /// re-caps the debris pool. A no-op when the mode already matches,
    /// so building progress survives redundant calls.
    pub fn set_perf_mode(&mut self, mode: PerfMode) {
        if self.perf_mode == mode {
            return;
        }
        self.perf_mode = mode;
        let profile = mode.profile();
        self.city.rebuild(&profile);
        self.debris.set_cap(profile.debris_cap);
        log::info!(
            "perf mode {} ({} buildings, {} debris cap)",
            mode.label(),
            self.city.stats().buildings,
            self.debris.cap()
        );
    }

    /// Flip between Low and High and return the new mode.
    pub fn toggle_perf_mode(&mut self) -> PerfMode {
        self.set_perf_mode(self.perf_mode.toggled());
        self.perf_mode
    }

    pub fn perf_mode(&self) -> PerfMode {
        self.perf_mode
    }

    /// Move the eye position used as the drone hitscan origin and the
    /// tracer start point.
    pub fn set_viewpoint(&mut self, viewpoint: Vec3) {
        self.viewpoint = viewpoint;
        self.fx.set_viewpoint(viewpoint);
    }

    pub fn viewpoint(&self) -> Vec3 {
        self.viewpoint
    }

    pub fn tuning(&self) -> &DemolitionTuning {
        &self.tuning
    }

    /// Credit the scrap the drone would have earned between `profile`'s
    /// save time and `now_seconds`. Returns the amount so the embedding
    /// app can announce it.
    pub fn apply_offline_gain(&mut self, profile: &SaveProfile, now_seconds: f64) -> f64 {
        let gain = profile.offline_drone_gain(now_seconds, &self.upgrades.effects(), &self.tuning);
        if gain > 0.0 {
            self.economy.add_scrap(gain);
        }
        gain
    }

    /// Snapshot the scene into a profile ready for [`save_profile`].
    ///
    /// [`save_profile`]: crate::systems::save_profile
    pub fn export_profile(&self, now_seconds: f64) -> SaveProfile {
        SaveProfile {
            scrap: self.economy.scrap(),
            upgrades: self.upgrades.levels(),
            perf_mode: self.perf_mode,
            last_timestamp: now_seconds,
        }
    }

    /// Assemble the HUD snapshot. Mutable because the income estimate
    /// advances its smoothing state on every read.
    pub fn stats(&mut self) -> SceneStats {
        let effects = self.upgrades.effects();
        let avg_shot =
            self.tuning.block_reward(1, effects.scrap_multiplier) * AVG_BLOCKS_PER_SHOT;
        let city = self.city.stats();

        SceneStats {
            scrap: self.economy.scrap(),
            scrap_per_second: self.economy.estimate_sps(
                effects.drone_level,
                effects.drone_interval,
                avg_shot,
            ),
            buildings: city.buildings,
            total_blocks: city.total_blocks,
            alive_blocks: city.alive_blocks,
            debris_active: self.debris.count_active(),
            average_tier: 1.0 + self.upgrades.level(UpgradeKind::Damage) as f32 * 0.25,
            perf_mode: self.perf_mode,
        }
    }

    /// Shared hitscan path for aimed and drone shots. Fx spawn only when
    /// the shot actually destroyed something; a graze or a miss stays
    /// silent.
    fn resolve_hitscan(
        &mut self,
        origin: Vec3,
        dir: Vec3,
        effects: &UpgradeEffects,
        drone: bool,
    ) -> f64 {
        let dir = dir.normalize_or_zero();
        let Some(hit) = self.city.raycast_surfaces(origin, dir, HITSCAN_RANGE) else {
            return 0.0;
        };

        let reward = self.city.building_mut(hit.building).apply_area_damage(
            hit.position,
            effects,
            &mut self.debris,
            &mut self.awards,
        );
        if reward > 0.0 {
            self.fx.spawn_impact(hit.position, effects.radius, drone);
            if drone {
                self.fx.spawn_drone_flash(hit.position);
            }
        }
        reward
    }

    fn drain_awards(&mut self) {
        for award in self.awards.drain(..) {
            self.economy.add_scrap(award.amount);
        }
    }
}
