//! Projectile lifecycle management system.
//!
//! Owns a fixed pool of ballistic shells, integrating gravity and sweeping
//! each frame's movement segment against the city so fast shells cannot
//! tunnel through a one-block wall. Impact damage, rings, and debris are
//! resolved here; scrap payments flow out through the shared awards list.

use glam::Vec3;

use crate::systems::upgrades::UpgradeEffects;
use crate::world::building::ScrapAward;
use crate::world::city::City;
use crate::world::debris::DebrisPool;
use crate::world::fx::ImpactFx;

/// Slots in the shell pool; spawning past this overwrites the oldest shell.
pub const PROJECTILE_POOL: usize = 72;

const GRAVITY: f32 = 22.0;
/// Collision radius, used to pad the sweep so grazing hits register.
const PROJECTILE_RADIUS: f32 = 0.32;
const GROUND_EPSILON: f32 = 0.02;
const MIN_SWEEP: f32 = 1e-4;

/// Gameplay archetype: who fired the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileKind {
    #[default]
    Player,
    Drone,
}

impl ProjectileKind {
    /// Seconds a shell may fly before despawning silently.
    pub fn max_life(self) -> f32 {
        match self {
            ProjectileKind::Player => 4.4,
            ProjectileKind::Drone => 3.4,
        }
    }

    /// Shell tint for the renderer.
    pub fn color(self) -> u32 {
        match self {
            ProjectileKind::Player => 0xFFB562,
            ProjectileKind::Drone => 0x68F5FF,
        }
    }

    pub fn is_drone(self) -> bool {
        matches!(self, ProjectileKind::Drone)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ProjectileSlot {
    active: bool,
    kind: ProjectileKind,
    life: f32,
    position: Vec3,
    velocity: Vec3,
}

pub struct ProjectileSystem {
    slots: Vec<ProjectileSlot>,
    head: usize,
}

impl ProjectileSystem {
    pub fn new() -> Self {
        Self {
            slots: vec![ProjectileSlot::default(); PROJECTILE_POOL],
            head: 0,
        }
    }

    /// Launch a shell. The direction is normalized here; degenerate inputs
    /// (zero direction, non-finite anything, non-positive speed) are dropped
    /// without claiming a slot.
    pub fn spawn(&mut self, origin: Vec3, dir: Vec3, speed: f32, kind: ProjectileKind) {
        if !origin.is_finite() || !speed.is_finite() || speed <= 0.0 {
            return;
        }
        let dir = dir.normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }

        let i = self.head;
        self.head = (self.head + 1) % PROJECTILE_POOL;
        self.slots[i] = ProjectileSlot {
            active: true,
            kind,
            life: 0.0,
            position: origin,
            velocity: dir * speed,
        };
    }

    /// Integrate every live shell and resolve collisions against the city.
    ///
    /// `effects` is the caller's per-frame snapshot, so damage always uses
    /// the upgrade levels at impact time rather than at launch time.
    pub fn update(
        &mut self,
        dt: f32,
        city: &mut City,
        effects: &UpgradeEffects,
        fx: &mut ImpactFx,
        debris: &mut DebrisPool,
        awards: &mut Vec<ScrapAward>,
    ) {
        for slot in &mut self.slots {
            if !slot.active {
                continue;
            }
            slot.life += dt;
            if slot.life >= slot.kind.max_life() {
                slot.active = false;
                continue;
            }

            let prev = slot.position;
            slot.velocity.y -= GRAVITY * dt;
            slot.position += slot.velocity * dt;

            let delta = slot.position - prev;
            let dist = delta.length();
            if dist > MIN_SWEEP {
                let dir = delta / dist;
                // Start slightly behind the previous position and overshoot
                // by the shell radius so surface grazes still count.
                let ray_origin = prev - dir * (PROJECTILE_RADIUS * 0.25);
                let far = dist + PROJECTILE_RADIUS * 0.5;
                if let Some(hit) = city.raycast_surfaces(ray_origin, dir, far) {
                    let reward = city.building_mut(hit.building).apply_area_damage(
                        hit.position,
                        effects,
                        debris,
                        awards,
                    );
                    log::trace!("shell impact at {:?} paid {reward:.2}", hit.position);
                    if reward > 0.0 {
                        fx.spawn_impact(hit.position, effects.radius, slot.kind.is_drone());
                        if slot.kind.is_drone() {
                            fx.spawn_drone_flash(hit.position);
                        }
                    }
                    slot.active = false;
                    continue;
                }
            }

            if slot.position.y <= GROUND_EPSILON {
                fx.spawn_impact(slot.position, 0.8, slot.kind.is_drone());
                slot.active = false;
            }
        }
    }

    pub fn count_active(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    /// Positions and kinds of live shells, for the renderer.
    pub fn iter_active(&self) -> impl Iterator<Item = (Vec3, ProjectileKind)> + '_ {
        self.slots
            .iter()
            .filter(|s| s.active)
            .map(|s| (s.position, s.kind))
    }
}

impl Default for ProjectileSystem {
    fn default() -> Self {
        Self::new()
    }
}
