//! Debris Pool - short-lived particles thrown off destroyed blocks
//!
//! A fixed backing array of particles reused ring-buffer style: spawning
//! always claims the slot at the head and advances, overwriting the oldest
//! particle when the pool is saturated. The active window can be narrowed
//! at runtime so the low perf profile renders fewer particles without
//! reallocating.

use glam::Vec3;

use crate::render::DebrisInstance;

/// Backing array length; the cap can never exceed this.
pub const DEBRIS_BACKING: usize = 600;

const DEBRIS_GRAVITY: f32 = 7.0;

#[derive(Debug, Clone, Copy, Default)]
struct DebrisSlot {
    active: bool,
    life: f32,
    position: Vec3,
    velocity: Vec3,
}

pub struct DebrisPool {
    slots: Vec<DebrisSlot>,
    instances: Vec<DebrisInstance>,
    head: usize,
    cap: usize,
    rng: fastrand::Rng,
}

impl DebrisPool {
    pub fn new(cap: usize, rng: fastrand::Rng) -> Self {
        Self {
            slots: vec![DebrisSlot::default(); DEBRIS_BACKING],
            instances: vec![DebrisInstance::default(); DEBRIS_BACKING],
            head: 0,
            cap: cap.clamp(1, DEBRIS_BACKING),
            rng,
        }
    }

    /// Throw `count` particles from `origin`. Higher tiers scatter wider.
    pub fn spawn(&mut self, origin: Vec3, count: usize, tier: u32) {
        let spread = 2.2 + tier as f32 * 0.07;
        for _ in 0..count {
            let i = self.head;
            self.head = (self.head + 1) % self.cap;

            let slot = &mut self.slots[i];
            slot.active = true;
            slot.life = 0.35 + self.rng.f32() * 0.45;
            slot.position = origin;
            slot.velocity = Vec3::new(
                (self.rng.f32() - 0.5) * spread,
                self.rng.f32() * spread,
                (self.rng.f32() - 0.5) * spread,
            );

            self.instances[i] = DebrisInstance {
                position: origin.to_array(),
                color: [
                    0.18 + self.rng.f32() * 0.25,
                    0.45 + self.rng.f32() * 0.5,
                    0.88 + self.rng.f32() * 0.12,
                ],
            };
        }
    }

    pub fn update(&mut self, dt: f32) {
        for i in 0..self.cap {
            let slot = &mut self.slots[i];
            if !slot.active {
                continue;
            }
            slot.life -= dt;
            if slot.life <= 0.0 {
                slot.active = false;
                // Zeroed color makes the point invisible under additive blending.
                self.instances[i].color = [0.0, 0.0, 0.0];
                continue;
            }
            slot.velocity.y -= DEBRIS_GRAVITY * dt;
            slot.position += slot.velocity * dt;
            self.instances[i].position = slot.position.to_array();
        }
    }

    /// Shrink or grow the active window. Particles beyond the new cap are
    /// killed immediately so a smaller window never leaves strays behind.
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap.clamp(1, DEBRIS_BACKING);
        self.head %= self.cap;
        for i in self.cap..DEBRIS_BACKING {
            self.slots[i].active = false;
            self.instances[i].color = [0.0, 0.0, 0.0];
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn count_active(&self) -> usize {
        self.slots[..self.cap].iter().filter(|s| s.active).count()
    }

    /// Instance data for the renderer, limited to the active window.
    pub fn instances(&self) -> &[DebrisInstance] {
        &self.instances[..self.cap]
    }
}
