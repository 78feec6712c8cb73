//! Impact Fx - expanding rings at hit points and drone tracer beams
//!
//! Two small ring-buffer pools, recycled the same way as debris: spawning
//! claims the slot at the head and advances, so a burst of hits simply
//! retires the oldest effect early. Rings grow and fade over a quarter
//! second; tracers are straight beams from the scene viewpoint to the
//! impact that fade in a tenth of a second.

use glam::Vec3;

use crate::render::{RingInstance, TracerInstance};

pub const RING_POOL: usize = 32;
pub const TRACER_POOL: usize = 24;

/// Ring tint for player impacts.
pub const RING_COLOR: u32 = 0x42E9FF;
/// Ring tint for drone impacts.
pub const DRONE_RING_COLOR: u32 = 0x4CF9FF;

const RING_LIFE: f32 = 0.25;
const RING_GROWTH: f32 = 6.0;
const TRACER_LIFE: f32 = 0.12;

#[derive(Debug, Clone, Copy, Default)]
struct FxSlot {
    active: bool,
    life: f32,
    max_life: f32,
}

pub struct ImpactFx {
    rings: Vec<FxSlot>,
    ring_instances: Vec<RingInstance>,
    ring_head: usize,
    tracers: Vec<FxSlot>,
    tracer_instances: Vec<TracerInstance>,
    tracer_head: usize,
    viewpoint: Vec3,
}

impl ImpactFx {
    pub fn new(viewpoint: Vec3) -> Self {
        Self {
            rings: vec![FxSlot::default(); RING_POOL],
            ring_instances: vec![RingInstance::default(); RING_POOL],
            ring_head: 0,
            tracers: vec![FxSlot::default(); TRACER_POOL],
            tracer_instances: vec![TracerInstance::default(); TRACER_POOL],
            tracer_head: 0,
            viewpoint,
        }
    }

    /// Tracers originate here; follows the camera in the interactive build.
    pub fn set_viewpoint(&mut self, viewpoint: Vec3) {
        self.viewpoint = viewpoint;
    }

    /// Start an expanding ring at `point`, sized from the blast radius.
    pub fn spawn_impact(&mut self, point: Vec3, radius: f32, drone: bool) {
        let i = self.ring_head;
        self.ring_head = (self.ring_head + 1) % RING_POOL;

        self.rings[i] = FxSlot {
            active: true,
            life: 0.0,
            max_life: RING_LIFE,
        };
        self.ring_instances[i] = RingInstance {
            position: point.to_array(),
            scale: (radius * 0.38).max(0.25),
            color_packed: if drone { DRONE_RING_COLOR } else { RING_COLOR },
            opacity: 0.95,
        };
    }

    /// Start a tracer beam from the viewpoint to `impact`.
    pub fn spawn_drone_flash(&mut self, impact: Vec3) {
        let i = self.tracer_head;
        self.tracer_head = (self.tracer_head + 1) % TRACER_POOL;

        self.tracers[i] = FxSlot {
            active: true,
            life: 0.0,
            max_life: TRACER_LIFE,
        };
        self.tracer_instances[i] = TracerInstance {
            start: self.viewpoint.to_array(),
            end: impact.to_array(),
            opacity: 0.95,
            _pad: 0,
        };
    }

    pub fn update(&mut self, dt: f32) {
        for (slot, inst) in self.rings.iter_mut().zip(&mut self.ring_instances) {
            if !slot.active {
                continue;
            }
            slot.life += dt;
            let t = slot.life / slot.max_life;
            if t >= 1.0 {
                slot.active = false;
                inst.opacity = 0.0;
                continue;
            }
            inst.scale *= 1.0 + dt * RING_GROWTH;
            inst.opacity = (1.0 - t) * 0.85;
        }

        for (slot, inst) in self.tracers.iter_mut().zip(&mut self.tracer_instances) {
            if !slot.active {
                continue;
            }
            slot.life += dt;
            let p = slot.life / slot.max_life;
            if p >= 1.0 {
                slot.active = false;
                inst.opacity = 0.0;
                continue;
            }
            inst.opacity = 1.0 - p;
        }
    }

    pub fn ring_instances(&self) -> &[RingInstance] {
        &self.ring_instances
    }

    pub fn tracer_instances(&self) -> &[TracerInstance] {
        &self.tracer_instances
    }

    pub fn count_active_rings(&self) -> usize {
        self.rings.iter().filter(|s| s.active).count()
    }

    pub fn count_active_tracers(&self) -> usize {
        self.tracers.iter().filter(|s| s.active).count()
    }
}
