//! Drone director - schedules automated shots once the drone is unlocked
//!
//! The director is a plain interval accumulator. Each frame it converts
//! elapsed time into a number of shots due; the scene resolves each shot
//! as an instant ray toward a randomly picked building. A shot aimed at a
//! fully dead building fizzles rather than re-rolling, so the cadence
//! stays honest.

use glam::Vec3;

use crate::systems::upgrades::UpgradeEffects;
use crate::world::city::City;

pub struct DroneDirector {
    timer: f32,
    rng: fastrand::Rng,
}

impl DroneDirector {
    pub fn new(rng: fastrand::Rng) -> Self {
        Self { timer: 0.0, rng }
    }

    /// Number of shots due this frame. While the drone is locked the timer
    /// does not accumulate, so unlocking never releases a burst of backlog.
    pub fn update(&mut self, dt: f32, effects: &UpgradeEffects) -> u32 {
        if effects.drone_level == 0 {
            return 0;
        }
        let interval = effects.drone_interval;
        if !(interval > 0.0) {
            return 0;
        }

        self.timer += dt.max(0.0);
        let mut shots = 0;
        while self.timer >= interval {
            self.timer -= interval;
            shots += 1;
        }
        shots
    }

    /// Pick a building and jitter an aim point around its origin: a little
    /// sideways spread and one to nine units up the facade. Returns None
    /// when the picked building has no blocks left.
    pub fn acquire_target(&mut self, city: &mut City) -> Option<Vec3> {
        let index = city.pick_random()?;
        let building = city.building(index);
        if building.alive_count() == 0 {
            return None;
        }
        let origin = building.origin();
        Some(Vec3::new(
            origin.x + (self.rng.f32() - 0.5) * 2.0,
            origin.y + 1.0 + self.rng.f32() * 8.0,
            origin.z + (self.rng.f32() - 0.5) * 2.0,
        ))
    }
}
