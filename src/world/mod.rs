//! World Module
//!
//! The destructible city and its visual side effects: block lattices,
//! debris particles, impact rings and tracers.

pub mod building;
pub mod city;
pub mod debris;
pub mod fx;

pub use building::{BlockPrototype, Building, CollapsePhase, ScrapAward, ScrapSource};
pub use city::{City, CityStats};
pub use debris::{DEBRIS_BACKING, DebrisPool};
pub use fx::{DRONE_RING_COLOR, ImpactFx, RING_COLOR, RING_POOL, TRACER_POOL};
