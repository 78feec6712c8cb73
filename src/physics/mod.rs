//! Physics Module
//!
//! Ray queries against the block lattices.

pub mod collision;

pub use collision::{Aabb, SurfaceHit, aabb_surface_normal, ray_aabb_intersect};
