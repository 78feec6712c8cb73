//! Collision detection module
//!
//! Ray-AABB intersection (slab method) for the block lattices, plus the
//! hit record that ties a struck surface back to its owning building.
//!
//! The slab method computes entry/exit times against each axis-aligned
//! plane pair; a ray intersects the box when the latest entry precedes
//! the earliest exit and the exit is in front of the origin.

use glam::Vec3;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box spanning `center ± half`.
    pub fn from_center_half(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// A surface hit on a city building, carrying the owning building index and
/// the struck block's flattened lattice index so damage can be resolved
/// without back-pointers from surfaces to owners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Index of the owning building within the city's building list
    pub building: usize,
    /// Flattened lattice index of the struck block
    pub block: usize,
    /// World-space hit position
    pub position: Vec3,
    /// Outward face normal at the hit point (normalized)
    pub normal: Vec3,
    /// Distance from the ray origin to the hit
    pub distance: f32,
}

/// Ray-AABB intersection using the slab method.
///
/// Returns the distance along the ray to the nearest intersection in front
/// of the origin; when the origin lies inside the box the exit distance is
/// returned instead. `ray_dir` should be normalized. Near-zero direction
/// components are handled by substituting a huge inverse, which keeps the
/// min/max slab arithmetic well-defined.
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let d = ray_dir[axis];
        let inv = if d.abs() > 1e-10 {
            1.0 / d
        } else {
            f32::MAX * d.signum()
        };
        let t1 = (aabb_min[axis] - ray_origin[axis]) * inv;
        let t2 = (aabb_max[axis] - ray_origin[axis]) * inv;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    if t_exit < t_enter || t_exit < 0.0 {
        return None;
    }
    if t_enter >= 0.0 {
        Some(t_enter)
    } else {
        // Ray starts inside the box.
        Some(t_exit)
    }
}

/// Outward normal of the AABB face closest to `point`.
///
/// `point` is expected to lie on (or very near) the box surface, as
/// produced by [`ray_aabb_intersect`].
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half = (aabb_max - aabb_min) * 0.5;
    let local = (point - center) / half;
    let magnitude = local.abs();

    if magnitude.x >= magnitude.y && magnitude.x >= magnitude.z {
        Vec3::new(local.x.signum(), 0.0, 0.0)
    } else if magnitude.y >= magnitude.x && magnitude.y >= magnitude.z {
        Vec3::new(0.0, local.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, local.z.signum())
    }
}
