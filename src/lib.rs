//! Scrap City
//!
//! A destructible voxel-block city simulation: shoot buildings apart,
//! collect scrap, buy upgrades, and watch demolished towers respawn one
//! tier bigger. The crate is renderer-agnostic; every pool exposes
//! GPU-ready instance slices and the embedding app decides how to draw
//! them.
//!
//! # Modules
//!
//! - [`scene`] - [`DemolitionScene`], the per-frame composition root
//! - [`world`] - City, buildings, debris, and impact fx pools
//! - [`systems`] - Projectiles, drone director, economy, upgrades, saves
//! - [`physics`] - Ray/AABB intersection and surface normals
//! - [`render`] - Instance buffer layouts and color packing
//! - [`config`] - Gameplay tuning and performance profiles
//!
//! # Example
//!
//! ```ignore
//! use scrap_city::scene::DemolitionScene;
//! use scrap_city::config::DemolitionTuning;
//! use scrap_city::systems::{SaveProfile, load_or_fresh};
//! use glam::Vec3;
//!
//! let profile = load_or_fresh("save.json".as_ref(), now_seconds);
//! let mut scene = DemolitionScene::new(&profile, DemolitionTuning::default(), seed);
//! scene.apply_offline_gain(&profile, now_seconds);
//!
//! loop {
//!     scene.update(dt);
//!     if player_clicked {
//!         scene.fire_ray(camera_pos, camera_dir);
//!     }
//!     // draw scene.city buildings, scene.debris, scene.fx instance slices
//! }
//! ```

pub mod config;
pub mod physics;
pub mod render;
pub mod scene;
pub mod systems;
pub mod world;

pub use scene::{DEFAULT_VIEWPOINT, DemolitionScene, SceneStats};
