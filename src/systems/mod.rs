//! Systems Module
//!
//! The simulation systems that drive demolition: projectiles, the drone
//! director, the scrap economy, upgrades, and save persistence.

pub mod drone_system;
pub mod economy;
pub mod projectile_system;
pub mod save;
pub mod upgrades;

pub use drone_system::DroneDirector;
pub use economy::Economy;
pub use projectile_system::{PROJECTILE_POOL, ProjectileKind, ProjectileSystem};
pub use save::{SaveError, SaveProfile, load_or_fresh, load_profile, save_profile};
pub use upgrades::{UpgradeEffects, UpgradeKind, UpgradeLevels, Upgrades};
