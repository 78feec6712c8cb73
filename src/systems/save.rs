//! Save Profile - JSON persistence for scrap, upgrades, and perf mode
//!
//! The on-disk format is a single JSON object with camelCase keys, matching
//! the shape older builds wrote. Loading is deliberately forgiving: fields
//! may be missing, levels may be fractional or negative, the perf mode may
//! be garbage; everything is sanitized into a valid profile, and a file
//! that cannot be read at all yields a fresh profile instead of an error
//! the player has to deal with.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{DemolitionTuning, PerfMode};
use crate::systems::upgrades::{UpgradeEffects, UpgradeLevels};

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors that can occur while reading or writing a save profile.
#[derive(Debug)]
pub enum SaveError {
    /// Standard I/O error.
    Io(std::io::Error),
    /// JSON serialization/deserialization error.
    Json(serde_json::Error),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {e}"),
            SaveError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Json(e)
    }
}

// ============================================================================
// PROFILE
// ============================================================================

/// Everything that persists across sessions. Loading always goes through
/// the permissive [`RawProfile`] mirror and `sanitize`, so a constructed
/// `SaveProfile` is valid by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfile {
    pub scrap: f64,
    pub upgrades: UpgradeLevels,
    pub perf_mode: PerfMode,
    /// Unix timestamp in seconds at the moment of saving
    pub last_timestamp: f64,
}

impl SaveProfile {
    /// Profile for a first run.
    pub fn fresh(now_seconds: f64) -> Self {
        Self {
            scrap: 0.0,
            upgrades: UpgradeLevels::default(),
            perf_mode: PerfMode::default(),
            last_timestamp: now_seconds,
        }
    }

    /// Scrap the drone earned while the game was closed: elapsed time is
    /// capped, divided into shots at the current cadence, and each shot is
    /// paid a boosted tier-1 reward.
    pub fn offline_drone_gain(
        &self,
        now_seconds: f64,
        effects: &UpgradeEffects,
        tuning: &DemolitionTuning,
    ) -> f64 {
        if effects.drone_level == 0 {
            return 0.0;
        }
        let elapsed = (now_seconds - self.last_timestamp).max(0.0);
        let capped = elapsed.min(tuning.offline_hours_cap * 3600.0);
        let per_shot = tuning.block_reward(1, effects.scrap_multiplier) * tuning.offline_reward_factor;
        (capped / effects.drone_interval as f64) * per_shot
    }
}

/// Permissive mirror of the on-disk shape. Every field is optional, level
/// counts accept any JSON number (older builds wrote fractions), and
/// unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawProfile {
    scrap: f64,
    upgrades: RawUpgrades,
    perf_mode: String,
    last_timestamp: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawUpgrades {
    damage: f64,
    radius: f64,
    multiplier: f64,
    drone: f64,
    weakness: f64,
}

fn sanitize(raw: RawProfile, now_seconds: f64) -> SaveProfile {
    fn level(v: f64) -> u32 {
        if v.is_finite() { v.max(0.0).floor() as u32 } else { 0 }
    }

    SaveProfile {
        scrap: if raw.scrap.is_finite() { raw.scrap.max(0.0) } else { 0.0 },
        upgrades: UpgradeLevels {
            damage: level(raw.upgrades.damage),
            radius: level(raw.upgrades.radius),
            multiplier: level(raw.upgrades.multiplier),
            drone: level(raw.upgrades.drone),
            weakness: level(raw.upgrades.weakness),
        },
        perf_mode: if raw.perf_mode == "low" {
            PerfMode::Low
        } else {
            PerfMode::High
        },
        last_timestamp: raw
            .last_timestamp
            .filter(|t| t.is_finite())
            .unwrap_or(now_seconds),
    }
}

// ============================================================================
// SAVE / LOAD
// ============================================================================

/// Write the profile as JSON, creating parent directories as needed.
pub fn save_profile(path: &Path, profile: &SaveProfile) -> Result<(), SaveError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec(profile)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read and sanitize a profile. `now_seconds` backfills a missing or
/// corrupt timestamp.
pub fn load_profile(path: &Path, now_seconds: f64) -> Result<SaveProfile, SaveError> {
    let data = std::fs::read(path)?;
    let raw: RawProfile = serde_json::from_slice(&data)?;
    Ok(sanitize(raw, now_seconds))
}

/// Like [`load_profile`], but any failure (missing file, unparseable JSON)
/// falls back to a fresh profile so a corrupt save never blocks startup.
pub fn load_or_fresh(path: &Path, now_seconds: f64) -> SaveProfile {
    match load_profile(path, now_seconds) {
        Ok(profile) => profile,
        Err(err) => {
            log::warn!("save profile unreadable ({err}), starting fresh");
            SaveProfile::fresh(now_seconds)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
