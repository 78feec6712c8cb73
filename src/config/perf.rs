//! Performance Profiles
//!
//! Two quality presets trading city size and particle budgets for frame
//! time. Switching modes at runtime rebuilds the city and resizes the
//! debris window; the scene handles that wiring.

use serde::{Deserialize, Serialize};

/// Runtime quality preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerfMode {
    Low,
    #[default]
    High,
}

impl PerfMode {
    /// The other mode (used by the quality toggle).
    pub fn toggled(self) -> Self {
        match self {
            PerfMode::Low => PerfMode::High,
            PerfMode::High => PerfMode::Low,
        }
    }

    /// Display label for the HUD.
    pub fn label(self) -> &'static str {
        match self {
            PerfMode::Low => "Low",
            PerfMode::High => "High",
        }
    }

    /// Budget bundle for this mode.
    pub fn profile(self) -> PerfProfile {
        match self {
            PerfMode::Low => PerfProfile {
                target_blocks: 4200,
                city_grid: 3,
                plot_spacing: 20.0,
                debris_cap: 250,
                collapse_batch: 260,
                pixel_ratio: 1.0,
            },
            PerfMode::High => PerfProfile {
                target_blocks: 12000,
                city_grid: 4,
                plot_spacing: 18.0,
                debris_cap: 600,
                collapse_batch: 520,
                pixel_ratio: 1.5,
            },
        }
    }
}

/// Simulation and render budgets derived from a [`PerfMode`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerfProfile {
    /// Total block budget split across all city plots
    pub target_blocks: usize,
    /// Side length of the square plot grid
    pub city_grid: usize,
    /// Distance between neighbouring plot centers (meters)
    pub plot_spacing: f32,
    /// Usable debris particle window
    pub debris_cap: usize,
    /// Blocks removed per building per frame during collapse
    pub collapse_batch: usize,
    /// Upper bound on the renderer's device pixel ratio
    pub pixel_ratio: f32,
}
