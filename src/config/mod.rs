//! Config Module
//!
//! Centralized configuration: gameplay tuning and performance profiles.

pub mod perf;
pub mod tuning;

pub use perf::{PerfMode, PerfProfile};
pub use tuning::DemolitionTuning;
