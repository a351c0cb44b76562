//! Type Saber - A lane-based typing arcade game
//!
//! Cubes bearing letters (or words) fly down fixed lanes toward the player.
//! Typing a cube's symbol while it crosses the hit zone destroys it and scores
//! points based on timing.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (targets, spawning, judging, match state)
//! - `tuning`: Data-driven game balance for each game mode
//! - `autoplay`: Demo player that types for you

pub mod autoplay;
pub mod sim;
pub mod tuning;

pub use autoplay::Autoplay;
pub use tuning::{GameMode, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Frame interval the per-frame tuning values are expressed in (60 Hz)
    pub const REFERENCE_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest host frame accepted by a single advance
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Simulation step as a clock duration
    pub const SIM_STEP: Duration = Duration::from_nanos(8_333_333);
}

/// Fraction of a reference frame covered by one simulation step
#[inline]
pub fn delta_factor() -> f32 {
    consts::SIM_DT / consts::REFERENCE_DT
}
