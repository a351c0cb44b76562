//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod judge;
pub mod motion;
pub mod reaper;
pub mod registry;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;

pub use judge::{DepthZone, HitRegion, JudgePolicy, LaneRing, Verdict};
pub use registry::TargetRegistry;
pub use schedule::{Scheduler, Task};
pub use spawn::SpawnScheduler;
pub use state::{
    GameEvent, GamePhase, Judgement, Lane, Lanes, MatchState, MatchStats, RetireCause, Target,
    TargetId, VisualState,
};
pub use tick::{Game, KeyInput};
