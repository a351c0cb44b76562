//! Hit judging
//!
//! Three policies, one per game mode:
//! - [`DepthZone`]: a letter counts while the cube is inside a depth interval;
//!   perfect near the interval's centre.
//! - [`LaneRing`]: a letter counts while the cube is within a radius of its
//!   lane's judge point in the XZ plane.
//! - Prefix words: the typed buffer must equal a cube's word exactly.
//!
//! Judging is pure: it picks at most one target and a point value, and the
//! match controller applies the outcome.

use serde::Serialize;

use super::registry::TargetRegistry;
use super::state::{Judgement, Lanes, Target, TargetId, VisualState};
use crate::tuning::{Scoring, Tuning, ZoneTuning};

/// Result of judging one input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// What the player typed (letter, or the completed word)
    pub symbol: String,
    pub judgement: Judgement,
    /// Nominal points; negative for penalties
    pub points: i64,
    /// Target to eliminate, if any
    pub target: Option<TargetId>,
}

impl Verdict {
    /// Result line shown to the player, e.g. `A - PERFECT! +20`
    pub fn message(&self) -> String {
        format!("{} - {}! {:+}", self.symbol, self.judgement.label(), self.points)
    }
}

/// Spatial test for the letter policies
pub trait HitRegion {
    /// Distance from the region's judge point, or `None` when the target is
    /// outside the region
    fn distance(&self, target: &Target, lanes: &Lanes) -> Option<f32>;

    /// Distances at or under this radius are perfect
    fn perfect_radius(&self) -> f32;
}

/// Depth interval `[start, end]` along Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthZone {
    pub start: f32,
    pub end: f32,
    pub perfect_radius: f32,
}

impl DepthZone {
    pub fn center(&self) -> f32 {
        self.start + (self.end - self.start) / 2.0
    }
}

impl HitRegion for DepthZone {
    fn distance(&self, target: &Target, _lanes: &Lanes) -> Option<f32> {
        let z = target.pos.z;
        (z >= self.start && z <= self.end).then(|| (z - self.center()).abs())
    }

    fn perfect_radius(&self) -> f32 {
        self.perfect_radius
    }
}

/// Circle around (lane X, `judge_z`) in the XZ plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneRing {
    pub judge_z: f32,
    pub hit_radius: f32,
    pub perfect_radius: f32,
}

impl HitRegion for LaneRing {
    fn distance(&self, target: &Target, lanes: &Lanes) -> Option<f32> {
        let lane_x = lanes.offset(target.lane)?;
        let d = (target.pos.x - lane_x).hypot(target.pos.z - self.judge_z);
        (d <= self.hit_radius).then_some(d)
    }

    fn perfect_radius(&self) -> f32 {
        self.perfect_radius
    }
}

/// Judging policy selected by the game mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JudgePolicy {
    DepthZone(DepthZone),
    LaneRing(LaneRing),
    PrefixWord,
}

impl JudgePolicy {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        match tuning.zone {
            ZoneTuning::Depth {
                start,
                end,
                perfect_radius,
            } => JudgePolicy::DepthZone(DepthZone {
                start,
                end,
                perfect_radius,
            }),
            ZoneTuning::Ring {
                judge_z,
                hit_radius,
                perfect_radius,
            } => JudgePolicy::LaneRing(LaneRing {
                judge_z,
                hit_radius,
                perfect_radius,
            }),
            ZoneTuning::Anywhere => JudgePolicy::PrefixWord,
        }
    }

    /// Whether inputs are whole words accumulated in a buffer
    pub fn is_word(&self) -> bool {
        matches!(self, JudgePolicy::PrefixWord)
    }
}

/// Judge a single typed letter against the live targets.
///
/// Among targets carrying the letter and inside the region, the one closest
/// to the judge point wins; ties go to the earliest spawned. A letter that
/// matches nothing in the region is a miss and carries the miss penalty.
pub fn judge_letter<R: HitRegion>(
    region: &R,
    registry: &TargetRegistry,
    lanes: &Lanes,
    letter: char,
    scoring: &Scoring,
) -> Verdict {
    let letter = letter.to_ascii_uppercase();
    let symbol = letter.to_string();

    let mut any_carrier = false;
    let mut best: Option<(TargetId, f32)> = None;
    for target in registry.all().filter(|t| t.symbol == symbol) {
        any_carrier = true;
        let Some(distance) = region.distance(target, lanes) else {
            continue;
        };
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((target.id, distance));
        }
    }

    let (judgement, points, target) = match best {
        Some((id, distance)) if distance <= region.perfect_radius() => {
            (Judgement::Perfect, i64::from(scoring.perfect), Some(id))
        }
        Some((id, _)) => (Judgement::Hit, i64::from(scoring.hit), Some(id)),
        None if any_carrier => (
            Judgement::TooEarlyOrLate,
            -i64::from(scoring.miss_penalty),
            None,
        ),
        None => (Judgement::NoTarget, -i64::from(scoring.miss_penalty), None),
    };

    Verdict {
        symbol,
        judgement,
        points,
        target,
    }
}

/// Mark targets whose word starts with the buffer as armed, all others normal.
/// An empty buffer arms nothing.
pub fn arm_prefix_matches(registry: &mut TargetRegistry, buffer: &str) {
    for target in registry.all_mut() {
        target.visual = if !buffer.is_empty() && target.symbol.starts_with(buffer) {
            VisualState::Armed
        } else {
            VisualState::Normal
        };
    }
}

/// Judge the word buffer. The first live target (spawn order) whose word
/// equals the buffer is completed; no match yields no verdict and no penalty.
pub fn judge_word(registry: &TargetRegistry, buffer: &str, scoring: &Scoring) -> Option<Verdict> {
    if buffer.is_empty() {
        return None;
    }
    let target = registry.all().find(|t| t.symbol == buffer)?;
    Some(Verdict {
        symbol: target.symbol.clone(),
        judgement: Judgement::Complete,
        points: i64::from(scoring.word),
        target: Some(target.id),
    })
}
