//! Game state and core simulation types

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Identity of a target, unique for the lifetime of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Index into the lane table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lane(pub usize);

/// Fixed, ordered lane X offsets shared by spawning and judging
#[derive(Debug, Clone, PartialEq)]
pub struct Lanes {
    offsets: Vec<f32>,
}

impl Lanes {
    pub fn new(offsets: Vec<f32>) -> Self {
        Self { offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// X offset of a lane, or `None` when the index is out of range
    pub fn offset(&self, lane: Lane) -> Option<f32> {
        self.offsets.get(lane.0).copied()
    }
}

/// Presentation hint written by word judging; gameplay never reads it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisualState {
    #[default]
    Normal,
    /// The typed buffer is a prefix of this target's word
    Armed,
}

/// A cube flying toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub lane: Lane,
    pub pos: Vec3,
    pub symbol: String,
    pub visual: VisualState,
}

impl Target {
    pub fn new(id: TargetId, lane: Lane, pos: Vec3, symbol: impl Into<String>) -> Self {
        Self {
            id,
            lane,
            pos,
            symbol: symbol.into(),
            visual: VisualState::Normal,
        }
    }

    /// Number of leading characters of the symbol matched by `buffer`
    pub fn match_prefix(&self, buffer: &str) -> usize {
        self.symbol
            .chars()
            .zip(buffer.chars())
            .take_while(|(a, b)| a == b)
            .count()
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for start; input is ignored
    #[default]
    Idle,
    /// Active gameplay (terminal)
    Running,
}

/// Outcome of one judged input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Judgement {
    /// Eliminated near the centre of the hit region
    Perfect,
    /// Eliminated inside the hit region
    Hit,
    /// Word typed in full
    Complete,
    /// A matching target exists but none is inside the hit region
    TooEarlyOrLate,
    /// No live target carries the typed symbol
    NoTarget,
}

impl Judgement {
    pub fn label(&self) -> &'static str {
        match self {
            Judgement::Perfect => "PERFECT",
            Judgement::Hit => "HIT",
            Judgement::Complete => "COMPLETE",
            Judgement::TooEarlyOrLate => "TOO EARLY/LATE",
            Judgement::NoTarget => "NO TARGET",
        }
    }

    /// True when the judged input removed a target
    pub fn eliminates(&self) -> bool {
        matches!(
            self,
            Judgement::Perfect | Judgement::Hit | Judgement::Complete
        )
    }
}

/// Why a target left the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetireCause {
    /// Destroyed by a judged input
    Hit,
    /// Flew past the destroy boundary unhit
    Expired,
}

/// Per-match tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub perfect: u32,
    pub hit: u32,
    pub words: u32,
    pub too_early_or_late: u32,
    pub no_target: u32,
    pub expired: u32,
}

impl MatchStats {
    pub fn record(&mut self, judgement: Judgement) {
        match judgement {
            Judgement::Perfect => self.perfect += 1,
            Judgement::Hit => self.hit += 1,
            Judgement::Complete => self.words += 1,
            Judgement::TooEarlyOrLate => self.too_early_or_late += 1,
            Judgement::NoTarget => self.no_target += 1,
        }
    }

    pub fn eliminations(&self) -> u32 {
        self.perfect + self.hit + self.words
    }

    /// Share of judged inputs that eliminated a target
    pub fn accuracy(&self) -> Option<f32> {
        let judged = self.eliminations() + self.too_early_or_late + self.no_target;
        (judged > 0).then(|| self.eliminations() as f32 / judged as f32)
    }
}

/// Score, phase and typing buffer for one match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: GamePhase,
    /// Never negative; deductions clamp at zero
    pub score: u64,
    /// Word-mode typing buffer
    pub buffer: String,
    pub stats: MatchStats,
}

impl MatchState {
    /// Apply a signed score change, clamping at zero. Returns the applied delta.
    pub fn apply_delta(&mut self, delta: i64) -> i64 {
        let before = self.score;
        self.score = self.score.saturating_add_signed(delta);
        self.score as i64 - before as i64
    }
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    TargetSpawned {
        id: TargetId,
        lane: Lane,
        symbol: String,
        pos: Vec3,
    },
    /// Release render resources; `pos` is the last known position
    TargetRetired {
        id: TargetId,
        pos: Vec3,
        cause: RetireCause,
    },
    ScoreChanged {
        score: u64,
        delta: i64,
    },
    /// `points` is the nominal award or penalty, before the zero floor
    Judged {
        symbol: String,
        judgement: Judgement,
        points: i64,
    },
    /// Symbol of the upcoming target, `None` when the field is empty
    NextTargetChanged {
        symbol: Option<String>,
    },
    /// Transient result line; `None` restores the idle prompt
    MessageChanged {
        text: Option<String>,
    },
}
