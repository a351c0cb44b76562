//! Data-driven game balance
//!
//! Every game mode ships a built-in preset. A JSON tuning file may override
//! any subset of fields; missing fields keep the preset value for the mode
//! named in the file.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Letters typed in the letter modes (home row keys)
pub const HOME_ROW: [&str; 9] = ["A", "S", "D", "F", "G", "H", "J", "K", "L"];

/// Words typed in word mode
pub const WORD_BANK: [&str; 18] = [
    "ASK", "SAD", "ADD", "LAD", "GAS", "HAS", "ALL", "FALL", "HALL", "DASH", "FLAG", "GALA",
    "SAGA", "SALAD", "FLASK", "GLASS", "SHALL", "KAYAK",
];

/// Default lane X offsets (4 lanes)
pub const DEFAULT_LANES: [f32; 4] = [-6.0, -2.0, 2.0, 6.0];

/// Prompt shown when no judge result is on screen
pub const IDLE_PROMPT: &str = "Hit cubes in the zone!";

/// Which game variant (and judging policy) is played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Single letters judged against a depth interval
    #[default]
    Letters,
    /// Single letters judged against a circle around each lane's judge point
    LaneRings,
    /// Whole words judged by exact match of the typed buffer
    Words,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Letters => "letters",
            GameMode::LaneRings => "lane_rings",
            GameMode::Words => "words",
        }
    }

}

impl FromStr for GameMode {
    type Err = TuningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "letters" | "letter" => Ok(GameMode::Letters),
            "lane_rings" | "rings" => Ok(GameMode::LaneRings),
            "words" | "word" => Ok(GameMode::Words),
            _ => Err(TuningError::Invalid(format!(
                "unknown game mode {s:?} (expected letters, lane_rings or words)"
            ))),
        }
    }
}

/// Hit region geometry for the judging policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneTuning {
    /// Depth interval `[start, end]` along Z
    Depth {
        start: f32,
        end: f32,
        /// Max distance from the zone centre that still counts as perfect
        perfect_radius: f32,
    },
    /// Circle in the XZ plane around (lane X, `judge_z`)
    Ring {
        judge_z: f32,
        hit_radius: f32,
        perfect_radius: f32,
    },
    /// No spatial region; words match anywhere on the field
    Anywhere,
}

/// Point values awarded or deducted per outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoring {
    pub perfect: u32,
    pub hit: u32,
    pub word: u32,
    /// Deducted for a judged key that eliminated nothing
    pub miss_penalty: u32,
    /// Deducted when a target flies past the destroy boundary
    pub expiry_penalty: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            perfect: 20,
            hit: 10,
            word: 10,
            miss_penalty: 2,
            expiry_penalty: 5,
        }
    }
}

/// Complete balance sheet for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub mode: GameMode,
    /// Lane X offsets, left to right
    pub lanes: Vec<f32>,
    /// Symbols drawn uniformly at spawn
    pub bank: Vec<String>,
    /// World units per reference frame (60 Hz)
    pub speed: f32,
    /// Z where targets appear
    pub spawn_z: f32,
    /// Targets with Z beyond this have flown past the player
    pub destroy_distance: f32,
    /// Half-height of the uniform vertical spawn jitter
    pub vertical_jitter: f32,
    pub zone: ZoneTuning,
    pub scoring: Scoring,
    /// Steady-state spawns are skipped while this many targets are live
    pub live_cap: usize,
    pub spawn_interval_ms: u64,
    /// Targets spawned right after start, one per stagger interval
    pub burst_count: u32,
    pub burst_stagger_ms: u64,
    /// How long a judge result stays on screen
    pub message_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::preset(GameMode::Letters)
    }
}

impl Tuning {
    /// Built-in balance for a game mode
    pub fn preset(mode: GameMode) -> Self {
        let letters = || HOME_ROW.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        match mode {
            GameMode::Letters => {
                let (start, end) = (6.0, 10.0);
                Self {
                    mode,
                    lanes: DEFAULT_LANES.to_vec(),
                    bank: letters(),
                    speed: 0.12,
                    spawn_z: -80.0,
                    destroy_distance: 12.0,
                    vertical_jitter: 3.0,
                    zone: ZoneTuning::Depth {
                        start,
                        end,
                        // 20% of the zone depth
                        perfect_radius: (end - start) * 0.2,
                    },
                    scoring: Scoring::default(),
                    live_cap: 5,
                    spawn_interval_ms: 3000,
                    burst_count: 3,
                    burst_stagger_ms: 2000,
                    message_ms: 800,
                }
            }
            GameMode::LaneRings => Self {
                mode,
                zone: ZoneTuning::Ring {
                    judge_z: 8.0,
                    hit_radius: 2.0,
                    perfect_radius: 0.6,
                },
                ..Self::preset(GameMode::Letters)
            },
            GameMode::Words => Self {
                mode,
                bank: WORD_BANK.iter().map(|s| s.to_string()).collect(),
                speed: 0.08,
                zone: ZoneTuning::Anywhere,
                live_cap: 8,
                spawn_interval_ms: 2500,
                message_ms: 600,
                ..Self::preset(GameMode::Letters)
            },
        }
    }

    /// Parse a JSON tuning document.
    ///
    /// Fields left out of the document take the preset value of the mode the
    /// document names (or letters mode when it names none).
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let serde_json::Value::Object(overrides) = serde_json::from_str(json)? else {
            return Err(TuningError::Invalid("tuning must be a JSON object".into()));
        };
        let mode = match overrides.get("mode") {
            Some(mode) => GameMode::deserialize(mode)?,
            None => GameMode::default(),
        };

        let mut merged = serde_json::to_value(Self::preset(mode))?;
        merge_json(&mut merged, serde_json::Value::Object(overrides));

        let tuning: Tuning = serde_json::from_value(merged)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded {} tuning from {}", tuning.mode.as_str(), path.display());
        Ok(tuning)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lanes.is_empty() {
            return Err(TuningError::Invalid("at least one lane is required".into()));
        }
        if self.bank.is_empty() {
            return Err(TuningError::Invalid("symbol bank is empty".into()));
        }
        if let Some(bad) = self
            .bank
            .iter()
            .find(|s| s.is_empty() || !s.chars().all(|c| c.is_ascii_uppercase()))
        {
            return Err(TuningError::Invalid(format!(
                "bank entry {bad:?} must be uppercase ASCII letters"
            )));
        }
        if self.mode != GameMode::Words && self.bank.iter().any(|s| s.len() != 1) {
            return Err(TuningError::Invalid(
                "letter modes need single-letter bank entries".into(),
            ));
        }
        if !(self.speed > 0.0) {
            return Err(TuningError::Invalid("speed must be positive".into()));
        }
        if self.live_cap == 0 {
            return Err(TuningError::Invalid("live cap must be at least 1".into()));
        }
        if self.spawn_interval_ms == 0 {
            return Err(TuningError::Invalid("spawn interval must be positive".into()));
        }
        let jitter = self.vertical_jitter;
        if !(jitter >= 0.0) || !(2.0 * jitter).is_finite() {
            return Err(TuningError::Invalid(format!(
                "vertical jitter {jitter} must be finite and non-negative"
            )));
        }
        if self.spawn_z >= self.destroy_distance {
            return Err(TuningError::Invalid(
                "spawn z must lie before the destroy distance".into(),
            ));
        }

        let within_field = |z: f32| z > self.spawn_z && z < self.destroy_distance;
        match (self.mode, self.zone) {
            (GameMode::Letters, ZoneTuning::Depth { start, end, perfect_radius }) => {
                if !(start < end) || !within_field(start) || !within_field(end) {
                    return Err(TuningError::Invalid(format!(
                        "hit zone [{start}, {end}] must be ordered and inside the field"
                    )));
                }
                if perfect_radius < 0.0 || perfect_radius > (end - start) / 2.0 {
                    return Err(TuningError::Invalid(
                        "perfect radius must fit inside the hit zone".into(),
                    ));
                }
            }
            (GameMode::LaneRings, ZoneTuning::Ring { judge_z, hit_radius, perfect_radius }) => {
                if !within_field(judge_z) {
                    return Err(TuningError::Invalid(format!(
                        "judge z {judge_z} must be inside the field"
                    )));
                }
                if !(hit_radius > 0.0) || perfect_radius < 0.0 || perfect_radius > hit_radius {
                    return Err(TuningError::Invalid(
                        "ring radii must satisfy 0 <= perfect <= hit".into(),
                    ));
                }
            }
            (GameMode::Words, ZoneTuning::Anywhere) => {}
            (mode, zone) => {
                return Err(TuningError::Invalid(format!(
                    "zone {zone:?} does not fit {} mode",
                    mode.as_str()
                )));
            }
        }
        Ok(())
    }

    /// Longest symbol in the bank
    pub fn longest_symbol(&self) -> usize {
        self.bank.iter().map(String::len).max().unwrap_or(0)
    }
}

/// Overlay `overrides` onto `base`, descending into objects so a partial
/// nested object keeps the remaining preset fields. A tagged object whose
/// `kind` changes is replaced whole.
fn merge_json(base: &mut serde_json::Value, overrides: serde_json::Value) {
    use serde_json::Value;

    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides))
            if overrides
                .get("kind")
                .is_none_or(|kind| base.get("kind") == Some(kind)) =>
        {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Failure to load a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}
