//! Match controller and fixed timestep tick
//!
//! `Game` owns every piece of match state and is the only thing a host talks
//! to: `start()`, `advance(dt)` once per rendered frame, `key()` per key
//! press, and `drain_events()` to feed the presentation layer.

use std::time::Duration;

use super::judge::{self, HitRegion, JudgePolicy, Verdict};
use super::motion;
use super::reaper;
use super::registry::TargetRegistry;
use super::schedule::{Scheduler, Task};
use super::spawn::SpawnScheduler;
use super::state::{
    GameEvent, GamePhase, Lanes, MatchState, MatchStats, RetireCause, Target, TargetId,
};
use crate::consts::*;
use crate::delta_factor;
use crate::tuning::{IDLE_PROMPT, Tuning, TuningError};

/// A key press delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// A printable character; anything but ASCII letters is ignored
    Char(char),
    /// Word mode: drop the last typed letter
    Backspace,
    /// Word mode: judge the buffer as typed
    Submit,
    /// Word mode: empty the buffer without judging
    Clear,
}

/// One match of Type Saber
#[derive(Debug, Clone)]
pub struct Game {
    tuning: Tuning,
    lanes: Lanes,
    policy: JudgePolicy,
    registry: TargetRegistry,
    spawner: SpawnScheduler,
    scheduler: Scheduler,
    state: MatchState,
    events: Vec<GameEvent>,
    /// Host frame time not yet consumed by fixed steps (seconds)
    accumulator: f32,
    /// Simulation tick counter
    time_ticks: u64,
    message: Option<String>,
    message_generation: u64,
    next_symbol: Option<String>,
}

impl Game {
    /// Create an idle match. The seed fixes every spawn decision.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            lanes: Lanes::new(tuning.lanes.clone()),
            policy: JudgePolicy::from_tuning(&tuning),
            registry: TargetRegistry::new(),
            spawner: SpawnScheduler::new(&tuning, seed),
            scheduler: Scheduler::new(),
            state: MatchState::default(),
            events: Vec::new(),
            accumulator: 0.0,
            time_ticks: 0,
            message: None,
            message_generation: 0,
            next_symbol: None,
            tuning,
        })
    }

    /// Idle -> Running. Returns `false` (and changes nothing) if already running.
    pub fn start(&mut self) -> bool {
        if self.state.phase == GamePhase::Running {
            log::warn!("start() ignored: match already running");
            return false;
        }
        self.state.phase = GamePhase::Running;
        self.events.push(GameEvent::Started);

        let stagger = Duration::from_millis(self.tuning.burst_stagger_ms);
        for i in 0..self.tuning.burst_count {
            self.scheduler.schedule_in(stagger * i, Task::BurstSpawn);
        }
        self.scheduler.schedule_in(
            Duration::from_millis(self.tuning.spawn_interval_ms),
            Task::SpawnTick,
        );

        log::info!(
            "Match started: {} mode, {} lanes, cap {}",
            self.tuning.mode.as_str(),
            self.lanes.len(),
            self.spawner.live_cap()
        );

        // Zero-delay burst spawns appear right away
        self.run_due_tasks();
        self.refresh_next_target();
        true
    }

    /// Feed elapsed host frame time (seconds); runs as many fixed steps as fit
    pub fn advance(&mut self, dt: f32) {
        if self.state.phase != GamePhase::Running || !dt.is_finite() {
            return;
        }
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of trying to catch up next frame
            self.accumulator = self.accumulator.min(SIM_DT);
        }
    }

    /// Advance the simulation by exactly one fixed step
    pub fn step(&mut self) {
        if self.state.phase != GamePhase::Running {
            return;
        }
        self.time_ticks += 1;
        self.scheduler.advance(SIM_STEP);
        self.run_due_tasks();

        motion::integrate(&mut self.registry, self.tuning.speed, delta_factor());
        reaper::sweep_expired(
            &mut self.registry,
            &mut self.state,
            self.tuning.destroy_distance,
            self.tuning.scoring.expiry_penalty,
            &mut self.events,
        );
        self.refresh_next_target();
    }

    /// Handle a key press. Returns the verdict when the key was judged.
    pub fn key(&mut self, key: KeyInput) -> Option<Verdict> {
        if self.state.phase != GamePhase::Running {
            return None;
        }
        match self.policy {
            JudgePolicy::DepthZone(zone) => self.key_letter(&zone, key),
            JudgePolicy::LaneRing(ring) => self.key_letter(&ring, key),
            JudgePolicy::PrefixWord => self.key_word(key),
        }
    }

    fn key_letter<R: HitRegion>(&mut self, region: &R, key: KeyInput) -> Option<Verdict> {
        let KeyInput::Char(c) = key else {
            return None;
        };
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let verdict = judge::judge_letter(
            region,
            &self.registry,
            &self.lanes,
            c,
            &self.tuning.scoring,
        );
        self.resolve(&verdict);
        Some(verdict)
    }

    fn key_word(&mut self, key: KeyInput) -> Option<Verdict> {
        match key {
            KeyInput::Char(c) if c.is_ascii_alphabetic() => {
                if self.state.buffer.len() >= self.tuning.longest_symbol() {
                    return None;
                }
                self.state.buffer.push(c.to_ascii_uppercase());
            }
            KeyInput::Char(_) => return None,
            KeyInput::Backspace => {
                self.state.buffer.pop()?;
            }
            KeyInput::Submit => {}
            KeyInput::Clear => {
                if !self.state.buffer.is_empty() {
                    self.state.buffer.clear();
                    judge::arm_prefix_matches(&mut self.registry, "");
                }
                return None;
            }
        }

        judge::arm_prefix_matches(&mut self.registry, &self.state.buffer);
        let verdict = judge::judge_word(&self.registry, &self.state.buffer, &self.tuning.scoring)?;
        self.resolve(&verdict);
        self.state.buffer.clear();
        judge::arm_prefix_matches(&mut self.registry, "");
        Some(verdict)
    }

    /// Apply a verdict: retire its target, score it, show the result line
    fn resolve(&mut self, verdict: &Verdict) {
        log::debug!(
            "Judged '{}': {} ({:+})",
            verdict.symbol,
            verdict.judgement.label(),
            verdict.points
        );
        self.state.stats.record(verdict.judgement);
        if let Some(id) = verdict.target {
            reaper::retire(&mut self.registry, id, RetireCause::Hit, &mut self.events);
        }

        let delta = self.state.apply_delta(verdict.points);
        self.events.push(GameEvent::Judged {
            symbol: verdict.symbol.clone(),
            judgement: verdict.judgement,
            points: verdict.points,
        });
        if delta != 0 {
            self.events.push(GameEvent::ScoreChanged {
                score: self.state.score,
                delta,
            });
        }

        self.show_message(verdict.message());
        self.refresh_next_target();
    }

    fn run_due_tasks(&mut self) {
        while let Some((fire_at, task)) = self.scheduler.pop_due() {
            match task {
                Task::BurstSpawn => {
                    let id = self.spawner.spawn(&mut self.registry, &self.lanes);
                    self.announce_spawn(id);
                }
                Task::SpawnTick => {
                    if let Some(id) = self.spawner.try_spawn(&mut self.registry, &self.lanes) {
                        self.announce_spawn(id);
                    }
                    let interval = Duration::from_millis(self.tuning.spawn_interval_ms);
                    self.scheduler.schedule_at(fire_at + interval, Task::SpawnTick);
                }
                Task::ClearMessage { generation } => {
                    if generation == self.message_generation && self.message.take().is_some() {
                        self.events.push(GameEvent::MessageChanged { text: None });
                    }
                }
            }
        }
    }

    fn announce_spawn(&mut self, id: TargetId) {
        if self.policy.is_word() {
            judge::arm_prefix_matches(&mut self.registry, &self.state.buffer);
        }
        let Some(target) = self.registry.get(id) else {
            return;
        };
        log::debug!(
            "Spawned target {} '{}' in lane {}",
            id.0,
            target.symbol,
            target.lane.0
        );
        self.events.push(GameEvent::TargetSpawned {
            id,
            lane: target.lane,
            symbol: target.symbol.clone(),
            pos: target.pos,
        });
    }

    fn show_message(&mut self, text: String) {
        self.message_generation += 1;
        self.message = Some(text.clone());
        self.events.push(GameEvent::MessageChanged { text: Some(text) });
        self.scheduler.schedule_in(
            Duration::from_millis(self.tuning.message_ms),
            Task::ClearMessage {
                generation: self.message_generation,
            },
        );
    }

    fn refresh_next_target(&mut self) {
        let symbol = self.next_target().map(|t| t.symbol.clone());
        if symbol != self.next_symbol {
            self.next_symbol = symbol.clone();
            self.events.push(GameEvent::NextTargetChanged { symbol });
        }
    }

    /// Live target with the smallest Z (first spawned on ties)
    pub fn next_target(&self) -> Option<&Target> {
        self.registry
            .all()
            .min_by(|a, b| a.pos.z.total_cmp(&b.pos.z))
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> + Clone {
        self.registry.all()
    }

    pub fn target_count(&self) -> usize {
        self.registry.len()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == GamePhase::Running
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn stats(&self) -> MatchStats {
        self.state.stats
    }

    /// Word-mode typing buffer
    pub fn buffer(&self) -> &str {
        &self.state.buffer
    }

    /// Result line currently on screen, or the idle prompt
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(IDLE_PROMPT)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn lanes(&self) -> &Lanes {
        &self.lanes
    }

    pub fn policy(&self) -> JudgePolicy {
        self.policy
    }

    /// Simulation time since start
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}
