//! Deferred actions on the simulation clock
//!
//! Replaces wall-clock timers: every delayed action is a `{fire_at, action}`
//! record, fired in `(fire_at, insertion)` order as the clock advances. Tests
//! drive the clock directly instead of sleeping.

use std::time::Duration;

/// Actions the match controller defers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// One opening-burst spawn, not gated by the live cap
    BurstSpawn,
    /// Steady-state spawn; re-arms itself one interval later
    SpawnTick,
    /// Restore the idle prompt if message `generation` is still showing
    ClearMessage { generation: u64 },
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    fire_at: Duration,
    seq: u64,
    task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    next_seq: u64,
    tasks: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward; due tasks are collected with [`Self::pop_due`]
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }

    pub fn schedule_at(&mut self, fire_at: Duration, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(Scheduled { fire_at, seq, task });
    }

    pub fn schedule_in(&mut self, delay: Duration, task: Task) {
        self.schedule_at(self.now + delay, task);
    }

    /// Earliest task due at or before `now`, with its scheduled fire time
    pub fn pop_due(&mut self) -> Option<(Duration, Task)> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, s)| s.fire_at <= self.now)
            .min_by_key(|(_, s)| (s.fire_at, s.seq))
            .map(|(i, _)| i)?;
        let scheduled = self.tasks.swap_remove(index);
        Some((scheduled.fire_at, scheduled.task))
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_nothing_fires_early() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(ms(500), Task::SpawnTick);
        scheduler.advance(ms(499));
        assert_eq!(scheduler.pop_due(), None);
        scheduler.advance(ms(1));
        assert_eq!(scheduler.pop_due(), Some((ms(500), Task::SpawnTick)));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_fires_in_time_then_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_at(ms(200), Task::ClearMessage { generation: 1 });
        scheduler.schedule_at(ms(100), Task::BurstSpawn);
        scheduler.schedule_at(ms(200), Task::SpawnTick);
        scheduler.advance(ms(1000));

        let fired: Vec<_> = std::iter::from_fn(|| scheduler.pop_due())
            .map(|(_, task)| task)
            .collect();
        assert_eq!(
            fired,
            vec![
                Task::BurstSpawn,
                Task::ClearMessage { generation: 1 },
                Task::SpawnTick
            ]
        );
    }

    #[test]
    fn test_zero_delay_is_due_immediately() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(Duration::ZERO, Task::BurstSpawn);
        assert_eq!(scheduler.pop_due(), Some((Duration::ZERO, Task::BurstSpawn)));
    }
}
