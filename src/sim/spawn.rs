//! Target spawning
//!
//! Picks lane and symbol uniformly at random from a seeded PCG stream so a
//! match replays identically for the same seed. Cadence lives in the match
//! controller's task queue; this module only decides *whether* and *what*.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::registry::TargetRegistry;
use super::state::{Lane, Lanes, TargetId};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    rng: Pcg32,
    bank: Vec<String>,
    spawn_z: f32,
    vertical_jitter: f32,
    live_cap: usize,
}

impl SpawnScheduler {
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            bank: tuning.bank.clone(),
            spawn_z: tuning.spawn_z,
            vertical_jitter: tuning.vertical_jitter,
            live_cap: tuning.live_cap,
        }
    }

    pub fn live_cap(&self) -> usize {
        self.live_cap
    }

    /// Steady-state spawn: creates one target unless the field is at the cap
    pub fn try_spawn(&mut self, registry: &mut TargetRegistry, lanes: &Lanes) -> Option<TargetId> {
        if registry.len() >= self.live_cap {
            return None;
        }
        Some(self.spawn(registry, lanes))
    }

    /// Create one target regardless of the cap (opening burst)
    pub fn spawn(&mut self, registry: &mut TargetRegistry, lanes: &Lanes) -> TargetId {
        debug_assert!(!lanes.is_empty(), "spawn requires at least one lane");
        let lane = Lane(self.rng.random_range(0..lanes.len()));
        let x = lanes.offset(lane).unwrap_or_default();
        let y = if self.vertical_jitter > 0.0 {
            self.rng
                .random_range(-self.vertical_jitter..self.vertical_jitter)
        } else {
            0.0
        };
        let symbol = self.bank[self.rng.random_range(0..self.bank.len())].clone();

        registry.add(lane, Vec3::new(x, y, self.spawn_z), symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{GameMode, HOME_ROW};

    fn setup(seed: u64) -> (SpawnScheduler, TargetRegistry, Lanes) {
        let tuning = Tuning::preset(GameMode::Letters);
        (
            SpawnScheduler::new(&tuning, seed),
            TargetRegistry::new(),
            Lanes::new(tuning.lanes.clone()),
        )
    }

    #[test]
    fn test_spawned_target_sits_on_its_lane() {
        let (mut spawner, mut registry, lanes) = setup(7);
        for _ in 0..20 {
            spawner.spawn(&mut registry, &lanes);
        }
        for target in registry.all() {
            assert!(target.lane.0 < lanes.len());
            assert_eq!(Some(target.pos.x), lanes.offset(target.lane));
            assert!((-3.0..3.0).contains(&target.pos.y));
            assert_eq!(target.pos.z, -80.0);
            assert!(HOME_ROW.contains(&target.symbol.as_str()));
        }
    }

    #[test]
    fn test_cap_gates_steady_spawns() {
        let (mut spawner, mut registry, lanes) = setup(1);
        for _ in 0..spawner.live_cap() {
            assert!(spawner.try_spawn(&mut registry, &lanes).is_some());
        }
        assert!(spawner.try_spawn(&mut registry, &lanes).is_none());
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_same_seed_same_targets() {
        let (mut a, mut ra, lanes) = setup(42);
        let (mut b, mut rb, _) = setup(42);
        for _ in 0..10 {
            a.spawn(&mut ra, &lanes);
            b.spawn(&mut rb, &lanes);
        }
        let left: Vec<_> = ra.all().map(|t| (t.lane, t.symbol.clone(), t.pos)).collect();
        let right: Vec<_> = rb.all().map(|t| (t.lane, t.symbol.clone(), t.pos)).collect();
        assert_eq!(left, right);
    }
}
