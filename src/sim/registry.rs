//! Live target storage
//!
//! Targets are kept in insertion order, which is also the order every other
//! component iterates them in. A pass that removes targets first collects the
//! ids it wants gone, then removes them after the walk.

use glam::Vec3;

use super::state::{Lane, Target, TargetId};

#[derive(Debug, Clone)]
pub struct TargetRegistry {
    targets: Vec<Target>,
    next_id: u32,
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert a new target under a fresh id
    pub fn add(&mut self, lane: Lane, pos: Vec3, symbol: impl Into<String>) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets.push(Target::new(id, lane, pos, symbol));
        id
    }

    /// Remove a target. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: TargetId) -> Option<Target> {
        let index = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.remove(index))
    }

    /// Live targets in insertion order. The iterator is `Clone`, so a pass
    /// can restart from the same snapshot.
    pub fn all(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }

    pub(crate) fn all_mut(&mut self) -> std::slice::IterMut<'_, Target> {
        self.targets.iter_mut()
    }

    /// Ids of live targets at this instant
    pub fn snapshot_ids(&self) -> Vec<TargetId> {
        self.targets.iter().map(|t| t.id).collect()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(n: usize) -> (TargetRegistry, Vec<TargetId>) {
        let mut registry = TargetRegistry::new();
        let ids = (0..n)
            .map(|i| registry.add(Lane(i % 4), Vec3::new(0.0, 0.0, -80.0), "A"))
            .collect();
        (registry, ids)
    }

    #[test]
    fn test_ids_are_unique() {
        let (mut registry, ids) = registry_with(3);
        registry.remove(ids[2]);
        let fresh = registry.add(Lane(0), Vec3::ZERO, "S");
        assert!(!ids.contains(&fresh));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut registry, ids) = registry_with(2);
        assert!(registry.remove(ids[0]).is_some());
        assert!(registry.remove(ids[0]).is_none());
        assert_eq!(registry.snapshot_ids(), vec![ids[1]]);
    }

    #[test]
    fn test_removals_after_snapshot_pass() {
        let (mut registry, ids) = registry_with(4);
        let doomed: Vec<_> = registry
            .all()
            .filter(|t| t.lane.0 % 2 == 0)
            .map(|t| t.id)
            .collect();
        for id in &doomed {
            registry.remove(*id);
        }
        // Already gone
        assert!(registry.remove(doomed[0]).is_none());
        assert_eq!(registry.snapshot_ids(), vec![ids[1], ids[3]]);
    }

    #[test]
    fn test_all_preserves_insertion_order_and_restarts() {
        let (registry, ids) = registry_with(3);
        let pass = registry.all();
        let first: Vec<_> = pass.clone().map(|t| t.id).collect();
        let second: Vec<_> = pass.map(|t| t.id).collect();
        assert_eq!(first, ids);
        assert_eq!(second, ids);
    }
}
