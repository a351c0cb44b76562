//! Target retirement
//!
//! Every target leaves the field through [`retire`] exactly once, which emits
//! the single disposal event the presentation layer cleans up on.

use super::registry::TargetRegistry;
use super::state::{GameEvent, MatchState, RetireCause, TargetId};

/// Remove a target and emit its disposal event.
///
/// Returns `false` (and emits nothing) when the target is already gone, so
/// retiring twice has the same effect as retiring once.
pub fn retire(
    registry: &mut TargetRegistry,
    id: TargetId,
    cause: RetireCause,
    events: &mut Vec<GameEvent>,
) -> bool {
    let Some(target) = registry.remove(id) else {
        return false;
    };
    log::debug!(
        "Retired target {} '{}' ({:?}) at z={:.2}",
        id.0,
        target.symbol,
        cause,
        target.pos.z
    );
    events.push(GameEvent::TargetRetired {
        id,
        pos: target.pos,
        cause,
    });
    true
}

/// Retire every target past the destroy boundary, charging the expiry
/// penalty once per target. Returns the number of expired targets.
pub fn sweep_expired(
    registry: &mut TargetRegistry,
    match_state: &mut MatchState,
    destroy_distance: f32,
    expiry_penalty: u32,
    events: &mut Vec<GameEvent>,
) -> usize {
    let past: Vec<TargetId> = registry
        .all()
        .filter(|t| t.pos.z > destroy_distance)
        .map(|t| t.id)
        .collect();

    let mut expired = 0;
    for id in past {
        if !retire(registry, id, RetireCause::Expired, events) {
            continue;
        }
        expired += 1;
        match_state.stats.expired += 1;
        let delta = match_state.apply_delta(-i64::from(expiry_penalty));
        if delta != 0 {
            events.push(GameEvent::ScoreChanged {
                score: match_state.score,
                delta,
            });
        }
    }
    expired
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::sim::state::Lane;

    #[test]
    fn test_retire_twice_emits_once() {
        let mut registry = TargetRegistry::new();
        let id = registry.add(Lane(0), Vec3::new(-6.0, 0.0, 8.0), "A");
        let mut events = Vec::new();

        assert!(retire(&mut registry, id, RetireCause::Hit, &mut events));
        assert!(!retire(&mut registry, id, RetireCause::Hit, &mut events));

        assert_eq!(
            events,
            vec![GameEvent::TargetRetired {
                id,
                pos: Vec3::new(-6.0, 0.0, 8.0),
                cause: RetireCause::Hit,
            }]
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sweep_penalizes_each_expired_target() {
        let mut registry = TargetRegistry::new();
        let gone = registry.add(Lane(0), Vec3::new(-6.0, 0.0, 12.05), "A");
        let kept = registry.add(Lane(1), Vec3::new(-2.0, 0.0, 12.0), "S");
        let mut state = MatchState {
            score: 7,
            ..Default::default()
        };
        let mut events = Vec::new();

        let expired = sweep_expired(&mut registry, &mut state, 12.0, 5, &mut events);

        assert_eq!(expired, 1);
        assert_eq!(state.score, 2);
        assert_eq!(state.stats.expired, 1);
        assert_eq!(registry.snapshot_ids(), vec![kept]);
        assert!(events.contains(&GameEvent::TargetRetired {
            id: gone,
            pos: Vec3::new(-6.0, 0.0, 12.05),
            cause: RetireCause::Expired,
        }));
    }

    #[test]
    fn test_sweep_penalty_clamps_at_zero() {
        let mut registry = TargetRegistry::new();
        registry.add(Lane(0), Vec3::new(-6.0, 0.0, 20.0), "A");
        registry.add(Lane(2), Vec3::new(2.0, 0.0, 20.0), "D");
        let mut state = MatchState {
            score: 3,
            ..Default::default()
        };
        let mut events = Vec::new();

        sweep_expired(&mut registry, &mut state, 12.0, 5, &mut events);

        assert_eq!(state.score, 0);
        let deltas: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ScoreChanged { delta, .. } => Some(*delta),
                _ => None,
            })
            .collect();
        // The second expiry found the score already at zero
        assert_eq!(deltas, vec![-3]);
        assert_eq!(state.stats.expired, 2);
    }
}
