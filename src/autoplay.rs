//! Demo player
//!
//! Looks at the field every frame and presses the key a sharp player would:
//! in letter modes, the letter of a cube sitting in its perfect window; in
//! word mode, the next letter of the word closest to the player.

use crate::sim::{Game, HitRegion, JudgePolicy, KeyInput};

#[derive(Debug, Clone, Default)]
pub struct Autoplay {
    /// Word being typed in word mode
    word: Option<String>,
}

impl Autoplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key to press this frame, if any
    pub fn next_key(&mut self, game: &Game) -> Option<KeyInput> {
        if !game.is_running() {
            return None;
        }
        match game.policy() {
            JudgePolicy::DepthZone(zone) => Self::perfect_letter(game, &zone),
            JudgePolicy::LaneRing(ring) => Self::perfect_letter(game, &ring),
            JudgePolicy::PrefixWord => self.next_word_key(game),
        }
    }

    fn perfect_letter<R: HitRegion>(game: &Game, region: &R) -> Option<KeyInput> {
        game.targets()
            .find(|t| {
                region
                    .distance(t, game.lanes())
                    .is_some_and(|d| d <= region.perfect_radius())
            })
            .and_then(|t| t.symbol.chars().next())
            .map(KeyInput::Char)
    }

    fn next_word_key(&mut self, game: &Game) -> Option<KeyInput> {
        let buffer = game.buffer();
        let still_live = self.word.as_ref().is_some_and(|w| {
            game.targets()
                .any(|t| &t.symbol == w && t.match_prefix(buffer) == buffer.len())
        });
        if !still_live {
            if !buffer.is_empty() {
                self.word = None;
                return Some(KeyInput::Clear);
            }
            // Closest to the player first
            self.word = game
                .targets()
                .max_by(|a, b| a.pos.z.total_cmp(&b.pos.z))
                .map(|t| t.symbol.clone());
        }

        let word = self.word.as_ref()?;
        word.chars().nth(buffer.len()).map(KeyInput::Char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameEvent;
    use crate::tuning::{GameMode, Tuning};

    fn play(mode: GameMode, seconds: u32) -> Game {
        let mut game = Game::new(Tuning::preset(mode), 2024).unwrap();
        let mut bot = Autoplay::new();
        game.start();
        for _ in 0..seconds * 120 {
            if let Some(key) = bot.next_key(&game) {
                game.key(key);
            }
            game.step();
        }
        game
    }

    #[test]
    fn test_idle_game_gets_no_keys() {
        let game = Game::new(Tuning::default(), 1).unwrap();
        assert_eq!(Autoplay::new().next_key(&game), None);
    }

    #[test]
    fn test_letter_bot_never_misses() {
        let game = play(GameMode::Letters, 60);
        let stats = game.stats();
        assert!(stats.perfect > 0);
        assert_eq!(stats.hit, 0);
        assert_eq!(stats.too_early_or_late + stats.no_target, 0);
        assert_eq!(stats.expired, 0);
        assert_eq!(game.score(), u64::from(stats.perfect) * 20);
    }

    #[test]
    fn test_ring_bot_never_misses() {
        let game = play(GameMode::LaneRings, 60);
        assert!(game.stats().perfect > 0);
        assert_eq!(game.stats().accuracy(), Some(1.0));
        assert_eq!(game.stats().expired, 0);
    }

    #[test]
    fn test_word_bot_completes_words() {
        let mut game = play(GameMode::Words, 60);
        assert!(game.stats().words > 0);
        assert_eq!(game.stats().expired, 0);
        let retired = game
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::TargetRetired { .. }))
            .count();
        assert_eq!(retired as u32, game.stats().words);
    }
}
