use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::store::{GameMode, GameStore, ScoreRecord};

/// Saves the final score when a game ends. Games played without a
/// logged in player are not recorded.
#[derive(Clone, Default)]
pub struct ScoreReporter {
    store: Option<Arc<dyn GameStore>>,
    player_id: Option<String>,
}

impl ScoreReporter {
    pub fn new(store: Arc<dyn GameStore>, player_id: Option<String>) -> Self {
        Self {
            store: Some(store),
            player_id,
        }
    }

    /// Reporter that never writes anything.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Returns the stored row id. Write failures are logged, never raised,
    /// so the game over screen is always reached.
    pub fn submit(&self, score: u32, language: &str, mode: GameMode) -> Option<i64> {
        let (Some(store), Some(player_id)) = (&self.store, &self.player_id) else {
            debug!("[score] No player logged in, score {} not saved", score);
            return None;
        };
        let record = ScoreRecord {
            player_id: player_id.clone(),
            score,
            language: language.to_string(),
            game_mode: mode,
        };
        match store.insert_score(&record) {
            Ok(id) => {
                info!("[score] Saved {} ({}, {})", score, language, mode);
                Some(id)
            }
            Err(err) => {
                warn!("[score] Could not save score {}: {:#}", score, err);
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::{FeedbackRecord, Profile, ScoreRow};
    use anyhow::{bail, Result};
    use std::sync::Mutex;

    /// Keeps inserted scores in memory; optionally refuses every write.
    #[derive(Default)]
    pub(crate) struct RecordingStore {
        pub scores: Mutex<Vec<ScoreRecord>>,
        pub failing: bool,
    }

    impl RecordingStore {
        pub(crate) fn scores(&self) -> Vec<ScoreRecord> {
            self.scores.lock().unwrap().clone()
        }
    }

    impl GameStore for RecordingStore {
        fn insert_score(&self, record: &ScoreRecord) -> Result<i64> {
            if self.failing {
                bail!("backend down");
            }
            let mut scores = self.scores.lock().unwrap();
            scores.push(record.clone());
            Ok(scores.len() as i64)
        }

        fn top_scores(&self, _mode: GameMode, _limit: usize) -> Result<Vec<ScoreRow>> {
            Ok(vec![])
        }

        fn insert_profile(&self, _profile: &Profile) -> Result<()> {
            Ok(())
        }

        fn upsert_profile(&self, _profile: &Profile) -> Result<()> {
            Ok(())
        }

        fn get_profile(&self, _player_id: &str) -> Result<Option<Profile>> {
            Ok(None)
        }

        fn insert_feedback(&self, _feedback: &FeedbackRecord) -> Result<i64> {
            Ok(1)
        }
    }

    #[test]
    fn anonymous_games_are_not_saved() {
        let store = Arc::new(RecordingStore::default());
        let reporter = ScoreReporter::new(store.clone(), None);

        assert_eq!(reporter.submit(4, "tamil", GameMode::Poster), None);
        assert!(store.scores().is_empty());
        assert_eq!(ScoreReporter::disabled().submit(4, "tamil", GameMode::Poster), None);
    }

    #[test]
    fn saves_score_for_player() {
        let store = Arc::new(RecordingStore::default());
        let reporter = ScoreReporter::new(store.clone(), Some("p1".to_string()));

        assert_eq!(reporter.submit(4, "tamil", GameMode::Soundtrack), Some(1));
        assert_eq!(
            store.scores(),
            vec![ScoreRecord {
                player_id: "p1".to_string(),
                score: 4,
                language: "tamil".to_string(),
                game_mode: GameMode::Soundtrack,
            }]
        );
    }

    #[test]
    fn write_failures_are_swallowed() {
        let store = Arc::new(RecordingStore {
            failing: true,
            ..Default::default()
        });
        let reporter = ScoreReporter::new(store, Some("p1".to_string()));
        assert_eq!(reporter.submit(4, "tamil", GameMode::Poster), None);
    }
}
