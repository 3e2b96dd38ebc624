//! Per-mode high score tables.

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::store::{GameMode, GameStore, ScoreRow};

/// Rows read from the store before deduplication.
pub const LEADERBOARD_FETCH_LIMIT: usize = 100;
/// Players shown.
pub const MAX_LEADERBOARD_ENTRIES: usize = 50;
pub const ANONYMOUS_NAME: &str = "Anonymous Agent";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub player_id: String,
    pub display_name: String,
    pub score: u32,
    pub language: String,
    pub created: i64,
}

/// Best row per player, in store order, at most [`MAX_LEADERBOARD_ENTRIES`].
pub fn best_per_player(rows: Vec<ScoreRow>) -> Vec<LeaderboardEntry> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.player_id.clone()))
        .take(MAX_LEADERBOARD_ENTRIES)
        .enumerate()
        .map(|(i, row)| LeaderboardEntry {
            rank: i + 1,
            display_name: row
                .display_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
            player_id: row.player_id,
            score: row.score,
            language: row.language,
            created: row.created,
        })
        .collect()
}

/// Leaderboards with a cache that lives as long as this value. Use
/// [`Leaderboard::refresh`] to bypass it.
pub struct Leaderboard {
    store: Arc<dyn GameStore>,
    cache: Mutex<HashMap<GameMode, Vec<LeaderboardEntry>>>,
}

impl Leaderboard {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            store,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn entries(&self, mode: GameMode) -> Result<Vec<LeaderboardEntry>> {
        if let Some(cached) = self.cached(mode) {
            debug!("[leaderboard] Serving {} from cache", mode);
            return Ok(cached);
        }
        self.refresh(mode)
    }

    pub fn refresh(&self, mode: GameMode) -> Result<Vec<LeaderboardEntry>> {
        let rows = self.store.top_scores(mode, LEADERBOARD_FETCH_LIMIT)?;
        let entries = best_per_player(rows);
        debug!("[leaderboard] Loaded {} entries for {}", entries.len(), mode);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(mode, entries.clone());
        }
        Ok(entries)
    }

    pub fn cached(&self, mode: GameMode) -> Option<Vec<LeaderboardEntry>> {
        self.cache.lock().ok()?.get(&mode).cloned()
    }
}
