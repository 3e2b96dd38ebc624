//! Test fixtures: a temporary game database with accounts on top.

use super::constants::TEST_SEED;
use cinequiz::game::{GameSession, ScoreReporter, DEFAULT_STARTING_LIVES};
use cinequiz::store::SqliteGameStore;
use cinequiz::user::AccountManager;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestWorld {
    // Kept alive so the database directory is not removed mid-test
    pub dir: TempDir,
    pub store: Arc<SqliteGameStore>,
    pub accounts: AccountManager,
}

impl TestWorld {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            SqliteGameStore::new(dir.path().join("cinequiz.db"))
                .expect("Failed to create game store"),
        );
        let accounts = AccountManager::new(store.clone(), store.clone());
        Self {
            dir,
            store,
            accounts,
        }
    }

    /// Signs up and returns the new player id.
    pub fn player(&self, email: &str, password: &str, name: Option<&str>) -> String {
        self.accounts
            .sign_up(email, password, name)
            .expect("Failed to sign up test player")
    }

    pub fn reporter_for(&self, player_id: &str) -> ScoreReporter {
        ScoreReporter::new(self.store.clone(), Some(player_id.to_string()))
    }

    pub fn session(&self) -> GameSession {
        GameSession::with_seed(DEFAULT_STARTING_LIVES, TEST_SEED)
    }
}
