mod game_store;
mod models;
mod sqlite_game_store;

pub use game_store::{AccountStore, GameStore};
pub use models::{FeedbackRecord, GameMode, Profile, ScoreRecord, ScoreRow};
pub use sqlite_game_store::{SqliteGameStore, GAME_STORE_VERSIONED_SCHEMAS};
