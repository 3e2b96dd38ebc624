//! Cinequiz library
//!
//! Movie trivia rounds over a remote movie catalog and a song preview
//! provider, with a local store for scores, profiles and accounts.

pub mod audio;
pub mod catalog;
pub mod config;
pub mod feedback;
pub mod game;
pub mod leaderboard;
pub mod sqlite_persistence;
pub mod store;
pub mod user;

// Re-export commonly used types for convenience
pub use catalog::{CatalogApi, CatalogFetcher, Language, Movie};
pub use game::{GameSession, PosterGame, SoundtrackGame};
pub use store::{GameMode, GameStore, SqliteGameStore};
pub use user::AccountManager;
