use super::models::{FeedbackRecord, GameMode, Profile, ScoreRecord, ScoreRow};
use crate::user::{PasswordCredentials, SessionToken, SessionTokenValue};
use anyhow::Result;

/// Scores, profiles and feedback.
pub trait GameStore: Send + Sync {
    /// Inserts a score and returns its row id.
    fn insert_score(&self, record: &ScoreRecord) -> Result<i64>;

    /// Highest scores for a mode, best first, at most `limit` rows.
    /// Poster listings also include legacy rows that carry no mode.
    fn top_scores(&self, mode: GameMode, limit: usize) -> Result<Vec<ScoreRow>>;

    /// Creates a profile. Fails if the player already has one.
    fn insert_profile(&self, profile: &Profile) -> Result<()>;

    /// Creates or replaces a profile.
    fn upsert_profile(&self, profile: &Profile) -> Result<()>;

    /// Returns Ok(None) if the player has no profile.
    fn get_profile(&self, player_id: &str) -> Result<Option<Profile>>;

    /// Inserts a feedback message and returns its row id.
    fn insert_feedback(&self, feedback: &FeedbackRecord) -> Result<i64>;
}

/// Player accounts, password credentials and session tokens.
pub trait AccountStore: Send + Sync {
    /// Creates an account for the given email and returns its player id.
    /// Fails if the email is already registered.
    fn create_account(&self, email: &str) -> Result<String>;

    /// Returns Ok(None) if no account has this email.
    fn get_player_id(&self, email: &str) -> Result<Option<String>>;

    /// Returns Ok(None) if the player does not exist.
    fn get_email(&self, player_id: &str) -> Result<Option<String>>;

    fn get_password_credentials(&self, player_id: &str) -> Result<Option<PasswordCredentials>>;

    /// Inserts or replaces the player's password credentials.
    fn set_password_credentials(&self, credentials: &PasswordCredentials) -> Result<()>;

    /// Records a successful password check.
    fn mark_password_used(&self, player_id: &str) -> Result<()>;

    fn add_session_token(&self, token: &SessionToken) -> Result<()>;

    /// Returns Ok(None) if the token does not exist.
    fn get_session_token(&self, value: &SessionTokenValue) -> Result<Option<SessionToken>>;

    /// Updates the token's last used timestamp.
    fn touch_session_token(&self, value: &SessionTokenValue) -> Result<()>;

    /// Returns whether a token was deleted.
    fn delete_session_token(&self, value: &SessionTokenValue) -> Result<bool>;
}
