//! Player feedback submission.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::{FeedbackRecord, GameStore};

pub const MAX_FEEDBACK_LEN: usize = 500;
pub const DEFAULT_FEEDBACK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Please enter some feedback")]
    Empty,

    #[error("Feedback is limited to {max} characters, got {len}")]
    TooLong { len: usize, max: usize },

    #[error("Feedback submission timed out")]
    TimedOut,

    #[error("Could not send feedback: {0:#}")]
    Store(anyhow::Error),
}

/// Who is sending the feedback, when known.
#[derive(Clone, Debug, Default)]
pub struct FeedbackAuthor {
    pub player_id: Option<String>,
    pub email: Option<String>,
}

pub struct FeedbackSender {
    store: Arc<dyn GameStore>,
    timeout: Duration,
    version: String,
}

/// Trimmed message, or why it cannot be sent.
pub fn validate_message(message: &str) -> Result<String, FeedbackError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(FeedbackError::Empty);
    }
    let len = message.chars().count();
    if len > MAX_FEEDBACK_LEN {
        return Err(FeedbackError::TooLong {
            len,
            max: MAX_FEEDBACK_LEN,
        });
    }
    Ok(message.to_string())
}

impl FeedbackSender {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_FEEDBACK_TIMEOUT,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Stores the message and returns its id. The whole write races
    /// the configured timeout.
    pub async fn submit(
        &self,
        message: &str,
        author: FeedbackAuthor,
    ) -> Result<i64, FeedbackError> {
        let record = FeedbackRecord {
            player_id: author.player_id,
            email: author.email,
            message: validate_message(message)?,
            metadata: json!({
                "platform": std::env::consts::OS,
                "version": self.version,
            }),
        };

        let store = self.store.clone();
        let write = tokio::task::spawn_blocking(move || store.insert_feedback(&record));
        match tokio::time::timeout(self.timeout, write).await {
            Err(_) => {
                warn!("[feedback] Submission timed out after {:?}", self.timeout);
                Err(FeedbackError::TimedOut)
            }
            Ok(Err(join_err)) => Err(FeedbackError::Store(join_err.into())),
            Ok(Ok(Err(err))) => {
                warn!("[feedback] Submission failed: {:#}", err);
                Err(FeedbackError::Store(err))
            }
            Ok(Ok(Ok(id))) => {
                info!("[feedback] Stored feedback {}", id);
                Ok(id)
            }
        }
    }
}
