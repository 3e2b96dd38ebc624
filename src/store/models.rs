use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Poster,
    Soundtrack,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Poster => "poster",
            GameMode::Soundtrack => "soundtrack",
        }
    }
}

impl FromStr for GameMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "poster" => Ok(GameMode::Poster),
            "soundtrack" | "music" => Ok(GameMode::Soundtrack),
            other => anyhow::bail!("Unknown game mode {}", other),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished game's score as submitted at game over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreRecord {
    pub player_id: String,
    pub score: u32,
    pub language: String,
    pub game_mode: GameMode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub player_id: String,
    pub display_name: String,
    /// Unix seconds of the last explicit update, `None` if never edited.
    pub updated_at: Option<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackRecord {
    pub player_id: Option<String>,
    pub email: Option<String>,
    pub message: String,
    pub metadata: serde_json::Value,
}

/// Raw leaderboard row, joined with the player's profile when there is one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreRow {
    pub id: i64,
    pub player_id: String,
    pub score: u32,
    pub language: String,
    pub created: i64,
    pub display_name: Option<String>,
}
