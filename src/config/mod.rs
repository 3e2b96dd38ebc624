mod file_config;

pub use file_config::{FileConfig, GameConfig};

use crate::audio::DEFAULT_ITUNES_SEARCH_URL;
use crate::catalog::{DEFAULT_TMDB_BASE_URL, MAX_CATALOG_PAGES};
use crate::game::{
    COUNTDOWN_SECS, DEFAULT_STARTING_LIVES, POSTER_PAGE_SPAN, SOUNDTRACK_PAGE_SPAN,
};
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DB_FILE_NAME: &str = "cinequiz.db";
pub const SESSION_FILE_NAME: &str = "session";
pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 15;
pub const DEFAULT_WRONG_RETRY_DELAY_MS: u64 = 1500;
pub const DEFAULT_FEEDBACK_TIMEOUT_SEC: u64 = 10;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: Option<String>,
    pub itunes_base_url: Option<String>,
    pub request_timeout_sec: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    /// `None` means the movie catalog is unavailable.
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub itunes_base_url: String,
    pub request_timeout_sec: u64,

    pub game: GameSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub starting_lives: u32,
    pub max_catalog_pages: u32,
    pub poster_page_span: u32,
    pub soundtrack_page_span: u32,
    pub countdown_secs: u32,
    pub wrong_retry_delay_ms: u64,
    pub feedback_timeout_sec: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            starting_lives: DEFAULT_STARTING_LIVES,
            max_catalog_pages: MAX_CATALOG_PAGES,
            poster_page_span: POSTER_PAGE_SPAN,
            soundtrack_page_span: SOUNDTRACK_PAGE_SPAN,
            countdown_secs: COUNTDOWN_SECS,
            wrong_retry_delay_ms: DEFAULT_WRONG_RETRY_DELAY_MS,
            feedback_timeout_sec: DEFAULT_FEEDBACK_TIMEOUT_SEC,
        }
    }
}

impl GameSettings {
    pub fn wrong_retry_delay(&self) -> Duration {
        Duration::from_millis(self.wrong_retry_delay_ms)
    }

    pub fn feedback_timeout(&self) -> Duration {
        Duration::from_secs(self.feedback_timeout_sec)
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let tmdb_api_key = file
            .tmdb_api_key
            .or_else(|| cli.tmdb_api_key.clone())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let tmdb_base_url = file
            .tmdb_base_url
            .or_else(|| cli.tmdb_base_url.clone())
            .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string());
        let itunes_base_url = file
            .itunes_base_url
            .or_else(|| cli.itunes_base_url.clone())
            .unwrap_or_else(|| DEFAULT_ITUNES_SEARCH_URL.to_string());
        let request_timeout_sec = file
            .request_timeout_sec
            .or(cli.request_timeout_sec)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SEC);

        let game_file = file.game.unwrap_or_default();
        let defaults = GameSettings::default();
        let game = GameSettings {
            starting_lives: game_file.starting_lives.unwrap_or(defaults.starting_lives),
            max_catalog_pages: game_file
                .max_catalog_pages
                .unwrap_or(defaults.max_catalog_pages),
            poster_page_span: game_file
                .poster_page_span
                .unwrap_or(defaults.poster_page_span),
            soundtrack_page_span: game_file
                .soundtrack_page_span
                .unwrap_or(defaults.soundtrack_page_span),
            countdown_secs: game_file.countdown_secs.unwrap_or(defaults.countdown_secs),
            wrong_retry_delay_ms: game_file
                .wrong_retry_delay_ms
                .unwrap_or(defaults.wrong_retry_delay_ms),
            feedback_timeout_sec: game_file
                .feedback_timeout_sec
                .unwrap_or(defaults.feedback_timeout_sec),
        };
        if game.starting_lives == 0 {
            bail!("game.starting_lives must be at least 1");
        }

        Ok(Self {
            db_dir,
            tmdb_api_key,
            tmdb_base_url,
            itunes_base_url,
            request_timeout_sec,
            game,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_dir.join(DB_FILE_NAME)
    }

    pub fn session_path(&self) -> PathBuf {
        self.db_dir.join(SESSION_FILE_NAME)
    }
}
