use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_dir: Option<String>,
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: Option<String>,
    pub itunes_base_url: Option<String>,
    pub request_timeout_sec: Option<u64>,

    pub game: Option<GameConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub starting_lives: Option<u32>,
    pub max_catalog_pages: Option<u32>,
    pub poster_page_span: Option<u32>,
    pub soundtrack_page_span: Option<u32>,
    pub countdown_secs: Option<u32>,
    pub wrong_retry_delay_ms: Option<u64>,
    pub feedback_timeout_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file() {
        let config: FileConfig = toml::from_str(
            r#"
            db_dir = "/var/lib/cinequiz"
            tmdb_api_key = "abc"

            [game]
            starting_lives = 5
            countdown_secs = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.db_dir.as_deref(), Some("/var/lib/cinequiz"));
        assert_eq!(config.tmdb_api_key.as_deref(), Some("abc"));
        assert!(config.tmdb_base_url.is_none());
        let game = config.game.unwrap();
        assert_eq!(game.starting_lives, Some(5));
        assert_eq!(game.countdown_secs, Some(20));
        assert!(game.poster_page_span.is_none());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = FileConfig::load(Path::new("/nonexistent/cinequiz.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
