//! HTTP client for the song preview search provider.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::models::{SongSearchHit, SongSearchResponse};

pub const DEFAULT_ITUNES_SEARCH_URL: &str = "https://itunes.apple.com/search";

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("song search failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("song search returned status {0}")]
    Status(u16),
}

#[async_trait]
pub trait AudioSearch: Send + Sync {
    /// Free-text song search, at most `limit` hits in provider order.
    async fn search_songs(&self, term: &str, limit: usize)
        -> Result<Vec<SongSearchHit>, AudioError>;
}

pub struct ItunesClient {
    client: reqwest::Client,
    search_url: String,
}

impl ItunesClient {
    pub fn new(search_url: String, timeout_sec: u64) -> Result<Self, AudioError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;
        let search_url = search_url.trim_end_matches('/').to_string();
        Ok(Self { client, search_url })
    }

    pub(crate) fn search_url_for(&self, term: &str, limit: usize) -> String {
        format!(
            "{}?term={}&media=music&entity=song&limit={}",
            self.search_url,
            urlencoding::encode(term),
            limit
        )
    }
}

#[async_trait]
impl AudioSearch for ItunesClient {
    async fn search_songs(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<SongSearchHit>, AudioError> {
        let url = self.search_url_for(term, limit);
        debug!("[audio] GET {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AudioError::Status(response.status().as_u16()));
        }
        let body: SongSearchResponse = response.json().await?;
        if body.result_count == 0 {
            return Ok(Vec::new());
        }
        Ok(body.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_the_term() {
        let client = ItunesClient::new(DEFAULT_ITUNES_SEARCH_URL.to_string(), 10).unwrap();
        assert_eq!(
            client.search_url_for("Leo tamil movie songs", 1),
            "https://itunes.apple.com/search?term=Leo%20tamil%20movie%20songs&media=music&entity=song&limit=1"
        );
    }
}
