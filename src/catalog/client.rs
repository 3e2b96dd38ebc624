//! HTTP client for the movie metadata provider.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::models::{CastMember, CreditsResponse, Language, Movie, MovieListResponse};

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Minimum vote count for discovered movies, low enough to catch almost everything.
pub const MIN_VOTE_COUNT: u32 = 5;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog returned status {status} for {what}")]
    Status { status: u16, what: String },
}

/// Raw access to the movie provider. One call, one request: no clamping,
/// no retries, no fallbacks (those live in [`super::CatalogFetcher`]).
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// False when no credentials are configured and every call would fail.
    fn is_configured(&self) -> bool;

    /// Movies in `language`, sorted by popularity, from the given results page.
    async fn discover(&self, language: Language, page: u32) -> Result<Vec<Movie>, CatalogError>;

    async fn credits(&self, movie_id: u64) -> Result<Vec<CastMember>, CatalogError>;

    async fn recommendations(&self, movie_id: u64) -> Result<Vec<Movie>, CatalogError>;
}

pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbClient {
    /// # Arguments
    /// * `base_url` - Base URL of the provider API (e.g., "https://api.themoviedb.org/3")
    /// * `api_key` - Provider API key, `None` if not configured
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout_sec: u64,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let api_key = api_key.filter(|k| !k.trim().is_empty());

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    pub(crate) fn discover_url(&self, language: Language, page: u32) -> String {
        format!(
            "{}/discover/movie?api_key={}&with_original_language={}&sort_by=popularity.desc&page={}&vote_count.gte={}",
            self.base_url,
            urlencoding::encode(self.key()),
            urlencoding::encode(language.original_language_filter()),
            page,
            MIN_VOTE_COUNT
        )
    }

    /// Same as the request URL, with the key replaced so it can be logged.
    fn redacted(&self, url: &str) -> String {
        match &self.api_key {
            Some(key) => url
                .replace(urlencoding::encode(key).as_ref(), "HIDDEN")
                .replace(key.as_str(), "HIDDEN"),
            None => url.to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
    ) -> Result<T, CatalogError> {
        debug!("[catalog] GET {}", self.redacted(url));
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status().as_u16(),
                what: what.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn discover(&self, language: Language, page: u32) -> Result<Vec<Movie>, CatalogError> {
        let url = self.discover_url(language, page);
        let response: MovieListResponse = self
            .get_json(&url, &format!("discover page {}", page))
            .await?;
        Ok(response.results.unwrap_or_default())
    }

    async fn credits(&self, movie_id: u64) -> Result<Vec<CastMember>, CatalogError> {
        let url = format!(
            "{}/movie/{}/credits?api_key={}",
            self.base_url,
            movie_id,
            urlencoding::encode(self.key())
        );
        let response: CreditsResponse = self
            .get_json(&url, &format!("credits of {}", movie_id))
            .await?;
        Ok(response.cast.unwrap_or_default())
    }

    async fn recommendations(&self, movie_id: u64) -> Result<Vec<Movie>, CatalogError> {
        let url = format!(
            "{}/movie/{}/recommendations?api_key={}&language=en-US&page=1",
            self.base_url,
            movie_id,
            urlencoding::encode(self.key())
        );
        let response: MovieListResponse = self
            .get_json(&url, &format!("recommendations for {}", movie_id))
            .await?;
        Ok(response.results.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_removal() {
        let client = TmdbClient::new("http://localhost:8080/".to_string(), None, 10).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn blank_key_counts_as_unconfigured() {
        let client =
            TmdbClient::new(DEFAULT_TMDB_BASE_URL.to_string(), Some("  ".to_string()), 10)
                .unwrap();
        assert!(!client.is_configured());

        let client =
            TmdbClient::new(DEFAULT_TMDB_BASE_URL.to_string(), Some("abc".to_string()), 10)
                .unwrap();
        assert!(client.is_configured());
    }

    #[test]
    fn discover_url_carries_filters() {
        let client =
            TmdbClient::new(DEFAULT_TMDB_BASE_URL.to_string(), Some("k3y".to_string()), 10)
                .unwrap();
        let url = client.discover_url(Language::All, 7);

        assert!(url.starts_with("https://api.themoviedb.org/3/discover/movie?"));
        assert!(url.contains("api_key=k3y"));
        assert!(url.contains("with_original_language=te%7Cta%7Cml%7Ckn"));
        assert!(url.contains("sort_by=popularity.desc"));
        assert!(url.contains("page=7"));
        assert!(url.contains("vote_count.gte=5"));
        assert!(!client.redacted(&url).contains("k3y"));
    }

    #[test]
    fn escaped_key_is_hidden_in_logs() {
        let key = "a+b/c=d&e";
        let client =
            TmdbClient::new(DEFAULT_TMDB_BASE_URL.to_string(), Some(key.to_string()), 10)
                .unwrap();
        let url = client.discover_url(Language::Tamil, 2);
        let encoded = urlencoding::encode(key).into_owned();
        assert!(url.contains(&encoded));

        let logged = client.redacted(&url);
        assert!(!logged.contains(&encoded));
        assert!(!logged.contains(key));
        assert!(logged.contains("api_key=HIDDEN&"));
    }
}
