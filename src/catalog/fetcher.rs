use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

use super::client::{CatalogApi, CatalogError};
use super::models::{CastMember, Language, Movie};

/// Deepest results page we ever ask for. Deeper pages are mostly empty for
/// regional languages.
pub const MAX_CATALOG_PAGES: u32 = 20;

/// How many cast members / recommendations are surfaced as clues.
pub const CLUE_LIST_LEN: usize = 5;

/// Movie fetching with the page policy layered on top of a [`CatalogApi`]:
/// page clamping, a single retry against page 1 on an empty page, and an
/// empty answer when the provider has no credentials.
pub struct CatalogFetcher {
    api: Arc<dyn CatalogApi>,
    max_pages: u32,
}

/// One page of discover results.
#[derive(Clone, Debug)]
pub struct FetchedPage {
    pub page: u32,
    pub movies: Vec<Movie>,
}

impl CatalogFetcher {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self::with_max_pages(api, MAX_CATALOG_PAGES)
    }

    pub fn with_max_pages(api: Arc<dyn CatalogApi>, max_pages: u32) -> Self {
        Self {
            api,
            max_pages: max_pages.max(1),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api.is_configured()
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Pages above the cap are swapped for a random page within it.
    pub fn clamp_page<R: Rng>(&self, page: u32, rng: &mut R) -> u32 {
        if page > self.max_pages {
            rng.random_range(1..=self.max_pages)
        } else {
            page.max(1)
        }
    }

    /// Popular movies in `language` from (roughly) the requested page.
    ///
    /// Returns an empty list when the provider is not configured; callers
    /// are expected to fall back to [`super::seed_movies`].
    pub async fn fetch_movies<R: Rng>(
        &self,
        page: u32,
        language: Language,
        rng: &mut R,
    ) -> Result<Vec<Movie>, CatalogError> {
        Ok(self.fetch_page(page, language, rng).await?.movies)
    }

    /// Like [`Self::fetch_movies`], also reporting the page that was
    /// actually served after clamping and the page 1 retry.
    pub async fn fetch_page<R: Rng>(
        &self,
        page: u32,
        language: Language,
        rng: &mut R,
    ) -> Result<FetchedPage, CatalogError> {
        if !self.api.is_configured() {
            warn!("[catalog] API key is missing, no movies fetched");
            return Ok(FetchedPage {
                page,
                movies: Vec::new(),
            });
        }

        let safe_page = self.clamp_page(page, rng);
        let movies = self.api.discover(language, safe_page).await?;

        if movies.is_empty() && safe_page != 1 {
            info!(
                "[catalog] 0 results on page {} ({}), retrying page 1",
                safe_page, language
            );
            let movies = self.api.discover(language, 1).await?;
            return Ok(FetchedPage { page: 1, movies });
        }

        info!(
            "[catalog] {} results on page {} ({})",
            movies.len(),
            safe_page,
            language
        );
        Ok(FetchedPage {
            page: safe_page,
            movies,
        })
    }

    /// Top billed cast of a movie.
    pub async fn movie_credits(&self, movie_id: u64) -> Result<Vec<CastMember>, CatalogError> {
        if !self.api.is_configured() {
            return Ok(Vec::new());
        }
        let mut cast = self.api.credits(movie_id).await?;
        cast.truncate(CLUE_LIST_LEN);
        Ok(cast)
    }

    pub async fn similar_movies(&self, movie_id: u64) -> Result<Vec<Movie>, CatalogError> {
        if !self.api.is_configured() {
            return Ok(Vec::new());
        }
        let mut movies = self.api.recommendations(movie_id).await?;
        movies.truncate(CLUE_LIST_LEN);
        Ok(movies)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use std::sync::Mutex;

    pub(crate) fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            original_title: title.to_string(),
            overview: format!("Overview of {}", title),
            poster_path: Some(format!("/{}.jpg", id)),
            backdrop_path: None,
            release_date: "2020-01-01".to_string(),
            original_language: "te".to_string(),
            genre_ids: vec![],
            vote_average: 7.0,
        }
    }

    /// In-memory provider serving fixed pages and recording every request.
    #[derive(Default)]
    pub(crate) struct FakeCatalogApi {
        pub configured: bool,
        pub pages: HashMap<u32, Vec<Movie>>,
        pub default_page: Vec<Movie>,
        pub requests: Mutex<Vec<(Language, u32)>>,
    }

    impl FakeCatalogApi {
        pub(crate) fn configured() -> Self {
            Self {
                configured: true,
                ..Default::default()
            }
        }

        pub(crate) fn requested_pages(&self) -> Vec<u32> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|(_, p)| *p)
                .collect()
        }
    }

    #[async_trait]
    impl CatalogApi for FakeCatalogApi {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn discover(
            &self,
            language: Language,
            page: u32,
        ) -> Result<Vec<Movie>, CatalogError> {
            self.requests.lock().unwrap().push((language, page));
            Ok(self
                .pages
                .get(&page)
                .cloned()
                .unwrap_or_else(|| self.default_page.clone()))
        }

        async fn credits(&self, movie_id: u64) -> Result<Vec<CastMember>, CatalogError> {
            Ok((0..8)
                .map(|i| CastMember {
                    id: movie_id * 100 + i,
                    name: format!("Actor {}", i),
                    character: String::new(),
                    profile_path: None,
                })
                .collect())
        }

        async fn recommendations(&self, _movie_id: u64) -> Result<Vec<Movie>, CatalogError> {
            Ok((1..=9).map(|i| movie(i, "Similar")).collect())
        }
    }

    #[tokio::test]
    async fn page_above_cap_is_redirected_into_range() {
        let api = Arc::new(FakeCatalogApi {
            default_page: vec![movie(1, "A")],
            ..FakeCatalogApi::configured()
        });
        let fetcher = CatalogFetcher::new(api.clone());
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..25 {
            fetcher
                .fetch_movies(500, Language::Telugu, &mut rng)
                .await
                .unwrap();
        }

        let pages = api.requested_pages();
        assert_eq!(pages.len(), 25);
        assert!(pages.iter().all(|p| (1..=20).contains(p)));
        assert!(!pages.contains(&500));
    }

    #[tokio::test]
    async fn empty_page_retries_page_one_once() {
        let mut pages = HashMap::new();
        pages.insert(7, vec![]);
        pages.insert(1, vec![movie(1, "Premam"), movie(2, "Drishyam")]);
        let api = Arc::new(FakeCatalogApi {
            pages,
            ..FakeCatalogApi::configured()
        });
        let fetcher = CatalogFetcher::new(api.clone());

        let movies = fetcher
            .fetch_movies(7, Language::Malayalam, &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(api.requested_pages(), vec![7, 1]);
        assert!(api
            .requests
            .lock()
            .unwrap()
            .iter()
            .all(|(l, _)| *l == Language::Malayalam));
    }

    #[tokio::test]
    async fn fetched_page_reports_the_page_actually_served() {
        let mut pages = HashMap::new();
        pages.insert(7, vec![]);
        pages.insert(1, vec![movie(1, "Premam")]);
        let api = Arc::new(FakeCatalogApi {
            pages,
            default_page: vec![movie(2, "Drishyam")],
            ..FakeCatalogApi::configured()
        });
        let fetcher = CatalogFetcher::new(api.clone());
        let mut rng = StdRng::seed_from_u64(3);

        let retried = fetcher
            .fetch_page(7, Language::Malayalam, &mut rng)
            .await
            .unwrap();
        assert_eq!(retried.page, 1);
        assert_eq!(retried.movies[0].title, "Premam");

        let clamped = fetcher
            .fetch_page(500, Language::Malayalam, &mut rng)
            .await
            .unwrap();
        assert_eq!(Some(&clamped.page), api.requested_pages().last());
        assert!((1..=20).contains(&clamped.page));
    }

    #[tokio::test]
    async fn empty_first_page_is_not_retried() {
        let api = Arc::new(FakeCatalogApi::configured());
        let fetcher = CatalogFetcher::new(api.clone());

        let movies = fetcher
            .fetch_movies(1, Language::Kannada, &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert!(movies.is_empty());
        assert_eq!(api.requested_pages(), vec![1]);
    }

    #[tokio::test]
    async fn unconfigured_provider_returns_nothing_without_requests() {
        let api = Arc::new(FakeCatalogApi::default());
        let fetcher = CatalogFetcher::new(api.clone());

        let movies = fetcher
            .fetch_movies(3, Language::All, &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert!(movies.is_empty());
        assert!(api.requested_pages().is_empty());
        assert!(fetcher.movie_credits(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clue_lists_are_capped() {
        let fetcher = CatalogFetcher::new(Arc::new(FakeCatalogApi::configured()));

        assert_eq!(fetcher.movie_credits(3).await.unwrap().len(), 5);
        assert_eq!(fetcher.similar_movies(3).await.unwrap().len(), 5);
    }

    #[test]
    fn page_zero_is_treated_as_first_page() {
        let fetcher = CatalogFetcher::new(Arc::new(FakeCatalogApi::configured()));
        assert_eq!(fetcher.clamp_page(0, &mut StdRng::seed_from_u64(1)), 1);
        assert_eq!(fetcher.clamp_page(20, &mut StdRng::seed_from_u64(1)), 20);
    }
}
