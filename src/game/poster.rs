use rand::seq::{IndexedRandom, SliceRandom};
use std::sync::Arc;
use tracing::{info, warn};

use super::error::GameError;
use super::round::{GuessOutcome, RoundPhase};
use super::scoring::ScoreReporter;
use super::session::GameSession;
use crate::catalog::{image_url, seed_movies, CatalogFetcher, ImageSize, Language, Movie};
use crate::store::GameMode;

/// Options shown per round.
pub const ROUND_SIZE: usize = 4;

/// Page range the poster game draws from, capped at the catalog's page limit.
pub const POSTER_PAGE_SPAN: u32 = 300;

/// Page loads tried before a round is given up.
pub const MAX_ROUND_LOAD_ATTEMPTS: usize = 5;

pub const POSTER_MAX_BLUR: u8 = 20;
pub const POSTER_BLUR_STEP: u8 = 5;

/// Characters of the overview shown as a clue.
pub const CLUE_LEN: usize = 100;

/// Guess the movie from a blurred poster.
pub struct PosterGame {
    fetcher: Arc<CatalogFetcher>,
    reporter: ScoreReporter,
    language: Language,
    page_span: u32,
    phase: RoundPhase,
    candidates: Vec<Movie>,
    target: Option<Movie>,
    blur: u8,
    clue_visible: bool,
}

impl PosterGame {
    pub fn new(fetcher: Arc<CatalogFetcher>, reporter: ScoreReporter, language: Language) -> Self {
        Self {
            fetcher,
            reporter,
            language,
            page_span: POSTER_PAGE_SPAN,
            phase: RoundPhase::Loading,
            candidates: Vec::new(),
            target: None,
            blur: POSTER_MAX_BLUR,
            clue_visible: false,
        }
    }

    pub fn with_page_span(mut self, page_span: u32) -> Self {
        self.page_span = page_span.max(1);
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn candidates(&self) -> &[Movie] {
        &self.candidates
    }

    pub fn target(&self) -> Option<&Movie> {
        self.target.as_ref()
    }

    pub fn blur(&self) -> u8 {
        self.blur
    }

    pub fn poster_url(&self) -> Option<String> {
        self.target
            .as_ref()
            .map(|movie| image_url(movie.poster_path.as_deref(), ImageSize::W500))
    }

    pub fn toggle_clue(&mut self) -> bool {
        self.clue_visible = !self.clue_visible;
        self.clue_visible
    }

    pub fn clue_visible(&self) -> bool {
        self.clue_visible
    }

    /// Start of the target's overview.
    pub fn clue(&self) -> Option<String> {
        self.target
            .as_ref()
            .map(|movie| movie.overview.chars().take(CLUE_LEN).collect())
    }

    /// Fetches a fresh page and starts a round from it.
    ///
    /// Pages with 3 movies or fewer are skipped. Movies already shown this
    /// session are filtered out, unless that leaves fewer than
    /// [`ROUND_SIZE`], in which case the whole page is used again.
    pub async fn load_round(&mut self, session: &mut GameSession) -> Result<(), GameError> {
        if session.is_over() {
            return Err(GameError::GameOver);
        }
        self.phase = RoundPhase::Loading;
        self.candidates.clear();
        self.target = None;

        let language_key = self.language.key();
        // Pages past the catalog cap would be swapped for a random one, so
        // draw within it and the tracker records what was really fetched.
        let page_span = self.page_span.min(self.fetcher.max_pages());
        for attempt in 1..=MAX_ROUND_LOAD_ATTEMPTS {
            let drawn = session.unvisited_random_page(language_key, page_span);
            info!(
                "[poster] Fetching {} movies from page {} (attempt {})",
                language_key, drawn, attempt
            );

            let (page, fetched) = if self.fetcher.is_configured() {
                let served = self
                    .fetcher
                    .fetch_page(drawn, self.language, session.rng_mut())
                    .await?;
                (served.page, served.movies)
            } else {
                warn!("[poster] Catalog unavailable, using the built-in movie list");
                (drawn, seed_movies())
            };

            if fetched.len() < ROUND_SIZE {
                info!("[poster] Page {} too small, retrying", page);
                continue;
            }
            session.mark_page_visited(language_key, page);

            let unseen: Vec<Movie> = fetched
                .iter()
                .filter(|movie| !session.has_seen(movie.id))
                .cloned()
                .collect();
            let pool = if unseen.len() >= ROUND_SIZE {
                unseen
            } else {
                info!(
                    "[poster] Only {} unseen movies on page {}, allowing repeats",
                    unseen.len(),
                    page
                );
                fetched
            };

            self.start_round(pool, session);
            return Ok(());
        }

        Err(GameError::NotEnoughMovies {
            attempts: MAX_ROUND_LOAD_ATTEMPTS,
        })
    }

    fn start_round(&mut self, mut pool: Vec<Movie>, session: &mut GameSession) {
        pool.shuffle(session.rng_mut());
        pool.truncate(ROUND_SIZE);
        let target = pool.choose(session.rng_mut()).cloned();
        if let Some(movie) = &target {
            session.add_to_history(movie.id);
        }

        self.candidates = pool;
        self.target = target;
        self.blur = POSTER_MAX_BLUR;
        self.clue_visible = false;
        self.phase = RoundPhase::Ready;
    }

    pub fn guess(
        &mut self,
        movie_id: u64,
        session: &mut GameSession,
    ) -> Result<GuessOutcome, GameError> {
        match self.phase {
            RoundPhase::Loading => return Err(GameError::RoundNotReady),
            RoundPhase::GameOver => return Err(GameError::GameOver),
            phase if !phase.accepts_guesses() => return Ok(GuessOutcome::Ignored),
            _ => {}
        }
        let Some(target) = self.target.clone() else {
            return Err(GameError::RoundNotReady);
        };

        if movie_id == target.id {
            session.increment_score();
            self.blur = 0;
            self.phase = RoundPhase::Correct;
            return Ok(GuessOutcome::Correct);
        }

        let lives_left = session.decrement_lives();
        if lives_left == 0 {
            self.blur = 0;
            self.phase = RoundPhase::GameOver;
            let final_score = session.score();
            info!(
                "[poster] Game over at {} points, it was {}",
                final_score, target.title
            );
            session.set_last_target(target);
            self.reporter
                .submit(final_score, self.language.key(), GameMode::Poster);
            return Ok(GuessOutcome::GameOver { final_score });
        }

        self.blur = self.blur.saturating_sub(POSTER_BLUR_STEP);
        self.phase = RoundPhase::WrongRetry;
        Ok(GuessOutcome::Wrong { lives_left })
    }

    /// Ends the wrong-answer pause so the player can guess again.
    pub fn clear_wrong_feedback(&mut self) {
        if self.phase == RoundPhase::WrongRetry {
            self.phase = RoundPhase::Ready;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{test_movie, FakeCatalogApi, MAX_CATALOG_PAGES};
    use crate::game::scoring::tests::RecordingStore;

    fn page_of(ids: std::ops::RangeInclusive<u64>) -> Vec<Movie> {
        ids.map(|id| test_movie(id, &format!("Movie {}", id))).collect()
    }

    fn game_with(api: FakeCatalogApi, reporter: ScoreReporter) -> PosterGame {
        let fetcher = Arc::new(CatalogFetcher::new(Arc::new(api)));
        PosterGame::new(fetcher, reporter, Language::Telugu)
    }

    fn wrong_id(game: &PosterGame) -> u64 {
        let target = game.target().unwrap().id;
        game.candidates()
            .iter()
            .map(|m| m.id)
            .find(|id| *id != target)
            .unwrap()
    }

    #[tokio::test]
    async fn round_has_four_candidates_including_target() {
        let api = FakeCatalogApi {
            default_page: page_of(1..=20),
            ..FakeCatalogApi::configured()
        };
        let mut game = game_with(api, ScoreReporter::disabled());
        let mut session = GameSession::with_seed(3, 11);

        game.load_round(&mut session).await.unwrap();

        assert_eq!(game.phase(), RoundPhase::Ready);
        assert_eq!(game.candidates().len(), ROUND_SIZE);
        let target = game.target().unwrap();
        assert!(game.candidates().iter().any(|m| m.id == target.id));
        assert_eq!(session.history(), &[target.id]);
        assert_eq!(game.blur(), POSTER_MAX_BLUR);
        assert_eq!(session.visited_pages().visited_count("telugu"), 1);
    }

    #[tokio::test]
    async fn visited_pages_are_the_pages_fetched() {
        let api = Arc::new(FakeCatalogApi {
            default_page: page_of(1..=20),
            ..FakeCatalogApi::configured()
        });
        let fetcher = Arc::new(CatalogFetcher::new(api.clone()));
        let mut game = PosterGame::new(fetcher, ScoreReporter::disabled(), Language::Telugu);
        let mut session = GameSession::with_seed(50, 6);

        for _ in 0..10 {
            game.load_round(&mut session).await.unwrap();
            let target = game.target().unwrap().id;
            game.guess(target, &mut session).unwrap();
        }

        let mut fetched = api.requested_pages();
        assert!(fetched.iter().all(|p| (1..=MAX_CATALOG_PAGES).contains(p)));
        fetched.sort();
        fetched.dedup();
        // No page was fetched twice while unvisited ones remained.
        assert_eq!(fetched.len(), 10);
        assert_eq!(session.visited_pages().visited_count("telugu"), 10);
    }

    #[tokio::test]
    async fn few_unseen_movies_fall_back_to_whole_page() {
        let api = FakeCatalogApi {
            default_page: page_of(1..=6),
            ..FakeCatalogApi::configured()
        };
        let mut game = game_with(api, ScoreReporter::disabled());
        let mut session = GameSession::with_seed(3, 2);
        for id in 1..=3 {
            session.add_to_history(id);
        }

        game.load_round(&mut session).await.unwrap();

        assert_eq!(game.phase(), RoundPhase::Ready);
        assert_eq!(game.candidates().len(), ROUND_SIZE);
        // Only 3 unseen movies exist, so at least one seen movie is offered.
        assert!(game.candidates().iter().any(|m| m.id <= 3));
    }

    #[tokio::test]
    async fn small_pages_exhaust_attempts() {
        let api = FakeCatalogApi {
            default_page: page_of(1..=3),
            ..FakeCatalogApi::configured()
        };
        let mut game = game_with(api, ScoreReporter::disabled());
        let mut session = GameSession::with_seed(3, 2);

        let err = game.load_round(&mut session).await.unwrap_err();

        assert!(matches!(
            err,
            GameError::NotEnoughMovies {
                attempts: MAX_ROUND_LOAD_ATTEMPTS
            }
        ));
        assert_eq!(game.phase(), RoundPhase::Loading);
        assert_eq!(session.visited_pages().visited_count("telugu"), 0);
    }

    #[tokio::test]
    async fn unconfigured_catalog_uses_seed_movies() {
        let mut game = game_with(FakeCatalogApi::default(), ScoreReporter::disabled());
        let mut session = GameSession::with_seed(3, 4);

        game.load_round(&mut session).await.unwrap();

        let seeds: Vec<u64> = seed_movies().iter().map(|m| m.id).collect();
        assert!(game.candidates().iter().all(|m| seeds.contains(&m.id)));
    }

    #[tokio::test]
    async fn correct_guess_scores_and_reveals() {
        let api = FakeCatalogApi {
            default_page: page_of(1..=8),
            ..FakeCatalogApi::configured()
        };
        let mut game = game_with(api, ScoreReporter::disabled());
        let mut session = GameSession::with_seed(3, 5);
        game.load_round(&mut session).await.unwrap();

        let target = game.target().unwrap().id;
        let outcome = game.guess(target, &mut session).unwrap();

        assert_eq!(outcome, GuessOutcome::Correct);
        assert_eq!(session.score(), 1);
        assert_eq!(game.blur(), 0);
        assert_eq!(
            game.guess(target, &mut session).unwrap(),
            GuessOutcome::Ignored
        );
        assert_eq!(session.score(), 1);
    }

    #[tokio::test]
    async fn wrong_guess_pauses_then_allows_retry() {
        let api = FakeCatalogApi {
            default_page: page_of(1..=8),
            ..FakeCatalogApi::configured()
        };
        let mut game = game_with(api, ScoreReporter::disabled());
        let mut session = GameSession::with_seed(3, 6);
        game.load_round(&mut session).await.unwrap();
        let wrong = wrong_id(&game);

        let outcome = game.guess(wrong, &mut session).unwrap();
        assert_eq!(outcome, GuessOutcome::Wrong { lives_left: 2 });
        assert_eq!(game.phase(), RoundPhase::WrongRetry);
        assert_eq!(game.blur(), POSTER_MAX_BLUR - POSTER_BLUR_STEP);

        assert_eq!(
            game.guess(wrong, &mut session).unwrap(),
            GuessOutcome::Ignored
        );
        assert_eq!(session.lives(), 2);

        game.clear_wrong_feedback();
        assert_eq!(game.phase(), RoundPhase::Ready);
        let target = game.target().unwrap().id;
        assert_eq!(
            game.guess(target, &mut session).unwrap(),
            GuessOutcome::Correct
        );
    }

    #[tokio::test]
    async fn last_life_wrong_guess_ends_game_and_saves_once() {
        let api = FakeCatalogApi {
            default_page: page_of(1..=8),
            ..FakeCatalogApi::configured()
        };
        let store = Arc::new(RecordingStore::default());
        let reporter = ScoreReporter::new(store.clone(), Some("p1".to_string()));
        let mut game = game_with(api, reporter);
        let mut session = GameSession::with_seed(1, 8);

        game.load_round(&mut session).await.unwrap();
        let target = game.target().unwrap().id;
        game.guess(target, &mut session).unwrap();
        game.load_round(&mut session).await.unwrap();
        let wrong = wrong_id(&game);
        let missed = game.target().unwrap().id;

        let outcome = game.guess(wrong, &mut session).unwrap();

        assert_eq!(outcome, GuessOutcome::GameOver { final_score: 1 });
        assert_eq!(session.lives(), 0);
        assert_eq!(game.phase(), RoundPhase::GameOver);
        assert_eq!(game.blur(), 0);
        assert_eq!(session.last_target().map(|m| m.id), Some(missed));

        assert!(matches!(
            game.guess(wrong, &mut session),
            Err(GameError::GameOver)
        ));
        assert!(matches!(
            game.load_round(&mut session).await,
            Err(GameError::GameOver)
        ));

        let scores = store.scores();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 1);
        assert_eq!(scores[0].game_mode, GameMode::Poster);
        assert_eq!(scores[0].language, "telugu");
    }

    #[tokio::test]
    async fn guessing_before_load_is_rejected() {
        let mut game = game_with(FakeCatalogApi::configured(), ScoreReporter::disabled());
        let mut session = GameSession::with_seed(3, 1);
        assert!(matches!(
            game.guess(1, &mut session),
            Err(GameError::RoundNotReady)
        ));
    }

    #[tokio::test]
    async fn clue_is_a_short_overview_prefix() {
        let mut long = test_movie(1, "Long");
        long.overview = "x".repeat(300);
        let mut page = page_of(2..=4);
        page.push(long);
        let api = FakeCatalogApi {
            default_page: page,
            ..FakeCatalogApi::configured()
        };
        let mut game = game_with(api, ScoreReporter::disabled());
        let mut session = GameSession::with_seed(3, 1);
        game.load_round(&mut session).await.unwrap();

        let clue = game.clue().unwrap();
        assert!(clue.chars().count() <= CLUE_LEN);
        assert!(game.target().unwrap().overview.starts_with(&clue));
        assert!(game.toggle_clue());
        assert!(!game.toggle_clue());
    }
}
