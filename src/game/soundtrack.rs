use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

use super::error::GameError;
use super::player::PreviewPlayer;
use super::playlists::{playlist_for, RegionalPlaylist};
use super::round::{GuessOutcome, RoundPhase};
use super::scoring::ScoreReporter;
use super::session::GameSession;
use crate::audio::{looks_like_mismatch, AudioResolver, AudioTrack};
use crate::catalog::{CatalogFetcher, Language, Movie};
use crate::store::GameMode;

/// Catalog pages tried before falling back to the static playlist.
pub const DYNAMIC_ATTEMPTS: usize = 3;
/// Movies per catalog page whose audio is looked up.
pub const CANDIDATES_PER_PAGE: usize = 3;
/// Page range the soundtrack game draws from, before the catalog clamps it.
pub const SOUNDTRACK_PAGE_SPAN: u32 = 50;
/// Redraws from the static playlist when the drawn title was already played.
pub const MAX_FALLBACK_REDRAWS: usize = 5;

pub const DISTRACTOR_COUNT: usize = 3;

pub const COUNTDOWN_SECS: u32 = 30;
/// Below this many seconds left, every tick thins the overlay.
pub const PANIC_THRESHOLD_SECS: u32 = 10;

pub const OVERLAY_START: u8 = 90;
pub const OVERLAY_PANIC_STEP: u8 = 5;

pub const IMAGE_MAX_BLUR: u8 = 80;
pub const IMAGE_BLUR_STEP: u8 = 20;
pub const IMAGE_MIN_BLUR: u8 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown not running (loading or answer revealed).
    Idle,
    Running { seconds_left: u32 },
    TimedOut,
    GameOver { final_score: u32 },
}

/// Name that tune: a soundtrack clip plays and the player picks the film.
pub struct SoundtrackGame {
    fetcher: Arc<CatalogFetcher>,
    resolver: AudioResolver,
    player: Box<dyn PreviewPlayer>,
    reporter: ScoreReporter,
    language_key: String,
    language: Language,
    playlist: &'static RegionalPlaylist,
    page_span: u32,
    countdown_secs: u32,
    phase: RoundPhase,
    track: Option<AudioTrack>,
    correct_movie: String,
    options: Vec<String>,
    seconds_left: u32,
    overlay: u8,
    image_blur: u8,
}

impl SoundtrackGame {
    pub fn new(
        fetcher: Arc<CatalogFetcher>,
        resolver: AudioResolver,
        player: Box<dyn PreviewPlayer>,
        reporter: ScoreReporter,
        language_key: &str,
    ) -> Self {
        let language_key = language_key.trim().to_lowercase();
        Self {
            fetcher,
            resolver,
            player,
            reporter,
            language: Language::from_key(&language_key),
            playlist: playlist_for(&language_key),
            language_key,
            page_span: SOUNDTRACK_PAGE_SPAN,
            countdown_secs: COUNTDOWN_SECS,
            phase: RoundPhase::Loading,
            track: None,
            correct_movie: String::new(),
            options: Vec::new(),
            seconds_left: COUNTDOWN_SECS,
            overlay: OVERLAY_START,
            image_blur: IMAGE_MAX_BLUR,
        }
    }

    pub fn with_page_span(mut self, page_span: u32) -> Self {
        self.page_span = page_span.max(1);
        self
    }

    pub fn with_countdown(mut self, countdown_secs: u32) -> Self {
        self.countdown_secs = countdown_secs.max(1);
        self.seconds_left = self.countdown_secs;
        self
    }

    pub fn language_key(&self) -> &str {
        &self.language_key
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn track(&self) -> Option<&AudioTrack> {
        self.track.as_ref()
    }

    pub fn correct_movie(&self) -> &str {
        &self.correct_movie
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn overlay(&self) -> u8 {
        self.overlay
    }

    pub fn image_blur(&self) -> u8 {
        self.image_blur
    }

    /// The clue for this mode is the credited artist.
    pub fn clue(&self) -> Option<&str> {
        self.track.as_ref().map(|track| track.artist.as_str())
    }

    pub fn player(&self) -> &dyn PreviewPlayer {
        self.player.as_ref()
    }

    pub fn toggle_play(&mut self) -> bool {
        let playing = self.player.is_playing();
        self.player.set_paused(playing);
        self.player.is_playing()
    }

    /// Finds a playable clip and starts a round with it.
    ///
    /// Live catalog pages are tried first. When none of their titles
    /// resolves to a clip, a title from the static playlist is used.
    pub async fn load_round(&mut self, session: &mut GameSession) -> Result<(), GameError> {
        if session.is_over() {
            return Err(GameError::GameOver);
        }
        self.player.unload();
        self.phase = RoundPhase::Loading;
        self.track = None;
        self.correct_movie.clear();
        self.options.clear();
        self.seconds_left = self.countdown_secs;
        self.overlay = OVERLAY_START;
        self.image_blur = IMAGE_MAX_BLUR;

        let found = match self.find_dynamic_track(session).await {
            Some(found) => Some(found),
            None => {
                info!("[soundtrack] Dynamic lookup failed, falling back to the classic collection");
                self.find_fallback_track(session).await
            }
        };
        let Some((selected_title, track)) = found else {
            return Err(GameError::NoPlayableTrack);
        };

        session.add_played_track(&selected_title);
        info!("[soundtrack] Loading sound from {}", track.preview_url);
        self.player
            .load(&track.preview_url)
            .map_err(GameError::Playback)?;

        self.correct_movie = if track.movie.trim().is_empty() {
            warn!(
                "[soundtrack] No album name for {:?}, answering with {}",
                track.title, selected_title
            );
            selected_title
        } else {
            track.movie.clone()
        };
        self.options = self.build_options(session.rng_mut());
        self.track = Some(track);
        self.phase = RoundPhase::Ready;
        Ok(())
    }

    async fn find_dynamic_track(&self, session: &mut GameSession) -> Option<(String, AudioTrack)> {
        for attempt in 1..=DYNAMIC_ATTEMPTS {
            let page = session.rng_mut().random_range(1..=self.page_span);
            let movies = match self
                .fetcher
                .fetch_movies(page, self.language, session.rng_mut())
                .await
            {
                Ok(movies) => movies,
                Err(err) => {
                    warn!("[soundtrack] Catalog page {} failed: {}", page, err);
                    Vec::new()
                }
            };

            let mut candidates: Vec<Movie> = movies
                .into_iter()
                .filter(|movie| !session.has_played(&movie.title))
                .collect();
            candidates.shuffle(session.rng_mut());
            candidates.truncate(CANDIDATES_PER_PAGE);

            for movie in candidates {
                info!(
                    "[soundtrack] Trying dynamic movie {} (attempt {})",
                    movie.title, attempt
                );
                let Some(track) = self.resolver.resolve_soundtrack(&movie.title).await else {
                    continue;
                };
                if self.language.is_regional() && looks_like_mismatch(&track, &movie.title) {
                    info!(
                        "[soundtrack] Skipping {:?}, looks unrelated to {}",
                        track.title, movie.title
                    );
                    continue;
                }
                return Some((movie.title, track));
            }
        }
        None
    }

    async fn find_fallback_track(&self, session: &mut GameSession) -> Option<(String, AudioTrack)> {
        let mut title = self.playlist.random_title(session.rng_mut());
        let mut redraws = 0;
        while session.has_played(title) && redraws < MAX_FALLBACK_REDRAWS {
            title = self.playlist.random_title(session.rng_mut());
            redraws += 1;
        }

        let track = match self
            .resolver
            .resolve_regional(title, self.playlist.search_tag)
            .await
        {
            Some(track) => Some(track),
            None => self.resolver.resolve_soundtrack(title).await,
        };
        track.map(|track| (title.to_string(), track))
    }

    fn build_options<R: Rng>(&self, rng: &mut R) -> Vec<String> {
        let mut options = vec![self.correct_movie.clone()];
        options.extend(
            self.playlist
                .distractors(&self.correct_movie, DISTRACTOR_COUNT, rng),
        );
        options.shuffle(rng);
        options
    }

    fn reveal(&mut self) {
        self.image_blur = 0;
        self.overlay = 0;
    }

    fn end_game(&mut self, session: &GameSession) -> u32 {
        self.reveal();
        self.phase = RoundPhase::GameOver;
        let final_score = session.score();
        info!(
            "[soundtrack] Game over at {} points, it was {}",
            final_score, self.correct_movie
        );
        self.reporter
            .submit(final_score, &self.language_key, GameMode::Soundtrack);
        final_score
    }

    /// Exact match against the cleaned album title.
    pub fn guess(
        &mut self,
        title: &str,
        session: &mut GameSession,
    ) -> Result<GuessOutcome, GameError> {
        match self.phase {
            RoundPhase::Loading => return Err(GameError::RoundNotReady),
            RoundPhase::GameOver => return Err(GameError::GameOver),
            phase if !phase.accepts_guesses() => return Ok(GuessOutcome::Ignored),
            _ => {}
        }

        if title == self.correct_movie {
            session.increment_score();
            self.reveal();
            self.phase = RoundPhase::Correct;
            return Ok(GuessOutcome::Correct);
        }

        let lives_left = session.decrement_lives();
        if lives_left == 0 {
            let final_score = self.end_game(session);
            return Ok(GuessOutcome::GameOver { final_score });
        }

        self.image_blur = self
            .image_blur
            .saturating_sub(IMAGE_BLUR_STEP)
            .max(IMAGE_MIN_BLUR);
        self.phase = RoundPhase::WrongRetry;
        Ok(GuessOutcome::Wrong { lives_left })
    }

    /// Ends the wrong-answer pause so the player can guess again.
    pub fn clear_wrong_feedback(&mut self) {
        if self.phase == RoundPhase::WrongRetry {
            self.phase = RoundPhase::Ready;
        }
    }

    /// One second of countdown. Running out of time costs a life and
    /// reveals the answer.
    pub fn tick(&mut self, session: &mut GameSession) -> TickOutcome {
        if !matches!(self.phase, RoundPhase::Ready | RoundPhase::WrongRetry) {
            return TickOutcome::Idle;
        }
        if self.seconds_left < PANIC_THRESHOLD_SECS {
            self.overlay = self.overlay.saturating_sub(OVERLAY_PANIC_STEP);
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left > 0 {
            return TickOutcome::Running {
                seconds_left: self.seconds_left,
            };
        }

        if session.decrement_lives() == 0 {
            let final_score = self.end_game(session);
            return TickOutcome::GameOver { final_score };
        }
        info!("[soundtrack] Time is up, it was {}", self.correct_movie);
        self.reveal();
        self.phase = RoundPhase::TimedOut;
        TickOutcome::TimedOut
    }
}

impl Drop for SoundtrackGame {
    fn drop(&mut self) {
        self.player.unload();
    }
}
