use rand::rngs::StdRng;
use rand::SeedableRng;

use super::page_tracker::VisitedPages;
use crate::catalog::Movie;

pub const DEFAULT_STARTING_LIVES: u32 = 3;

/// Everything that lives for one game: score, lives, what was already
/// shown, and the random source used to pick rounds.
///
/// Created when a game starts and handed to the round controllers. The
/// high score survives [`GameSession::reset`].
pub struct GameSession {
    starting_lives: u32,
    score: u32,
    lives: u32,
    high_score: u32,
    history: Vec<u64>,
    played_tracks: Vec<String>,
    visited_pages: VisitedPages,
    last_target: Option<Movie>,
    rng: StdRng,
}

impl GameSession {
    pub fn new(starting_lives: u32) -> Self {
        Self::with_rng(starting_lives, StdRng::from_os_rng())
    }

    /// Deterministic session, for tests and replays.
    pub fn with_seed(starting_lives: u32, seed: u64) -> Self {
        Self::with_rng(starting_lives, StdRng::seed_from_u64(seed))
    }

    fn with_rng(starting_lives: u32, rng: StdRng) -> Self {
        Self {
            starting_lives,
            score: 0,
            lives: starting_lives,
            high_score: 0,
            history: Vec::new(),
            played_tracks: Vec::new(),
            visited_pages: VisitedPages::new(),
            last_target: None,
            rng,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn is_over(&self) -> bool {
        self.lives == 0
    }

    pub fn increment_score(&mut self) {
        self.score = self.score.saturating_add(1);
        self.high_score = self.high_score.max(self.score);
    }

    /// Takes one life, never going below zero. Returns the lives left.
    pub fn decrement_lives(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn history(&self) -> &[u64] {
        &self.history
    }

    pub fn add_to_history(&mut self, movie_id: u64) {
        self.history.push(movie_id);
    }

    pub fn has_seen(&self, movie_id: u64) -> bool {
        self.history.contains(&movie_id)
    }

    pub fn played_tracks(&self) -> &[String] {
        &self.played_tracks
    }

    pub fn add_played_track(&mut self, title: &str) {
        self.played_tracks.push(title.to_string());
    }

    pub fn has_played(&self, title: &str) -> bool {
        self.played_tracks.iter().any(|t| t == title)
    }

    pub fn visited_pages(&self) -> &VisitedPages {
        &self.visited_pages
    }

    pub fn mark_page_visited(&mut self, language: &str, page: u32) -> bool {
        self.visited_pages.mark_page_visited(language, page)
    }

    pub fn unvisited_random_page(&mut self, language: &str, max_pages: u32) -> u32 {
        self.visited_pages
            .unvisited_random_page(language, max_pages, &mut self.rng)
    }

    /// The movie the player missed on game over.
    pub fn last_target(&self) -> Option<&Movie> {
        self.last_target.as_ref()
    }

    pub fn set_last_target(&mut self, movie: Movie) {
        self.last_target = Some(movie);
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Starts over with full lives. Visited pages and the high score are
    /// kept.
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.starting_lives;
        self.history.clear();
        self.played_tracks.clear();
        self.last_target = None;
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_LIVES)
    }
}
