//! The two game modes and the per-game state they share.

mod error;
mod page_tracker;
mod player;
pub mod playlists;
mod poster;
mod round;
mod scoring;
mod session;
mod soundtrack;

pub use error::GameError;
pub use page_tracker::{VisitedPages, MAX_PAGE_DRAW_ATTEMPTS};
pub use player::{LinkPreviewPlayer, PreviewPlayer};
pub use playlists::{playlist_for, RegionalPlaylist};
pub use poster::{
    PosterGame, CLUE_LEN, MAX_ROUND_LOAD_ATTEMPTS, POSTER_BLUR_STEP, POSTER_MAX_BLUR,
    POSTER_PAGE_SPAN, ROUND_SIZE,
};
pub use round::{GuessOutcome, RoundPhase};
pub use scoring::ScoreReporter;
pub use session::{GameSession, DEFAULT_STARTING_LIVES};
pub use soundtrack::{
    SoundtrackGame, TickOutcome, COUNTDOWN_SECS, DYNAMIC_ATTEMPTS, IMAGE_MAX_BLUR,
    OVERLAY_START, SOUNDTRACK_PAGE_SPAN,
};
