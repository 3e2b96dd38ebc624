use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Could not find enough movies for a round after {attempts} attempts")]
    NotEnoughMovies { attempts: usize },

    #[error("Could not find music for a round")]
    NoPlayableTrack,

    #[error("The round is still loading")]
    RoundNotReady,

    #[error("The game is over")]
    GameOver,

    #[error("Could not fetch movies: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Could not play the preview: {0:#}")]
    Playback(anyhow::Error),
}
