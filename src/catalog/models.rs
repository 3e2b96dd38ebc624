//! Movie catalog models.
//!
//! These types match the JSON returned by the movie metadata provider's
//! discover, credits and recommendations endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A movie as returned by the catalog provider. Read-only, never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Paginated discover/recommendations response. `results` may be missing
/// entirely on error payloads.
#[derive(Debug, Deserialize)]
pub(crate) struct MovieListResponse {
    #[serde(default)]
    pub results: Option<Vec<Movie>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreditsResponse {
    #[serde(default)]
    pub cast: Option<Vec<CastMember>>,
}

/// The language selector offered to players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    Telugu,
    Tamil,
    Malayalam,
    Kannada,
    All,
}

impl Language {
    pub const REGIONAL: [Language; 4] = [
        Language::Telugu,
        Language::Tamil,
        Language::Malayalam,
        Language::Kannada,
    ];

    /// Parses a selector key. Unknown keys select every regional language.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "telugu" | "te" => Language::Telugu,
            "tamil" | "ta" => Language::Tamil,
            "malayalam" | "ml" => Language::Malayalam,
            "kannada" | "kn" => Language::Kannada,
            _ => Language::All,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Language::Telugu => "telugu",
            Language::Tamil => "tamil",
            Language::Malayalam => "malayalam",
            Language::Kannada => "kannada",
            Language::All => "all",
        }
    }

    /// Value for the provider's `with_original_language` filter.
    pub fn original_language_filter(&self) -> &'static str {
        match self {
            Language::Telugu => "te",
            Language::Tamil => "ta",
            Language::Malayalam => "ml",
            Language::Kannada => "kn",
            Language::All => "te|ta|ml|kn",
        }
    }

    pub fn is_regional(&self) -> bool {
        !matches!(self, Language::All)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSize {
    W500,
    Original,
}

impl ImageSize {
    fn as_path_segment(&self) -> &'static str {
        match self {
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }
}

pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/500x750?text=No+Image";

/// Full URL for a poster/backdrop path, or a placeholder if there is none.
pub fn image_url(path: Option<&str>, size: ImageSize) -> String {
    match path {
        Some(path) if !path.is_empty() => {
            format!("{}{}{}", IMAGE_BASE_URL, size.as_path_segment(), path)
        }
        _ => PLACEHOLDER_IMAGE_URL.to_string(),
    }
}
