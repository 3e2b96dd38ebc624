use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use super::cleanup::{clean_album_title, upgrade_artwork_url};
use super::client::AudioSearch;
use super::models::{AudioTrack, SongSearchHit, TrackSource};

/// Common English words whose joint presence in a track title suggests the
/// search drifted to an unrelated English song.
const ENGLISH_FILLER_WORDS: &[&str] = &["the", "you", "me", "my", "love", "baby", "and", "i"];

/// How many distinct filler words must appear before a title looks English.
pub const MISMATCH_FILLER_THRESHOLD: usize = 3;

/// Turns free-text queries into at most one playable [`AudioTrack`].
pub struct AudioResolver {
    search: Arc<dyn AudioSearch>,
}

impl AudioResolver {
    pub fn new(search: Arc<dyn AudioSearch>) -> Self {
        Self { search }
    }

    /// One provider query, first hit only. Provider failures are logged and
    /// reported as "nothing playable".
    pub async fn resolve(&self, query: &str) -> Option<AudioTrack> {
        info!("[audio] Searching for: {}", query);
        let hits = match self.search.search_songs(query, 1).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!("[audio] Search for {:?} failed: {}", query, err);
                return None;
            }
        };
        hits.into_iter().next().and_then(track_from_hit)
    }

    /// Query biased toward a regional release:
    /// `"<title> <language> movie songs"`.
    pub async fn resolve_regional(&self, title: &str, search_tag: &str) -> Option<AudioTrack> {
        self.resolve(&regional_query(title, search_tag)).await
    }

    /// Query used for titles drawn from the live catalog.
    pub async fn resolve_soundtrack(&self, title: &str) -> Option<AudioTrack> {
        self.resolve(&format!("{} soundtrack", title)).await
    }
}

pub fn regional_query(title: &str, search_tag: &str) -> String {
    format!("{} {} movie songs", title, search_tag)
}

/// Hits without a preview are useless for the game.
fn track_from_hit(hit: SongSearchHit) -> Option<AudioTrack> {
    let preview_url = hit.preview_url.filter(|url| !url.trim().is_empty())?;
    Some(AudioTrack {
        movie: clean_album_title(&hit.collection_name),
        title: hit.track_name,
        artist: hit.artist_name,
        preview_url,
        artwork_url: hit
            .artwork_url_100
            .map(|url| upgrade_artwork_url(&url))
            .unwrap_or_default(),
        source: TrackSource::Itunes,
    })
}

/// True when the resolved track looks like a generic English song rather
/// than something from `target_title`: several filler words in the track
/// title while the album does not mention the target.
pub fn looks_like_mismatch(track: &AudioTrack, target_title: &str) -> bool {
    let target = target_title.trim().to_lowercase();
    if !target.is_empty() && track.movie.to_lowercase().contains(&target) {
        return false;
    }

    let words: HashSet<String> = track
        .title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    let hits = ENGLISH_FILLER_WORDS
        .iter()
        .filter(|w| words.contains(**w))
        .count();
    hits >= MISMATCH_FILLER_THRESHOLD
}
