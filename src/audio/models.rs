use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackSource {
    Itunes,
}

/// A playable soundtrack clip. `movie` is the provider's album name after
/// [`super::clean_album_title`], which for regional releases is the film title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTrack {
    pub title: String,
    pub artist: String,
    pub movie: String,
    pub preview_url: String,
    pub artwork_url: String,
    pub source: TrackSource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SongSearchResponse {
    #[serde(default)]
    pub result_count: usize,
    #[serde(default)]
    pub results: Vec<SongSearchHit>,
}

/// One song result of the preview provider search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongSearchHit {
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub collection_name: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default, rename = "artworkUrl100")]
    pub artwork_url_100: Option<String>,
}
