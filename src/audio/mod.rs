//! Soundtrack previews: provider client, album title cleanup and the
//! query strategies used to pick a clip for a film.

mod cleanup;
mod client;
mod models;
mod resolver;

pub use cleanup::{apply_rules_once, clean_album_title, upgrade_artwork_url, CLEANUP_RULES};
pub use client::{AudioError, AudioSearch, ItunesClient, DEFAULT_ITUNES_SEARCH_URL};
pub use models::{AudioTrack, SongSearchHit, TrackSource};
pub use resolver::{looks_like_mismatch, regional_query, AudioResolver, MISMATCH_FILLER_THRESHOLD};

#[cfg(test)]
pub(crate) use resolver::tests::{hit as test_hit, FakeAudioSearch};
