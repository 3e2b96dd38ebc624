//! Movie catalog: the provider client, page policy and fallback data.

mod client;
mod fetcher;
mod models;
mod seed;

pub use client::{CatalogApi, CatalogError, TmdbClient, DEFAULT_TMDB_BASE_URL, MIN_VOTE_COUNT};
pub use fetcher::{CatalogFetcher, FetchedPage, CLUE_LIST_LEN, MAX_CATALOG_PAGES};
pub use models::{image_url, CastMember, ImageSize, Language, Movie, PLACEHOLDER_IMAGE_URL};
pub use seed::seed_movies;

#[cfg(test)]
pub(crate) use fetcher::tests::{movie as test_movie, FakeCatalogApi};
