use rand::Rng;
use std::collections::{HashMap, HashSet};

/// How many draws are attempted before a visited page is accepted.
pub const MAX_PAGE_DRAW_ATTEMPTS: usize = 50;

/// Catalog pages already drawn this session, per language key.
#[derive(Clone, Debug, Default)]
pub struct VisitedPages {
    pages: HashMap<String, HashSet<u32>>,
}

impl VisitedPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the page was not already marked.
    pub fn mark_page_visited(&mut self, language: &str, page: u32) -> bool {
        self.pages
            .entry(language.to_string())
            .or_default()
            .insert(page)
    }

    pub fn is_visited(&self, language: &str, page: u32) -> bool {
        self.pages
            .get(language)
            .map(|visited| visited.contains(&page))
            .unwrap_or(false)
    }

    pub fn visited_count(&self, language: &str) -> usize {
        self.pages.get(language).map(HashSet::len).unwrap_or(0)
    }

    /// Uniform draw from `1..=max_pages` skipping visited pages.
    ///
    /// Best effort: after [`MAX_PAGE_DRAW_ATTEMPTS`] rejected draws the last
    /// candidate is returned even though it was already visited.
    pub fn unvisited_random_page<R: Rng>(
        &self,
        language: &str,
        max_pages: u32,
        rng: &mut R,
    ) -> u32 {
        let max_pages = max_pages.max(1);
        let visited = self.pages.get(language);
        let mut candidate = rng.random_range(1..=max_pages);
        for _ in 1..MAX_PAGE_DRAW_ATTEMPTS {
            match visited {
                Some(set) if set.contains(&candidate) => {
                    candidate = rng.random_range(1..=max_pages);
                }
                _ => break,
            }
        }
        candidate
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn marking_is_idempotent() {
        let mut pages = VisitedPages::new();
        assert!(pages.mark_page_visited("tamil", 4));
        assert!(!pages.mark_page_visited("tamil", 4));
        assert_eq!(pages.visited_count("tamil"), 1);
        assert!(pages.is_visited("tamil", 4));
    }

    #[test]
    fn languages_are_tracked_separately() {
        let mut pages = VisitedPages::new();
        pages.mark_page_visited("tamil", 4);
        assert!(!pages.is_visited("telugu", 4));
        assert_eq!(pages.visited_count("telugu"), 0);
    }

    #[test]
    fn draws_avoid_visited_pages_until_nearly_exhausted() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut pages = VisitedPages::new();
        let max_pages = 30;

        // With at least a few pages left, 50 draws practically never all miss.
        for _ in 0..(max_pages - 5) {
            let page = pages.unvisited_random_page("all", max_pages, &mut rng);
            assert!((1..=max_pages).contains(&page));
            assert!(!pages.is_visited("all", page), "page {} repeated", page);
            pages.mark_page_visited("all", page);
        }
    }

    #[test]
    fn exhausted_range_still_returns_a_page() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pages = VisitedPages::new();
        for page in 1..=5 {
            pages.mark_page_visited("kannada", page);
        }

        let page = pages.unvisited_random_page("kannada", 5, &mut rng);
        assert!((1..=5).contains(&page));
    }

    #[test]
    fn zero_max_pages_draws_first_page() {
        let pages = VisitedPages::new();
        assert_eq!(
            pages.unvisited_random_page("all", 0, &mut StdRng::seed_from_u64(1)),
            1
        );
    }
}
