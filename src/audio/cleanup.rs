//! Album title cleanup.
//!
//! Preview providers report soundtrack albums with a lot of marketing noise
//! ("RRR (Original Motion Picture Soundtrack)", "Hukum (From \"Jailer\")",
//! "Leo - EP"). The film title is recovered with an ordered list of regex
//! rules. Order matters: suffix rules are anchored at the end of the string
//! and rely on the rules before them having already peeled off whatever was
//! trailing.

use lazy_static::lazy_static;
use regex::Regex;

pub struct CleanupRule {
    pub name: &'static str,
    pattern: Regex,
}

impl CleanupRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("cleanup rule regex should compile"),
        }
    }

    fn apply(&self, input: &str) -> String {
        self.pattern.replace_all(input, "").into_owned()
    }
}

lazy_static! {
    /// `(From "Movie")` style wrappers. The first one that matches wins and
    /// its capture replaces the whole title.
    static ref FROM_WRAPPERS: Vec<Regex> = vec![
        Regex::new(r#"(?i)\(\s*from\s+["“”']([^"“”']+)["“”']\s*\)"#),
        Regex::new(r#"(?i)\[\s*from\s+["“”']([^"“”']+)["“”']\s*\]"#),
        Regex::new(r"(?i)\(\s*from\s+([^)]+?)\s*\)"),
    ]
    .into_iter()
    .map(|r| r.expect("from-wrapper regex should compile"))
    .collect();

    pub static ref CLEANUP_RULES: Vec<CleanupRule> = vec![
        CleanupRule::new(
            "motion-picture-soundtrack",
            r"(?i)\s*[\(\[]?\s*original\s+motion\s+picture\s+soundtrack\s*[\)\]]?",
        ),
        CleanupRule::new(
            "soundtrack-tag",
            r"(?i)\s*[\(\[]\s*(?:original\s+)?soundtrack\s*[\)\]]",
        ),
        CleanupRule::new("release-kind", r"(?i)\s*-\s*(?:ep|single|ost)\s*$"),
        CleanupRule::new(
            "deluxe",
            r"(?i)\s*[\(\[]\s*deluxe(?:\s+(?:edition|version))?\s*[\)\]]",
        ),
        CleanupRule::new("live", r"(?i)\s*[\(\[]\s*live\s*[\)\]]"),
        CleanupRule::new(
            "featuring",
            r"(?i)\s*[\(\[]\s*(?:feat\.|ft\.|featuring\s)[^\)\]]*[\)\]]",
        ),
        CleanupRule::new(
            "part-number",
            r"(?i)\s*[-:,]?\s*[\(\[]?\s*\bpart\s*\d+\s*[\)\]]?\s*$",
        ),
        CleanupRule::new("trailing-year", r"\s*\(\s*\d{4}\s*\)\s*$"),
        CleanupRule::new("dangling-separator", r"\s*[-:|,]\s*$"),
    ];
}

const MAX_CLEANUP_PASSES: usize = 8;

fn extract_from_wrapper(title: &str) -> Option<String> {
    FROM_WRAPPERS.iter().find_map(|pattern| {
        pattern
            .captures(title)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One pass of the wrapper extraction followed by every rule, in order.
pub fn apply_rules_once(title: &str) -> String {
    let mut current = extract_from_wrapper(title).unwrap_or_else(|| title.to_string());
    for rule in CLEANUP_RULES.iter() {
        current = rule.apply(&current);
    }
    collapse_whitespace(&current)
}

/// Recovers a film title from a noisy album/collection name.
///
/// Runs [`apply_rules_once`] until the title stops changing, so the result
/// is stable under repeated cleaning. If cleanup would leave nothing, the
/// trimmed input is returned unchanged.
pub fn clean_album_title(raw: &str) -> String {
    let mut current = collapse_whitespace(raw);
    let fallback = current.clone();
    for _ in 0..MAX_CLEANUP_PASSES {
        let next = apply_rules_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    if current.is_empty() {
        fallback
    } else {
        current
    }
}

/// Swaps the provider's 100px artwork for the 600px variant.
pub fn upgrade_artwork_url(url: &str) -> String {
    url.replace("100x100", "600x600")
}
