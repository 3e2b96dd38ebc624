//! Hand-picked soundtrack titles per language, used when the live catalog
//! does not yield a playable clip and as the distractor pool.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

pub struct RegionalPlaylist {
    pub language: &'static str,
    /// Appended to regional audio queries, e.g. `"RRR telugu movie songs"`.
    pub search_tag: &'static str,
    pub titles: &'static [&'static str],
}

pub const TELUGU: RegionalPlaylist = RegionalPlaylist {
    language: "telugu",
    search_tag: "telugu",
    titles: &[
        "Pushpa 2",
        "Devara",
        "Guntur Kaaram",
        "Salaar",
        "RRR",
        "Baahubali",
        "Ala Vaikunthapurramuloo",
        "Jersey",
        "Arjun Reddy",
        "Kalki 2898 AD",
    ],
};

pub const TAMIL: RegionalPlaylist = RegionalPlaylist {
    language: "tamil",
    search_tag: "tamil",
    titles: &[
        "Leo",
        "Jailer",
        "Vikram",
        "Master",
        "Ponniyin Selvan",
        "96",
        "Kaithi",
        "Thiruchitrambalam",
        "Vada Chennai",
        "Asuran",
    ],
};

pub const MALAYALAM: RegionalPlaylist = RegionalPlaylist {
    language: "malayalam",
    search_tag: "malayalam",
    titles: &[
        "Manjummel Boys",
        "Aavesham",
        "Premalu",
        "Bramayugam",
        "Lucifer",
        "Kumbalangi Nights",
        "Hridayam",
        "Minnal Murali",
        "Thallumaala",
    ],
};

pub const HINDI: RegionalPlaylist = RegionalPlaylist {
    language: "hindi",
    search_tag: "hindi",
    titles: &[
        "Jawan",
        "Pathaan",
        "Animal",
        "Rocky Aur Rani",
        "War",
        "Kabir Singh",
        "Yeh Jawaani Hai Deewani",
        "3 Idiots",
    ],
};

pub const PLAYLISTS: [&RegionalPlaylist; 4] = [&TELUGU, &TAMIL, &MALAYALAM, &HINDI];

/// Unknown languages get the Telugu list.
pub fn playlist_for(language: &str) -> &'static RegionalPlaylist {
    let key = language.trim().to_lowercase();
    PLAYLISTS
        .iter()
        .copied()
        .find(|p| p.language == key)
        .unwrap_or(&TELUGU)
}

/// True when `candidate` appears inside `correct`, ignoring case.
fn overlaps(correct: &str, candidate: &str) -> bool {
    correct.to_lowercase().contains(&candidate.to_lowercase())
}

impl RegionalPlaylist {
    pub fn random_title<R: Rng>(&self, rng: &mut R) -> &'static str {
        self.titles.choose(rng).copied().unwrap_or(TELUGU.titles[0])
    }

    /// Up to `count` distinct titles that do not overlap with `correct`.
    pub fn distractors<R: Rng>(&self, correct: &str, count: usize, rng: &mut R) -> Vec<String> {
        let mut pool: Vec<&str> = self
            .titles
            .iter()
            .copied()
            .filter(|title| !overlaps(correct, title))
            .collect();
        pool.shuffle(rng);
        pool.into_iter().take(count).map(str::to_string).collect()
    }
}
