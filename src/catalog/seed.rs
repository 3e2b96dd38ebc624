use super::models::Movie;

fn seed(
    id: u64,
    title: &str,
    overview: &str,
    poster_path: Option<&str>,
    backdrop_path: Option<&str>,
    release_date: &str,
    original_language: &str,
    genre_ids: &[u32],
    vote_average: f64,
) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        original_title: title.to_string(),
        overview: overview.to_string(),
        poster_path: poster_path.map(str::to_string),
        backdrop_path: backdrop_path.map(str::to_string),
        release_date: release_date.to_string(),
        original_language: original_language.to_string(),
        genre_ids: genre_ids.to_vec(),
        vote_average,
    }
}

/// Small fixed movie list used when the catalog provider has no credentials,
/// so a poster round can still be played offline.
pub fn seed_movies() -> Vec<Movie> {
    vec![
        seed(
            1,
            "Baahubali: The Beginning",
            "The young Shivudu is left as a foundling in a small village by his mother. By the time he grows up, it becomes apparent that he possesses exceptional gifts. He meets the beautiful warrior/rebel Avantika with whom he falls in love. In trying to win her over, he learns about his past and his true legacy.",
            Some("/9BAjt8nSSms62uOVyeS1j8FBbZu.jpg"),
            Some("/k1NUAe5tXJpM3Uo7cI5Uv2G9H0B.jpg"),
            "2015-07-10",
            "te",
            &[28, 12, 18],
            7.7,
        ),
        seed(
            2,
            "RRR",
            "A fictional history of two legendary revolutionaries' journey away from home before they began fighting for their country in the 1920s.",
            Some("/nEufeZlyAOLqO2brrs0yeF1lgXO.jpg"),
            Some("/s85WA0ccy1sP1Xbbf2jK1Gxg4zH.jpg"),
            "2022-03-24",
            "te",
            &[28, 18],
            7.8,
        ),
        seed(
            3,
            "Vikram",
            "Members of a black ops squad must track and eliminate a gang of masked murderers.",
            Some("/bK535V4raiyMv44bJ6O4vN2iT5k.jpg"),
            Some("/5aC1a7r0f5v2r8Pb4K5v1a1J5v.jpg"),
            "2022-06-03",
            "ta",
            &[28, 53],
            7.9,
        ),
        seed(
            4,
            "Kantara",
            "When greed paves the way for betrayal, scheming and murder, a young tribal reluctantly dons the traditions of his ancestors to seek justice.",
            None,
            None,
            "2022-09-30",
            "kn",
            &[28, 18, 53],
            7.6,
        ),
        seed(
            5,
            "Premam",
            "George goes through three phases of romance over the course of his life, from a teenage crush to a college romance and finally a chance meeting years later.",
            None,
            None,
            "2015-05-29",
            "ml",
            &[10749, 35, 18],
            7.9,
        ),
        seed(
            6,
            "Manjummel Boys",
            "A group of friends from Manjummel travel to Kodaikanal, where one of them falls into a deep cave and the others attempt a rescue.",
            None,
            None,
            "2024-02-22",
            "ml",
            &[12, 18, 53],
            7.8,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_list_can_fill_a_round() {
        let movies = seed_movies();
        let ids: HashSet<u64> = movies.iter().map(|m| m.id).collect();

        assert!(movies.len() >= 4);
        assert_eq!(ids.len(), movies.len());
    }
}
