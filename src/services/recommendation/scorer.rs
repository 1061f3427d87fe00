use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::models::{
    CandidateMovie, MovieId, RecommendationWeights, RecommendedMovie, ScoredMovie, TasteProfile,
};

/// Per-candidate similarity signals, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub genre: f64,
    pub people: f64,
    pub rating: f64,
    pub popularity: f64,
}

impl ComponentScores {
    pub fn compute(candidate: &CandidateMovie, profile: &TasteProfile, comment_count: i64) -> Self {
        Self {
            genre: overlap_ratio(&candidate.genre_ids, &profile.preferred_genre_ids),
            people: overlap_ratio(&candidate.person_ids, &profile.preferred_person_ids),
            rating: rating_score(candidate.average_rating),
            popularity: popularity_score(comment_count),
        }
    }

    pub fn weighted(&self, weights: &RecommendationWeights) -> f64 {
        self.genre * weights.genre
            + self.people * weights.people
            + self.rating * weights.rating
            + self.popularity * weights.popularity
    }
}

/// Share of `preferred` that also appears in `items`; 0 when nothing is preferred
pub fn overlap_ratio<T: Eq + Hash>(items: &[T], preferred: &[T]) -> f64 {
    if preferred.is_empty() {
        return 0.0;
    }

    let preferred: HashSet<&T> = preferred.iter().collect();
    let matching = items
        .iter()
        .collect::<HashSet<&T>>()
        .intersection(&preferred)
        .count();

    matching as f64 / preferred.len() as f64
}

/// Catalog rating mapped linearly from 0-10 onto [0, 1]
pub fn rating_score(average_rating: f64) -> f64 {
    (average_rating / 10.0).clamp(0.0, 1.0)
}

/// Log-damped public comment count, capped at 1.0
pub fn popularity_score(comment_count: i64) -> f64 {
    let count = comment_count.max(0) as f64;
    ((count + 1.0).ln() / 10.0).min(1.0)
}

/// Scores every candidate and returns those with a positive score, best first.
/// Equal scores are ordered by ascending movie id.
pub fn score_candidates(
    candidates: &[CandidateMovie],
    profile: &TasteProfile,
    weights: &RecommendationWeights,
    comment_counts: &HashMap<MovieId, i64>,
) -> Vec<ScoredMovie> {
    let mut scored: Vec<ScoredMovie> = candidates
        .iter()
        .filter_map(|candidate| {
            let count = comment_counts
                .get(&candidate.movie_id)
                .copied()
                .unwrap_or(0);
            let score = ComponentScores::compute(candidate, profile, count).weighted(weights);

            (score > 0.0).then(|| ScoredMovie::new(RecommendedMovie::from(candidate), score))
        })
        .collect();

    scored.sort_by(rank_order);
    scored
}

fn rank_order(a: &ScoredMovie, b: &ScoredMovie) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.movie_id().cmp(&b.movie_id()))
}
