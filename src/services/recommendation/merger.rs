use std::collections::HashSet;

use crate::models::{MovieId, RecommendedMovie, ScoredMovie};

/// Fixed ranking score for popularity backfill; always ranks last
pub const FALLBACK_SCORE: f64 = 0.3;

/// Combines recommendation sources into one deduplicated, ranked list
///
/// Movies the user already watched, or that an earlier source already
/// contributed, are skipped.
#[derive(Debug)]
pub struct Merger {
    seen: HashSet<MovieId>,
    items: Vec<ScoredMovie>,
    capacity: usize,
}

impl Merger {
    pub fn new(watched: &HashSet<MovieId>, capacity: usize) -> Self {
        Self {
            seen: watched.clone(),
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends movies in order, skipping anything already seen
    pub fn extend(&mut self, movies: impl IntoIterator<Item = ScoredMovie>) {
        for movie in movies {
            if self.seen.insert(movie.movie_id()) {
                self.items.push(movie);
            }
        }
    }

    /// Slots left before the result is full
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    /// Watched and already merged movie ids, ascending
    pub fn seen_ids(&self) -> Vec<MovieId> {
        let mut ids: Vec<MovieId> = self.seen.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Pads with popular movies at [`FALLBACK_SCORE`] until full or out of
    /// movies. Returns how many were added.
    pub fn backfill(&mut self, movies: impl IntoIterator<Item = RecommendedMovie>) -> usize {
        let before = self.items.len();
        for movie in movies {
            if self.remaining() == 0 {
                break;
            }
            self.extend(std::iter::once(ScoredMovie::new(movie, FALLBACK_SCORE)));
        }
        self.items.len() - before
    }

    /// Ranks by score and drops the scores. Equal scores keep merge order.
    pub fn finish(mut self) -> Vec<RecommendedMovie> {
        self.items.sort_by(|a, b| b.score.total_cmp(&a.score));
        self.items
            .into_iter()
            .take(self.capacity)
            .map(|scored| scored.movie)
            .collect()
    }
}
