use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

use crate::models::RecommendationWeights;

/// Raw draw ranges, before normalization
pub const GENRE_RANGE: RangeInclusive<f64> = 0.1..=0.6;
pub const PEOPLE_RANGE: RangeInclusive<f64> = 0.1..=0.6;
pub const RATING_RANGE: RangeInclusive<f64> = 0.1..=0.4;
pub const POPULARITY_RANGE: RangeInclusive<f64> = 0.05..=0.3;

/// Where per-request randomness comes from
///
/// Every request draws fresh blending weights and samples external results,
/// so two identical requests may rank differently. `Seeded` pins the
/// generator for reproducible output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RngPolicy {
    #[default]
    Entropy,
    Seeded(u64),
}

impl RngPolicy {
    /// Fresh generator for one request
    pub fn rng(&self) -> StdRng {
        match self {
            RngPolicy::Entropy => StdRng::from_os_rng(),
            RngPolicy::Seeded(seed) => StdRng::seed_from_u64(*seed),
        }
    }
}

impl From<Option<u64>> for RngPolicy {
    fn from(seed: Option<u64>) -> Self {
        seed.map_or(RngPolicy::Entropy, RngPolicy::Seeded)
    }
}

/// Draws one weight per component from its range and normalizes them to sum to 1.0
pub fn generate_weights<R: Rng + ?Sized>(rng: &mut R) -> RecommendationWeights {
    normalize(draw_raw_weights(rng))
}

/// Unnormalized draw, each component inside its range
fn draw_raw_weights<R: Rng + ?Sized>(rng: &mut R) -> RecommendationWeights {
    RecommendationWeights {
        genre: rng.random_range(GENRE_RANGE),
        people: rng.random_range(PEOPLE_RANGE),
        rating: rng.random_range(RATING_RANGE),
        popularity: rng.random_range(POPULARITY_RANGE),
    }
}

fn normalize(raw: RecommendationWeights) -> RecommendationWeights {
    let total = raw.total();

    RecommendationWeights {
        genre: raw.genre / total,
        people: raw.people / total,
        rating: raw.rating / total,
        popularity: raw.popularity / total,
    }
}
