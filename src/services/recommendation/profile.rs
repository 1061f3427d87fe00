use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::{
    db::{CatalogStore, RatingStore},
    error::AppResult,
    models::{CastRole, MovieId, TasteProfile},
};

pub const MAX_PREFERRED_GENRES: usize = 5;
pub const MAX_PREFERRED_PEOPLE: usize = 10;

/// Builds a user's taste profile from their rating history
///
/// Fails open: if any query fails the error is logged and an empty profile
/// is returned, which callers treat exactly like a user with no history.
pub async fn build_taste_profile(
    ratings: &dyn RatingStore,
    catalog: &dyn CatalogStore,
    user_id: i64,
    min_rating: f64,
) -> TasteProfile {
    match try_build_taste_profile(ratings, catalog, user_id, min_rating).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(
                error = %e,
                user_id = user_id,
                stage = "taste_profile",
                "Taste profile build failed, falling back to empty profile"
            );
            TasteProfile::default()
        }
    }
}

async fn try_build_taste_profile(
    ratings: &dyn RatingStore,
    catalog: &dyn CatalogStore,
    user_id: i64,
    min_rating: f64,
) -> AppResult<TasteProfile> {
    let records = ratings.ratings(user_id, min_rating).await?;

    // Records arrive newest first
    let Some(latest) = records.first() else {
        return Ok(TasteProfile::default());
    };
    let latest_movie_id = latest.movie_id;

    let watched_movie_ids: HashSet<MovieId> = records.iter().map(|r| r.movie_id).collect();
    let mut movie_ids: Vec<MovieId> = watched_movie_ids.iter().copied().collect();
    movie_ids.sort_unstable();

    let (genre_rows, cast_rows) = tokio::try_join!(
        catalog.genres_for_movies(&movie_ids),
        catalog.cast_for_movies(&movie_ids, &CastRole::TASTE_ROLES),
    )?;

    let preferred_genre_ids = rank_by_frequency(
        genre_rows.into_iter().map(|(genre_id, _)| genre_id),
        MAX_PREFERRED_GENRES,
    );
    let preferred_person_ids = rank_by_frequency(
        cast_rows.into_iter().map(|(person_id, _)| person_id),
        MAX_PREFERRED_PEOPLE,
    );

    tracing::debug!(
        user_id = user_id,
        watched = watched_movie_ids.len(),
        genres = preferred_genre_ids.len(),
        people = preferred_person_ids.len(),
        latest_movie_id = latest_movie_id,
        "Taste profile built"
    );

    Ok(TasteProfile {
        watched_movie_ids,
        preferred_genre_ids,
        preferred_person_ids,
        latest_movie_id: Some(latest_movie_id),
    })
}

/// Returns the `limit` most frequent keys, most frequent first.
/// Equal counts are ordered by ascending key.
pub fn rank_by_frequency<K>(keys: impl IntoIterator<Item = K>, limit: usize) -> Vec<K>
where
    K: Copy + Ord + Hash,
{
    let mut counts: HashMap<K, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut ranked: Vec<(K, usize)> = counts.into_iter().collect();
    ranked.sort_unstable_by(|(a_key, a_count), (b_key, b_count)| {
        b_count.cmp(a_count).then_with(|| a_key.cmp(b_key))
    });

    ranked.into_iter().take(limit).map(|(key, _)| key).collect()
}
