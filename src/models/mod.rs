mod movie;
mod rating;
mod recommendation;

pub use movie::{
    CandidateMovie, GenreId, MovieId, PersonId, RecommendedMovie, TmdbMovie, TmdbPage,
};
pub use rating::{CastRole, RatingRecord};
pub use recommendation::{RecommendationResponse, RecommendationWeights, ScoredMovie, TasteProfile};
