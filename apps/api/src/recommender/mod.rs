//! CV-to-job recommendation scoring.
//!
//! Pure matchers (skills, experience) and the embedding-backed education
//! matcher feed [`engine::Recommender`], which combines them with a batched
//! semantic-similarity lookup into a ranked, explained list.

pub mod education;
pub mod engine;
pub mod experience;
pub mod handlers;
pub mod similarity;
pub mod skills;
pub mod types;
pub mod weights;

#[cfg(test)]
pub(crate) mod test_support;

pub use engine::{RecommendError, Recommender};
pub use similarity::PgSimilarityLookup;
