mod builder;
mod store;

pub use builder::{min_max_normalize, RatingBuild, RiskRatingBuilder};
pub use store::{RatingsArtifact, RatingsStore};
