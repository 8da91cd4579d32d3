pub mod candidates;
pub mod metadata;
pub mod profile;
pub mod providers;
pub mod ranking;
pub mod recommendations;

pub use metadata::MetadataClient;
pub use recommendations::{EngineSettings, RecommendationEngine};
