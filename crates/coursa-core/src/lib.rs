//! Course storage, feature engineering and recommendation for coursa.
//!
//! The crate sits between the ingestion collaborator, the search index and a
//! presentation layer:
//! - [`CourseStore`] abstracts relational storage; [`JsonStore`] ships with it
//! - [`ingest_records`] normalizes scraped records and refreshes keyword statistics
//! - [`FeatureBuilder`], [`build_user_profile`] and the recommenders turn
//!   interactions into ranked suggestions
//! - [`Engine`] wires it all to the caller-facing operations
//!
//! # Example
//!
//! ```no_run
//! use coursa_config::Config;
//! use coursa_core::{Engine, UserId};
//!
//! let config = Config::load(".".as_ref()).unwrap();
//! let engine = Engine::open(config).unwrap();
//! for rec in engine.recommend_hybrid(&UserId::new("ana"), 5) {
//!     println!("{:.2} {}", rec.score, rec.course.title);
//! }
//! ```

#![warn(missing_docs)]

mod cache;
mod collaborative;
mod content;
mod decorate;
mod engine;
mod error;
mod features;
mod hybrid;
mod ingest;
mod interaction;
mod model;
mod persist;
mod precompute;
mod profile;
mod recommend;
mod store;

pub use cache::{CacheStore, CourseFeatures, FEATURES_KEY, IDF_KEY, ITEM_SIM_KEY};
pub use collaborative::{
    ItemSimilarity, Neighbor, Preferences, build_preferences, recommend_collaborative,
};
pub use content::{content_score, recommend_content};
pub use decorate::{CourseView, decorate};
pub use engine::{CACHE_DIR, Engine, STORE_FILENAME, SearchResults};
pub use error::{CoreError, StoreError};
pub use features::{FeatureBuilder, FeatureKind, FeatureSet, duration_bucket, token_weight};
pub use hybrid::{
    BlendWeights, DEFAULT_COLD_START_THRESHOLD, blend, exclude_and_truncate, hybrid_weights,
    is_cold_start, min_max_normalize, popularity_ranking,
};
pub use ingest::{
    DEFAULT_CATEGORY, IngestReport, NormalizedRecord, UNKNOWN_PLATFORM, ingest_records,
    normalize_record, title_case,
};
pub use interaction::{Action, DISLIKE_WEIGHT, LIKE_WEIGHT};
pub use model::{
    Course, CourseId, CourseRecord, Entity, EntityId, EntityKind, Level, ScoredCourse, UserId,
    UserInteraction,
};
pub use precompute::{PrecomputeReport, precompute_caches};
pub use profile::{
    DEFAULT_HALF_LIFE_DAYS, FeatureSource, UserProfile, age_days, build_user_profile, decay,
};
pub use recommend::{FeatureLookup, Recommender};
pub use store::{CourseStore, JsonStore};
