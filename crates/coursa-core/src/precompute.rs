//! Batch rebuild of the feature and similarity caches.

use coursa_keywords::Stopwords;
use tracing::{info, instrument};

use crate::{
    cache::{CacheStore, CourseFeatures},
    collaborative::{ItemSimilarity, build_preferences},
    error::CoreError,
    features::FeatureBuilder,
    store::CourseStore,
};

/// Summary of a cache rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrecomputeReport {
    /// Courses with cached features.
    pub courses: usize,
    /// Courses with at least one similar course.
    pub similar_items: usize,
}

/// Rebuilds `course_features` and `item_sim` from the store.
///
/// Each cache is replaced all at once; readers see the previous version until
/// the new one is committed, and a failure leaves it untouched.
#[instrument(skip_all)]
pub fn precompute_caches<S: CourseStore + ?Sized>(
    store: &S,
    caches: &CacheStore,
    stopwords: &Stopwords,
    top_n: usize,
) -> Result<PrecomputeReport, CoreError> {
    let idf = caches.idf().unwrap_or_default();
    let builder = FeatureBuilder::new(idf.as_ref(), stopwords, top_n);
    let features: CourseFeatures = store
        .courses()
        .iter()
        .map(|course| (course.url.clone(), builder.build(course)))
        .collect();
    let courses = features.len();
    caches.replace_features(features)?;

    let similarity = ItemSimilarity::compute(&build_preferences(&store.all_interactions()));
    let similar_items = similarity.len();
    caches.replace_item_similarity(similarity)?;

    info!(courses, similar_items, "caches rebuilt");
    Ok(PrecomputeReport {
        courses,
        similar_items,
    })
}
