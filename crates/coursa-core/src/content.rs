//! Content-based recommendation.

use std::collections::HashSet;

use crate::{
    features::FeatureSet,
    model::{Course, CourseId, ScoredCourse},
    profile::{FeatureSource, UserProfile},
};

/// Average profile weight over a candidate's tokens.
///
/// The candidate is treated as a uniform indicator set, so this is the sum of the
/// profile weights of its tokens divided by its token count, not a cosine.
pub fn content_score(profile: &UserProfile, features: &FeatureSet) -> f64 {
    if features.is_empty() {
        return 0.0;
    }
    let total: f64 = features.iter().map(|t| profile.weight(t)).sum();
    total / features.len() as f64
}

/// Ranks `candidates` against a profile.
///
/// Courses in `excluded` are skipped, as are candidates with a non-positive
/// score. Ties keep the order of `candidates`.
pub fn recommend_content<S: FeatureSource + ?Sized>(
    profile: &UserProfile,
    candidates: Vec<Course>,
    excluded: &HashSet<CourseId>,
    source: &S,
    limit: usize,
) -> Vec<ScoredCourse> {
    let mut scored: Vec<ScoredCourse> = candidates
        .into_iter()
        .filter(|c| !excluded.contains(&c.url))
        .filter_map(|course| {
            let score = content_score(profile, &source.features_of(&course));
            (score > 0.0).then_some(ScoredCourse { course, score })
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}
