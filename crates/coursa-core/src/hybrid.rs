//! Blending content and collaborative scores, and the popularity fallback.
//!
//! Users with little history get the global popularity ranking. Everyone else
//! gets a weighted sum of the min-max normalized content and collaborative
//! scores, with the collaborative share growing as the community grows.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use crate::model::{Course, CourseId, ScoredCourse, UserInteraction};

/// Users with fewer interactions than this are in cold start.
pub const DEFAULT_COLD_START_THRESHOLD: usize = 3;

/// Community size below which content dominates.
const SMALL_COMMUNITY: usize = 10;

/// Community size below which the blend is moderate.
const MEDIUM_COMMUNITY: usize = 50;

/// Views worth one rating point in the popularity score.
const VIEWS_PER_POINT: f64 = 100.0;

/// Relative weight of each recommender in the blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    /// Content-based share.
    pub content: f64,
    /// Collaborative share.
    pub collaborative: f64,
}

/// Picks blend weights from the number of distinct users with any interaction.
pub fn hybrid_weights(interacting_users: usize) -> BlendWeights {
    let (content, collaborative) = if interacting_users < SMALL_COMMUNITY {
        (0.8, 0.2)
    } else if interacting_users < MEDIUM_COMMUNITY {
        (0.6, 0.4)
    } else {
        (0.4, 0.6)
    };
    BlendWeights {
        content,
        collaborative,
    }
}

/// Returns true if a user with `interaction_count` interactions is in cold start.
pub fn is_cold_start(interaction_count: usize, threshold: usize) -> bool {
    interaction_count < threshold
}

/// Rescales scores linearly into [0, 1].
///
/// When every score is equal, every normalized score is 1.0.
pub fn min_max_normalize<K>(scores: Vec<(K, f64)>) -> Vec<(K, f64)> {
    let (min, max) = scores
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, s)| {
            (lo.min(*s), hi.max(*s))
        });
    let range = max - min;
    scores
        .into_iter()
        .map(|(k, s)| {
            let normalized = if range > 0.0 { (s - min) / range } else { 1.0 };
            (k, normalized)
        })
        .collect()
}

/// Normalizes both lists and sums their weighted scores per course.
///
/// Courses keep the order in which they were first seen (content first), so
/// equal blended scores stay in that order after the descending sort.
pub fn blend(
    content: Vec<(CourseId, f64)>,
    collaborative: Vec<(CourseId, f64)>,
    weights: BlendWeights,
) -> Vec<(CourseId, f64)> {
    let mut order: Vec<(CourseId, f64)> = Vec::new();
    let mut positions: HashMap<CourseId, usize> = HashMap::new();

    let weighted = [
        (min_max_normalize(content), weights.content),
        (min_max_normalize(collaborative), weights.collaborative),
    ];
    for (list, weight) in weighted {
        for (course, score) in list {
            let position = *positions.entry(course.clone()).or_insert_with(|| {
                order.push((course, 0.0));
                order.len() - 1
            });
            order[position].1 += weight * score;
        }
    }

    order.sort_by(|a, b| b.1.total_cmp(&a.1));
    order
}

/// Ranks courses by rating, then total views, for users without history.
///
/// Unrated courses rank after rated ones. The score is `rating + views / 100`;
/// note the ranking itself does not sort by that score.
pub fn popularity_ranking(courses: Vec<Course>, interactions: &[UserInteraction]) -> Vec<ScoredCourse> {
    let mut views: HashMap<&CourseId, u64> = HashMap::new();
    for interaction in interactions {
        *views.entry(&interaction.course).or_insert(0) += u64::from(interaction.viewed);
    }

    let mut ranked: Vec<(Course, u64)> = courses
        .into_iter()
        .map(|c| {
            let total = views.get(&c.url).copied().unwrap_or(0);
            (c, total)
        })
        .collect();

    ranked.sort_by(|(a, a_views), (b, b_views)| {
        let by_rating = match (a.rating, b.rating) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_rating.then_with(|| b_views.cmp(a_views))
    });

    ranked
        .into_iter()
        .map(|(course, total)| {
            let score = course.rating.unwrap_or(0.0) + total as f64 / VIEWS_PER_POINT;
            ScoredCourse { course, score }
        })
        .collect()
}

/// Drops courses in `excluded` and keeps the first `limit`.
pub fn exclude_and_truncate(
    ranked: Vec<ScoredCourse>,
    excluded: &HashSet<CourseId>,
    limit: usize,
) -> Vec<ScoredCourse> {
    ranked
        .into_iter()
        .filter(|r| !excluded.contains(&r.course.url))
        .take(limit)
        .collect()
}
