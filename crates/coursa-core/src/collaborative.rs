//! Item-item collaborative filtering.
//!
//! Every user's interactions form a preference vector over courses. Two courses
//! are similar when the same users feel the same way about them, measured as the
//! cosine between their per-user preference columns. Similarity is symmetric and a
//! course is never its own neighbor.

use std::{
    collections::{BTreeMap, HashSet},
    ops::Bound,
};

use serde::{Deserialize, Serialize};

use crate::model::{CourseId, UserId, UserInteraction};

/// Signed preference per course, per user.
pub type Preferences = BTreeMap<UserId, BTreeMap<CourseId, f64>>;

/// Collects undecayed preferences from all interactions, skipping zero weights.
pub fn build_preferences(interactions: &[UserInteraction]) -> Preferences {
    let mut prefs = Preferences::new();
    for interaction in interactions {
        let weight = interaction.preference();
        if weight != 0.0 {
            prefs
                .entry(interaction.user.clone())
                .or_default()
                .insert(interaction.course.clone(), weight);
        }
    }
    prefs
}

/// A similar course and how similar it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// The neighboring course.
    pub course: CourseId,
    /// Cosine similarity in [-1, 1].
    pub similarity: f64,
}

/// Non-zero similarities per course, most similar first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemSimilarity {
    /// Neighbor lists keyed by course.
    neighbors: BTreeMap<CourseId, Vec<Neighbor>>,
}

impl ItemSimilarity {
    /// Computes cosine similarity between every pair of co-rated courses.
    pub fn compute(prefs: &Preferences) -> Self {
        let mut norms: BTreeMap<&CourseId, f64> = BTreeMap::new();
        let mut dots: BTreeMap<(&CourseId, &CourseId), f64> = BTreeMap::new();

        for items in prefs.values() {
            for (a, pa) in items {
                *norms.entry(a).or_insert(0.0) += pa * pa;
                for (b, pb) in items.range::<CourseId, _>((Bound::Excluded(a), Bound::Unbounded)) {
                    *dots.entry((a, b)).or_insert(0.0) += pa * pb;
                }
            }
        }

        let mut neighbors: BTreeMap<CourseId, Vec<Neighbor>> = BTreeMap::new();
        for ((a, b), dot) in dots {
            let norm = |c: &CourseId| norms.get(c).copied().unwrap_or(0.0).sqrt();
            let denom = norm(a) * norm(b);
            if dot == 0.0 || denom == 0.0 {
                continue;
            }
            let similarity = dot / denom;
            neighbors.entry(a.clone()).or_default().push(Neighbor {
                course: b.clone(),
                similarity,
            });
            neighbors.entry(b.clone()).or_default().push(Neighbor {
                course: a.clone(),
                similarity,
            });
        }
        for list in neighbors.values_mut() {
            list.sort_by(|x, y| {
                y.similarity
                    .total_cmp(&x.similarity)
                    .then_with(|| x.course.cmp(&y.course))
            });
        }

        Self { neighbors }
    }

    /// Neighbors of a course, most similar first.
    pub fn neighbors(&self, course: &CourseId) -> &[Neighbor] {
        self.neighbors.get(course).map_or(&[], Vec::as_slice)
    }

    /// Similarity between two courses; zero when unrelated or identical.
    pub fn similarity(&self, a: &CourseId, b: &CourseId) -> f64 {
        self.neighbors(a)
            .iter()
            .find(|n| &n.course == b)
            .map_or(0.0, |n| n.similarity)
    }

    /// Number of courses with at least one neighbor.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns true if no course has a neighbor.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

/// Scores courses for a user from their own preferences.
///
/// A candidate's score is the sum, over the user's positively weighted courses,
/// of similarity times preference. Courses the user interacted with in any way
/// are excluded; non-positive scores are dropped. Ties order by course id.
pub fn recommend_collaborative(
    user_prefs: &BTreeMap<CourseId, f64>,
    interacted: &HashSet<CourseId>,
    similarity: &ItemSimilarity,
    limit: usize,
) -> Vec<(CourseId, f64)> {
    let mut totals: BTreeMap<&CourseId, f64> = BTreeMap::new();
    for (course, pref) in user_prefs.iter().filter(|(_, p)| **p > 0.0) {
        for neighbor in similarity.neighbors(course) {
            if interacted.contains(&neighbor.course) {
                continue;
            }
            *totals.entry(&neighbor.course).or_insert(0.0) += neighbor.similarity * pref;
        }
    }

    let mut ranked: Vec<(CourseId, f64)> = totals
        .into_iter()
        .filter(|(_, score)| *score > 0.0)
        .map(|(course, score)| (course.clone(), score))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(limit);
    ranked
}
