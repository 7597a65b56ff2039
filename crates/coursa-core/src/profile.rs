//! Time-decayed user profiles over feature tokens.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
    features::{FeatureSet, token_weight},
    model::{Course, CourseId, UserInteraction},
};

/// Default recency half-life in days.
pub const DEFAULT_HALF_LIFE_DAYS: f64 = 30.0;

/// Seconds per day, for fractional ages.
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Resolves a course to its feature tokens.
///
/// Implementations prefer a precomputed cache and fall back to computing from the
/// live record; `None` means the course no longer exists.
pub trait FeatureSource {
    /// Feature tokens of the course with id `course`.
    fn features(&self, course: &CourseId) -> Option<FeatureSet>;

    /// Feature tokens of a course already in hand.
    fn features_of(&self, course: &Course) -> FeatureSet;
}

/// A user's preferences as a signed weight per feature token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    /// Weight per token.
    weights: BTreeMap<String, f64>,
}

impl UserProfile {
    /// Weight of `token`, zero if absent.
    pub fn weight(&self, token: &str) -> f64 {
        self.weights.get(token).copied().unwrap_or(0.0)
    }

    /// Euclidean norm of the weight vector.
    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    /// Returns true if no token has a weight.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterates tokens and weights in token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(t, w)| (t.as_str(), *w))
    }

    /// Divides every weight by the norm. A zero vector is left unchanged.
    fn normalize(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for weight in self.weights.values_mut() {
                *weight /= norm;
            }
        }
        self
    }
}

/// Recency factor for an interaction `age_days` old: 1.0 when new, 0.5 after one
/// half-life. Future timestamps count as new.
pub fn decay(age_days: f64, half_life_days: f64) -> f64 {
    if half_life_days <= 0.0 {
        return 1.0;
    }
    0.5_f64.powf(age_days.max(0.0) / half_life_days)
}

/// Age of `timestamp` at `now`, in fractional days.
pub fn age_days(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - timestamp).num_seconds() as f64 / SECONDS_PER_DAY
}

/// Builds a normalized profile from one user's interactions.
///
/// Each interaction's preference is decayed by age, then added to every token of
/// the course scaled by the token kind's weight. Interactions with zero net weight
/// and courses that no longer resolve contribute nothing.
pub fn build_user_profile<S: FeatureSource + ?Sized>(
    interactions: &[UserInteraction],
    source: &S,
    now: DateTime<Utc>,
    half_life_days: f64,
) -> UserProfile {
    let mut profile = UserProfile::default();

    for interaction in interactions {
        let weight =
            interaction.preference() * decay(age_days(interaction.timestamp, now), half_life_days);
        if weight == 0.0 {
            continue;
        }
        let Some(features) = source.features(&interaction.course) else {
            continue;
        };
        for token in features {
            let contribution = weight * token_weight(&token);
            *profile.weights.entry(token).or_insert(0.0) += contribution;
        }
    }

    profile.normalize()
}
