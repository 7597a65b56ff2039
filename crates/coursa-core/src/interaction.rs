//! Interaction actions and preference weights.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Weight contributed by a like.
pub const LIKE_WEIGHT: f64 = 4.0;

/// Weight contributed by a dislike.
pub const DISLIKE_WEIGHT: f64 = -5.0;

/// An action a user takes on a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Toggle like.
    Like,
    /// Toggle dislike.
    Dislike,
    /// Record a view.
    View,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
            Self::View => "view",
        })
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            "view" => Ok(Self::View),
            other => Err(format!("unknown action: {other}")),
        }
    }
}
