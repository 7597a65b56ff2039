//! Course catalog and user interaction records.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interaction::{Action, DISLIKE_WEIGHT, LIKE_WEIGHT};

/// Canonical course identity: the course's source URL.
///
/// Every layer (storage, caches, search index) refers to courses by this key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    /// Creates an id from a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

/// Opaque user identity supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Course difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// No prior knowledge expected.
    Beginner,
    /// Some prior knowledge expected.
    Intermediate,
    /// Substantial prior knowledge expected.
    Advanced,
}

impl Level {
    /// Returns the display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    /// Accepts English names and the Spanish names some providers publish.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "introductory" | "principiante" => Ok(Self::Beginner),
            "intermediate" | "intermedio" => Ok(Self::Intermediate),
            "advanced" | "avanzado" => Ok(Self::Advanced),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

/// Kinds of named reference entity attached to a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Hosting platform.
    Platform,
    /// Subject category.
    Category,
    /// Instructor.
    Instructor,
}

/// Stable identity of a reference entity within its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

/// A named platform, category or instructor. Names are unique per kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identity.
    pub id: EntityId,
    /// Unique name.
    pub name: String,
}

/// A stored course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Source URL; the natural key.
    pub url: CourseId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Hosting platform.
    pub platform: Entity,
    /// Difficulty level.
    pub level: Option<Level>,
    /// Duration in hours.
    pub duration: Option<f64>,
    /// Instructor.
    pub instructor: Option<Entity>,
    /// Rating in [0, 5].
    pub rating: Option<f64>,
    /// Subject category.
    pub category: Option<Entity>,
    /// Keywords for display and search, most salient first.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Last time the course was scraped.
    pub last_scraped: DateTime<Utc>,
}

impl Course {
    /// Returns the description, or an empty string.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// A course record as supplied by the ingestion collaborator.
///
/// Everything except the URL and title is optional; missing or invalid values are
/// normalized during ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseRecord {
    /// Source URL.
    pub url: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Platform name.
    pub platform: Option<String>,
    /// Level name.
    pub level: Option<String>,
    /// Duration in hours.
    pub duration: Option<f64>,
    /// Instructor name.
    pub instructor: Option<String>,
    /// Rating.
    pub rating: Option<f64>,
    /// Category name.
    pub category: Option<String>,
    /// Scrape time.
    pub last_scraped: Option<DateTime<Utc>>,
    /// Precomputed keywords.
    pub keywords: Option<Vec<String>>,
}

/// A user's relationship with one course. At most one exists per (user, course).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInteraction {
    /// The user.
    pub user: UserId,
    /// The course.
    pub course: CourseId,
    /// Whether the user likes the course. Never true together with `disliked`.
    pub liked: bool,
    /// Whether the user dislikes the course.
    pub disliked: bool,
    /// Number of times the user viewed the course.
    pub viewed: u32,
    /// Time of the last action.
    pub timestamp: DateTime<Utc>,
}

impl UserInteraction {
    /// Creates an empty interaction.
    pub fn new(user: UserId, course: CourseId, timestamp: DateTime<Utc>) -> Self {
        Self {
            user,
            course,
            liked: false,
            disliked: false,
            viewed: 0,
            timestamp,
        }
    }

    /// Applies an action at time `now`.
    ///
    /// Like and dislike toggle; setting either clears the other, so both are never
    /// true at once. Views only ever increase. Every action refreshes the timestamp.
    pub fn apply(&mut self, action: Action, now: DateTime<Utc>) {
        match action {
            Action::Like => {
                self.liked = !self.liked;
                if self.liked {
                    self.disliked = false;
                }
            }
            Action::Dislike => {
                self.disliked = !self.disliked;
                if self.disliked {
                    self.liked = false;
                }
            }
            Action::View => self.viewed = self.viewed.saturating_add(1),
        }
        self.timestamp = now;
    }

    /// Signed preference strength, before any time decay.
    pub fn preference(&self) -> f64 {
        let mut weight = 0.0;
        if self.liked {
            weight += LIKE_WEIGHT;
        }
        if self.disliked {
            weight += DISLIKE_WEIGHT;
        }
        if self.viewed > 0 {
            weight += f64::from(self.viewed).sqrt();
        }
        weight
    }

    /// Returns true if the user explicitly rated the course either way.
    pub fn is_rated(&self) -> bool {
        self.liked || self.disliked
    }
}

/// A course with a recommendation score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCourse {
    /// The course.
    pub course: Course,
    /// Score; only comparable within one result list.
    pub score: f64,
}
