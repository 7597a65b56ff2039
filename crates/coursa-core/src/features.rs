//! Course feature tokens.
//!
//! A course is described by a set of tagged tokens, `kind:value`, one per present
//! attribute plus one per extracted keyword. Tokens are the unit of similarity for
//! user profiles and content-based scoring.

use std::collections::BTreeSet;

use coursa_keywords::{IdfProvider, Stopwords, extract_keywords};

use crate::model::Course;

/// A course's feature tokens. Ordered, so equal inputs give identical sets.
pub type FeatureSet = BTreeSet<String>;

/// Courses shorter than this many hours are `short`.
const SHORT_MAX_HOURS: f64 = 5.0;

/// Courses up to and including this many hours are `medium`.
const MEDIUM_MAX_HOURS: f64 = 20.0;

/// The kind of a feature token, named by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// `category:`
    Category,
    /// `level:`
    Level,
    /// `platform:`
    Platform,
    /// `instructor:`
    Instructor,
    /// `duration-bucket:`
    DurationBucket,
    /// `keyword:`
    Keyword,
}

impl FeatureKind {
    /// Every kind.
    pub const ALL: [Self; 6] = [
        Self::Category,
        Self::Level,
        Self::Platform,
        Self::Instructor,
        Self::DurationBucket,
        Self::Keyword,
    ];

    /// Token prefix without the colon.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Level => "level",
            Self::Platform => "platform",
            Self::Instructor => "instructor",
            Self::DurationBucket => "duration-bucket",
            Self::Keyword => "keyword",
        }
    }

    /// Profile weight for tokens of this kind.
    ///
    /// Structured facets are stronger similarity signals than free-text keywords.
    pub fn weight(self) -> f64 {
        match self {
            Self::Category => 2.5,
            Self::Level => 2.0,
            Self::Platform => 1.5,
            Self::Instructor => 1.2,
            Self::DurationBucket => 1.0,
            Self::Keyword => 0.6,
        }
    }

    /// Classifies a token by its prefix.
    pub fn of(token: &str) -> Option<Self> {
        let (prefix, _) = token.split_once(':')?;
        Self::ALL.into_iter().find(|k| k.prefix() == prefix)
    }

    /// Builds a token of this kind.
    pub fn token(self, value: &str) -> String {
        format!("{}:{}", self.prefix(), value.trim().to_lowercase())
    }
}

/// Weight for a token; tokens of unknown kind count 1.0.
pub fn token_weight(token: &str) -> f64 {
    FeatureKind::of(token).map_or(1.0, FeatureKind::weight)
}

/// Buckets a duration in hours: `short` (< 5), `medium` (5 to 20 inclusive),
/// `long` (> 20).
pub fn duration_bucket(hours: f64) -> Option<&'static str> {
    if hours.is_nan() {
        None
    } else if hours < SHORT_MAX_HOURS {
        Some("short")
    } else if hours <= MEDIUM_MAX_HOURS {
        Some("medium")
    } else {
        Some("long")
    }
}

/// Derives feature tokens from courses.
pub struct FeatureBuilder<'a, P: IdfProvider> {
    /// Corpus IDF statistics for keyword extraction.
    idf: &'a P,
    /// Stopwords removed before keyword extraction.
    stopwords: &'a Stopwords,
    /// Maximum number of keyword tokens per course.
    top_n: usize,
}

impl<'a, P: IdfProvider> FeatureBuilder<'a, P> {
    /// Creates a builder.
    pub fn new(idf: &'a P, stopwords: &'a Stopwords, top_n: usize) -> Self {
        Self {
            idf,
            stopwords,
            top_n,
        }
    }

    /// Derives the feature set of a course. A pure function of the course's
    /// attributes and the builder's inputs.
    pub fn build(&self, course: &Course) -> FeatureSet {
        let mut features = FeatureSet::new();

        if let Some(category) = &course.category {
            features.insert(FeatureKind::Category.token(&category.name));
        }
        features.insert(FeatureKind::Platform.token(&course.platform.name));
        if let Some(level) = course.level {
            features.insert(FeatureKind::Level.token(level.as_str()));
        }
        if let Some(instructor) = &course.instructor {
            features.insert(FeatureKind::Instructor.token(&instructor.name));
        }
        if let Some(bucket) = course.duration.and_then(duration_bucket) {
            features.insert(FeatureKind::DurationBucket.token(bucket));
        }

        let keywords = extract_keywords(
            &course.title,
            course.description_text(),
            self.idf,
            self.stopwords,
            self.top_n,
        );
        for keyword in keywords {
            features.insert(FeatureKind::Keyword.token(&keyword));
        }

        features
    }
}

#[cfg(test)]
mod test {
    use chrono::DateTime;
    use coursa_keywords::IdfTable;

    use super::*;
    use crate::model::{CourseId, Entity, EntityId, Level};

    fn entity(name: &str) -> Entity {
        Entity {
            id: EntityId(0),
            name: name.to_string(),
        }
    }

    fn course() -> Course {
        Course {
            url: CourseId::new("https://a"),
            title: "Practical Statistics".to_string(),
            description: Some("Regression and sampling with statistics".to_string()),
            platform: entity("Coursera"),
            level: Some(Level::Beginner),
            duration: Some(12.0),
            instructor: Some(entity("Jane Doe")),
            rating: Some(4.2),
            category: Some(entity("Data Science")),
            keywords: vec![],
            last_scraped: DateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn emits_one_token_per_attribute() {
        let idf = IdfTable::default();
        let stopwords = Stopwords::new();
        let features = FeatureBuilder::new(&idf, &stopwords, 2).build(&course());

        let expected: FeatureSet = [
            "category:data science",
            "platform:coursera",
            "level:beginner",
            "instructor:jane doe",
            "duration-bucket:medium",
            "keyword:statistics",
            "keyword:regression",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();
        assert_eq!(features, expected);
    }

    #[test]
    fn absent_attributes_emit_nothing() {
        let idf = IdfTable::default();
        let stopwords = Stopwords::new();
        let mut bare = course();
        bare.level = None;
        bare.duration = None;
        bare.instructor = None;
        bare.category = None;

        let features = FeatureBuilder::new(&idf, &stopwords, 0).build(&bare);
        assert_eq!(
            features.into_iter().collect::<Vec<_>>(),
            vec!["platform:coursera".to_string()]
        );
    }

    #[test]
    fn features_are_deterministic() {
        let idf = IdfTable::compute(
            [("Practical Statistics", "sampling"), ("Art History", "")],
            &Stopwords::new(),
        );
        let stopwords = Stopwords::new();
        let builder = FeatureBuilder::new(&idf, &stopwords, 5);

        let first = builder.build(&course());
        let _other = builder.build(&Course {
            title: "Unrelated".to_string(),
            ..course()
        });
        assert_eq!(builder.build(&course()), first);
    }

    #[test]
    fn duration_buckets() {
        assert_eq!(duration_bucket(0.0), Some("short"));
        assert_eq!(duration_bucket(4.99), Some("short"));
        assert_eq!(duration_bucket(5.0), Some("medium"));
        assert_eq!(duration_bucket(20.0), Some("medium"));
        assert_eq!(duration_bucket(20.01), Some("long"));
        assert_eq!(duration_bucket(f64::NAN), None);
    }

    #[test]
    fn kinds_round_trip_through_prefix() {
        for kind in FeatureKind::ALL {
            assert_eq!(FeatureKind::of(&kind.token("x")), Some(kind));
        }
        assert_eq!(FeatureKind::of("mystery:x"), None);
        assert_eq!(token_weight("mystery:x"), 1.0);
        assert_eq!(token_weight("category:art"), 2.5);
    }
}
