//! Ingestion of scraped course records.
//!
//! Records from the scraping collaborator are normalized, their reference
//! entities resolved with get-or-create, and the courses upserted by URL. Every
//! batch refreshes the corpus IDF table and derives keywords for the new records.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use coursa_keywords::{IdfTable, Stopwords, extract_keywords};
use tracing::{debug, instrument, warn};

use crate::{
    cache::CacheStore,
    error::CoreError,
    features::FeatureBuilder,
    model::{Course, CourseId, CourseRecord, EntityKind, Level},
    store::CourseStore,
};

/// Platform name used when a record has none.
pub const UNKNOWN_PLATFORM: &str = "Unknown";

/// Category name used when a record has none.
pub const DEFAULT_CATEGORY: &str = "General";

/// Highest valid rating.
const MAX_RATING: f64 = 5.0;

/// A record after cleanup, before entities are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Source URL.
    pub url: CourseId,
    /// Title.
    pub title: String,
    /// Description, if non-empty.
    pub description: Option<String>,
    /// Platform name.
    pub platform: String,
    /// Title-cased category name.
    pub category: String,
    /// Instructor name, if non-empty.
    pub instructor: Option<String>,
    /// Parsed level.
    pub level: Option<Level>,
    /// Non-negative duration in hours.
    pub duration: Option<f64>,
    /// Rating within [0, 5].
    pub rating: Option<f64>,
    /// Scrape time.
    pub last_scraped: DateTime<Utc>,
    /// Precomputed keywords, if supplied.
    pub keywords: Option<Vec<String>>,
}

/// Summary of one ingestion batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records received.
    pub received: usize,
    /// Courses upserted.
    pub upserted: usize,
    /// Records skipped for missing URL or title.
    pub skipped: usize,
    /// Whether the batch reached the search index.
    pub indexed: bool,
}

/// Capitalizes the first letter of each word and lowercases the rest.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trims a string, treating blank as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Cleans up a record. Returns `None` if it has no URL or title.
///
/// Invalid values are dropped rather than rejected: unknown levels, ratings
/// outside [0, 5], and negative or non-finite durations.
pub fn normalize_record(record: CourseRecord, now: DateTime<Utc>) -> Option<NormalizedRecord> {
    let url = record.url.trim().to_string();
    let title = record.title.trim().to_string();
    if url.is_empty() || title.is_empty() {
        return None;
    }

    let level = non_blank(record.level).and_then(|l| match l.parse::<Level>() {
        Ok(level) => Some(level),
        Err(e) => {
            debug!(url, error = %e, "dropping level");
            None
        }
    });

    Some(NormalizedRecord {
        url: CourseId::new(url),
        title,
        description: non_blank(record.description),
        platform: non_blank(record.platform).unwrap_or_else(|| UNKNOWN_PLATFORM.to_string()),
        category: non_blank(record.category)
            .map_or_else(|| DEFAULT_CATEGORY.to_string(), |c| title_case(&c)),
        instructor: non_blank(record.instructor),
        level,
        duration: record.duration.filter(|d| d.is_finite() && *d >= 0.0),
        rating: record
            .rating
            .filter(|r| r.is_finite() && (0.0..=MAX_RATING).contains(r)),
        last_scraped: record.last_scraped.unwrap_or(now),
        keywords: record
            .keywords
            .map(|k| k.into_iter().filter_map(|w| non_blank(Some(w))).collect()),
    })
}

/// Upserts a batch of records and refreshes the IDF table.
///
/// The IDF table is recomputed over the whole stored corpus including the batch,
/// then used to extract keywords for records that did not bring their own. If a
/// feature cache exists, the entries for upserted courses are rebuilt.
/// Returns the upserted courses so the caller can index them.
#[instrument(skip_all, fields(records = records.len()))]
pub fn ingest_records<S: CourseStore + ?Sized>(
    store: &S,
    caches: &CacheStore,
    stopwords: &Stopwords,
    top_n: usize,
    records: Vec<CourseRecord>,
    now: DateTime<Utc>,
) -> Result<(Vec<Course>, IngestReport), CoreError> {
    let mut report = IngestReport {
        received: records.len(),
        ..Default::default()
    };

    // Later records with the same URL replace earlier ones
    let mut batch: Vec<NormalizedRecord> = Vec::new();
    for record in records {
        match normalize_record(record, now) {
            Some(normalized) => {
                if let Some(existing) = batch.iter_mut().find(|r| r.url == normalized.url) {
                    *existing = normalized;
                } else {
                    batch.push(normalized);
                }
            }
            None => {
                warn!("skipping record without url or title");
                report.skipped += 1;
            }
        }
    }

    let batch_urls: HashSet<&CourseId> = batch.iter().map(|r| &r.url).collect();
    let stored = store.courses();
    let corpus = stored
        .iter()
        .filter(|c| !batch_urls.contains(&c.url))
        .map(|c| (c.title.as_str(), c.description_text()))
        .chain(batch.iter().map(|r| {
            (
                r.title.as_str(),
                r.description.as_deref().unwrap_or_default(),
            )
        }));
    let idf = IdfTable::compute(corpus, stopwords);

    let mut courses = Vec::with_capacity(batch.len());
    for record in batch {
        let keywords = match record.keywords {
            Some(keywords) if !keywords.is_empty() => keywords,
            _ => extract_keywords(
                &record.title,
                record.description.as_deref().unwrap_or_default(),
                &idf,
                stopwords,
                top_n,
            ),
        };
        let instructor = match record.instructor {
            Some(name) => Some(store.get_or_create(EntityKind::Instructor, &name)?),
            None => None,
        };
        courses.push(Course {
            url: record.url,
            title: record.title,
            description: record.description,
            platform: store.get_or_create(EntityKind::Platform, &record.platform)?,
            level: record.level,
            duration: record.duration,
            instructor,
            rating: record.rating,
            category: Some(store.get_or_create(EntityKind::Category, &record.category)?),
            keywords,
            last_scraped: record.last_scraped,
        });
    }

    report.upserted = courses.len();
    store.upsert_courses(courses.clone())?;
    let idf = caches.replace_idf(idf)?;

    // Cached features of changed courses would otherwise shadow the new record
    if let Some(cached) = caches.features() {
        let builder = FeatureBuilder::new(idf.as_ref(), stopwords, top_n);
        let mut features = (*cached).clone();
        for course in &courses {
            features.insert(course.url.clone(), builder.build(course));
        }
        caches.replace_features(features)?;
    }
    debug!(upserted = report.upserted, skipped = report.skipped, "ingested batch");

    Ok((courses, report))
}

#[cfg(test)]
mod test {
    use coursa_keywords::IdfProvider;

    use super::*;
    use crate::{precompute::precompute_caches, store::JsonStore};

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn record(url: &str, title: &str) -> CourseRecord {
        CourseRecord {
            url: url.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("data SCIENCE"), "Data Science");
        assert_eq!(title_case("  machine   learning "), "Machine Learning");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn fills_defaults() {
        let normalized = normalize_record(record(" https://a ", " Intro "), now()).unwrap();
        assert_eq!(normalized.url, CourseId::new("https://a"));
        assert_eq!(normalized.title, "Intro");
        assert_eq!(normalized.platform, UNKNOWN_PLATFORM);
        assert_eq!(normalized.category, DEFAULT_CATEGORY);
        assert_eq!(normalized.instructor, None);
        assert_eq!(normalized.last_scraped, now());
    }

    #[test]
    fn drops_invalid_values() {
        let normalized = normalize_record(
            CourseRecord {
                level: Some("Expert".to_string()),
                rating: Some(7.5),
                duration: Some(-2.0),
                instructor: Some("   ".to_string()),
                description: Some("".to_string()),
                ..record("https://a", "A")
            },
            now(),
        )
        .unwrap();
        assert_eq!(normalized.level, None);
        assert_eq!(normalized.rating, None);
        assert_eq!(normalized.duration, None);
        assert_eq!(normalized.instructor, None);
        assert_eq!(normalized.description, None);
    }

    #[test]
    fn keeps_valid_values() {
        let normalized = normalize_record(
            CourseRecord {
                level: Some("Intermedio".to_string()),
                rating: Some(5.0),
                duration: Some(0.0),
                category: Some("web DEVELOPMENT".to_string()),
                ..record("https://a", "A")
            },
            now(),
        )
        .unwrap();
        assert_eq!(normalized.level, Some(Level::Intermediate));
        assert_eq!(normalized.rating, Some(5.0));
        assert_eq!(normalized.duration, Some(0.0));
        assert_eq!(normalized.category, "Web Development");
    }

    #[test]
    fn missing_url_or_title_is_skipped() {
        assert!(normalize_record(record("", "A"), now()).is_none());
        assert!(normalize_record(record("https://a", " "), now()).is_none());
    }

    #[test]
    fn ingest_upserts_and_refreshes_idf() {
        let store = JsonStore::in_memory();
        let caches = CacheStore::in_memory();
        let stopwords = Stopwords::new();

        let (courses, report) = ingest_records(
            &store,
            &caches,
            &stopwords,
            5,
            vec![
                CourseRecord {
                    platform: Some("Coursera".to_string()),
                    description: Some("Regression with statistics".to_string()),
                    ..record("https://a", "Statistics")
                },
                record("", "Nameless"),
                CourseRecord {
                    platform: Some("Coursera".to_string()),
                    keywords: Some(vec!["painting".to_string()]),
                    ..record("https://b", "Painting")
                },
            ],
            now(),
        )
        .unwrap();

        assert_eq!(
            report,
            IngestReport {
                received: 3,
                upserted: 2,
                skipped: 1,
                indexed: false,
            }
        );
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].platform, courses[1].platform);
        assert_eq!(courses[0].keywords[0], "statistics");
        assert_eq!(courses[1].keywords, vec!["painting"]);
        assert_eq!(store.course_count(), 2);

        let idf = caches.idf().unwrap();
        assert_eq!(idf.documents(), 2);
        assert!(idf.idf("statistics").is_some());
    }

    #[test]
    fn reingest_updates_in_place() {
        let store = JsonStore::in_memory();
        let caches = CacheStore::in_memory();
        let stopwords = Stopwords::new();

        for title in ["Old", "New"] {
            ingest_records(
                &store,
                &caches,
                &stopwords,
                5,
                vec![record("https://a", title)],
                now(),
            )
            .unwrap();
        }

        assert_eq!(store.course_count(), 1);
        assert_eq!(caches.idf().unwrap().documents(), 1);
        assert_eq!(
            store.course(&CourseId::new("https://a")).unwrap().title,
            "New"
        );
    }

    #[test]
    fn reingest_rebuilds_cached_features() {
        let store = JsonStore::in_memory();
        let caches = CacheStore::in_memory();
        let stopwords = Stopwords::new();
        let categorized = |url: &str, category: &str| CourseRecord {
            category: Some(category.to_string()),
            ..record(url, "Sketching")
        };

        ingest_records(
            &store,
            &caches,
            &stopwords,
            5,
            vec![categorized("https://a", "Data"), categorized("https://b", "Data")],
            now(),
        )
        .unwrap();
        precompute_caches(&store, &caches, &stopwords, 5).unwrap();

        ingest_records(
            &store,
            &caches,
            &stopwords,
            5,
            vec![categorized("https://a", "Art")],
            now(),
        )
        .unwrap();

        let features = caches.features().unwrap();
        let a = &features[&CourseId::new("https://a")];
        assert!(a.contains("category:art"));
        assert!(!a.contains("category:data"));
        assert!(features[&CourseId::new("https://b")].contains("category:data"));
    }

    #[test]
    fn ingest_without_feature_cache_builds_none() {
        let store = JsonStore::in_memory();
        let caches = CacheStore::in_memory();
        ingest_records(
            &store,
            &caches,
            &Stopwords::new(),
            5,
            vec![record("https://a", "Sketching")],
            now(),
        )
        .unwrap();
        assert!(caches.features().is_none());
    }

    #[test]
    fn duplicate_urls_in_one_batch_keep_the_last() {
        let store = JsonStore::in_memory();
        let caches = CacheStore::in_memory();
        let (courses, _) = ingest_records(
            &store,
            &caches,
            &Stopwords::new(),
            5,
            vec![record("https://a", "First"), record("https://a", "Second")],
            now(),
        )
        .unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Second");
    }
}
