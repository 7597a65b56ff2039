//! The caller-facing engine.
//!
//! [`Engine`] wires configuration, storage, caches and the search index together
//! and exposes the operations a presentation layer consumes. Queries never fail:
//! index problems are logged and degrade to empty results.

use std::{collections::HashMap, path::PathBuf};

use chrono::{DateTime, Utc};
use coursa_config::Config;
use coursa_index::{
    CourseDocument, IndexError, IndexStatus, IndexWriter, SearchRequest, Searcher,
    compute_config_hash, detect_index_status, index_directory, write_config_hash,
};
use coursa_keywords::Stopwords;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    cache::CacheStore,
    decorate::{CourseView, decorate},
    error::CoreError,
    ingest::{IngestReport, ingest_records},
    interaction::Action,
    model::{Course, CourseId, CourseRecord, ScoredCourse, UserId, UserInteraction},
    precompute::{PrecomputeReport, precompute_caches},
    recommend::Recommender,
    store::{CourseStore, JsonStore},
};

/// File name of the storage snapshot inside the data directory.
pub const STORE_FILENAME: &str = "store.json";

/// Directory holding cache files inside the data directory.
pub const CACHE_DIR: &str = "cache";

/// One page of decorated search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    /// Courses on this page, best first.
    pub courses: Vec<CourseView>,
    /// Total matches across all pages.
    pub total: usize,
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub per_page: usize,
}

impl SearchResults {
    /// An empty first page.
    fn empty(per_page: usize) -> Self {
        Self {
            courses: Vec::new(),
            total: 0,
            page: 1,
            per_page,
        }
    }
}

/// Search, recommendation and ingestion over one catalog.
pub struct Engine {
    /// Effective configuration.
    config: Config,
    /// Stopwords built once from configuration.
    stopwords: Stopwords,
    /// Storage collaborator.
    store: JsonStore,
    /// Derived data caches.
    caches: CacheStore,
    /// Search index location; `None` disables indexing.
    index_dir: Option<PathBuf>,
}

impl Engine {
    /// Opens the engine under the configuration's data directory.
    pub fn open(config: Config) -> Result<Self, CoreError> {
        let data_dir = config
            .data_directory()
            .ok_or(CoreError::NoDataDirectory)?;
        let store = JsonStore::open(&data_dir.join(STORE_FILENAME))?;
        let caches = CacheStore::open(&data_dir.join(CACHE_DIR));
        let index_dir = index_directory(&config);
        debug!(data_dir = %data_dir.display(), "opened engine");
        Ok(Self::with_parts(config, store, caches, index_dir))
    }

    /// Assembles an engine from explicit parts.
    pub fn with_parts(
        config: Config,
        store: JsonStore,
        caches: CacheStore,
        index_dir: Option<PathBuf>,
    ) -> Self {
        let stopwords = Stopwords::with_extra(&config.keywords.stopwords);
        Self {
            config,
            stopwords,
            store,
            caches,
            index_dir,
        }
    }

    /// Effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Storage collaborator.
    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Derived data caches.
    pub fn caches(&self) -> &CacheStore {
        &self.caches
    }

    /// Upserts a batch of scraped records, then indexes them in one commit.
    ///
    /// Storage is the source of truth: an index failure is logged and leaves the
    /// index stale until the next reindex.
    pub fn ingest(&self, records: Vec<CourseRecord>) -> Result<IngestReport, CoreError> {
        let (courses, mut report) = ingest_records(
            &self.store,
            &self.caches,
            &self.stopwords,
            self.config.keywords.top_n,
            records,
            Utc::now(),
        )?;

        let docs: Vec<CourseDocument> = courses.iter().map(course_document).collect();
        match self.write_index(|writer| writer.commit_batch(&docs)) {
            Ok(indexed) => report.indexed = indexed,
            Err(e) => warn!("indexing failed, run reindex: {e}"),
        }
        Ok(report)
    }

    /// Rebuilds the search index from every stored course.
    pub fn reindex(&self) -> Result<usize, CoreError> {
        let docs: Vec<CourseDocument> = self.store.courses().iter().map(course_document).collect();
        self.write_index(|writer| writer.rebuild(&docs))?;
        info!(courses = docs.len(), "reindexed");
        Ok(docs.len())
    }

    /// Opens the writer, runs `op` and records the config hash on success.
    ///
    /// Returns false when indexing is disabled.
    fn write_index(
        &self,
        op: impl FnOnce(&mut IndexWriter) -> Result<(), IndexError>,
    ) -> Result<bool, IndexError> {
        let Some(dir) = &self.index_dir else {
            return Ok(false);
        };
        let mut writer = IndexWriter::open(dir, &self.config.search.stemmer)?;
        op(&mut writer)?;
        write_config_hash(dir, &compute_config_hash(&self.config))?;
        Ok(true)
    }

    /// State of the search index relative to the configuration.
    pub fn index_status(&self) -> IndexStatus {
        detect_index_status(&self.config)
    }

    /// Rebuilds the feature and similarity caches.
    pub fn precompute_caches(&self) -> Result<PrecomputeReport, CoreError> {
        precompute_caches(
            &self.store,
            &self.caches,
            &self.stopwords,
            self.config.keywords.top_n,
        )
    }

    /// Runs a search and decorates the hits for `viewer`.
    ///
    /// The page size comes from configuration. Hits whose course no longer exists
    /// are skipped; index failures yield an empty page.
    pub fn search(&self, request: SearchRequest, viewer: Option<&UserId>) -> SearchResults {
        let per_page = self.config.search.per_page;
        let request = SearchRequest { per_page, ..request };
        let Some(dir) = &self.index_dir else {
            return SearchResults::empty(per_page);
        };

        let page = match Searcher::open_with_settings(dir, &self.config.search)
            .and_then(|searcher| searcher.search(&request))
        {
            Ok(page) => page,
            Err(e) => {
                warn!("search failed: {e}");
                return SearchResults::empty(per_page);
            }
        };

        let interactions = self.viewer_interactions(viewer);
        let courses = page
            .hits
            .iter()
            .filter_map(|hit| {
                let id = CourseId::new(hit.url.as_str());
                let course = self.store.course(&id);
                if course.is_none() {
                    debug!(url = %hit.url, "skipping hit without stored course");
                }
                course.map(|c| decorate(&c, interactions.get(&id), Some(f64::from(hit.score))))
            })
            .collect();

        SearchResults {
            courses,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
        }
    }

    /// Recommender evaluated at `now`.
    pub fn recommender_at(&self, now: DateTime<Utc>) -> Recommender<'_, JsonStore> {
        Recommender::new(
            &self.store,
            &self.caches,
            &self.stopwords,
            &self.config.recommend,
            self.config.keywords.top_n,
            now,
        )
    }

    /// Personalized recommendations, or popularity during cold start.
    pub fn recommend_hybrid(&self, user: &UserId, limit: usize) -> Vec<ScoredCourse> {
        self.recommender_at(Utc::now()).recommend_hybrid(user, limit)
    }

    /// Content-based recommendations only.
    pub fn recommend_content(&self, user: &UserId, limit: usize) -> Vec<ScoredCourse> {
        self.recommender_at(Utc::now()).recommend_content(user, limit)
    }

    /// Collaborative recommendations only.
    pub fn recommend_collaborative(&self, user: &UserId, limit: usize) -> Vec<ScoredCourse> {
        self.recommender_at(Utc::now()).recommend_collaborative(user, limit)
    }

    /// Global popularity ranking.
    pub fn recommend_for_anonymous(&self, limit: usize) -> Vec<ScoredCourse> {
        self.recommender_at(Utc::now()).recommend_for_anonymous(limit)
    }

    /// Records a like, dislike or view.
    pub fn record_interaction(
        &self,
        user: &UserId,
        course: &CourseId,
        action: Action,
    ) -> Result<UserInteraction, CoreError> {
        if self.store.course(course).is_none() {
            return Err(CoreError::UnknownCourse(course.clone()));
        }
        let interaction = self
            .store
            .record_interaction(user, course, action, Utc::now())?;
        debug!(%user, %course, %action, "recorded interaction");
        Ok(interaction)
    }

    /// Decorates ranked courses for `viewer`.
    pub fn decorate_ranked(&self, ranked: &[ScoredCourse], viewer: Option<&UserId>) -> Vec<CourseView> {
        let interactions = self.viewer_interactions(viewer);
        ranked
            .iter()
            .map(|r| decorate(&r.course, interactions.get(&r.course.url), Some(r.score)))
            .collect()
    }

    /// The viewer's interactions keyed by course.
    fn viewer_interactions(&self, viewer: Option<&UserId>) -> HashMap<CourseId, UserInteraction> {
        viewer
            .map(|user| {
                self.store
                    .interactions_for(user)
                    .into_iter()
                    .map(|i| (i.course.clone(), i))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Search view of a stored course.
fn course_document(course: &Course) -> CourseDocument {
    CourseDocument {
        url: course.url.to_string(),
        title: course.title.clone(),
        description: course.description_text().to_string(),
        keywords: course.keywords.clone(),
        category: course.category.as_ref().map(|e| e.name.clone()),
        level: course.level.map(|l| l.to_string()),
        platform: Some(course.platform.name.clone()),
        instructor: course.instructor.as_ref().map(|e| e.name.clone()),
        duration: course.duration,
        rating: course.rating,
        last_scraped: course.last_scraped,
    }
}
