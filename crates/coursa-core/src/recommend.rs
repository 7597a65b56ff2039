//! Recommendation entry points over a store and its caches.
//!
//! Every lookup goes cache first: course features come from the
//! `course_features` cache and item similarities from `item_sim`, each computed
//! on the fly when the cache is absent or lacks the course. Courses that no longer
//! resolve in storage are dropped from results.

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use coursa_config::RecommendSettings;
use coursa_keywords::{IdfTable, Stopwords};
use tracing::debug;

use crate::{
    cache::{CacheStore, CourseFeatures},
    collaborative::{ItemSimilarity, build_preferences, recommend_collaborative},
    content::recommend_content,
    features::{FeatureBuilder, FeatureSet},
    hybrid::{blend, exclude_and_truncate, hybrid_weights, is_cold_start, popularity_ranking},
    model::{Course, CourseId, ScoredCourse, UserId},
    profile::{FeatureSource, build_user_profile},
    store::CourseStore,
};

/// Cache-first feature lookup.
pub struct FeatureLookup<'a, S: ?Sized> {
    /// Fallback for courses missing from the cache.
    store: &'a S,
    /// Precomputed features, if any.
    cached: Option<Arc<CourseFeatures>>,
    /// IDF table used when computing on the fly.
    idf: Arc<IdfTable>,
    /// Stopwords for keyword extraction.
    stopwords: &'a Stopwords,
    /// Keyword tokens per course.
    top_n: usize,
}

impl<'a, S: CourseStore + ?Sized> FeatureLookup<'a, S> {
    /// Creates a lookup over the current cache snapshots.
    pub fn new(store: &'a S, caches: &CacheStore, stopwords: &'a Stopwords, top_n: usize) -> Self {
        Self {
            store,
            cached: caches.features(),
            idf: caches.idf().unwrap_or_default(),
            stopwords,
            top_n,
        }
    }

    /// Computes features from a live record.
    fn compute(&self, course: &Course) -> FeatureSet {
        FeatureBuilder::new(self.idf.as_ref(), self.stopwords, self.top_n).build(course)
    }

    /// Cached features of a course.
    fn cached(&self, id: &CourseId) -> Option<FeatureSet> {
        self.cached.as_ref().and_then(|c| c.get(id)).cloned()
    }
}

impl<S: CourseStore + ?Sized> FeatureSource for FeatureLookup<'_, S> {
    fn features(&self, course: &CourseId) -> Option<FeatureSet> {
        self.cached(course)
            .or_else(|| self.store.course(course).map(|c| self.compute(&c)))
    }

    fn features_of(&self, course: &Course) -> FeatureSet {
        self.cached(&course.url)
            .unwrap_or_else(|| self.compute(course))
    }
}

/// Produces recommendations for one point in time.
pub struct Recommender<'a, S: ?Sized> {
    /// Course and interaction storage.
    store: &'a S,
    /// Feature, similarity and IDF caches.
    caches: &'a CacheStore,
    /// Stopwords for on-the-fly keyword extraction.
    stopwords: &'a Stopwords,
    /// Cold start and decay settings.
    settings: &'a RecommendSettings,
    /// Keyword tokens per course.
    top_n: usize,
    /// Reference time for recency decay.
    now: DateTime<Utc>,
}

impl<'a, S: CourseStore + ?Sized> Recommender<'a, S> {
    /// Creates a recommender evaluated at `now`.
    pub fn new(
        store: &'a S,
        caches: &'a CacheStore,
        stopwords: &'a Stopwords,
        settings: &'a RecommendSettings,
        top_n: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            store,
            caches,
            stopwords,
            settings,
            top_n,
            now,
        }
    }

    /// Feature lookup over the current caches.
    fn lookup(&self) -> FeatureLookup<'a, S> {
        FeatureLookup::new(self.store, self.caches, self.stopwords, self.top_n)
    }

    /// Ranks courses by alignment with the user's profile.
    ///
    /// Courses the user liked or disliked are excluded; viewed ones stay eligible.
    pub fn recommend_content(&self, user: &UserId, limit: usize) -> Vec<ScoredCourse> {
        let interactions = self.store.interactions_for(user);
        let lookup = self.lookup();
        let profile = build_user_profile(
            &interactions,
            &lookup,
            self.now,
            self.settings.half_life_days,
        );
        if profile.is_empty() {
            return Vec::new();
        }

        let excluded: HashSet<CourseId> = interactions
            .iter()
            .filter(|i| i.is_rated())
            .map(|i| i.course.clone())
            .collect();
        recommend_content(&profile, self.store.courses(), &excluded, &lookup, limit)
    }

    /// Item similarities from the cache, or computed from all interactions.
    fn item_similarity(&self) -> Arc<ItemSimilarity> {
        self.caches.item_similarity().unwrap_or_else(|| {
            debug!("item similarity cache missing, computing");
            Arc::new(ItemSimilarity::compute(&build_preferences(
                &self.store.all_interactions(),
            )))
        })
    }

    /// Ranked course ids from collaborative filtering.
    fn collaborative_ids(&self, user: &UserId, limit: usize) -> Vec<(CourseId, f64)> {
        let interactions = self.store.interactions_for(user);
        let prefs: BTreeMap<CourseId, f64> = interactions
            .iter()
            .map(|i| (i.course.clone(), i.preference()))
            .filter(|(_, p)| *p != 0.0)
            .collect();
        let interacted: HashSet<CourseId> = interactions.into_iter().map(|i| i.course).collect();
        recommend_collaborative(&prefs, &interacted, &self.item_similarity(), limit)
    }

    /// Ranks courses by similarity to those the user engaged with positively.
    pub fn recommend_collaborative(&self, user: &UserId, limit: usize) -> Vec<ScoredCourse> {
        self.resolve(self.collaborative_ids(user, limit), limit)
    }

    /// Global popularity ranking for users without history.
    pub fn recommend_for_anonymous(&self, limit: usize) -> Vec<ScoredCourse> {
        let ranked = popularity_ranking(self.store.courses(), &self.store.all_interactions());
        exclude_and_truncate(ranked, &HashSet::new(), limit)
    }

    /// Blends content and collaborative recommendations, or falls back to
    /// popularity while the user is in cold start.
    pub fn recommend_hybrid(&self, user: &UserId, limit: usize) -> Vec<ScoredCourse> {
        if limit == 0 {
            return Vec::new();
        }

        let interactions = self.store.interactions_for(user);
        if is_cold_start(interactions.len(), self.settings.cold_start_threshold) {
            debug!(%user, interactions = interactions.len(), "cold start");
            let interacted: HashSet<CourseId> =
                interactions.into_iter().map(|i| i.course).collect();
            let ranked = popularity_ranking(self.store.courses(), &self.store.all_interactions());
            return exclude_and_truncate(ranked, &interacted, limit);
        }

        let candidates = limit.saturating_mul(2);
        let content: Vec<(CourseId, f64)> = self
            .recommend_content(user, candidates)
            .into_iter()
            .map(|r| (r.course.url, r.score))
            .collect();
        let collaborative = self.collaborative_ids(user, candidates);

        let users: HashSet<UserId> = self
            .store
            .all_interactions()
            .into_iter()
            .map(|i| i.user)
            .collect();
        let weights = hybrid_weights(users.len());
        debug!(%user, users = users.len(), ?weights, "blending");

        self.resolve(blend(content, collaborative, weights), limit)
    }

    /// Resolves ranked ids against storage, dropping missing courses.
    fn resolve(&self, ranked: Vec<(CourseId, f64)>, limit: usize) -> Vec<ScoredCourse> {
        ranked
            .into_iter()
            .filter_map(|(id, score)| {
                let course = self.store.course(&id);
                if course.is_none() {
                    debug!(course = %id, "dropping unresolved course");
                }
                course.map(|course| ScoredCourse { course, score })
            })
            .take(limit)
            .collect()
    }
}
