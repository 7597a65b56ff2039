//! JSON snapshot implementation of [`CourseStore`].

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CourseStore;
use crate::{
    error::StoreError,
    interaction::Action,
    model::{Course, CourseId, Entity, EntityId, EntityKind, UserId, UserInteraction},
    persist::{read_json, write_json_atomic},
};

/// Everything the store holds, as persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    /// Courses keyed by URL.
    #[serde(default)]
    courses: BTreeMap<CourseId, Course>,
    /// Platforms keyed by name.
    #[serde(default)]
    platforms: BTreeMap<String, Entity>,
    /// Categories keyed by name.
    #[serde(default)]
    categories: BTreeMap<String, Entity>,
    /// Instructors keyed by name.
    #[serde(default)]
    instructors: BTreeMap<String, Entity>,
    /// Next entity id to hand out.
    #[serde(default)]
    next_entity_id: u64,
    /// Interactions keyed by user, then course.
    #[serde(default)]
    interactions: BTreeMap<UserId, BTreeMap<CourseId, UserInteraction>>,
}

impl StoreState {
    /// Entity table for a kind.
    fn entities_mut(&mut self, kind: EntityKind) -> &mut BTreeMap<String, Entity> {
        match kind {
            EntityKind::Platform => &mut self.platforms,
            EntityKind::Category => &mut self.categories,
            EntityKind::Instructor => &mut self.instructors,
        }
    }
}

/// In-memory store persisted as a single JSON snapshot.
///
/// State lives behind an `RwLock`; every mutation happens under the write lock,
/// so get-or-create cannot race into duplicate names. A mutation is applied to a
/// copy of the state, the copy is written atomically, and only then does it
/// replace the live state. A store without a path never touches disk.
#[derive(Debug)]
pub struct JsonStore {
    /// Snapshot location.
    path: Option<PathBuf>,
    /// Current state.
    state: RwLock<StoreState>,
}

impl JsonStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let state = read_json(path)?.unwrap_or_default();
        Ok(Self {
            path: Some(path.to_path_buf()),
            state: RwLock::new(state),
        })
    }

    /// Creates an empty store that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Number of stored courses.
    pub fn course_count(&self) -> usize {
        self.read().courses.len()
    }

    /// Acquires the read lock. A poisoned lock still holds consistent data since
    /// the live state is only ever replaced whole.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires the write lock.
    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `change` to a copy of the state, persists the copy and installs it.
    ///
    /// If persisting fails the live state is left untouched.
    fn commit<T>(
        &self,
        state: &mut StoreState,
        change: impl FnOnce(&mut StoreState) -> T,
    ) -> Result<T, StoreError> {
        let mut next = state.clone();
        let out = change(&mut next);
        if let Some(path) = &self.path {
            write_json_atomic(path, &next)?;
        }
        *state = next;
        Ok(out)
    }
}

impl CourseStore for JsonStore {
    fn course(&self, id: &CourseId) -> Option<Course> {
        self.read().courses.get(id).cloned()
    }

    fn courses(&self) -> Vec<Course> {
        self.read().courses.values().cloned().collect()
    }

    fn upsert_courses(&self, courses: Vec<Course>) -> Result<(), StoreError> {
        let mut state = self.write();
        let count = courses.len();
        self.commit(&mut state, |state| {
            for course in courses {
                state.courses.insert(course.url.clone(), course);
            }
        })?;
        debug!(count, "upserted courses");
        Ok(())
    }

    fn get_or_create(&self, kind: EntityKind, name: &str) -> Result<Entity, StoreError> {
        let name = name.trim();
        let mut state = self.write();
        if let Some(existing) = state.entities_mut(kind).get(name) {
            return Ok(existing.clone());
        }

        let entity = Entity {
            id: EntityId(state.next_entity_id),
            name: name.to_string(),
        };
        self.commit(&mut state, |state| {
            state.next_entity_id += 1;
            state
                .entities_mut(kind)
                .insert(entity.name.clone(), entity.clone());
        })?;
        debug!(?kind, name, "created entity");
        Ok(entity)
    }

    fn interactions_for(&self, user: &UserId) -> Vec<UserInteraction> {
        self.read()
            .interactions
            .get(user)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    fn all_interactions(&self) -> Vec<UserInteraction> {
        self.read()
            .interactions
            .values()
            .flat_map(|m| m.values().cloned())
            .collect()
    }

    fn record_interaction(
        &self,
        user: &UserId,
        course: &CourseId,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<UserInteraction, StoreError> {
        let mut state = self.write();
        self.commit(&mut state, |state| {
            let interaction = state
                .interactions
                .entry(user.clone())
                .or_default()
                .entry(course.clone())
                .or_insert_with(|| UserInteraction::new(user.clone(), course.clone(), now));
            interaction.apply(action, now);
            interaction.clone()
        })
    }
}
