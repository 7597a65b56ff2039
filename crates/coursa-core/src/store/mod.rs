//! Storage collaborator for courses, reference entities and interactions.
//!
//! The core never assumes a particular database. It reads and writes through the
//! [`CourseStore`] trait; [`JsonStore`] is the shipped implementation.

mod json;

use chrono::{DateTime, Utc};
pub use json::JsonStore;

use crate::{
    error::StoreError,
    interaction::Action,
    model::{Course, CourseId, Entity, EntityKind, UserId, UserInteraction},
};

/// Read/write access to the relational side of the catalog.
///
/// Implementations must be safe to share between concurrent request handlers:
/// many readers, one writer at a time.
pub trait CourseStore: Send + Sync {
    /// Looks up a course by URL.
    fn course(&self, id: &CourseId) -> Option<Course>;

    /// Returns every course in a stable order.
    fn courses(&self) -> Vec<Course>;

    /// Inserts or replaces courses by URL, persisting once for the batch.
    fn upsert_courses(&self, courses: Vec<Course>) -> Result<(), StoreError>;

    /// Returns the entity with `name`, creating it if needed.
    ///
    /// Concurrent calls with the same name return the same identity.
    fn get_or_create(&self, kind: EntityKind, name: &str) -> Result<Entity, StoreError>;

    /// Returns every interaction of one user.
    fn interactions_for(&self, user: &UserId) -> Vec<UserInteraction>;

    /// Returns every interaction of every user.
    fn all_interactions(&self) -> Vec<UserInteraction>;

    /// Applies an action to the (user, course) interaction, creating it on first
    /// use, and returns the updated record.
    fn record_interaction(
        &self,
        user: &UserId,
        course: &CourseId,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<UserInteraction, StoreError>;
}
