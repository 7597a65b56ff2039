//! Display records for courses, enriched with the viewer's own interaction.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Course, UserInteraction};

/// What a presentation layer shows for one course in a result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseView {
    /// Source URL.
    pub url: String,
    /// Title.
    pub title: String,
    /// Description, empty if unknown.
    pub description: String,
    /// Platform name.
    pub platform: String,
    /// Category name.
    pub category: Option<String>,
    /// Level name.
    pub level: Option<String>,
    /// Instructor name.
    pub instructor: Option<String>,
    /// Duration in hours.
    pub duration: Option<f64>,
    /// Rating.
    pub rating: Option<f64>,
    /// Keywords.
    pub keywords: Vec<String>,
    /// Last scrape time.
    pub last_scraped: DateTime<Utc>,
    /// Relevance or recommendation score, when ranked.
    pub score: Option<f64>,
    /// Whether the viewer likes the course.
    pub liked: bool,
    /// Whether the viewer dislikes the course.
    pub disliked: bool,
    /// How often the viewer opened the course.
    pub view_count: u32,
}

/// Builds the display record for a course.
///
/// Pure: the stored course and interaction are only read. Without a viewer
/// interaction all flags are off.
pub fn decorate(course: &Course, viewer: Option<&UserInteraction>, score: Option<f64>) -> CourseView {
    CourseView {
        url: course.url.to_string(),
        title: course.title.clone(),
        description: course.description_text().to_string(),
        platform: course.platform.name.clone(),
        category: course.category.as_ref().map(|e| e.name.clone()),
        level: course.level.map(|l| l.to_string()),
        instructor: course.instructor.as_ref().map(|e| e.name.clone()),
        duration: course.duration,
        rating: course.rating,
        keywords: course.keywords.clone(),
        last_scraped: course.last_scraped,
        score,
        liked: viewer.is_some_and(|i| i.liked),
        disliked: viewer.is_some_and(|i| i.disliked),
        view_count: viewer.map_or(0, |i| i.viewed),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{CourseId, Entity, EntityId, Level, UserId};

    fn course() -> Course {
        Course {
            url: CourseId::new("https://a"),
            title: "Statistics".to_string(),
            description: None,
            platform: Entity {
                id: EntityId(1),
                name: "edX".to_string(),
            },
            level: Some(Level::Advanced),
            duration: Some(8.0),
            instructor: None,
            rating: Some(4.1),
            category: Some(Entity {
                id: EntityId(2),
                name: "Data".to_string(),
            }),
            keywords: vec!["statistics".to_string()],
            last_scraped: DateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn anonymous_view_has_no_flags() {
        let view = decorate(&course(), None, None);
        assert!(!view.liked && !view.disliked);
        assert_eq!(view.view_count, 0);
        assert_eq!(view.platform, "edX");
        assert_eq!(view.level.as_deref(), Some("Advanced"));
        assert_eq!(view.description, "");
    }

    #[test]
    fn viewer_flags_are_copied() {
        let interaction = UserInteraction {
            liked: true,
            viewed: 3,
            ..UserInteraction::new(UserId::new("u"), CourseId::new("https://a"), DateTime::UNIX_EPOCH)
        };
        let stored = course();
        let view = decorate(&stored, Some(&interaction), Some(0.7));

        assert!(view.liked);
        assert!(!view.disliked);
        assert_eq!(view.view_count, 3);
        assert_eq!(view.score, Some(0.7));
        assert_eq!(stored, course());
    }
}
