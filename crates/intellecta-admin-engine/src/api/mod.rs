//! Remote collaborators the editor depends on.
//!
//! The engine only talks to these traits; `intellecta-admin-client` implements
//! them over HTTP and tests use in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Course, Lesson, Topic};
use crate::payload::LessonPayload;

/// Failures reported by the remote API, carrying a user-visible message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    MissingToken,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Read-only lookups used to populate the course and topic pickers
#[async_trait]
pub trait TopicLookup: Send + Sync {
    async fn courses(&self) -> Result<Vec<Course>, ApiError>;

    async fn topics_for_course(&self, course_id: &str) -> Result<Vec<Topic>, ApiError>;

    /// Fetch one topic, mainly to find its parent course
    async fn topic(&self, topic_id: &str) -> Result<Topic, ApiError>;
}

/// Lesson persistence
#[async_trait]
pub trait LessonStore: Send + Sync {
    async fn lesson(&self, lesson_id: &str) -> Result<Lesson, ApiError>;

    async fn create_lesson(&self, payload: &LessonPayload) -> Result<Lesson, ApiError>;

    async fn update_lesson(
        &self,
        lesson_id: &str,
        payload: &LessonPayload,
    ) -> Result<Lesson, ApiError>;

    /// Lessons filed under a topic, in whatever order the server returns them
    async fn lessons_for_topic(&self, topic_id: &str) -> Result<Vec<Lesson>, ApiError>;

    async fn delete_lesson(&self, lesson_id: &str) -> Result<(), ApiError>;
}
