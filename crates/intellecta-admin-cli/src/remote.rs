//! One-shot lesson operations that run without the terminal UI.

use std::path::Path;

use intellecta_admin_engine::{ApiError, LessonStore};

/// One line per lesson of `topic_id`, sorted by lesson order
pub async fn list_lessons<S>(store: &S, topic_id: &str) -> Result<Vec<String>, ApiError>
where
    S: LessonStore + ?Sized,
{
    let mut lessons = store.lessons_for_topic(topic_id).await?;
    lessons.sort_by_key(|lesson| lesson.order);
    Ok(lessons
        .iter()
        .map(|lesson| format!("{:>4}  {}  {}", lesson.order, lesson.id, lesson.title))
        .collect())
}

pub async fn delete_lesson<S>(store: &S, lesson_id: &str) -> Result<(), ApiError>
where
    S: LessonStore + ?Sized,
{
    store.delete_lesson(lesson_id).await?;
    log::info!("deleted lesson {lesson_id}");
    Ok(())
}

/// User-facing message for an API failure; auth failures point at the token file
pub fn describe_error(error: &ApiError, token_path: &Path) -> String {
    match error {
        ApiError::Unauthorized(_) | ApiError::MissingToken => format!(
            "{error}. Replace the token in {}",
            token_path.display()
        ),
        _ => error.to_string(),
    }
}
