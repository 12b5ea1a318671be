use serde::Serialize;
use thiserror::Error;

use crate::editing::reindex::reindex;
use crate::models::{ContentGroup, LessonDraft, OPTION_COUNT, QuizQuestion};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Lesson {0} is required")]
    MissingField(&'static str),
    #[error("Lesson {field} must be a whole number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Block {} in group {} has link content but is a {} block", .block + 1, .group + 1, .kind)]
    ContentShape {
        group: usize,
        block: usize,
        kind: &'static str,
    },
    #[error("Question {} has no valid correct answer", .question + 1)]
    AnswerOutOfRange { question: usize },
}

/// Serializable body for the create/update lesson calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPayload {
    pub title: String,
    pub description: String,
    pub topic: String,
    pub order: u32,
    pub content_groups: Vec<ContentGroup>,
    pub quiz: Vec<QuizQuestion>,
}

/// Validate `draft` and turn it into a payload.
///
/// Group and block `order` are re-derived from position regardless of what the
/// draft holds.
pub fn build_payload(draft: &LessonDraft) -> Result<LessonPayload, ValidationError> {
    let title = required("title", &draft.title)?;
    let description = required("description", &draft.description)?;
    let topic = required("topic", &draft.topic)?;
    let order_text = required("order", &draft.order)?;
    let order = order_text
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidNumber {
            field: "order",
            value: order_text.clone(),
        })?;

    let mut content_groups = draft.content_groups.clone();
    reindex(&mut content_groups);
    for (group_index, group) in content_groups.iter_mut().enumerate() {
        group.description = group.description.take().filter(|d| !d.is_empty());
        reindex(&mut group.contents);
        if let Some(block) = group
            .contents
            .iter()
            .find(|block| !block.kind.accepts(&block.content))
        {
            return Err(ValidationError::ContentShape {
                group: group_index,
                block: block.order,
                kind: block.kind.label(),
            });
        }
    }

    let mut quiz = draft.quiz.clone();
    for (index, question) in quiz.iter_mut().enumerate() {
        if question.correct_answer >= OPTION_COUNT {
            return Err(ValidationError::AnswerOutOfRange { question: index });
        }
        question.explanation = question.explanation.take().filter(|e| !e.is_empty());
    }

    Ok(LessonPayload {
        title,
        description,
        topic,
        order,
        content_groups,
        quiz,
    })
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
