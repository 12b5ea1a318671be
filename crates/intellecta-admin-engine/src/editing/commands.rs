use thiserror::Error;

use crate::editing::reindex::{move_ordered, remove_ordered};
use crate::models::{
    BlockContent, ContentBlock, ContentGroup, ContentType, LessonDraft, OPTION_COUNT,
    QuizQuestion,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupField {
    Title(String),
    /// An empty description clears it
    Description(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockField {
    /// Changing the type resets content to the new type's empty shape
    Type(ContentType),
    Content(BlockContent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionField {
    Question(String),
    CorrectAnswer(usize),
    /// An empty explanation clears it
    Explanation(String),
}

/// Commands that can be applied to a lesson draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    SetTitle(String),
    SetDescription(String),
    SetTopic(String),
    SetOrder(String),
    AddGroup,
    UpdateGroup {
        group: usize,
        field: GroupField,
    },
    RemoveGroup {
        group: usize,
    },
    MoveGroup {
        group: usize,
        direction: Direction,
    },
    AddBlock {
        group: usize,
    },
    UpdateBlock {
        group: usize,
        block: usize,
        field: BlockField,
    },
    RemoveBlock {
        group: usize,
        block: usize,
    },
    MoveBlock {
        group: usize,
        block: usize,
        direction: Direction,
    },
    AddQuestion,
    UpdateQuestion {
        question: usize,
        field: QuestionField,
    },
    UpdateOption {
        question: usize,
        option: usize,
        value: String,
    },
    RemoveQuestion {
        question: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Editor is locked while a submission is in flight")]
    Locked,
    #[error("Group {index} out of range (lesson has {len} groups)")]
    GroupOutOfRange { index: usize, len: usize },
    #[error("Block {index} out of range (group {group} has {len} blocks)")]
    BlockOutOfRange {
        group: usize,
        index: usize,
        len: usize,
    },
    #[error("Question {index} out of range (quiz has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },
    #[error("Option {index} out of range (questions have {} options)", OPTION_COUNT)]
    OptionOutOfRange { index: usize },
    #[error("Correct answer {answer} out of range (questions have {} options)", OPTION_COUNT)]
    AnswerOutOfRange { answer: usize },
    #[error("Link content is not valid for a {} block", .kind.label())]
    ContentShape { kind: ContentType },
}

/// Apply `cmd` to `state`, producing the next draft.
///
/// Pure: `state` is never modified. An error means the command was rejected as a
/// whole and the caller keeps `state`.
pub fn reduce(state: &LessonDraft, cmd: Cmd) -> Result<LessonDraft, EditError> {
    let mut draft = state.clone();
    apply(&mut draft, cmd)?;
    Ok(draft)
}

fn apply(draft: &mut LessonDraft, cmd: Cmd) -> Result<(), EditError> {
    match cmd {
        Cmd::SetTitle(title) => draft.title = title,
        Cmd::SetDescription(description) => draft.description = description,
        Cmd::SetTopic(topic) => draft.topic = topic,
        Cmd::SetOrder(order) => draft.order = order,

        Cmd::AddGroup => {
            let order = draft.content_groups.len();
            draft.content_groups.push(ContentGroup::new(order));
        }
        Cmd::UpdateGroup { group, field } => {
            let target = group_mut(draft, group)?;
            match field {
                GroupField::Title(title) => target.title = title,
                GroupField::Description(description) => {
                    target.description = non_empty(description);
                }
            }
        }
        Cmd::RemoveGroup { group } => {
            let len = draft.content_groups.len();
            remove_ordered(&mut draft.content_groups, group)
                .ok_or(EditError::GroupOutOfRange { index: group, len })?;
        }
        Cmd::MoveGroup { group, direction } => {
            group_mut(draft, group)?;
            move_ordered(&mut draft.content_groups, group, direction);
        }

        Cmd::AddBlock { group } => {
            let contents = &mut group_mut(draft, group)?.contents;
            let order = contents.len();
            contents.push(ContentBlock::new(ContentType::Text, order));
        }
        Cmd::UpdateBlock {
            group,
            block,
            field,
        } => {
            let target = block_mut(draft, group, block)?;
            match field {
                BlockField::Type(kind) if kind == target.kind => {}
                BlockField::Type(kind) => {
                    target.kind = kind;
                    target.content = kind.empty_content();
                }
                BlockField::Content(content) => {
                    if !target.kind.accepts(&content) {
                        return Err(EditError::ContentShape { kind: target.kind });
                    }
                    target.content = content;
                }
            }
        }
        Cmd::RemoveBlock { group, block } => {
            let contents = &mut group_mut(draft, group)?.contents;
            let len = contents.len();
            remove_ordered(contents, block).ok_or(EditError::BlockOutOfRange {
                group,
                index: block,
                len,
            })?;
        }
        Cmd::MoveBlock {
            group,
            block,
            direction,
        } => {
            block_mut(draft, group, block)?;
            move_ordered(&mut draft.content_groups[group].contents, block, direction);
        }

        Cmd::AddQuestion => draft.quiz.push(QuizQuestion::default()),
        Cmd::UpdateQuestion { question, field } => {
            let target = question_mut(draft, question)?;
            match field {
                QuestionField::Question(text) => target.question = text,
                QuestionField::CorrectAnswer(answer) if answer >= OPTION_COUNT => {
                    return Err(EditError::AnswerOutOfRange { answer });
                }
                QuestionField::CorrectAnswer(answer) => target.correct_answer = answer,
                QuestionField::Explanation(explanation) => {
                    target.explanation = non_empty(explanation);
                }
            }
        }
        Cmd::UpdateOption {
            question,
            option,
            value,
        } => {
            let target = question_mut(draft, question)?;
            let slot = target
                .options
                .get_mut(option)
                .ok_or(EditError::OptionOutOfRange { index: option })?;
            *slot = value;
        }
        Cmd::RemoveQuestion { question } => {
            question_mut(draft, question)?;
            draft.quiz.remove(question);
        }
    }
    Ok(())
}

fn group_mut(draft: &mut LessonDraft, index: usize) -> Result<&mut ContentGroup, EditError> {
    let len = draft.content_groups.len();
    draft
        .content_groups
        .get_mut(index)
        .ok_or(EditError::GroupOutOfRange { index, len })
}

fn block_mut(
    draft: &mut LessonDraft,
    group: usize,
    index: usize,
) -> Result<&mut ContentBlock, EditError> {
    let contents = &mut group_mut(draft, group)?.contents;
    let len = contents.len();
    contents
        .get_mut(index)
        .ok_or(EditError::BlockOutOfRange { group, index, len })
}

fn question_mut(draft: &mut LessonDraft, index: usize) -> Result<&mut QuizQuestion, EditError> {
    let len = draft.quiz.len();
    draft
        .quiz
        .get_mut(index)
        .ok_or(EditError::QuestionOutOfRange { index, len })
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
