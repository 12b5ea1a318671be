/*!
 * # Lesson Editing Core
 *
 * State model for the lesson content editor: a draft made of ordered content
 * groups (each holding ordered, typed content blocks) and a positional list of
 * quiz questions.
 *
 * ## Architecture Overview
 *
 * ### 1. Command-Based Editing
 * - Every mutation is a **`Cmd`** value
 * - [`reduce`] is a pure function `(&LessonDraft, Cmd) -> Result<LessonDraft, EditError>`,
 *   so transition logic is testable without any front-end
 * - Invalid indices are typed [`EditError`]s; moving the first element up or the
 *   last element down is a no-op
 *
 * ### 2. Order Invariant
 * - Groups and blocks carry an explicit `order` that must equal list position
 * - A single generic helper ([`reindex::reindex`]) re-derives it after every
 *   structural mutation
 * - Quiz questions carry no `order`; they are ordered by position only
 *
 * ### 3. Submission Lock
 * - [`Editor`] wraps the reducer with a two-state machine: `Clean` and `Submitting`
 * - While submitting, every command is rejected with [`EditError::Locked`]
 * - Failure returns to `Clean` with the message attached; success is terminal
 *
 * ## Usage Pattern
 *
 * ```rust
 * use intellecta_admin_engine::editing::*;
 * use intellecta_admin_engine::BlockContent;
 *
 * let mut editor = Editor::for_topic("topic-1");
 * editor.apply(Cmd::AddGroup).unwrap();
 * editor.apply(Cmd::AddBlock { group: 0 }).unwrap();
 * editor
 *     .apply(Cmd::UpdateBlock {
 *         group: 0,
 *         block: 0,
 *         field: BlockField::Content(BlockContent::plain("Hello")),
 *     })
 *     .unwrap();
 *
 * assert_eq!(editor.draft().content_groups[0].contents[0].order, 0);
 * ```
 */

pub mod commands;
pub mod editor;
pub mod patch;
pub mod reindex;

pub use commands::{BlockField, Cmd, Direction, EditError, GroupField, QuestionField, reduce};
pub use editor::{Editor, EditorState, SubmitError};
pub use patch::Patch;
