use thiserror::Error;

use crate::api::{ApiError, LessonStore};
use crate::editing::{Cmd, EditError, Patch, reduce};
use crate::models::{Lesson, LessonDraft};
use crate::payload::{LessonPayload, ValidationError, build_payload};

/// Macro state of the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    /// Accepting commands
    Clean,
    /// A save request is in flight; commands are rejected
    Submitting,
    /// Saved; the editor is done and should be discarded
    Submitted(Lesson),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Editor is not accepting a submission right now")]
    Locked,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Lesson editor: a draft plus the submission lock.
///
/// All draft mutations go through [`Editor::apply`], which runs the pure
/// [`reduce`] and swaps in the result.
#[derive(Debug, Clone)]
pub struct Editor {
    draft: LessonDraft,
    /// Set when editing a stored lesson; decides create vs update on submit
    lesson_id: Option<String>,
    state: EditorState,
    /// Message from the last failed submission
    error: Option<String>,
    version: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Editor for a brand new lesson
    pub fn new() -> Self {
        Self::with_draft(LessonDraft::new(), None)
    }

    /// Editor for a new lesson under a preselected topic
    pub fn for_topic(topic: impl Into<String>) -> Self {
        Self::with_draft(LessonDraft::for_topic(topic), None)
    }

    /// Editor hydrated from a stored lesson; submitting updates it in place
    pub fn from_lesson(lesson: Lesson) -> Self {
        let lesson_id = lesson.id.clone();
        Self::with_draft(LessonDraft::from(lesson), Some(lesson_id))
    }

    fn with_draft(draft: LessonDraft, lesson_id: Option<String>) -> Self {
        Self {
            draft,
            lesson_id,
            state: EditorState::Clean,
            error: None,
            version: 0,
        }
    }

    pub fn draft(&self) -> &LessonDraft {
        &self.draft
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn lesson_id(&self) -> Option<&str> {
        self.lesson_id.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.lesson_id.is_some()
    }

    pub fn is_locked(&self) -> bool {
        self.state != EditorState::Clean
    }

    /// Apply a command to the draft
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        if self.is_locked() {
            log::debug!("rejecting {cmd:?} while {:?}", self.state);
            return Err(EditError::Locked);
        }

        let next = reduce(&self.draft, cmd)?;
        let changed = next != self.draft;
        if changed {
            self.draft = next;
            self.version += 1;
        }

        Ok(Patch {
            changed,
            version: self.version,
        })
    }

    /// Validate the draft and enter `Submitting`.
    ///
    /// Validation failures keep the editor `Clean` with the message attached.
    pub fn begin_submit(&mut self) -> Result<LessonPayload, SubmitError> {
        if self.is_locked() {
            return Err(SubmitError::Locked);
        }
        self.error = None;

        match build_payload(&self.draft) {
            Ok(payload) => {
                log::debug!("submitting lesson draft v{}", self.version);
                self.state = EditorState::Submitting;
                Ok(payload)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Leave `Submitting` with the outcome of the remote call
    pub fn finish_submit(
        &mut self,
        result: Result<Lesson, ApiError>,
    ) -> Result<Lesson, SubmitError> {
        if self.state != EditorState::Submitting {
            return Err(SubmitError::Locked);
        }

        match result {
            Ok(lesson) => {
                log::info!("lesson {} saved", lesson.id);
                self.state = EditorState::Submitted(lesson.clone());
                Ok(lesson)
            }
            Err(e) => {
                log::warn!("failed to save lesson: {e}");
                self.state = EditorState::Clean;
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Validate, send the draft to `store`, and record the outcome.
    ///
    /// Creates a lesson for new drafts and updates the stored one otherwise.
    /// There is no cancellation: the editor stays `Submitting` until the store
    /// call resolves.
    pub async fn submit<S>(&mut self, store: &S) -> Result<Lesson, SubmitError>
    where
        S: LessonStore + ?Sized,
    {
        let payload = self.begin_submit()?;
        let result = match &self.lesson_id {
            Some(id) => store.update_lesson(id, &payload).await,
            None => store.create_lesson(&payload).await,
        };
        self.finish_submit(result)
    }
}
