//! Editor submission against an in-memory lesson store.

use std::sync::Mutex;

use async_trait::async_trait;
use intellecta_admin_engine::editing::{BlockField, Cmd, EditError, SubmitError};
use intellecta_admin_engine::{
    ApiError, BlockContent, Editor, EditorState, Lesson, LessonPayload, LessonStore,
};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(LessonPayload),
    Update(String, LessonPayload),
}

#[derive(Default)]
struct FakeStore {
    calls: Mutex<Vec<Call>>,
    fail_with: Option<ApiError>,
}

impl FakeStore {
    fn failing(error: ApiError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, id: &str, payload: &LessonPayload) -> Result<Lesson, ApiError> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        let stored = serde_json::json!({
            "_id": id,
            "title": payload.title,
            "description": payload.description,
            "topic": payload.topic,
            "order": payload.order,
            "contentGroups": payload.content_groups,
            "quiz": payload.quiz,
        });
        serde_json::from_value(stored).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl LessonStore for FakeStore {
    async fn lesson(&self, lesson_id: &str) -> Result<Lesson, ApiError> {
        Err(ApiError::Status {
            status: 404,
            message: format!("Lesson {lesson_id} not found"),
        })
    }

    async fn create_lesson(&self, payload: &LessonPayload) -> Result<Lesson, ApiError> {
        self.calls.lock().unwrap().push(Call::Create(payload.clone()));
        self.respond("new-lesson", payload)
    }

    async fn update_lesson(
        &self,
        lesson_id: &str,
        payload: &LessonPayload,
    ) -> Result<Lesson, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(lesson_id.to_string(), payload.clone()));
        self.respond(lesson_id, payload)
    }

    async fn lessons_for_topic(&self, _topic_id: &str) -> Result<Vec<Lesson>, ApiError> {
        Ok(Vec::new())
    }

    async fn delete_lesson(&self, lesson_id: &str) -> Result<(), ApiError> {
        Err(ApiError::Status {
            status: 404,
            message: format!("Lesson {lesson_id} not found"),
        })
    }
}

fn hello_editor() -> Editor {
    let mut editor = Editor::for_topic("topic-1");
    for cmd in [
        Cmd::SetTitle("Iterators".to_string()),
        Cmd::SetDescription("Adapters and consumers".to_string()),
        Cmd::AddGroup,
        Cmd::AddBlock { group: 0 },
        Cmd::UpdateBlock {
            group: 0,
            block: 0,
            field: BlockField::Content(BlockContent::plain("Hello")),
        },
        Cmd::AddQuestion,
    ] {
        editor.apply(cmd).unwrap();
    }
    editor
}

#[tokio::test]
async fn new_lesson_is_created() {
    let store = FakeStore::default();
    let mut editor = hello_editor();

    let saved = editor.submit(&store).await.unwrap();

    assert_eq!(saved.id, "new-lesson");
    assert_eq!(saved.content_groups[0].title, "New Group 1");
    assert!(matches!(editor.state(), EditorState::Submitted(_)));
    assert!(matches!(store.calls().as_slice(), [Call::Create(_)]));
    assert_eq!(editor.apply(Cmd::AddGroup), Err(EditError::Locked));
}

#[tokio::test]
async fn hydrated_lesson_is_updated() {
    let store = FakeStore::default();
    let mut first = hello_editor();
    let saved = first.submit(&store).await.unwrap();

    let mut editor = Editor::from_lesson(saved);
    editor.apply(Cmd::SetTitle("Iterators II".to_string())).unwrap();
    editor.submit(&store).await.unwrap();

    let calls = store.calls();
    let Call::Update(id, payload) = &calls[1] else {
        panic!("expected an update, got {:?}", calls[1]);
    };
    assert_eq!(id, "new-lesson");
    assert_eq!(payload.title, "Iterators II");
    assert_eq!(payload.quiz.len(), 1);
}

#[tokio::test]
async fn failed_save_keeps_draft_editable() {
    let store = FakeStore::failing(ApiError::Status {
        status: 400,
        message: "Topic does not exist".to_string(),
    });
    let mut editor = hello_editor();
    let before = editor.draft().clone();

    let result = editor.submit(&store).await;

    assert!(matches!(result, Err(SubmitError::Api(_))));
    assert_eq!(editor.state(), &EditorState::Clean);
    assert_eq!(editor.error(), Some("Topic does not exist"));
    assert_eq!(editor.draft(), &before);
    assert!(editor.apply(Cmd::AddGroup).unwrap().changed);
}

#[tokio::test]
async fn invalid_draft_never_reaches_store() {
    let store = FakeStore::default();
    let mut editor = Editor::new();

    let result = editor.submit(&store).await;

    assert!(matches!(result, Err(SubmitError::Validation(_))));
    assert!(store.calls().is_empty());
    assert_eq!(editor.state(), &EditorState::Clean);
}
