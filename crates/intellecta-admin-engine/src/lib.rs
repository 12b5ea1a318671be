pub mod api;
pub mod editing;
pub mod models;
pub mod payload;
pub mod picker;

// Re-export key types for easier usage
pub use api::{ApiError, LessonStore, TopicLookup};
pub use editing::{Cmd, Direction, EditError, Editor, EditorState, Patch, reduce};
pub use models::*;
pub use payload::{LessonPayload, ValidationError, build_payload};
pub use picker::TopicPicker;
