pub mod lesson;
pub mod records;

pub use lesson::{
    BlockContent, ContentBlock, ContentGroup, ContentType, LessonDraft, OPTION_COUNT, QuizQuestion,
};
pub use records::{Course, Lesson, StoredQuestion, Topic};
