use serde::{Deserialize, Deserializer, Serialize};

use crate::editing::reindex::{Ordered, reindex};
use crate::models::records::{Lesson, StoredQuestion};

/// Every quiz question has exactly this many answer options
pub const OPTION_COUNT: usize = 4;

/// Media type of a single content block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentType {
    #[default]
    Text,
    Image,
    Code,
    Latex,
    Link,
    Video,
    YoutubeUrl,
}

impl ContentType {
    pub const ALL: [ContentType; 7] = [
        ContentType::Text,
        ContentType::Image,
        ContentType::Code,
        ContentType::Latex,
        ContentType::Link,
        ContentType::Video,
        ContentType::YoutubeUrl,
    ];

    /// Human readable name used by front-ends
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Text => "Text",
            ContentType::Image => "Image",
            ContentType::Code => "Code",
            ContentType::Latex => "LaTeX",
            ContentType::Link => "Link",
            ContentType::Video => "Video",
            ContentType::YoutubeUrl => "YouTube URL",
        }
    }

    /// Empty content of the shape this type expects
    pub fn empty_content(self) -> BlockContent {
        match self {
            ContentType::Link => BlockContent::Link {
                url: String::new(),
                text: String::new(),
            },
            _ => BlockContent::Plain(String::new()),
        }
    }

    /// Whether `content` has a shape this type can carry.
    ///
    /// Plain strings are valid for every type; the `{url, text}` shape only for links.
    pub fn accepts(self, content: &BlockContent) -> bool {
        match content {
            BlockContent::Plain(_) => true,
            BlockContent::Link { .. } => self == ContentType::Link,
        }
    }

    /// The next type in [`ContentType::ALL`], wrapping around
    pub fn next(self) -> ContentType {
        let index = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Payload of a content block: a bare string, or a link object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockContent {
    Plain(String),
    Link {
        #[serde(default)]
        url: String,
        #[serde(default)]
        text: String,
    },
}

impl Default for BlockContent {
    fn default() -> Self {
        BlockContent::Plain(String::new())
    }
}

impl BlockContent {
    pub fn plain(text: impl Into<String>) -> Self {
        BlockContent::Plain(text.into())
    }

    pub fn link(url: impl Into<String>, text: impl Into<String>) -> Self {
        BlockContent::Link {
            url: url.into(),
            text: text.into(),
        }
    }

    /// Single-line preview for list views
    pub fn preview(&self) -> String {
        match self {
            BlockContent::Plain(text) => text.lines().next().unwrap_or_default().to_string(),
            BlockContent::Link { url, text } if text.is_empty() => url.clone(),
            BlockContent::Link { url, text } => format!("{text} <{url}>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub kind: ContentType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: BlockContent,
    #[serde(default)]
    pub order: usize,
}

impl ContentBlock {
    pub fn new(kind: ContentType, order: usize) -> Self {
        Self {
            kind,
            content: kind.empty_content(),
            order,
        }
    }
}

/// A titled section of a lesson holding ordered content blocks
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub order: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contents: Vec<ContentBlock>,
}

impl ContentGroup {
    /// Fresh group for position `order`, titled after its 1-based position
    pub fn new(order: usize) -> Self {
        Self {
            title: format!("New Group {}", order + 1),
            description: None,
            order,
            contents: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: [String; OPTION_COUNT],
    #[serde(default)]
    pub correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl From<StoredQuestion> for QuizQuestion {
    fn from(stored: StoredQuestion) -> Self {
        if stored.options.len() != OPTION_COUNT {
            log::warn!(
                "quiz question {:?} has {} options, normalising to {OPTION_COUNT}",
                stored.question,
                stored.options.len()
            );
        }
        let mut options: [String; OPTION_COUNT] = Default::default();
        for (slot, option) in options.iter_mut().zip(stored.options) {
            *slot = option;
        }

        let correct_answer = match stored.correct_answer {
            Some(answer) if answer < OPTION_COUNT => answer,
            Some(answer) => {
                log::warn!("correct answer {answer} out of range, resetting to 0");
                0
            }
            None => 0,
        };

        Self {
            question: stored.question,
            options,
            correct_answer,
            explanation: stored.explanation.filter(|e| !e.is_empty()),
        }
    }
}

/// In-memory, not yet persisted lesson being created or edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonDraft {
    pub title: String,
    pub description: String,
    pub topic: String,
    /// Kept as typed by the user; coerced to a number when the payload is built
    pub order: String,
    pub content_groups: Vec<ContentGroup>,
    pub quiz: Vec<QuizQuestion>,
}

impl Default for LessonDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            topic: String::new(),
            order: "0".to_string(),
            content_groups: Vec::new(),
            quiz: Vec::new(),
        }
    }
}

impl LessonDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty draft that will be created under `topic`
    pub fn for_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn block_count(&self) -> usize {
        self.content_groups.iter().map(|g| g.contents.len()).sum()
    }
}

impl From<Lesson> for LessonDraft {
    /// Hydrate a draft from a stored lesson, trusting list position over stored `order`
    fn from(lesson: Lesson) -> Self {
        let mut groups = lesson.content_groups;
        sort_by_order(&mut groups);
        for group in &mut groups {
            sort_by_order(&mut group.contents);
            group.description = group.description.take().filter(|d| !d.is_empty());
        }

        Self {
            title: lesson.title,
            description: lesson.description,
            topic: lesson.topic,
            order: lesson.order.to_string(),
            content_groups: groups,
            quiz: lesson.quiz.into_iter().map(QuizQuestion::from).collect(),
        }
    }
}

/// Stored records sometimes carry `null` where a value is expected
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn sort_by_order<T: Ordered>(items: &mut Vec<T>) {
    items.sort_by_key(|item| item.order());
    reindex(items);
}
