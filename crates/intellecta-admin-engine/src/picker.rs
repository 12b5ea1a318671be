use crate::api::TopicLookup;
use crate::models::{Course, Topic};

/// Course and topic choices for the lesson form.
///
/// Lookup failures land in `banner` and never touch the draft being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicPicker {
    courses: Vec<Course>,
    topics: Vec<Topic>,
    selected_course: Option<String>,
    banner: Option<String>,
}

impl TopicPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn selected_course(&self) -> Option<&str> {
        self.selected_course.as_deref()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn topic_title(&self, topic_id: &str) -> Option<&str> {
        self.topics
            .iter()
            .find(|t| t.id == topic_id)
            .map(|t| t.title.as_str())
    }

    pub fn course_title(&self, course_id: &str) -> Option<&str> {
        self.courses
            .iter()
            .find(|c| c.id == course_id)
            .map(|c| c.title.as_str())
    }

    /// Load the course list, and when a topic is already chosen, select its
    /// parent course and load that course's topics.
    pub async fn load<L>(&mut self, lookup: &L, preset_topic: Option<&str>)
    where
        L: TopicLookup + ?Sized,
    {
        match lookup.courses().await {
            Ok(courses) => self.courses = courses,
            Err(e) => {
                log::error!("failed to fetch courses: {e}");
                self.banner = Some("Failed to load courses. Please try again.".to_string());
                return;
            }
        }

        let Some(topic_id) = preset_topic.filter(|id| !id.is_empty()) else {
            return;
        };
        match lookup.topic(topic_id).await {
            Ok(topic) if !topic.course.is_empty() => {
                self.select_course(lookup, &topic.course).await;
            }
            Ok(_) => log::warn!("topic {topic_id} has no parent course"),
            Err(e) => log::warn!("failed to fetch course of topic {topic_id}: {e}"),
        }
    }

    /// Select a course and reload its topics
    pub async fn select_course<L>(&mut self, lookup: &L, course_id: &str)
    where
        L: TopicLookup + ?Sized,
    {
        self.selected_course = Some(course_id.to_string());
        match lookup.topics_for_course(course_id).await {
            Ok(topics) => self.topics = topics,
            Err(e) => {
                log::error!("failed to fetch topics for course {course_id}: {e}");
                self.topics.clear();
                self.banner = Some("Failed to load topics. Please try again.".to_string());
            }
        }
    }

    /// Pick the course after the selected one, wrapping around
    pub async fn cycle_course<L>(&mut self, lookup: &L)
    where
        L: TopicLookup + ?Sized,
    {
        if self.courses.is_empty() {
            return;
        }
        let next = match self
            .selected_course
            .as_deref()
            .and_then(|id| self.courses.iter().position(|c| c.id == id))
        {
            Some(index) => (index + 1) % self.courses.len(),
            None => 0,
        };
        let course_id = self.courses[next].id.clone();
        self.select_course(lookup, &course_id).await;
    }

    /// Topic following `current` in the loaded list, wrapping around
    pub fn next_topic(&self, current: &str) -> Option<&Topic> {
        if self.topics.is_empty() {
            return None;
        }
        let next = match self.topics.iter().position(|t| t.id == current) {
            Some(index) => (index + 1) % self.topics.len(),
            None => 0,
        };
        self.topics.get(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct FakeLookup {
        fail_courses: bool,
        fail_topics: bool,
    }

    fn course(id: &str) -> Course {
        Course {
            id: id.to_string(),
            title: format!("Course {id}"),
        }
    }

    fn topic(id: &str, course: &str) -> Topic {
        Topic {
            id: id.to_string(),
            title: format!("Topic {id}"),
            course: course.to_string(),
        }
    }

    #[async_trait]
    impl TopicLookup for FakeLookup {
        async fn courses(&self) -> Result<Vec<Course>, ApiError> {
            if self.fail_courses {
                return Err(ApiError::Connection("offline".to_string()));
            }
            Ok(vec![course("c1"), course("c2")])
        }

        async fn topics_for_course(&self, course_id: &str) -> Result<Vec<Topic>, ApiError> {
            if self.fail_topics {
                return Err(ApiError::Connection("offline".to_string()));
            }
            Ok(vec![topic("t1", course_id), topic("t2", course_id)])
        }

        async fn topic(&self, topic_id: &str) -> Result<Topic, ApiError> {
            Ok(topic(topic_id, "c2"))
        }
    }

    #[tokio::test]
    async fn test_load_resolves_preset_topic_course() {
        let mut picker = TopicPicker::new();
        picker.load(&FakeLookup::default(), Some("t9")).await;

        assert_eq!(picker.courses().len(), 2);
        assert_eq!(picker.selected_course(), Some("c2"));
        assert_eq!(picker.topics().len(), 2);
        assert_eq!(picker.banner(), None);
    }

    #[tokio::test]
    async fn test_load_without_preset_leaves_course_unselected() {
        let mut picker = TopicPicker::new();
        picker.load(&FakeLookup::default(), None).await;

        assert_eq!(picker.selected_course(), None);
        assert!(picker.topics().is_empty());
    }

    #[tokio::test]
    async fn test_course_failure_sets_banner() {
        let lookup = FakeLookup {
            fail_courses: true,
            ..FakeLookup::default()
        };
        let mut picker = TopicPicker::new();
        picker.load(&lookup, Some("t1")).await;

        assert_eq!(
            picker.banner(),
            Some("Failed to load courses. Please try again.")
        );
        assert_eq!(picker.selected_course(), None);
    }

    #[tokio::test]
    async fn test_topic_failure_sets_banner() {
        let lookup = FakeLookup {
            fail_topics: true,
            ..FakeLookup::default()
        };
        let mut picker = TopicPicker::new();
        picker.load(&lookup, None).await;
        picker.select_course(&lookup, "c1").await;

        assert_eq!(picker.banner(), Some("Failed to load topics. Please try again."));
        assert!(picker.topics().is_empty());

        picker.dismiss_banner();
        assert_eq!(picker.banner(), None);
    }

    #[tokio::test]
    async fn test_cycling() {
        let lookup = FakeLookup::default();
        let mut picker = TopicPicker::new();
        picker.load(&lookup, None).await;

        picker.cycle_course(&lookup).await;
        assert_eq!(picker.selected_course(), Some("c1"));
        picker.cycle_course(&lookup).await;
        assert_eq!(picker.selected_course(), Some("c2"));
        picker.cycle_course(&lookup).await;
        assert_eq!(picker.selected_course(), Some("c1"));

        assert_eq!(picker.next_topic("").map(|t| t.id.as_str()), Some("t1"));
        assert_eq!(picker.next_topic("t1").map(|t| t.id.as_str()), Some("t2"));
        assert_eq!(picker.next_topic("t2").map(|t| t.id.as_str()), Some("t1"));
        assert_eq!(picker.topic_title("t2"), Some("Topic t2"));
        assert_eq!(picker.course_title("c1"), Some("Course c1"));
    }
}
