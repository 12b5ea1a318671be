//! HTTP implementation of the engine's [`LessonStore`] and [`TopicLookup`].
//!
//! Every call sends `Authorization: Bearer <token>` and JSON bodies. Non-2xx
//! responses surface the body's `message` field when there is one.

use std::time::Duration;

use async_trait::async_trait;
use intellecta_admin_engine::{
    ApiError, Course, Lesson, LessonPayload, LessonStore, Topic, TopicLookup,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Deserialize)]
struct CoursesEnvelope {
    #[serde(default)]
    courses: Vec<Course>,
}

#[derive(Deserialize)]
struct TopicEnvelope {
    topic: Topic,
}

/// Lesson endpoints answer either with the lesson itself or wrapped in `{lesson}`
#[derive(Deserialize)]
#[serde(untagged)]
enum LessonEnvelope {
    Wrapped { lesson: Lesson },
    Bare(Lesson),
}

impl From<LessonEnvelope> for Lesson {
    fn from(envelope: LessonEnvelope) -> Self {
        match envelope {
            LessonEnvelope::Wrapped { lesson } | LessonEnvelope::Bare(lesson) => lesson,
        }
    }
}

/// `GET /courses/lessons/{topic}` wraps its list in `{lessons}`
#[derive(Deserialize)]
struct LessonsEnvelope {
    #[serde(default)]
    lessons: Vec<Lesson>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the Intellecta REST API.
pub struct RestClient {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl RestClient {
    /// Create a client; calls fail with [`ApiError::MissingToken`] when `token` is `None`.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url: String = base_url.into();
        let base = Url::parse(base_url.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ApiError::Connection(format!("Invalid API URL {base_url}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ApiError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Endpoint under the base URL; each segment is percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Connection(format!("Invalid API URL {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
        let url = self.url(segments)?;
        log::debug!("{method} {}", url.path());
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// Send a request and return the body of a 2xx response
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let error = status_error(status, &body);
            log::warn!("API request failed with {status}: {error}");
            return Err(error);
        }
        Ok(body.to_vec())
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, segments)?).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &LessonPayload,
    ) -> Result<T, ApiError> {
        self.execute(self.request(method, segments)?.json(body)).await
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_connect() {
            ApiError::Connection(format!("Cannot connect to {}", self.base_url()))
        } else if error.is_timeout() {
            ApiError::Connection("Request timed out".to_string())
        } else {
            ApiError::Connection(error.to_string())
        }
    }
}

/// Error for a non-2xx response: the body's `message`, else `Error: <code> <reason>`
pub fn status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            format!(
                "Error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )
            .trim_end()
            .to_string()
        });

    if status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized(message)
    } else {
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl TopicLookup for RestClient {
    async fn courses(&self) -> Result<Vec<Course>, ApiError> {
        let envelope: CoursesEnvelope = self.get(&["courses"]).await?;
        Ok(envelope.courses)
    }

    async fn topics_for_course(&self, course_id: &str) -> Result<Vec<Topic>, ApiError> {
        self.get(&["courses", course_id, "topics"]).await
    }

    async fn topic(&self, topic_id: &str) -> Result<Topic, ApiError> {
        let envelope: TopicEnvelope = self.get(&["courses", "topics", topic_id]).await?;
        Ok(envelope.topic)
    }
}

#[async_trait]
impl LessonStore for RestClient {
    async fn lesson(&self, lesson_id: &str) -> Result<Lesson, ApiError> {
        let envelope: LessonEnvelope = self.get(&["courses", "lesson", lesson_id]).await?;
        Ok(envelope.into())
    }

    async fn create_lesson(&self, payload: &LessonPayload) -> Result<Lesson, ApiError> {
        let segments = ["courses", "topics", payload.topic.as_str(), "lessons"];
        let envelope: LessonEnvelope = self.send_json(Method::POST, &segments, payload).await?;
        Ok(envelope.into())
    }

    async fn update_lesson(
        &self,
        lesson_id: &str,
        payload: &LessonPayload,
    ) -> Result<Lesson, ApiError> {
        let segments = ["courses", "lessons", lesson_id];
        let envelope: LessonEnvelope = self.send_json(Method::PUT, &segments, payload).await?;
        Ok(envelope.into())
    }

    async fn lessons_for_topic(&self, topic_id: &str) -> Result<Vec<Lesson>, ApiError> {
        let envelope: LessonsEnvelope = self.get(&["courses", "lessons", topic_id]).await?;
        Ok(envelope.lessons)
    }

    async fn delete_lesson(&self, lesson_id: &str) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &["courses", "lessons", lesson_id])?;
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, br#"{"message":"Title is required"}"#.as_slice(),
        ApiError::Status { status: 400, message: "Title is required".to_string() })]
    #[case(StatusCode::NOT_FOUND, b"not json".as_slice(),
        ApiError::Status { status: 404, message: "Error: 404 Not Found".to_string() })]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, br#"{"message":""}"#.as_slice(),
        ApiError::Status { status: 500, message: "Error: 500 Internal Server Error".to_string() })]
    #[case(StatusCode::UNAUTHORIZED, br#"{"message":"Token expired"}"#.as_slice(),
        ApiError::Unauthorized("Token expired".to_string()))]
    fn test_status_error(#[case] status: StatusCode, #[case] body: &[u8], #[case] expected: ApiError) {
        assert_eq!(status_error(status, body), expected);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = RestClient::new("http://localhost:5000/api/v1/", None, Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            client.url(&["courses"]).unwrap().as_str(),
            "http://localhost:5000/api/v1/courses"
        );
        assert_eq!(client.base_url(), "http://localhost:5000/api/v1");
    }

    #[test]
    fn test_ids_are_percent_encoded() {
        let client =
            RestClient::new("http://localhost:5000/api/v1", None, Duration::from_secs(1)).unwrap();
        let url = client.url(&["courses", "lesson", "a/b?c#d"]).unwrap();
        assert_eq!(url.path(), "/api/v1/courses/lesson/a%2Fb%3Fc%23d");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_host_only_base() {
        let client = RestClient::new("http://127.0.0.1:9", None, Duration::from_secs(1)).unwrap();
        assert_eq!(client.url(&["courses"]).unwrap().as_str(), "http://127.0.0.1:9/courses");
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:admin@example.com")]
    fn test_invalid_base_url_rejected(#[case] base_url: &str) {
        assert!(matches!(
            RestClient::new(base_url, None, Duration::from_secs(1)),
            Err(ApiError::Connection(_))
        ));
    }

    #[test]
    fn test_lesson_envelope_accepts_both_shapes() {
        let bare: LessonEnvelope = serde_json::from_str(r#"{"_id":"l1","title":"A"}"#).unwrap();
        let wrapped: LessonEnvelope =
            serde_json::from_str(r#"{"lesson":{"_id":"l2","title":"B"}}"#).unwrap();

        assert_eq!(Lesson::from(bare).id, "l1");
        assert_eq!(Lesson::from(wrapped).id, "l2");
    }
}
