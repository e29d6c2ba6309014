//! End-to-end dubbing service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    error::Result,
    http::HttpClient,
    task::{submit_json, JsonBackend, PollOptions, Task},
    types::TaskKind,
    validate,
};

/// A dubbing task handle.
pub type DubbingTask = Task<JsonBackend<DubbedRunInfo>>;

/// End-to-end dubbing service.
pub struct DubbingService {
    http: Arc<HttpClient>,
}

impl DubbingService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Submits a video for dubbing.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let task = client.dubbing().create(&DubbingRequest {
    ///     video_url: "https://example.com/video.mp4".to_string(),
    ///     target_language: 76,
    ///     ..Default::default()
    /// }).await?;
    ///
    /// println!("task id: {}", task.id());
    /// ```
    pub async fn create(&self, request: &DubbingRequest) -> Result<DubbingTask> {
        request.validate()?;
        let task_id = submit_json(&self.http, TaskKind::Dubbing, request).await?;
        Ok(self.task(task_id))
    }

    /// Returns a handle to an already submitted dubbing task.
    pub fn task(&self, task_id: impl Into<String>) -> DubbingTask {
        Task::new(task_id, JsonBackend::new(self.http.clone(), TaskKind::Dubbing))
    }

    /// Submits a video, waits for dubbing to finish and returns the run info.
    pub async fn dub(&self, request: &DubbingRequest, opts: &PollOptions) -> Result<DubbedRunInfo> {
        self.create(request).await?.wait(opts).await
    }
}

// ==================== Request/Response Types ====================

/// Request for end-to-end dubbing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DubbingRequest {
    /// Public URL of the video to dub.
    pub video_url: String,

    /// Language spoken in the video. Defaults to 1, English (US).
    #[serde(default = "default_source_language")]
    pub source_language: u32,

    /// Language to dub into.
    pub target_language: u32,
}

fn default_source_language() -> u32 {
    1
}

impl Default for DubbingRequest {
    fn default() -> Self {
        Self {
            video_url: String::new(),
            source_language: default_source_language(),
            target_language: 0,
        }
    }
}

impl DubbingRequest {
    /// Checks the request without contacting the API.
    pub fn validate(&self) -> Result<()> {
        validate::non_empty("video_url", &self.video_url)?;
        validate::language("source_language", self.source_language)?;
        validate::language("target_language", self.target_language)
    }
}

/// Result of a dubbing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DubbedRunInfo {
    /// URL of the dubbed video.
    #[serde(default)]
    pub video_url: String,

    /// URL of the dubbed audio track.
    #[serde(default)]
    pub audio_url: String,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::testutil::{self, authorized, Counter};

    fn opts() -> PollOptions {
        PollOptions::new().interval(Duration::from_millis(10))
    }

    fn request() -> DubbingRequest {
        DubbingRequest {
            video_url: "https://example.com/video.mp4".to_string(),
            source_language: 1,
            target_language: 76,
        }
    }

    #[tokio::test]
    async fn test_dub_polls_until_success_then_fetches_run_info() {
        let submits = Counter::default();
        let polls = Counter::default();
        let fetches = Counter::default();

        let router = Router::new()
            .route(
                "/end_to_end_dubbing",
                post({
                    let submits = submits.clone();
                    move |headers: HeaderMap, Json(body): Json<Value>| async move {
                        authorized(&headers)?;
                        submits.hit();
                        assert_eq!(body["video_url"], "https://example.com/video.mp4");
                        assert_eq!(body["target_language"], 76);
                        Ok::<_, (StatusCode, &'static str)>(Json(json!({ "task_id": "dub-1" })))
                    }
                }),
            )
            .route(
                "/end_to_end_dubbing/{task_id}",
                get({
                    let polls = polls.clone();
                    move |headers: HeaderMap, Path(task_id): Path<String>| async move {
                        authorized(&headers)?;
                        assert_eq!(task_id, "dub-1");
                        let body = if polls.hit() < 2 {
                            json!({ "status": "PENDING", "run_id": null })
                        } else {
                            json!({ "status": "SUCCESS", "run_id": 42 })
                        };
                        Ok::<_, (StatusCode, &'static str)>(Json(body))
                    }
                }),
            )
            .route(
                "/dubbed_run_info/{run_id}",
                get({
                    let fetches = fetches.clone();
                    move |Path(run_id): Path<i64>| async move {
                        fetches.hit();
                        Json(json!({
                            "video_url": format!("https://cdn.example.com/{run_id}.mp4"),
                            "audio_url": "https://cdn.example.com/audio.mp3",
                        }))
                    }
                }),
            );

        let base_url = testutil::serve(router).await;
        let dir = tempfile::tempdir().unwrap();
        let client = testutil::client(&base_url, dir.path());

        let info = client.dub(&request(), &opts()).await.unwrap();

        assert_eq!(info.video_url, "https://cdn.example.com/42.mp4");
        assert_eq!(info.audio_url, "https://cdn.example.com/audio.mp3");
        assert_eq!(submits.get(), 1);
        assert_eq!(polls.get(), 3);
        assert_eq!(fetches.get(), 1);
    }

    #[tokio::test]
    async fn test_rejected_submission_never_polls() {
        let polls = Counter::default();

        let router = Router::new()
            .route(
                "/end_to_end_dubbing",
                post(|| async { (StatusCode::PAYMENT_REQUIRED, "insufficient credits") }),
            )
            .route(
                "/end_to_end_dubbing/{task_id}",
                get({
                    let polls = polls.clone();
                    move || async move {
                        polls.hit();
                        Json(json!({ "status": "PENDING" }))
                    }
                }),
            );

        let base_url = testutil::serve(router).await;
        let dir = tempfile::tempdir().unwrap();
        let client = testutil::client(&base_url, dir.path());

        let err = client.dub(&request(), &opts()).await.unwrap_err();

        match err {
            crate::Error::Api { http_status, body } => {
                assert_eq!(http_status, 402);
                assert_eq!(body, "insufficient credits");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(polls.get(), 0);
    }

    #[tokio::test]
    async fn test_invalid_language_fails_before_network() {
        let submits = Counter::default();

        let router = Router::new().route(
            "/end_to_end_dubbing",
            post({
                let submits = submits.clone();
                move || async move {
                    submits.hit();
                    Json(json!({ "task_id": "never" }))
                }
            }),
        );

        let base_url = testutil::serve(router).await;
        let dir = tempfile::tempdir().unwrap();
        let client = testutil::client(&base_url, dir.path());

        for (source, target) in [(0, 76), (1, 149), (200, 1)] {
            let req = DubbingRequest {
                source_language: source,
                target_language: target,
                ..request()
            };
            let err = client.dubbing().create(&req).await.err().unwrap();
            assert!(err.is_validation(), "unexpected error: {err}");
        }
        assert_eq!(submits.get(), 0);
    }

    #[tokio::test]
    async fn test_task_failure_reports_status() {
        let router = Router::new()
            .route(
                "/end_to_end_dubbing",
                post(|| async { Json(json!({ "task_id": "dub-9" })) }),
            )
            .route(
                "/end_to_end_dubbing/{task_id}",
                get(|| async { Json(json!({ "status": "TIMEOUT", "run_id": 3 })) }),
            );

        let base_url = testutil::serve(router).await;
        let dir = tempfile::tempdir().unwrap();
        let client = testutil::client(&base_url, dir.path());

        let err = client.dub(&request(), &opts()).await.unwrap_err();

        assert!(err.is_task_timeout());
        let msg = err.to_string();
        assert!(msg.contains("dub-9") && msg.contains("run_id=3"), "{msg}");
    }

    #[test]
    fn test_request_defaults_source_language() {
        let req: DubbingRequest = serde_json::from_str(
            r#"{"video_url": "https://example.com/v.mp4", "target_language": 3}"#,
        )
        .unwrap();
        assert_eq!(req.source_language, 1);
        assert!(req.validate().is_ok());
    }
}
