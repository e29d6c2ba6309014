//! Transcription service.

use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{
    error::Result,
    http::{FilePart, HttpClient},
    task::{submit_multipart, JsonBackend, PollOptions, Task},
    types::TaskKind,
    validate,
};

/// A transcription task handle.
pub type TranscriptionTask = Task<JsonBackend<Transcript>>;

/// A transcript, one entry per spoken segment.
pub type Transcript = Vec<TranscriptSegment>;

/// Transcription service.
pub struct TranscriptionService {
    http: Arc<HttpClient>,
}

impl TranscriptionService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Uploads a media file for transcription.
    pub async fn create(&self, request: &TranscriptionRequest) -> Result<TranscriptionTask> {
        request.validate().await?;

        let data = tokio::fs::read(&request.media_file).await?;
        let filename = request
            .media_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());

        let task_id = submit_multipart(
            &self.http,
            TaskKind::Transcription,
            FilePart {
                field: "file",
                filename,
                data,
            },
            vec![("language", request.language.to_string())],
        )
        .await?;

        Ok(self.task(task_id))
    }

    /// Returns a handle to an already submitted task.
    pub fn task(&self, task_id: impl Into<String>) -> TranscriptionTask {
        Task::new(
            task_id,
            JsonBackend::new(self.http.clone(), TaskKind::Transcription),
        )
    }

    /// Transcribes a media file and returns its segments.
    pub async fn transcribe(
        &self,
        request: &TranscriptionRequest,
        opts: &PollOptions,
    ) -> Result<Transcript> {
        self.create(request).await?.wait(opts).await
    }
}

/// Request for transcription.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptionRequest {
    /// Language spoken in the media.
    pub language: u32,

    /// Local audio or video file to upload.
    pub media_file: PathBuf,
}

impl TranscriptionRequest {
    /// Checks the request without contacting the API.
    pub async fn validate(&self) -> Result<()> {
        validate::language("language", self.language)?;
        validate::media_file(
            "media_file",
            &self.media_file,
            validate::TRANSCRIPTION_EXTENSIONS,
        )
        .await
    }
}

/// One transcribed segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    #[serde(default)]
    pub start: f64,

    /// End time in seconds.
    #[serde(default)]
    pub end: f64,

    /// Spoken text.
    #[serde(default)]
    pub text: String,

    /// Speaker label.
    #[serde(default)]
    pub speaker: String,
}
