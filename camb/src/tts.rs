//! Text-to-speech service.

use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{
    error::Result,
    http::HttpClient,
    task::{submit_json, AudioBackend, AudioFile, PollOptions, Task},
    types::{Gender, TaskKind},
    validate,
};

/// A text-to-speech task handle.
pub type TtsTask = Task<AudioBackend>;

/// Text-to-speech service.
///
/// Results are streamed into `<output_dir>/tts_stream_<run_id>.wav`.
pub struct TtsService {
    http: Arc<HttpClient>,
    output_dir: PathBuf,
}

impl TtsService {
    pub(crate) fn new(http: Arc<HttpClient>, output_dir: PathBuf) -> Self {
        Self { http, output_dir }
    }

    /// Overrides the directory audio is written to.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Submits a text-to-speech task.
    pub async fn create(&self, request: &TtsRequest) -> Result<TtsTask> {
        request.validate()?;
        let task_id = submit_json(&self.http, TaskKind::Tts, request).await?;
        Ok(self.task(task_id))
    }

    /// Returns a handle to an already submitted task.
    pub fn task(&self, task_id: impl Into<String>) -> TtsTask {
        Task::new(
            task_id,
            AudioBackend::new(self.http.clone(), TaskKind::Tts, self.output_dir.clone()),
        )
    }

    /// Synthesizes speech and writes the audio to the output directory.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let audio = client.speech().synthesize(&TtsRequest {
    ///     text: "Hello, World!".to_string(),
    ///     voice_id: 8612,
    ///     language: 1,
    ///     gender: Gender::Male,
    ///     age: Some(25),
    /// }, &PollOptions::default()).await?;
    ///
    /// println!("{} bytes written to {}", audio.bytes, audio.path.display());
    /// ```
    pub async fn synthesize(&self, request: &TtsRequest, opts: &PollOptions) -> Result<AudioFile> {
        self.create(request).await?.wait(opts).await
    }
}

/// Request for text-to-speech.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TtsRequest {
    /// Text to speak.
    pub text: String,

    /// Voice to speak with, see [`VoiceService::list`](crate::VoiceService::list).
    pub voice_id: i64,

    /// Language of the text.
    pub language: u32,

    /// Gender of the voice.
    #[serde(default)]
    pub gender: Gender,

    /// Apparent age of the voice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl TtsRequest {
    /// Checks the request without contacting the API.
    pub fn validate(&self) -> Result<()> {
        validate::non_empty("text", &self.text)?;
        validate::language("language", self.language)
    }
}
