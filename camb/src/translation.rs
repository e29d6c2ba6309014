//! Text translation and translated speech services.

use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{
    error::{Error, Result},
    http::HttpClient,
    task::{submit_json, AudioBackend, AudioFile, JsonBackend, PollOptions, Task},
    types::{Formality, Gender, TaskKind},
    validate,
};

/// A translation task handle.
pub type TranslationTask = Task<JsonBackend<TranslationResult>>;

/// A translated text-to-speech task handle.
pub type TranslatedTtsTask = Task<AudioBackend>;

/// Text translation service.
pub struct TranslationService {
    http: Arc<HttpClient>,
}

impl TranslationService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Submits a batch of texts for translation.
    pub async fn create(&self, request: &TranslationRequest) -> Result<TranslationTask> {
        request.validate()?;
        let task_id = submit_json(&self.http, TaskKind::Translation, request).await?;
        Ok(self.task(task_id))
    }

    /// Returns a handle to an already submitted task.
    pub fn task(&self, task_id: impl Into<String>) -> TranslationTask {
        Task::new(
            task_id,
            JsonBackend::new(self.http.clone(), TaskKind::Translation),
        )
    }

    /// Translates a batch of texts.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = client.translation().translate(&TranslationRequest {
    ///     source_language: 1,
    ///     target_language: 76,
    ///     texts: vec!["Good morning".to_string()],
    ///     formality: Some(Formality::Formal),
    ///     ..Default::default()
    /// }, &PollOptions::default()).await?;
    ///
    /// for text in &result.texts {
    ///     println!("{}", text);
    /// }
    /// ```
    pub async fn translate(
        &self,
        request: &TranslationRequest,
        opts: &PollOptions,
    ) -> Result<TranslationResult> {
        self.create(request).await?.wait(opts).await
    }
}

/// Translate-then-speak service.
pub struct TranslatedTtsService {
    http: Arc<HttpClient>,
    output_dir: PathBuf,
}

impl TranslatedTtsService {
    pub(crate) fn new(http: Arc<HttpClient>, output_dir: PathBuf) -> Self {
        Self { http, output_dir }
    }

    /// Overrides the directory audio is written to.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Submits a translated text-to-speech task.
    pub async fn create(&self, request: &TranslatedTtsRequest) -> Result<TranslatedTtsTask> {
        request.validate()?;
        let task_id = submit_json(&self.http, TaskKind::TranslatedTts, request).await?;
        Ok(self.task(task_id))
    }

    /// Returns a handle to an already submitted task.
    pub fn task(&self, task_id: impl Into<String>) -> TranslatedTtsTask {
        Task::new(
            task_id,
            AudioBackend::new(
                self.http.clone(),
                TaskKind::TranslatedTts,
                self.output_dir.clone(),
            ),
        )
    }

    /// Translates a text, speaks the translation and writes the audio to disk.
    pub async fn synthesize(
        &self,
        request: &TranslatedTtsRequest,
        opts: &PollOptions,
    ) -> Result<AudioFile> {
        self.create(request).await?.wait(opts).await
    }
}

// ==================== Request/Response Types ====================

/// Request for text translation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Language of the input texts.
    pub source_language: u32,

    /// Language to translate into.
    pub target_language: u32,

    /// Texts to translate.
    pub texts: Vec<String>,

    /// Register of the translation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formality: Option<Formality>,

    /// Gender of the addressee, for gendered languages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Age of the addressee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl TranslationRequest {
    /// Checks the request without contacting the API.
    pub fn validate(&self) -> Result<()> {
        validate::language("source_language", self.source_language)?;
        validate::language("target_language", self.target_language)?;
        if self.texts.is_empty() {
            return Err(Error::validation("texts", "at least one text is required"));
        }
        self.texts
            .iter()
            .try_for_each(|text| validate::non_empty("texts", text))
    }
}

/// Result of a translation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Translated texts, in input order.
    #[serde(default)]
    pub texts: Vec<String>,
}

/// Request for translated text-to-speech.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslatedTtsRequest {
    /// Text to translate and speak.
    pub text: String,

    /// Voice to speak with.
    pub voice_id: i64,

    /// Language of the input text.
    pub source_language: u32,

    /// Language to translate into and speak.
    pub target_language: u32,

    /// Register of the translation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formality: Option<Formality>,

    /// Gender of the voice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Apparent age of the voice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl TranslatedTtsRequest {
    /// Checks the request without contacting the API.
    pub fn validate(&self) -> Result<()> {
        validate::non_empty("text", &self.text)?;
        validate::language("source_language", self.source_language)?;
        validate::language("target_language", self.target_language)
    }
}
