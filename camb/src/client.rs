//! CAMB.AI API client.

use std::{path::PathBuf, sync::Arc, time::Duration};

use super::{
    dubbing::{DubbedRunInfo, DubbingRequest, DubbingService},
    error::{Error, Result},
    http::HttpClient,
    language::LanguageService,
    task::{AudioFile, PollOptions, DEFAULT_AUDIO_DIR},
    transcription::{Transcript, TranscriptionRequest, TranscriptionService},
    translation::{
        TranslatedTtsRequest, TranslatedTtsService, TranslationRequest, TranslationResult,
        TranslationService,
    },
    tts::{TtsRequest, TtsService},
    voice::VoiceService,
};

/// Default CAMB.AI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://client.camb.ai/apis";

/// Environment variable the API key is read from when none is given.
pub const API_KEY_ENV: &str = "CAMB_API_KEY";

/// Default timeout of a single HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// CAMB.AI API client.
///
/// The client provides access to all CAMB.AI services. It holds one HTTP
/// connection pool shared by every service it hands out.
///
/// # Example
///
/// ```rust,ignore
/// use camb::{Client, DubbingRequest, PollOptions};
///
/// let client = Client::from_env()?;
///
/// let info = client
///     .dub(
///         &DubbingRequest {
///             video_url: "https://example.com/video.mp4".to_string(),
///             source_language: 1,
///             target_language: 76,
///         },
///         &PollOptions::default(),
///     )
///     .await?;
/// println!("{}", info.video_url);
/// ```
pub struct Client {
    http: Arc<HttpClient>,
    config: ClientConfig,
}

/// Client configuration.
#[derive(Clone)]
struct ClientConfig {
    api_key: String,
    base_url: String,
    output_dir: PathBuf,
}

impl Client {
    /// Creates a new client with an explicit API key.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use camb::Client;
    ///
    /// let client = Client::new("your-api-key")?;
    /// ```
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).build()
    }

    /// Creates a new client, reading the API key from `CAMB_API_KEY`.
    pub fn from_env() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Creates a new client builder for more configuration options.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the configured API key.
    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the directory synthesized audio is written to.
    pub fn output_dir(&self) -> &std::path::Path {
        &self.config.output_dir
    }

    /// Returns the language listing service.
    pub fn languages(&self) -> LanguageService {
        LanguageService::new(self.http.clone())
    }

    /// Returns the voice management service.
    pub fn voices(&self) -> VoiceService {
        VoiceService::new(self.http.clone())
    }

    /// Returns the end-to-end dubbing service.
    pub fn dubbing(&self) -> DubbingService {
        DubbingService::new(self.http.clone())
    }

    /// Returns the text-to-speech service.
    pub fn speech(&self) -> TtsService {
        TtsService::new(self.http.clone(), self.config.output_dir.clone())
    }

    /// Returns the transcription service.
    pub fn transcription(&self) -> TranscriptionService {
        TranscriptionService::new(self.http.clone())
    }

    /// Returns the text translation service.
    pub fn translation(&self) -> TranslationService {
        TranslationService::new(self.http.clone())
    }

    /// Returns the translate-then-speak service.
    pub fn translated_speech(&self) -> TranslatedTtsService {
        TranslatedTtsService::new(self.http.clone(), self.config.output_dir.clone())
    }

    /// Dubs a video and returns the URLs of the dubbed media.
    pub async fn dub(&self, request: &DubbingRequest, opts: &PollOptions) -> Result<DubbedRunInfo> {
        self.dubbing().dub(request, opts).await
    }

    /// Synthesizes speech and writes it to the output directory.
    pub async fn tts(&self, request: &TtsRequest, opts: &PollOptions) -> Result<AudioFile> {
        self.speech().synthesize(request, opts).await
    }

    /// Transcribes a local audio or video file.
    pub async fn transcribe(
        &self,
        request: &TranscriptionRequest,
        opts: &PollOptions,
    ) -> Result<Transcript> {
        self.transcription().transcribe(request, opts).await
    }

    /// Translates a batch of texts.
    pub async fn translate(
        &self,
        request: &TranslationRequest,
        opts: &PollOptions,
    ) -> Result<TranslationResult> {
        self.translation().translate(request, opts).await
    }

    /// Translates a text and synthesizes the translation.
    pub async fn translated_tts(
        &self,
        request: &TranslatedTtsRequest,
        opts: &PollOptions,
    ) -> Result<AudioFile> {
        self.translated_speech().synthesize(request, opts).await
    }
}

/// Builder for creating a CAMB.AI API client.
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
    output_dir: PathBuf,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            output_dir: PathBuf::from(DEFAULT_AUDIO_DIR),
        }
    }

    /// Sets the API key. Without it, `CAMB_API_KEY` is used.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets a custom base URL for the API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the timeout of a single HTTP request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the directory synthesized audio is written to.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        let api_key = resolve_api_key(self.api_key, std::env::var(API_KEY_ENV).ok())?;

        let http = HttpClient::new(self.base_url.clone(), &api_key, self.timeout)?;

        Ok(Client {
            http: Arc::new(http),
            config: ClientConfig {
                api_key,
                base_url: self.base_url,
                output_dir: self.output_dir,
            },
        })
    }
}

/// Picks the explicit key, falling back to the environment value.
fn resolve_api_key(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    explicit
        .filter(|k| !k.trim().is_empty())
        .or_else(|| from_env.filter(|k| !k.trim().is_empty()))
        .ok_or_else(|| {
            Error::Config(format!(
                "an API key is required; pass one explicitly or set {} \
                 (see https://studio.camb.ai for how to get a key)",
                API_KEY_ENV
            ))
        })
}
