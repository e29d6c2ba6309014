//! Voice management service.

use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{
    error::Result,
    http::{FilePart, HttpClient},
    types::Gender,
    validate,
};

/// Voice management service.
pub struct VoiceService {
    http: Arc<HttpClient>,
}

impl VoiceService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists the voices available to the account.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// for voice in client.voices().list().await? {
    ///     println!("{}: {}", voice.id, voice.voice_name);
    /// }
    /// ```
    pub async fn list(&self) -> Result<Vec<VoiceInfo>> {
        self.http.get_json("/list_voices").await
    }

    /// Creates a custom voice from a WAV sample.
    pub async fn create_custom(&self, request: &CustomVoiceRequest) -> Result<CustomVoice> {
        request.validate().await?;

        let data = tokio::fs::read(&request.file).await?;
        let filename = request
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "voice.wav".to_string());

        let mut fields = vec![
            ("voice_name", request.voice_name.clone()),
            ("gender", request.gender.code().to_string()),
        ];
        if let Some(age) = request.age {
            fields.push(("age", age.to_string()));
        }

        let voice: CustomVoice = self
            .http
            .post_multipart(
                "/create_custom_voice",
                FilePart {
                    field: "file",
                    filename,
                    data,
                },
                fields,
            )
            .await?;
        tracing::info!(
            voice_id = voice.voice_id,
            name = %request.voice_name,
            "custom voice created"
        );

        Ok(voice)
    }
}

/// A voice usable for speech synthesis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Voice identifier.
    pub id: i64,

    /// Voice name.
    #[serde(default)]
    pub voice_name: String,
}

/// Request for creating a custom voice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomVoiceRequest {
    /// Display name of the voice.
    pub voice_name: String,

    /// Gender of the speaker.
    #[serde(default)]
    pub gender: Gender,

    /// Age of the speaker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    /// WAV sample of the speaker.
    pub file: PathBuf,
}

impl CustomVoiceRequest {
    /// Checks the request without contacting the API.
    pub async fn validate(&self) -> Result<()> {
        validate::non_empty("voice_name", &self.voice_name)?;
        validate::media_file("file", &self.file, validate::VOICE_SAMPLE_EXTENSIONS).await
    }
}

/// A newly created custom voice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomVoice {
    /// Identifier of the new voice.
    pub voice_id: i64,
}
