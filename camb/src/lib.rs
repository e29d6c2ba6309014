//! CAMB.AI API SDK for Rust.
//!
//! This crate provides a client for the CAMB.AI media API: end-to-end video
//! dubbing, text-to-speech, transcription, translation and translated
//! text-to-speech.
//!
//! Every one of those operations is an asynchronous remote task. The client
//! submits the job, polls its status until the service reports a terminal
//! state and then fetches the result by run id. [`Task`] implements that loop
//! once for all kinds; [`PollOptions`] controls the interval and optionally
//! adds a deadline or a cancellation token.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use camb::{Client, Gender, PollOptions, TtsRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads CAMB_API_KEY
//!     let client = Client::from_env()?;
//!
//!     let audio = client
//!         .tts(
//!             &TtsRequest {
//!                 text: "Hello, World!".to_string(),
//!                 voice_id: 8612,
//!                 language: 1,
//!                 gender: Gender::Male,
//!                 age: Some(25),
//!             },
//!             &PollOptions::default(),
//!         )
//!         .await?;
//!
//!     println!("audio written to {}", audio.path.display());
//!     Ok(())
//! }
//! ```

mod client;
mod dubbing;
mod error;
pub mod http;
mod language;
mod task;
mod transcription;
mod translation;
mod tts;
mod types;
pub mod validate;
mod voice;

#[cfg(test)]
mod testutil;

pub use client::{Client, ClientBuilder, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use dubbing::{DubbedRunInfo, DubbingRequest, DubbingService, DubbingTask};
pub use error::{Error, Result};
pub use language::LanguageService;
pub use task::{
    audio_file_name, AudioBackend, AudioFile, JsonBackend, PollOptions, Task, TaskBackend,
    DEFAULT_AUDIO_DIR, DEFAULT_POLLING_INTERVAL,
};
pub use transcription::{
    Transcript, TranscriptSegment, TranscriptionRequest, TranscriptionService, TranscriptionTask,
};
pub use translation::{
    TranslatedTtsRequest, TranslatedTtsService, TranslatedTtsTask, TranslationRequest,
    TranslationResult, TranslationService, TranslationTask,
};
pub use tts::{TtsRequest, TtsService, TtsTask};
pub use types::{Formality, Gender, Language, RunId, TaskKind, TaskStatus, TaskStatusResponse};
pub use voice::{CustomVoice, CustomVoiceRequest, VoiceInfo, VoiceService};

/// Re-exported so callers can build [`PollOptions::cancel`] without a direct dependency.
pub use tokio_util::sync::CancellationToken;
