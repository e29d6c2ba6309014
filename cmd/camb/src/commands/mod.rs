//! CLI commands module.

mod config;
mod dubbing;
mod languages;
mod speech;
mod status;
mod transcription;
mod translation;
mod util;
mod voices;

pub use config::ConfigCommand;
pub use dubbing::DubCommand;
pub use languages::LanguagesCommand;
pub use speech::{TranslatedTtsCommand, TtsCommand};
pub use status::StatusCommand;
pub use transcription::TranscribeCommand;
pub use translation::TranslateCommand;
pub use voices::VoicesCommand;

pub(crate) use util::*;
