//! Local request validation.
//!
//! Everything here runs before a request is sent, so a bad parameter never
//! costs a network round trip.

use std::path::Path;

use super::error::{Error, Result};

/// Smallest valid language id.
pub const MIN_LANGUAGE_ID: u32 = 1;

/// Largest valid language id.
pub const MAX_LANGUAGE_ID: u32 = 148;

/// Containers accepted for custom voice samples.
pub const VOICE_SAMPLE_EXTENSIONS: &[&str] = &["wav"];

/// Containers accepted for transcription input.
pub const TRANSCRIPTION_EXTENSIONS: &[&str] =
    &["mp3", "wav", "aac", "flac", "m4a", "ogg", "webm", "mp4"];

/// Checks that a language id lies in the supported range.
pub fn language(field: &'static str, id: u32) -> Result<()> {
    if !(MIN_LANGUAGE_ID..=MAX_LANGUAGE_ID).contains(&id) {
        return Err(Error::validation(
            field,
            format!(
                "language id must be between {} and {}, got {}",
                MIN_LANGUAGE_ID, MAX_LANGUAGE_ID, id
            ),
        ));
    }
    Ok(())
}

/// Checks that a text field is not blank.
pub fn non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Checks that `path` is an existing, readable file with one of `extensions`.
pub async fn media_file(field: &'static str, path: &Path, extensions: &[&str]) -> Result<()> {
    let meta = tokio::fs::metadata(path).await.map_err(|e| {
        Error::validation(field, format!("cannot access {}: {}", path.display(), e))
    })?;
    if !meta.is_file() {
        return Err(Error::validation(
            field,
            format!("{} is not a regular file", path.display()),
        ));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !extensions.contains(&ext.as_str()) {
        return Err(Error::validation(
            field,
            format!(
                "{} must be one of [{}]",
                path.display(),
                extensions.join(", ")
            ),
        ));
    }

    // Metadata succeeding does not prove we may read it.
    tokio::fs::File::open(path).await.map_err(|e| {
        Error::validation(field, format!("cannot read {}: {}", path.display(), e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_bounds() {
        assert!(language("language", 1).is_ok());
        assert!(language("language", 148).is_ok());
        for bad in [0, 149, 1000, u32::MAX] {
            let err = language("language", bad).unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_non_empty() {
        assert!(non_empty("text", "hello").is_ok());
        assert!(non_empty("text", "   ").unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_media_file() {
        let dir = tempfile::tempdir().unwrap();

        let wav = dir.path().join("sample.WAV");
        std::fs::write(&wav, b"RIFF").unwrap();
        assert!(media_file("file", &wav, VOICE_SAMPLE_EXTENSIONS).await.is_ok());

        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, b"hi").unwrap();
        let err = media_file("file", &txt, VOICE_SAMPLE_EXTENSIONS).await.unwrap_err();
        assert!(err.is_validation());

        let missing = dir.path().join("missing.wav");
        let err = media_file("file", &missing, VOICE_SAMPLE_EXTENSIONS).await.unwrap_err();
        assert!(err.is_validation());

        let err = media_file("file", dir.path(), TRANSCRIPTION_EXTENSIONS).await.unwrap_err();
        assert!(err.is_validation());
    }
}
