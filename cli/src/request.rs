//! Request file loading.
//!
//! Requests are YAML or JSON documents deserialized straight into the SDK's
//! request types.

use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error type for request loading.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read request file: {0}")]
    ReadFile(#[from] io::Error),
    #[error("failed to parse YAML request: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse JSON request: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("failed to parse request (tried YAML and JSON)")]
    ParseFailed,
}

/// Loads a request from a YAML or JSON file.
pub fn load_request<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, RequestError> {
    let data = fs::read(path.as_ref())?;
    parse_request(&data, path)
}

/// Parses request data, choosing the format from the file extension.
///
/// Unknown extensions try YAML first, then JSON.
pub fn parse_request<T: DeserializeOwned>(
    data: &[u8],
    path: impl AsRef<Path>,
) -> Result<T, RequestError> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_slice(data)?),
        Some("json") => Ok(serde_json::from_slice(data)?),
        _ => serde_yaml::from_slice(data)
            .or_else(|_| serde_json::from_slice(data))
            .map_err(|_| RequestError::ParseFailed),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde::Deserialize;
    use tempfile::NamedTempFile;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct DubRequest {
        video_url: String,
        target_language: u32,
        #[serde(default)]
        source_language: Option<u32>,
    }

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "video_url: https://example.com/v.mp4\ntarget_language: 76").unwrap();

        let req: DubRequest = load_request(file.path()).unwrap();
        assert_eq!(req.video_url, "https://example.com/v.mp4");
        assert_eq!(req.target_language, 76);
        assert_eq!(req.source_language, None);
    }

    #[test]
    fn test_load_json() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        writeln!(
            file,
            r#"{{"video_url": "https://example.com/v.mp4", "target_language": 3, "source_language": 1}}"#
        )
        .unwrap();

        let req: DubRequest = load_request(file.path()).unwrap();
        assert_eq!(req.target_language, 3);
        assert_eq!(req.source_language, Some(1));
    }

    #[test]
    fn test_json_extension_rejects_yaml() {
        let data = b"video_url: x\ntarget_language: 1";
        let result: Result<DubRequest, _> = parse_request(data, "req.json");
        assert!(matches!(result, Err(RequestError::ParseJson(_))));
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        let req: DubRequest =
            parse_request(br#"{"video_url": "x", "target_language": 9}"#, "req.txt").unwrap();
        assert_eq!(req.target_language, 9);

        let result: Result<DubRequest, _> = parse_request(b"invalid data {{{{", "req.txt");
        assert!(matches!(result, Err(RequestError::ParseFailed)));
    }

    #[test]
    fn test_missing_file() {
        let result: Result<DubRequest, _> = load_request("/nonexistent/request.yaml");
        assert!(matches!(result, Err(RequestError::ReadFile(_))));
    }
}
