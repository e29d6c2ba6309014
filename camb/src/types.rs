//! Common types for the CAMB.AI API.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::Error;

// ==================== Task Kind ====================

/// The kind of long-running job a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Dubbing,
    Tts,
    Transcription,
    Translation,
    TranslatedTts,
}

impl TaskKind {
    /// Returns the endpoint used to submit and poll tasks of this kind.
    pub fn endpoint(&self) -> &'static str {
        match self {
            TaskKind::Dubbing => "end_to_end_dubbing",
            TaskKind::Tts => "tts",
            TaskKind::Transcription => "transcribe",
            TaskKind::Translation => "translate",
            TaskKind::TranslatedTts => "translated_tts",
        }
    }

    /// Returns the path of the status endpoint for a task.
    pub fn status_path(&self, task_id: &str) -> String {
        format!("/{}/{}", self.endpoint(), task_id)
    }

    /// Returns the path of the result endpoint for a run.
    pub fn result_path(&self, run_id: &RunId) -> String {
        let endpoint = match self {
            TaskKind::Dubbing => "dubbed_run_info",
            TaskKind::Tts | TaskKind::TranslatedTts => "tts_result",
            TaskKind::Transcription => "transcription_result",
            TaskKind::Translation => "translation_result",
        };
        format!("/{}/{}", endpoint, run_id)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskKind::Dubbing => "dubbing",
            TaskKind::Tts => "tts",
            TaskKind::Transcription => "transcription",
            TaskKind::Translation => "translation",
            TaskKind::TranslatedTts => "translated_tts",
        };
        f.write_str(name)
    }
}

// ==================== Task Status ====================

/// Status of an async task as reported by the status endpoint.
///
/// Statuses the client does not know about are kept verbatim in
/// [`TaskStatus::Unknown`] and treated as terminal failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Success,
    Pending,
    Timeout,
    Error,
    PaymentRequired,
    Unknown(String),
}

impl TaskStatus {
    /// Returns the wire representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Pending => "PENDING",
            TaskStatus::Timeout => "TIMEOUT",
            TaskStatus::Error => "ERROR",
            TaskStatus::PaymentRequired => "PAYMENT_REQUIRED",
            TaskStatus::Unknown(s) => s,
        }
    }

    /// Returns true if the task is still in progress.
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskStatus::Pending)
    }

    /// Returns true if the task completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Success)
    }

    /// Returns true if no further transition will happen.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        match s {
            "SUCCESS" => TaskStatus::Success,
            "PENDING" => TaskStatus::Pending,
            "TIMEOUT" => TaskStatus::Timeout,
            "ERROR" => TaskStatus::Error,
            "PAYMENT_REQUIRED" => TaskStatus::PaymentRequired,
            other => TaskStatus::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(TaskStatus::from(s.as_str()))
    }
}

/// Snapshot returned by a status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    /// Current status.
    pub status: TaskStatus,

    /// Run identifier, present once processing has started.
    #[serde(default)]
    pub run_id: Option<RunId>,
}

// ==================== Run ID ====================

/// Identifier of a task run, used to fetch results.
///
/// The API sends run ids as integers, but the client accepts strings too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for RunId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RunId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RunId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RunIdVisitor;

        impl serde::de::Visitor<'_> for RunIdVisitor {
            type Value = RunId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer run id")
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(RunId(v.to_string()))
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(RunId(v.to_string()))
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(RunId(v.to_string()))
            }
        }

        deserializer.deserialize_any(RunIdVisitor)
    }
}

// ==================== Gender ====================

/// Speaker gender, sent to the API as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Gender {
    #[default]
    NotKnown,
    Male,
    Female,
    NotApplicable,
}

impl Gender {
    /// Returns the integer code used on the wire.
    pub fn code(&self) -> i32 {
        match self {
            Gender::NotKnown => 0,
            Gender::Male => 1,
            Gender::Female => 2,
            Gender::NotApplicable => 9,
        }
    }
}

impl TryFrom<i32> for Gender {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Gender::NotKnown),
            1 => Ok(Gender::Male),
            2 => Ok(Gender::Female),
            9 => Ok(Gender::NotApplicable),
            other => Err(Error::validation(
                "gender",
                format!(
                    "{} is not one of 0 (not known), 1 (male), 2 (female), 9 (not applicable)",
                    other
                ),
            )),
        }
    }
}

impl From<Gender> for i32 {
    fn from(g: Gender) -> Self {
        g.code()
    }
}

impl std::str::FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "not_known" | "unknown" => Ok(Gender::NotKnown),
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "not_applicable" | "n/a" => Ok(Gender::NotApplicable),
            other => match other.parse::<i32>() {
                Ok(code) => Gender::try_from(code),
                Err(_) => Err(Error::validation(
                    "gender",
                    format!("unrecognized gender {:?}", s),
                )),
            },
        }
    }
}

// ==================== Formality ====================

/// Register of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Formality {
    Formal,
    Informal,
}

impl Formality {
    /// Returns the integer code used on the wire.
    pub fn code(&self) -> i32 {
        match self {
            Formality::Formal => 1,
            Formality::Informal => 2,
        }
    }
}

impl TryFrom<i32> for Formality {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Formality::Formal),
            2 => Ok(Formality::Informal),
            other => Err(Error::validation(
                "formality",
                format!("{} is not one of 1 (formal), 2 (informal)", other),
            )),
        }
    }
}

impl From<Formality> for i32 {
    fn from(f: Formality) -> Self {
        f.code()
    }
}

// ==================== Language ====================

/// A language supported by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Language identifier used in requests.
    pub id: u32,

    /// Human readable name, e.g. "english (united states)".
    #[serde(default)]
    pub language: String,

    /// Locale code, e.g. "en-us".
    #[serde(default)]
    pub short_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_parsing() {
        let resp: TaskStatusResponse =
            serde_json::from_str(r#"{"status":"PENDING","run_id":null}"#).unwrap();
        assert_eq!(resp.status, TaskStatus::Pending);
        assert!(resp.run_id.is_none());

        let resp: TaskStatusResponse =
            serde_json::from_str(r#"{"status":"SUCCESS","run_id":1234}"#).unwrap();
        assert!(resp.status.is_success());
        assert_eq!(resp.run_id, Some(RunId::from(1234)));

        let resp: TaskStatusResponse = serde_json::from_str(r#"{"status":"SUCCESS"}"#).unwrap();
        assert!(resp.run_id.is_none());
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let resp: TaskStatusResponse =
            serde_json::from_str(r#"{"status":"QUEUED_FOR_REVIEW","run_id":null}"#).unwrap();
        assert_eq!(resp.status, TaskStatus::Unknown("QUEUED_FOR_REVIEW".to_string()));
        assert!(resp.status.is_terminal());
        assert_eq!(resp.status.to_string(), "QUEUED_FOR_REVIEW");
    }

    #[test]
    fn test_run_id_accepts_string() {
        let resp: TaskStatusResponse =
            serde_json::from_str(r#"{"status":"SUCCESS","run_id":"77"}"#).unwrap();
        assert_eq!(resp.run_id.unwrap().as_str(), "77");
        assert_eq!(serde_json::to_string(&RunId::from(77)).unwrap(), "77");
    }

    #[test]
    fn test_gender_codes() {
        assert_eq!(Gender::try_from(9).unwrap(), Gender::NotApplicable);
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "2");
        for bad in [-1, 3, 4, 8, 10, 100] {
            let err = Gender::try_from(bad).unwrap_err();
            assert!(err.is_validation(), "{} should be rejected", bad);
        }
        assert!(serde_json::from_str::<Gender>("5").is_err());
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("0".parse::<Gender>().unwrap(), Gender::NotKnown);
        assert!("robot".parse::<Gender>().unwrap_err().is_validation());
    }

    #[test]
    fn test_formality_codes() {
        assert_eq!(Formality::try_from(1).unwrap(), Formality::Formal);
        assert_eq!(Formality::try_from(2).unwrap(), Formality::Informal);
        for bad in [0, 3, -2] {
            assert!(Formality::try_from(bad).unwrap_err().is_validation());
        }
        assert!(serde_json::from_str::<Formality>("3").is_err());
    }

    #[test]
    fn test_kind_paths() {
        let run = RunId::from(5);
        assert_eq!(TaskKind::Dubbing.status_path("abc"), "/end_to_end_dubbing/abc");
        assert_eq!(TaskKind::Dubbing.result_path(&run), "/dubbed_run_info/5");
        assert_eq!(TaskKind::TranslatedTts.result_path(&run), "/tts_result/5");
        assert_eq!(TaskKind::Transcription.status_path("t"), "/transcribe/t");
        assert_eq!(TaskKind::Translation.result_path(&run), "/translation_result/5");
    }
}
