//! Language listing service.

use std::sync::Arc;

use super::{error::Result, http::HttpClient, types::Language};

/// Language listing service.
pub struct LanguageService {
    http: Arc<HttpClient>,
}

impl LanguageService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists languages accepted as input.
    pub async fn source(&self) -> Result<Vec<Language>> {
        self.http.get_json("/source_languages").await
    }

    /// Lists languages that can be produced.
    pub async fn target(&self) -> Result<Vec<Language>> {
        self.http.get_json("/target_languages").await
    }
}
