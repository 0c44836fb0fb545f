//! Text-Analysis API Client
//!
//! HTTP client for the classification backend. One method per endpoint:
//! health check, analyze text, compare models, analyze file. Inputs are
//! validated before any request is issued, the bearer token is attached
//! when the session holds one, and no call is retried automatically.

use reqwest::multipart;
use std::time::Duration;

use super::types::{
    AnalyzeTextRequest, ClassificationResult, CompareRequest, ComparisonResponse, HealthStatus,
    ModelId, UploadFile,
};
use super::{parse_response, ApiError};
use crate::constants;
use crate::logic::session::Session;
use crate::logic::validation::{validate_file, validate_text, ValidationError};

/// Classification backend configuration
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            base_url: constants::get_text_api_url(),
            timeout_seconds: constants::get_request_timeout(),
        }
    }
}

/// Client for the text-analysis API
pub struct DetectorClient {
    config: DetectorConfig,
    session: Session,
    http_client: reqwest::Client,
}

impl DetectorClient {
    /// Create new detector client
    pub fn new(config: DetectorConfig, session: Session) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            session,
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Attach the bearer token when the session holds one
    fn with_bearer(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Check backend health
    ///
    /// The caller derives the service state from this body together with the
    /// elapsed time (see `logic::monitor`).
    pub async fn check_health(&self) -> Result<HealthStatus, ApiError> {
        log::info!("Checking service status at {}", self.config.base_url);

        let response = self
            .with_bearer(self.http_client.get(self.url("/")))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let result = parse_response(response).await;
        match &result {
            Ok(health) => log::debug!("Service status: {:?}", health),
            Err(e) => log::warn!("Service status check failed: {}", e),
        }
        result
    }

    /// Analyze a text with one model
    pub async fn analyze_text(
        &self,
        text: &str,
        model: ModelId,
    ) -> Result<ClassificationResult, ApiError> {
        let text = validate_text(text)?;
        log::info!(
            "Analyzing text with model {} ({} chars)",
            model,
            text.chars().count()
        );

        let request = AnalyzeTextRequest { text, model };

        let response = self
            .with_bearer(self.http_client.post(self.url("/analizar/")).json(&request))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let result = parse_response(response).await;
        match &result {
            Ok(classification) => {
                log::info!("Analysis completed: {:?}", classification)
            }
            Err(e) => log::error!("Text analysis failed: {}", e),
        }
        result
    }

    /// Run the same text through both models
    pub async fn compare_models(&self, text: &str) -> Result<ComparisonResponse, ApiError> {
        let text = validate_text(text)?;
        log::info!("Comparing models ({} chars)", text.chars().count());

        let request = CompareRequest { text };

        let response = self
            .with_bearer(self.http_client.post(self.url("/comparar/")).json(&request))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let result = parse_response(response).await;
        match &result {
            Ok(_) => log::info!("Comparison completed"),
            Err(e) => log::error!("Model comparison failed: {}", e),
        }
        result
    }

    /// Analyze an uploaded file with one model
    ///
    /// The payload is multipart (`archivo` + `modelo`); no JSON content type
    /// is set so the transport can write its own boundary-based one.
    pub async fn analyze_file(
        &self,
        file: UploadFile,
        model: ModelId,
    ) -> Result<ClassificationResult, ApiError> {
        validate_file(&file)?;
        log::info!(
            "Analyzing file {} ({} bytes) with model {}",
            file.name,
            file.size_bytes(),
            model
        );

        let mime_type = file.mime_type.clone();
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&mime_type)
            .map_err(|_| ValidationError::UnsupportedFileType(mime_type))?;

        let form = multipart::Form::new()
            .part("archivo", part)
            .text("modelo", model.as_str());

        let response = self
            .with_bearer(
                self.http_client
                    .post(self.url("/analizar-archivo/"))
                    .multipart(form),
            )
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let result = parse_response(response).await;
        match &result {
            Ok(classification) => {
                log::info!("File analysis completed: {:?}", classification)
            }
            Err(e) => log::error!("File analysis failed: {}", e),
        }
        result
    }
}
