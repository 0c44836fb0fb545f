//! Text-Analysis API Types
//!
//! Request and response bodies for the classification backend, plus the
//! upload wrapper used for file analysis. Wire field names follow the
//! backend (Spanish), Rust-side names are English.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::logic::validation::ValidationError;

/// Predicted origin of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction {
    #[serde(rename = "IA")]
    Ai,
    #[serde(rename = "Humano")]
    Human,
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ai => write!(f, "IA"),
            Self::Human => write!(f, "Humano"),
        }
    }
}

/// Backend classifier variant
///
/// Two models are deployed: B (sensitive) and N (conservative). Identifiers
/// are accepted case-insensitively and normalized to upper-case on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelId {
    B,
    N,
}

impl ModelId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::B => "B",
            Self::N => "N",
        }
    }
}

impl FromStr for ModelId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "B" => Ok(Self::B),
            "N" => Ok(Self::N),
            _ => Err(ValidationError::InvalidModel(s.to_string())),
        }
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one classification call
///
/// Probabilities are percentages and are not guaranteed to sum to 100;
/// display paths must use the clamped accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "prediccion")]
    pub prediction: Prediction,

    #[serde(rename = "probabilidad_ia")]
    pub ai_probability: f64,

    #[serde(rename = "probabilidad_humano")]
    pub human_probability: f64,

    /// Which model produced this result (absent on single-model endpoints)
    #[serde(rename = "modelo", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelId>,
}

impl ClassificationResult {
    /// AI probability clamped to [0, 100] for display
    pub fn clamped_ai_probability(&self) -> f64 {
        self.ai_probability.clamp(0.0, 100.0)
    }

    /// Human probability clamped to [0, 100] for display
    pub fn clamped_human_probability(&self) -> f64 {
        self.human_probability.clamp(0.0, 100.0)
    }

    /// Confidence of the winning label: the larger of the two clamped probabilities
    pub fn confidence(&self) -> f64 {
        self.clamped_ai_probability()
            .max(self.clamped_human_probability())
    }
}

/// Backend health body returned by the service root endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    /// The backend considers itself healthy iff status is exactly "ok"
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Body of the model-comparison endpoint: one sub-result per model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResponse {
    #[serde(rename = "modelo_b")]
    pub model_b: ClassificationResult,

    #[serde(rename = "modelo_n")]
    pub model_n: ClassificationResult,
}

/// Analyze-text request body
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeTextRequest {
    #[serde(rename = "texto")]
    pub text: String,

    #[serde(rename = "modelo")]
    pub model: ModelId,
}

/// Compare-models request body
#[derive(Debug, Clone, Serialize)]
pub struct CompareRequest {
    #[serde(rename = "texto")]
    pub text: String,
}

/// A file pending upload for analysis
///
/// Bytes are held only for the single pending request; nothing is persisted.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Read a file from disk, inferring the MIME type from its extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        if !path.is_file() {
            return Err(ValidationError::MissingFile(display));
        }

        let bytes =
            std::fs::read(path).map_err(|_| ValidationError::MissingFile(display.clone()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "archivo".to_string());

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        Ok(Self {
            name,
            mime_type: mime_for_extension(&extension).to_string(),
            bytes,
        })
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// MIME type for the accepted upload extensions
///
/// Unknown extensions fall through to octet-stream and are rejected by the
/// MIME allow-list during validation.
fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "doc" => "application/msword",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_id_parse_case_insensitive() {
        assert_eq!("b".parse::<ModelId>().unwrap(), ModelId::B);
        assert_eq!("N".parse::<ModelId>().unwrap(), ModelId::N);
        assert_eq!(" n ".parse::<ModelId>().unwrap(), ModelId::N);
    }

    #[test]
    fn test_model_id_parse_rejects_unknown() {
        let err = "X".parse::<ModelId>().unwrap_err();
        assert_eq!(err, ValidationError::InvalidModel("X".to_string()));
    }

    #[test]
    fn test_analyze_request_normalizes_model() {
        let request = AnalyzeTextRequest {
            text: "Hello world".to_string(),
            model: "b".parse().unwrap(),
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["texto"], "Hello world");
        assert_eq!(body["modelo"], "B");
    }

    #[test]
    fn test_classification_result_wire_names() {
        let body = r#"{"prediccion":"IA","probabilidad_ia":87.5,"probabilidad_humano":12.5}"#;
        let result: ClassificationResult = serde_json::from_str(body).unwrap();

        assert_eq!(result.prediction, Prediction::Ai);
        assert_eq!(result.ai_probability, 87.5);
        assert_eq!(result.human_probability, 12.5);
        assert_eq!(result.model, None);
    }

    #[test]
    fn test_probabilities_clamped_for_display() {
        let result = ClassificationResult {
            prediction: Prediction::Human,
            ai_probability: -3.0,
            human_probability: 104.2,
            model: None,
        };

        assert_eq!(result.clamped_ai_probability(), 0.0);
        assert_eq!(result.clamped_human_probability(), 100.0);
        assert_eq!(result.confidence(), 100.0);
    }

    #[test]
    fn test_comparison_response_wire_names() {
        let body = r#"{
            "modelo_b": {"prediccion":"IA","probabilidad_ia":90.0,"probabilidad_humano":10.0},
            "modelo_n": {"prediccion":"Humano","probabilidad_ia":40.0,"probabilidad_humano":60.0}
        }"#;

        let response: ComparisonResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.model_b.prediction, Prediction::Ai);
        assert_eq!(response.model_n.prediction, Prediction::Human);
    }

    #[test]
    fn test_health_status_ok() {
        let healthy: HealthStatus = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(healthy.is_ok());

        let degraded: HealthStatus =
            serde_json::from_str(r#"{"status":"maintenance","message":"reindexing"}"#).unwrap();
        assert!(!degraded.is_ok());
    }

    #[test]
    fn test_upload_mime_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("essay.txt");
        std::fs::write(&path, b"some text").unwrap();

        let file = UploadFile::from_path(&path).unwrap();
        assert_eq!(file.name, "essay.txt");
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(file.size_bytes(), 9);
    }

    #[test]
    fn test_upload_missing_file() {
        let result = UploadFile::from_path("/nonexistent/essay.txt");
        assert!(matches!(result, Err(ValidationError::MissingFile(_))));
    }
}
