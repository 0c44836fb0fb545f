//! Input Validation
//!
//! Pure checks applied before any network call:
//! - Text must be non-empty after trimming and within the length limit
//! - Uploads must be within the size limit and on the MIME allow-list
//!
//! Validation failures are caller errors, never logged as system failures.

use crate::api::types::UploadFile;

/// Maximum accepted text length (characters, after trimming)
pub const MAX_TEXT_CHARS: usize = 10_000;

/// Maximum accepted upload size (5 MiB)
pub const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types accepted for file analysis (TXT, PDF, DOCX, DOC)
pub const ALLOWED_MIME_TYPES: [&str; 4] = [
    "text/plain",
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
];

/// Validate analysis text and return the trimmed form
pub fn validate_text(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let length = trimmed.chars().count();
    if length > MAX_TEXT_CHARS {
        return Err(ValidationError::TooLong { length });
    }

    Ok(trimmed.to_string())
}

/// Validate an upload against the size limit and MIME allow-list
pub fn validate_file(file: &UploadFile) -> Result<(), ValidationError> {
    let size = file.size_bytes();
    if size > MAX_FILE_BYTES {
        return Err(ValidationError::FileTooLarge { size });
    }

    if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(ValidationError::UnsupportedFileType(file.mime_type.clone()));
    }

    Ok(())
}

/// Input validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Text is missing or empty after trimming
    EmptyInput,

    /// Text exceeds the length limit
    TooLong { length: usize },

    /// No file was given or the path is not a readable file
    MissingFile(String),

    /// File exceeds the size limit
    FileTooLarge { size: u64 },

    /// MIME type is not on the allow-list
    UnsupportedFileType(String),

    /// Model identifier is not one of B/N
    InvalidModel(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "Text must not be empty"),
            Self::TooLong { length } => write!(
                f,
                "Text is too long ({} characters, maximum {})",
                length, MAX_TEXT_CHARS
            ),
            Self::MissingFile(path) => write!(f, "No file found at {}", path),
            Self::FileTooLarge { size } => write!(
                f,
                "File is too large ({} bytes, maximum {})",
                size, MAX_FILE_BYTES
            ),
            Self::UnsupportedFileType(mime) => write!(
                f,
                "Unsupported file type {} (allowed: TXT, PDF, DOCX, DOC)",
                mime
            ),
            Self::InvalidModel(id) => write!(f, "Model must be \"B\" or \"N\", got {:?}", id),
        }
    }
}

impl std::error::Error for ValidationError {}
