//! VeriText Client Core
//!
//! Client-side core for an AI-text-detection service. It submits text or
//! uploaded documents to the classification backend, reports whether the
//! text looks AI-generated or human-written, merges two-model comparisons
//! into a consensus/divergence verdict, polls backend health on an interval
//! and manages the authenticated session.
//!
//! The backends themselves (inference, token issuance) are external HTTP
//! collaborators; this crate only talks to them.

pub mod api;
pub mod constants;
pub mod logic;

pub use api::auth::{AuthConfig, RegisterRequest, User};
pub use api::client::DetectorConfig;
pub use api::types::{
    ClassificationResult, ComparisonResponse, HealthStatus, ModelId, Prediction, UploadFile,
};
pub use api::{ApiError, AuthClient, DetectorClient};
pub use logic::comparison::{compare, compare_response, ComparisonOutcome};
pub use logic::monitor::{
    HealthState, MonitorConfig, MonitorHandle, ServiceHealth, ServiceMonitor,
};
pub use logic::session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
pub use logic::validation::{validate_file, validate_text, ValidationError};
