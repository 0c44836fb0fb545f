//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change default API endpoints, only edit this file.

/// Default text-analysis API base URL
///
/// This is the fallback URL when no environment variable is set.
/// For development: http://127.0.0.1:8000/api/texto
pub const DEFAULT_TEXT_API_URL: &str = "http://127.0.0.1:8000/api/texto";

/// Default authentication API base URL
pub const DEFAULT_AUTH_API_URL: &str = "http://127.0.0.1:8000/api/auth";

/// Default service-health refresh interval (seconds)
pub const DEFAULT_REFRESH_INTERVAL: u64 = 60;

/// Latency above which a healthy response is still reported as degraded (ms)
pub const DEGRADED_LATENCY_MS: u64 = 1000;

/// HTTP request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "VeriText";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get text-analysis API base URL from environment or use default
pub fn get_text_api_url() -> String {
    std::env::var("VERITEXT_TEXT_API_URL").unwrap_or_else(|_| DEFAULT_TEXT_API_URL.to_string())
}

/// Get authentication API base URL from environment or use default
pub fn get_auth_api_url() -> String {
    std::env::var("VERITEXT_AUTH_API_URL").unwrap_or_else(|_| DEFAULT_AUTH_API_URL.to_string())
}

/// Get health refresh interval from environment or use default
pub fn get_refresh_interval() -> u64 {
    std::env::var("VERITEXT_REFRESH_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_REFRESH_INTERVAL)
}

/// Get HTTP request timeout from environment or use default
pub fn get_request_timeout() -> u64 {
    std::env::var("VERITEXT_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
}
