//! Authentication API Client
//!
//! Session lifecycle against the auth backend: login, register, logout,
//! token refresh and profile. Tokens and the cached user object go through
//! the injected session store; the three are always cleared together on
//! logout or a failed refresh.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{parse_response, ApiError};
use crate::constants;
use crate::logic::session::Session;

/// Auth backend configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: constants::get_auth_api_url(),
            timeout_seconds: constants::get_request_timeout(),
        }
    }
}

/// Access/refresh token pair issued by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Authenticated user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,

    pub email: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,
}

/// Registration request body
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, Serialize)]
struct RefreshRequest {
    refresh: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RefreshResponse {
    access: String,
}

/// Login/register response: tokens are absent when registration does not
/// auto-login
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub tokens: Option<TokenPair>,

    #[serde(default)]
    pub user: Option<User>,
}

/// Client for the authentication API
pub struct AuthClient {
    config: AuthConfig,
    session: Session,
    http_client: reqwest::Client,
}

impl AuthClient {
    /// Create new auth client
    pub fn new(config: AuthConfig, session: Session) -> Self {
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

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// True iff an access token is stored and its `exp` claim lies in the future
    ///
    /// Claims are decoded locally for the expiry check only, never verified.
    pub fn is_authenticated(&self) -> bool {
        match self.session.access_token() {
            Some(token) => match token_expiry(&token) {
                Some(exp) => exp > chrono::Utc::now().timestamp(),
                None => false,
            },
            None => false,
        }
    }

    /// Cached user object from the session store
    pub fn current_user(&self) -> Option<User> {
        self.session
            .user_json()
            .and_then(|json| serde_json::from_str(&json).ok())
    }

    /// Log in and store the issued tokens and user
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        log::info!("Logging in {}", email);

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http_client
            .post(self.url("/login/"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let auth: AuthResponse = parse_response(response).await.map_err(|e| {
            log::error!("Login failed: {}", e);
            e
        })?;

        self.store_session(&auth);
        log::info!("Login successful");
        Ok(auth)
    }

    /// Register a new user; stores tokens when the backend auto-logs-in
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        log::info!("Registering {}", request.email);

        let response = self
            .http_client
            .post(self.url("/register/"))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let auth: AuthResponse = parse_response(response).await.map_err(|e| {
            log::error!("Registration failed: {}", e);
            e
        })?;

        self.store_session(&auth);
        log::info!("Registration successful");
        Ok(auth)
    }

    /// Log out: revoke the refresh token server-side, then clear the session
    ///
    /// The session is cleared even when the revocation call fails.
    pub async fn logout(&self) {
        if let Some(refresh) = self.session.refresh_token() {
            let request = RefreshRequest { refresh };

            let mut builder = self.http_client.post(self.url("/logout/")).json(&request);
            if let Some(token) = self.session.access_token() {
                builder = builder.bearer_auth(token);
            }

            match builder.send().await {
                Ok(response) => log::debug!("Logout response: {}", response.status()),
                Err(e) => log::warn!("Logout request failed: {}", e),
            }
        }

        self.session.clear();
        log::info!("Session cleared");
    }

    /// Exchange the refresh token for a new access token
    ///
    /// Any failure clears the whole session; the caller must redirect to
    /// login.
    pub async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let refresh = match self.session.refresh_token() {
            Some(refresh) => refresh,
            None => {
                self.session.clear();
                return Err(ApiError::NotAuthenticated);
            }
        };

        log::info!("Refreshing access token");

        let result = async {
            let response = self
                .http_client
                .post(self.url("/token/refresh/"))
                .json(&RefreshRequest { refresh })
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;

            let refreshed: RefreshResponse = parse_response(response).await?;
            Ok(refreshed.access)
        }
        .await;

        match result {
            Ok(access) => {
                self.session.set_access_token(&access);
                log::debug!("Access token refreshed");
                Ok(access)
            }
            Err(e) => {
                log::warn!("Token refresh failed, clearing session: {}", e);
                self.session.clear();
                Err(e)
            }
        }
    }

    /// Fetch the authenticated user's profile
    pub async fn profile(&self) -> Result<User, ApiError> {
        let token = self
            .session
            .access_token()
            .ok_or(ApiError::NotAuthenticated)?;

        let response = self
            .http_client
            .get(self.url("/profile/"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        parse_response(response).await
    }

    fn store_session(&self, auth: &AuthResponse) {
        if let Some(tokens) = &auth.tokens {
            self.session.set_tokens(&tokens.access, &tokens.refresh);
        }

        if let Some(user) = &auth.user {
            if let Ok(json) = serde_json::to_string(user) {
                self.session.set_user_json(&json);
            }
        }
    }
}

/// Decode the `exp` claim of a JWT without verifying the signature
fn token_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_i64()
}
