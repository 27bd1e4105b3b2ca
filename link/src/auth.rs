//! Authentication provider for the BigQuery client.
//!
//! BigQuery's REST API takes an OAuth2 access token as a Bearer header. The
//! runner does not implement a token flow itself; it picks up a token the
//! operator already minted (`gcloud auth print-access-token`) from the
//! environment.

use crate::error::Result;

/// Env vars checked for an access token, in order.
const TOKEN_ENV_VARS: &[&str] = &["BIGQUERY_ACCESS_TOKEN", "GOOGLE_OAUTH_ACCESS_TOKEN"];

/// Authentication credentials attached to each request.
///
/// # Examples
///
/// ```rust
/// use bqbot_link::AuthProvider;
///
/// // Bearer token authentication
/// let auth = AuthProvider::bearer("ya29.a0...".to_string());
///
/// // No authentication (emulators, local test servers)
/// let auth = AuthProvider::none();
/// ```
#[derive(Debug, Clone)]
pub enum AuthProvider {
    /// OAuth2 access token, sent as `Authorization: Bearer <token>`
    Bearer(String),

    /// No authentication (emulator / test server)
    None,
}

impl AuthProvider {
    /// Create Bearer token authentication
    pub fn bearer(token: String) -> Self {
        Self::Bearer(token)
    }

    /// No authentication
    pub fn none() -> Self {
        Self::None
    }

    /// Build a provider from the process environment.
    ///
    /// Checks `BIGQUERY_ACCESS_TOKEN`, then `GOOGLE_OAUTH_ACCESS_TOKEN`.
    /// Falls back to `None` when neither is set; the probe request will then
    /// surface the permission failure with a remediation hint.
    pub fn from_env() -> Self {
        for var in TOKEN_ENV_VARS {
            if let Ok(token) = std::env::var(var) {
                let token = token.trim().to_string();
                if !token.is_empty() {
                    return Self::Bearer(token);
                }
            }
        }
        Self::None
    }

    /// Attach the Authorization header to an HTTP request builder
    pub fn apply_to_request(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder> {
        match self {
            Self::Bearer(token) => Ok(request.bearer_auth(token)),
            Self::None => Ok(request),
        }
    }

    /// Check if authentication is configured
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_authenticated() {
        assert!(AuthProvider::bearer("tok".into()).is_authenticated());
        assert!(!AuthProvider::none().is_authenticated());
    }
}
