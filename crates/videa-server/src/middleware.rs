use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use reqwest::Url;
use thiserror::Error;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Errors from bearer-token verification.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No (or malformed) `Authorization: Bearer` header on the request.
    #[error("missing bearer token")]
    MissingToken,

    /// The identity provider rejected the token.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The identity provider could not be reached or answered garbage.
    #[error("auth verification failed: {0}")]
    Verification(String),
}

#[derive(Debug, serde::Deserialize)]
struct AuthUserResponse {
    id: Uuid,
}

/// Verifies bearer tokens against the identity provider and resolves the
/// owning user id.
///
/// Every endpoint that requires identity calls this before any persistence
/// or generation work; the missing-header case short-circuits without a
/// network round trip.
pub struct AuthClient {
    client: reqwest::Client,
    base_url: Url,
    service_key: String,
}

impl AuthClient {
    /// Creates a verifier against the identity provider at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Verification`] if the HTTP client cannot be
    /// built or `base_url` does not parse.
    pub fn new(base_url: &str, service_key: &str, timeout_secs: u64) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Verification(e.to_string()))?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| AuthError::Verification(format!("invalid auth URL '{base_url}'")))?;

        Ok(Self {
            client,
            base_url,
            service_key: service_key.to_owned(),
        })
    }

    /// Resolves the authenticated user id from a request's headers.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingToken`] when no bearer token is present.
    /// - [`AuthError::InvalidToken`] when the provider rejects it.
    /// - [`AuthError::Verification`] on transport or contract failure.
    pub async fn user_id_from_headers(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        let token =
            extract_bearer_token(headers.get(AUTHORIZATION)).ok_or(AuthError::MissingToken)?;

        let url = self
            .base_url
            .join("auth/v1/user")
            .map_err(|e| AuthError::Verification(e.to_string()))?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| AuthError::Verification(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidToken);
        }

        let user: AuthUserResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Verification(e.to_string()))?;
        Ok(user.id)
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_bearer_token_accepts_valid_header() {
        let header = HeaderValue::from_static("Bearer test-token");
        assert_eq!(extract_bearer_token(Some(&header)), Some("test-token"));
    }

    #[test]
    fn extract_bearer_token_rejects_non_bearer_header() {
        let header = HeaderValue::from_static("Basic abc123");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }

    #[test]
    fn extract_bearer_token_rejects_empty_token() {
        let header = HeaderValue::from_static("Bearer ");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }

    #[tokio::test]
    async fn missing_header_short_circuits_without_network() {
        // The base URL points nowhere routable; MissingToken must win
        // before any connection attempt.
        let auth = AuthClient::new("http://127.0.0.1:1", "key", 1).expect("client");
        let err = auth
            .user_id_from_headers(&HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
    }
}
