use thiserror::Error;

/// Errors returned by the LLM client.
#[derive(Debug, Error)]
pub enum OpenAiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL is not a valid URL.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The API returned a non-2xx status with an error body.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model returned no usable text (empty choices or empty message).
    #[error("empty response from model")]
    EmptyResponse,

    /// An assistant run ended in a terminal non-success state.
    #[error("run ended with status: {0}")]
    RunFailed(String),

    /// The run-poll loop exceeded its timeout ceiling.
    #[error("timeout waiting for assistant response")]
    RunTimeout,
}

/// Returns `true` for rate-limit responses worth retrying after back-off.
pub(crate) fn is_rate_limited(err: &OpenAiError) -> bool {
    match err {
        OpenAiError::Http(e) => e.status().is_some_and(|s| s.as_u16() == 429),
        OpenAiError::Api { status, .. } => *status == 429,
        OpenAiError::InvalidBaseUrl(_)
        | OpenAiError::Deserialize { .. }
        | OpenAiError::EmptyResponse
        | OpenAiError::RunFailed(_)
        | OpenAiError::RunTimeout => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_429_is_retryable() {
        assert!(is_rate_limited(&OpenAiError::Api {
            status: 429,
            message: "rate limited".to_owned(),
        }));
    }

    #[test]
    fn api_400_is_not_retryable() {
        assert!(!is_rate_limited(&OpenAiError::Api {
            status: 400,
            message: "bad request".to_owned(),
        }));
    }

    #[test]
    fn run_failures_are_not_retryable() {
        assert!(!is_rate_limited(&OpenAiError::RunTimeout));
        assert!(!is_rate_limited(&OpenAiError::RunFailed(
            "cancelled".to_owned()
        )));
    }
}
