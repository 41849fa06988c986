use thiserror::Error;

/// Errors returned by the YouTube Data API client.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network, TLS, or non-2xx HTTP failure from the underlying client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL is not a valid URL.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The requested channel does not exist.
    #[error("channel not found")]
    ChannelNotFound,

    /// A channel search matched nothing.
    #[error("no channels found matching that name")]
    NoChannelsFound,

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Returns `true` for rate-limit responses worth retrying after back-off.
///
/// The Data API signals quota pressure with both 429 and 403; everything
/// else propagates immediately.
pub(crate) fn is_rate_limited(err: &YoutubeError) -> bool {
    match err {
        YoutubeError::Http(e) => e
            .status()
            .is_some_and(|s| s.as_u16() == 429 || s.as_u16() == 403),
        YoutubeError::InvalidBaseUrl(_)
        | YoutubeError::ChannelNotFound
        | YoutubeError::NoChannelsFound
        | YoutubeError::Deserialize { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_not_found_is_not_retryable() {
        assert!(!is_rate_limited(&YoutubeError::ChannelNotFound));
    }

    #[test]
    fn deserialize_error_is_not_retryable() {
        let source = serde_json::from_str::<()>("invalid").unwrap_err();
        assert!(!is_rate_limited(&YoutubeError::Deserialize {
            context: "test".to_owned(),
            source,
        }));
    }
}
