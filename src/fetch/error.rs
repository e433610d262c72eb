//! Fetch error taxonomy.

use std::error::Error as StdError;
use thiserror::Error;

/// Longest upstream body kept on an [`FetchError::Upstream`].
const BODY_EXCERPT_LEN: usize = 200;

/// Errors raised while fetching profile data.
///
/// All variants collapse into `FetchOutcome::Failure`; the variant and its
/// source chain are kept for logging.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("account handle must not be empty")]
    InvalidHandle,

    /// The request never produced a response (DNS, refused, timeout, reset).
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}: {body}")]
    Upstream {
        url: String,
        status: u16,
        body: String,
    },

    /// The body was not the expected JSON shape.
    #[error("could not decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("fetch task ended before producing a result")]
    Interrupted,
}

impl FetchError {
    /// Build an upstream error, trimming the body to a short excerpt.
    pub fn upstream(url: impl Into<String>, status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = match body.char_indices().nth(BODY_EXCERPT_LEN) {
            Some((cut, _)) => format!("{}…", &body[..cut]),
            None => body.to_string(),
        };
        FetchError::Upstream {
            url: url.into(),
            status,
            body,
        }
    }

    /// Short name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidHandle => "invalid-handle",
            FetchError::Network { .. } => "network",
            FetchError::Upstream { .. } => "upstream",
            FetchError::Decode { .. } => "decode",
            FetchError::Interrupted => "interrupted",
        }
    }

    /// The error and all of its sources, joined with `": "`.
    pub fn cause_chain(&self) -> String {
        let mut chain = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            chain.push_str(": ");
            chain.push_str(&cause.to_string());
            source = cause.source();
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_body_is_truncated() {
        let body = "x".repeat(500);
        match FetchError::upstream("https://api.github.com/users/a", 403, &body) {
            FetchError::Upstream { status, body, .. } => {
                assert_eq!(status, 403);
                assert_eq!(body.chars().count(), BODY_EXCERPT_LEN + 1);
                assert!(body.ends_with('…'));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_cause_chain_includes_source() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = FetchError::Decode {
            url: "https://api.github.com/users/a".to_string(),
            source,
        };
        let chain = err.cause_chain();
        assert!(chain.starts_with("could not decode response from https://api.github.com/users/a: "));
        assert_eq!(err.kind(), "decode");
    }
}
