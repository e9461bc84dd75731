//! Error types shared across the crate

use thiserror::Error;

/// Base error for everything the tool reports to the user
#[derive(Debug, Error)]
pub enum HnError {
    /// A network request failed: transport error or non-success status
    #[error("request to {url} failed: {reason}")]
    Request {
        /// URL that was requested
        url: String,
        /// Human-readable cause
        reason: String,
    },

    /// The API answered with `null` for the requested resource
    #[error("{0} not found")]
    NotFound(String),

    /// The API returned JSON that does not match the expected shape
    #[error("unexpected response for {what}: {reason}")]
    Malformed {
        /// Resource that was being decoded
        what: String,
        /// Decoder message
        reason: String,
    },

    /// Terminal setup or teardown failed
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl HnError {
    /// Builds a request error from a reqwest failure
    pub fn request(url: &str, error: reqwest::Error) -> Self {
        HnError::Request {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }

    /// Whether this error is a request failure
    pub fn is_request(&self) -> bool {
        matches!(self, HnError::Request { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_message_contains_url() {
        let err = HnError::Request {
            url: "https://example.com/v0/item/1.json".to_string(),
            reason: "HTTP status 503".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("item/1.json"));
        assert!(msg.contains("503"));
        assert!(err.is_request());
    }

    #[test]
    fn test_not_found_is_not_a_request_error() {
        let err = HnError::NotFound("user nobody".to_string());
        assert_eq!(err.to_string(), "user nobody not found");
        assert!(!err.is_request());
    }
}
