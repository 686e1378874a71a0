use thiserror::Error;

/// Errors from the model streaming layer
#[derive(Error, Debug)]
pub enum LlmError {
    /// The request could not be made as given (missing key, empty model id)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider answered with a non-success status
    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The stream broke or produced malformed data mid-reply
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Request or response JSON could not be encoded/decoded
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            return LlmError::HttpError {
                status: 0,
                body: err.to_string(),
            };
        }
        LlmError::StreamError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LlmError::InvalidRequest("API key is not configured".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid request: API key is not configured"
        );

        let err = LlmError::HttpError {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 429: quota exceeded");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: LlmError = json_err.into();
        assert!(matches!(err, LlmError::SerializationError(_)));
    }
}
