use http::StatusCode;
use lattice_core::HttpError;
use thiserror::Error;

/// Errors that can occur while relaying a completion request
#[derive(Debug, Error)]
pub enum RelayError {
    /// Client sent a malformed or invalid request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Requested model is not in the supported set
    #[error("unsupported model: {model}")]
    UnsupportedModel { model: String },

    /// Bedrock returned an error
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Error while consuming the Bedrock response stream
    #[error("streaming error: {0}")]
    Streaming(String),

    /// Bedrock returned a payload we could not decode
    #[error("decode error: {0}")]
    Decode(String),

    /// Configured backend protocol has no implementation yet
    #[error("protocol not implemented: {0}")]
    NotImplemented(&'static str),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl HttpError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::UnsupportedModel { .. } => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Streaming(_) | Self::Decode(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) | Self::UnsupportedModel { .. } => "invalid_request_error",
            Self::Upstream(_) | Self::Streaming(_) | Self::Decode(_) | Self::Internal(_) => {
                "api_error"
            }
            Self::NotImplemented(_) => "not_implemented",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}
