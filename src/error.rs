use thiserror::Error;

/// Everything that can stop a single "Generate Poem" action.
///
/// The set is deliberately flat. `MissingCredential` and `MissingImage` are
/// precondition checks; everything that goes wrong after the request has been
/// built is folded into `ExternalService`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("API key is required. Please enter your API key or set it in the .env file.")]
    MissingCredential,

    #[error("Please upload an image first.")]
    MissingImage,

    #[error(transparent)]
    ExternalService(#[from] ServiceError),
}

/// Failure inside the decode + remote call boundary.
///
/// The variants only exist for logging. `Display` is the underlying message
/// with no prefix, so the presenter can embed it as-is.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Decode(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Blocked(String),

    #[error("{0}")]
    EmptyResponse(String),

    #[error("{0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    /// Short label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Decode(_) | ServiceError::UnsupportedFormat(_) => "decode",
            ServiceError::Network(_) => "network",
            ServiceError::Api { .. } => "api",
            ServiceError::Blocked(_) => "blocked",
            ServiceError::EmptyResponse(_) => "empty_response",
            ServiceError::Serialization(_) => "serialization",
        }
    }
}

impl From<image::ImageError> for ServiceError {
    fn from(err: image::ImageError) -> Self {
        ServiceError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_messages() {
        assert_eq!(
            AppError::MissingCredential.to_string(),
            "API key is required. Please enter your API key or set it in the .env file."
        );
        assert_eq!(
            AppError::MissingImage.to_string(),
            "Please upload an image first."
        );
    }

    #[test]
    fn test_service_error_display_is_bare_message() {
        let err = ServiceError::Api {
            status: 429,
            message: "rate limit exceeded".into(),
        };
        assert_eq!(err.to_string(), "rate limit exceeded");
        assert_eq!(err.kind(), "api");

        let app: AppError = err.into();
        assert_eq!(app.to_string(), "rate limit exceeded");
    }

    #[test]
    fn test_decode_kind() {
        assert_eq!(ServiceError::Decode("bad".into()).kind(), "decode");
        assert_eq!(
            ServiceError::UnsupportedFormat("gif".into()).kind(),
            "decode"
        );
    }
}
