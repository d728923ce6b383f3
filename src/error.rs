//! Render error types.

use thiserror::Error;

/// Errors that can occur in the render cache and its GPU layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Failed to initialize a backend or device.
    #[error("initialization failed: {0}")]
    InitializationFailed(String),
    /// Failed to create a GPU resource (buffer, pipeline, bind group).
    #[error("resource creation failed: {0}")]
    ResourceCreationFailed(String),
    /// An invalid parameter was provided.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// A requested feature is not supported by the active backend.
    #[error("feature not supported: {0}")]
    FeatureNotSupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::InitializationFailed("no GPU found".to_string());
        assert_eq!(err.to_string(), "initialization failed: no GPU found");

        let err = RenderError::InvalidParameter("buffer size cannot be zero".to_string());
        assert_eq!(
            err.to_string(),
            "invalid parameter: buffer size cannot be zero"
        );
    }
}
