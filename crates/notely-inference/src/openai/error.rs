//! Provider error classification.

use notely_core::Error;

/// Error classes reported by OpenAI-compatible providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorCode {
    /// Credential missing, invalid or revoked.
    AuthenticationError,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Prompt exceeds the model context window.
    ContextLengthExceeded,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl ProviderErrorCode {
    /// Determine error code from HTTP status and error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) => Self::AuthenticationError,
            (429, _) => Self::RateLimitExceeded,
            (404, _) | (_, "model_not_found") => Self::ModelNotFound,
            (400, _) if error_type.contains("context_length") => Self::ContextLengthExceeded,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Convert a provider failure into a notely Error.
///
/// Only credential rejection maps to [`Error::Unauthorized`]; it is the one
/// provider failure callers surface instead of degrading.
pub fn to_notely_error(code: ProviderErrorCode, message: &str) -> Error {
    match code {
        ProviderErrorCode::AuthenticationError => {
            Error::Unauthorized(format!("Authentication failed: {}", message))
        }
        ProviderErrorCode::RateLimitExceeded => {
            Error::Inference(format!("Rate limit exceeded: {}", message))
        }
        ProviderErrorCode::ModelNotFound => {
            Error::Inference(format!("Model not found: {}", message))
        }
        ProviderErrorCode::ContextLengthExceeded => {
            Error::Inference(format!("Context too long: {}", message))
        }
        ProviderErrorCode::ServerError => Error::Inference(format!("Server error: {}", message)),
        ProviderErrorCode::Unknown => Error::Inference(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_from_401() {
        let code = ProviderErrorCode::from_response(401, "invalid_api_key");
        assert_eq!(code, ProviderErrorCode::AuthenticationError);
    }

    #[test]
    fn test_error_code_from_429() {
        let code = ProviderErrorCode::from_response(429, "rate_limit_exceeded");
        assert_eq!(code, ProviderErrorCode::RateLimitExceeded);
    }

    #[test]
    fn test_error_code_from_context_length() {
        let code = ProviderErrorCode::from_response(400, "context_length_exceeded");
        assert_eq!(code, ProviderErrorCode::ContextLengthExceeded);
    }

    #[test]
    fn test_error_code_from_502() {
        let code = ProviderErrorCode::from_response(502, "bad_gateway");
        assert_eq!(code, ProviderErrorCode::ServerError);
    }

    #[test]
    fn test_error_code_from_unknown() {
        let code = ProviderErrorCode::from_response(418, "im_a_teapot");
        assert_eq!(code, ProviderErrorCode::Unknown);
    }

    #[test]
    fn test_auth_failure_is_unauthorized() {
        let err = to_notely_error(ProviderErrorCode::AuthenticationError, "Invalid API Key");
        assert!(matches!(err, Error::Unauthorized(_)));
        assert!(err.to_string().contains("Invalid API Key"));
    }

    #[test]
    fn test_server_failure_is_inference() {
        let err = to_notely_error(ProviderErrorCode::ServerError, "overloaded");
        assert!(matches!(err, Error::Inference(_)));
    }
}
