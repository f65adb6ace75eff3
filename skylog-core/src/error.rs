use thiserror::Error;

/// Error returned by every API operation.
///
/// The backend reports every failure class (validation, credentials,
/// authorization, transport) the same way, so there is a single error
/// type carrying one human-readable message and no variant per class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Fallback for failed responses that carry no `error` field.
    pub fn request_failed() -> Self {
        Self::new("Request failed")
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_the_bare_message() {
        let err = ApiError::new("Invalid credentials.");
        assert_eq!(err.to_string(), "Invalid credentials.");
    }

    #[test]
    fn fallback_message() {
        assert_eq!(ApiError::request_failed().message(), "Request failed");
    }
}
