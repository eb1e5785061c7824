//! Error types for Kino View

use thiserror::Error;

/// Result type alias for view operations
pub type Result<T> = std::result::Result<T, ViewError>;

/// View error types
#[derive(Error, Debug)]
pub enum ViewError {
    // Controls errors
    #[error("Controls failed to load: {0}")]
    ControlsLoad(#[source] anyhow::Error),

    // Lifecycle errors
    #[error("View is not set up")]
    NotSetup,

    #[error("View has been destroyed")]
    Destroyed,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl ViewError {
    /// Create a controls load error from any failure
    pub fn controls_load(cause: impl Into<anyhow::Error>) -> Self {
        ViewError::ControlsLoad(cause.into())
    }

    /// Returns true if the view stays usable after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ViewError::ControlsLoad(_))
    }

    /// Returns the error code reported with error events
    pub fn error_code(&self) -> &'static str {
        match self {
            ViewError::ControlsLoad(_) => "CONTROLS_LOAD",
            ViewError::NotSetup => "NOT_SETUP",
            ViewError::Destroyed => "DESTROYED",
            ViewError::InvalidConfig(_) => "INVALID_CONFIG",
            ViewError::ConfigParse(_) => "CONFIG_PARSE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_load_is_recoverable() {
        let err = ViewError::controls_load(anyhow::anyhow!("network down"));
        assert!(err.is_recoverable());
        assert_eq!(err.error_code(), "CONTROLS_LOAD");
        assert!(err.to_string().contains("network down"));
    }

    #[test]
    fn test_lifecycle_errors_are_fatal() {
        assert!(!ViewError::Destroyed.is_recoverable());
        assert!(!ViewError::NotSetup.is_recoverable());
    }

    #[test]
    fn test_config_errors_are_fatal() {
        let err = ViewError::InvalidConfig("breakpoints must ascend".into());
        assert!(!err.is_recoverable());
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
