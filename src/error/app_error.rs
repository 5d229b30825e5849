use thiserror::Error;

/// Failures of the session core's own machinery.
///
/// Expired, unauthenticated, and forbidden are deliberately *not* here; they
/// are ordinary session states surfaced through `SessionState` and
/// `AccessDecision`, never raised as errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Session storage unavailable")]
    Storage {
        message: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Session record could not be encoded")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Internal error")]
    ConfigurationError {
        message: String,
        #[source]
        source: figment::Error,
    },
}

impl AppError {
    pub fn storage(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            message: message.into(),
            source,
        }
    }

    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::ConfigurationError {
            message: "Failed to read configuration".to_string(),
            source: e,
        }
    }
}
