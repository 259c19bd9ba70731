use thiserror::Error;

pub type Result<T> = std::result::Result<T, TriageError>;

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    #[error("Invalid ticket ID: {0:?}")]
    InvalidTicketId(String),

    #[error("Invalid ticket status: {0}")]
    InvalidStatus(String),

    #[error("Invalid ticket move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{0}")]
    Other(String),
}

impl TriageError {
    /// True when the error references a ticket the backend does not know.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TicketNotFound(_))
    }

    /// True for failures of the backing store itself (network, disk, database).
    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_) | Self::IoError(_) | Self::SerializationError(_) | Self::Http(_)
        )
    }
}

#[cfg(feature = "sqlite-storage")]
impl From<rusqlite::Error> for TriageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[cfg(feature = "http-storage")]
impl From<reqwest::Error> for TriageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(TriageError::TicketNotFound("TKT-001".to_string()).is_not_found());
        assert!(!TriageError::Persistence("disk full".to_string()).is_not_found());

        assert!(TriageError::Persistence("disk full".to_string()).is_persistence_failure());
        assert!(TriageError::Http("502".to_string()).is_persistence_failure());
        assert!(!TriageError::InvalidStatus("done".to_string()).is_persistence_failure());
    }

    #[test]
    fn test_error_messages() {
        let err = TriageError::InvalidTransition {
            from: "escalated".to_string(),
            to: "ai_resolved".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid ticket move from escalated to ai_resolved");
    }
}
