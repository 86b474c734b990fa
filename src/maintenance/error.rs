//! Error types for the maintenance interceptor.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building the interceptor or serving its assets.
#[derive(Debug, Error)]
pub enum MaintenanceError {
    /// The maintenance page could not be read at construction time.
    #[error("Failed to read maintenance page '{path}': {source}")]
    Configuration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An option value cannot be turned into an HTTP status or header.
    #[error("Invalid maintenance option '{option}': {reason}")]
    InvalidOption { option: &'static str, reason: String },

    /// A polled asset was unreadable when a request asked for it.
    #[error("Maintenance asset '{path}' not found: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_mentions_path() {
        let err = MaintenanceError::Configuration {
            path: PathBuf::from("/srv/maintenance.html"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/srv/maintenance.html"));
    }

    #[test]
    fn test_invalid_option_names_the_option() {
        let err = MaintenanceError::InvalidOption {
            option: "httpContentType",
            reason: "invalid header value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid maintenance option 'httpContentType': invalid header value"
        );
    }
}
