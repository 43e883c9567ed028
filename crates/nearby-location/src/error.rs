use std::path::PathBuf;

use nearby_core::LocationErrorKind;
use thiserror::Error;

/// Failure reported by the device geolocation capability.
///
/// `code` follows the platform convention: 1 permission denied,
/// 2 position unavailable, 3 timeout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("geolocation error {code}: {message}")]
pub struct PositionError {
    pub code: u16,
    pub message: String,
}

impl PositionError {
    pub const PERMISSION_DENIED: u16 = 1;
    pub const POSITION_UNAVAILABLE: u16 = 2;
    pub const TIMEOUT: u16 = 3;

    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn classify(&self) -> LocationErrorKind {
        match self.code {
            Self::PERMISSION_DENIED => LocationErrorKind::PermissionDenied,
            Self::POSITION_UNAVAILABLE => LocationErrorKind::PositionUnavailable,
            Self::TIMEOUT => LocationErrorKind::Timeout,
            other => LocationErrorKind::Unknown(other),
        }
    }
}

/// Errors from a [`crate::KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object of strings.
    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_platform_codes() {
        assert_eq!(
            PositionError::new(1, "denied").classify(),
            LocationErrorKind::PermissionDenied
        );
        assert_eq!(
            PositionError::new(2, "no fix").classify(),
            LocationErrorKind::PositionUnavailable
        );
        assert_eq!(
            PositionError::new(3, "slow").classify(),
            LocationErrorKind::Timeout
        );
    }

    #[test]
    fn unknown_code_is_generic_failure() {
        assert_eq!(
            PositionError::new(7, "weird").classify(),
            LocationErrorKind::Unknown(7)
        );
    }
}
