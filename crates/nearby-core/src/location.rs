//! Location domain types shared by the acquisition service and its hosts.
//!
//! [`LocationState`] is the only mutable entity. It is owned by whichever
//! component composes the service and is only written by an acquisition cycle
//! or by restore-on-start. [`PersistedLocation`] is the JSON record kept under
//! [`LOCATION_STORE_KEY`] between sessions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed key holding the last acquired location in the key-value store.
pub const LOCATION_STORE_KEY: &str = "nearby.location";

/// A device fix. Values are kept exactly as the platform reported them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Options for a one-shot device position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the platform may hand back. Zero forces a fresh fix.
    pub maximum_age: Duration,
}

impl PositionOptions {
    pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

    #[must_use]
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            ..Self::default()
        }
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(Self::DEFAULT_TIMEOUT_MS),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Classification of the most recent acquisition failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationErrorKind {
    /// The user declined the location permission prompt.
    PermissionDenied,
    /// The platform could not obtain a fix.
    PositionUnavailable,
    /// No fix arrived within the position timeout.
    Timeout,
    /// The host exposes no geolocation capability at all.
    Unsupported,
    /// Coordinates were acquired but the address lookup failed.
    GeocodeFailed,
    /// The platform reported an error code outside the known set.
    Unknown(u16),
}

impl LocationErrorKind {
    /// Soft failures leave the acquisition successful overall.
    #[must_use]
    pub fn is_soft(self) -> bool {
        matches!(self, LocationErrorKind::GeocodeFailed)
    }
}

impl std::fmt::Display for LocationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationErrorKind::PermissionDenied => write!(f, "location permission denied"),
            LocationErrorKind::PositionUnavailable => write!(f, "location information unavailable"),
            LocationErrorKind::Timeout => write!(f, "location request timed out"),
            LocationErrorKind::Unsupported => {
                write!(f, "geolocation is not supported on this device")
            }
            LocationErrorKind::GeocodeFailed => write!(f, "could not resolve an address"),
            LocationErrorKind::Unknown(code) => {
                write!(f, "unknown location error (code {code})")
            }
        }
    }
}

/// Snapshot of the location acquisition state exposed to consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationState {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub is_loading: bool,
    pub last_error: Option<LocationErrorKind>,
}

impl LocationState {
    /// Returns the coordinates when both halves are present.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_location(&self) -> bool {
        self.coordinates().is_some()
    }

    /// Copies a persisted record into the state without touching the
    /// loading flag or the error slot.
    pub fn apply_persisted(&mut self, record: &PersistedLocation) {
        self.latitude = Some(record.latitude);
        self.longitude = Some(record.longitude);
        self.address.clone_from(&record.address);
    }

    /// Empties the location fields after a hard failure.
    pub fn clear_location(&mut self) {
        self.latitude = None;
        self.longitude = None;
        self.address = None;
    }
}

/// The record written under [`LOCATION_STORE_KEY`].
///
/// `address` is omitted entirely, not written as `null`, when the address
/// lookup failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl PersistedLocation {
    #[must_use]
    pub fn new(coords: Coordinates, address: Option<String>) -> Self {
        Self {
            latitude: coords.latitude,
            longitude: coords.longitude,
            address,
        }
    }
}

/// Severity of a notice sent to the UI notification surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}
