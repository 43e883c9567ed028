//! Location acquisition: device fix, reverse geocoding, and restore-on-start.

mod error;
mod geocoder;
mod notify;
mod provider;
mod service;
mod store;

pub use error::{PositionError, StoreError};
pub use geocoder::ReverseGeocoder;
pub use notify::{Notifier, TracingNotifier};
pub use provider::{FixedPositionProvider, GeolocationProvider};
pub use service::{load_persisted, LocationService};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
