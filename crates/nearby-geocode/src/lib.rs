//! Reverse-geocoding client for Nominatim-compatible services.

mod client;
mod error;
mod types;

pub use client::{GeocodeClient, GeocodeOptions};
pub use error::GeocodeError;
pub use types::{AddressDetails, ReverseGeocode};
