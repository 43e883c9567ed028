use std::future::Future;

use nearby_core::Coordinates;
use nearby_geocode::{GeocodeClient, GeocodeError};

/// Resolves coordinates to a display address.
///
/// An `Ok` with an empty string is a valid answer; only transport, status,
/// and body-format failures are errors.
pub trait ReverseGeocoder: Send + Sync {
    fn reverse_geocode(
        &self,
        coords: Coordinates,
    ) -> impl Future<Output = Result<String, GeocodeError>> + Send;
}

impl ReverseGeocoder for GeocodeClient {
    async fn reverse_geocode(&self, coords: Coordinates) -> Result<String, GeocodeError> {
        let result = self.reverse(coords).await?;
        Ok(result.display_name)
    }
}
