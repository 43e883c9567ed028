use std::future::Future;

use nearby_core::{Coordinates, PositionOptions};

use crate::error::PositionError;

/// One-shot access to the device's current position.
///
/// Implementations answer a single request; there is no watch mode.
pub trait GeolocationProvider: Send + Sync {
    fn current_position(
        &self,
        options: PositionOptions,
    ) -> impl Future<Output = Result<Coordinates, PositionError>> + Send;
}

/// Provider that always answers with the same outcome.
///
/// Used by headless hosts that know their position up front.
#[derive(Debug, Clone)]
pub struct FixedPositionProvider {
    outcome: Result<Coordinates, PositionError>,
}

impl FixedPositionProvider {
    #[must_use]
    pub fn new(coords: Coordinates) -> Self {
        Self { outcome: Ok(coords) }
    }

    #[must_use]
    pub fn failing(error: PositionError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

impl GeolocationProvider for FixedPositionProvider {
    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> Result<Coordinates, PositionError> {
        self.outcome.clone()
    }
}
