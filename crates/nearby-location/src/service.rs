//! The location acquisition cycle.
//!
//! [`LocationService::detect_location`] asks the device for a fresh fix, then
//! resolves it to an address. Losing the fix is a hard failure; losing only the
//! address is a soft one and the call still succeeds. Each started attempt is
//! stamped with a generation number and only the latest generation may write
//! state or the persisted record.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nearby_core::{
    Coordinates, LocationErrorKind, LocationState, NoticeLevel, PersistedLocation,
    PositionOptions, LOCATION_STORE_KEY,
};
use tokio::sync::watch;

use crate::geocoder::ReverseGeocoder;
use crate::notify::{Notifier, TracingNotifier};
use crate::provider::GeolocationProvider;
use crate::store::KeyValueStore;

/// Owns the [`LocationState`] for one host component.
///
/// `provider` is `None` when the host has no geolocation capability; every
/// acquisition then fails with [`LocationErrorKind::Unsupported`] without
/// touching the device.
pub struct LocationService<G, R, S> {
    provider: Option<G>,
    geocoder: R,
    store: S,
    notifier: Arc<dyn Notifier>,
    options: PositionOptions,
    inner: Mutex<Inner>,
}

struct Inner {
    state: LocationState,
    generation: u64,
    /// Result channel of the latest attempt while it is unsettled.
    in_flight: Option<watch::Receiver<Option<bool>>>,
}

enum Attempt<'a> {
    Started(PendingAttempt<'a>),
    Joined(watch::Receiver<Option<bool>>),
}

/// An attempt this call leads. Dropping it unsettled, for example when the
/// caller's future is cancelled, clears the loading flag and the in-flight
/// slot if it is still the latest generation. Joiners then start over.
struct PendingAttempt<'a> {
    inner: &'a Mutex<Inner>,
    generation: u64,
    done: watch::Sender<Option<bool>>,
    settled: bool,
}

impl PendingAttempt<'_> {
    fn finish(&mut self, acquired: bool) {
        self.settled = true;
        self.done.send_replace(Some(acquired));
    }
}

impl Drop for PendingAttempt<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.generation == self.generation {
            inner.state.is_loading = false;
            inner.in_flight = None;
            tracing::debug!(
                generation = self.generation,
                "location request dropped before settling"
            );
        }
    }
}

enum Outcome {
    Located {
        coords: Coordinates,
        address: Option<String>,
    },
    Failed(LocationErrorKind),
}

impl<G, R, S> LocationService<G, R, S>
where
    G: GeolocationProvider,
    R: ReverseGeocoder,
    S: KeyValueStore,
{
    /// Creates the service and restores the last persisted location, if any.
    pub fn new(provider: Option<G>, geocoder: R, store: S) -> Self {
        let service = Self {
            provider,
            geocoder,
            store,
            notifier: Arc::new(TracingNotifier),
            options: PositionOptions::default(),
            inner: Mutex::new(Inner {
                state: LocationState::default(),
                generation: 0,
                in_flight: None,
            }),
        };
        service.restore();
        service
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn with_position_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LocationState {
        self.lock().state.clone()
    }

    /// Loads the persisted record into state.
    ///
    /// Never touches `is_loading` or the network. A value that does not parse
    /// is removed from the store and treated as absent.
    pub fn restore(&self) {
        if let Some(record) = load_persisted(&self.store) {
            self.lock().state.apply_persisted(&record);
        }
    }

    /// Acquires the current location and resolves it to an address.
    ///
    /// Returns `true` whenever coordinates were obtained, even if the address
    /// lookup failed. Returns `false` only when no coordinates could be
    /// obtained. Failures are recorded in [`LocationState::last_error`] and
    /// never retried.
    ///
    /// With `force_refresh == false` a call made while another attempt is in
    /// flight waits for that attempt and returns its result. With
    /// `force_refresh == true` a new attempt always starts and the older one's
    /// result is discarded when it settles.
    pub async fn detect_location(&self, force_refresh: bool) -> bool {
        let Some(provider) = self.provider.as_ref() else {
            self.fail_unsupported();
            return false;
        };

        let mut attempt = loop {
            match self.begin(force_refresh) {
                Attempt::Started(attempt) => break attempt,
                Attempt::Joined(rx) => {
                    if let Some(acquired) = Self::join(rx).await {
                        return acquired;
                    }
                    // The leading call was dropped before settling.
                }
            }
        };

        let outcome = self.acquire(provider).await;
        let acquired = self.settle(attempt.generation, outcome);
        attempt.finish(acquired);
        acquired
    }

    fn begin(&self, force_refresh: bool) -> Attempt<'_> {
        let mut inner = self.lock();
        if let Some(rx) = inner.in_flight.as_ref().filter(|_| !force_refresh) {
            tracing::debug!(
                generation = inner.generation,
                "joining in-flight location request"
            );
            return Attempt::Joined(rx.clone());
        }

        inner.generation += 1;
        let (done, rx) = watch::channel(None);
        inner.in_flight = Some(rx);
        inner.state.is_loading = true;
        inner.state.last_error = None;
        Attempt::Started(PendingAttempt {
            inner: &self.inner,
            generation: inner.generation,
            done,
            settled: false,
        })
    }

    /// Waits for the leading call. `None` when it was dropped before settling.
    async fn join(mut rx: watch::Receiver<Option<bool>>) -> Option<bool> {
        let settled = rx.wait_for(Option::is_some).await.ok().and_then(|s| *s);
        settled
    }

    async fn acquire(&self, provider: &G) -> Outcome {
        let request = provider.current_position(self.options);
        let coords = match tokio::time::timeout(self.options.timeout, request).await {
            Ok(Ok(coords)) => coords,
            Ok(Err(e)) => {
                tracing::warn!(code = e.code, error = %e, "device position request failed");
                return Outcome::Failed(e.classify());
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.options.timeout.as_millis(),
                    "device position request timed out"
                );
                return Outcome::Failed(LocationErrorKind::Timeout);
            }
        };

        match self.geocoder.reverse_geocode(coords).await {
            Ok(address) => Outcome::Located {
                coords,
                address: Some(address),
            },
            Err(e) => {
                tracing::warn!(error = %e, "reverse geocoding failed; keeping coordinates only");
                Outcome::Located {
                    coords,
                    address: None,
                }
            }
        }
    }

    /// Applies `outcome` if `generation` is still the latest attempt.
    /// Returns whether coordinates were acquired.
    fn settle(&self, generation: u64, outcome: Outcome) -> bool {
        let acquired = matches!(outcome, Outcome::Located { .. });

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(
                generation,
                latest = inner.generation,
                "discarding stale location result"
            );
            return acquired;
        }
        inner.in_flight = None;

        let state = &mut inner.state;
        state.is_loading = false;
        let notice = match outcome {
            Outcome::Located { coords, address } => {
                state.latitude = Some(coords.latitude);
                state.longitude = Some(coords.longitude);
                state.address.clone_from(&address);
                state.last_error = address.is_none().then_some(LocationErrorKind::GeocodeFailed);

                tracing::info!(
                    latitude = coords.latitude,
                    longitude = coords.longitude,
                    address = address.as_deref().unwrap_or(""),
                    "location acquired"
                );
                let notice = match &address {
                    Some(address) if !address.is_empty() => {
                        (NoticeLevel::Success, format!("Location detected: {address}"))
                    }
                    Some(_) => (NoticeLevel::Success, "Location detected".to_owned()),
                    None => (
                        NoticeLevel::Warning,
                        "Location detected, but the address could not be resolved".to_owned(),
                    ),
                };
                // Written under the lock so store order follows generation order.
                self.persist(&PersistedLocation::new(coords, address));
                notice
            }
            Outcome::Failed(kind) => {
                state.clear_location();
                state.last_error = Some(kind);
                (NoticeLevel::Error, capitalize(&kind.to_string()))
            }
        };
        drop(inner);

        self.notifier.notify(notice.0, &notice.1);
        acquired
    }

    fn fail_unsupported(&self) {
        {
            let mut inner = self.lock();
            inner.state.is_loading = false;
            inner.state.last_error = Some(LocationErrorKind::Unsupported);
        }
        tracing::warn!("geolocation capability unavailable");
        self.notifier.notify(
            NoticeLevel::Error,
            &capitalize(&LocationErrorKind::Unsupported.to_string()),
        );
    }

    fn persist(&self, record: &PersistedLocation) {
        let result = serde_json::to_string(record)
            .map_err(crate::StoreError::from)
            .and_then(|json| self.store.set(LOCATION_STORE_KEY, &json));
        if let Err(e) = result {
            tracing::warn!(error = %e, "could not persist location");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reads the record under [`LOCATION_STORE_KEY`].
///
/// A value that does not parse is removed from the store. Read failures are
/// logged and treated as no record.
pub fn load_persisted<S: KeyValueStore>(store: &S) -> Option<PersistedLocation> {
    let raw = match store.get(LOCATION_STORE_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(error = %e, "could not read persisted location");
            return None;
        }
    };

    match serde_json::from_str::<PersistedLocation>(&raw) {
        Ok(record) => {
            tracing::debug!(
                latitude = record.latitude,
                longitude = record.longitude,
                "restored persisted location"
            );
            Some(record)
        }
        Err(e) => {
            tracing::warn!(error = %e, "discarding corrupt persisted location");
            if let Err(e) = store.remove(LOCATION_STORE_KEY) {
                tracing::warn!(error = %e, "could not remove corrupt persisted location");
            }
            None
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
