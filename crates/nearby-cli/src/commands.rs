use anyhow::Context;
use nearby_core::{AppConfig, Coordinates, LocationState, PositionOptions};
use nearby_geocode::GeocodeClient;
use nearby_location::{load_persisted, FixedPositionProvider, JsonFileStore, LocationService};

type CliService = LocationService<FixedPositionProvider, GeocodeClient, JsonFileStore>;

fn build_service(
    config: &AppConfig,
    provider: Option<FixedPositionProvider>,
) -> anyhow::Result<CliService> {
    let geocoder =
        GeocodeClient::from_config(config).context("failed to build reverse-geocoding client")?;
    let store = JsonFileStore::new(&config.store_path);
    Ok(LocationService::new(provider, geocoder, store)
        .with_position_options(PositionOptions::with_timeout_ms(config.position_timeout_ms)))
}

fn print_state(state: &LocationState) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}

pub(crate) async fn locate(
    config: &AppConfig,
    position: Option<(f64, f64)>,
    force_refresh: bool,
) -> anyhow::Result<()> {
    let provider =
        position.map(|(lat, lon)| FixedPositionProvider::new(Coordinates::new(lat, lon)));
    let service = build_service(config, provider)?;

    let acquired = service.detect_location(force_refresh).await;
    let state = service.state();
    print_state(&state)?;

    if !acquired {
        let reason = state
            .last_error
            .map_or_else(|| "unknown error".to_owned(), |kind| kind.to_string());
        anyhow::bail!("location could not be acquired: {reason}");
    }
    if let Some(kind) = state.last_error.filter(|kind| kind.is_soft()) {
        tracing::warn!(error = %kind, "coordinates acquired without an address");
    }
    Ok(())
}

/// Prints the persisted location. Reads only the store, so the geocoder
/// settings are never consulted.
pub(crate) fn show(config: &AppConfig) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.store_path);
    let mut state = LocationState::default();
    match load_persisted(&store) {
        Some(record) => state.apply_persisted(&record),
        None => tracing::info!(store = %store.path().display(), "no persisted location"),
    }
    print_state(&state)
}

pub(crate) async fn geocode(config: &AppConfig, lat: f64, lon: f64) -> anyhow::Result<()> {
    let client =
        GeocodeClient::from_config(config).context("failed to build reverse-geocoding client")?;
    let result = client
        .reverse(Coordinates::new(lat, lon))
        .await
        .with_context(|| format!("reverse geocoding failed for ({lat}, {lon})"))?;

    let details = &result.details;
    println!("address:  {}", result.display_name);
    let fields = [
        ("road", details.road.as_deref()),
        ("suburb", details.suburb.as_deref()),
        ("locality", details.locality()),
        ("state", details.state.as_deref()),
        ("postcode", details.postcode.as_deref()),
        ("country", details.country.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{:<9} {value}", format!("{label}:"));
        }
    }
    Ok(())
}
