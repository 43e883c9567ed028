use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["nearby-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_show_command() {
    let cli = Cli::try_parse_from(["nearby-cli", "show"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Show)));
}

#[test]
fn parses_locate_without_position() {
    let cli = Cli::try_parse_from(["nearby-cli", "locate"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Locate {
            lat: None,
            lon: None,
            force_refresh: false
        })
    ));
}

#[test]
fn parses_locate_with_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "nearby-cli",
        "locate",
        "--lat",
        "-33.8688",
        "--lon",
        "151.2093",
        "--force-refresh",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Locate {
            lat: Some(lat),
            lon: Some(lon),
            force_refresh: true,
        }) => {
            assert!((lat + 33.8688).abs() < f64::EPSILON);
            assert!((lon - 151.2093).abs() < f64::EPSILON);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn locate_lat_requires_lon() {
    let result = Cli::try_parse_from(["nearby-cli", "locate", "--lat", "12.97"]);
    assert!(result.is_err(), "--lat without --lon should be rejected");
}

#[test]
fn geocode_requires_both_coordinates() {
    assert!(Cli::try_parse_from(["nearby-cli", "geocode", "--lat", "1"]).is_err());
    let cli = Cli::try_parse_from(["nearby-cli", "geocode", "--lat", "1", "--lon", "-2"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Geocode { .. })));
}

fn test_config(base_url: &str, store_path: &std::path::Path) -> nearby_core::AppConfig {
    nearby_core::AppConfig {
        log_level: "debug".to_owned(),
        geocoder_base_url: base_url.to_owned(),
        geocoder_user_agent: "nearby-cli-test".to_owned(),
        geocoder_language: "en".to_owned(),
        geocoder_zoom: 18,
        geocoder_timeout_secs: Some(5),
        position_timeout_ms: 1_000,
        store_path: store_path.to_path_buf(),
    }
}

#[tokio::test]
async fn locate_persists_record_to_store_file() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "display_name": "Sydney, Australia" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("store.json");
    let config = test_config(&server.uri(), &store_path);

    commands::locate(&config, Some((-33.8688, 151.2093)), true)
        .await
        .expect("locate should succeed");

    let raw = std::fs::read_to_string(&store_path).unwrap();
    assert!(raw.contains("Sydney, Australia"), "store file: {raw}");
    commands::show(&config).expect("show should succeed");
}

#[tokio::test]
async fn locate_without_position_reports_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config("http://127.0.0.1:1", &dir.path().join("store.json"));

    let err = commands::locate(&config, None, false).await.unwrap_err();
    assert!(
        err.to_string().contains("not supported"),
        "unexpected error: {err}"
    );
    assert!(!dir.path().join("store.json").exists());
}

#[test]
fn show_reads_store_without_valid_geocoder_url() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("store.json");
    let record = serde_json::json!({
        "nearby.location": r#"{"latitude":19.07,"longitude":72.87,"address":"Mumbai"}"#
    });
    std::fs::write(&store_path, record.to_string()).unwrap();

    let config = test_config("not a url", &store_path);
    assert!(
        nearby_geocode::GeocodeClient::from_config(&config).is_err(),
        "base url should be rejected by the geocoder"
    );
    commands::show(&config).expect("show should not depend on the geocoder");
}

#[test]
fn show_with_missing_store_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config("not a url", &dir.path().join("absent.json"));
    commands::show(&config).expect("show should succeed without a store file");
}
