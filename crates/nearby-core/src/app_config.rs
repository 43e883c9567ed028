use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_language: String,
    pub geocoder_zoom: u8,
    /// `None` leaves the reverse-geocode request without a client-side timeout.
    pub geocoder_timeout_secs: Option<u64>,
    pub position_timeout_ms: u64,
    pub store_path: PathBuf,
}
