//! HTTP client for the Nominatim `reverse` endpoint.
//!
//! One stateless GET per lookup. Non-2xx statuses and non-JSON bodies are
//! errors; any JSON body is accepted and parsed leniently by
//! [`ReverseGeocode::from_value`].

use std::time::Duration;

use nearby_core::{AppConfig, Coordinates};
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::types::ReverseGeocode;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Request settings shared by every lookup a [`GeocodeClient`] makes.
#[derive(Debug, Clone)]
pub struct GeocodeOptions {
    pub user_agent: String,
    /// Sent as `Accept-Language`.
    pub language: String,
    /// Nominatim detail level, 0 (country) to 18 (building).
    pub zoom: u8,
    /// Optional whole-request timeout. `None` waits for the service indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for GeocodeOptions {
    fn default() -> Self {
        Self {
            user_agent: "nearby/0.1 (location-acquisition)".to_owned(),
            language: "en".to_owned(),
            zoom: 18,
            timeout_secs: None,
        }
    }
}

impl From<&AppConfig> for GeocodeOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.geocoder_user_agent.clone(),
            language: config.geocoder_language.clone(),
            zoom: config.geocoder_zoom,
            timeout_secs: config.geocoder_timeout_secs,
        }
    }
}

/// Client for a Nominatim-compatible reverse-geocoding service.
///
/// Use [`GeocodeClient::new`] for the public OSM instance or
/// [`GeocodeClient::with_base_url`] to point at a self-hosted instance or a
/// mock server in tests.
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
    language: String,
    zoom: u8,
}

impl GeocodeClient {
    /// Creates a client pointed at the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(options: &GeocodeOptions) -> Result<Self, GeocodeError> {
        Self::with_base_url(DEFAULT_BASE_URL, options)
    }

    /// Creates a client from the application config.
    ///
    /// # Errors
    ///
    /// Same as [`GeocodeClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        Self::with_base_url(&config.geocoder_base_url, &GeocodeOptions::from(config))
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(base_url: &str, options: &GeocodeOptions) -> Result<Self, GeocodeError> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.as_str());
        if let Some(secs) = options.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        // Exactly one trailing slash so `join("reverse")` appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            language: options.language.clone(),
            zoom: options.zoom,
        })
    }

    /// Resolves coordinates to an address.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure.
    /// - [`GeocodeError::UnexpectedStatus`] on a non-2xx response.
    /// - [`GeocodeError::Deserialize`] if the body is not JSON.
    pub async fn reverse(&self, coords: Coordinates) -> Result<ReverseGeocode, GeocodeError> {
        let url = self.build_url(coords)?;
        tracing::debug!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            %url,
            "reverse geocoding"
        );
        let body = self.request_json(&url).await?;
        Ok(ReverseGeocode::from_value(&body))
    }

    /// Builds the `reverse` URL with percent-encoded query parameters.
    fn build_url(&self, coords: Coordinates) -> Result<Url, GeocodeError> {
        let mut url = self
            .base_url
            .join("reverse")
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("format", "jsonv2")
            .append_pair("lat", &coords.latitude.to_string())
            .append_pair("lon", &coords.longitude.to_string())
            .append_pair("zoom", &self.zoom.to_string())
            .append_pair("addressdetails", "1");
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx status, and parses the body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, GeocodeError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT_LANGUAGE, self.language.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}
