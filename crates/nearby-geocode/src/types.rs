//! Reverse-geocoding response types.
//!
//! Parsing is deliberately forgiving: any JSON body is accepted, and a
//! missing display name yields an empty string rather than an error.

use serde::Deserialize;
use serde_json::Value;

/// Result of a reverse lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReverseGeocode {
    /// Human-readable address. Empty when the service returned none.
    pub display_name: String,
    pub details: AddressDetails,
}

/// Structured address components from the `address` object (`addressdetails=1`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AddressDetails {
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl AddressDetails {
    /// City, town, or village, whichever the service filled first.
    #[must_use]
    pub fn locality(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
    }
}

impl ReverseGeocode {
    /// Extracts what it can from an arbitrary response body.
    ///
    /// Looks for a top-level `display_name` first, then the first entry of a
    /// `results` array (`display_name` or `formatted_address`).
    #[must_use]
    pub fn from_value(body: &Value) -> Self {
        let display_name = body
            .get("display_name")
            .and_then(Value::as_str)
            .or_else(|| {
                let first = body.get("results")?.as_array()?.first()?;
                first
                    .get("display_name")
                    .or_else(|| first.get("formatted_address"))
                    .and_then(Value::as_str)
            })
            .unwrap_or_default()
            .to_owned();

        let details = body
            .get("address")
            .and_then(|a| AddressDetails::deserialize(a).ok())
            .unwrap_or_default();

        Self {
            display_name,
            details,
        }
    }
}
