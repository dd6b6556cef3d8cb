use serde::{Deserialize, Serialize};

/// A geocoded coordinate pair. Always produced atomically: either the whole
/// point exists or no location is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Street address as collected on the new-appointment form. Only the street
/// and postal code participate in geocoding; the rest rides along into the
/// creation payload.
#[derive(Debug, Clone, Default)]
pub struct StreetAddress {
    pub street_number: String,
    pub street_name: String,
    pub postal_code: String,
    pub city: String,
    pub state_province: String,
    pub country: String,
}

impl StreetAddress {
    /// The "street" component in the geocoder's structured-query format.
    pub fn street_line(&self) -> String {
        format!("{} {}", self.street_number.trim(), self.street_name.trim())
            .trim()
            .to_string()
    }
}
