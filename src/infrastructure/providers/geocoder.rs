use serde::Deserialize;
use tracing::warn;

use crate::domain::entities::{GeoPoint, StreetAddress};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::Geocoder;

/// Nominatim-style geocoding adapter. The service requires every consumer to
/// identify itself, so the client is built with a caller-supplied User-Agent.
/// Lookups are best-effort: a transport failure behaves like "no match" and
/// the caller skips location-dependent work.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                DomainError::Transport(format!("failed to build geocoder client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Geocoder for NominatimGeocoder {
    async fn locate(&self, address: &StreetAddress) -> DomainResult<Option<GeoPoint>> {
        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("street", address.street_line()),
                ("postalcode", address.postal_code.trim().to_string()),
                ("format", "json".to_string()),
            ]);

        let response = match request.send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("geocoder returned HTTP {}", response.status());
                return Ok(None);
            }
            Err(e) => {
                warn!("geocoder request failed: {}", e);
                return Ok(None);
            }
        };

        let places: Vec<Place> = match response.json().await {
            Ok(places) => places,
            Err(e) => {
                warn!("geocoder returned an unexpected body: {}", e);
                return Ok(None);
            }
        };

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        match (place.lat.parse::<f64>(), place.lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => Ok(Some(GeoPoint { lat, lon })),
            _ => {
                warn!("geocoder returned unparseable coordinates");
                Ok(None)
            }
        }
    }
}
