use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::entities::{
    assignable_candidates, AgentCandidate, AgentSearchQuery, Booking, StreetAddress,
};
use crate::domain::errors::DomainResult;
use crate::domain::ports::{DispatchApi, Geocoder};

/// On-demand nearest-available-agent search with a per-booking result cache.
/// Searches never run against an un-located address: a booking with no
/// coordinates (or a draft whose geocode finds nothing) yields an empty
/// candidate list instead.
#[derive(Clone)]
pub struct AvailabilityService {
    api: Arc<dyn DispatchApi>,
    geocoder: Arc<dyn Geocoder>,
    cache: Arc<Mutex<HashMap<i64, Vec<AgentCandidate>>>>,
}

impl AvailabilityService {
    pub fn new(api: Arc<dyn DispatchApi>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            api,
            geocoder,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run a fresh search for an existing booking and replace that booking's
    /// cached result. This is the "refresh" action; results never merge.
    pub async fn search_for_booking(&self, booking: &Booking) -> DomainResult<Vec<AgentCandidate>> {
        let Some(point) = booking.coordinates() else {
            warn!(
                "booking {} has no geocoded location; skipping agent search",
                booking.booking_id
            );
            self.cache.lock().await.insert(booking.booking_id, Vec::new());
            return Ok(Vec::new());
        };

        let query = AgentSearchQuery {
            latitude: point.lat,
            longitude: point.lon,
            booking_date: booking.booking_date,
            booking_time: booking.booking_time,
        };
        let candidates = self.api.search_agents(&query).await?;

        self.cache
            .lock()
            .await
            .insert(booking.booking_id, candidates.clone());
        Ok(candidates)
    }

    /// Cached candidates for a booking, searching on first use.
    pub async fn candidates_for_booking(
        &self,
        booking: &Booking,
    ) -> DomainResult<Vec<AgentCandidate>> {
        if let Some(cached) = self.cache.lock().await.get(&booking.booking_id) {
            return Ok(cached.clone());
        }
        self.search_for_booking(booking).await
    }

    /// The candidates a user may actually pick: the available subset of the
    /// latest search. Unavailable candidates stay cached for diagnostics.
    pub async fn assignable_for_booking(
        &self,
        booking: &Booking,
    ) -> DomainResult<Vec<AgentCandidate>> {
        let candidates = self.candidates_for_booking(booking).await?;
        Ok(assignable_candidates(&candidates))
    }

    /// Search for a draft being composed: the address is geocoded just in
    /// time, and a failed geocode skips the search entirely.
    pub async fn search_for_draft(
        &self,
        address: &StreetAddress,
        booking_date: NaiveDate,
        booking_time: NaiveTime,
    ) -> DomainResult<Vec<AgentCandidate>> {
        let Some(point) = self.geocoder.locate(address).await? else {
            warn!(
                "address '{}' could not be geocoded; skipping agent search",
                address.street_line()
            );
            return Ok(Vec::new());
        };

        let query = AgentSearchQuery {
            latitude: point.lat,
            longitude: point.lon,
            booking_date,
            booking_time,
        };
        self.api.search_agents(&query).await
    }

    /// Drop a booking's cached search result (e.g. when its card unmounts).
    pub async fn forget_booking(&self, booking_id: i64) {
        self.cache.lock().await.remove(&booking_id);
    }
}
