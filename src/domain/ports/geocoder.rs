use crate::domain::entities::{GeoPoint, StreetAddress};
use crate::domain::errors::DomainResult;

/// External address-to-coordinates collaborator. `None` means the address
/// could not be resolved; callers must skip location-dependent work rather
/// than fall back to an un-located query.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, address: &StreetAddress) -> DomainResult<Option<GeoPoint>>;
}
