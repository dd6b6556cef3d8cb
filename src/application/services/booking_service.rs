use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::entities::{
    Booking, BookingDraft, BookingStatus, BookingUpdate, DispositionType, SaveDisposition, Session,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{DispatchApi, Geocoder};
use crate::shared::events::{EventBus, SystemEvent};

/// Service for the booking lifecycle: creation, status transitions,
/// rescheduling, deletion, and disposition capture.
#[derive(Clone)]
pub struct BookingService {
    api: Arc<dyn DispatchApi>,
    geocoder: Arc<dyn Geocoder>,
    events: Arc<dyn EventBus>,
    disposition_catalog: Arc<Mutex<Option<Vec<DispositionType>>>>,
}

impl BookingService {
    pub fn new(
        api: Arc<dyn DispatchApi>,
        geocoder: Arc<dyn Geocoder>,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            api,
            geocoder,
            events,
            disposition_catalog: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a booking from a validated draft. The address is geocoded just
    /// in time; when no match is found the booking is created un-located and
    /// agent search stays unavailable until the address is fixed.
    pub async fn create(&self, session: &Session, draft: BookingDraft) -> DomainResult<Booking> {
        if !session.role.can_create() {
            return Err(DomainError::Forbidden(format!(
                "Role {} may not create bookings",
                session.role
            )));
        }

        draft.validate()?;

        let coordinates = self.geocoder.locate(&draft.address).await?;
        if coordinates.is_none() {
            warn!(
                "address '{}' could not be geocoded; creating booking without coordinates",
                draft.address.street_line()
            );
        }

        let payload = draft.into_payload(coordinates);
        let booking = self.api.create_booking(&payload).await?;

        info!("created booking {}", booking.booking_id);
        self.events.publish(SystemEvent::BookingCreated {
            booking_id: booking.booking_id,
            region_id: booking.region_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });

        Ok(booking)
    }

    /// Advance a booking to the next lifecycle status. Exactly one atomic
    /// request; on failure the local view is untouched, and no optimistic
    /// patch is applied for status changes.
    pub async fn advance_status(
        &self,
        booking: &Booking,
        target: BookingStatus,
    ) -> DomainResult<Booking> {
        booking.status.validate_transition(target)?;

        let updated = self
            .api
            .update_booking(booking.booking_id, &BookingUpdate::status(target))
            .await?;

        self.events.publish(SystemEvent::BookingStatusChanged {
            booking_id: booking.booking_id,
            old_status: booking.status,
            new_status: target,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });

        Ok(updated)
    }

    pub async fn reschedule(
        &self,
        booking: &Booking,
        date: NaiveDate,
        time: NaiveTime,
    ) -> DomainResult<Booking> {
        self.api
            .update_booking(booking.booking_id, &BookingUpdate::schedule(date, time))
            .await
    }

    /// Remove a booking. Terminal and irreversible from this side; whatever
    /// soft-delete semantics the backend applies are its own business.
    pub async fn delete(&self, session: &Session, booking_id: i64) -> DomainResult<()> {
        if !session.role.can_delete() {
            return Err(DomainError::Forbidden(format!(
                "Role {} may not delete bookings",
                session.role
            )));
        }

        self.api.delete_booking(booking_id).await?;

        self.events.publish(SystemEvent::BookingDeleted {
            booking_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });

        Ok(())
    }

    /// Record the outcome of a completed booking. Permitted once: a booking
    /// that already carries a disposition rejects a second save locally, and
    /// a concurrent session losing that race gets the server's conflict
    /// answer verbatim.
    pub async fn save_disposition(
        &self,
        booking: &Booking,
        type_code: &str,
        note: &str,
    ) -> DomainResult<()> {
        if !booking.status.is_terminal() {
            return Err(DomainError::Validation(
                "Disposition can only be recorded on a completed booking".to_string(),
            ));
        }
        if booking.has_disposition() {
            return Err(DomainError::Conflict(
                "Booking already has a disposition".to_string(),
            ));
        }

        // Empty code means "unset"; anything else must exist in the catalog.
        let code = type_code.trim();
        if !code.is_empty() {
            let catalog = self.disposition_types().await?;
            if !catalog.iter().any(|t| t.type_code == code) {
                return Err(DomainError::Validation(format!(
                    "Invalid disposition type: {}",
                    code
                )));
            }
        }

        let request = SaveDisposition {
            booking_id: booking.booking_id,
            disposition_type: code.to_string(),
            note: note.to_string(),
        };
        self.api.save_disposition(&request).await?;

        self.events.publish(SystemEvent::DispositionRecorded {
            booking_id: booking.booking_id,
            type_code: code.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });

        Ok(())
    }

    /// Disposition catalog, fetched once per service lifetime.
    pub async fn disposition_types(&self) -> DomainResult<Vec<DispositionType>> {
        let mut catalog = self.disposition_catalog.lock().await;
        if let Some(types) = catalog.as_ref() {
            return Ok(types.clone());
        }

        let types = self.api.disposition_types().await?;
        *catalog = Some(types.clone());
        Ok(types)
    }
}
