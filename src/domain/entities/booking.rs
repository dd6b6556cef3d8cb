use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::domain::entities::location::{GeoPoint, StreetAddress};
use crate::domain::errors::{DomainError, DomainResult};
use crate::shared::utils::email::validate_and_normalize_email;
use crate::shared::utils::phone::is_valid_phone_number;

/// Booking lifecycle. Each state has exactly one legal forward transition;
/// `completed` is terminal and unlocks disposition capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    #[serde(rename = "scheduled")]
    Scheduled,
    #[serde(rename = "enroute")]
    Enroute,
    #[serde(rename = "on-site")]
    OnSite,
    #[serde(rename = "completed")]
    Completed,
}

impl BookingStatus {
    /// The only status this one may advance to, if any.
    pub fn successor(self) -> Option<BookingStatus> {
        match self {
            BookingStatus::Scheduled => Some(BookingStatus::Enroute),
            BookingStatus::Enroute => Some(BookingStatus::OnSite),
            BookingStatus::OnSite => Some(BookingStatus::Completed),
            BookingStatus::Completed => None,
        }
    }

    /// Action label shown on the control that triggers the forward transition.
    pub fn advance_label(self) -> Option<&'static str> {
        match self {
            BookingStatus::Scheduled => Some("Start En Route"),
            BookingStatus::Enroute => Some("Arrive On Site"),
            BookingStatus::OnSite => Some("Mark Completed"),
            BookingStatus::Completed => None,
        }
    }

    /// Human-readable queue title.
    pub fn title(self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "Scheduled",
            BookingStatus::Enroute => "En Route",
            BookingStatus::OnSite => "On Site",
            BookingStatus::Completed => "Completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed)
    }

    /// Validate a requested transition. Only the unique successor is legal;
    /// skips and backward moves are rejected even if requested directly.
    pub fn validate_transition(self, target: BookingStatus) -> Result<(), InvalidTransition> {
        if self.successor() == Some(target) {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self,
                to: target,
            })
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Scheduled => write!(f, "scheduled"),
            BookingStatus::Enroute => write!(f, "enroute"),
            BookingStatus::OnSite => write!(f, "on-site"),
            BookingStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(BookingStatus::Scheduled),
            "enroute" => Ok(BookingStatus::Enroute),
            "on-site" => Ok(BookingStatus::OnSite),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal status transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: BookingStatus,
    pub to: BookingStatus,
}

impl From<InvalidTransition> for DomainError {
    fn from(err: InvalidTransition) -> Self {
        DomainError::Validation(err.to_string())
    }
}

/// Who currently owns the booking. At most one of the two assignable roles
/// holds it at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignee {
    Unassigned,
    Agent(i64),
    Dispatcher(i64),
}

// MySQL sends TINYINT flags as 0/1; newer API builds send real booleans.
fn flag_from_int_or_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|f| match f {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    }))
}

/// The central entity, as served by the dispatch API. Everything except the
/// identity and schedule columns is a server-side projection the client never
/// writes back; local copies are caches reconciled by polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "bookingId")]
    pub booking_id: i64,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub customer_latitude: Option<f64>,
    #[serde(default)]
    pub customer_longitude: Option<f64>,
    #[serde(rename = "agentId", default)]
    pub agent_id: Option<i64>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(rename = "dispatcherId", default)]
    pub dispatcher_id: Option<i64>,
    #[serde(default)]
    pub dispatcher_name: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(rename = "regionId", default)]
    pub region_id: Option<i64>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default, deserialize_with = "flag_from_int_or_bool")]
    pub region_is_global: Option<bool>,
    #[serde(default)]
    pub disposition_id: Option<i64>,
    #[serde(default)]
    pub disposition_code: Option<String>,
    #[serde(default)]
    pub disposition_note: Option<String>,
    #[serde(default)]
    pub disposition_description: Option<String>,
}

impl Booking {
    /// Customer coordinates, present only once geocoding has succeeded.
    /// Latitude and longitude are written atomically, so a half-set pair is
    /// treated as absent.
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.customer_latitude, self.customer_longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
            _ => None,
        }
    }

    pub fn has_disposition(&self) -> bool {
        self.disposition_id.is_some() || self.disposition_code.is_some()
    }

    pub fn is_global(&self) -> bool {
        self.region_is_global.unwrap_or(false)
    }

    pub fn assignee(&self) -> Assignee {
        match (self.agent_id, self.dispatcher_id) {
            (Some(agent_id), _) => Assignee::Agent(agent_id),
            (None, Some(dispatcher_id)) => Assignee::Dispatcher(dispatcher_id),
            (None, None) => Assignee::Unassigned,
        }
    }
}

/// Partial update body for `PUT /bookings/{id}`. Outer `None` omits the key
/// entirely; `Some(None)` sends an explicit `null` (used to unassign).
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingUpdate {
    #[serde(rename = "agentId", skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<Option<i64>>,
    #[serde(rename = "dispatcherId", skip_serializing_if = "Option::is_none")]
    pub dispatcher_id: Option<Option<i64>>,
    #[serde(rename = "assign_to_self", skip_serializing_if = "Option::is_none")]
    pub assign_to_self: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
}

impl BookingUpdate {
    pub fn status(status: BookingStatus) -> Self {
        BookingUpdate {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn schedule(date: NaiveDate, time: NaiveTime) -> Self {
        BookingUpdate {
            booking_date: Some(date),
            booking_time: Some(time),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.agent_id.is_none()
            && self.dispatcher_id.is_none()
            && self.assign_to_self.is_none()
            && self.booking_date.is_none()
            && self.booking_time.is_none()
            && self.status.is_none()
    }
}

/// In-memory patch applied to the cached copy of one booking right after a
/// locally-initiated mutation. Never persisted; the next poll's response
/// silently wins over it.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub status: Option<BookingStatus>,
    pub agent_id: Option<Option<i64>>,
    pub agent_name: Option<Option<String>>,
    pub dispatcher_id: Option<Option<i64>>,
    pub dispatcher_name: Option<Option<String>>,
    pub booking_date: Option<NaiveDate>,
    pub booking_time: Option<NaiveTime>,
}

impl BookingPatch {
    pub fn status(status: BookingStatus) -> Self {
        BookingPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Assigning an agent clears any dispatcher assignment in the same patch;
    /// the cache never holds both assignees at once.
    pub fn assign_agent(agent_id: i64, agent_name: Option<String>) -> Self {
        BookingPatch {
            agent_id: Some(Some(agent_id)),
            agent_name: Some(agent_name),
            dispatcher_id: Some(None),
            dispatcher_name: Some(None),
            ..Default::default()
        }
    }

    pub fn assign_dispatcher(dispatcher_id: i64, dispatcher_name: Option<String>) -> Self {
        BookingPatch {
            dispatcher_id: Some(Some(dispatcher_id)),
            dispatcher_name: Some(dispatcher_name),
            agent_id: Some(None),
            agent_name: Some(None),
            ..Default::default()
        }
    }

    pub fn unassign() -> Self {
        BookingPatch {
            agent_id: Some(None),
            agent_name: Some(None),
            dispatcher_id: Some(None),
            dispatcher_name: Some(None),
            ..Default::default()
        }
    }

    pub fn schedule(date: NaiveDate, time: NaiveTime) -> Self {
        BookingPatch {
            booking_date: Some(date),
            booking_time: Some(time),
            ..Default::default()
        }
    }

    pub fn apply(&self, booking: &mut Booking) {
        if let Some(status) = self.status {
            booking.status = status;
        }
        if let Some(agent_id) = self.agent_id {
            booking.agent_id = agent_id;
        }
        if let Some(ref agent_name) = self.agent_name {
            booking.agent_name = agent_name.clone();
        }
        if let Some(dispatcher_id) = self.dispatcher_id {
            booking.dispatcher_id = dispatcher_id;
        }
        if let Some(ref dispatcher_name) = self.dispatcher_name {
            booking.dispatcher_name = dispatcher_name.clone();
        }
        if let Some(date) = self.booking_date {
            booking.booking_date = date;
        }
        if let Some(time) = self.booking_time {
            booking.booking_time = time;
        }
    }
}

/// Draft collected from the new-appointment form before submission.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub address: StreetAddress,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub region_id: Option<i64>,
    pub agent_id: Option<i64>,
}

impl BookingDraft {
    /// Pre-flight checks applied before any network submission.
    pub fn validate(&self) -> DomainResult<()> {
        if self.customer_name.trim().is_empty() {
            return Err(DomainError::Validation(
                "Customer name is required".to_string(),
            ));
        }
        validate_and_normalize_email(&self.customer_email)?;
        if !self.customer_phone.trim().is_empty() && !is_valid_phone_number(&self.customer_phone) {
            return Err(DomainError::Validation(format!(
                "Invalid phone number: {}",
                self.customer_phone
            )));
        }
        if self.region_id.is_none() {
            return Err(DomainError::Validation(
                "Region selection is required for all appointments".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the structured creation payload. Coordinates come from a
    /// just-in-time geocode and are either both present or both absent.
    pub fn into_payload(self, coordinates: Option<GeoPoint>) -> CreateBooking {
        CreateBooking {
            customer: CustomerPayload {
                name: self.customer_name,
                email: self.customer_email.trim().to_lowercase(),
                phone: self.customer_phone,
            },
            location: LocationPayload {
                latitude: coordinates.map(|p| p.lat),
                longitude: coordinates.map(|p| p.lon),
                postal_code: self.address.postal_code,
                city: self.address.city,
                state_province: self.address.state_province,
                country: self.address.country,
                street_name: self.address.street_name,
                street_number: self.address.street_number,
            },
            booking: BookingPayload {
                agent_id: self.agent_id,
                booking_date: self.booking_date,
                booking_time: self.booking_time,
                region_id: self.region_id,
            },
        }
    }
}

/// Structured body for `POST /bookings`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateBooking {
    pub customer: CustomerPayload,
    pub location: LocationPayload,
    pub booking: BookingPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationPayload {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub postal_code: String,
    pub city: String,
    pub state_province: String,
    pub country: String,
    pub street_name: String,
    pub street_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingPayload {
    #[serde(rename = "agentId", skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<i64>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub region_id: Option<i64>,
}
