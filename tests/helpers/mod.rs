#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tokio::sync::Mutex;

use fielddesk::domain::entities::{
    AgentCandidate, AgentSearchQuery, Availability, Booking, BookingStatus, BookingUpdate,
    CreateBooking, DispositionType, GeoPoint, Role, SaveDisposition, Session, StreetAddress,
};
use fielddesk::domain::errors::{DomainError, DomainResult};
use fielddesk::domain::ports::{DispatchApi, Geocoder};

/// User id the fake backend assigns on self-assignment.
pub const FAKE_SELF_ID: i64 = 1;

pub fn dispatcher_session() -> Session {
    Session {
        user_id: FAKE_SELF_ID,
        role: Role::Dispatcher,
    }
}

pub fn admin_session() -> Session {
    Session {
        user_id: 50,
        role: Role::Admin,
    }
}

pub fn field_agent_session(agent_id: i64) -> Session {
    Session {
        user_id: agent_id,
        role: Role::FieldAgent,
    }
}

pub fn booking(id: i64, status: BookingStatus) -> Booking {
    Booking {
        booking_id: id,
        booking_date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        booking_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        status,
        customer_name: format!("customer-{}", id),
        customer_email: None,
        customer_phone: None,
        customer_address: Some("5580 Lacklon Lane, BA4 3J7 Harlingen".to_string()),
        customer_latitude: None,
        customer_longitude: None,
        agent_id: None,
        agent_name: None,
        dispatcher_id: None,
        dispatcher_name: None,
        assigned_to: None,
        region_id: Some(2),
        region_name: Some("South".to_string()),
        region_is_global: Some(false),
        disposition_id: None,
        disposition_code: None,
        disposition_note: None,
        disposition_description: None,
    }
}

pub fn located_booking(id: i64, status: BookingStatus) -> Booking {
    let mut b = booking(id, status);
    b.customer_latitude = Some(26.19);
    b.customer_longitude = Some(-97.7);
    b
}

pub fn candidate(agent_id: i64, name: &str, distance: f64, status: &str) -> AgentCandidate {
    AgentCandidate {
        agent_id,
        name: name.to_string(),
        distance,
        availability_status: Availability::from(status.to_string()),
        team_id: None,
        unavailable_reason: None,
    }
}

pub fn street_address() -> StreetAddress {
    StreetAddress {
        street_number: "5580".to_string(),
        street_name: "Lacklon Lane".to_string(),
        postal_code: "BA4 3J7".to_string(),
        city: "Harlingen".to_string(),
        state_province: "TX".to_string(),
        country: "US".to_string(),
    }
}

/// In-memory dispatch backend with scripted failures and observable request
/// traffic.
pub struct FakeDispatchApi {
    pub bookings: Mutex<Vec<Booking>>,
    pub fetch_delay: Mutex<Option<Duration>>,
    pub fetch_count: AtomicUsize,
    pub fetch_errors: Mutex<VecDeque<DomainError>>,
    pub recorded_updates: Mutex<Vec<(i64, serde_json::Value)>>,
    pub created_payloads: Mutex<Vec<CreateBooking>>,
    pub search_results: Mutex<Vec<AgentCandidate>>,
    pub search_count: AtomicUsize,
    pub saved_dispositions: Mutex<Vec<SaveDisposition>>,
    pub catalog: Mutex<Vec<DispositionType>>,
    pub deleted: Mutex<Vec<i64>>,
}

impl FakeDispatchApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            bookings: Mutex::new(Vec::new()),
            fetch_delay: Mutex::new(None),
            fetch_count: AtomicUsize::new(0),
            fetch_errors: Mutex::new(VecDeque::new()),
            recorded_updates: Mutex::new(Vec::new()),
            created_payloads: Mutex::new(Vec::new()),
            search_results: Mutex::new(Vec::new()),
            search_count: AtomicUsize::new(0),
            saved_dispositions: Mutex::new(Vec::new()),
            catalog: Mutex::new(vec![
                DispositionType {
                    type_code: "SALE".to_string(),
                    description: "Closed sale".to_string(),
                },
                DispositionType {
                    type_code: "NO_SHOW".to_string(),
                    description: "Customer did not show".to_string(),
                },
            ]),
            deleted: Mutex::new(Vec::new()),
        })
    }

    pub async fn set_bookings(&self, bookings: Vec<Booking>) {
        *self.bookings.lock().await = bookings;
    }

    pub async fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().await = Some(delay);
    }

    pub async fn clear_fetch_delay(&self) {
        *self.fetch_delay.lock().await = None;
    }

    pub async fn push_fetch_error(&self, error: DomainError) {
        self.fetch_errors.lock().await.push_back(error);
    }

    pub async fn set_search_results(&self, results: Vec<AgentCandidate>) {
        *self.search_results.lock().await = results;
    }

    pub fn fetches(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> usize {
        self.search_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DispatchApi for FakeDispatchApi {
    async fn login(&self, _email: &str, _password: &str) -> DomainResult<Session> {
        Ok(dispatcher_session())
    }

    async fn logout(&self) -> DomainResult<()> {
        Ok(())
    }

    async fn list_bookings(&self, _region_id: Option<i64>) -> DomainResult<Vec<Booking>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let delay = *self.fetch_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.fetch_errors.lock().await.pop_front() {
            return Err(error);
        }

        Ok(self.bookings.lock().await.clone())
    }

    async fn list_agent_bookings(&self, agent_id: i64) -> DomainResult<Vec<Booking>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .bookings
            .lock()
            .await
            .iter()
            .filter(|b| b.agent_id == Some(agent_id))
            .cloned()
            .collect())
    }

    async fn create_booking(&self, payload: &CreateBooking) -> DomainResult<Booking> {
        self.created_payloads.lock().await.push(payload.clone());

        let mut bookings = self.bookings.lock().await;
        let mut created = booking(1000 + bookings.len() as i64, BookingStatus::Scheduled);
        created.booking_date = payload.booking.booking_date;
        created.booking_time = payload.booking.booking_time;
        created.customer_name = payload.customer.name.clone();
        created.customer_email = Some(payload.customer.email.clone());
        created.customer_latitude = payload.location.latitude;
        created.customer_longitude = payload.location.longitude;
        created.agent_id = payload.booking.agent_id;
        created.region_id = payload.booking.region_id;
        bookings.push(created.clone());
        Ok(created)
    }

    async fn update_booking(
        &self,
        booking_id: i64,
        update: &BookingUpdate,
    ) -> DomainResult<Booking> {
        self.recorded_updates.lock().await.push((
            booking_id,
            serde_json::to_value(update).expect("serializable update"),
        ));

        let mut bookings = self.bookings.lock().await;
        let target = bookings
            .iter_mut()
            .find(|b| b.booking_id == booking_id)
            .ok_or_else(|| DomainError::NotFound("Booking not found".to_string()))?;

        if let Some(agent_id) = update.agent_id {
            target.agent_id = agent_id;
            target.agent_name = agent_id.map(|id| format!("agent-{}", id));
            if agent_id.is_some() {
                target.dispatcher_id = None;
                target.dispatcher_name = None;
            }
        }
        if let Some(dispatcher_id) = update.dispatcher_id {
            target.dispatcher_id = dispatcher_id;
            if dispatcher_id.is_some() {
                target.agent_id = None;
                target.agent_name = None;
            }
        }
        if update.assign_to_self == Some(true) {
            target.dispatcher_id = Some(FAKE_SELF_ID);
            target.agent_id = None;
            target.agent_name = None;
        }
        if let Some(status) = update.status {
            target.status = status;
        }
        if let Some(date) = update.booking_date {
            target.booking_date = date;
        }
        if let Some(time) = update.booking_time {
            target.booking_time = time;
        }

        Ok(target.clone())
    }

    async fn delete_booking(&self, booking_id: i64) -> DomainResult<()> {
        let mut bookings = self.bookings.lock().await;
        let before = bookings.len();
        bookings.retain(|b| b.booking_id != booking_id);
        if bookings.len() == before {
            return Err(DomainError::NotFound("Booking not found".to_string()));
        }
        self.deleted.lock().await.push(booking_id);
        Ok(())
    }

    async fn save_disposition(&self, request: &SaveDisposition) -> DomainResult<()> {
        let mut bookings = self.bookings.lock().await;
        let target = bookings
            .iter_mut()
            .find(|b| b.booking_id == request.booking_id)
            .ok_or_else(|| DomainError::NotFound("Booking not found".to_string()))?;

        if target.has_disposition() {
            return Err(DomainError::Conflict(
                "Booking already has a disposition. Use PUT to update.".to_string(),
            ));
        }

        target.disposition_code = Some(request.disposition_type.clone());
        target.disposition_note = Some(request.note.clone());
        self.saved_dispositions.lock().await.push(request.clone());
        Ok(())
    }

    async fn disposition_types(&self) -> DomainResult<Vec<DispositionType>> {
        Ok(self.catalog.lock().await.clone())
    }

    async fn search_agents(&self, _query: &AgentSearchQuery) -> DomainResult<Vec<AgentCandidate>> {
        self.search_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.search_results.lock().await.clone())
    }
}

/// Geocoder returning a fixed answer.
pub struct FakeGeocoder {
    pub point: Option<GeoPoint>,
    pub calls: AtomicUsize,
}

impl FakeGeocoder {
    pub fn hit() -> Arc<Self> {
        Arc::new(Self {
            point: Some(GeoPoint {
                lat: 26.19,
                lon: -97.7,
            }),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn miss() -> Arc<Self> {
        Arc::new(Self {
            point: None,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn locate(&self, _address: &StreetAddress) -> DomainResult<Option<GeoPoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.point)
    }
}

/// Give spawned tasks a chance to run without advancing the clock.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

/// Advance the paused test clock and let timers fire.
pub async fn advance(duration: Duration) {
    tokio::time::advance(duration).await;
    settle().await;
}
