use crate::domain::entities::{
    AgentCandidate, AgentSearchQuery, Booking, BookingUpdate, CreateBooking, DispositionType,
    SaveDisposition, Session,
};
use crate::domain::errors::DomainResult;

/// The dispatch REST backend, seen from the console. The backend owns every
/// booking record; everything returned here is a snapshot subject to
/// staleness and reconciled by polling.
#[async_trait::async_trait]
pub trait DispatchApi: Send + Sync {
    /// Establish a session. The transport keeps the issued cookie and sends
    /// it on every subsequent call.
    async fn login(&self, email: &str, password: &str) -> DomainResult<Session>;

    async fn logout(&self) -> DomainResult<()>;

    /// The full booking collection, optionally narrowed to one region.
    async fn list_bookings(&self, region_id: Option<i64>) -> DomainResult<Vec<Booking>>;

    /// Bookings assigned to one field agent (the agent-facing feed).
    async fn list_agent_bookings(&self, agent_id: i64) -> DomainResult<Vec<Booking>>;

    async fn create_booking(&self, payload: &CreateBooking) -> DomainResult<Booking>;

    async fn update_booking(&self, booking_id: i64, update: &BookingUpdate)
        -> DomainResult<Booking>;

    async fn delete_booking(&self, booking_id: i64) -> DomainResult<()>;

    async fn save_disposition(&self, request: &SaveDisposition) -> DomainResult<()>;

    async fn disposition_types(&self) -> DomainResult<Vec<DispositionType>>;

    /// Candidate agents ranked by the server for a location and time window.
    async fn search_agents(&self, query: &AgentSearchQuery) -> DomainResult<Vec<AgentCandidate>>;
}
