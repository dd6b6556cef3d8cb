use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::entities::{
    AgentCandidate, AgentSearchQuery, Booking, BookingUpdate, CreateBooking, DispositionType,
    Role, SaveDisposition, Session,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::DispatchApi;
use crate::infrastructure::http::wire::{Ack, Envelope, SearchResponse};

/// Dispatch API adapter over one cookie-carrying HTTP client. The login
/// response sets the session cookie; every later request rides on it, and a
/// 401 from any endpoint maps to the auth-required error the polling engine
/// treats as a forced logout.
pub struct HttpDispatchApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDispatchApi {
    pub fn new(base_url: impl Into<String>) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| DomainError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> DomainResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        Self::check_status(response).await
    }

    async fn check_status(response: Response) -> DomainResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = Self::error_message(response).await;
        Err(match status {
            StatusCode::UNAUTHORIZED => DomainError::AuthRequired,
            StatusCode::FORBIDDEN => DomainError::Forbidden(message),
            StatusCode::NOT_FOUND => DomainError::NotFound(message),
            StatusCode::CONFLICT => DomainError::Conflict(message),
            StatusCode::BAD_REQUEST => DomainError::Validation(message),
            _ => DomainError::Transport(format!("HTTP {}: {}", status.as_u16(), message)),
        })
    }

    /// Pull the server's own wording out of an error body so validation and
    /// business failures surface verbatim.
    async fn error_message(response: Response) -> String {
        #[derive(Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            error: Option<String>,
            #[serde(default)]
            message: Option<String>,
        }

        match response.json::<ErrorBody>().await {
            Ok(body) => body
                .error
                .or(body.message)
                .unwrap_or_else(|| "request failed".to_string()),
            Err(_) => "request failed".to_string(),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> DomainResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| DomainError::Transport(format!("unexpected response shape: {}", e)))
    }
}

#[async_trait::async_trait]
impl DispatchApi for HttpDispatchApi {
    async fn login(&self, email: &str, password: &str) -> DomainResult<Session> {
        #[derive(Deserialize)]
        struct LoginResponse {
            id: i64,
            user_type: String,
        }

        let response = self
            .send(
                self.client
                    .post(self.endpoint("/login"))
                    .json(&serde_json::json!({ "email": email, "password": password })),
            )
            .await?;

        let body: LoginResponse = Self::decode(response).await?;
        let role: Role = body
            .user_type
            .parse()
            .map_err(|e: String| DomainError::Transport(e))?;

        Ok(Session {
            user_id: body.id,
            role,
        })
    }

    async fn logout(&self) -> DomainResult<()> {
        self.send(self.client.post(self.endpoint("/logout"))).await?;
        Ok(())
    }

    async fn list_bookings(&self, region_id: Option<i64>) -> DomainResult<Vec<Booking>> {
        let mut request = self.client.get(self.endpoint("/bookings"));
        if let Some(region_id) = region_id {
            request = request.query(&[("region_id", region_id.to_string())]);
        }

        let response = self.send(request).await?;
        Self::decode::<Envelope<Vec<Booking>>>(response)
            .await?
            .into_data()
    }

    async fn list_agent_bookings(&self, agent_id: i64) -> DomainResult<Vec<Booking>> {
        let response = self
            .send(
                self.client
                    .get(self.endpoint(&format!("/agents/{}/bookings", agent_id))),
            )
            .await?;
        Self::decode::<Envelope<Vec<Booking>>>(response)
            .await?
            .into_data()
    }

    async fn create_booking(&self, payload: &CreateBooking) -> DomainResult<Booking> {
        let response = self
            .send(self.client.post(self.endpoint("/bookings")).json(payload))
            .await?;
        Self::decode::<Envelope<Booking>>(response).await?.into_data()
    }

    async fn update_booking(
        &self,
        booking_id: i64,
        update: &BookingUpdate,
    ) -> DomainResult<Booking> {
        let response = self
            .send(
                self.client
                    .put(self.endpoint(&format!("/bookings/{}", booking_id)))
                    .json(update),
            )
            .await?;
        Self::decode::<Envelope<Booking>>(response).await?.into_data()
    }

    async fn delete_booking(&self, booking_id: i64) -> DomainResult<()> {
        let response = self
            .send(
                self.client
                    .delete(self.endpoint(&format!("/bookings/{}", booking_id))),
            )
            .await?;
        Self::decode::<Ack>(response).await?.into_result()
    }

    async fn save_disposition(&self, request: &SaveDisposition) -> DomainResult<()> {
        let response = self
            .send(
                self.client
                    .post(self.endpoint("/dispositions"))
                    .json(request),
            )
            .await?;
        Self::decode::<Ack>(response).await?.into_result()
    }

    async fn disposition_types(&self) -> DomainResult<Vec<DispositionType>> {
        let response = self
            .send(self.client.get(self.endpoint("/disposition-types")))
            .await?;
        Self::decode::<Envelope<Vec<DispositionType>>>(response)
            .await?
            .into_data()
    }

    async fn search_agents(&self, query: &AgentSearchQuery) -> DomainResult<Vec<AgentCandidate>> {
        let response = self
            .send(self.client.get(self.endpoint("/search")).query(&[
                ("latitude", query.latitude.to_string()),
                ("longitude", query.longitude.to_string()),
                ("booking_date", query.booking_date.format("%Y-%m-%d").to_string()),
                ("booking_time", query.booking_time.format("%H:%M:%S").to_string()),
            ]))
            .await?;
        Self::decode::<SearchResponse>(response)
            .await?
            .into_candidates()
    }
}
