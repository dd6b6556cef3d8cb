use std::sync::Arc;

use crate::application::services::{AssignmentService, AvailabilityService, BookingService};
use crate::config::Config;
use crate::domain::entities::Session;
use crate::domain::ports::{DispatchApi, Geocoder, TimeService};
use crate::infrastructure::http::HttpDispatchApi;
use crate::infrastructure::providers::{NominatimGeocoder, SystemTimeService};
use crate::infrastructure::sync::{FeedScope, PollController, PollingConfig};
use crate::shared::events::{EventBus, LocalEventBus};

/// Everything a running console needs, wired once at startup.
pub struct AppState {
    pub session: Session,
    pub api: Arc<dyn DispatchApi>,
    pub events: Arc<dyn EventBus>,
    pub feed: PollController,
    pub bookings: BookingService,
    pub assignments: AssignmentService,
    pub availability: AvailabilityService,
}

/// Log in, pick the feed for the session's role, and start the polling
/// engine and services over one shared API client.
pub async fn build_app_state(config: &Config) -> anyhow::Result<AppState> {
    let api = Arc::new(HttpDispatchApi::new(&config.api_base_url)?);
    let session = api
        .login(&config.login_email, &config.login_password)
        .await?;
    tracing::info!("logged in as user {} ({})", session.user_id, session.role);

    let api: Arc<dyn DispatchApi> = api;
    let geocoder: Arc<dyn Geocoder> = Arc::new(NominatimGeocoder::new(
        &config.geocoder_url,
        &config.geocoder_user_agent,
    )?);
    let time: Arc<dyn TimeService> = Arc::new(SystemTimeService);
    let events: Arc<dyn EventBus> = Arc::new(LocalEventBus::default());

    let scope = FeedScope::for_session(&session, config.region_id);
    let feed = PollController::start(
        api.clone(),
        time,
        events.clone(),
        scope,
        PollingConfig {
            interval: config.poll_interval,
            pause_safety: config.pause_safety,
        },
    );

    let bookings = BookingService::new(api.clone(), geocoder.clone(), events.clone());
    let assignments = AssignmentService::new(api.clone(), events.clone());
    let availability = AvailabilityService::new(api.clone(), geocoder);

    Ok(AppState {
        session,
        api,
        events,
        feed,
        bookings,
        assignments,
        availability,
    })
}
