use fielddesk::bootstrap;
use fielddesk::config::Config;
use fielddesk::domain::ports::DispatchApi;
use fielddesk::domain::services::QueueBoard;
use fielddesk::shared::events::{EventBus, SystemEvent};
use tokio_stream::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fielddesk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Log in and start the polling engine
    let state = bootstrap::build_app_state(&config).await?;
    tracing::info!(
        "dispatch console connected, polling every {}s",
        config.poll_interval.as_secs()
    );

    let mut events = state.events.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received, shutting down");
                break;
            }
            event = events.next() => match event {
                Some(Ok(SystemEvent::BookingsRefreshed { count, .. })) => {
                    let board = QueueBoard::partition(&state.feed.bookings().await);
                    tracing::info!(
                        "{} bookings | global scheduled/enroute/on-site/completed {:?} | team {:?}",
                        count,
                        board.global.counts(),
                        board.team.counts()
                    );
                }
                Some(Ok(SystemEvent::SessionExpired { .. })) => {
                    tracing::warn!("session expired, dropping to logged-out state");
                    break;
                }
                Some(Ok(event)) => tracing::debug!("event: {:?}", event),
                Some(Err(_)) => {} // lagged behind the bus, keep going
                None => break,
            }
        }
    }

    state.feed.shutdown();
    if let Err(e) = state.api.logout().await {
        tracing::debug!("logout failed: {}", e);
    }

    Ok(())
}
