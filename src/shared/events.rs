use crate::domain::entities::BookingStatus;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

/// Events emitted by the sync engine and the application services. The
/// console subscribes for logging and session-expiry shutdown.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    BookingsRefreshed {
        count: usize,
        timestamp: String, // ISO 8601
    },
    BookingCreated {
        booking_id: i64,
        region_id: Option<i64>,
        timestamp: String,
    },
    BookingStatusChanged {
        booking_id: i64,
        old_status: BookingStatus,
        new_status: BookingStatus,
        timestamp: String,
    },
    BookingAssigned {
        booking_id: i64,
        agent_id: Option<i64>,
        dispatcher_id: Option<i64>,
        assigned_by: i64,
        timestamp: String,
    },
    BookingDeleted {
        booking_id: i64,
        timestamp: String,
    },
    DispositionRecorded {
        booking_id: i64,
        type_code: String,
        timestamp: String,
    },
    SessionExpired {
        timestamp: String,
    },
}

/// Event bus for publishing and subscribing to system events.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event to all subscribers. Fire-and-forget: an event with no
    /// listeners is dropped silently.
    fn publish(&self, event: SystemEvent);

    /// Subscribe to events published after this call.
    fn subscribe(
        &self,
    ) -> Pin<Box<dyn Stream<Item = Result<SystemEvent, BroadcastStreamRecvError>> + Send>>;
}

/// Local in-memory implementation of EventBus.
#[derive(Clone)]
pub struct LocalEventBus {
    tx: broadcast::Sender<SystemEvent>,
}

impl LocalEventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }
}

impl Default for LocalEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventBus for LocalEventBus {
    fn publish(&self, event: SystemEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event published with no active subscribers");
        }
    }

    fn subscribe(
        &self,
    ) -> Pin<Box<dyn Stream<Item = Result<SystemEvent, BroadcastStreamRecvError>> + Send>> {
        Box::pin(BroadcastStream::new(self.tx.subscribe()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    #[test]
    fn subscribers_receive_published_events() {
        tokio_test::block_on(async {
            let bus = LocalEventBus::default();
            let mut stream = bus.subscribe();

            bus.publish(SystemEvent::BookingDeleted {
                booking_id: 42,
                timestamp: "2026-08-07T09:00:00Z".to_string(),
            });

            match stream.next().await {
                Some(Ok(SystemEvent::BookingDeleted { booking_id, .. })) => {
                    assert_eq!(booking_id, 42)
                }
                other => panic!("unexpected event: {:?}", other),
            }
        });
    }

    #[test]
    fn publish_without_subscribers_does_not_panic() {
        let bus = LocalEventBus::default();
        bus.publish(SystemEvent::SessionExpired {
            timestamp: "2026-08-07T09:00:00Z".to_string(),
        });
    }
}
