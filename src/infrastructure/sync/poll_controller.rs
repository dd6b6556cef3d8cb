use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::domain::entities::{Booking, BookingPatch, Role, Session};
use crate::domain::errors::DomainResult;
use crate::domain::ports::{DispatchApi, TimeService};
use crate::infrastructure::sync::cache::BookingCache;
use crate::shared::events::{EventBus, SystemEvent};

/// Which feed a controller polls: the shared dispatch collection (optionally
/// region-narrowed) or one field agent's own bookings.
#[derive(Debug, Clone, Copy)]
pub enum FeedScope {
    Dispatch { region_id: Option<i64> },
    Agent { agent_id: i64 },
}

impl FeedScope {
    pub fn for_session(session: &Session, region_id: Option<i64>) -> FeedScope {
        match session.role {
            Role::Admin | Role::Dispatcher => FeedScope::Dispatch { region_id },
            Role::FieldAgent => FeedScope::Agent {
                agent_id: session.user_id,
            },
        }
    }

    async fn fetch(&self, api: &dyn DispatchApi) -> DomainResult<Vec<Booking>> {
        match *self {
            FeedScope::Dispatch { region_id } => api.list_bookings(region_id).await,
            FeedScope::Agent { agent_id } => api.list_agent_bookings(agent_id).await,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PollingConfig {
    /// Cadence of silent background refreshes.
    pub interval: Duration,
    /// How long a pause may last before polling resumes on its own. Guards
    /// against a caller that pauses and never resumes.
    pub pause_safety: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            pause_safety: Duration::from_secs(300),
        }
    }
}

enum Command {
    Pause,
    Resume,
    Shutdown,
}

/// Polling engine for one view of the booking collection. All the timer and
/// guard state that governs refresh behavior lives here, with an explicit
/// start/shutdown lifecycle; nothing is ambient.
///
/// Behavior contract:
/// - one silent refresh per interval while running, none while paused;
/// - at most one fetch in flight, ever — an overlapping tick or refetch is
///   dropped, not queued;
/// - `pause_polling` stops the timer entirely and arms a one-shot safety
///   resume; `resume_polling` cancels that and restarts the timer;
/// - optimistic patches touch only the in-memory cache and are overwritten
///   wholesale by the next successful fetch;
/// - an auth-required fetch error halts the engine permanently and publishes
///   `SessionExpired`; a rebuilt controller is the only way back;
/// - `shutdown` (or drop) cancels the driver task so no late update lands on
///   disposed state.
pub struct PollController {
    shared: Arc<Shared>,
    commands: mpsc::UnboundedSender<Command>,
    driver: JoinHandle<()>,
}

struct Shared {
    api: Arc<dyn DispatchApi>,
    time: Arc<dyn TimeService>,
    events: Arc<dyn EventBus>,
    scope: FeedScope,
    cache: RwLock<BookingCache>,
    error: Mutex<Option<String>>,
    loading: AtomicBool,
    in_flight: AtomicBool,
    halted: AtomicBool,
}

impl Shared {
    fn halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Claim the single fetch slot. Fails when a fetch is already in flight
    /// or the engine has been halted.
    fn begin_fetch(&self) -> bool {
        !self.halted()
            && self
                .in_flight
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
    }

    async fn fetch_once(&self, show_loading: bool) {
        if !self.begin_fetch() {
            debug!("fetch skipped: in flight or halted");
            return;
        }

        if show_loading {
            self.loading.store(true, Ordering::SeqCst);
        }
        *self.error.lock().await = None;

        match self.scope.fetch(self.api.as_ref()).await {
            Ok(bookings) => {
                // A shutdown may have raced the response; disposed state
                // never observes it.
                if !self.halted() {
                    let count = bookings.len();
                    self.cache.write().await.replace(bookings);
                    self.events.publish(SystemEvent::BookingsRefreshed {
                        count,
                        timestamp: chrono::Utc::now().to_rfc3339(),
                    });
                }
            }
            Err(err) => {
                if !self.halted() {
                    error!("booking fetch failed: {}", err);
                    *self.error.lock().await = Some(err.to_string());

                    if err.is_auth_required() {
                        info!("authentication expired, halting polling");
                        self.halted.store(true, Ordering::SeqCst);
                        self.events.publish(SystemEvent::SessionExpired {
                            timestamp: chrono::Utc::now().to_rfc3339(),
                        });
                    }
                }
            }
        }

        self.in_flight.store(false, Ordering::SeqCst);
        if show_loading {
            self.loading.store(false, Ordering::SeqCst);
        }
    }
}

impl PollController {
    pub fn start(
        api: Arc<dyn DispatchApi>,
        time: Arc<dyn TimeService>,
        events: Arc<dyn EventBus>,
        scope: FeedScope,
        config: PollingConfig,
    ) -> PollController {
        let shared = Arc::new(Shared {
            api,
            time,
            events,
            scope,
            cache: RwLock::new(BookingCache::default()),
            error: Mutex::new(None),
            loading: AtomicBool::new(true),
            in_flight: AtomicBool::new(false),
            halted: AtomicBool::new(false),
        });

        let (commands, receiver) = mpsc::unbounded_channel();
        let driver = tokio::spawn(Self::drive(shared.clone(), receiver, config));

        PollController {
            shared,
            commands,
            driver,
        }
    }

    async fn drive(
        shared: Arc<Shared>,
        mut commands: mpsc::UnboundedReceiver<Command>,
        config: PollingConfig,
    ) {
        // The first load is the only one that flips the loading flag on its
        // own; every later tick refreshes silently.
        shared.fetch_once(true).await;

        let mut paused = false;
        loop {
            if shared.halted() {
                break;
            }

            if paused {
                // No interval timer exists while paused; only a command or
                // the safety timeout can wake the engine.
                tokio::select! {
                    command = commands.recv() => match command {
                        Some(Command::Resume) => paused = false,
                        Some(Command::Pause) => {} // restarts the safety timeout
                        Some(Command::Shutdown) | None => break,
                    },
                    _ = shared.time.sleep(config.pause_safety) => {
                        info!("polling paused too long, auto-resuming");
                        paused = false;
                    }
                }
            } else {
                tokio::select! {
                    command = commands.recv() => match command {
                        Some(Command::Pause) => paused = true,
                        Some(Command::Resume) => {}
                        Some(Command::Shutdown) | None => break,
                    },
                    _ = shared.time.sleep(config.interval) => {
                        shared.fetch_once(false).await;
                    }
                }
            }
        }

        debug!("polling driver stopped");
    }

    /// Current cache snapshot.
    pub async fn bookings(&self) -> Vec<Booking> {
        self.shared.cache.read().await.snapshot()
    }

    pub async fn booking(&self, booking_id: i64) -> Option<Booking> {
        self.shared.cache.read().await.get(booking_id).cloned()
    }

    /// Force an immediate refresh with the loading indicator, subject to the
    /// same single-flight guard as background ticks.
    pub async fn refetch(&self) {
        self.shared.fetch_once(true).await;
    }

    /// Stop the interval timer entirely. A safety timeout resumes polling on
    /// its own if nobody calls `resume_polling`.
    pub fn pause_polling(&self) {
        let _ = self.commands.send(Command::Pause);
    }

    pub fn resume_polling(&self) {
        let _ = self.commands.send(Command::Resume);
    }

    /// Patch the cached copy of one booking without a round trip. The patch
    /// is not persisted anywhere; the next poll's response silently wins.
    pub async fn optimistic_update(&self, booking_id: i64, patch: &BookingPatch) {
        if !self.shared.cache.write().await.patch(booking_id, patch) {
            debug!("optimistic update dropped: booking {} not cached", booking_id);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.shared.loading.load(Ordering::SeqCst)
    }

    /// True once the engine stopped over an expired session.
    pub fn is_halted(&self) -> bool {
        self.shared.halted()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.shared.error.lock().await.clone()
    }

    /// Tear the engine down: no further tick, safety timeout, or in-flight
    /// completion will touch the cache after this returns.
    pub fn shutdown(&self) {
        self.shared.halted.store(true, Ordering::SeqCst);
        let _ = self.commands.send(Command::Shutdown);
        self.driver.abort();
    }
}

impl Drop for PollController {
    fn drop(&mut self) {
        self.shared.halted.store(true, Ordering::SeqCst);
        self.driver.abort();
    }
}
