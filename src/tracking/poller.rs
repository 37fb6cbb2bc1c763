//! Periodic position sampling on a shared session

use super::transform::Calibration;
use crate::core::types::{
    AddressSpec, BridgeError, BridgeResult, ErrorKind, MapPosition, WorldPosition,
    WORLD_POSITION_SIZE,
};
use crate::events::BridgeEvent;
use crate::transport::SharedSession;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

/// Main-module offset of the player's world position
pub const DEFAULT_POSITION_ADDRESS: u64 = 0x42D6110;

/// Time between ticks
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// What to sample and how to project it
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingConfig {
    pub interval: Duration,
    /// Location of three packed `f32`s `(x, y, z)`
    pub address: AddressSpec,
    pub calibration: Calibration,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        TrackingConfig {
            interval: DEFAULT_INTERVAL,
            address: AddressSpec::main(DEFAULT_POSITION_ADDRESS),
            calibration: Calibration::default(),
        }
    }
}

#[derive(Debug)]
struct TrackingState {
    active: bool,
    marker: Option<MapPosition>,
    ticks: u64,
    /// Set once when a tick fails; never set after `stop`
    failure: Option<BridgeError>,
}

fn lock(state: &Mutex<TrackingState>) -> MutexGuard<'_, TrackingState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running position tracker.
///
/// Dropping or stopping it cancels every future tick. A tick already
/// blocked on the socket finishes, but its outcome is not reported.
#[derive(Debug)]
pub struct TrackingSession {
    id: u64,
    cancel: CancellationToken,
    state: Arc<Mutex<TrackingState>>,
    handle: Option<JoinHandle<()>>,
}

impl TrackingSession {
    /// Spawns the ticker on the current runtime
    pub fn start(
        id: u64,
        session: SharedSession,
        config: TrackingConfig,
        events: UnboundedSender<BridgeEvent>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let state = Arc::new(Mutex::new(TrackingState {
            active: true,
            marker: None,
            ticks: 0,
            failure: None,
        }));

        let poller = Poller {
            id,
            session,
            config,
            events,
            state: Arc::clone(&state),
            cancel: cancel.clone(),
        };
        let handle = tokio::spawn(poller.run());

        TrackingSession {
            id,
            cancel,
            state,
            handle: Some(handle),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).active
    }

    /// Last reported position, absent until the first successful tick
    pub fn marker(&self) -> Option<MapPosition> {
        lock(&self.state).marker
    }

    /// Number of successful ticks so far
    pub fn ticks(&self) -> u64 {
        lock(&self.state).ticks
    }

    /// Kind of the error that ended the session, if a tick failed
    pub fn failure(&self) -> Option<ErrorKind> {
        lock(&self.state).failure.as_ref().map(BridgeError::kind)
    }

    pub fn has_failed(&self) -> bool {
        lock(&self.state).failure.is_some()
    }

    /// Hands over the error that ended the session; later calls return `None`
    pub fn take_failure(&mut self) -> Option<BridgeError> {
        lock(&self.state).failure.take()
    }

    /// Marks the session inactive and cancels pending ticks. Idempotent.
    pub fn stop(&mut self) {
        let was_active = std::mem::replace(&mut lock(&self.state).active, false);
        self.cancel.cancel();
        if was_active {
            info!(tracking_id = self.id, "position tracking stopped");
        }
    }

    /// Stops and waits for an in-flight tick to finish
    pub async fn join(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!(tracking_id = self.id, error = %e, "tracking task panicked");
            }
        }
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Poller {
    id: u64,
    session: SharedSession,
    config: TrackingConfig,
    events: UnboundedSender<BridgeEvent>,
    state: Arc<Mutex<TrackingState>>,
    cancel: CancellationToken,
}

impl Poller {
    async fn run(self) {
        let interval = self.config.interval;
        let mut ticker = interval_at(Instant::now() + interval, interval);
        // A slow read stretches the period instead of queueing catch-up ticks
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(tracking_id = self.id, address = %self.config.address, "position tracking started");

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let mut session = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                guard = self.session.lock() => guard,
            };
            let result = session.read(&self.config.address, WORLD_POSITION_SIZE).await;
            drop(session);

            if !self.report(result) {
                break;
            }
        }

        lock(&self.state).active = false;
        debug!(tracking_id = self.id, "position tracking task finished");
    }

    /// Publishes one tick's outcome; returns whether ticking should continue
    fn report(&self, result: BridgeResult<Vec<u8>>) -> bool {
        // Holding the state lock while sending keeps `stop` from racing a late report
        let mut state = lock(&self.state);
        if !state.active {
            trace!(tracking_id = self.id, "discarding tick that finished after stop");
            return false;
        }

        let sample = result.and_then(|bytes| {
            let world = WorldPosition::from_le_bytes(&bytes)?;
            Ok((world, self.config.calibration.to_map(world)))
        });

        match sample {
            Ok((world, position)) => {
                let first = state.marker.is_none();
                state.marker = Some(position);
                state.ticks += 1;
                debug!(tracking_id = self.id, %position, x = world.x, z = world.z, "position updated");

                let event = BridgeEvent::PositionUpdated {
                    tracking_id: self.id,
                    position,
                    world,
                    first,
                };
                if self.events.send(event).is_err() {
                    debug!(tracking_id = self.id, "event receiver dropped, stopping");
                    state.active = false;
                    return false;
                }
                true
            }
            Err(e) => {
                error!(tracking_id = self.id, error = %e, "position tracking failed");
                state.active = false;
                self.cancel.cancel();
                // Recorded before the event goes out so the owner sees it without the channel
                let event = BridgeEvent::tracking_failed(self.id, &e);
                state.failure = Some(e);
                let _ = self.events.send(event);
                false
            }
        }
    }
}
