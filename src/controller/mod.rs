//! Connection lifecycle: connect, track, and tear down on fatal errors
//!
//! The controller owns at most one session and at most one tracking
//! session attached to it. Every connection-fatal error, whether it comes
//! from a direct read or from the poller, goes through
//! [`Controller::fail_connection`], so the two never outlive each other.

mod notice;

pub use notice::OperatorNotice;

use crate::core::types::{AddressSpec, BridgeError, BridgeResult, MapPosition};
use crate::events::BridgeEvent;
use crate::tracking::{TrackingConfig, TrackingSession};
use crate::transport::{
    self, Button, Session, SessionOptions, SharedSession, Stick, StickPosition, DEFAULT_PORT,
};
use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Externally visible connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Tracking,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connected => "connected",
            ConnectionState::Tracking => "tracking",
        };
        f.write_str(name)
    }
}

/// Plain-value settings the controller runs with
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub host: String,
    pub port: u16,
    pub session: SessionOptions,
    pub tracking: TrackingConfig,
}

impl ControllerSettings {
    pub fn new(host: impl Into<String>) -> Self {
        ControllerSettings {
            host: host.into(),
            port: DEFAULT_PORT,
            session: SessionOptions::default(),
            tracking: TrackingConfig::default(),
        }
    }
}

/// Drives one debug-bridge connection on behalf of a front end
pub struct Controller {
    settings: ControllerSettings,
    session: Option<SharedSession>,
    tracking: Option<TrackingSession>,
    /// Tracking session torn down by its own failure; its queued events are still delivered
    failed_tracking: Option<u64>,
    next_tracking_id: u64,
    events_tx: UnboundedSender<BridgeEvent>,
    events_rx: UnboundedReceiver<BridgeEvent>,
}

impl Controller {
    pub fn new(settings: ControllerSettings) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Controller {
            settings,
            session: None,
            tracking: None,
            failed_tracking: None,
            next_tracking_id: 1,
            events_tx,
            events_rx,
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Changes the target used by the next [`Controller::connect`]
    pub fn set_target(&mut self, host: impl Into<String>, port: u16) {
        self.settings.host = host.into();
        self.settings.port = port;
    }

    /// Current state. A session whose poller has failed counts as
    /// disconnected even before the teardown has run.
    pub fn state(&self) -> ConnectionState {
        match (&self.session, &self.tracking) {
            (None, _) => ConnectionState::Disconnected,
            (Some(_), Some(tracking)) if tracking.has_failed() => ConnectionState::Disconnected,
            (Some(_), Some(tracking)) if tracking.is_active() => ConnectionState::Tracking,
            (Some(_), _) => ConnectionState::Connected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state() != ConnectionState::Disconnected
    }

    /// Current tracking marker, if tracking has produced one
    pub fn marker(&self) -> Option<MapPosition> {
        self.tracking.as_ref().and_then(TrackingSession::marker)
    }

    /// Connects to the configured target; a no-op when already connected
    pub async fn connect(&mut self) -> BridgeResult<()> {
        self.reap_tracking().await;
        if self.session.is_some() {
            debug!("connect requested while already connected");
            return Ok(());
        }
        let session =
            Session::connect_with(&self.settings.host, self.settings.port, self.settings.session)
                .await?;
        self.session = Some(transport::share(session));
        Ok(())
    }

    /// Stops tracking and closes the session; a no-op when disconnected
    pub async fn disconnect(&mut self) {
        self.reap_tracking().await;
        self.close_session(None).await;
    }

    /// Connects when disconnected, disconnects otherwise
    pub async fn toggle_connection(&mut self) -> BridgeResult<ConnectionState> {
        self.reap_tracking().await;
        if self.is_connected() {
            self.disconnect().await;
        } else {
            self.connect().await?;
        }
        Ok(self.state())
    }

    /// Starts position tracking on the current session
    pub async fn start_tracking(&mut self) -> BridgeResult<()> {
        let session = self.connected().await?;
        if self.tracking.as_ref().is_some_and(TrackingSession::is_active) {
            debug!("tracking already active");
            return Ok(());
        }

        let id = self.next_tracking_id;
        self.next_tracking_id += 1;
        self.tracking = Some(TrackingSession::start(
            id,
            session,
            self.settings.tracking.clone(),
            self.events_tx.clone(),
        ));
        Ok(())
    }

    /// Stops position tracking; returns whether it was running
    pub async fn stop_tracking(&mut self) -> bool {
        self.reap_tracking().await;
        self.detach_tracking()
    }

    /// Starts tracking when idle, stops it otherwise
    pub async fn toggle_tracking(&mut self) -> BridgeResult<ConnectionState> {
        self.reap_tracking().await;
        if self.state() == ConnectionState::Tracking {
            self.detach_tracking();
        } else {
            self.start_tracking().await?;
        }
        Ok(self.state())
    }

    /// Tears down tracking and the session after a fatal error.
    ///
    /// The returned notice is also carried by the `ConnectionClosed` event.
    pub async fn fail_connection(&mut self, error: &BridgeError) -> OperatorNotice {
        warn!(error = %error, "connection-fatal error, disconnecting");
        let notice = OperatorNotice::from_error(error);
        self.close_session(Some(notice.clone())).await;
        notice
    }

    fn detach_tracking(&mut self) -> bool {
        match self.tracking.take() {
            Some(mut tracking) => {
                let was_active = tracking.is_active();
                tracking.stop();
                was_active
            }
            None => false,
        }
    }

    async fn close_session(&mut self, notice: Option<OperatorNotice>) {
        self.detach_tracking();
        let Some(session) = self.session.take() else {
            return;
        };
        // Waits for any tick still holding the session
        session.lock().await.close().await;
        let _ = self.events_tx.send(BridgeEvent::ConnectionClosed { notice });
    }

    /// Runs the fatal transition if the poller has failed since the last call
    async fn reap_tracking(&mut self) {
        if !self.tracking.as_ref().is_some_and(TrackingSession::has_failed) {
            return;
        }
        let Some(mut tracking) = self.tracking.take() else {
            return;
        };
        self.failed_tracking = Some(tracking.id());
        if let Some(error) = tracking.take_failure() {
            self.fail_connection(&error).await;
        }
    }

    async fn connected(&mut self) -> BridgeResult<SharedSession> {
        self.reap_tracking().await;
        self.session.clone().ok_or(BridgeError::NotConnected)
    }

    /// Applies the fatal-error transition to a failed operation
    async fn settle<T>(&mut self, result: BridgeResult<T>) -> BridgeResult<T> {
        if let Err(e) = &result {
            if e.is_connection_fatal() {
                self.fail_connection(e).await;
            }
        }
        result
    }

    /// Reads `size` bytes and reports them as [`BridgeEvent::ReadCompleted`]
    pub async fn read(&mut self, spec: &AddressSpec, size: usize) -> BridgeResult<Vec<u8>> {
        let session = self.connected().await?;
        let result = session.lock().await.read(spec, size).await;
        let bytes = self.settle(result).await?;
        let _ = self.events_tx.send(BridgeEvent::ReadCompleted {
            spec: spec.clone(),
            bytes: bytes.clone(),
        });
        Ok(bytes)
    }

    pub async fn write(&mut self, spec: &AddressSpec, data: &[u8]) -> BridgeResult<()> {
        let session = self.connected().await?;
        let result = session.lock().await.write(spec, data).await;
        self.settle(result).await
    }

    pub async fn click(&mut self, button: Button) -> BridgeResult<()> {
        let session = self.connected().await?;
        let result = session.lock().await.click(button).await;
        self.settle(result).await
    }

    pub async fn press(&mut self, button: Button) -> BridgeResult<()> {
        let session = self.connected().await?;
        let result = session.lock().await.press(button).await;
        self.settle(result).await
    }

    pub async fn release(&mut self, button: Button) -> BridgeResult<()> {
        let session = self.connected().await?;
        let result = session.lock().await.release(button).await;
        self.settle(result).await
    }

    pub async fn move_stick(
        &mut self,
        stick: Stick,
        x: Option<i16>,
        y: Option<i16>,
    ) -> BridgeResult<StickPosition> {
        let session = self.connected().await?;
        let result = session.lock().await.move_stick(stick, x, y).await;
        self.settle(result).await
    }

    /// Waits for the next event.
    ///
    /// A `TrackingFailed` event is returned only after the connection has
    /// been torn down, and is followed by `ConnectionClosed`. Events from
    /// tracking sessions that were stopped on request are dropped.
    pub async fn next_event(&mut self) -> Option<BridgeEvent> {
        self.reap_tracking().await;
        loop {
            let event = self.events_rx.recv().await?;
            if let Some(event) = self.accept(event).await {
                return Some(event);
            }
        }
    }

    /// Returns an already queued event without waiting
    pub async fn try_next_event(&mut self) -> Option<BridgeEvent> {
        self.reap_tracking().await;
        while let Ok(event) = self.events_rx.try_recv() {
            if let Some(event) = self.accept(event).await {
                return Some(event);
            }
        }
        None
    }

    async fn accept(&mut self, event: BridgeEvent) -> Option<BridgeEvent> {
        let Some(id) = event.tracking_id() else {
            return Some(event);
        };

        let current = self.tracking.as_ref().map(TrackingSession::id);
        let is_failure = matches!(event, BridgeEvent::TrackingFailed { .. });
        if current == Some(id) {
            if let BridgeEvent::TrackingFailed { kind, message, .. } = &event {
                info!(%kind, %message, "tracking failed, closing connection");
            }
            if is_failure {
                self.reap_tracking().await;
            }
            return Some(event);
        }
        // A session that ended by failure was not stopped on request; its backlog still counts
        if self.failed_tracking == Some(id) {
            return Some(event);
        }

        debug!(tracking_id = id, "dropping event from a stopped tracking session");
        None
    }
}
