//! Transport layer: the TCP session, its flow control and controller input

pub mod input;
pub mod session;
pub mod throttle;

pub use input::{Button, Stick, StickPosition, StickState};
pub use session::{
    Session, SessionOptions, DEFAULT_CLOSE_GRACE, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT,
    DEFAULT_RECEIVE_TIMEOUT,
};
pub use throttle::{Throttle, DEFAULT_BYTES_PER_SECOND};

use std::sync::Arc;
use tokio::sync::Mutex;

/// A session shared between the controller and the position poller.
///
/// The mutex is the single point of serialization: whoever holds it owns
/// the stream until its request/reply cycle is finished.
pub type SharedSession = Arc<Mutex<Session>>;

/// Wraps a connected session for sharing
pub fn share(session: Session) -> SharedSession {
    Arc::new(Mutex::new(session))
}
