//! Events produced for external consumers

use crate::controller::OperatorNotice;
use crate::core::types::{AddressSpec, BridgeError, ErrorKind, MapPosition, WorldPosition};
use serde::Serialize;

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BridgeEvent {
    /// A tracking tick produced a new position; `first` marks marker creation
    PositionUpdated {
        tracking_id: u64,
        position: MapPosition,
        world: WorldPosition,
        first: bool,
    },
    /// Tracking stopped because of an error; no further ticks follow
    TrackingFailed {
        tracking_id: u64,
        kind: ErrorKind,
        message: String,
    },
    /// A direct read returned its bytes
    ReadCompleted { spec: AddressSpec, bytes: Vec<u8> },
    /// The session was closed; `notice` is present when a fatal error closed it
    ConnectionClosed {
        #[serde(skip_serializing_if = "Option::is_none")]
        notice: Option<OperatorNotice>,
    },
}

impl BridgeEvent {
    pub fn tracking_failed(tracking_id: u64, error: &BridgeError) -> Self {
        BridgeEvent::TrackingFailed {
            tracking_id,
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    /// Id of the tracking session that produced the event, if any
    pub fn tracking_id(&self) -> Option<u64> {
        match self {
            BridgeEvent::PositionUpdated { tracking_id, .. }
            | BridgeEvent::TrackingFailed { tracking_id, .. } => Some(*tracking_id),
            _ => None,
        }
    }
}
