//! TCP session with the debug bridge
//!
//! A [`Session`] is either connected (it owns a socket) or closed. Every
//! operation runs request → throttle → receive to completion before the
//! next one starts; callers that share a session must serialize access.

use super::input::{Button, Stick, StickPosition, StickState};
use super::throttle::Throttle;
use crate::core::types::{
    le_uint, AddressSpec, BridgeError, BridgeResult, MemoryValue, ValueType,
};
use crate::protocol::{
    decode_payload, read_frame_len, resolve_read, resolve_write, Arg, Command, Verb,
};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

/// Port the bridge listens on unless configured otherwise
pub const DEFAULT_PORT: u16 = 6000;

/// Upper bound on a single receive
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_secs(1);

/// Upper bound on opening the socket
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Pause before shutting the socket down, letting queued input commands drain
pub const DEFAULT_CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Tunables for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub connect_timeout: Duration,
    pub receive_timeout: Duration,
    pub close_grace: Duration,
    pub throttle: Throttle,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
            close_grace: DEFAULT_CLOSE_GRACE,
            throttle: Throttle::default(),
        }
    }
}

/// Connection to one debug bridge
#[derive(Debug)]
pub struct Session {
    stream: Option<TcpStream>,
    host: String,
    port: u16,
    options: SessionOptions,
    sticks: StickState,
}

impl Session {
    /// Connects with default options
    pub async fn connect(host: &str, port: u16) -> BridgeResult<Self> {
        Self::connect_with(host, port, SessionOptions::default()).await
    }

    /// Opens the socket and disables command echo.
    ///
    /// Either both steps succeed and a connected session is returned, or
    /// the socket is dropped and a [`BridgeError::Connection`] is returned.
    pub async fn connect_with(host: &str, port: u16, options: SessionOptions) -> BridgeResult<Self> {
        let target = format!("{host}:{port}");
        debug!(%target, "connecting to debug bridge");

        let stream = timeout(options.connect_timeout, TcpStream::connect(&target))
            .await
            .map_err(|_| {
                BridgeError::connection(format!(
                    "timed out after {} ms connecting to {target}",
                    options.connect_timeout.as_millis()
                ))
            })?
            .map_err(|e| BridgeError::connection_io(format!("could not connect to {target}"), e))?;

        if let Err(e) = stream.set_nodelay(true) {
            debug!(error = %e, "could not disable Nagle's algorithm");
        }

        let mut session = Session {
            stream: Some(stream),
            host: host.to_string(),
            port,
            options,
            sticks: StickState::default(),
        };

        let handshake = Command::verb(Verb::Configure)
            .arg(Arg::word("echoCommands"))
            .arg(Arg::Decimal(0));
        if let Err(e) = session.send(&handshake).await {
            session.stream = None;
            return Err(BridgeError::connection(format!(
                "handshake with {target} failed: {e}"
            )));
        }

        info!(%target, "connected to debug bridge");
        Ok(session)
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Last stick positions sent on this session
    pub fn stick_state(&self) -> StickState {
        self.sticks
    }

    fn stream_mut(&mut self) -> BridgeResult<&mut TcpStream> {
        self.stream.as_mut().ok_or(BridgeError::NotConnected)
    }

    /// Writes one command line to the socket
    pub async fn send(&mut self, command: &Command) -> BridgeResult<()> {
        trace!(%command, "sending command");
        let line = command.encode();
        let stream = self.stream_mut()?;
        stream
            .write_all(&line)
            .await
            .map_err(|e| BridgeError::connection_io(format!("failed to send {:?}", command.verb_str()), e))
    }

    /// Receives one `expected`-byte reply frame and decodes it to `size` bytes
    async fn receive(&mut self, size: usize, expected: usize) -> BridgeResult<Vec<u8>> {
        let receive_timeout = self.options.receive_timeout;
        let mut frame = vec![0u8; expected];
        let stream = self.stream_mut()?;

        let received = timeout(receive_timeout, stream.read_exact(&mut frame)).await;
        match received {
            Err(_) => Err(BridgeError::timeout(receive_timeout)),
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => Err(BridgeError::malformed(
                format!("stream ended before a {expected}-byte frame arrived"),
            )),
            Ok(Err(e)) if e.kind() == io::ErrorKind::TimedOut => {
                Err(BridgeError::timeout(receive_timeout))
            }
            Ok(Err(e)) => Err(BridgeError::connection_io("failed to receive reply", e)),
            Ok(Ok(_)) => decode_payload(&frame, size),
        }
    }

    /// Reads exactly `size` bytes at `spec`.
    ///
    /// Sizes above [`crate::protocol::MAX_READ_SIZE`] are rejected before
    /// anything is sent.
    pub async fn read(&mut self, spec: &AddressSpec, size: usize) -> BridgeResult<Vec<u8>> {
        let expected = read_frame_len(size)?;
        let command = resolve_read(spec, size);
        self.send(&command).await?;
        self.options.throttle.pause(size).await;

        match self.receive(size, expected).await {
            Ok(bytes) => {
                debug!(%spec, size, "read completed");
                Ok(bytes)
            }
            Err(e) => {
                warn!(%spec, size, error = %e, "read failed");
                Err(e)
            }
        }
    }

    /// Writes `data` at `spec`; the bridge sends no acknowledgement
    pub async fn write(&mut self, spec: &AddressSpec, data: &[u8]) -> BridgeResult<()> {
        let command = resolve_write(spec, data);
        self.send(&command).await?;
        self.options.throttle.pause(data.len()).await;
        debug!(%spec, size = data.len(), "write sent");
        Ok(())
    }

    /// Reads one typed little-endian value
    pub async fn read_value(
        &mut self,
        spec: &AddressSpec,
        value_type: ValueType,
    ) -> BridgeResult<MemoryValue> {
        let bytes = self.read(spec, value_type.size()).await?;
        MemoryValue::from_le_bytes(&bytes, value_type)
    }

    /// Reads `size` bytes (at most 8) as an unsigned little-endian integer
    pub async fn read_u64(&mut self, spec: &AddressSpec, size: usize) -> BridgeResult<u64> {
        if size > 8 {
            return Err(BridgeError::InvalidValueType(format!(
                "integer of {size} bytes does not fit in 64 bits"
            )));
        }
        let bytes = self.read(spec, size).await?;
        le_uint(&bytes)
    }

    /// Writes one typed value in little-endian order
    pub async fn write_value(&mut self, spec: &AddressSpec, value: MemoryValue) -> BridgeResult<()> {
        self.write(spec, &value.to_le_bytes()).await
    }

    /// Presses and immediately releases a button
    pub async fn click(&mut self, button: Button) -> BridgeResult<()> {
        self.send(&Command::verb(Verb::Click).arg(Arg::word(button.as_str())))
            .await
    }

    /// Presses and holds a button
    pub async fn press(&mut self, button: Button) -> BridgeResult<()> {
        self.send(&Command::verb(Verb::Press).arg(Arg::word(button.as_str())))
            .await
    }

    /// Releases a held button
    pub async fn release(&mut self, button: Button) -> BridgeResult<()> {
        self.send(&Command::verb(Verb::Release).arg(Arg::word(button.as_str())))
            .await
    }

    /// Moves a stick; an axis left as `None` keeps its last sent value
    pub async fn move_stick(
        &mut self,
        stick: Stick,
        x: Option<i16>,
        y: Option<i16>,
    ) -> BridgeResult<StickPosition> {
        // Merge into a copy so a failed send does not record an unsent position
        let mut sticks = self.sticks;
        let position = sticks.merge(stick, x, y);
        let command = Command::verb(Verb::SetStick)
            .arg(Arg::word(stick.as_str()))
            .arg(Arg::Decimal(i64::from(position.x)))
            .arg(Arg::Decimal(i64::from(position.y)));
        self.send(&command).await?;
        self.sticks = sticks;
        Ok(position)
    }

    pub async fn move_left_stick(
        &mut self,
        x: Option<i16>,
        y: Option<i16>,
    ) -> BridgeResult<StickPosition> {
        self.move_stick(Stick::Left, x, y).await
    }

    pub async fn move_right_stick(
        &mut self,
        x: Option<i16>,
        y: Option<i16>,
    ) -> BridgeResult<StickPosition> {
        self.move_stick(Stick::Right, x, y).await
    }

    /// Shuts the socket down gracefully. Closing a closed session is a no-op.
    pub async fn close(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            trace!("close on an already closed session");
            return;
        };

        info!(host = %self.host, port = self.port, "closing debug bridge session");
        if !self.options.close_grace.is_zero() {
            tokio::time::sleep(self.options.close_grace).await;
        }
        if let Err(e) = stream.shutdown().await {
            // The peer may already be gone after a transport failure
            debug!(error = %e, "socket shutdown failed");
        }
        drop(stream);
        info!("disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = SessionOptions::default();
        assert_eq!(options.receive_timeout, Duration::from_secs(1));
        assert_eq!(options.connect_timeout, Duration::from_secs(1));
        assert_eq!(options.throttle, Throttle::default());
    }

    #[tokio::test]
    async fn test_connect_refused_is_connection_error() {
        // Bind then drop to get a port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = Session::connect("127.0.0.1", port).await;
        assert!(matches!(result, Err(BridgeError::Connection { .. })));
    }
}
