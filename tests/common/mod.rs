//! Scripted stand-in for a debug bridge, shared by the integration tests

#![allow(dead_code)]

use live_map_core::protocol::encode_payload;
use live_map_core::tracking::TrackingConfig;
use live_map_core::transport::{SessionOptions, Throttle};
use live_map_core::ControllerSettings;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// How the fake bridge answers one read command
#[derive(Debug, Clone)]
pub enum Reply {
    /// A well-formed frame for these bytes
    Payload(Vec<u8>),
    /// Exactly these bytes
    Raw(Vec<u8>),
    /// These bytes, then the connection is closed
    Truncated(Vec<u8>),
    /// A well-formed frame, sent after a pause
    Delayed(Duration, Vec<u8>),
    /// Nothing; the connection stays open
    Silent,
}

pub struct FakeBridge {
    pub port: u16,
    lines: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl FakeBridge {
    /// Accepts one client and answers its reads from `replies` in order
    pub async fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let lines = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&lines);

        let task = tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let (reader, mut writer) = stream.into_split();
            let mut reader = BufReader::new(reader).lines();
            let mut replies = replies.into_iter();

            while let Ok(Some(line)) = reader.next_line().await {
                let is_read = line.starts_with("peek") || line.starts_with("pointerPeek");
                recorded.lock().unwrap().push(line);
                if !is_read {
                    continue;
                }
                match replies.next() {
                    Some(Reply::Payload(bytes)) => {
                        let _ = writer.write_all(&encode_payload(&bytes)).await;
                    }
                    Some(Reply::Delayed(pause, bytes)) => {
                        tokio::time::sleep(pause).await;
                        let _ = writer.write_all(&encode_payload(&bytes)).await;
                    }
                    Some(Reply::Raw(raw)) => {
                        let _ = writer.write_all(&raw).await;
                    }
                    Some(Reply::Truncated(raw)) => {
                        let _ = writer.write_all(&raw).await;
                        let _ = writer.shutdown().await;
                        break;
                    }
                    Some(Reply::Silent) | None => {}
                }
            }
        });

        FakeBridge { port, lines, task }
    }

    /// Command lines received so far, terminators stripped
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Lines received so far that start with `verb`
    pub fn count(&self, verb: &str) -> usize {
        self.lines()
            .iter()
            .filter(|line| line.split(' ').next() == Some(verb))
            .count()
    }

    /// Waits until at least `n` lines have arrived
    pub async fn wait_for_lines(&self, n: usize) -> Vec<String> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let lines = self.lines();
            if lines.len() >= n || tokio::time::Instant::now() >= deadline {
                return lines;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Session options tuned for tests: no close grace, short receive timeout
pub fn fast_options(receive_timeout: Duration) -> SessionOptions {
    SessionOptions {
        connect_timeout: Duration::from_secs(1),
        receive_timeout,
        close_grace: Duration::ZERO,
        throttle: Throttle::default(),
    }
}

/// Controller settings pointing at a fake bridge
pub fn settings_for(bridge: &FakeBridge, receive_timeout: Duration) -> ControllerSettings {
    ControllerSettings {
        host: "127.0.0.1".to_string(),
        port: bridge.port,
        session: fast_options(receive_timeout),
        tracking: TrackingConfig {
            interval: Duration::from_millis(50),
            ..TrackingConfig::default()
        },
    }
}

/// Packs a world position the way the game stores it
pub fn world_bytes(x: f32, y: f32, z: f32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(12);
    for v in [x, y, z] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}
