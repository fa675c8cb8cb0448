//! Test doubles shared by the lookup client's unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::error::LoadError;
use crate::loader::DatasetSource;

enum Outcome {
    Payload(Value),
    Status(u16),
}

/// Counts how many times a [`FakeSource`] was fetched.
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// In-memory source with a scripted outcome and optional latency.
pub struct FakeSource {
    outcome: Outcome,
    delay: Option<Duration>,
    calls: CallCounter,
}

impl FakeSource {
    pub fn ok(payload: Value) -> Self {
        Self::with_outcome(Outcome::Payload(payload))
    }

    pub fn status(status: u16) -> Self {
        Self::with_outcome(Outcome::Status(status))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            delay: None,
            calls: CallCounter::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl DatasetSource for FakeSource {
    async fn fetch(&self) -> Result<Value, LoadError> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Outcome::Payload(value) => Ok(value.clone()),
            Outcome::Status(status) => Err(LoadError::Status {
                status: *status,
                reason: "Service Unavailable".to_string(),
            }),
        }
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

/// Serve a single HTTP response on an ephemeral port and return its URL.
pub async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}/crime.json")
}
