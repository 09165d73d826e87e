// Common test utilities for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use kkconsole_core::error::{ConsoleError, ConsoleResult};
use kkconsole_core::session::{Connection, Transport};
use kkconsole_core::spec::{Host, ROLE_ETCD, ROLE_MASTER, ROLE_WORKER};
use kkconsole_core::{ConsoleConfig, Wizard};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One step of a scripted backend stream
#[derive(Debug, Clone)]
pub enum Frame {
    Text(String),
    Error(String),
    /// Never resolves; used to hold a session open
    Hang,
}

pub fn text(line: &str) -> Frame {
    Frame::Text(line.to_string())
}

/// What the scripted backend observed
#[derive(Debug, Default)]
pub struct Observed {
    pub connected_to: Mutex<Vec<String>>,
    pub sent: Mutex<Vec<String>>,
    pub closed: AtomicBool,
}

impl Observed {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Transport replaying a fixed list of frames
pub struct ScriptedTransport {
    frames: Vec<Frame>,
    connect_error: Option<String>,
    pub observed: Arc<Observed>,
}

impl ScriptedTransport {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            connect_error: None,
            observed: Arc::new(Observed::default()),
        }
    }

    pub fn refusing(reason: &str) -> Self {
        Self {
            frames: Vec::new(),
            connect_error: Some(reason.to_string()),
            observed: Arc::new(Observed::default()),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&self, endpoint: &url::Url) -> ConsoleResult<Box<dyn Connection>> {
        self.observed
            .connected_to
            .lock()
            .unwrap()
            .push(endpoint.to_string());
        if let Some(reason) = &self.connect_error {
            return Err(ConsoleError::connection(reason.clone()));
        }
        Ok(Box::new(ScriptedConnection {
            frames: self.frames.iter().cloned().collect(),
            observed: Arc::clone(&self.observed),
        }))
    }
}

struct ScriptedConnection {
    frames: VecDeque<Frame>,
    observed: Arc<Observed>,
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn send(&mut self, text: String) -> ConsoleResult<()> {
        self.observed.sent.lock().unwrap().push(text);
        Ok(())
    }

    async fn recv(&mut self) -> Option<ConsoleResult<String>> {
        match self.frames.pop_front() {
            Some(Frame::Text(line)) => Some(Ok(line)),
            Some(Frame::Error(reason)) => Some(Err(ConsoleError::connection(reason))),
            Some(Frame::Hang) => futures::future::pending().await,
            None => None,
        }
    }

    async fn close(&mut self) -> ConsoleResult<()> {
        self.observed.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Install wizard whose every gate passes
pub fn ready_install_wizard(config: &ConsoleConfig) -> Wizard {
    let mut wizard = Wizard::install(config).unwrap();
    wizard
        .document_mut()
        .add_host(
            Host::new("node1", "172.16.0.2", "172.16.0.2"),
            &[ROLE_MASTER, ROLE_ETCD, ROLE_WORKER],
        )
        .unwrap();
    while wizard.advance() {}
    wizard
}

/// Serve one canned JSON response per accepted connection, `count` times.
/// Returns the port.
pub async fn serve_json(responses: Vec<(u16, String)>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        for (status, body) in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let reason = if status == 200 { "OK" } else { "Internal Server Error" };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    port
}
