//! Transport seam between the session driver and the network

use crate::error::ConsoleResult;
use async_trait::async_trait;
use url::Url;

/// Opens bidirectional text streams
#[async_trait]
pub trait Transport: Send + Sync {
    async fn connect(&self, endpoint: &Url) -> ConsoleResult<Box<dyn Connection>>;
}

/// One open text stream
#[async_trait]
pub trait Connection: Send {
    async fn send(&mut self, text: String) -> ConsoleResult<()>;

    /// Next text frame; `None` once the peer has closed the stream
    async fn recv(&mut self) -> Option<ConsoleResult<String>>;

    async fn close(&mut self) -> ConsoleResult<()>;
}
