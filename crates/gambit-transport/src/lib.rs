//! Real-time transport for Gambit.
//!
//! Clients talk to the server over a persistent, bidirectional channel of
//! text frames. This crate hides how that channel is built behind two
//! traits: [`Transport`] hands out new [`Connection`]s, and a connection
//! moves whole text frames in each direction. It never looks inside a
//! frame. JSON commands and replies are `gambit-protocol`'s concern.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — [`WebSocketTransport`] on `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;
use std::net::SocketAddr;

/// Names one client connection for as long as the process runs.
///
/// Coordinators key their participant tables by it, and it shows up in
/// every log line about the connection as `conn-N`. A client that drops
/// and reconnects gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A listener that produces connections.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next client and completes its handshake.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Where the listener is bound. Tests bind to port 0 and read the real
    /// port back from here.
    fn local_addr(&self) -> Result<SocketAddr, Self::Error>;
}

/// One client's channel of text frames.
///
/// The server reads from one task and writes from another, so `send` and
/// `recv` take `&self` and must not block each other.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Writes one frame.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Reads the next frame, or `Ok(None)` once the peer has closed.
    async fn recv(&self) -> Result<Option<String>, Self::Error>;

    /// Starts a clean shutdown from our side.
    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;

    fn peer_addr(&self) -> SocketAddr;
}
