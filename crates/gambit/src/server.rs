//! `GambitServer` builder and server loop.
//!
//! This is the entry point for running a Gambit server. It ties together
//! all the layers: transport → protocol → session → room.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use gambit_protocol::{Codec, JsonCodec};
use gambit_room::{CoordinatorConfig, Lobby};
use gambit_session::{Authenticator, GameStore};
use gambit_transport::{Transport, WebSocketTransport};
use serde::{Deserialize, Serialize};

use crate::GambitError;
use crate::handler::handle_connection;

/// Where to listen and how long a connection may idle before joining a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `"0.0.0.0:8080"`.
    pub bind_addr: String,
    /// A connection that has joined no game and sends nothing for this
    /// long is closed. Joined connections are never timed out.
    pub idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            idle_timeout: Duration::from_secs(300),
        }
    }
}

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The lobby
/// is the only shared mutable piece, and it locks internally.
pub(crate) struct ServerState<A, S, C> {
    pub(crate) lobby: Lobby<S>,
    pub(crate) auth: A,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Duration,
}

/// Builder for configuring and starting a Gambit server.
///
/// # Example
///
/// ```rust,ignore
/// use gambit::prelude::*;
///
/// let server = GambitServer::builder()
///     .bind("0.0.0.0:8080")
///     .build(auth, Arc::new(store))
///     .await?;
/// server.run().await
/// ```
pub struct GambitServerBuilder {
    config: ServerConfig,
    coordinator_config: CoordinatorConfig,
}

impl GambitServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::from_config(ServerConfig::default())
    }

    /// Starts from an existing configuration, e.g. one read from a file.
    pub fn from_config(config: ServerConfig) -> Self {
        Self {
            config,
            coordinator_config: CoordinatorConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets how long a connection may stay silent before joining a game.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    /// Sets the settings every game coordinator is spawned with.
    pub fn coordinator_config(mut self, config: CoordinatorConfig) -> Self {
        self.coordinator_config = config;
        self
    }

    /// Binds the listener and returns a server ready to [`run`](GambitServer::run).
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    ///
    /// # Errors
    /// [`GambitError::Transport`] if the address cannot be bound.
    pub async fn build<A, S>(
        self,
        auth: A,
        store: Arc<S>,
    ) -> Result<GambitServer<A, S>, GambitError>
    where
        A: Authenticator,
        S: GameStore,
    {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;

        let state = Arc::new(ServerState {
            lobby: Lobby::new(store, self.coordinator_config),
            auth,
            codec: JsonCodec,
            idle_timeout: self.config.idle_timeout,
        });

        Ok(GambitServer { transport, state })
    }
}

impl Default for GambitServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Gambit server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GambitServer<A, S, C = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, S, C>>,
}

impl GambitServer<(), ()> {
    /// Creates a new builder.
    pub fn builder() -> GambitServerBuilder {
        GambitServerBuilder::new()
    }
}

impl<A, S, C> GambitServer<A, S, C>
where
    A: Authenticator,
    S: GameStore,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, GambitError> {
        Ok(self.transport.local_addr()?)
    }

    /// The registry of running games.
    pub fn lobby(&self) -> &Lobby<S> {
        &self.state.lobby
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// A failed accept is logged and does not stop the loop. Runs until
    /// the process is terminated.
    pub async fn run(mut self) -> Result<(), GambitError> {
        tracing::info!(addr = ?self.transport.local_addr().ok(), "gambit server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_partial_json_keeps_defaults() {
        let config: ServerConfig = serde_json::from_str(r#"{"bind_addr": "0.0.0.0:9000"}"#).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.idle_timeout, ServerConfig::default().idle_timeout);
    }

    #[test]
    fn test_builder_overrides_config() {
        let builder = GambitServerBuilder::from_config(ServerConfig::default())
            .bind("0.0.0.0:1234")
            .idle_timeout(Duration::from_secs(5))
            .coordinator_config(CoordinatorConfig { command_buffer: 4 });

        assert_eq!(builder.config.bind_addr, "0.0.0.0:1234");
        assert_eq!(builder.config.idle_timeout, Duration::from_secs(5));
        assert_eq!(builder.coordinator_config.command_buffer, 4);
    }
}
