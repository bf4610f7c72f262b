//! # Gambit
//!
//! Real-time multiplayer chess server.
//!
//! Two players, any number of observers, one authoritative game per
//! coordinator task. Clients speak JSON over WebSocket: they send
//! `CONNECT`, `MAKE_MOVE`, `RESIGN` and `LEAVE` commands, and receive
//! `LOAD_GAME` snapshots, `NOTIFICATION`s and `ERROR`s.
//!
//! You supply two collaborators: an [`Authenticator`](gambit_session::Authenticator)
//! that maps a client's token to an identity, and a
//! [`GameStore`](gambit_session::GameStore) that knows who sits at which
//! color. In-memory versions of both ship with `gambit-session`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use gambit::prelude::*;
//!
//! # async fn run() -> Result<(), GambitError> {
//! let store = Arc::new(MemoryGameStore::new());
//! let auth = TokenAuthenticator::new();
//!
//! let server = GambitServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build(auth, store)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::GambitError;
pub use server::{GambitServer, GambitServerBuilder, ServerConfig};

pub use gambit_protocol as protocol;
pub use gambit_room as room;
pub use gambit_rules as rules;
pub use gambit_session as session;
pub use gambit_transport as transport;

/// Everything needed to stand up a server or drive a game in tests.
pub mod prelude {
    pub use crate::{GambitError, GambitServer, GambitServerBuilder, ServerConfig};

    pub use gambit_protocol::{
        Codec, Command, CommandEnvelope, ErrorKind, GameId, GameSnapshot, Identity, JsonCodec,
        Role, Seats, ServerMessage,
    };
    pub use gambit_room::{CoordinatorConfig, CoordinatorHandle, Lobby, RoomError};
    pub use gambit_rules::{
        Board, ChessGame, Color, GameStatus, Move, Piece, PieceKind, Position, RulesError,
    };
    pub use gambit_session::{
        Authenticator, GameStore, MemoryGameStore, SessionError, TokenAuthenticator,
    };
    pub use gambit_transport::ConnectionId;
}
