//! Live game coordination for Gambit.
//!
//! Each game runs as an isolated Tokio task (actor model) that owns its
//! [`ChessGame`](gambit_rules::ChessGame), its seat assignments, and the
//! set of connections watching it.
//!
//! # Key types
//!
//! - [`Lobby`] — finds or lazily starts the coordinator for a game
//! - [`CoordinatorHandle`] — send commands to a running coordinator
//! - [`ConnectionSender`] — where a coordinator delivers a connection's
//!   server messages
//! - [`CoordinatorConfig`] — coordinator settings
//! - [`RoomError`] — what a command can fail with

mod config;
mod coordinator;
mod error;
mod lobby;

pub use config::CoordinatorConfig;
pub use coordinator::{ConnectionSender, CoordinatorHandle, spawn_coordinator, spawn_with_game};
pub use error::RoomError;
pub use lobby::Lobby;
