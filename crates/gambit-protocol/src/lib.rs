//! Wire protocol for Gambit.
//!
//! This crate defines the "language" clients and the server speak:
//!
//! - **Commands** ([`CommandEnvelope`], [`Command`]) — what a client asks
//!   for, with its credential and target game.
//! - **Server messages** ([`ServerMessage`], [`GameSnapshot`],
//!   [`ErrorKind`]) — full state, notifications, and errors.
//! - **Game records** ([`GameId`], [`Identity`], [`Seats`], [`Role`]) —
//!   who plays what.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those values become
//!   text frames.
//!
//! # Architecture
//!
//! ```text
//! Transport (text) → Protocol (Command) → Room (coordinator per game)
//! ```
//!
//! Nothing here knows about connections' lifetimes or running games; the
//! only transport type used is [`ConnectionId`](gambit_transport::ConnectionId)
//! inside [`Recipient`].

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Command, CommandEnvelope, ErrorKind, GameId, GameSnapshot, Identity, Recipient, Role, Seats,
    ServerMessage,
};
