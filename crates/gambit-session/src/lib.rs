//! Identity and game records for Gambit.
//!
//! Two narrow collaborator contracts live here:
//!
//! 1. **Authentication** — who is sending this command
//!    ([`Authenticator`], with [`TokenAuthenticator`])
//! 2. **Game records** — who holds which color ([`GameStore`], with
//!    [`MemoryGameStore`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← asks for seats on join, clears them on leave
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Protocol Layer (below)  ← provides GameId, Identity, Seats
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod store;

pub use auth::{Authenticator, TokenAuthenticator};
pub use error::SessionError;
pub use store::{GameStore, MemoryGameStore};
