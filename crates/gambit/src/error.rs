//! Unified error type for the Gambit server.

use gambit_protocol::ProtocolError;
use gambit_room::RoomError;
use gambit_rules::RulesError;
use gambit_session::SessionError;
use gambit_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `gambit` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GambitError {
    /// Binding, accepting, or talking to a socket failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The rules engine refused a position or move.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// A credential or game record problem.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A coordinator refused a command.
    #[error(transparent)]
    Room(#[from] RoomError),
}
