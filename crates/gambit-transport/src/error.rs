use std::io;

/// Failures moving frames between the server and a client.
///
/// Each variant keeps the underlying I/O error as its source, so callers
/// can log the chain or match on [`io::ErrorKind`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The listener could not bind, or a client's handshake failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] io::Error),

    /// Writing a frame to the client failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] io::Error),

    /// Reading from the client failed, or a binary frame held invalid UTF-8.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] io::Error),
}

impl TransportError {
    /// The I/O category behind this error.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::AcceptFailed(e) | Self::SendFailed(e) | Self::ReceiveFailed(e) => e.kind(),
        }
    }
}
