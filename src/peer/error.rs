use thiserror::Error;

/// Errors that can occur during peer communication.
#[derive(Debug, Error)]
pub enum PeerError {
    /// Network I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete handshake frame arrived.
    #[error("handshake underrun")]
    HandshakeUnderrun,

    /// The peer sent an invalid handshake.
    #[error("invalid handshake")]
    InvalidHandshake,

    /// Received a malformed protocol message.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Received an unknown message ID.
    #[error("invalid message id: {0}")]
    InvalidMessageId(u8),
}
