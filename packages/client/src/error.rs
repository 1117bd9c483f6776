//! Error types for the room client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the room id at the handshake
    #[error("Room id '{0}' was rejected by the server")]
    InvalidRoomId(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An event could not be encoded or written to the socket
    #[error("Send error: {0}")]
    SendError(String),
}
