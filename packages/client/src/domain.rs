//! Domain logic for client-side operations.
//!
//! Pure functions without side effects: input line parsing and the
//! reconnection policy.

use hiroma_server::infrastructure::dto::websocket::InboundEvent;

use crate::error::ClientError;

/// Result of parsing one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedInput {
    /// An event to send to the room
    Event(InboundEvent),
    /// A slash command that is not understood (or missing its argument)
    Unknown(String),
}

/// Parse an input line into an event.
///
/// Plain text becomes a chat message. Slash commands:
/// - `/typing` and `/stop` send typing indicators
/// - `/read <message_id>` sends a read receipt
/// - `/delete <message_id>` requests a message deletion
pub fn parse_input(line: &str) -> ParsedInput {
    let line = line.trim();

    if !line.starts_with('/') {
        return ParsedInput::Event(InboundEvent::Message {
            message: line.to_string(),
            message_id: None,
        });
    }

    let mut parts = line.splitn(2, ' ');
    let command = parts.next().unwrap_or("");
    let argument = parts.next().map(str::trim).filter(|s| !s.is_empty());

    match (command, argument) {
        ("/typing", None) => ParsedInput::Event(InboundEvent::Typing),
        ("/stop", None) => ParsedInput::Event(InboundEvent::StopTyping),
        ("/read", Some(message_id)) => ParsedInput::Event(InboundEvent::ReadReceipt {
            message_id: message_id.to_string(),
        }),
        ("/delete", Some(message_id)) => ParsedInput::Event(InboundEvent::DeleteMessage {
            message_id: message_id.to_string(),
        }),
        _ => ParsedInput::Unknown(line.to_string()),
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// An invalid room id is rejected by the server at the handshake, so
/// retrying with the same id can never succeed.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidRoomId(_))
}

/// Check if the client should attempt to reconnect.
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}
