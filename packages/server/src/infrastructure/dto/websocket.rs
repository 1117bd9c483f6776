//! WebSocket event envelopes.
//!
//! Every envelope is a JSON object discriminated by a `type` tag
//! (kebab-case) with camelCase payload fields. Inbound envelopes are
//! parsed at the boundary into a tagged union; an unknown tag or an
//! unparseable body becomes [`UnrecognizedEvent`], which callers log and
//! drop without ever reaching application logic.

use serde::{Deserialize, Serialize};

// ========================================
// Inbound (client → server)
// ========================================

/// Events a client may send into a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundEvent {
    #[serde(rename_all = "camelCase")]
    Message {
        message: String,
        /// Persisted message id handed out by the HTTP API layer; the
        /// server generates one when the client omits it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },
    Typing,
    StopTyping,
    #[serde(rename_all = "camelCase")]
    ReadReceipt { message_id: String },
    #[serde(rename_all = "camelCase")]
    DeleteMessage { message_id: String },
}

/// An inbound envelope that failed validation: unknown `type` tag or an
/// unparseable body. Routed to a log-and-drop handler only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedEvent {
    /// The `type` tag as received, when one could be extracted.
    pub tag: Option<String>,
}

/// Parse a raw text frame into an [`InboundEvent`].
///
/// This is a fire-and-forget channel, not request/response RPC: malformed
/// input never produces an error reply, so the failure side carries just
/// enough to log.
pub fn parse_inbound(text: &str) -> Result<InboundEvent, UnrecognizedEvent> {
    match serde_json::from_str::<InboundEvent>(text) {
        Ok(event) => Ok(event),
        Err(_) => {
            let tag = serde_json::from_str::<serde_json::Value>(text)
                .ok()
                .and_then(|value| {
                    value
                        .get("type")
                        .and_then(|t| t.as_str())
                        .map(str::to_string)
                });
            Err(UnrecognizedEvent { tag })
        }
    }
}

// ========================================
// Outbound (server → client)
// ========================================

/// One entry of the `online-users` roster snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUser {
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJoinedEvent {
    pub user_id: String,
    pub username: String,
    pub timestamp: i64,
    pub total_users: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftEvent {
    pub user_id: String,
    pub username: String,
    pub timestamp: i64,
    pub total_users: usize,
}

/// A chat message echoed to the room. Identity fields are omitted when
/// the sender was not found in the registry (an event can arrive before
/// registration completes); this is a documented quirk, not a crash path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageEvent {
    pub message_id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypingEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStopTypingEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReadEvent {
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDeletedEvent {
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUsersEvent {
    pub users: Vec<OnlineUser>,
}

/// Events the server emits to connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OutboundEvent {
    UserJoined(UserJoinedEvent),
    UserLeft(UserLeftEvent),
    NewMessage(NewMessageEvent),
    UserTyping(UserTypingEvent),
    UserStopTyping(UserStopTypingEvent),
    MessageRead(MessageReadEvent),
    MessageDeleted(MessageDeletedEvent),
    OnlineUsers(OnlineUsersEvent),
}
