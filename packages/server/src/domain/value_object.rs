//! Value objects for the room broadcast domain.

use thiserror::Error;
use uuid::Uuid;

/// Maximum accepted length for a room identifier.
const MAX_ROOM_ID_LEN: usize = 64;

/// Error returned when a room identifier fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidRoomId {
    #[error("room id must not be empty")]
    Empty,
    #[error("room id exceeds {MAX_ROOM_ID_LEN} characters (got {0})")]
    TooLong(usize),
}

/// Identifier of an isolated broadcast scope.
///
/// Events sent in one room never reach connections in another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, InvalidRoomId> {
        if value.is_empty() {
            return Err(InvalidRoomId::Empty);
        }
        if value.len() > MAX_ROOM_ID_LEN {
            return Err(InvalidRoomId::TooLong(value.len()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Participant user identifier, accepted at face value from the
/// connection query parameters. Identity is pre-validated by an external
/// gate before the transport handshake is reachable; this layer performs
/// no verification of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Fallback identity for connections that supply no `userId`.
    pub fn anonymous() -> Self {
        Self("anonymous".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Participant display name, accepted at face value like [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Fallback display name for connections that supply no `username`.
    pub fn guest() -> Self {
        Self("Guest".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Opaque identifier of one live transport connection, assigned by the
/// server at upgrade time. A user connected from two tabs holds two
/// distinct connection ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a chat message, client-supplied when present (the HTTP
/// API layer persists messages and hands the id to the client) or
/// generated at routing time otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in milliseconds (UTC), assigned by the server at
/// dispatch time. This is the ordering authority for the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
