//! Domain entities: participants and per-room broadcast sessions.

use super::registry::ConnectionRegistry;
use super::value_object::{ConnectionId, RoomId, Timestamp, UserId, Username};

/// One live connection to a room: the transport-assigned connection id
/// plus the participant identity supplied at connect time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub username: Username,
    pub connected_at: Timestamp,
}

impl Participant {
    pub fn new(
        connection_id: ConnectionId,
        user_id: UserId,
        username: Username,
        connected_at: Timestamp,
    ) -> Self {
        Self {
            connection_id,
            user_id,
            username,
            connected_at,
        }
    }
}

/// One broadcast session per room; the unit of isolation.
///
/// Owns the connection registry for its room. Sessions are created lazily
/// on first connection and torn down by the repository once the registry
/// empties, so an idle server holds no session state. Nothing here is
/// persisted: a process restart loses all live sessions, which is
/// recoverable because room and message history live in the external
/// store.
#[derive(Debug)]
pub struct RoomSession {
    pub id: RoomId,
    pub created_at: Timestamp,
    pub registry: ConnectionRegistry,
}

impl RoomSession {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            registry: ConnectionRegistry::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_room_session_has_empty_registry() {
        // テスト項目: 新規セッションのレジストリが空である
        // given (前提条件):
        let room_id = RoomId::new("r1".to_string()).unwrap();

        // when (操作):
        let session = RoomSession::new(room_id, Timestamp::new(1000));

        // then (期待する結果):
        assert_eq!(session.registry.len(), 0);
        assert!(session.registry.is_empty());
    }
}
