//! UseCase: room state inspection for the debug HTTP surface.

use std::sync::Arc;

use crate::domain::{Participant, RoomId, SessionRepository};

/// Snapshot of one room's live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomStateSnapshot {
    pub room_id: RoomId,
    pub total_connections: usize,
    pub users: Vec<Participant>,
}

/// Read-only view over the session repository.
pub struct GetRoomStateUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetRoomStateUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Snapshot a room. A room with no live session reports zero
    /// connections and an empty roster rather than an error, since
    /// "no session" and "empty room" are the same observable state.
    pub async fn snapshot(&self, room_id: RoomId) -> RoomStateSnapshot {
        let users = self.repository.participants(&room_id).await;
        RoomStateSnapshot {
            total_connections: users.len(),
            users,
            room_id,
        }
    }

    /// List all rooms with live sessions and their connection counts.
    pub async fn list_rooms(&self) -> Vec<(RoomId, usize)> {
        let mut rooms = Vec::new();
        for room_id in self.repository.room_ids().await {
            let count = self.repository.count(&room_id).await;
            rooms.push((room_id, count));
        }
        rooms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, Timestamp, UserId, Username};
    use crate::infrastructure::repository::InMemorySessionRepository;

    fn participant(conn: &str, user: &str) -> Participant {
        Participant::new(
            ConnectionId::new(conn.to_string()),
            UserId::new(user.to_string()),
            Username::new(user.to_string()),
            Timestamp::new(1000),
        )
    }

    #[tokio::test]
    async fn test_snapshot_reflects_live_session() {
        // テスト項目: スナップショットがライブセッションの接続数と参加者を反映する
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let usecase = GetRoomStateUseCase::new(repository.clone());
        let room = RoomId::new("r1".to_string()).unwrap();
        repository
            .register(room.clone(), participant("c1", "alice"))
            .await;
        repository
            .register(room.clone(), participant("c2", "bob"))
            .await;

        // when (操作):
        let snapshot = usecase.snapshot(room.clone()).await;

        // then (期待する結果):
        assert_eq!(snapshot.room_id, room);
        assert_eq!(snapshot.total_connections, 2);
        assert_eq!(snapshot.users.len(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_of_unknown_room_is_empty() {
        // テスト項目: セッションのないルームのスナップショットが空になる
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let usecase = GetRoomStateUseCase::new(repository);
        let room = RoomId::new("ghost".to_string()).unwrap();

        // when (操作):
        let snapshot = usecase.snapshot(room).await;

        // then (期待する結果):
        assert_eq!(snapshot.total_connections, 0);
        assert!(snapshot.users.is_empty());
    }

    #[tokio::test]
    async fn test_list_rooms_reports_counts() {
        // テスト項目: ルーム一覧が各ルームの接続数とともに返る
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let usecase = GetRoomStateUseCase::new(repository.clone());
        let r1 = RoomId::new("r1".to_string()).unwrap();
        let r2 = RoomId::new("r2".to_string()).unwrap();
        repository.register(r1.clone(), participant("c1", "alice")).await;
        repository.register(r1.clone(), participant("c2", "bob")).await;
        repository.register(r2.clone(), participant("c3", "carol")).await;

        // when (操作):
        let rooms = usecase.list_rooms().await;

        // then (期待する結果):
        assert_eq!(rooms, vec![(r1, 2), (r2, 1)]);
    }
}
