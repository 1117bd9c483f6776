//! UseCase: presence announcements.
//!
//! Joins and leaves are server-generated events, not echoes of client
//! input, so they live apart from the routing table.

use std::sync::Arc;

use crate::domain::{EventPusher, FanOut, Participant, RoomId, SessionRepository, Timestamp};
use crate::infrastructure::dto::websocket::{
    OnlineUser, OnlineUsersEvent, OutboundEvent, UserJoinedEvent, UserLeftEvent,
};
use hiroma_shared::time::now_millis;

use super::error::PresenceError;

/// Announces joins and leaves to a room.
pub struct PresenceAnnouncer {
    repository: Arc<dyn SessionRepository>,
    pusher: Arc<dyn EventPusher>,
}

impl PresenceAnnouncer {
    pub fn new(repository: Arc<dyn SessionRepository>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { repository, pusher }
    }

    /// Announce a join: `user-joined` to the whole room (the new
    /// connection included, so its own join confirms registration), then
    /// the `online-users` roster snapshot to the new connection alone.
    ///
    /// The count and roster are read at announce time, so two
    /// near-simultaneous joins may both observe the final count. Each
    /// client's last `online-users` or `user-joined` is authoritative.
    pub async fn announce_joined(
        &self,
        room_id: &RoomId,
        participant: &Participant,
    ) -> Result<(), PresenceError> {
        let total = self.repository.count(room_id).await;
        let joined = OutboundEvent::UserJoined(UserJoinedEvent {
            user_id: participant.user_id.as_str().to_string(),
            username: participant.username.as_str().to_string(),
            timestamp: Timestamp::new(now_millis()).value(),
            total_users: total,
        });
        let targets = self.repository.fanout_targets(room_id, &FanOut::All).await;
        self.pusher
            .broadcast(targets, &serde_json::to_string(&joined)?)
            .await?;

        let roster = self
            .repository
            .participants(room_id)
            .await
            .into_iter()
            .map(|p| OnlineUser {
                user_id: p.user_id.into_string(),
                username: p.username.into_string(),
            })
            .collect();
        let online = OutboundEvent::OnlineUsers(OnlineUsersEvent { users: roster });
        self.pusher
            .push_to(&participant.connection_id, &serde_json::to_string(&online)?)
            .await?;

        Ok(())
    }

    /// Announce a leave: `user-left` with the remaining connection count
    /// to everyone still in the room.
    pub async fn announce_left(
        &self,
        room_id: &RoomId,
        participant: &Participant,
        remaining: usize,
    ) -> Result<(), PresenceError> {
        let left = OutboundEvent::UserLeft(UserLeftEvent {
            user_id: participant.user_id.as_str().to_string(),
            username: participant.username.as_str().to_string(),
            timestamp: Timestamp::new(now_millis()).value(),
            total_users: remaining,
        });
        let targets = self.repository.fanout_targets(room_id, &FanOut::All).await;
        self.pusher
            .broadcast(targets, &serde_json::to_string(&left)?)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, MockEventPusher, UserId, Username};
    use crate::infrastructure::{
        event_pusher::WebSocketEventPusher, repository::InMemorySessionRepository,
    };
    use tokio::sync::mpsc;

    fn participant(conn: &str, user: &str, name: &str) -> Participant {
        Participant::new(
            ConnectionId::new(conn.to_string()),
            UserId::new(user.to_string()),
            Username::new(name.to_string()),
            Timestamp::new(1000),
        )
    }

    #[tokio::test]
    async fn test_announce_joined_reaches_new_connection_too() {
        // テスト項目: user-joined が新規接続自身にも配信され、その後 roster が届く
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let pusher = Arc::new(WebSocketEventPusher::new());
        let announcer = PresenceAnnouncer::new(repository.clone(), pusher.clone());
        let room = RoomId::new("r1".to_string()).unwrap();

        let alice = participant("c1", "u1", "Alice");
        let (alice_tx, mut alice_rx) = mpsc::unbounded_channel();
        pusher
            .register_connection(alice.connection_id.clone(), alice_tx)
            .await;
        repository.register(room.clone(), alice.clone()).await;

        // when (操作):
        announcer.announce_joined(&room, &alice).await.unwrap();

        // then (期待する結果): user-joined が先、online-users が後
        let first = alice_rx.recv().await.unwrap();
        let second = alice_rx.recv().await.unwrap();
        assert!(first.contains(r#""type":"user-joined""#));
        assert!(first.contains(r#""totalUsers":1"#));
        assert!(second.contains(r#""type":"online-users""#));
        assert!(second.contains(r#""userId":"u1""#));
    }

    #[tokio::test]
    async fn test_announce_joined_roster_goes_to_new_connection_only() {
        // テスト項目: online-users が新規接続のみに届き、既存接続には届かない
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let pusher = Arc::new(WebSocketEventPusher::new());
        let announcer = PresenceAnnouncer::new(repository.clone(), pusher.clone());
        let room = RoomId::new("r1".to_string()).unwrap();

        let alice = participant("c1", "u1", "Alice");
        let (alice_tx, mut alice_rx) = mpsc::unbounded_channel();
        pusher
            .register_connection(alice.connection_id.clone(), alice_tx)
            .await;
        repository.register(room.clone(), alice).await;

        let bob = participant("c2", "u2", "Bob");
        let (bob_tx, mut bob_rx) = mpsc::unbounded_channel();
        pusher
            .register_connection(bob.connection_id.clone(), bob_tx)
            .await;
        repository.register(room.clone(), bob.clone()).await;

        // when (操作):
        announcer.announce_joined(&room, &bob).await.unwrap();

        // then (期待する結果):
        let to_alice = alice_rx.recv().await.unwrap();
        assert!(to_alice.contains(r#""type":"user-joined""#));
        assert!(to_alice.contains(r#""totalUsers":2"#));
        assert!(alice_rx.try_recv().is_err());

        let to_bob_first = bob_rx.recv().await.unwrap();
        let to_bob_second = bob_rx.recv().await.unwrap();
        assert!(to_bob_first.contains(r#""type":"user-joined""#));
        assert!(to_bob_second.contains(r#""type":"online-users""#));
    }

    #[tokio::test]
    async fn test_announce_left_carries_remaining_count() {
        // テスト項目: user-left が残存接続数とともに残りの接続に配信される
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let pusher = Arc::new(WebSocketEventPusher::new());
        let announcer = PresenceAnnouncer::new(repository.clone(), pusher.clone());
        let room = RoomId::new("r1".to_string()).unwrap();

        let alice = participant("c1", "u1", "Alice");
        let (alice_tx, mut alice_rx) = mpsc::unbounded_channel();
        pusher
            .register_connection(alice.connection_id.clone(), alice_tx)
            .await;
        repository.register(room.clone(), alice).await;

        let bob = participant("c2", "u2", "Bob");

        // when (操作): bob は既にレジストリから削除済みの状態で通知する
        announcer.announce_left(&room, &bob, 1).await.unwrap();

        // then (期待する結果):
        let received = alice_rx.recv().await.unwrap();
        assert!(received.contains(r#""type":"user-left""#));
        assert!(received.contains(r#""username":"Bob""#));
        assert!(received.contains(r#""totalUsers":1"#));
    }

    #[tokio::test]
    async fn test_announce_left_push_failure_surfaces_as_error() {
        // テスト項目: 配信失敗時に PresenceError::Push が返る
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let mut mock_pusher = MockEventPusher::new();
        mock_pusher.expect_broadcast().returning(|_, _| {
            Err(crate::domain::EventPushError::PushFailed(
                "channel closed".to_string(),
            ))
        });
        let announcer = PresenceAnnouncer::new(repository, Arc::new(mock_pusher));
        let room = RoomId::new("r1".to_string()).unwrap();
        let bob = participant("c2", "u2", "Bob");

        // when (操作):
        let result = announcer.announce_left(&room, &bob, 0).await;

        // then (期待する結果):
        assert!(matches!(result, Err(PresenceError::Push(_))));
    }
}
