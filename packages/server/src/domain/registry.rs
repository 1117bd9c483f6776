//! Per-room connection registry and fan-out target computation.
//!
//! The registry is the source of truth for "who is here" in a room. It is
//! owned by exactly one [`RoomSession`](super::entity::RoomSession) and
//! mutated only behind the session repository lock, so no locking happens
//! at this level.

use std::collections::HashMap;

use super::entity::Participant;
use super::value_object::ConnectionId;

/// The set of connections an event is delivered to.
///
/// Recomputed from the registry on every send, never cached, so a
/// concurrent join or leave cannot leave a stale target set behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanOut {
    /// Every connection currently in the room, sender included.
    All,
    /// Every connection except the given one. Used for typing
    /// indicators, which a client never needs reflected back.
    AllExcept(ConnectionId),
}

/// Mapping of connection identity to participant identity for one room.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: HashMap<ConnectionId, Participant>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a connection. Returns the registry size after insertion.
    pub fn insert(&mut self, participant: Participant) -> usize {
        self.entries
            .insert(participant.connection_id.clone(), participant);
        self.entries.len()
    }

    /// Remove a connection. Returns the removed participant, or `None`
    /// if the connection was never registered (removal is idempotent).
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<Participant> {
        self.entries.remove(connection_id)
    }

    /// Look up the participant registered for a connection.
    pub fn get(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.entries.get(connection_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current roster, sorted by user id (then connection id for users
    /// connected more than once) for consistent ordering.
    pub fn participants(&self) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self.entries.values().cloned().collect();
        participants.sort_by(|a, b| {
            (&a.user_id, &a.connection_id).cmp(&(&b.user_id, &b.connection_id))
        });
        participants
    }

    /// Compute the fan-out target set from the live registry.
    pub fn targets(&self, fanout: &FanOut) -> Vec<ConnectionId> {
        match fanout {
            FanOut::All => self.entries.keys().cloned().collect(),
            FanOut::AllExcept(excluded) => self
                .entries
                .keys()
                .filter(|id| *id != excluded)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{Timestamp, UserId, Username};

    fn participant(conn: &str, user: &str) -> Participant {
        Participant::new(
            ConnectionId::new(conn.to_string()),
            UserId::new(user.to_string()),
            Username::new(user.to_string()),
            Timestamp::new(1000),
        )
    }

    #[test]
    fn test_insert_increases_size_by_one() {
        // テスト項目: 接続を登録するとレジストリのサイズが 1 増える
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();

        // when (操作):
        let size = registry.insert(participant("c1", "alice"));

        // then (期待する結果):
        assert_eq!(size, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_size_equals_net_connects_minus_disconnects() {
        // テスト項目: 一連の接続・切断後のサイズが実際に登録された接続の純増数と一致する
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.insert(participant("c1", "alice"));
        registry.insert(participant("c2", "bob"));
        registry.insert(participant("c3", "charlie"));

        // when (操作):
        registry.remove(&ConnectionId::new("c2".to_string()));
        // 未登録の接続の切断はカウントに影響しない
        registry.remove(&ConnectionId::new("never-registered".to_string()));

        // then (期待する結果):
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_is_idempotent() {
        // テスト項目: 同じ接続を二度削除しても 2 回目は no-op になる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.insert(participant("c1", "alice"));
        let conn = ConnectionId::new("c1".to_string());

        // when (操作):
        let first = registry.remove(&conn);
        let second = registry.remove(&conn);

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_get_returns_registered_participant() {
        // テスト項目: 登録済みの接続から参加者を取得できる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.insert(participant("c1", "alice"));

        // when (操作):
        let found = registry.get(&ConnectionId::new("c1".to_string()));

        // then (期待する結果):
        assert_eq!(found.map(|p| p.user_id.as_str()), Some("alice"));
    }

    #[test]
    fn test_participants_sorted_by_user_id() {
        // テスト項目: 参加者リストが user_id でソートされている
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.insert(participant("c3", "charlie"));
        registry.insert(participant("c1", "alice"));
        registry.insert(participant("c2", "bob"));

        // when (操作):
        let participants = registry.participants();

        // then (期待する結果):
        let ids: Vec<&str> = participants.iter().map(|p| p.user_id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "bob", "charlie"]);
    }

    #[test]
    fn test_targets_all_includes_every_connection() {
        // テスト項目: FanOut::All が全ての接続を対象にする
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.insert(participant("c1", "alice"));
        registry.insert(participant("c2", "bob"));

        // when (操作):
        let targets = registry.targets(&FanOut::All);

        // then (期待する結果):
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&ConnectionId::new("c1".to_string())));
        assert!(targets.contains(&ConnectionId::new("c2".to_string())));
    }

    #[test]
    fn test_targets_all_except_excludes_sender() {
        // テスト項目: FanOut::AllExcept が送信者の接続を除外する
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.insert(participant("c1", "alice"));
        registry.insert(participant("c2", "bob"));
        registry.insert(participant("c3", "charlie"));

        // when (操作):
        let sender = ConnectionId::new("c2".to_string());
        let targets = registry.targets(&FanOut::AllExcept(sender.clone()));

        // then (期待する結果):
        assert_eq!(targets.len(), 2);
        assert!(!targets.contains(&sender));
    }

    #[test]
    fn test_targets_all_except_with_unknown_sender() {
        // テスト項目: 除外対象が未登録でも全ての接続が返される
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.insert(participant("c1", "alice"));
        registry.insert(participant("c2", "bob"));

        // when (操作):
        let targets =
            registry.targets(&FanOut::AllExcept(ConnectionId::new("c9".to_string())));

        // then (期待する結果):
        assert_eq!(targets.len(), 2);
    }
}
