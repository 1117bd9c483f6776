//! In-memory session repository.
//!
//! Implements the domain's `SessionRepository` trait over a mutex-guarded
//! map of room id to live session. All state is process-local: a restart
//! loses every session, which is an accepted limitation since room and
//! message history live in the external store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, FanOut, Participant, RoomId, RoomSession, SessionRepository, Timestamp,
};
use hiroma_shared::time::now_millis;

/// Session repository backed by an in-memory map.
///
/// Room sessions are created lazily when the first participant registers
/// and dropped as soon as the last connection is removed, keeping the map
/// bounded by the number of rooms with live connections.
pub struct InMemorySessionRepository {
    rooms: Mutex<HashMap<RoomId, RoomSession>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn register(&self, room_id: RoomId, participant: Participant) -> usize {
        let mut rooms = self.rooms.lock().await;
        let session = rooms.entry(room_id.clone()).or_insert_with(|| {
            tracing::info!("Room session '{}' created", room_id.as_str());
            RoomSession::new(room_id, Timestamp::new(now_millis()))
        });
        session.registry.insert(participant)
    }

    async fn remove(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<(Participant, usize)> {
        let mut rooms = self.rooms.lock().await;
        let session = rooms.get_mut(room_id)?;
        let removed = session.registry.remove(connection_id)?;
        let remaining = session.registry.len();

        if session.registry.is_empty() {
            rooms.remove(room_id);
            tracing::info!("Room session '{}' torn down (empty)", room_id.as_str());
        }

        Some((removed, remaining))
    }

    async fn find_participant(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<Participant> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .and_then(|session| session.registry.get(connection_id).cloned())
    }

    async fn participants(&self, room_id: &RoomId) -> Vec<Participant> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|session| session.registry.participants())
            .unwrap_or_default()
    }

    async fn count(&self, room_id: &RoomId) -> usize {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|session| session.registry.len())
            .unwrap_or(0)
    }

    async fn fanout_targets(&self, room_id: &RoomId, fanout: &FanOut) -> Vec<ConnectionId> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|session| session.registry.targets(fanout))
            .unwrap_or_default()
    }

    async fn room_ids(&self) -> Vec<RoomId> {
        let rooms = self.rooms.lock().await;
        let mut ids: Vec<RoomId> = rooms.keys().cloned().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }
}
