//! Session repository trait definition.
//!
//! The domain layer defines the data-access interface it needs; the
//! infrastructure layer provides the concrete implementation (dependency
//! inversion). The repository is the only writer of room registries,
//! which keeps per-room reasoning single-threaded.

use async_trait::async_trait;

use super::entity::Participant;
use super::registry::FanOut;
use super::value_object::{ConnectionId, RoomId};

/// Access to live room sessions and their connection registries.
///
/// Sessions are created lazily when the first participant registers and
/// torn down when the last one is removed, so the session map never
/// grows without bound.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Register a participant in the room, creating the session if this
    /// is the room's first connection. Returns the connection count
    /// after registration. Never rejects.
    async fn register(&self, room_id: RoomId, participant: Participant) -> usize;

    /// Remove a connection from the room. Returns the removed
    /// participant and the remaining connection count, or `None` if the
    /// connection was not registered (idempotent). Drops the session
    /// when it empties.
    async fn remove(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<(Participant, usize)>;

    /// Look up the participant registered for a connection in a room.
    async fn find_participant(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<Participant>;

    /// Current roster of the room, sorted. Empty for unknown rooms.
    async fn participants(&self, room_id: &RoomId) -> Vec<Participant>;

    /// Connection count of the room. Zero for unknown rooms.
    async fn count(&self, room_id: &RoomId) -> usize;

    /// Compute the fan-out target set from the room's live registry.
    async fn fanout_targets(&self, room_id: &RoomId, fanout: &FanOut) -> Vec<ConnectionId>;

    /// Identifiers of all rooms with at least one live connection.
    async fn room_ids(&self) -> Vec<RoomId>;
}
