//! UseCase: participant disconnection.

use std::sync::Arc;

use crate::domain::{ConnectionId, EventPusher, Participant, RoomId, SessionRepository};

/// Removes a connection from the room session and the pusher.
///
/// Idempotent: whichever of the close paths fires first (a close frame,
/// a transport error, a dropped stream) wins, and later attempts are
/// no-ops that announce nothing.
pub struct DisconnectParticipantUseCase {
    repository: Arc<dyn SessionRepository>,
    pusher: Arc<dyn EventPusher>,
}

impl DisconnectParticipantUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { repository, pusher }
    }

    /// Remove the connection. Returns the removed participant and the
    /// remaining connection count, or `None` when it was already gone.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<(Participant, usize)> {
        let (participant, remaining) = self.repository.remove(room_id, connection_id).await?;
        self.pusher.unregister_connection(connection_id).await;

        tracing::info!(
            "Participant '{}' ({}) left room '{}' ({} remaining)",
            participant.username.as_str(),
            connection_id.as_str(),
            room_id.as_str(),
            remaining
        );

        Some((participant, remaining))
    }
}
