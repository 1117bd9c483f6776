//! UseCase: participant connection.

use std::sync::Arc;

use crate::domain::{EventPusher, Participant, PusherChannel, RoomId, SessionRepository};

/// Registers a new connection with the pusher and the room session.
///
/// Never rejects: identity is accepted at face value and the room session
/// is created lazily when it does not exist yet. The pusher channel is
/// registered first so the connection can receive events from the moment
/// it appears in the registry.
pub struct ConnectParticipantUseCase {
    repository: Arc<dyn SessionRepository>,
    pusher: Arc<dyn EventPusher>,
}

impl ConnectParticipantUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { repository, pusher }
    }

    /// Register the participant. Returns the room's connection count
    /// after registration.
    pub async fn execute(
        &self,
        room_id: RoomId,
        participant: Participant,
        sender: PusherChannel,
    ) -> usize {
        self.pusher
            .register_connection(participant.connection_id.clone(), sender)
            .await;

        let total = self
            .repository
            .register(room_id.clone(), participant.clone())
            .await;

        tracing::info!(
            "Participant '{}' ({}) joined room '{}' ({} connected)",
            participant.username.as_str(),
            participant.connection_id.as_str(),
            room_id.as_str(),
            total
        );

        total
    }
}
