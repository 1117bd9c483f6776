//! UseCase: inbound event routing.
//!
//! Maps an inbound event's type to the correct outbound event and fan-out
//! policy. This is the protocol's core branching logic: a flat dispatch
//! table, not a pipeline, because each event type is independent and
//! stateless beyond the sender identity lookup.

use std::sync::Arc;

use crate::domain::{
    ConnectionId, EventPusher, FanOut, MessageId, Participant, RoomId, SessionRepository,
    Timestamp,
};
use crate::infrastructure::dto::websocket::{
    parse_inbound, InboundEvent, MessageDeletedEvent, MessageReadEvent, NewMessageEvent,
    OutboundEvent, UserStopTypingEvent, UserTypingEvent,
};
use hiroma_shared::time::now_millis;

use super::error::RouteEventError;

/// Result of routing one inbound event: the outbound envelope and the
/// connections it was delivered to.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEvent {
    pub event: OutboundEvent,
    pub targets: Vec<ConnectionId>,
}

/// Map an inbound event to its outbound echo and fan-out policy.
///
/// | inbound          | outbound           | fan-out           |
/// |------------------|--------------------|-------------------|
/// | `message`        | `new-message`      | all               |
/// | `typing`         | `user-typing`      | all except sender |
/// | `stop-typing`    | `user-stop-typing` | all except sender |
/// | `read-receipt`   | `message-read`     | all               |
/// | `delete-message` | `message-deleted`  | all               |
///
/// Typing indicators exclude the sender because a client never needs its
/// own indicator reflected back; everything else echoes to the sender so
/// its UI can confirm delivery from the server-observed event instead of
/// trusting optimistic local state.
///
/// The timestamp is assigned here, at dispatch time: event order as
/// observed by any client is the order the session processed sends in,
/// not wall-clock order at the sender.
///
/// `sender` is `None` when the event arrived before the connection was
/// registered; identity fields are then omitted rather than rejecting.
pub fn route(
    event: InboundEvent,
    sender: Option<&Participant>,
    sender_connection: &ConnectionId,
    now: Timestamp,
) -> (OutboundEvent, FanOut) {
    let user_id = sender.map(|p| p.user_id.as_str().to_string());
    let username = sender.map(|p| p.username.as_str().to_string());

    match event {
        InboundEvent::Message {
            message,
            message_id,
        } => {
            let message_id = message_id
                .map(MessageId::new)
                .unwrap_or_else(MessageId::generate);
            (
                OutboundEvent::NewMessage(NewMessageEvent {
                    message_id: message_id.into_string(),
                    message,
                    user_id,
                    username,
                    timestamp: now.value(),
                }),
                FanOut::All,
            )
        }
        InboundEvent::Typing => (
            OutboundEvent::UserTyping(UserTypingEvent { user_id, username }),
            FanOut::AllExcept(sender_connection.clone()),
        ),
        InboundEvent::StopTyping => (
            OutboundEvent::UserStopTyping(UserStopTypingEvent { user_id }),
            FanOut::AllExcept(sender_connection.clone()),
        ),
        InboundEvent::ReadReceipt { message_id } => (
            OutboundEvent::MessageRead(MessageReadEvent {
                message_id,
                user_id,
            }),
            FanOut::All,
        ),
        InboundEvent::DeleteMessage { message_id } => (
            OutboundEvent::MessageDeleted(MessageDeletedEvent {
                message_id,
                deleted_by: user_id,
                timestamp: now.value(),
            }),
            FanOut::All,
        ),
    }
}

/// Routing usecase: parse, look up the sender, route, fan out.
pub struct RouteEventUseCase {
    repository: Arc<dyn SessionRepository>,
    pusher: Arc<dyn EventPusher>,
}

impl RouteEventUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { repository, pusher }
    }

    /// Handle one raw text frame from a connection.
    ///
    /// Returns `Ok(None)` when the envelope was unrecognized (logged and
    /// dropped — no error reply ever goes back to the sender), otherwise
    /// the routed event and its delivery targets.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        sender_connection: &ConnectionId,
        raw: &str,
    ) -> Result<Option<RoutedEvent>, RouteEventError> {
        let event = match parse_inbound(raw) {
            Ok(event) => event,
            Err(unrecognized) => {
                tracing::warn!(
                    "Dropping unrecognized event in room '{}' (type tag: {:?})",
                    room_id.as_str(),
                    unrecognized.tag
                );
                return Ok(None);
            }
        };

        // An event can arrive before registration completes; proceed
        // with absent identity fields rather than rejecting.
        let sender = self
            .repository
            .find_participant(room_id, sender_connection)
            .await;
        if sender.is_none() {
            tracing::warn!(
                "Event from unregistered connection '{}' in room '{}'",
                sender_connection.as_str(),
                room_id.as_str()
            );
        }

        let (outbound, fanout) = route(
            event,
            sender.as_ref(),
            sender_connection,
            Timestamp::new(now_millis()),
        );

        // Recompute the target set from the live registry at send time
        let targets = self.repository.fanout_targets(room_id, &fanout).await;
        let json = serde_json::to_string(&outbound)?;
        self.pusher.broadcast(targets.clone(), &json).await?;

        Ok(Some(RoutedEvent {
            event: outbound,
            targets,
        }))
    }
}
