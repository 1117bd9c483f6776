//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomStateUseCase,
    PresenceAnnouncer, RouteEventUseCase,
};

/// Shared application state
pub struct AppState {
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub route_event_usecase: Arc<RouteEventUseCase>,
    pub presence_announcer: Arc<PresenceAnnouncer>,
    pub get_room_state_usecase: Arc<GetRoomStateUseCase>,
}
