//! UseCase layer: one usecase per operation of the broadcast protocol.

mod connect_participant;
mod disconnect_participant;
mod error;
mod presence;
mod room_state;
mod route_event;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{PresenceError, RouteEventError};
pub use presence::PresenceAnnouncer;
pub use room_state::{GetRoomStateUseCase, RoomStateSnapshot};
pub use route_event::{route, RouteEventUseCase, RoutedEvent};
