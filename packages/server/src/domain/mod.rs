//! Domain layer: value objects, entities, the per-room connection
//! registry, and the trait seams implemented by the infrastructure layer.

pub mod entity;
pub mod pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::{Participant, RoomSession};
#[cfg(test)]
pub use pusher::MockEventPusher;
pub use pusher::{EventPushError, EventPusher, PusherChannel};
pub use registry::{ConnectionRegistry, FanOut};
pub use repository::SessionRepository;
pub use value_object::{ConnectionId, InvalidRoomId, MessageId, RoomId, Timestamp, UserId, Username};
