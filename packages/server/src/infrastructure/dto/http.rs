//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::OnlineUser;

/// Snapshot of one room, returned by the debug/introspection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStateDto {
    pub room_id: String,
    pub total_connections: usize,
    pub users: Vec<OnlineUser>,
}

/// One entry of the active-rooms listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub room_id: String,
    pub total_connections: usize,
}
