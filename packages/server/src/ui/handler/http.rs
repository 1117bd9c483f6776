//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::{
        http::{RoomStateDto, RoomSummaryDto},
        websocket::OnlineUser,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List rooms with live sessions
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_room_state_usecase.list_rooms().await;

    let summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|(room_id, total_connections)| RoomSummaryDto {
            room_id: room_id.into_string(),
            total_connections,
        })
        .collect();

    Json(summaries)
}

/// Room state snapshot. An unknown or idle room reports zero connections
/// rather than 404, matching what a client would observe by joining it.
pub async fn get_room_state(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomStateDto>, StatusCode> {
    let room_id = crate::domain::RoomId::new(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let snapshot = state.get_room_state_usecase.snapshot(room_id).await;

    Ok(Json(RoomStateDto {
        room_id: snapshot.room_id.into_string(),
        total_connections: snapshot.total_connections,
        users: snapshot
            .users
            .into_iter()
            .map(|p| OnlineUser {
                user_id: p.user_id.into_string(),
                username: p.username.into_string(),
            })
            .collect(),
    }))
}
