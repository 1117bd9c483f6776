//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::stream::{SplitSink, StreamExt};
use futures_util::SinkExt;
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, Participant, RoomId, Timestamp, UserId, Username},
    ui::state::AppState,
};
use hiroma_shared::time::now_millis;

/// Query parameters for WebSocket connection. Both are optional:
/// a connection without identity becomes "anonymous" / "Guest".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectQuery {
    pub user_id: Option<String>,
    pub username: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let room_id = match RoomId::new(room_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Rejecting connection with invalid room id: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let participant = Participant::new(
        ConnectionId::generate(),
        query.user_id.map(UserId::new).unwrap_or_else(UserId::anonymous),
        query
            .username
            .map(Username::new)
            .unwrap_or_else(Username::guest),
        Timestamp::new(now_millis()),
    );

    // Channel this connection receives events through
    let (tx, rx) = mpsc::unbounded_channel();

    // Register before the upgrade completes; events broadcast in the
    // meantime buffer in the unbounded channel until the pusher loop
    // starts draining it.
    state
        .connect_participant_usecase
        .execute(room_id.clone(), participant.clone(), tx)
        .await;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_id, participant, rx)))
}

/// Spawns a task that drains the connection's channel into the WebSocket
/// sink. This is the only writer to the socket, so fan-out from multiple
/// rooms' events never interleaves partial frames.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room_id: RoomId,
    participant: Participant,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let mut send_task = pusher_loop(rx, sender);

    // Announce the join: user-joined to the whole room (this connection
    // included), then the roster snapshot to this connection alone.
    if let Err(e) = state
        .presence_announcer
        .announce_joined(&room_id, &participant)
        .await
    {
        tracing::warn!(
            "Failed to announce join of '{}' to room '{}': {}",
            participant.connection_id.as_str(),
            room_id.as_str(),
            e
        );
    }

    let state_clone = state.clone();
    let room_id_clone = room_id.clone();
    let connection_id = participant.connection_id.clone();
    let connection_id_clone = connection_id.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if let Err(e) = state_clone
                        .route_event_usecase
                        .execute(&room_id_clone, &connection_id_clone, &text)
                        .await
                    {
                        tracing::warn!("Failed to route event: {}", e);
                    }
                }
                Message::Ping(_) => {
                    // Pong is sent automatically by axum
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!(
                        "Connection '{}' requested close",
                        connection_id_clone.as_str()
                    );
                    break;
                }
                _ => {}
            }
        }
    });

    // Whichever side finishes first tears down the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Remove-then-announce, and only the winning close path announces:
    // the disconnect usecase is idempotent and returns None the second
    // time, so at most one user-left goes out per connection.
    if let Some((removed, remaining)) = state
        .disconnect_participant_usecase
        .execute(&room_id, &connection_id)
        .await
    {
        if let Err(e) = state
            .presence_announcer
            .announce_left(&room_id, &removed, remaining)
            .await
        {
            tracing::warn!(
                "Failed to announce leave of '{}' from room '{}': {}",
                connection_id.as_str(),
                room_id.as_str(),
                e
            );
        }
    }
}
