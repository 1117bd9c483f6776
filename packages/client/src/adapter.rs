//! Typed adapter over the room WebSocket.
//!
//! Wraps the raw socket behind a connect config, per-event handler hooks,
//! and thin send helpers, so callers never touch JSON envelopes directly.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use hiroma_server::infrastructure::dto::websocket::{
    InboundEvent, MessageDeletedEvent, MessageReadEvent, NewMessageEvent, OnlineUsersEvent,
    OutboundEvent, UserJoinedEvent, UserLeftEvent, UserStopTypingEvent, UserTypingEvent,
};

use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Read half of the room connection, consumed by [`run_read_loop`].
pub type EventStream = SplitStream<WsStream>;

/// Everything needed to join a room.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    /// Server base URL, e.g. `ws://127.0.0.1:8080`
    pub base_url: String,
    pub room_id: String,
    /// Defaults to "anonymous" on the server when absent
    pub user_id: Option<String>,
    /// Defaults to "Guest" on the server when absent
    pub username: Option<String>,
}

impl ConnectConfig {
    /// Build the connection URL: `{base}/ws/{room_id}` plus identity
    /// query parameters when present. The room id and identity values are
    /// percent-encoded, so names containing `&`, `#`, or spaces survive
    /// the trip intact.
    pub fn url(&self) -> String {
        let mut url = format!(
            "{}/ws/{}",
            self.base_url.trim_end_matches('/'),
            percent_encode(&self.room_id)
        );
        let mut params = Vec::new();
        if let Some(user_id) = &self.user_id {
            params.push(format!("userId={}", percent_encode(user_id)));
        }
        if let Some(username) = &self.username {
            params.push(format!("username={}", percent_encode(username)));
        }
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        url
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Per-event hooks for events arriving from the room. Every hook has a
/// no-op default, so a handler implements only what it cares about.
pub trait RoomEventHandler {
    /// Called once when the read loop starts over an open connection
    fn on_connect(&self) {}
    fn on_user_joined(&self, _event: &UserJoinedEvent) {}
    fn on_user_left(&self, _event: &UserLeftEvent) {}
    fn on_new_message(&self, _event: &NewMessageEvent) {}
    fn on_user_typing(&self, _event: &UserTypingEvent) {}
    fn on_user_stop_typing(&self, _event: &UserStopTypingEvent) {}
    fn on_message_read(&self, _event: &MessageReadEvent) {}
    fn on_message_deleted(&self, _event: &MessageDeletedEvent) {}
    fn on_online_users(&self, _event: &OnlineUsersEvent) {}
    /// Called with the raw text when the envelope is not a known event
    fn on_unrecognized(&self, _raw: &str) {}
    fn on_error(&self, _error: &ClientError) {}
    fn on_disconnect(&self) {}
}

/// Decode one text frame and invoke the matching handler hook.
pub fn dispatch_event<H: RoomEventHandler>(text: &str, handler: &H) {
    match serde_json::from_str::<OutboundEvent>(text) {
        Ok(OutboundEvent::UserJoined(event)) => handler.on_user_joined(&event),
        Ok(OutboundEvent::UserLeft(event)) => handler.on_user_left(&event),
        Ok(OutboundEvent::NewMessage(event)) => handler.on_new_message(&event),
        Ok(OutboundEvent::UserTyping(event)) => handler.on_user_typing(&event),
        Ok(OutboundEvent::UserStopTyping(event)) => handler.on_user_stop_typing(&event),
        Ok(OutboundEvent::MessageRead(event)) => handler.on_message_read(&event),
        Ok(OutboundEvent::MessageDeleted(event)) => handler.on_message_deleted(&event),
        Ok(OutboundEvent::OnlineUsers(event)) => handler.on_online_users(&event),
        Err(_) => handler.on_unrecognized(text),
    }
}

/// Drive the read half until the connection ends, dispatching every text
/// frame to the handler. Returns `true` when the connection ended with a
/// server-side close or a transport error (a reconnect candidate).
pub async fn run_read_loop<H: RoomEventHandler>(mut stream: EventStream, handler: &H) -> bool {
    handler.on_connect();

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => dispatch_event(&text, handler),
            Ok(Message::Close(_)) => {
                tracing::info!("Server closed the connection");
                handler.on_disconnect();
                return true;
            }
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                handler.on_error(&ClientError::ConnectionError(e.to_string()));
                return true;
            }
            _ => {}
        }
    }

    handler.on_disconnect();
    false
}

/// Write half of the room connection: thin envelope constructors, no
/// retry, no queue.
pub struct EventSender {
    sink: SplitSink<WsStream, Message>,
}

impl EventSender {
    /// Encode and send one event.
    pub async fn send(&mut self, event: &InboundEvent) -> Result<(), ClientError> {
        let json =
            serde_json::to_string(event).map_err(|e| ClientError::SendError(e.to_string()))?;
        self.sink
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| ClientError::SendError(e.to_string()))
    }

    pub async fn send_message(
        &mut self,
        message: &str,
        message_id: Option<String>,
    ) -> Result<(), ClientError> {
        self.send(&InboundEvent::Message {
            message: message.to_string(),
            message_id,
        })
        .await
    }

    pub async fn send_typing(&mut self) -> Result<(), ClientError> {
        self.send(&InboundEvent::Typing).await
    }

    pub async fn send_stop_typing(&mut self) -> Result<(), ClientError> {
        self.send(&InboundEvent::StopTyping).await
    }

    pub async fn send_read_receipt(&mut self, message_id: &str) -> Result<(), ClientError> {
        self.send(&InboundEvent::ReadReceipt {
            message_id: message_id.to_string(),
        })
        .await
    }

    pub async fn send_delete_message(&mut self, message_id: &str) -> Result<(), ClientError> {
        self.send(&InboundEvent::DeleteMessage {
            message_id: message_id.to_string(),
        })
        .await
    }
}

/// Open one connection scoped to `{room, user}`, returning the write
/// half and the read stream.
pub async fn connect(config: &ConnectConfig) -> Result<(EventSender, EventStream), ClientError> {
    let url = config.url();
    match connect_async(&url).await {
        Ok((ws_stream, _response)) => {
            let (sink, stream) = ws_stream.split();
            Ok((EventSender { sink }, stream))
        }
        Err(e) => {
            let error_msg = e.to_string();

            // The server answers 400 Bad Request for an invalid room id
            if error_msg.contains("400") || error_msg.contains("Bad Request") {
                return Err(ClientError::InvalidRoomId(config.room_id.clone()));
            }

            Err(ClientError::ConnectionError(error_msg))
        }
    }
}
