//! Room broadcast server over WebSocket.
//!
//! Each room is an isolated broadcast scope: events sent by one
//! connection fan out to the other connections of the same room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroma-server
//! cargo run --bin hiroma-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use hiroma_server::{
    infrastructure::{event_pusher::WebSocketEventPusher, repository::InMemorySessionRepository},
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomStateUseCase,
        PresenceAnnouncer, RouteEventUseCase,
    },
};
use hiroma_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroma-server")]
#[command(about = "WebSocket room broadcast server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. EventPusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory session store; room sessions are
    //    created lazily per room)
    let repository = Arc::new(InMemorySessionRepository::new());

    // 2. Create EventPusher (WebSocket implementation)
    let event_pusher = Arc::new(WebSocketEventPusher::new());

    // 3. Create UseCases
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        repository.clone(),
        event_pusher.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        repository.clone(),
        event_pusher.clone(),
    ));
    let route_event_usecase = Arc::new(RouteEventUseCase::new(
        repository.clone(),
        event_pusher.clone(),
    ));
    let presence_announcer = Arc::new(PresenceAnnouncer::new(
        repository.clone(),
        event_pusher.clone(),
    ));
    let get_room_state_usecase = Arc::new(GetRoomStateUseCase::new(repository.clone()));

    // 4. Create and run the server
    let server = Server::new(
        connect_participant_usecase,
        disconnect_participant_usecase,
        route_event_usecase,
        presence_announcer,
        get_room_state_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
