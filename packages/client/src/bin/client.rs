//! CLI room client with reconnection support.
//!
//! Joins a room on the broadcast server, sends messages from stdin, and
//! prints room events. Typing indicators, read receipts, and deletions
//! are available as slash commands.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroma-client -- --room general --username Alice
//! cargo run --bin hiroma-client -- -r general -i u1 -n Alice
//! ```

use clap::Parser;

use hiroma_client::adapter::ConnectConfig;
use hiroma_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroma-client")]
#[command(about = "CLI client for the Hiroma room broadcast server", long_about = None)]
struct Args {
    /// Room to join
    #[arg(short = 'r', long)]
    room: String,

    /// User ID (defaults to "anonymous" on the server)
    #[arg(short = 'i', long)]
    user_id: Option<String>,

    /// Display name (defaults to "Guest" on the server)
    #[arg(short = 'n', long)]
    username: Option<String>,

    /// Server base URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = ConnectConfig {
        base_url: args.url,
        room_id: args.room,
        user_id: args.user_id,
        username: args.username,
    };

    // Run the client
    if let Err(e) = hiroma_client::run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
