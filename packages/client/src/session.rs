//! WebSocket client session management.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use hiroma_server::infrastructure::dto::websocket::{
    MessageDeletedEvent, MessageReadEvent, NewMessageEvent, OnlineUsersEvent, UserJoinedEvent,
    UserLeftEvent, UserStopTypingEvent, UserTypingEvent,
};

use crate::{
    adapter::{ConnectConfig, RoomEventHandler, connect, run_read_loop},
    domain::{ParsedInput, parse_input},
    error::ClientError,
    formatter::EventFormatter,
    ui::redisplay_prompt,
};

/// Prints every room event to the terminal and restores the prompt.
struct CliEventHandler {
    user_id: String,
    prompt_name: String,
}

impl RoomEventHandler for CliEventHandler {
    fn on_online_users(&self, event: &OnlineUsersEvent) {
        print!(
            "{}",
            EventFormatter::format_online_users(&event.users, &self.user_id)
        );
        redisplay_prompt(&self.prompt_name);
    }

    fn on_user_joined(&self, event: &UserJoinedEvent) {
        print!(
            "{}",
            EventFormatter::format_user_joined(&event.username, event.timestamp, event.total_users)
        );
        redisplay_prompt(&self.prompt_name);
    }

    fn on_user_left(&self, event: &UserLeftEvent) {
        print!(
            "{}",
            EventFormatter::format_user_left(&event.username, event.timestamp, event.total_users)
        );
        redisplay_prompt(&self.prompt_name);
    }

    fn on_new_message(&self, event: &NewMessageEvent) {
        print!(
            "{}",
            EventFormatter::format_new_message(
                event.username.as_deref(),
                &event.message,
                &event.message_id,
                event.timestamp,
            )
        );
        redisplay_prompt(&self.prompt_name);
    }

    fn on_user_typing(&self, event: &UserTypingEvent) {
        print!(
            "{}",
            EventFormatter::format_typing(event.username.as_deref())
        );
        redisplay_prompt(&self.prompt_name);
    }

    fn on_user_stop_typing(&self, event: &UserStopTypingEvent) {
        print!(
            "{}",
            EventFormatter::format_stop_typing(event.user_id.as_deref())
        );
        redisplay_prompt(&self.prompt_name);
    }

    fn on_message_read(&self, event: &MessageReadEvent) {
        print!(
            "{}",
            EventFormatter::format_message_read(&event.message_id, event.user_id.as_deref())
        );
        redisplay_prompt(&self.prompt_name);
    }

    fn on_message_deleted(&self, event: &MessageDeletedEvent) {
        print!(
            "{}",
            EventFormatter::format_message_deleted(&event.message_id, event.deleted_by.as_deref())
        );
        redisplay_prompt(&self.prompt_name);
    }

    fn on_unrecognized(&self, raw: &str) {
        print!("{}", EventFormatter::format_raw(raw));
        redisplay_prompt(&self.prompt_name);
    }

    fn on_error(&self, error: &ClientError) {
        tracing::warn!("Connection error: {}", error);
    }
}

/// Run one WebSocket client session until the connection drops or the
/// user exits.
pub async fn run_client_session(config: &ConnectConfig) -> Result<(), ClientError> {
    let (mut sender, stream) = connect(config).await?;

    tracing::info!("Connected to room '{}'", config.room_id);
    let prompt_name = config
        .username
        .clone()
        .unwrap_or_else(|| "Guest".to_string());
    println!(
        "\nJoined room '{}' as '{}'.\n\
         Type messages and press Enter to send.\n\
         Commands: /typing, /stop, /read <id>, /delete <id>. Press Ctrl+C to exit.\n",
        config.room_id, prompt_name
    );

    let handler = CliEventHandler {
        user_id: config
            .user_id
            .clone()
            .unwrap_or_else(|| "anonymous".to_string()),
        prompt_name: prompt_name.clone(),
    };

    // Spawn a task to handle incoming events
    let mut read_task = tokio::spawn(async move { run_read_loop(stream, &handler).await });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt_name_for_readline = prompt_name.clone();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", prompt_name_for_readline);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to handle stdin input and send to the room
    let prompt_name_for_write = prompt_name.clone();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let event = match parse_input(&line) {
                ParsedInput::Event(event) => event,
                ParsedInput::Unknown(command) => {
                    println!(
                        "Unknown command: {} (expected /typing, /stop, /read <id>, /delete <id>)",
                        command
                    );
                    redisplay_prompt(&prompt_name_for_write);
                    continue;
                }
            };

            if let Err(e) = sender.send(&event).await {
                tracing::warn!("Failed to send event: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
    }

    Ok(())
}
