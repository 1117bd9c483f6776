//! Event formatting utilities for client display.

use hiroma_server::infrastructure::dto::websocket::OnlineUser;
use hiroma_shared::time::millis_to_rfc3339;

/// Event formatter for client display
pub struct EventFormatter;

impl EventFormatter {
    /// Format the online-users roster shown right after joining a room
    pub fn format_online_users(users: &[OnlineUser], current_user_id: &str) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Online users:\n");

        if users.is_empty() {
            output.push_str("(No users online)\n");
        } else {
            for user in users {
                let me_suffix = if user.user_id == current_user_id {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!("{}{}\n", user.username, me_suffix));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a user-joined notification
    pub fn format_user_joined(username: &str, timestamp: i64, total_users: usize) -> String {
        format!(
            "\n+ {} joined at {} ({} online)\n",
            username,
            millis_to_rfc3339(timestamp),
            total_users
        )
    }

    /// Format a user-left notification
    pub fn format_user_left(username: &str, timestamp: i64, total_users: usize) -> String {
        format!(
            "\n- {} left at {} ({} online)\n",
            username,
            millis_to_rfc3339(timestamp),
            total_users
        )
    }

    /// Format a chat message. The sender can be unnamed when the server
    /// received the message before the connection registered.
    pub fn format_new_message(
        username: Option<&str>,
        message: &str,
        message_id: &str,
        timestamp: i64,
    ) -> String {
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: {}\n\
             sent at {} (id: {})\n\
             ------------------------------------------------------------\n",
            username.unwrap_or("(unknown)"),
            message,
            millis_to_rfc3339(timestamp),
            message_id
        )
    }

    /// Format a typing indicator
    pub fn format_typing(username: Option<&str>) -> String {
        format!("\n… {} is typing\n", username.unwrap_or("(unknown)"))
    }

    /// Format the end of a typing indicator
    pub fn format_stop_typing(user_id: Option<&str>) -> String {
        format!("\n… {} stopped typing\n", user_id.unwrap_or("(unknown)"))
    }

    /// Format a read receipt
    pub fn format_message_read(message_id: &str, user_id: Option<&str>) -> String {
        format!(
            "\n✓ {} read message {}\n",
            user_id.unwrap_or("(unknown)"),
            message_id
        )
    }

    /// Format a message deletion notice
    pub fn format_message_deleted(message_id: &str, deleted_by: Option<&str>) -> String {
        format!(
            "\nx message {} deleted by {}\n",
            message_id,
            deleted_by.unwrap_or("(unknown)")
        )
    }

    /// Format a raw text frame (when decoding fails)
    pub fn format_raw(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
