//! Message formatting utilities for client display.

use dojo_server::infrastructure::dto::websocket::{FileDto, ParticipantInfo, SERVER_USER_ID};
use dojo_shared::time::timestamp_to_jst_rfc3339;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a membership update showing all participants
    ///
    /// # Arguments
    ///
    /// * `users` - Current participants of the room
    /// * `current_user_id` - The current client's user id (to mark as "me")
    pub fn format_users_update(users: &[ParticipantInfo], current_user_id: &str) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Participants:\n");

        if users.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            for user in users {
                let is_me = user.user_id == current_user_id;
                let me_suffix = if is_me { " (me)" } else { "" };
                let joined_str = timestamp_to_jst_rfc3339(user.joined_at);
                output.push_str(&format!(
                    "{} [{}]{} - joined at {}\n",
                    user.display_name, user.user_id, me_suffix, joined_str
                ));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a code update from another participant
    pub fn format_code_update(user_id: &str, file_id: u32, new_code: &str) -> String {
        format!(
            "\n[{}] updated file {}:\n{}\n",
            user_id, file_id, new_code
        )
    }

    /// Format a language change from another participant
    pub fn format_language_update(user_id: &str, file_id: u32, new_language: &str) -> String {
        format!(
            "\n[{}] changed language of file {} to {}\n",
            user_id, file_id, new_language
        )
    }

    /// Format a notes update; the server sends the initial snapshot under
    /// its own id
    pub fn format_notes_update(user_id: &str, new_notes: &str) -> String {
        if user_id == SERVER_USER_ID {
            format!("\nNotes:\n{}\n", new_notes)
        } else {
            format!("\n[{}] updated notes:\n{}\n", user_id, new_notes)
        }
    }

    /// Format a file list update (snapshot or wholesale replacement)
    pub fn format_file_update(user_id: &str, files: &[FileDto]) -> String {
        let mut output = format!("\n[{}] files:\n", user_id);
        for file in files {
            output.push_str(&format!(
                "  #{} {} ({}, {} bytes)\n",
                file.id,
                file.name,
                file.language,
                file.content.len()
            ));
        }
        output
    }

    /// Format a cursor relay from another participant
    pub fn format_cursor_update(user_id: &str, file_id: u32) -> String {
        format!("\n[{}] moved cursor in file {}\n", user_id, file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_users_update_marks_me() {
        // テスト項目: 参加者リストで自分のエントリに (me) が付く
        // given (前提条件):
        let users = vec![
            ParticipantInfo {
                user_id: "alice".to_string(),
                display_name: "Alice".to_string(),
                connection_id: "conn-1".to_string(),
                joined_at: 1672498800000,
            },
            ParticipantInfo {
                user_id: "bob".to_string(),
                display_name: "Bob".to_string(),
                connection_id: "conn-2".to_string(),
                joined_at: 1672498800000,
            },
        ];

        // when (操作):
        let output = MessageFormatter::format_users_update(&users, "alice");

        // then (期待する結果):
        assert!(output.contains("Alice [alice] (me)"));
        assert!(output.contains("Bob [bob] -"));
    }

    #[test]
    fn test_format_users_update_empty() {
        // テスト項目: 参加者がいない場合のプレースホルダ表示
        // when (操作):
        let output = MessageFormatter::format_users_update(&[], "alice");

        // then (期待する結果):
        assert!(output.contains("(No participants)"));
    }

    #[test]
    fn test_format_notes_update_from_server() {
        // テスト項目: サーバー発のノートスナップショットは送信者名なしで表示される
        // when (操作):
        let output = MessageFormatter::format_notes_update(SERVER_USER_ID, "agenda");

        // then (期待する結果):
        assert!(output.starts_with("\nNotes:"));
        assert!(!output.contains("[server]"));
    }

    #[test]
    fn test_format_code_update() {
        // テスト項目: コード更新が送信者とファイル番号付きで表示される
        // when (操作):
        let output = MessageFormatter::format_code_update("bob", 1, "print(1)");

        // then (期待する結果):
        assert!(output.contains("[bob] updated file 1"));
        assert!(output.contains("print(1)"));
    }
}
