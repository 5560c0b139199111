//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, http::HeaderValue, protocol::Message},
};

use dojo_server::domain::entity::DEFAULT_FILE_ID;
use dojo_server::infrastructure::dto::websocket::{
    CodeUpdateMessage, CursorUpdateMessage, EventEnvelope, FileUpdateMessage, JoinRoomMessage,
    LanguageUpdateMessage, MessageType, NotesUpdateMessage, UserDto, UsersUpdateMessage,
};

use crate::{error::ClientError, formatter::MessageFormatter, ui::redisplay_prompt};

/// Connection and identity settings for one client session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket server URL (e.g., "ws://127.0.0.1:8080/ws")
    pub url: String,
    /// Room to join
    pub room_id: String,
    /// User id carried in the join payload and edit events
    pub user_id: String,
    /// Display name shown to other participants
    pub display_name: String,
    /// Language of the room's default file (relevant only when this join
    /// creates the room)
    pub language: String,
    /// API key, sent as `x-api-key` header and `user_api_key` cookie
    pub api_key: Option<String>,
    /// Bearer token, sent in the `Authorization` header
    pub token: Option<String>,
}

/// What one input line should turn into
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputAction {
    /// Send this JSON frame to the server
    Send(String),
    /// Switch the file that plain input lines edit
    SetActiveFile(u32),
    /// End the session
    Quit,
    /// Nothing to do
    Ignore,
}

/// Turn one input line into an action.
///
/// Lines starting with `:` are commands (`:file <id>`, `:lang <language>`,
/// `:notes <text>`, `:quit`); any other non-empty line overwrites the
/// active file's content.
fn parse_input(line: &str, config: &ClientConfig, active_file: u32) -> InputAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return InputAction::Ignore;
    }
    if trimmed == ":quit" {
        return InputAction::Quit;
    }
    if let Some(rest) = trimmed.strip_prefix(":file ") {
        return match rest.trim().parse::<u32>() {
            Ok(file_id) => InputAction::SetActiveFile(file_id),
            Err(_) => InputAction::Ignore,
        };
    }
    if let Some(rest) = trimmed.strip_prefix(":lang ") {
        let msg = LanguageUpdateMessage {
            r#type: MessageType::LanguageUpdate,
            room_id: config.room_id.clone(),
            new_language: rest.trim().to_string(),
            user_id: config.user_id.clone(),
            file_id: active_file,
        };
        return InputAction::Send(serde_json::to_string(&msg).unwrap());
    }
    if let Some(rest) = trimmed.strip_prefix(":notes ") {
        let msg = NotesUpdateMessage {
            r#type: MessageType::NotesUpdate,
            room_id: config.room_id.clone(),
            new_notes: rest.to_string(),
            user_id: config.user_id.clone(),
        };
        return InputAction::Send(serde_json::to_string(&msg).unwrap());
    }

    let msg = CodeUpdateMessage {
        r#type: MessageType::CodeUpdate,
        room_id: config.room_id.clone(),
        new_code: line.to_string(),
        user_id: config.user_id.clone(),
        file_id: active_file,
    };
    InputAction::Send(serde_json::to_string(&msg).unwrap())
}

/// Pretty-print one incoming event
fn print_incoming(text: &str, current_user_id: &str) {
    let Ok(envelope) = serde_json::from_str::<EventEnvelope>(text) else {
        tracing::debug!("Ignoring unparseable message: {}", text);
        return;
    };

    let formatted = match envelope.r#type {
        MessageType::UsersUpdate => serde_json::from_str::<UsersUpdateMessage>(text)
            .ok()
            .map(|msg| MessageFormatter::format_users_update(&msg.users, current_user_id)),
        MessageType::CodeUpdate => serde_json::from_str::<CodeUpdateMessage>(text)
            .ok()
            .map(|msg| MessageFormatter::format_code_update(&msg.user_id, msg.file_id, &msg.new_code)),
        MessageType::LanguageUpdate => serde_json::from_str::<LanguageUpdateMessage>(text)
            .ok()
            .map(|msg| {
                MessageFormatter::format_language_update(&msg.user_id, msg.file_id, &msg.new_language)
            }),
        MessageType::NotesUpdate => serde_json::from_str::<NotesUpdateMessage>(text)
            .ok()
            .map(|msg| MessageFormatter::format_notes_update(&msg.user_id, &msg.new_notes)),
        MessageType::FileUpdate => serde_json::from_str::<FileUpdateMessage>(text)
            .ok()
            .map(|msg| MessageFormatter::format_file_update(&msg.user_id, &msg.files)),
        MessageType::CursorUpdate => serde_json::from_str::<CursorUpdateMessage>(text)
            .ok()
            .map(|msg| MessageFormatter::format_cursor_update(&msg.user_id, msg.file_id)),
        MessageType::JoinRoom => None,
    };

    if let Some(formatted) = formatted {
        print!("{}", formatted);
    }
}

/// Run one WebSocket client session until the user quits or the
/// connection drops
pub async fn run_client_session(config: &ClientConfig) -> Result<(), ClientError> {
    let mut request = config
        .url
        .as_str()
        .into_client_request()
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    if let Some(token) = &config.token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
        request.headers_mut().insert("authorization", value);
    }
    if let Some(api_key) = &config.api_key {
        let key_value = HeaderValue::from_str(api_key)
            .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
        request.headers_mut().insert("x-api-key", key_value);
        // The server checks the presented key against the cookie-stored one
        let cookie_value = HeaderValue::from_str(&format!("user_api_key={}", api_key))
            .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
        request.headers_mut().insert("cookie", cookie_value);
    }

    let (ws_stream, _response) = match connect_async(request).await {
        Ok(result) => result,
        Err(tokio_tungstenite::tungstenite::Error::Http(response)) => {
            let status = response.status();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ClientError::Rejected(status.to_string()));
            }
            return Err(ClientError::ConnectionError(format!("HTTP {}", status)));
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to collaborative session server");

    let (mut write, mut read) = ws_stream.split();

    // Join the room right after the upgrade
    let join_msg = JoinRoomMessage {
        r#type: MessageType::JoinRoom,
        room_id: config.room_id.clone(),
        user: UserDto {
            id: config.user_id.clone(),
            name: config.display_name.clone(),
        },
        language: config.language.clone(),
    };
    write
        .send(Message::Text(serde_json::to_string(&join_msg).unwrap().into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    println!(
        "\nYou are '{}' in room '{}'. Plain lines overwrite file {}.",
        config.user_id, config.room_id, DEFAULT_FILE_ID
    );
    println!("Commands: :file <id>, :lang <language>, :notes <text>, :quit\n");

    // Spawn a task to handle incoming events
    let user_id_for_read = config.user_id.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    print_incoming(&text, &user_id_for_read);
                    redisplay_prompt(&user_id_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            }
        }
    });

    // Read input lines on a dedicated thread; rustyline is blocking
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    let prompt = format!("{}> ", config.user_id);
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("Failed to initialize line editor: {}", e);
                return;
            }
        };
        loop {
            match editor.readline(&prompt) {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Readline error: {}", e);
                    break;
                }
            }
        }
    });

    let mut active_file: u32 = DEFAULT_FILE_ID;
    let result = loop {
        tokio::select! {
            _ = &mut read_task => {
                break Err(ClientError::ConnectionError(
                    "connection closed by server".to_string(),
                ));
            }
            line = line_rx.recv() => {
                let Some(line) = line else {
                    // Input thread ended (Ctrl+C / Ctrl+D)
                    break Ok(());
                };
                match parse_input(&line, config, active_file) {
                    InputAction::Send(json) => {
                        if write.send(Message::Text(json.into())).await.is_err() {
                            break Err(ClientError::ConnectionError(
                                "failed to send message".to_string(),
                            ));
                        }
                    }
                    InputAction::SetActiveFile(file_id) => {
                        active_file = file_id;
                        println!("(editing file {})", file_id);
                    }
                    InputAction::Quit => break Ok(()),
                    InputAction::Ignore => {}
                }
            }
        }
    };

    // Close cleanly; the read task is done or no longer needed
    write.send(Message::Close(None)).await.ok();
    read_task.abort();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig {
            url: "ws://127.0.0.1:8080/ws".to_string(),
            room_id: "r1".to_string(),
            user_id: "alice".to_string(),
            display_name: "Alice".to_string(),
            language: "python".to_string(),
            api_key: None,
            token: None,
        }
    }

    #[test]
    fn test_parse_input_plain_line_is_code_update() {
        // テスト項目: 通常の入力行はアクティブファイルへの code-update になる
        // given (前提条件):
        let config = test_config();

        // when (操作):
        let action = parse_input("print(1)", &config, 1);

        // then (期待する結果):
        let InputAction::Send(json) = action else {
            panic!("expected Send");
        };
        let msg: CodeUpdateMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg.room_id, "r1");
        assert_eq!(msg.new_code, "print(1)");
        assert_eq!(msg.user_id, "alice");
        assert_eq!(msg.file_id, 1);
    }

    #[test]
    fn test_parse_input_commands() {
        // テスト項目: コマンド行が対応するアクションに解釈される
        // given (前提条件):
        let config = test_config();

        // then (期待する結果):
        assert_eq!(parse_input(":quit", &config, 1), InputAction::Quit);
        assert_eq!(
            parse_input(":file 3", &config, 1),
            InputAction::SetActiveFile(3)
        );
        assert_eq!(parse_input("", &config, 1), InputAction::Ignore);
        assert_eq!(parse_input(":file abc", &config, 1), InputAction::Ignore);
    }

    #[test]
    fn test_parse_input_notes_command() {
        // テスト項目: :notes コマンドが notes-update になる
        // given (前提条件):
        let config = test_config();

        // when (操作):
        let action = parse_input(":notes remember the edge case", &config, 1);

        // then (期待する結果):
        let InputAction::Send(json) = action else {
            panic!("expected Send");
        };
        let msg: NotesUpdateMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg.new_notes, "remember the edge case");
    }

    #[test]
    fn test_parse_input_lang_command_targets_active_file() {
        // テスト項目: :lang コマンドがアクティブファイルへの language-update になる
        // given (前提条件):
        let config = test_config();

        // when (操作):
        let action = parse_input(":lang typescript", &config, 7);

        // then (期待する結果):
        let InputAction::Send(json) = action else {
            panic!("expected Send");
        };
        let msg: LanguageUpdateMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg.new_language, "typescript");
        assert_eq!(msg.file_id, 7);
    }
}
