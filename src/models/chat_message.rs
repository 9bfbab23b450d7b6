use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Emotion tag carried by every user-authored turn.
pub const USER_EMOTION: &str = "neutral";

/// One turn of a chat session. Never mutated after creation; a session is
/// changed only by replacing its whole message list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub is_user: bool,
    pub emotion: String,
    #[serde(default)]
    pub session_id: Option<String>,
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn from_user(text: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
            emotion: USER_EMOTION.to_string(),
            session_id,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn from_bot(
        text: impl Into<String>,
        emotion: impl Into<String>,
        session_id: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            is_user: false,
            emotion: emotion.into(),
            session_id,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn sender(&self) -> Sender {
        if self.is_user {
            Sender::User
        } else {
            Sender::Bot
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    /// Case-insensitive; anything other than `user` / `bot` is unknown.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "user" => Some(Sender::User),
            "bot" => Some(Sender::Bot),
            _ => None,
        }
    }
}

/// A mirrored chat document as stored under `users/{id}/chats`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatRecord {
    pub id: String,
    pub user_id: String,
    pub sender: String,
    pub message: String,
    pub emotion: String,
    pub timestamp: i64,
}

/// Render model for one chat bubble.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum ChatRow {
    User(String),
    Bot(String),
}
