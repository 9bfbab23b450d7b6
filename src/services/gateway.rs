//! Client for the remote chat endpoint.
//!
//! `send` never fails: transport errors, bad statuses and malformed bodies
//! all become a displayable fallback reply.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::chat_message::ChatMessage;

pub const OFFLINE_REPLY: &str = "I’m here for you, even offline 😊";
pub const ERROR_REPLY: &str = "Server error. Try again later.";
pub const EMPTY_REPLY: &str = "No reply";
pub const DEFAULT_ROLE: &str = "assistant";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    session_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    ai_response: Option<AiResponse>,
}

#[derive(Debug, Deserialize)]
struct AiResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum GatewayError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat API returned {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed chat API response: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    Answer,
    Offline,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BotReply {
    pub text: String,
    pub emotion: String,
    pub kind: ReplyKind,
}

impl BotReply {
    pub fn offline() -> Self {
        Self {
            text: OFFLINE_REPLY.into(),
            emotion: "offline".into(),
            kind: ReplyKind::Offline,
        }
    }

    pub fn error() -> Self {
        Self {
            text: ERROR_REPLY.into(),
            emotion: "error".into(),
            kind: ReplyKind::Error,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.kind != ReplyKind::Answer
    }

    pub fn to_message(&self, session_id: Option<String>) -> ChatMessage {
        ChatMessage::from_bot(self.text.clone(), self.emotion.clone(), session_id)
    }
}

#[derive(Clone, Debug)]
pub struct ChatGateway {
    client: reqwest::Client,
    url: String,
}

impl ChatGateway {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Send the latest utterance and wait for the companion's reply.
    pub async fn send(&self, utterance: &str, session_id: Option<&str>, auth_token: &str) -> BotReply {
        if auth_token.trim().is_empty() {
            tracing::warn!("No auth token available for chat request");
            return BotReply::error();
        }

        match self.request(utterance, session_id, auth_token).await {
            Ok(reply) => reply,
            Err(GatewayError::Status(status)) => {
                tracing::warn!(%status, "Chat API unavailable, replying offline");
                BotReply::offline()
            }
            Err(e) => {
                tracing::error!(error = %e, "Chat API call failed");
                BotReply::error()
            }
        }
    }

    async fn request(
        &self,
        utterance: &str,
        session_id: Option<&str>,
        auth_token: &str,
    ) -> Result<BotReply, GatewayError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(auth_token)
            .json(&ChatRequest {
                message: utterance,
                session_id,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status()));
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        let reply = match parsed.ai_response {
            Some(ai) => BotReply {
                text: ai.content.unwrap_or_else(|| EMPTY_REPLY.into()),
                emotion: ai.role.unwrap_or_else(|| DEFAULT_ROLE.into()),
                kind: ReplyKind::Answer,
            },
            None => BotReply {
                text: EMPTY_REPLY.into(),
                emotion: DEFAULT_ROLE.into(),
                kind: ReplyKind::Answer,
            },
        };

        Ok(reply)
    }
}
