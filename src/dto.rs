//! # FeelBetter — Request/Response DTOs
//!
//! API contract types for the chat endpoints and the shared envelopes.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Response` → serialized to client JSON
//! - Validation is expressed via `validator` derive macros

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::chat_message::{ChatMessage, ChatRow};
use crate::services::gateway::ReplyKind;

// ============================================================================
// Common
// ============================================================================

/// Standard success message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Chat
// ============================================================================

/// POST /api/chat
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub message: String,

    /// Continue a specific remote conversation. Defaults to the session id of
    /// the latest stored turn.
    pub session_id: Option<String>,
}

/// One completed turn: the user's message and the reply shown for it.
#[derive(Debug, Serialize)]
pub struct ChatTurnResponse {
    pub user_message: ChatMessage,
    pub reply: ChatMessage,
    pub reply_kind: ReplyKind,
}

/// GET /api/chat/session and GET /api/chat/history
#[derive(Debug, Serialize)]
pub struct ChatRowsResponse {
    pub rows: Vec<ChatRow>,
}
