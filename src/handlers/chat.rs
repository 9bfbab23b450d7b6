use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::{ChatRowsResponse, ChatTurnResponse, MessageResponse, SendMessageRequest};
use crate::error::{AppError, AppResult};
use crate::models::chat_message::{ChatMessage, ChatRecord};
use crate::services::render::{history_rows, session_rows};
use crate::AppState;

pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<SendMessageRequest>,
) -> AppResult<Json<ChatTurnResponse>> {
    body.validate()?;
    let text = body.message.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Message must not be blank".into()));
    }

    let key = state.config.session_key_for(&auth_user.id);
    let stored = state.sessions.load_or_reset(&key).await?;

    let session_id = body
        .session_id
        .clone()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| stored.last().and_then(|m| m.session_id.clone()));

    // The local session is authoritative: the user's turn is stored before
    // the remote call starts.
    let user_message = ChatMessage::from_user(text, session_id.clone());
    state.sessions.append(&key, &user_message).await?;
    state.mirror.record_message(&auth_user, &user_message);

    let reply = state
        .gateway
        .send(text, session_id.as_deref(), &auth_user.token)
        .await;
    let reply_message = reply.to_message(session_id);

    // Replies from concurrent turns land in completion order.
    let messages = state.sessions.append(&key, &reply_message).await?;

    // Fallback replies stay local.
    if !reply.is_fallback() {
        state.mirror.record_message(&auth_user, &reply_message);
    }

    tracing::debug!(
        user_id = %auth_user.id,
        reply_kind = ?reply.kind,
        turns = messages.len(),
        "Chat turn completed"
    );

    Ok(Json(ChatTurnResponse {
        user_message,
        reply: reply_message,
        reply_kind: reply.kind,
    }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<ChatRowsResponse>> {
    let key = state.config.session_key_for(&auth_user.id);
    let messages = state.sessions.load_or_reset(&key).await?;

    Ok(Json(ChatRowsResponse {
        rows: session_rows(&messages),
    }))
}

pub async fn new_chat(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MessageResponse>> {
    let key = state.config.session_key_for(&auth_user.id);
    state.sessions.clear(&key).await?;

    tracing::info!(user_id = %auth_user.id, "Started new chat session");

    Ok(Json(MessageResponse {
        message: "New chat started".into(),
    }))
}

pub async fn get_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<ChatRowsResponse>> {
    let records = sqlx::query_as::<_, ChatRecord>(
        r#"
        SELECT * FROM chats
        WHERE user_id = ?
        ORDER BY timestamp ASC, rowid ASC
        "#,
    )
    .bind(&auth_user.id)
    .fetch_all(&state.db)
    .await
    .map_err(AppError::load_failed("chat history"))?;

    tracing::debug!(user_id = %auth_user.id, count = records.len(), "Loaded chat history");

    Ok(Json(ChatRowsResponse {
        rows: history_rows(&records),
    }))
}
