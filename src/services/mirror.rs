//! Best-effort mirroring of chat turns and mood entries into the per-user
//! document store.
//!
//! Writes are at-most-once: each call spawns one task, failures are logged
//! and never retried. The returned handle may be dropped.

use chrono::Utc;
use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::models::chat_message::ChatMessage;
use crate::models::mood::MoodEntry;

#[derive(Clone, Debug)]
pub struct Mirror {
    pool: SqlitePool,
}

impl Mirror {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn record_message(&self, user: &AuthUser, message: &ChatMessage) -> JoinHandle<()> {
        let pool = self.pool.clone();
        let user = user.clone();
        let message = message.clone();

        tokio::spawn(async move {
            match insert_chat(&pool, &user, &message).await {
                Ok(()) => tracing::debug!(
                    user_id = %user.id,
                    sender = message.sender().as_str(),
                    "Mirrored chat message"
                ),
                Err(e) => tracing::error!(
                    error = %e,
                    user_id = %user.id,
                    "Failed to mirror chat message"
                ),
            }
        })
    }

    pub fn record_mood(&self, user: &AuthUser, entry: &MoodEntry) -> JoinHandle<()> {
        let pool = self.pool.clone();
        let user = user.clone();
        let entry = entry.clone();

        tokio::spawn(async move {
            match insert_mood(&pool, &user, &entry).await {
                Ok(()) => tracing::debug!(user_id = %user.id, mood = %entry.mood, "Mirrored mood entry"),
                Err(e) => tracing::error!(
                    error = %e,
                    user_id = %user.id,
                    "Failed to mirror mood entry"
                ),
            }
        })
    }
}

/// Create the user document on first write; later writes refresh the
/// display name when the token carries one.
async fn ensure_user(pool: &SqlitePool, user: &AuthUser) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (id, display_name, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            display_name = COALESCE(excluded.display_name, users.display_name)
        "#,
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(Utc::now().timestamp_millis())
    .execute(pool)
    .await?;

    Ok(())
}

async fn insert_chat(pool: &SqlitePool, user: &AuthUser, message: &ChatMessage) -> Result<(), sqlx::Error> {
    ensure_user(pool, user).await?;

    sqlx::query(
        r#"
        INSERT INTO chats (id, user_id, sender, message, emotion, timestamp)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&user.id)
    .bind(message.sender().as_str())
    .bind(&message.text)
    .bind(&message.emotion)
    .bind(message.timestamp)
    .execute(pool)
    .await?;

    Ok(())
}

async fn insert_mood(pool: &SqlitePool, user: &AuthUser, entry: &MoodEntry) -> Result<(), sqlx::Error> {
    ensure_user(pool, user).await?;

    sqlx::query(
        r#"
        INSERT INTO moods (id, user_id, mood, quiz_score, timestamp)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&user.id)
    .bind(entry.mood.as_str())
    .bind(entry.quiz_score)
    .bind(entry.timestamp)
    .execute(pool)
    .await?;

    Ok(())
}
