//! Key/value persistence of the active chat session.
//!
//! Each key holds the complete ordered message list as one JSON value. There
//! is no partial update: every mutation rewrites the whole sequence, so
//! mutations of one key are serialized through a per-key lock.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::models::chat_message::ChatMessage;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("session under key {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize session: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    pool: SqlitePool,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(key.to_string()).or_default().clone()
    }

    /// Overwrite everything stored under `key` with `messages`.
    pub async fn save(&self, key: &str, messages: &[ChatMessage]) -> Result<(), StoreError> {
        let lock = self.lock_for(key).await;
        let _guard = lock.lock().await;
        self.write(key, messages).await
    }

    /// Append one message to the list under `key` and return the new list.
    /// Concurrent appends to the same key all land.
    pub async fn append(
        &self,
        key: &str,
        message: &ChatMessage,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let lock = self.lock_for(key).await;
        let _guard = lock.lock().await;

        let mut messages = self.read_or_reset(key).await?;
        messages.push(message.clone());
        self.write(key, &messages).await?;

        Ok(messages)
    }

    async fn write(&self, key: &str, messages: &[ChatMessage]) -> Result<(), StoreError> {
        let value = serde_json::to_string(messages).map_err(StoreError::Serialize)?;

        sqlx::query(
            r#"
            INSERT INTO session_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The ordered list under `key`, or an empty list when nothing was saved.
    pub async fn load(&self, key: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM session_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match value {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// Start a new chat: the key now holds an empty list.
    pub async fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.save(key, &[]).await
    }

    /// Like [`load`](Self::load), but a corrupt value is logged and replaced
    /// by an empty session instead of failing the caller.
    pub async fn load_or_reset(&self, key: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let lock = self.lock_for(key).await;
        let _guard = lock.lock().await;
        self.read_or_reset(key).await
    }

    async fn read_or_reset(&self, key: &str) -> Result<Vec<ChatMessage>, StoreError> {
        match self.load(key).await {
            Err(StoreError::Corrupt { key, source }) => {
                tracing::warn!(key = %key, error = %source, "Discarding corrupt chat session");
                self.write(&key, &[]).await?;
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::test_pool;

    fn sample_messages() -> Vec<ChatMessage> {
        vec![
            ChatMessage::from_user("I feel tired today", None),
            ChatMessage::from_bot("That sounds hard. Want to talk about it?", "assistant", None),
            ChatMessage::from_user("Yes please", Some("s-1".into())),
        ]
    }

    #[tokio::test]
    async fn test_round_trip_preserves_order() {
        let store = SessionStore::new(test_pool().await);
        let messages = sample_messages();

        store.save("chat_history:u1", &messages).await.unwrap();
        let loaded = store.load("chat_history:u1").await.unwrap();

        assert_eq!(loaded, messages);
    }

    #[tokio::test]
    async fn test_untouched_key_is_empty() {
        let store = SessionStore::new(test_pool().await);

        let loaded = store.load("never-written").await.unwrap();

        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_content() {
        let store = SessionStore::new(test_pool().await);
        let messages = sample_messages();

        store.save("k", &messages).await.unwrap();
        store.save("k", &messages[..1]).await.unwrap();

        let loaded = store.load("k").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].text, "I feel tired today");
    }

    #[tokio::test]
    async fn test_keys_are_isolated() {
        let store = SessionStore::new(test_pool().await);

        store.save("a", &sample_messages()).await.unwrap();

        assert!(store.load("b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_starts_new_chat() {
        let store = SessionStore::new(test_pool().await);
        store.save("k", &sample_messages()).await.unwrap();

        store.clear("k").await.unwrap();

        assert!(store.load("k").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_value_is_reported() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO session_store (key, value, updated_at) VALUES ('k', 'not json', 0)")
            .execute(&pool)
            .await
            .unwrap();
        let store = SessionStore::new(pool);

        let err = store.load("k").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));

        let recovered = store.load_or_reset("k").await.unwrap();
        assert!(recovered.is_empty());
        assert!(store.load("k").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_extends_existing_session() {
        let store = SessionStore::new(test_pool().await);
        store.save("k", &sample_messages()).await.unwrap();

        let extended = store
            .append("k", &ChatMessage::from_bot("I'm listening", "assistant", Some("s-1".into())))
            .await
            .unwrap();

        assert_eq!(extended.len(), 4);
        assert_eq!(store.load("k").await.unwrap(), extended);
        assert_eq!(extended[3].text, "I'm listening");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_keep_every_message() {
        let store = SessionStore::new(test_pool().await);

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .append("k", &ChatMessage::from_user(format!("turn {i}"), None))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let loaded = store.load("k").await.unwrap();
        assert_eq!(loaded.len(), 20);
        for i in 0..20 {
            let text = format!("turn {i}");
            assert!(loaded.iter().any(|m| m.text == text), "missing {text}");
        }
    }

    #[tokio::test]
    async fn test_append_resets_corrupt_session() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO session_store (key, value, updated_at) VALUES ('k', '{', 0)")
            .execute(&pool)
            .await
            .unwrap();
        let store = SessionStore::new(pool);

        let messages = store
            .append("k", &ChatMessage::from_user("hello", None))
            .await
            .unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(store.load("k").await.unwrap(), messages);
    }
}
