use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::weekly_summary::OverallSummary;
use crate::services::prediction::PredictionClient;

/// Most frequent item; ties go to the one seen first.
pub fn most_common<I, S>(items: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (index, item) in items.into_iter().enumerate() {
        let slot = counts.entry(item.as_ref().to_string()).or_insert((0, index));
        slot.0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(item, _)| item)
}

pub async fn compute_overall_summary(
    pool: &SqlitePool,
    predictor: &PredictionClient,
    user_id: &str,
) -> AppResult<OverallSummary> {
    let emotions = sqlx::query_scalar::<_, String>(
        "SELECT emotion FROM chats WHERE user_id = ? AND sender = 'bot' ORDER BY timestamp ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(AppError::load_failed("summary"))?;

    let total_chats = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chats WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(AppError::load_failed("summary"))?;

    let moods = sqlx::query_scalar::<_, String>(
        "SELECT mood FROM moods WHERE user_id = ? ORDER BY timestamp ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(AppError::load_failed("summary"))?;

    let overall_status = predictor.predict(user_id).await;

    Ok(OverallSummary {
        total_chats,
        total_moods: moods.len() as i64,
        most_common_emotion: most_common(&emotions),
        most_common_mood: most_common(&moods),
        overall_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::middleware::AuthUser;
    use crate::db::pool::test_pool;
    use crate::models::chat_message::ChatMessage;
    use crate::models::mood::{Mood, MoodEntry};
    use crate::services::mirror::Mirror;
    use crate::services::prediction::DEFAULT_STATUS;
    use std::time::Duration;

    #[test]
    fn most_common_prefers_first_on_tie() {
        assert_eq!(most_common(["a", "b", "b", "a"]), Some("a".to_string()));
        assert_eq!(most_common(["a", "b", "b"]), Some("b".to_string()));
        assert_eq!(most_common(Vec::<String>::new()), None);
    }

    #[tokio::test]
    async fn summary_counts_and_modes() {
        let pool = test_pool().await;
        let mirror = Mirror::new(pool.clone());
        let user = AuthUser {
            id: "ivy".into(),
            name: None,
            token: "tok".into(),
        };

        for (i, (text, is_user, emotion)) in [
            ("hi", true, "neutral"),
            ("hello", false, "assistant"),
            ("sad day", true, "neutral"),
            ("I hear you", false, "empathetic"),
            ("thanks", true, "neutral"),
            ("anytime", false, "empathetic"),
        ]
        .into_iter()
        .enumerate()
        {
            let mut message = if is_user {
                ChatMessage::from_user(text, None)
            } else {
                ChatMessage::from_bot(text, emotion, None)
            };
            message.timestamp = i as i64;
            mirror.record_message(&user, &message).await.unwrap();
        }
        for (i, mood) in ["calm", "Sad", "Calm", "Calm"].into_iter().enumerate() {
            let entry = MoodEntry {
                mood: Mood::new(mood),
                quiz_score: None,
                timestamp: i as i64,
            };
            mirror.record_mood(&user, &entry).await.unwrap();
        }

        let predictor = PredictionClient::new(None, Duration::from_secs(1)).unwrap();
        let summary = compute_overall_summary(&pool, &predictor, "ivy").await.unwrap();

        assert_eq!(summary.total_chats, 6);
        assert_eq!(summary.total_moods, 4);
        assert_eq!(summary.most_common_emotion.as_deref(), Some("empathetic"));
        assert_eq!(summary.most_common_mood.as_deref(), Some("Calm"));
        assert_eq!(summary.overall_status, DEFAULT_STATUS);
    }

    #[tokio::test]
    async fn empty_user_has_no_modes() {
        let pool = test_pool().await;
        let predictor = PredictionClient::new(None, Duration::from_secs(1)).unwrap();

        let summary = compute_overall_summary(&pool, &predictor, "nobody").await.unwrap();

        assert_eq!(summary.total_chats, 0);
        assert_eq!(summary.total_moods, 0);
        assert_eq!(summary.most_common_emotion, None);
        assert_eq!(summary.most_common_mood, None);
    }
}
