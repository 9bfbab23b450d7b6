use sqlx::SqlitePool;

use crate::models::leaderboard::LeaderboardRecord;

/// Users with a cached weekly summary, best first: highest average quiz
/// score, then most mood logs.
pub async fn load_leaderboard(
    pool: &SqlitePool,
    limit: u32,
) -> Result<Vec<LeaderboardRecord>, sqlx::Error> {
    sqlx::query_as::<_, LeaderboardRecord>(
        r#"
        SELECT
            w.user_id,
            u.display_name,
            w.average_quiz_score,
            w.total_moods,
            w.status
        FROM weekly_summaries w
        LEFT JOIN users u ON u.id = w.user_id
        ORDER BY w.average_quiz_score DESC, w.total_moods DESC, w.user_id ASC
        LIMIT ?
        "#,
    )
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::middleware::AuthUser;
    use crate::db::pool::test_pool;
    use crate::models::weekly_summary::{WeeklyStatus, WeeklySummary};
    use crate::services::aggregator::save_summary;
    use crate::services::mirror::Mirror;
    use crate::models::chat_message::ChatMessage;

    async fn seed(pool: &SqlitePool, id: &str, name: Option<&str>, avg: f64, total: i64) {
        let user = AuthUser {
            id: id.to_string(),
            name: name.map(str::to_string),
            token: "tok".into(),
        };
        Mirror::new(pool.clone())
            .record_message(&user, &ChatMessage::from_user("hi", None))
            .await
            .unwrap();

        let summary = WeeklySummary {
            total_entries: total,
            positive_count: total,
            negative_count: 0,
            neutral_count: 0,
            average_quiz_score: avg,
            mood_sequence: Vec::new(),
            status: WeeklyStatus::Positive,
            generated_at: 0,
        };
        save_summary(pool, id, &summary).await.unwrap();
    }

    #[tokio::test]
    async fn test_ordered_by_score_then_logs() {
        let pool = test_pool().await;
        seed(&pool, "a", Some("Ana"), 6.0, 3).await;
        seed(&pool, "b", Some("Ben"), 9.0, 1).await;
        seed(&pool, "c", None, 6.0, 5).await;

        let rows = load_leaderboard(&pool, 10).await.unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(rows[1].display_name, None);
    }

    #[tokio::test]
    async fn test_limit() {
        let pool = test_pool().await;
        for i in 0..4 {
            seed(&pool, &format!("u{}", i), None, i as f64, 1).await;
        }

        let rows = load_leaderboard(&pool, 2).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user_id, "u3");
    }
}
