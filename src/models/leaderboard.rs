use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardRecord {
    pub user_id: String,
    pub display_name: Option<String>,
    pub average_quiz_score: f64,
    pub total_moods: i64,
    pub status: String,
}

/// Display row; every field is preformatted text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: String,
    pub username: String,
    pub emoji: String,
    pub score: String,
    pub logs: String,
}
