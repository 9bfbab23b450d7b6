//! Weekly mood aggregation.
//!
//! The summary is a pure function of the mood entries inside the window at
//! computation time; nothing is updated incrementally.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::mood::{Mood, MoodBucket, MoodEntry, MoodRow};
use crate::models::weekly_summary::{WeeklyStatus, WeeklySummary};

pub const WINDOW_DAYS: i64 = 7;

/// Case-insensitive, closed classification: labels that are neither
/// positive nor negative are neutral.
pub fn classify(label: &str) -> MoodBucket {
    Mood::new(label).bucket()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCounts {
    pub total: i64,
    pub positive: i64,
    pub negative: i64,
    pub neutral: i64,
}

pub fn count_buckets<'a>(moods: impl IntoIterator<Item = &'a Mood>) -> BucketCounts {
    let mut counts = BucketCounts::default();
    for mood in moods {
        counts.total += 1;
        match mood.bucket() {
            MoodBucket::Positive => counts.positive += 1,
            MoodBucket::Negative => counts.negative += 1,
            MoodBucket::Neutral => {}
        }
    }
    counts.neutral = counts.total - counts.positive - counts.negative;
    counts
}

/// Mean of the present scores, `0.0` when there are none.
pub fn average_quiz_score(scores: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = scores
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), score| (sum + score, n + 1));
    if n > 0 {
        sum / n as f64
    } else {
        0.0
    }
}

/// Strict plurality; ties and all-zero counts are mixed.
pub fn derive_status(positive: i64, negative: i64, neutral: i64) -> WeeklyStatus {
    if positive > negative && positive > neutral {
        WeeklyStatus::Positive
    } else if negative > positive && negative > neutral {
        WeeklyStatus::Negative
    } else {
        WeeklyStatus::Mixed
    }
}

/// Build the summary for entries already restricted to the window.
pub fn summarize(entries: &[MoodEntry], generated_at: i64) -> WeeklySummary {
    if entries.is_empty() {
        return WeeklySummary::insufficient_data(generated_at);
    }

    let counts = count_buckets(entries.iter().map(|e| &e.mood));
    let average = average_quiz_score(entries.iter().filter_map(|e| e.quiz_score));

    WeeklySummary {
        total_entries: counts.total,
        positive_count: counts.positive,
        negative_count: counts.negative,
        neutral_count: counts.neutral,
        average_quiz_score: average,
        mood_sequence: entries.iter().map(|e| e.mood.clone()).collect(),
        status: derive_status(counts.positive, counts.negative, counts.neutral),
        generated_at,
    }
}

/// Mood entries in `[now - 7 days, now]`, oldest first.
pub async fn fetch_window(
    pool: &SqlitePool,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<MoodEntry>, sqlx::Error> {
    let start = now - Duration::days(WINDOW_DAYS);

    let rows = sqlx::query_as::<_, MoodRow>(
        r#"
        SELECT mood, quiz_score, timestamp FROM moods
        WHERE user_id = ? AND timestamp BETWEEN ? AND ?
        ORDER BY timestamp ASC
        "#,
    )
    .bind(user_id)
    .bind(start.timestamp_millis())
    .bind(now.timestamp_millis())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(MoodEntry::from).collect())
}

/// Upsert `reports/weekly_summary` for the user. Only the summary fields are
/// replaced.
pub async fn save_summary(
    pool: &SqlitePool,
    user_id: &str,
    summary: &WeeklySummary,
) -> anyhow::Result<()> {
    let sequence = serde_json::to_string(&summary.mood_sequence)?;

    sqlx::query(
        r#"
        INSERT INTO weekly_summaries (
            user_id, total_moods, positive_count, negative_count, neutral_count,
            average_quiz_score, last_7_days_mood, status, timestamp
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            total_moods = excluded.total_moods,
            positive_count = excluded.positive_count,
            negative_count = excluded.negative_count,
            neutral_count = excluded.neutral_count,
            average_quiz_score = excluded.average_quiz_score,
            last_7_days_mood = excluded.last_7_days_mood,
            status = excluded.status,
            timestamp = excluded.timestamp
        "#,
    )
    .bind(user_id)
    .bind(summary.total_entries)
    .bind(summary.positive_count)
    .bind(summary.negative_count)
    .bind(summary.neutral_count)
    .bind(summary.average_quiz_score)
    .bind(sequence)
    .bind(summary.status.as_str())
    .bind(summary.generated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Compute the weekly summary and cache it.
///
/// A failed query is an error, never an empty summary. A failed cache write
/// is only logged; the computed summary is still returned.
pub async fn compute_weekly_summary(
    pool: &SqlitePool,
    user_id: &str,
    now: DateTime<Utc>,
) -> AppResult<WeeklySummary> {
    let entries = fetch_window(pool, user_id, now)
        .await
        .map_err(AppError::load_failed("weekly data"))?;

    let summary = summarize(&entries, now.timestamp_millis());
    if !summary.has_data() {
        tracing::warn!(user_id, "No weekly mood data found");
        return Ok(summary);
    }

    if let Err(e) = save_summary(pool, user_id, &summary).await {
        tracing::error!(error = %e, user_id, "Failed to save weekly summary");
    } else {
        tracing::debug!(user_id, total = summary.total_entries, "Weekly summary saved");
    }

    Ok(summary)
}
