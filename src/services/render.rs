//! Render models handed to the UI layer. Nothing here touches storage.

use chrono::{DateTime, Duration, Utc};

use crate::models::chat_message::{ChatMessage, ChatRecord, ChatRow, Sender};
use crate::models::leaderboard::{LeaderboardEntry, LeaderboardRecord};
use crate::models::weekly_summary::{CategoryCount, WeeklyReport, WeeklyStatus, WeeklySummary};
use crate::services::aggregator::WINDOW_DAYS;
use crate::services::trend::trend_points;

pub const ANONYMOUS: &str = "Anonymous";

pub fn session_rows(messages: &[ChatMessage]) -> Vec<ChatRow> {
    messages
        .iter()
        .filter(|m| !m.text.trim().is_empty())
        .map(|m| match m.sender() {
            Sender::User => ChatRow::User(m.text.clone()),
            Sender::Bot => ChatRow::Bot(m.text.clone()),
        })
        .collect()
}

/// Mirrored chat documents, already in timestamp order. Blank messages and
/// unknown senders are skipped.
pub fn history_rows(records: &[ChatRecord]) -> Vec<ChatRow> {
    records
        .iter()
        .filter(|r| !r.message.trim().is_empty())
        .filter_map(|r| match Sender::parse(&r.sender)? {
            Sender::User => Some(ChatRow::User(r.message.clone())),
            Sender::Bot => Some(ChatRow::Bot(r.message.clone())),
        })
        .collect()
}

pub fn status_message(status: WeeklyStatus) -> &'static str {
    match status {
        WeeklyStatus::Positive => "You maintained a positive state this week 🎉",
        WeeklyStatus::Negative => "This week was emotionally challenging 😟",
        WeeklyStatus::Mixed => "Your week had mixed emotions ⚖️",
        WeeklyStatus::InsufficientData => "No mood data found for this week ⚠️",
    }
}

pub fn status_emoji(status: WeeklyStatus) -> &'static str {
    match status {
        WeeklyStatus::Positive => "😊",
        WeeklyStatus::Negative => "😟",
        WeeklyStatus::Mixed => "⚖️",
        WeeklyStatus::InsufficientData => "🌱",
    }
}

pub fn weekly_report(summary: WeeklySummary, now: DateTime<Utc>) -> WeeklyReport {
    let since = now - Duration::days(WINDOW_DAYS);
    let stats_text = format!(
        "Weekly Summary ({} - Today)\n\
         Total Entries: {}\n\
         Positive: {}\n\
         Negative: {}\n\
         Neutral: {}\n\
         Avg Quiz Score: {:.1}",
        since.format("%b %d"),
        summary.total_entries,
        summary.positive_count,
        summary.negative_count,
        summary.neutral_count,
        summary.average_quiz_score,
    );

    WeeklyReport {
        categories: vec![
            CategoryCount {
                label: "Positive",
                count: summary.positive_count,
            },
            CategoryCount {
                label: "Negative",
                count: summary.negative_count,
            },
            CategoryCount {
                label: "Neutral",
                count: summary.neutral_count,
            },
        ],
        trend: trend_points(&summary.mood_sequence),
        stats_text,
        status_message: status_message(summary.status).to_string(),
        summary,
    }
}

pub fn leaderboard_rows(records: &[LeaderboardRecord]) -> Vec<LeaderboardEntry> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let status = r.status.parse().unwrap_or(WeeklyStatus::InsufficientData);
            LeaderboardEntry {
                rank: format!("#{}", i + 1),
                username: r
                    .display_name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| ANONYMOUS.to_string()),
                emoji: status_emoji(status).to_string(),
                score: format!("{:.1}", r.average_quiz_score),
                logs: format!("{} mood logs", r.total_moods),
            }
        })
        .collect()
}
