use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::mood::Mood;

/// Qualitative label for a week of mood entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyStatus {
    Positive,
    Negative,
    Mixed,
    InsufficientData,
}

impl WeeklyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeeklyStatus::Positive => "Positive",
            WeeklyStatus::Negative => "Negative",
            WeeklyStatus::Mixed => "Mixed",
            WeeklyStatus::InsufficientData => "insufficient data",
        }
    }
}

impl fmt::Display for WeeklyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeeklyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(WeeklyStatus::Positive),
            "Negative" => Ok(WeeklyStatus::Negative),
            "Mixed" => Ok(WeeklyStatus::Mixed),
            "insufficient data" => Ok(WeeklyStatus::InsufficientData),
            other => Err(format!("unknown weekly status: {}", other)),
        }
    }
}

/// Aggregate of the last seven days of mood entries for one user.
///
/// `neutral_count` is the remainder, so the three counts always sum to
/// `total_entries`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub total_entries: i64,
    pub positive_count: i64,
    pub negative_count: i64,
    pub neutral_count: i64,
    pub average_quiz_score: f64,
    pub mood_sequence: Vec<Mood>,
    pub status: WeeklyStatus,
    pub generated_at: i64,
}

impl WeeklySummary {
    /// Returned when the window holds no entries at all.
    pub fn insufficient_data(generated_at: i64) -> Self {
        Self {
            total_entries: 0,
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            average_quiz_score: 0.0,
            mood_sequence: Vec::new(),
            status: WeeklyStatus::InsufficientData,
            generated_at,
        }
    }

    pub fn has_data(&self) -> bool {
        self.status != WeeklyStatus::InsufficientData
    }
}

/// One bar/pie slice of the weekly report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub label: &'static str,
    pub count: i64,
}

/// One point on the mood trend line; `x` is the chronological index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub x: usize,
    pub y: f64,
    pub mood: String,
}

#[derive(Debug, Serialize)]
pub struct WeeklyReport {
    pub summary: WeeklySummary,
    pub categories: Vec<CategoryCount>,
    pub trend: Vec<TrendPoint>,
    pub stats_text: String,
    pub status_message: String,
}

/// Lifetime totals shown on the summary screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSummary {
    pub total_chats: i64,
    pub total_moods: i64,
    pub most_common_emotion: Option<String>,
    pub most_common_mood: Option<String>,
    pub overall_status: String,
}
