use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

/// Mood label exactly as logged by the user. The label is never rewritten;
/// only bucketing looks past its case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mood(String);

impl Mood {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive; labels outside both lists are neutral.
    pub fn bucket(&self) -> MoodBucket {
        match self.0.trim().to_ascii_lowercase().as_str() {
            "happy" | "calm" | "excited" => MoodBucket::Positive,
            "sad" | "angry" | "stressed" => MoodBucket::Negative,
            _ => MoodBucket::Neutral,
        }
    }

    /// Y value on the mood trend chart. Exact match on the label.
    pub fn trend_value(&self) -> f64 {
        match self.0.as_str() {
            "Happy" => 3.0,
            "Calm" => 2.5,
            "Neutral" => 2.0,
            "Sad" => 1.0,
            "Angry" => 0.5,
            _ => 2.0,
        }
    }
}

impl From<String> for Mood {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodBucket {
    Positive,
    Negative,
    Neutral,
}

/// A logged mood, as read back from `users/{id}/moods`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodEntry {
    pub mood: Mood,
    pub quiz_score: Option<f64>,
    pub timestamp: i64,
}

#[derive(Debug, FromRow)]
pub struct MoodRow {
    pub mood: String,
    pub quiz_score: Option<f64>,
    pub timestamp: i64,
}

impl From<MoodRow> for MoodEntry {
    fn from(row: MoodRow) -> Self {
        Self {
            mood: Mood::from(row.mood),
            quiz_score: row.quiz_score,
            timestamp: row.timestamp,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LogMoodRequest {
    #[validate(length(min = 1, max = 64, message = "Mood must be 1-64 characters"))]
    pub mood: String,

    #[validate(range(min = 0.0, message = "Quiz score must not be negative"))]
    pub quiz_score: Option<f64>,
}
