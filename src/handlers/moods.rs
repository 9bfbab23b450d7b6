use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::mood::{LogMoodRequest, Mood, MoodEntry};
use crate::AppState;

/// Accepts the entry and mirrors it in the background.
pub async fn log_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<LogMoodRequest>,
) -> AppResult<(StatusCode, Json<MoodEntry>)> {
    body.validate()?;
    if body.mood.trim().is_empty() {
        return Err(AppError::Validation("Mood must not be blank".into()));
    }

    let entry = MoodEntry {
        mood: Mood::new(&body.mood),
        quiz_score: body.quiz_score,
        timestamp: Utc::now().timestamp_millis(),
    };

    state.mirror.record_mood(&auth_user, &entry);

    Ok((StatusCode::ACCEPTED, Json(entry)))
}
