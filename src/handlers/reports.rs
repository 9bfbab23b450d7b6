use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::leaderboard::LeaderboardEntry;
use crate::models::weekly_summary::{OverallSummary, WeeklyReport};
use crate::services::{aggregator, leaderboard, overview, render};
use crate::AppState;

pub async fn get_weekly_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<WeeklyReport>> {
    let now = Utc::now();
    let summary = aggregator::compute_weekly_summary(&state.db, &auth_user.id, now).await?;

    Ok(Json(render::weekly_report(summary, now)))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<OverallSummary>> {
    let summary =
        overview::compute_overall_summary(&state.db, &state.predictor, &auth_user.id).await?;

    Ok(Json(summary))
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<LeaderboardEntry>>> {
    let records = leaderboard::load_leaderboard(&state.db, state.config.leaderboard_limit)
        .await
        .map_err(AppError::load_failed("leaderboard"))?;

    Ok(Json(render::leaderboard_rows(&records)))
}
