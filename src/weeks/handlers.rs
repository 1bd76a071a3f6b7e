use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    extract::{ApiJson, ApiPath},
    state::AppState,
};

use super::dto::{AssignRequest, DayOut, SummaryOut, WeekOut};
use super::services;

pub fn week_routes() -> Router<AppState> {
    Router::new()
        .route("/weeks/:year/:week", get(get_week))
        .route("/weeks/:year/:week/summary", get(get_summary))
        .route("/weeks/:year/:week/days/:day", get(get_day).put(assign_day))
}

#[instrument(skip(state))]
pub async fn get_week(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath((year, week)): ApiPath<(i32, i32)>,
) -> Result<Json<WeekOut>, AppError> {
    let plan = services::get_week(state.store.as_ref(), user_id, year, week).await?;
    Ok(Json(plan.into()))
}

#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath((year, week)): ApiPath<(i32, i32)>,
) -> Result<Json<SummaryOut>, AppError> {
    let summary = services::get_summary(state.store.as_ref(), user_id, year, week).await?;
    Ok(Json(summary.into()))
}

#[instrument(skip(state))]
pub async fn get_day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath((year, week, day)): ApiPath<(i32, i32, String)>,
) -> Result<Json<DayOut>, AppError> {
    let slot = services::get_day(state.store.as_ref(), user_id, year, week, &day).await?;
    Ok(Json(slot.into()))
}

#[instrument(skip(state))]
pub async fn assign_day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath((year, week, day)): ApiPath<(i32, i32, String)>,
    ApiJson(body): ApiJson<AssignRequest>,
) -> Result<Json<DayOut>, AppError> {
    let slot =
        services::assign(state.store.as_ref(), user_id, year, week, &day, body.meal_id).await?;
    Ok(Json(slot.into()))
}
