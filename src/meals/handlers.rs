use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

use super::dto::{MealOut, MealQuery, MealRequest};
use super::services;

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route(
            "/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(q): ApiQuery<MealQuery>,
) -> Result<Json<Vec<MealOut>>, AppError> {
    let meals = services::list(state.store.as_ref(), user_id, q).await?;
    Ok(Json(meals.into_iter().map(MealOut::from).collect()))
}

#[instrument(skip(state, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<MealRequest>,
) -> Result<(StatusCode, HeaderMap, Json<MealOut>), AppError> {
    let meal = services::create(state.store.as_ref(), user_id, body).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/meals/{}", meal.id)) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(meal.into())))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MealOut>, AppError> {
    let meal = services::get(state.store.as_ref(), user_id, id).await?;
    Ok(Json(meal.into()))
}

#[instrument(skip(state, body))]
pub async fn update_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<MealRequest>,
) -> Result<Json<MealOut>, AppError> {
    let meal = services::update(state.store.as_ref(), user_id, id, body).await?;
    Ok(Json(meal.into()))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    services::delete(state.store.as_ref(), user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
