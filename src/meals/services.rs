use std::str::FromStr;

use tracing::info;
use uuid::Uuid;

use crate::{
    db::Store,
    error::AppError,
    meals::{
        dto::{MealQuery, MealRequest},
        repo_types::{Category, Cost, Meal, MealFilter, NewMeal},
    },
};

pub const MAX_PAGE: i64 = 100;

pub fn validate_meal(req: MealRequest) -> Result<NewMeal, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }
    let taste_profile = req.taste_profile.trim();
    if taste_profile.is_empty() {
        return Err(AppError::validation("taste_profile must not be empty"));
    }
    Ok(NewMeal {
        name: name.to_string(),
        category: req.category,
        taste_profile: taste_profile.to_string(),
        cost: req.cost,
    })
}

/// Splits list query parameters into a filter and a validated page.
pub fn parse_query(q: MealQuery) -> Result<(MealFilter, i64, i64), AppError> {
    if !(1..=MAX_PAGE).contains(&q.limit) {
        return Err(AppError::validation(format!("limit must be between 1 and {MAX_PAGE}")));
    }
    if q.offset < 0 {
        return Err(AppError::validation("offset must not be negative"));
    }
    let category = q
        .category
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(Category::from_str)
        .transpose()
        .map_err(AppError::Validation)?;
    let cost = q
        .cost
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(Cost::from_str)
        .transpose()
        .map_err(AppError::Validation)?;
    let filter = MealFilter {
        category,
        taste_profile: q.taste_profile.filter(|t| !t.is_empty()),
        cost,
    };
    Ok((filter, q.limit, q.offset))
}

pub async fn create(store: &dyn Store, user_id: Uuid, req: MealRequest) -> Result<Meal, AppError> {
    let meal = validate_meal(req)?;
    let created = store.create_meal(user_id, &meal).await?;
    info!(%user_id, meal_id = created.id, "meal created");
    Ok(created)
}

pub async fn list(store: &dyn Store, user_id: Uuid, q: MealQuery) -> Result<Vec<Meal>, AppError> {
    let (filter, limit, offset) = parse_query(q)?;
    Ok(store.list_meals(user_id, &filter, limit, offset).await?)
}

pub async fn get(store: &dyn Store, user_id: Uuid, meal_id: i64) -> Result<Meal, AppError> {
    store
        .get_meal(user_id, meal_id)
        .await?
        .ok_or_else(|| AppError::not_found("Meal not found"))
}

pub async fn update(
    store: &dyn Store,
    user_id: Uuid,
    meal_id: i64,
    req: MealRequest,
) -> Result<Meal, AppError> {
    let meal = validate_meal(req)?;
    let updated = store
        .update_meal(user_id, meal_id, &meal)
        .await?
        .ok_or_else(|| AppError::not_found("Meal not found"))?;
    info!(%user_id, meal_id, "meal updated");
    Ok(updated)
}

pub async fn delete(store: &dyn Store, user_id: Uuid, meal_id: i64) -> Result<(), AppError> {
    if !store.delete_meal(user_id, meal_id).await? {
        return Err(AppError::not_found("Meal not found"));
    }
    info!(%user_id, meal_id, "meal deleted");
    Ok(())
}
