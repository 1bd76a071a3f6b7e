use std::str::FromStr;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    db::{Store, StoreError},
    error::AppError,
    meals::repo_types::Meal,
    weeks::{
        repo_types::{Day, DayAssignment, Week, WeekRef},
        summary::{summarize, WeeklySummary},
    },
};

#[derive(Debug, Clone)]
pub struct DaySlot {
    pub day: Day,
    pub meal: Option<Meal>,
}

impl From<DayAssignment> for DaySlot {
    fn from(a: DayAssignment) -> Self {
        Self {
            day: a.day,
            meal: a.meal,
        }
    }
}

/// A full Monday..Sunday view of one week.
#[derive(Debug, Clone)]
pub struct WeekPlan {
    pub year: i32,
    pub week_number: i32,
    pub days: Vec<DaySlot>,
}

/// Fills the days without a stored row as leftovers. `days` is indexed by
/// the `Day` discriminant.
pub fn build_plan(week: &Week, assignments: Vec<DayAssignment>) -> WeekPlan {
    let mut days: Vec<DaySlot> = Day::ALL
        .into_iter()
        .map(|day| DaySlot { day, meal: None })
        .collect();
    for a in assignments {
        days[a.day as usize].meal = a.meal;
    }
    WeekPlan {
        year: week.year,
        week_number: week.week_number,
        days,
    }
}

fn parse_day(raw: &str) -> Result<Day, AppError> {
    Day::from_str(raw).map_err(AppError::Validation)
}

pub async fn get_week(
    store: &dyn Store,
    user_id: Uuid,
    year: i32,
    week_number: i32,
) -> Result<WeekPlan, AppError> {
    let week_ref = WeekRef::new(year, week_number)?;
    let week = store.get_or_create_week(user_id, week_ref).await?;
    let assignments = store.list_assignments(week.id).await?;
    Ok(build_plan(&week, assignments))
}

pub async fn get_summary(
    store: &dyn Store,
    user_id: Uuid,
    year: i32,
    week_number: i32,
) -> Result<WeeklySummary, AppError> {
    let plan = get_week(store, user_id, year, week_number).await?;
    Ok(summarize(&plan.days))
}

pub async fn get_day(
    store: &dyn Store,
    user_id: Uuid,
    year: i32,
    week_number: i32,
    day: &str,
) -> Result<DaySlot, AppError> {
    let day = parse_day(day)?;
    let plan = get_week(store, user_id, year, week_number).await?;
    Ok(plan
        .days
        .into_iter()
        .find(|slot| slot.day == day)
        .unwrap_or(DaySlot { day, meal: None }))
}

/// `meal_id: None` clears the day.
pub async fn assign(
    store: &dyn Store,
    user_id: Uuid,
    year: i32,
    week_number: i32,
    day: &str,
    meal_id: Option<i64>,
) -> Result<DaySlot, AppError> {
    let week_ref = WeekRef::new(year, week_number)?;
    let day = parse_day(day)?;

    match store.assign_day(user_id, week_ref, day, meal_id).await {
        Ok(a) => {
            info!(%user_id, year, week_number, day = %day, ?meal_id, "day assigned");
            Ok(a.into())
        }
        Err(StoreError::NotFound) => {
            warn!(%user_id, ?meal_id, "assign with a meal the user does not own");
            Err(AppError::not_found("Meal not found or not yours"))
        }
        Err(e) => Err(e.into()),
    }
}
