use serde::{Deserialize, Serialize};

use crate::{
    meals::{
        dto::MealOut,
        repo_types::{Category, Cost},
    },
    weeks::{
        repo_types::Day,
        services::{DaySlot, WeekPlan},
        summary::{Tally, WeeklySummary},
    },
};

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    /// `null` or absent clears the day.
    #[serde(default)]
    pub meal_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DayOut {
    pub day: Day,
    pub meal: Option<MealOut>,
}

impl From<DaySlot> for DayOut {
    fn from(s: DaySlot) -> Self {
        Self {
            day: s.day,
            meal: s.meal.map(MealOut::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WeekOut {
    pub year: i32,
    pub week_number: i32,
    pub days: Vec<DayOut>,
}

impl From<WeekPlan> for WeekOut {
    fn from(p: WeekPlan) -> Self {
        Self {
            year: p.year,
            week_number: p.week_number,
            days: p.days.into_iter().map(DayOut::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryOut {
    pub meals: Vec<MealOut>,
    pub categories_count: Tally<Category>,
    pub taste_profiles: Tally<String>,
    pub cost_summary: Tally<Cost>,
    pub leftovers_count: u32,
}

impl From<WeeklySummary> for SummaryOut {
    fn from(s: WeeklySummary) -> Self {
        Self {
            meals: s.meals.into_iter().map(MealOut::from).collect(),
            categories_count: s.categories_count,
            taste_profiles: s.taste_profiles,
            cost_summary: s.cost_summary,
            leftovers_count: s.leftovers_count,
        }
    }
}
