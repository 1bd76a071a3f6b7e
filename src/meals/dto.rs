use serde::{Deserialize, Serialize};

use crate::meals::repo_types::{Category, Cost, Meal};

#[derive(Debug, Clone, Serialize)]
pub struct MealOut {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub taste_profile: String,
    pub cost: Cost,
}

impl From<Meal> for MealOut {
    fn from(m: Meal) -> Self {
        Self {
            id: m.id,
            name: m.name,
            category: m.category,
            taste_profile: m.taste_profile,
            cost: m.cost,
        }
    }
}

/// Body of create and full update.
#[derive(Debug, Deserialize)]
pub struct MealRequest {
    pub name: String,
    pub category: Category,
    pub taste_profile: String,
    pub cost: Cost,
}

#[derive(Debug, Deserialize)]
pub struct MealQuery {
    pub category: Option<String>,
    pub taste_profile: Option<String>,
    pub cost: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 100 }
