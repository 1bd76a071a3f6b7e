use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "meal_category", rename_all = "lowercase")]
pub enum Category {
    Meat,
    Fish,
    Veg,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Meat => "meat",
            Category::Fish => "fish",
            Category::Veg => "veg",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "meat" => Ok(Category::Meat),
            "fish" => Ok(Category::Fish),
            "veg" => Ok(Category::Veg),
            _ => Err(format!(
                "Invalid category '{}'. Valid options: meat, fish, veg",
                s
            )),
        }
    }
}

/// Cost tier. On the wire and in the database the tiers are `$`, `$$`, `$$$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "meal_cost")]
pub enum Cost {
    #[serde(rename = "$", alias = "cheap")]
    #[sqlx(rename = "$")]
    Cheap,
    #[serde(rename = "$$", alias = "medium")]
    #[sqlx(rename = "$$")]
    Medium,
    #[serde(rename = "$$$", alias = "expensive")]
    #[sqlx(rename = "$$$")]
    Expensive,
}

impl Cost {
    pub fn as_str(self) -> &'static str {
        match self {
            Cost::Cheap => "$",
            Cost::Medium => "$$",
            Cost::Expensive => "$$$",
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cost {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "$" | "cheap" => Ok(Cost::Cheap),
            "$$" | "medium" => Ok(Cost::Medium),
            "$$$" | "expensive" => Ok(Cost::Expensive),
            _ => Err(format!(
                "Invalid cost '{}'. Valid options: $, $$, $$$",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
    pub category: Category,
    pub taste_profile: String,
    pub cost: Cost,
    pub created_at: OffsetDateTime,
}

/// Validated meal fields for create and full update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeal {
    pub name: String,
    pub category: Category,
    pub taste_profile: String,
    pub cost: Cost,
}

#[derive(Debug, Clone, Default)]
pub struct MealFilter {
    pub category: Option<Category>,
    pub taste_profile: Option<String>,
    pub cost: Option<Cost>,
}
