use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{error::AppError, meals::repo_types::Meal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// Calendar order, Monday first.
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Day::ALL
            .into_iter()
            .find(|d| d.as_str() == lower)
            .ok_or_else(|| format!("Invalid day '{}'. Expected monday..sunday", s))
    }
}

/// An ISO-8601 week that exists in the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRef {
    pub year: i32,
    pub week_number: i32,
}

impl WeekRef {
    pub fn new(year: i32, week_number: i32) -> Result<Self, AppError> {
        let valid = u8::try_from(week_number)
            .ok()
            .and_then(|w| time::Date::from_iso_week_date(year, w, time::Weekday::Monday).ok())
            .is_some();
        if !valid {
            return Err(AppError::validation(format!(
                "Week {week_number} does not exist in year {year}"
            )));
        }
        Ok(Self { year, week_number })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Week {
    pub id: i64,
    pub user_id: Uuid,
    pub year: i32,
    pub week_number: i32,
    pub created_at: OffsetDateTime,
}

/// A stored assignment row. `meal: None` means leftovers.
#[derive(Debug, Clone)]
pub struct DayAssignment {
    pub day: Day,
    pub meal: Option<Meal>,
}
