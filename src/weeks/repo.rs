use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    db::{PgStore, StoreError},
    meals::{
        repo::meal_from_columns,
        repo_types::{Category, Cost, Meal},
    },
    weeks::repo_types::{Day, DayAssignment, Week, WeekRef},
};

#[async_trait]
pub trait WeekRepo: Send + Sync {
    /// Idempotent; concurrent callers get the same row.
    async fn get_or_create_week(&self, user_id: Uuid, week: WeekRef) -> Result<Week, StoreError>;

    /// Stored rows only; days never assigned are absent.
    async fn list_assignments(&self, week_id: i64) -> Result<Vec<DayAssignment>, StoreError>;

    /// Upserts one day. A `meal_id` that does not resolve to one of the
    /// user's meals fails with [`StoreError::NotFound`] before anything is
    /// written, week row included.
    async fn assign_day(
        &self,
        user_id: Uuid,
        week: WeekRef,
        day: Day,
        meal_id: Option<i64>,
    ) -> Result<DayAssignment, StoreError>;
}

type AssignmentRow = (
    String,
    Option<i64>,
    Option<Uuid>,
    Option<String>,
    Option<Category>,
    Option<String>,
    Option<Cost>,
    Option<OffsetDateTime>,
);

async fn upsert_week(
    conn: &mut PgConnection,
    user_id: Uuid,
    week: WeekRef,
) -> Result<Week, sqlx::Error> {
    // no-op update so RETURNING also yields an existing row
    sqlx::query_as::<_, Week>(
        r#"
        INSERT INTO weeks (user_id, year, week_number)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, year, week_number)
            DO UPDATE SET week_number = EXCLUDED.week_number
        RETURNING id, user_id, year, week_number, created_at
        "#,
    )
    .bind(user_id)
    .bind(week.year)
    .bind(week.week_number)
    .fetch_one(conn)
    .await
}

fn assignment_from_row(row: AssignmentRow) -> Result<DayAssignment, StoreError> {
    let (day, id, user_id, name, category, taste_profile, cost, created_at) = row;
    let day = Day::from_str(&day).map_err(|e| StoreError::Database(sqlx::Error::Decode(e.into())))?;
    let meal = meal_from_columns((id, user_id, name, category, taste_profile, cost, created_at));
    Ok(DayAssignment { day, meal })
}

#[async_trait]
impl WeekRepo for PgStore {
    async fn get_or_create_week(&self, user_id: Uuid, week: WeekRef) -> Result<Week, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(upsert_week(&mut conn, user_id, week).await?)
    }

    async fn list_assignments(&self, week_id: i64) -> Result<Vec<DayAssignment>, StoreError> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT a.day, m.id, m.user_id, m.name, m.category, m.taste_profile, m.cost, m.created_at
              FROM day_assignments a
              LEFT JOIN meals m ON m.id = a.meal_id
             WHERE a.week_id = $1
            "#,
        )
        .bind(week_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(assignment_from_row).collect()
    }

    async fn assign_day(
        &self,
        user_id: Uuid,
        week: WeekRef,
        day: Day,
        meal_id: Option<i64>,
    ) -> Result<DayAssignment, StoreError> {
        let mut tx = self.pool.begin().await?;

        let meal = match meal_id {
            Some(id) => {
                let meal = sqlx::query_as::<_, Meal>(
                    r#"
                    SELECT id, user_id, name, category, taste_profile, cost, created_at
                      FROM meals
                     WHERE id = $1 AND user_id = $2
                    "#,
                )
                .bind(id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
                // dropping tx rolls back; nothing has been written yet
                Some(meal.ok_or(StoreError::NotFound)?)
            }
            None => None,
        };

        let week_row = upsert_week(&mut tx, user_id, week).await?;

        sqlx::query(
            r#"
            INSERT INTO day_assignments (week_id, day, meal_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (week_id, day) DO UPDATE SET meal_id = EXCLUDED.meal_id
            "#,
        )
        .bind(week_row.id)
        .bind(day.as_str())
        .bind(meal_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(DayAssignment { day, meal })
    }
}
