use async_trait::async_trait;
use uuid::Uuid;

use crate::db::{PgStore, StoreError};
use crate::meals::repo_types::{Category, Cost, Meal, MealFilter, NewMeal};

/// Every method is scoped to the owning user; other users' meals behave as
/// missing.
#[async_trait]
pub trait MealRepo: Send + Sync {
    async fn list_meals(
        &self,
        user_id: Uuid,
        filter: &MealFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Meal>, StoreError>;
    async fn get_meal(&self, user_id: Uuid, meal_id: i64) -> Result<Option<Meal>, StoreError>;
    async fn create_meal(&self, user_id: Uuid, meal: &NewMeal) -> Result<Meal, StoreError>;
    async fn update_meal(
        &self,
        user_id: Uuid,
        meal_id: i64,
        meal: &NewMeal,
    ) -> Result<Option<Meal>, StoreError>;
    /// Days that referenced the meal become leftovers.
    async fn delete_meal(&self, user_id: Uuid, meal_id: i64) -> Result<bool, StoreError>;
}

const MEAL_COLUMNS: &str = "id, user_id, name, category, taste_profile, cost, created_at";

#[async_trait]
impl MealRepo for PgStore {
    async fn list_meals(
        &self,
        user_id: Uuid,
        filter: &MealFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Meal>, StoreError> {
        let sql = format!(
            r#"
            SELECT {MEAL_COLUMNS}
            FROM meals
            WHERE user_id = $1
              AND ($2::meal_category IS NULL OR category = $2)
              AND ($3::text IS NULL OR taste_profile = $3)
              AND ($4::meal_cost IS NULL OR cost = $4)
            ORDER BY created_at DESC, id DESC
            LIMIT $5 OFFSET $6
            "#
        );
        let rows = sqlx::query_as::<_, Meal>(&sql)
            .bind(user_id)
            .bind(filter.category)
            .bind(filter.taste_profile.as_deref())
            .bind(filter.cost)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_meal(&self, user_id: Uuid, meal_id: i64) -> Result<Option<Meal>, StoreError> {
        let sql = format!("SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1 AND user_id = $2");
        let meal = sqlx::query_as::<_, Meal>(&sql)
            .bind(meal_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(meal)
    }

    async fn create_meal(&self, user_id: Uuid, meal: &NewMeal) -> Result<Meal, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO meals (user_id, name, category, taste_profile, cost)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MEAL_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Meal>(&sql)
            .bind(user_id)
            .bind(&meal.name)
            .bind(meal.category)
            .bind(&meal.taste_profile)
            .bind(meal.cost)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_meal(
        &self,
        user_id: Uuid,
        meal_id: i64,
        meal: &NewMeal,
    ) -> Result<Option<Meal>, StoreError> {
        let sql = format!(
            r#"
            UPDATE meals
               SET name = $3, category = $4, taste_profile = $5, cost = $6
             WHERE id = $1 AND user_id = $2
            RETURNING {MEAL_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Meal>(&sql)
            .bind(meal_id)
            .bind(user_id)
            .bind(&meal.name)
            .bind(meal.category)
            .bind(&meal.taste_profile)
            .bind(meal.cost)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_meal(&self, user_id: Uuid, meal_id: i64) -> Result<bool, StoreError> {
        let res = sqlx::query(r#"DELETE FROM meals WHERE id = $1 AND user_id = $2"#)
            .bind(meal_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

// Row shape shared with the week queries, which LEFT JOIN meals.
pub(crate) type MaybeMealColumns = (
    Option<i64>,
    Option<Uuid>,
    Option<String>,
    Option<Category>,
    Option<String>,
    Option<Cost>,
    Option<time::OffsetDateTime>,
);

pub(crate) fn meal_from_columns(cols: MaybeMealColumns) -> Option<Meal> {
    let (id, user_id, name, category, taste_profile, cost, created_at) = cols;
    Some(Meal {
        id: id?,
        user_id: user_id?,
        name: name?,
        category: category?,
        taste_profile: taste_profile?,
        cost: cost?,
        created_at: created_at?,
    })
}
