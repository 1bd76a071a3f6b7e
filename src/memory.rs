//! In-memory [`Store`](crate::db::Store) used by unit and router tests.
//! Mirrors the constraints of the Postgres schema: unique emails, unique
//! (user, year, week) and (week, day), `ON DELETE SET NULL` for meals.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{repo::UserRepo, repo_types::User},
    db::StoreError,
    meals::{
        repo::MealRepo,
        repo_types::{Meal, MealFilter, NewMeal},
    },
    weeks::{
        repo::WeekRepo,
        repo_types::{Day, DayAssignment, Week, WeekRef},
    },
};

// SQL applies the same predicate in `list_meals`.
fn filter_matches(filter: &MealFilter, meal: &Meal) -> bool {
    filter.category.map_or(true, |c| c == meal.category)
        && filter
            .taste_profile
            .as_deref()
            .map_or(true, |t| t == meal.taste_profile)
        && filter.cost.map_or(true, |c| c == meal.cost)
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    meals: Vec<Meal>,
    weeks: Vec<Week>,
    // (week_id, day, meal_id)
    assignments: Vec<(i64, Day, Option<i64>)>,
    next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn owned_meal(&self, user_id: Uuid, meal_id: i64) -> Option<&Meal> {
        self.meals
            .iter()
            .find(|m| m.id == meal_id && m.user_id == user_id)
    }

    fn week_for(&mut self, user_id: Uuid, week: WeekRef) -> Week {
        if let Some(w) = self.weeks.iter().find(|w| {
            w.user_id == user_id && w.year == week.year && w.week_number == week.week_number
        }) {
            return w.clone();
        }
        let row = Week {
            id: self.next_id(),
            user_id,
            year: week.year,
            week_number: week.week_number,
            created_at: OffsetDateTime::now_utc(),
        };
        self.weeks.push(row.clone());
        row
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }

    pub fn week_count(&self) -> usize {
        self.lock().weeks.len()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.email == email) {
            return Err(StoreError::Conflict);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn set_password_hash(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        match inner.users.iter_mut().find(|u| u.email == email) {
            Some(u) => {
                u.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl MealRepo for MemoryStore {
    async fn list_meals(
        &self,
        user_id: Uuid,
        filter: &MealFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Meal>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .meals
            .iter()
            .rev()
            .filter(|m| m.user_id == user_id && filter_matches(filter, m))
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get_meal(&self, user_id: Uuid, meal_id: i64) -> Result<Option<Meal>, StoreError> {
        Ok(self.lock().owned_meal(user_id, meal_id).cloned())
    }

    async fn create_meal(&self, user_id: Uuid, meal: &NewMeal) -> Result<Meal, StoreError> {
        let mut inner = self.lock();
        let row = Meal {
            id: inner.next_id(),
            user_id,
            name: meal.name.clone(),
            category: meal.category,
            taste_profile: meal.taste_profile.clone(),
            cost: meal.cost,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.meals.push(row.clone());
        Ok(row)
    }

    async fn update_meal(
        &self,
        user_id: Uuid,
        meal_id: i64,
        meal: &NewMeal,
    ) -> Result<Option<Meal>, StoreError> {
        let mut inner = self.lock();
        let Some(row) = inner
            .meals
            .iter_mut()
            .find(|m| m.id == meal_id && m.user_id == user_id)
        else {
            return Ok(None);
        };
        row.name = meal.name.clone();
        row.category = meal.category;
        row.taste_profile = meal.taste_profile.clone();
        row.cost = meal.cost;
        Ok(Some(row.clone()))
    }

    async fn delete_meal(&self, user_id: Uuid, meal_id: i64) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        let before = inner.meals.len();
        inner
            .meals
            .retain(|m| !(m.id == meal_id && m.user_id == user_id));
        if inner.meals.len() == before {
            return Ok(false);
        }
        for (_, _, assigned) in inner.assignments.iter_mut() {
            if *assigned == Some(meal_id) {
                *assigned = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl WeekRepo for MemoryStore {
    async fn get_or_create_week(&self, user_id: Uuid, week: WeekRef) -> Result<Week, StoreError> {
        Ok(self.lock().week_for(user_id, week))
    }

    async fn list_assignments(&self, week_id: i64) -> Result<Vec<DayAssignment>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .assignments
            .iter()
            .filter(|(w, _, _)| *w == week_id)
            .map(|(_, day, meal_id)| DayAssignment {
                day: *day,
                meal: meal_id.and_then(|id| inner.meals.iter().find(|m| m.id == id).cloned()),
            })
            .collect())
    }

    async fn assign_day(
        &self,
        user_id: Uuid,
        week: WeekRef,
        day: Day,
        meal_id: Option<i64>,
    ) -> Result<DayAssignment, StoreError> {
        let mut inner = self.lock();
        let meal = match meal_id {
            Some(id) => Some(
                inner
                    .owned_meal(user_id, id)
                    .cloned()
                    .ok_or(StoreError::NotFound)?,
            ),
            None => None,
        };

        let week_id = inner.week_for(user_id, week).id;
        match inner
            .assignments
            .iter_mut()
            .find(|(w, d, _)| *w == week_id && *d == day)
        {
            Some(row) => row.2 = meal_id,
            None => inner.assignments.push((week_id, day, meal_id)),
        }
        Ok(DayAssignment { day, meal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::repo_types::{Category, Cost};

    #[test]
    fn filter_matches_every_given_field() {
        let meal = Meal {
            id: 1,
            user_id: Uuid::new_v4(),
            name: "Salmon".into(),
            category: Category::Fish,
            taste_profile: "savory".into(),
            cost: Cost::Expensive,
            created_at: OffsetDateTime::now_utc(),
        };
        assert!(filter_matches(&MealFilter::default(), &meal));
        assert!(filter_matches(
            &MealFilter {
                category: Some(Category::Fish),
                cost: Some(Cost::Expensive),
                ..Default::default()
            },
            &meal
        ));
        assert!(!filter_matches(
            &MealFilter {
                taste_profile: Some("sweet".into()),
                ..Default::default()
            },
            &meal
        ));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::default();
        store.create_user("a@b.co", "hash").await.unwrap();
        assert!(matches!(
            store.create_user("a@b.co", "hash").await,
            Err(StoreError::Conflict)
        ));
    }
}
