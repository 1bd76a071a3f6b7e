//! Weekly variety summary derived from a week's day slots.

use serde::{ser::Serializer, Serialize};

use crate::{
    meals::repo_types::{Category, Cost, Meal},
    weeks::services::DaySlot,
};

/// Counts keyed in first-seen order. Serializes as a JSON object whose keys
/// keep that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K> {
    entries: Vec<(K, u32)>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> Tally<K> {
    pub fn add(&mut self, key: K) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => self.entries.push((key, 1)),
        }
    }
}

#[cfg(test)]
impl<K: PartialEq> Tally<K> {
    pub fn get(&self, key: &K) -> u32 {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map_or(0, |(_, n)| *n)
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl<K: Serialize> Serialize for Tally<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, n)| (k, n)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeeklySummary {
    /// Assigned meals in day order; a meal used twice appears twice.
    pub meals: Vec<Meal>,
    pub categories_count: Tally<Category>,
    pub taste_profiles: Tally<String>,
    pub cost_summary: Tally<Cost>,
    pub leftovers_count: u32,
}

pub fn summarize(days: &[DaySlot]) -> WeeklySummary {
    let mut out = WeeklySummary::default();
    for slot in days {
        match &slot.meal {
            Some(meal) => {
                out.categories_count.add(meal.category);
                out.taste_profiles.add(meal.taste_profile.clone());
                out.cost_summary.add(meal.cost);
                out.meals.push(meal.clone());
            }
            None => out.leftovers_count += 1,
        }
    }
    out
}
