use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Category, Roster};

/// One person's share of a milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub person: String,
    /// Always within [0, 100].
    pub percent: u32,
}

impl AllocationEntry {
    pub fn new(person: impl Into<String>, percent: u32) -> Self {
        Self {
            person: person.into(),
            percent,
        }
    }
}

/// Category × person percent grid for one period.
///
/// Tables built with [`ResourcingTable::zeroed`] hold a cell for every
/// category and every roster member. Names outside the roster only appear
/// when an allocation mentions them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourcingTable(BTreeMap<Category, BTreeMap<String, u32>>);

impl ResourcingTable {
    pub fn zeroed(roster: &Roster) -> Self {
        let mut table = Self::default();
        table.fill(roster);
        table
    }

    /// Add missing cells with 0 without touching existing values.
    pub fn fill(&mut self, roster: &Roster) {
        for category in Category::ALL {
            let row = self.0.entry(category).or_default();
            for person in roster.people() {
                row.entry(person.clone()).or_insert(0);
            }
        }
    }

    pub fn get(&self, category: Category, person: &str) -> u32 {
        self.0
            .get(&category)
            .and_then(|row| row.get(person))
            .copied()
            .unwrap_or(0)
    }

    pub fn add(&mut self, category: Category, person: &str, percent: u32) {
        let cell = self
            .0
            .entry(category)
            .or_default()
            .entry(person.to_string())
            .or_insert(0);
        *cell = cell.saturating_add(percent);
    }

    /// Cap every cell at 100.
    pub fn clamp(&mut self) {
        for row in self.0.values_mut() {
            for value in row.values_mut() {
                *value = (*value).min(100);
            }
        }
    }

    pub fn category(&self, category: Category) -> Option<&BTreeMap<String, u32>> {
        self.0.get(&category)
    }

    /// All people that have a cell in any category, in name order.
    pub fn people(&self) -> Vec<String> {
        let mut people: Vec<String> = self
            .0
            .values()
            .flat_map(|row| row.keys().cloned())
            .collect();
        people.sort();
        people.dedup();
        people
    }
}

/// The resourcing document: quarter code → table.
pub type QuarterlyResourcing = BTreeMap<String, ResourcingTable>;

/// Person × category percent sums for one week.
///
/// Unlike [`ResourcingTable`], sums are not capped. A person whose total
/// exceeds 100 is over-allocated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyResourcing(BTreeMap<String, BTreeMap<Category, u32>>);

impl WeeklyResourcing {
    pub fn with_roster(roster: &Roster) -> Self {
        let mut weekly = Self::default();
        for person in roster.people() {
            weekly.0.entry(person.clone()).or_default();
        }
        weekly
    }

    pub fn add(&mut self, person: &str, category: Category, percent: u32) {
        let cell = self
            .0
            .entry(person.to_string())
            .or_default()
            .entry(category)
            .or_insert(0);
        *cell = cell.saturating_add(percent);
    }

    pub fn get(&self, person: &str, category: Category) -> u32 {
        self.0
            .get(person)
            .and_then(|row| row.get(&category))
            .copied()
            .unwrap_or(0)
    }

    /// Sum over all categories for one person.
    pub fn total(&self, person: &str) -> u32 {
        self.0
            .get(person)
            .map(|row| row.values().fold(0u32, |sum, v| sum.saturating_add(*v)))
            .unwrap_or(0)
    }

    pub fn is_over_allocated(&self, person: &str) -> bool {
        self.total(person) > 100
    }

    pub fn over_allocated(&self) -> Vec<String> {
        self.0
            .keys()
            .filter(|p| self.is_over_allocated(p))
            .cloned()
            .collect()
    }

    pub fn people(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

/// Weekly resourcing as returned over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyResourcingView {
    pub quarter: String,
    pub week: String,
    pub allocations: WeeklyResourcing,
    pub over_allocated: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_table_has_every_cell() {
        let roster = Roster::new(["Alice", "Bob"]);
        let table = ResourcingTable::zeroed(&roster);
        for category in Category::ALL {
            let row = table.category(category).unwrap();
            assert_eq!(row.len(), 2);
            assert!(row.values().all(|v| *v == 0));
        }
    }

    #[test]
    fn fill_keeps_existing_values() {
        let roster = Roster::new(["Alice", "Bob"]);
        let mut table = ResourcingTable::default();
        table.add(Category::Materials, "Alice", 40);
        table.fill(&roster);
        assert_eq!(table.get(Category::Materials, "Alice"), 40);
        assert_eq!(table.get(Category::Materials, "Bob"), 0);
        assert!(table.category(Category::Operations).is_some());
    }

    #[test]
    fn weekly_total_spans_categories() {
        let mut weekly = WeeklyResourcing::default();
        weekly.add("Bob", Category::Materials, 70);
        weekly.add("Bob", Category::Durability, 40);
        assert_eq!(weekly.total("Bob"), 110);
        assert_eq!(weekly.over_allocated(), vec!["Bob".to_string()]);
    }

    #[test]
    fn weekly_total_saturates() {
        let weekly: WeeklyResourcing = serde_json::from_value(serde_json::json!({
            "Bob": { "Materials": u32::MAX, "Durability": 10 }
        }))
        .unwrap();
        assert_eq!(weekly.total("Bob"), u32::MAX);
        assert!(weekly.is_over_allocated("Bob"));
    }
}
