use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Category;

/// A unit of planned work for one person in one week.
///
/// `percent` is the share of that person's week the task takes. It is kept
/// within [0, 100] per task, but the sum over a person's tasks is not capped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTask {
    pub title: String,
    #[serde(default)]
    pub subtasks: Vec<String>,
    pub person: String,
    #[serde(default, deserialize_with = "super::percent::deserialize")]
    pub percent: u32,
}

/// Tasks of one week, keyed by category.
pub type WeekPlan = BTreeMap<Category, Vec<WeeklyTask>>;

/// The whole weekly plans document: quarter code → week key → category → tasks.
pub type WeeklyPlans = BTreeMap<String, BTreeMap<String, WeekPlan>>;

/// Input for adding a task to a week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWeeklyTaskInput {
    pub title: String,
    /// Semicolon-separated subtasks, as typed into the task form.
    #[serde(default)]
    pub subtasks: String,
    pub person: String,
    #[serde(default)]
    pub percent: i64,
}

impl CreateWeeklyTaskInput {
    /// Normalize the form input into a task. Returns `None` when the title is
    /// blank.
    pub fn into_task(self) -> Option<WeeklyTask> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return None;
        }

        let subtasks = self
            .subtasks
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Some(WeeklyTask {
            title,
            subtasks,
            person: self.person.trim().to_string(),
            percent: self.percent.clamp(0, 100) as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, subtasks: &str, percent: i64) -> CreateWeeklyTaskInput {
        CreateWeeklyTaskInput {
            title: title.to_string(),
            subtasks: subtasks.to_string(),
            person: "Mike".to_string(),
            percent,
        }
    }

    #[test]
    fn splits_subtasks_on_semicolons() {
        let task = input("Cure trial", "mix; pour ;;cure", 30).into_task().unwrap();
        assert_eq!(task.subtasks, vec!["mix", "pour", "cure"]);
        assert_eq!(task.percent, 30);
    }

    #[test]
    fn blank_title_is_rejected() {
        assert!(input("   ", "", 10).into_task().is_none());
    }

    #[test]
    fn percent_is_kept_in_range() {
        assert_eq!(input("a", "", 250).into_task().unwrap().percent, 100);
        assert_eq!(input("a", "", -5).into_task().unwrap().percent, 0);
    }

    #[test]
    fn stored_percent_is_read_leniently() {
        let task: WeeklyTask =
            serde_json::from_str(r#"{"title":"Soak","person":"Bob","percent":-5}"#).unwrap();
        assert_eq!(task.percent, 0);

        let task: WeeklyTask =
            serde_json::from_str(r#"{"title":"Soak","person":"Bob","percent":"60"}"#).unwrap();
        assert_eq!(task.percent, 60);
    }
}
