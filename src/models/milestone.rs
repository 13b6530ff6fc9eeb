use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Category;

/// A quarterly deliverable filed under one category.
///
/// `resourcing` carries the raw allocation string (`"Alice:40;Bob:60"` or
/// `"Alice;Bob"`). Older documents only have `people`, which then doubles as
/// the allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Unique within its category and quarter.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub people: String,
    #[serde(default)]
    pub resourcing: String,
    #[serde(default, deserialize_with = "super::percent::deserialize")]
    pub progress: u32,
}

impl Milestone {
    /// The allocation string used for resourcing: `resourcing` when set,
    /// otherwise `people`.
    pub fn raw_allocation(&self) -> &str {
        if self.resourcing.trim().is_empty() {
            &self.people
        } else {
            &self.resourcing
        }
    }
}

/// Milestones of one quarter, keyed by category.
pub type QuarterMilestones = BTreeMap<Category, Vec<Milestone>>;

/// The whole milestones document: quarter code → category → milestones.
pub type MilestonesDoc = BTreeMap<String, QuarterMilestones>;

/// Input for adding a milestone by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMilestoneInput {
    /// Generated from the title when omitted.
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub people: String,
    #[serde(default)]
    pub resourcing: String,
    #[serde(default)]
    pub progress: i64,
}

/// New resourcing for a milestone, either as the raw string or as the
/// per-person percentages entered in the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourcingInput {
    Raw(String),
    PerPerson(BTreeMap<String, i64>),
}

/// Input for updating a milestone. All fields are optional for partial updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMilestoneInput {
    pub title: Option<String>,
    pub date: Option<String>,
    pub progress: Option<i64>,
    pub resourcing: Option<ResourcingInput>,
}

/// One row of a tabular milestone import. Every field is optional text, the
/// way a spreadsheet export delivers it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MilestoneRow {
    pub quarter: Option<String>,
    pub category: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub people: Option<String>,
    pub resourcing: Option<String>,
    #[serde(default, deserialize_with = "super::percent::deserialize_text")]
    pub progress: Option<String>,
    pub id: Option<String>,
}
