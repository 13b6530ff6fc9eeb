use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{DailyLogs, QuarterMilestones, ResourcingTable, WeekPlan};

/// A copy of a week's plan taken every time a task is added.
///
/// Snapshots are append-or-replace per week key; they exist so the history
/// view can show what a week looked like even if the live plan is edited
/// later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSnapshot {
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
    pub quarter: String,
    #[serde(default)]
    pub data: WeekPlan,
}

/// The snapshots document: week key → snapshot.
pub type WeekHistory = BTreeMap<String, WeekSnapshot>;

/// Everything recorded for one quarter, for the history page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarterHistory {
    pub quarter: String,
    pub milestones: QuarterMilestones,
    pub weekly_plans: BTreeMap<String, WeekPlan>,
    pub resourcing: Option<ResourcingTable>,
    pub daily_logs: DailyLogs,
}
