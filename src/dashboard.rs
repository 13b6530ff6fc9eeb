//! The dashboard repository.
//!
//! [`Dashboard`] owns the in-memory [`DashboardState`] and the two storage
//! seams. Every mutation updates the state, writes the affected document to
//! the local cache and then to the document store while the state lock is
//! still held, so concurrent writers reach storage in the order they changed
//! the state. Store failures are logged and swallowed: for the rest of the
//! session the in-memory and cached state stay authoritative.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::import::{generate_id, milestones_from_rows};
use crate::models::*;
use crate::resourcing::{
    compute_quarterly_from_milestones, compute_weekly_resourcing, day_key, format_allocations,
    parse_week_key, previous_day,
};
use crate::store::{self, DocumentStore, LocalCache, StoredDocument};

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// All dashboard documents, as plain values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub milestones: MilestonesDoc,
    pub weekly_plans: WeeklyPlans,
    pub daily_logs: DailyLogs,
    pub resourcing: QuarterlyResourcing,
}

#[derive(Clone)]
pub struct Dashboard {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn LocalCache>,
    roster: Roster,
    state: Arc<Mutex<DashboardState>>,
}

impl Dashboard {
    /// A dashboard with empty state. Nothing is read from storage.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn LocalCache>,
        roster: Roster,
    ) -> Self {
        Self {
            store,
            cache,
            roster,
            state: Arc::new(Mutex::new(DashboardState::default())),
        }
    }

    /// Load state from the cache first, then hydrate from the store.
    ///
    /// A non-empty store document replaces the cached one and is written back
    /// to the cache. A missing or unreadable store document leaves the cached
    /// value in place.
    pub fn load(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn LocalCache>,
        roster: Roster,
    ) -> Self {
        let dashboard = Self::new(store, cache, roster);

        let state = DashboardState {
            milestones: dashboard.hydrate(store::MILESTONES_PATH, store::MILESTONES_KEY),
            weekly_plans: dashboard.hydrate(store::WEEKLY_PLANS_PATH, store::WEEKLY_PLANS_KEY),
            daily_logs: dashboard.hydrate(store::DAILY_LOGS_PATH, store::DAILY_LOGS_KEY),
            resourcing: dashboard.hydrate(store::RESOURCING_PATH, store::RESOURCING_KEY),
        };
        tracing::info!(
            quarters = state.milestones.len(),
            days = state.daily_logs.len(),
            "dashboard state loaded"
        );

        *dashboard.state() = state;
        dashboard
    }

    /// [`Dashboard::load`], then rebuild `quarter`'s resourcing table so a
    /// stale stored table is never served.
    pub fn open(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn LocalCache>,
        roster: Roster,
        quarter: &str,
    ) -> Self {
        let dashboard = Self::load(store, cache, roster);
        dashboard.recompute_quarter(quarter);
        dashboard
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> DashboardState {
        self.state().clone()
    }

    // ============================================================
    // Milestones
    // ============================================================

    /// Milestones of a quarter, with an entry for every category.
    pub fn milestones(&self, quarter: &str) -> QuarterMilestones {
        let mut by_category = self
            .state()
            .milestones
            .get(quarter)
            .cloned()
            .unwrap_or_default();
        for category in Category::ALL {
            by_category.entry(category).or_default();
        }
        by_category
    }

    /// Replace all milestones with the imported rows and recompute the
    /// default quarter's resourcing.
    pub fn import_milestones(&self, rows: Vec<MilestoneRow>, default_quarter: &str) -> MilestonesDoc {
        let count = rows.len();
        let doc = milestones_from_rows(rows, default_quarter);
        self.state().milestones = doc.clone();
        tracing::info!(rows = count, quarters = doc.len(), "imported milestones");

        self.persist_milestones();
        self.recompute_quarter(default_quarter);
        doc
    }

    pub fn add_milestone(
        &self,
        quarter: &str,
        category: Category,
        input: CreateMilestoneInput,
    ) -> DashboardResult<Milestone> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(DashboardError::BadRequest("Milestone title is required".into()));
        }

        let milestone = {
            let mut state = self.state();
            let items = state
                .milestones
                .entry(quarter.to_string())
                .or_default()
                .entry(category)
                .or_default();

            let id = match input.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(id) => id.to_string(),
                None => generate_id(&title),
            };
            if items.iter().any(|m| m.id == id) {
                return Err(DashboardError::BadRequest(format!(
                    "Milestone {} already exists in {} {}",
                    id, quarter, category
                )));
            }

            let milestone = Milestone {
                id,
                title,
                date: input.date,
                people: input.people,
                resourcing: input.resourcing,
                progress: input.progress.clamp(0, 100) as u32,
            };
            items.push(milestone.clone());
            milestone
        };

        self.persist_milestones();
        self.recompute_quarter(quarter);
        Ok(milestone)
    }

    /// Apply a partial update. Changing resourcing recomputes the quarter's
    /// table.
    pub fn update_milestone(
        &self,
        quarter: &str,
        category: Category,
        id: &str,
        input: UpdateMilestoneInput,
    ) -> DashboardResult<Milestone> {
        let resourcing_changed = input.resourcing.is_some();

        let milestone = {
            let mut state = self.state();
            let milestone = state
                .milestones
                .get_mut(quarter)
                .and_then(|q| q.get_mut(&category))
                .and_then(|items| items.iter_mut().find(|m| m.id == id))
                .ok_or_else(|| DashboardError::NotFound(format!("Milestone {}", id)))?;

            if let Some(title) = input.title {
                milestone.title = title;
            }
            if let Some(date) = input.date {
                milestone.date = date;
            }
            if let Some(progress) = input.progress {
                milestone.progress = progress.clamp(0, 100) as u32;
            }
            match input.resourcing {
                Some(ResourcingInput::Raw(raw)) => milestone.resourcing = raw,
                Some(ResourcingInput::PerPerson(percents)) => {
                    let entries: Vec<AllocationEntry> = percents
                        .into_iter()
                        .map(|(person, percent)| {
                            AllocationEntry::new(person, percent.clamp(0, 100) as u32)
                        })
                        .collect();
                    milestone.resourcing = format_allocations(&entries);
                }
                None => {}
            }
            milestone.clone()
        };

        self.persist_milestones();
        if resourcing_changed {
            self.recompute_quarter(quarter);
        }
        Ok(milestone)
    }

    // ============================================================
    // Quarterly resourcing
    // ============================================================

    /// Rebuild a quarter's table from its milestones, store it and return it.
    pub fn recompute_quarter(&self, quarter: &str) -> ResourcingTable {
        let mut state = self.state();
        let table = compute_quarterly_from_milestones(&state.milestones, quarter, &self.roster);
        state.resourcing.insert(quarter.to_string(), table.clone());
        tracing::debug!(quarter, "recomputed quarterly resourcing");

        let value = self.to_document(&state.resourcing);
        self.persist(store::RESOURCING_PATH, store::RESOURCING_KEY, value);
        table
    }

    /// The stored table for a quarter, filled out to every category and
    /// roster member.
    pub fn quarter_resourcing(&self, quarter: &str) -> ResourcingTable {
        let mut table = self
            .state()
            .resourcing
            .get(quarter)
            .cloned()
            .unwrap_or_default();
        table.fill(&self.roster);
        table
    }

    // ============================================================
    // Weekly plans
    // ============================================================

    pub fn weekly_tasks(&self, quarter: &str, week: &str) -> WeekPlan {
        self.state()
            .weekly_plans
            .get(quarter)
            .and_then(|weeks| weeks.get(week))
            .cloned()
            .unwrap_or_default()
    }

    /// Add a task to a week, save the plans and snapshot the week into the
    /// history document.
    pub fn add_weekly_task(
        &self,
        quarter: &str,
        week: &str,
        category: Category,
        input: CreateWeeklyTaskInput,
    ) -> DashboardResult<WeeklyTask> {
        if parse_week_key(week).is_none() {
            return Err(DashboardError::BadRequest(format!("Invalid week key {}", week)));
        }
        let task = input
            .into_task()
            .ok_or_else(|| DashboardError::BadRequest("Task title is required".into()))?;

        let mut state = self.state();
        let week_plan = state
            .weekly_plans
            .entry(quarter.to_string())
            .or_default()
            .entry(week.to_string())
            .or_default();
        week_plan.entry(category).or_default().push(task.clone());
        let week_plan = week_plan.clone();

        let plans = self.to_document(&state.weekly_plans);
        self.persist(store::WEEKLY_PLANS_PATH, store::WEEKLY_PLANS_KEY, plans);
        self.snapshot_week(quarter, week, week_plan);
        Ok(task)
    }

    pub fn weekly_resourcing(&self, quarter: &str, week: &str) -> WeeklyResourcing {
        compute_weekly_resourcing(&self.weekly_tasks(quarter, week), &self.roster)
    }

    fn snapshot_week(&self, quarter: &str, week: &str, data: WeekPlan) {
        let mut history: WeekHistory = self.read_store(store::WEEK_HISTORY_PATH);
        history.insert(
            week.to_string(),
            WeekSnapshot {
                ts: Utc::now().timestamp_millis(),
                quarter: quarter.to_string(),
                data,
            },
        );

        let value = self.to_document(&history);
        if let Err(e) = self.store.set(store::WEEK_HISTORY_PATH, &value, true) {
            tracing::warn!(week, "week snapshot failed: {}", e);
        }
    }

    // ============================================================
    // Daily logs
    // ============================================================

    /// Today's board: every roster member with yesterday's and today's note.
    pub fn daily_board(&self, today: NaiveDate) -> Vec<DailyBox> {
        let today_key = day_key(today);
        let yesterday_key = day_key(previous_day(today));
        let state = self.state();

        let note = |day: &str, person: &str| {
            state
                .daily_logs
                .get(day)
                .and_then(|people| people.get(person))
                .map(|entry| entry.today.clone())
                .unwrap_or_default()
        };

        self.roster
            .people()
            .iter()
            .map(|person| DailyBox {
                person: person.clone(),
                date: today_key.clone(),
                yesterday: note(yesterday_key.as_str(), person.as_str()),
                today: note(today_key.as_str(), person.as_str()),
            })
            .collect()
    }

    pub fn set_daily_update(&self, date: NaiveDate, person: &str, text: &str) -> DashboardResult<DailyEntry> {
        let person = person.trim();
        if person.is_empty() {
            return Err(DashboardError::BadRequest("Person is required".into()));
        }

        let mut state = self.state();
        let entry = state
            .daily_logs
            .entry(day_key(date))
            .or_default()
            .entry(person.to_string())
            .or_default();
        entry.today = text.to_string();
        let entry = entry.clone();

        let logs = self.to_document(&state.daily_logs);
        self.persist(store::DAILY_LOGS_PATH, store::DAILY_LOGS_KEY, logs);
        Ok(entry)
    }

    // ============================================================
    // History
    // ============================================================

    /// Everything recorded for a quarter, read fresh from the store. Documents
    /// the store cannot supply come from the in-memory state.
    pub fn history(&self, quarter: &str) -> QuarterHistory {
        let fresh = |path: &str| match self.store.get(path) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path, "history read failed: {}", e);
                None
            }
        };
        let state = self.snapshot();

        let milestones: MilestonesDoc = fresh(store::MILESTONES_PATH)
            .map(|v| MilestonesDoc::decode(store::MILESTONES_PATH, v))
            .unwrap_or(state.milestones);
        let weekly_plans: WeeklyPlans = fresh(store::WEEKLY_PLANS_PATH)
            .map(|v| WeeklyPlans::decode(store::WEEKLY_PLANS_PATH, v))
            .unwrap_or(state.weekly_plans);
        let resourcing: QuarterlyResourcing = fresh(store::RESOURCING_PATH)
            .map(|v| QuarterlyResourcing::decode(store::RESOURCING_PATH, v))
            .unwrap_or(state.resourcing);
        let daily_logs: DailyLogs = fresh(store::DAILY_LOGS_PATH)
            .map(|v| DailyLogs::decode(store::DAILY_LOGS_PATH, v))
            .unwrap_or(state.daily_logs);

        QuarterHistory {
            quarter: quarter.to_string(),
            milestones: milestones.get(quarter).cloned().unwrap_or_default(),
            weekly_plans: weekly_plans.get(quarter).cloned().unwrap_or_default(),
            resourcing: resourcing.get(quarter).cloned(),
            daily_logs,
        }
    }

    /// Week snapshots taken so far.
    pub fn week_history(&self) -> WeekHistory {
        self.read_store(store::WEEK_HISTORY_PATH)
    }

    // ============================================================
    // Storage plumbing
    // ============================================================

    fn state(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist_milestones(&self) {
        let state = self.state();
        let value = self.to_document(&state.milestones);
        self.persist(store::MILESTONES_PATH, store::MILESTONES_KEY, value);
    }

    /// Write through to the cache, then the store. Store failures are logged
    /// only. Callers hold the state lock.
    fn persist(&self, path: &str, key: &str, value: Value) {
        self.cache.set(key, &value);
        if let Err(e) = self.store.set(path, &value, true) {
            tracing::error!(path, "store write failed, keeping local state: {}", e);
        }
    }

    fn hydrate<T: StoredDocument>(&self, path: &str, key: &str) -> T {
        let cached: T = self
            .cache
            .get(key)
            .map(|v| T::decode(key, v))
            .unwrap_or_default();

        match self.store.get(path) {
            Ok(Some(value)) if !is_empty_document(&value) => {
                self.cache.set(key, &value);
                T::decode(path, value)
            }
            Ok(_) => cached,
            Err(e) => {
                tracing::warn!(path, "store read failed, using cached state: {}", e);
                cached
            }
        }
    }

    fn read_store<T: StoredDocument>(&self, path: &str) -> T {
        match self.store.get(path) {
            Ok(Some(value)) => T::decode(path, value),
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(path, "store read failed: {}", e);
                T::default()
            }
        }
    }

    fn to_document<T: Serialize>(&self, value: &T) -> Value {
        serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::error!("failed to encode document: {}", e);
            Value::Object(Default::default())
        })
    }
}

fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
