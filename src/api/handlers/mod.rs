use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::dashboard::DashboardError;
use crate::models::*;
use crate::resourcing::{parse_day, parse_week_key, quarter_code, week_key, week_start};

type ApiError = (StatusCode, String);

// ============================================================
// Error Handling
// ============================================================

/// Map a dashboard error to a response. These are all validation errors, so
/// their message is safe to show to the client.
fn dashboard_error(e: DashboardError) -> ApiError {
    tracing::warn!("Validation error: {}", e);
    match e {
        DashboardError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        DashboardError::BadRequest(_) => (StatusCode::BAD_REQUEST, e.to_string()),
    }
}

fn parse_category(s: &str) -> Result<Category, ApiError> {
    Category::from_str(s).ok_or((StatusCode::BAD_REQUEST, format!("Unknown category: {}", s)))
}

fn check_week(week: &str) -> Result<(), ApiError> {
    parse_week_key(week)
        .map(|_| ())
        .ok_or((StatusCode::BAD_REQUEST, format!("Invalid week key: {}", week)))
}

fn parse_date(date: Option<&str>) -> Result<NaiveDate, ApiError> {
    match date {
        Some(s) => parse_day(s).ok_or((StatusCode::BAD_REQUEST, format!("Invalid date: {}", s))),
        None => Ok(Local::now().date_naive()),
    }
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// `YYYY-MM-DD`; today when omitted.
    pub date: Option<String>,
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Calendar
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct WeekInfo {
    pub week: String,
    /// Monday of the week.
    pub start: NaiveDate,
    pub quarter: String,
}

pub async fn current_week(Query(query): Query<DateQuery>) -> Result<Json<WeekInfo>, ApiError> {
    let date = parse_date(query.date.as_deref())?;
    let week = week_key(date);
    let start = week_start(&week).unwrap_or(date);
    Ok(Json(WeekInfo {
        week,
        start,
        quarter: quarter_code(date),
    }))
}

// ============================================================
// Milestones
// ============================================================

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    /// Quarter for rows without one; the current quarter when omitted.
    pub quarter: Option<String>,
}

pub async fn import_milestones(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    Json(rows): Json<Vec<MilestoneRow>>,
) -> Json<MilestonesDoc> {
    let quarter = query
        .quarter
        .unwrap_or_else(|| state.config.current_quarter(Local::now().date_naive()));
    Json(state.dashboard.import_milestones(rows, &quarter))
}

pub async fn list_milestones(
    State(state): State<AppState>,
    Path(quarter): Path<String>,
) -> Json<QuarterMilestones> {
    Json(state.dashboard.milestones(&quarter))
}

pub async fn create_milestone(
    State(state): State<AppState>,
    Path((quarter, category)): Path<(String, String)>,
    Json(input): Json<CreateMilestoneInput>,
) -> Result<(StatusCode, Json<Milestone>), ApiError> {
    let category = parse_category(&category)?;
    state
        .dashboard
        .add_milestone(&quarter, category, input)
        .map(|m| (StatusCode::CREATED, Json(m)))
        .map_err(dashboard_error)
}

pub async fn update_milestone(
    State(state): State<AppState>,
    Path((quarter, category, id)): Path<(String, String, String)>,
    Json(input): Json<UpdateMilestoneInput>,
) -> Result<Json<Milestone>, ApiError> {
    let category = parse_category(&category)?;
    state
        .dashboard
        .update_milestone(&quarter, category, &id, input)
        .map(Json)
        .map_err(dashboard_error)
}

// ============================================================
// Quarterly resourcing
// ============================================================

pub async fn get_quarter_resourcing(
    State(state): State<AppState>,
    Path(quarter): Path<String>,
) -> Json<ResourcingTable> {
    Json(state.dashboard.quarter_resourcing(&quarter))
}

pub async fn recompute_quarter_resourcing(
    State(state): State<AppState>,
    Path(quarter): Path<String>,
) -> Json<ResourcingTable> {
    Json(state.dashboard.recompute_quarter(&quarter))
}

// ============================================================
// Weekly plans
// ============================================================

pub async fn list_weekly_tasks(
    State(state): State<AppState>,
    Path((quarter, week)): Path<(String, String)>,
) -> Result<Json<WeekPlan>, ApiError> {
    check_week(&week)?;
    Ok(Json(state.dashboard.weekly_tasks(&quarter, &week)))
}

pub async fn create_weekly_task(
    State(state): State<AppState>,
    Path((quarter, week, category)): Path<(String, String, String)>,
    Json(input): Json<CreateWeeklyTaskInput>,
) -> Result<(StatusCode, Json<WeeklyTask>), ApiError> {
    let category = parse_category(&category)?;
    state
        .dashboard
        .add_weekly_task(&quarter, &week, category, input)
        .map(|t| (StatusCode::CREATED, Json(t)))
        .map_err(dashboard_error)
}

pub async fn get_weekly_resourcing(
    State(state): State<AppState>,
    Path((quarter, week)): Path<(String, String)>,
) -> Result<Json<WeeklyResourcingView>, ApiError> {
    check_week(&week)?;
    let allocations = state.dashboard.weekly_resourcing(&quarter, &week);
    let over_allocated = allocations.over_allocated();
    Ok(Json(WeeklyResourcingView {
        quarter,
        week,
        allocations,
        over_allocated,
    }))
}

// ============================================================
// Daily logs
// ============================================================

pub async fn get_daily_board(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<DailyBox>>, ApiError> {
    let today = parse_date(query.date.as_deref())?;
    Ok(Json(state.dashboard.daily_board(today)))
}

pub async fn set_daily_update(
    State(state): State<AppState>,
    Path((date, person)): Path<(String, String)>,
    Json(input): Json<DailyUpdateInput>,
) -> Result<Json<DailyEntry>, ApiError> {
    let date = parse_date(Some(&date))?;
    state
        .dashboard
        .set_daily_update(date, &person, &input.today)
        .map(Json)
        .map_err(dashboard_error)
}

// ============================================================
// History
// ============================================================

pub async fn get_quarter_history(
    State(state): State<AppState>,
    Path(quarter): Path<String>,
) -> Json<QuarterHistory> {
    Json(state.dashboard.history(&quarter))
}

pub async fn get_week_history(State(state): State<AppState>) -> Json<WeekHistory> {
    Json(state.dashboard.week_history())
}
