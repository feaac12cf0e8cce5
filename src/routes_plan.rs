// --------------------------------------------------
// Handles API endpoints for plan generation.
//
// Responsibilities:
// - POST /api/plan/generate: full day-by-day hour plan; the new
//   tasks replace the old set and analytics are recomputed, saved
//   as one atomic update
// - GET /api/plan/today: topic-count sessions for today, computed
//   on the fly and never persisted
// -------------------------------------------------

use axum::Json;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analytics;
use crate::error::PlanError;
use crate::logic;
use crate::models::{Db, StudyTask, TopicTask};
use crate::store;

fn now_fixed_offset() -> DateTime<FixedOffset> {
    let local = chrono::Local::now();
    let offset_seconds = local.offset().local_minus_utc();
    let fixed = FixedOffset::east_opt(offset_seconds).unwrap();
    local.with_timezone(&fixed)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanInput {
    pub available_hours_per_day: f64,
    pub start_date: String, // "YYYY-MM-DD"
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanResponse {
    pub start_date: String,
    pub total_tasks: usize,
    pub tasks: Vec<StudyTask>,
}

// -----------------------------
// POST /api/plan/generate
// Replaces the whole task set with a freshly generated plan
// -----------------------------
pub async fn generate_plan(
    Json(input): Json<GeneratePlanInput>,
) -> Result<Json<GeneratePlanResponse>, PlanError> {
    let start = NaiveDate::parse_from_str(&input.start_date, "%Y-%m-%d").map_err(|_| {
        PlanError::invalid(
            "startDate",
            format!("not a YYYY-MM-DD date: {}", input.start_date),
        )
    })?;

    let now = now_fixed_offset();
    let mut db: Db = store::load_db()?;

    let mut next_id = Uuid::new_v4;
    let tasks = logic::generate_plan(
        &db.subjects,
        input.available_hours_per_day,
        start,
        now,
        &mut next_id,
    )?;

    info!(
        subjects = db.subjects.len(),
        tasks = tasks.len(),
        start = %start,
        "generated study plan"
    );

    // full replacement, then recompute, then one atomic save
    db.tasks = tasks;
    db.analytics = analytics::summarize(&db.subjects, &db.tasks, now.date_naive());
    store::save_db(&db)?;

    Ok(Json(GeneratePlanResponse {
        start_date: input.start_date,
        total_tasks: db.tasks.len(),
        tasks: db.tasks,
    }))
}

#[derive(Debug, Serialize)]
pub struct TodayPlanResponse {
    pub date: String,
    pub tasks: Vec<TopicTask>,
}

// -----------------------------
// GET /api/plan/today
// Topic sessions for today, sized from remaining syllabus
// -----------------------------
pub async fn get_today_plan() -> Result<Json<TodayPlanResponse>, PlanError> {
    let today = now_fixed_offset().date_naive();
    let db: Db = store::load_db()?;

    let mut next_id = Uuid::new_v4;
    let tasks = logic::generate_today_tasks(&db.subjects, today, &mut next_id);

    Ok(Json(TodayPlanResponse {
        date: today.to_string(),
        tasks,
    }))
}
