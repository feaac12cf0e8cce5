// --------------------------------------------------
// Handles API endpoints for generated study tasks.
//
// Responsibilities:
// - List tasks for a date (defaults to today)
// - Toggle task status (pending <-> completed)
// - Recompute the analytics summary after a toggle
// -------------------------------------------------

use axum::{
    Json,
    extract::{Path, Query},
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics;
use crate::error::PlanError;
use crate::models::{Db, StudyTask, TaskStatus};
use crate::store;

fn now_fixed_offset() -> DateTime<FixedOffset> {
    let local = chrono::Local::now();
    let offset_seconds = local.offset().local_minus_utc();
    let fixed = FixedOffset::east_opt(offset_seconds).unwrap();
    local.with_timezone(&fixed)
}

#[derive(Debug, Deserialize)]
pub struct TasksQuery {
    pub date: Option<String>, // "YYYY-MM-DD", defaults to today
}

#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub date: String,
    pub tasks: Vec<StudyTask>,
}

// -----------------------------
// GET /api/tasks?date=YYYY-MM-DD
// Returns the planned tasks for one date
// -----------------------------
pub async fn get_tasks(Query(q): Query<TasksQuery>) -> Result<Json<TasksResponse>, PlanError> {
    let date = match &q.date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| PlanError::invalid("date", format!("not a YYYY-MM-DD date: {raw}")))?,
        None => now_fixed_offset().date_naive(),
    };

    let db: Db = store::load_db()?;

    let tasks: Vec<StudyTask> = db.tasks.into_iter().filter(|t| t.date == date).collect();

    Ok(Json(TasksResponse {
        date: date.to_string(),
        tasks,
    }))
}

// -----------------------------
// POST /api/tasks/:id/toggle
// Toggles task status between Pending and Completed
// -----------------------------
pub async fn toggle_task(Path(id): Path<Uuid>) -> Result<Json<StudyTask>, PlanError> {
    let mut db: Db = store::load_db()?;

    let Some(t) = db.tasks.iter_mut().find(|t| t.id == id) else {
        return Err(PlanError::NotFound { entity: "task" });
    };

    t.status = match t.status {
        TaskStatus::Pending => TaskStatus::Completed,
        TaskStatus::Completed => TaskStatus::Pending,
    };

    let updated = t.clone();

    db.analytics =
        analytics::summarize(&db.subjects, &db.tasks, now_fixed_offset().date_naive());
    store::save_db(&db)?;

    Ok(Json(updated))
}
