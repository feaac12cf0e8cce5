// --------------------------------------------------
// Handles API endpoints for subject CRUD.
//
// Responsibilities:
// - Create / read / update / delete subjects
// - Cascade-delete a subject's tasks on delete
// - Recompute the analytics summary at every mutation
// -------------------------------------------------

use axum::{Json, extract::Path};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Deserialize;
use uuid::Uuid;

use crate::analytics;
use crate::error::PlanError;
use crate::models::{Db, Difficulty, Subject};
use crate::store;

fn now_fixed_offset() -> DateTime<FixedOffset> {
    let local = chrono::Local::now();
    let offset_seconds = local.offset().local_minus_utc();
    let fixed = FixedOffset::east_opt(offset_seconds).unwrap();
    local.with_timezone(&fixed)
}

// -----------------------------
// GET /api/subjects
// Returns all subjects stored in db.json
// -----------------------------
pub async fn get_subjects() -> Result<Json<Vec<Subject>>, PlanError> {
    let db = store::load_db()?;
    Ok(Json(db.subjects))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectInput {
    pub name: String,
    pub exam_date: String, // "YYYY-MM-DD"
    pub difficulty: Difficulty,
    #[serde(alias = "syllabusSize")]
    pub total_topics: i64,
    #[serde(default)]
    pub weak_areas: Vec<String>,
    pub color: Option<String>,
}

fn parse_exam_date(raw: &str) -> Result<NaiveDate, PlanError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| PlanError::invalid("examDate", format!("not a YYYY-MM-DD date: {raw}")))
}

// Topic counts feed straight into session titles and per-day sizing,
// so completed must stay within 0..=total
fn validate_topic_counts(total_topics: i64, completed_topics: i64) -> Result<(), PlanError> {
    if total_topics < 0 {
        return Err(PlanError::invalid("totalTopics", "must not be negative"));
    }
    if completed_topics < 0 {
        return Err(PlanError::invalid("completedTopics", "must not be negative"));
    }
    if completed_topics > total_topics {
        return Err(PlanError::invalid(
            "completedTopics",
            format!("must not exceed totalTopics ({total_topics})"),
        ));
    }
    Ok(())
}

// -----------------------------
// POST /api/subjects
// Creates a new subject and saves it to db.json
// -----------------------------
pub async fn create_subject(
    Json(input): Json<CreateSubjectInput>,
) -> Result<Json<Subject>, PlanError> {
    if input.name.trim().is_empty() {
        return Err(PlanError::invalid("name", "must not be empty"));
    }
    validate_topic_counts(input.total_topics, 0)?;
    let exam_date = parse_exam_date(&input.exam_date)?;

    let now = now_fixed_offset();
    let mut db: Db = store::load_db()?;

    let subject = Subject {
        id: Uuid::new_v4(),
        name: input.name,
        exam_date,
        difficulty: input.difficulty,
        total_topics: input.total_topics,
        completed_topics: 0,
        weak_areas: input.weak_areas,
        color: input.color,
        created_at: now,
    };

    db.subjects.push(subject.clone());
    db.analytics = analytics::summarize(&db.subjects, &db.tasks, now.date_naive());
    store::save_db(&db)?;

    Ok(Json(subject))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectInput {
    pub name: String,
    pub exam_date: String, // "YYYY-MM-DD"
    pub difficulty: Difficulty,
    #[serde(alias = "syllabusSize")]
    pub total_topics: i64,
    pub completed_topics: i64,
    #[serde(default)]
    pub weak_areas: Vec<String>,
    pub color: Option<String>,
}

// -----------------------------
// PUT /api/subjects/:id
// Updates an existing subject by ID
// ----------------------------
pub async fn update_subject(
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSubjectInput>,
) -> Result<Json<Subject>, PlanError> {
    if input.name.trim().is_empty() {
        return Err(PlanError::invalid("name", "must not be empty"));
    }
    validate_topic_counts(input.total_topics, input.completed_topics)?;
    let exam_date = parse_exam_date(&input.exam_date)?;

    let mut db: Db = store::load_db()?;

    let Some(s) = db.subjects.iter_mut().find(|s| s.id == id) else {
        return Err(PlanError::NotFound { entity: "subject" });
    };

    s.name = input.name;
    s.exam_date = exam_date;
    s.difficulty = input.difficulty;
    s.total_topics = input.total_topics;
    s.completed_topics = input.completed_topics;
    s.weak_areas = input.weak_areas;
    s.color = input.color;

    let updated = s.clone();

    db.analytics =
        analytics::summarize(&db.subjects, &db.tasks, now_fixed_offset().date_naive());
    store::save_db(&db)?;

    Ok(Json(updated))
}

// -----------------------------
// DELETE /api/subjects/:id
// Removes a subject and all of its tasks
// -----------------------------
pub async fn delete_subject(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, PlanError> {
    let mut db: Db = store::load_db()?;

    let before = db.subjects.len();
    db.subjects.retain(|s| s.id != id);

    if db.subjects.len() == before {
        return Err(PlanError::NotFound { entity: "subject" });
    }

    // tasks must not outlive their subject
    db.tasks.retain(|t| t.subject_id != id);

    db.analytics =
        analytics::summarize(&db.subjects, &db.tasks, now_fixed_offset().date_naive());
    store::save_db(&db)?;

    Ok(Json(serde_json::json!({ "ok": true })))
}
