use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    // Weight used by the plan priority score
    pub fn weight(self) -> i64 {
        match self {
            Difficulty::Hard => 3,
            Difficulty::Medium => 2,
            Difficulty::Easy => 1,
        }
    }

    // Base study hours per day for the hour allocator
    pub fn base_hours(self) -> f64 {
        match self {
            Difficulty::Hard => 2.0,
            Difficulty::Medium => 1.5,
            Difficulty::Easy => 1.0,
        }
    }

    // Session length in minutes for the topic-count generator
    pub fn session_minutes(self) -> i64 {
        match self {
            Difficulty::Hard => 45,
            Difficulty::Medium => 30,
            Difficulty::Easy => 20,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

// Urgency class of a topic session, sorted by rank() ascending
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    Medium,
    Low,
}

impl Priority {
    pub fn rank(self) -> i64 {
        match self {
            Priority::Urgent => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub exam_date: NaiveDate, // "YYYY-MM-DD", day granularity only
    pub difficulty: Difficulty,
    #[serde(alias = "syllabusSize")]
    pub total_topics: i64,
    #[serde(default)]
    pub completed_topics: i64,
    #[serde(default)]
    pub weak_areas: Vec<String>,
    pub color: Option<String>, // presentation only
    pub created_at: DateTime<FixedOffset>,
}

// One planned study block for one subject on one date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTask {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub date: NaiveDate,
    pub planned_hours: f64,
    pub status: TaskStatus,
    pub created_at: DateTime<FixedOffset>,
}

// One study session for "today", sized in topics rather than hours.
// Recomputed per request, never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicTask {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub title: String,
    #[serde(rename = "duration")]
    pub duration_min: i64, // minutes
    pub priority: Priority,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectCompletion {
    pub subject_id: Uuid,
    pub subject_name: String,
    pub total: i64,
    pub completed: i64,
    pub percentage: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtRiskSubject {
    pub subject_id: Uuid,
    pub subject_name: String,
    pub exam_date: NaiveDate,
    pub days_left: i64,
    pub completion_percentage: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub completion_per_subject: Vec<SubjectCompletion>,
    pub at_risk_subjects: Vec<AtRiskSubject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Db {
    pub subjects: Vec<Subject>,
    pub tasks: Vec<StudyTask>,
    pub analytics: AnalyticsSummary,
}
