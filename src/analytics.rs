/*
Analytics aggregation over the subject and task collections.
Not reactive: every mutation point (subject CRUD, task toggle,
plan generation) recomputes the summary before saving.
*/

use chrono::NaiveDate;

use crate::models::{
    AnalyticsSummary, AtRiskSubject, StudyTask, Subject, SubjectCompletion, TaskStatus,
};

// Completion percentage, 0 when there are no tasks at all
fn percentage(completed: i64, total: i64) -> i64 {
    if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as i64
    }
}

/// Recompute the full summary from the current collections.
///
/// At-risk = exam within 14 days and completion under 50%,
/// sorted by days left ascending.
pub fn summarize(subjects: &[Subject], tasks: &[StudyTask], today: NaiveDate) -> AnalyticsSummary {
    let total_tasks = tasks.len() as i64;
    let completed_tasks = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count() as i64;

    let completion_per_subject: Vec<SubjectCompletion> = subjects
        .iter()
        .map(|subject| {
            let total = tasks.iter().filter(|t| t.subject_id == subject.id).count() as i64;
            let completed = tasks
                .iter()
                .filter(|t| t.subject_id == subject.id && t.status == TaskStatus::Completed)
                .count() as i64;
            SubjectCompletion {
                subject_id: subject.id,
                subject_name: subject.name.clone(),
                total,
                completed,
                percentage: percentage(completed, total),
            }
        })
        .collect();

    let mut at_risk_subjects: Vec<AtRiskSubject> = subjects
        .iter()
        .map(|subject| {
            let completion = completion_per_subject
                .iter()
                .find(|c| c.subject_id == subject.id)
                .map(|c| c.percentage)
                .unwrap_or(0);
            AtRiskSubject {
                subject_id: subject.id,
                subject_name: subject.name.clone(),
                exam_date: subject.exam_date,
                days_left: (subject.exam_date - today).num_days(),
                completion_percentage: completion,
            }
        })
        .filter(|s| s.days_left <= 14 && s.completion_percentage < 50)
        .collect();

    at_risk_subjects.sort_by_key(|s| s.days_left);

    AnalyticsSummary {
        total_tasks,
        completed_tasks,
        completion_per_subject,
        at_risk_subjects,
    }
}
