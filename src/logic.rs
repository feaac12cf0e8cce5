/*
Plan generation and scoring logic.
Module is independently written from HTTP / Axum for testing.
Ids come from an injected generator so tests stay deterministic.
*/

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

use crate::error::PlanError;
use crate::models::{Difficulty, Priority, StudyTask, Subject, TaskStatus, TopicTask};

// Subject paired with its urgency score for one generation call
//     not exposed through API directly
#[derive(Debug, Clone)]
pub struct RankedSubject {
    pub subject: Subject,
    pub score: i64,
}

// Priority score relative to the plan start date.
//
// score = difficulty_weight * 2 + (30 - days_left) + weak_area_count * 2
//
// days_left may be negative when the exam has already passed;
// such subjects score high but are skipped day by day in the
// allocation pass.
pub fn priority_score(subject: &Subject, start: NaiveDate) -> i64 {
    let days_left = (subject.exam_date - start).num_days();
    subject.difficulty.weight() * 2 + (30 - days_left) + subject.weak_areas.len() as i64 * 2
}

// Score all subjects and sort them by urgency.
//
// Sorting rules:
// 1) Higher score first
// 2) If tied, original order preserved (stable sort)
pub fn rank_subjects(subjects: &[Subject], start: NaiveDate) -> Vec<RankedSubject> {
    let mut ranked: Vec<RankedSubject> = subjects
        .iter()
        .map(|s| RankedSubject {
            score: priority_score(s, start),
            subject: s.clone(),
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

// Round to 1 decimal place, halves away from zero.
fn round_tenths(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

// Hours scale up as the exam approaches: <=3 days out 1.5x,
// <=7 days out 1.2x, otherwise unscaled.
fn urgency_multiplier(days_until_exam: i64) -> f64 {
    if days_until_exam <= 3 {
        1.5
    } else if days_until_exam <= 7 {
        1.2
    } else {
        1.0
    }
}

/// Build a day-by-day study plan from the start date through the
/// latest exam date (inclusive).
///
/// Process:
/// - Rank subjects once relative to the start date
/// - Each day resets the hour budget and walks subjects in ranked order
/// - A subject whose exam has passed by that day is skipped
/// - Planned hours = base hours by difficulty, scaled by urgency,
///   capped by whatever budget is left that day
///
/// The returned tasks fully replace any prior plan; callers perform
/// the swap and the analytics recompute as one atomic update.
pub fn generate_plan(
    subjects: &[Subject],
    available_hours_per_day: f64,
    start: NaiveDate,
    now: DateTime<FixedOffset>,
    next_id: &mut dyn FnMut() -> uuid::Uuid,
) -> Result<Vec<StudyTask>, PlanError> {
    if !available_hours_per_day.is_finite() || available_hours_per_day <= 0.0 {
        return Err(PlanError::invalid(
            "availableHoursPerDay",
            "must be a positive number",
        ));
    }
    // No subjects means no horizon to plan over
    if subjects.is_empty() {
        return Err(PlanError::NoSubjects);
    }

    let ranked = rank_subjects(subjects, start);

    // last_exam clamped so the horizon never ends before it starts
    let last_exam = subjects
        .iter()
        .map(|s| s.exam_date)
        .max()
        .unwrap_or(start)
        .max(start);

    let total_days = (last_exam - start).num_days() + 1;

    let mut tasks: Vec<StudyTask> = Vec::new();

    for day in 0..total_days {
        let current_date = start + Duration::days(day);
        let mut remaining_hours = available_hours_per_day;

        for entry in &ranked {
            let subject = &entry.subject;

            // Exam day itself is still studied; only strictly-later days skip
            if current_date > subject.exam_date {
                continue;
            }

            let days_until_exam = (subject.exam_date - current_date).num_days();
            let base_hours = subject.difficulty.base_hours();
            let planned_hours = round_tenths(base_hours * urgency_multiplier(days_until_exam))
                .min(remaining_hours);

            if planned_hours > 0.0 && remaining_hours > 0.0 {
                tasks.push(StudyTask {
                    id: next_id(),
                    subject_id: subject.id,
                    date: current_date,
                    planned_hours,
                    status: TaskStatus::Pending,
                    created_at: now,
                });
                remaining_hours -= planned_hours;
            }
            // otherwise the subject simply gets nothing today
        }
    }

    Ok(tasks)
}

// Priority class by days to exam, with a one-level escalation for
// hard subjects that are not already urgent.
pub fn topic_priority(days_until_exam: i64, difficulty: Difficulty) -> Priority {
    let mut priority = if days_until_exam <= 7 {
        Priority::Urgent
    } else if days_until_exam <= 14 {
        Priority::Medium
    } else {
        Priority::Low
    };

    if difficulty == Difficulty::Hard && priority != Priority::Urgent {
        priority = match priority {
            Priority::Low => Priority::Medium,
            _ => Priority::Urgent,
        };
    }

    priority
}

/// Generate today's topic sessions for every subject.
///
/// Sessions are sized in topics rather than hours: remaining topics
/// spread over the days left (divisor floored at 1 so an exam due
/// today or overdue still yields work), capped at 2 sessions per
/// subject per day. Output is sorted urgent-first, stable within a
/// priority class.
pub fn generate_today_tasks(
    subjects: &[Subject],
    today: NaiveDate,
    next_id: &mut dyn FnMut() -> uuid::Uuid,
) -> Vec<TopicTask> {
    let mut tasks: Vec<TopicTask> = Vec::new();

    for subject in subjects {
        let days_until_exam = (subject.exam_date - today).num_days();
        let remaining_topics = subject.total_topics - subject.completed_topics;
        let priority = topic_priority(days_until_exam, subject.difficulty);

        let divisor = days_until_exam.max(1);
        let topics_per_day = div_ceil(remaining_topics, divisor).max(1);

        for i in 0..topics_per_day.min(2) {
            tasks.push(TopicTask {
                id: next_id(),
                subject_id: subject.id,
                title: format!(
                    "{} - Topic {}",
                    subject.name,
                    subject.completed_topics + i + 1
                ),
                duration_min: subject.difficulty.session_minutes(),
                priority,
                completed: false,
            });
        }
    }

    // sort: urgent first, tie -> original subject order (stable)
    tasks.sort_by_key(|t| t.priority.rank());
    tasks
}

// Ceiling division for possibly non-positive numerators
// (standard / truncates toward zero)
fn div_ceil(n: i64, d: i64) -> i64 {
    if n <= 0 { 0 } else { (n + d - 1) / d }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed_now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-03-01T08:00:00+00:00").unwrap()
    }

    fn subject(name: &str, exam: NaiveDate, difficulty: Difficulty) -> Subject {
        Subject {
            id: Uuid::new_v4(),
            name: name.to_string(),
            exam_date: exam,
            difficulty,
            total_topics: 10,
            completed_topics: 0,
            weak_areas: Vec::new(),
            color: None,
            created_at: fixed_now(),
        }
    }

    // Sequential ids so two runs over the same input can be compared
    fn seq_ids() -> impl FnMut() -> Uuid {
        let mut n: u128 = 0;
        move || {
            n += 1;
            Uuid::from_u128(n)
        }
    }

    #[test]
    fn score_combines_difficulty_days_and_weak_areas() {
        let start = date(2026, 3, 1);
        let mut s = subject("Maths", date(2026, 3, 11), Difficulty::Hard);
        // 3*2 + (30 - 10) + 0 = 26
        assert_eq!(priority_score(&s, start), 26);

        s.weak_areas = vec!["integration".into(), "proofs".into()];
        assert_eq!(priority_score(&s, start), 30);
    }

    #[test]
    fn passed_exam_scores_high_but_allocates_nothing() {
        let start = date(2026, 3, 10);
        let s = subject("Latin", date(2026, 3, 5), Difficulty::Easy);
        // days_left = -5 so the (30 - days_left) term grows
        assert_eq!(priority_score(&s, start), 1 * 2 + 35);

        let plan = generate_plan(&[s], 4.0, start, fixed_now(), &mut seq_ids()).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let start = date(2026, 3, 1);
        let a = subject("A", date(2026, 3, 10), Difficulty::Medium);
        let b = subject("B", date(2026, 3, 10), Difficulty::Medium);
        let ranked = rank_subjects(&[a.clone(), b.clone()], start);
        assert_eq!(ranked[0].subject.id, a.id);
        assert_eq!(ranked[1].subject.id, b.id);
    }

    #[test]
    fn rejects_non_positive_budget() {
        let s = subject("Maths", date(2026, 3, 10), Difficulty::Hard);
        let start = date(2026, 3, 1);
        for bad in [0.0, -2.5, f64::NAN] {
            let err = generate_plan(&[s.clone()], bad, start, fixed_now(), &mut seq_ids())
                .unwrap_err();
            assert!(matches!(err, PlanError::InvalidInput { field, .. }
                if field == "availableHoursPerDay"));
        }
    }

    #[test]
    fn rejects_empty_subject_list() {
        let err = generate_plan(&[], 4.0, date(2026, 3, 1), fixed_now(), &mut seq_ids())
            .unwrap_err();
        assert!(matches!(err, PlanError::NoSubjects));
    }

    #[test]
    fn budget_is_never_exceeded_on_any_day() {
        let start = date(2026, 3, 1);
        let subjects = vec![
            subject("Maths", date(2026, 3, 9), Difficulty::Hard),
            subject("Physics", date(2026, 3, 13), Difficulty::Medium),
            subject("History", date(2026, 3, 20), Difficulty::Easy),
        ];
        let budget = 3.0;
        let plan = generate_plan(&subjects, budget, start, fixed_now(), &mut seq_ids()).unwrap();

        let mut per_day: HashMap<NaiveDate, f64> = HashMap::new();
        for t in &plan {
            *per_day.entry(t.date).or_insert(0.0) += t.planned_hours;
        }
        for (day, sum) in per_day {
            assert!(sum <= budget + 1e-9, "{day} over budget: {sum}");
        }
    }

    #[test]
    fn horizon_spans_start_through_last_exam() {
        let start = date(2026, 3, 1);
        let subjects = vec![
            subject("Maths", date(2026, 3, 4), Difficulty::Hard),
            subject("Physics", date(2026, 3, 7), Difficulty::Easy),
        ];
        let plan = generate_plan(&subjects, 8.0, start, fixed_now(), &mut seq_ids()).unwrap();

        let dates: Vec<NaiveDate> = plan.iter().map(|t| t.date).collect();
        assert!(dates.iter().all(|d| *d >= start && *d <= date(2026, 3, 7)));
        // generous budget, so every day in the horizon gets at least one task
        for off in 0..=6 {
            assert!(dates.contains(&(start + Duration::days(off))));
        }
    }

    #[test]
    fn no_task_after_a_subjects_exam_date() {
        let start = date(2026, 3, 1);
        let maths = subject("Maths", date(2026, 3, 3), Difficulty::Hard);
        let physics = subject("Physics", date(2026, 3, 8), Difficulty::Easy);
        let maths_id = maths.id;
        let plan =
            generate_plan(&[maths, physics], 8.0, start, fixed_now(), &mut seq_ids()).unwrap();

        for t in plan.iter().filter(|t| t.subject_id == maths_id) {
            assert!(t.date <= date(2026, 3, 3));
        }
        // exam day itself is still included
        assert!(plan
            .iter()
            .any(|t| t.subject_id == maths_id && t.date == date(2026, 3, 3)));
    }

    #[test]
    fn identical_inputs_give_identical_plans() {
        let start = date(2026, 3, 1);
        let subjects = vec![
            subject("Maths", date(2026, 3, 9), Difficulty::Hard),
            subject("Physics", date(2026, 3, 13), Difficulty::Medium),
        ];
        let a = generate_plan(&subjects, 4.0, start, fixed_now(), &mut seq_ids()).unwrap();
        let b = generate_plan(&subjects, 4.0, start, fixed_now(), &mut seq_ids()).unwrap();

        let key = |p: &[StudyTask]| -> Vec<(Uuid, NaiveDate, f64)> {
            p.iter().map(|t| (t.subject_id, t.date, t.planned_hours)).collect()
        };
        assert_eq!(key(&a), key(&b));
    }

    #[test]
    fn hard_subject_close_to_exam_gets_three_hours() {
        let start = date(2026, 3, 1);
        let s = subject("Maths", date(2026, 3, 3), Difficulty::Hard);
        let plan = generate_plan(&[s], 5.0, start, fixed_now(), &mut seq_ids()).unwrap();
        // days_until_exam = 2 on day 0, so 2.0 * 1.5 = 3.0
        assert_eq!(plan[0].planned_hours, 3.0);
    }

    // Worked example: hard exam in 8 days, medium in 12, budget 4h.
    // Day 0: 8 days out is past the 7-day band, so hard gets an
    // unscaled 2.0, medium gets 1.5, 0.5h left unused.
    #[test]
    fn first_day_of_reference_scenario() {
        let start = date(2026, 3, 1);
        let hard = subject("Maths", date(2026, 3, 9), Difficulty::Hard);
        let medium = subject("Physics", date(2026, 3, 13), Difficulty::Medium);
        let (hard_id, medium_id) = (hard.id, medium.id);

        let plan =
            generate_plan(&[medium, hard], 4.0, start, fixed_now(), &mut seq_ids()).unwrap();
        let day0: Vec<&StudyTask> = plan.iter().filter(|t| t.date == start).collect();

        assert_eq!(day0.len(), 2);
        // hard outranks medium despite input order
        assert_eq!(day0[0].subject_id, hard_id);
        assert_eq!(day0[0].planned_hours, 2.0);
        assert_eq!(day0[1].subject_id, medium_id);
        assert_eq!(day0[1].planned_hours, 1.5);
    }

    #[test]
    fn eight_days_out_is_outside_the_seven_day_band() {
        let start = date(2026, 3, 1);
        let s = subject("Maths", date(2026, 3, 9), Difficulty::Hard);
        let plan = generate_plan(&[s], 5.0, start, fixed_now(), &mut seq_ids()).unwrap();

        // day 0: 8 days until exam, unscaled base hours
        assert_eq!(plan[0].date, start);
        assert_eq!(plan[0].planned_hours, 2.0);
        // day 1: 7 days until exam, the 1.2x band starts
        assert_eq!(plan[1].date, date(2026, 3, 2));
        assert_eq!(plan[1].planned_hours, 2.4);
    }

    #[test]
    fn low_budget_caps_the_first_subject_and_starves_the_rest() {
        let start = date(2026, 3, 1);
        let subjects = vec![
            subject("Maths", date(2026, 3, 9), Difficulty::Hard),
            subject("Physics", date(2026, 3, 13), Difficulty::Medium),
        ];
        let plan = generate_plan(&subjects, 1.0, start, fixed_now(), &mut seq_ids()).unwrap();
        let day0: Vec<&StudyTask> = plan.iter().filter(|t| t.date == start).collect();

        assert_eq!(day0.len(), 1);
        assert_eq!(day0[0].planned_hours, 1.0);
    }

    #[test]
    fn hard_subject_escalates_from_medium_to_urgent() {
        // 10 days out lands in the (7, 14] medium band
        assert_eq!(topic_priority(10, Difficulty::Hard), Priority::Urgent);
        assert_eq!(topic_priority(10, Difficulty::Medium), Priority::Medium);
        // already urgent stays urgent
        assert_eq!(topic_priority(5, Difficulty::Hard), Priority::Urgent);
        // far out, hard escalates low -> medium
        assert_eq!(topic_priority(20, Difficulty::Hard), Priority::Medium);
        assert_eq!(topic_priority(20, Difficulty::Easy), Priority::Low);
    }

    #[test]
    fn today_tasks_cap_at_two_sessions_per_subject() {
        let today = date(2026, 3, 1);
        let mut s = subject("Maths", date(2026, 3, 4), Difficulty::Hard);
        s.total_topics = 30;
        // 30 topics over 3 days wants 10/day, capped at 2
        let tasks = generate_today_tasks(&[s], today, &mut seq_ids());
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Maths - Topic 1");
        assert_eq!(tasks[1].title, "Maths - Topic 2");
        assert_eq!(tasks[0].duration_min, 45);
    }

    #[test]
    fn overdue_exam_still_yields_one_session() {
        let today = date(2026, 3, 10);
        let mut s = subject("Latin", date(2026, 3, 5), Difficulty::Easy);
        s.total_topics = 4;
        s.completed_topics = 4;
        // negative days and zero remaining topics both floor to 1 session
        let tasks = generate_today_tasks(&[s], today, &mut seq_ids());
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Latin - Topic 5");
        assert_eq!(tasks[0].priority, Priority::Urgent);
    }

    #[test]
    fn today_tasks_sort_urgent_first() {
        let today = date(2026, 3, 1);
        let far = subject("History", date(2026, 4, 10), Difficulty::Easy);
        let near = subject("Maths", date(2026, 3, 5), Difficulty::Medium);
        let tasks = generate_today_tasks(&[far.clone(), near.clone()], today, &mut seq_ids());

        assert_eq!(tasks.first().unwrap().subject_id, near.id);
        assert_eq!(tasks.last().unwrap().subject_id, far.id);
    }
}
