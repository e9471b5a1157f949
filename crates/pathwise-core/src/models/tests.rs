//! Tests for the models module.

use jiff::Timestamp;

use super::*;

fn week(number: u32, tasks: &[&str]) -> Week {
    Week {
        week_number: number,
        focus_skill: format!("Skill {number}"),
        tasks: tasks.iter().map(|t| (*t).to_string()).collect(),
        milestone: "Milestone".to_string(),
        success_metric: "Metric".to_string(),
        resources: vec![],
    }
}

fn roadmap(current_week: u32, total_weeks: u32) -> RoadmapVersion {
    RoadmapVersion {
        id: 7,
        user_id: "ada".to_string(),
        version: Timestamp::now(),
        total_weeks,
        current_week,
        phases: vec![
            Phase {
                name: "Foundation".to_string(),
                description: None,
                weeks: vec![week(1, &["Read", "Practice"]), week(2, &["Build"])],
            },
            Phase {
                name: "Mastery".to_string(),
                description: Some("Polish".to_string()),
                weeks: vec![week(3, &["Interview"])],
            },
        ],
        is_active: true,
        rebalance_reason: None,
        last_rebalanced_at: None,
    }
}

fn task(id: u64, week_number: u32, status: TaskStatus) -> Task {
    Task {
        id,
        user_id: "ada".to_string(),
        roadmap_id: 7,
        week_number,
        task_key: task_key(week_number, 0),
        title: format!("Task {id}"),
        status,
        created_at: Timestamp::now(),
        completed_at: None,
    }
}

#[test]
fn test_task_status_round_trip_through_storage_strings() {
    for status in [TaskStatus::Pending, TaskStatus::Completed, TaskStatus::Skipped] {
        assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
    }
    assert!("archived".parse::<TaskStatus>().is_err());
}

#[test]
fn test_task_status_transitions_only_leave_pending() {
    assert!(TaskStatus::Pending.can_transition_to(TaskStatus::Completed));
    assert!(TaskStatus::Pending.can_transition_to(TaskStatus::Skipped));
    assert!(!TaskStatus::Pending.can_transition_to(TaskStatus::Pending));
    assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Skipped));
    assert!(!TaskStatus::Skipped.can_transition_to(TaskStatus::Completed));
}

#[test]
fn test_pace_status_buckets() {
    assert_eq!(PaceStatus::from_gap(60.0, 50.0), PaceStatus::Ahead);
    assert_eq!(PaceStatus::from_gap(45.0, 50.0), PaceStatus::OnTrack);
    assert_eq!(PaceStatus::from_gap(40.0, 50.0), PaceStatus::OnTrack);
    assert_eq!(PaceStatus::from_gap(30.0, 50.0), PaceStatus::SlightlyBehind);
    assert_eq!(PaceStatus::from_gap(20.0, 50.0), PaceStatus::Behind);
}

#[test]
fn test_deadline_parsing_accepts_timeline_labels() {
    assert_eq!("Flexible".parse::<Deadline>(), Ok(Deadline::Flexible));
    assert_eq!("6 months".parse::<Deadline>(), Ok(Deadline::Weeks(26)));
    assert_eq!("1 year".parse::<Deadline>(), Ok(Deadline::Weeks(52)));
    assert_eq!("10 weeks".parse::<Deadline>(), Ok(Deadline::Weeks(10)));
    assert_eq!("1 week".parse::<Deadline>(), Ok(Deadline::Weeks(1)));
    assert_eq!("8".parse::<Deadline>(), Ok(Deadline::Weeks(8)));
    assert!("0 weeks".parse::<Deadline>().is_err());
    assert!("soon".parse::<Deadline>().is_err());
}

#[test]
fn test_deadline_storage_round_trip() {
    for deadline in [Deadline::Flexible, Deadline::Weeks(12)] {
        assert_eq!(deadline.to_storage().parse::<Deadline>(), Ok(deadline));
    }
}

#[test]
fn test_profile_enums_parse_labels() {
    assert_eq!("Free Only".parse::<FinancialConstraint>(), Ok(FinancialConstraint::FreeOnly));
    assert_eq!("paid-allowed".parse::<FinancialConstraint>(), Ok(FinancialConstraint::PaidAllowed));
    assert_eq!("Working Professional".parse::<Situation>(), Ok(Situation::WorkingProfessional));
    assert_eq!("ADVANCED".parse::<SkillLevel>(), Ok(SkillLevel::Advanced));
}

#[test]
fn test_roadmap_week_lookup_and_clamp() {
    let roadmap = roadmap(2, 3);
    assert_eq!(roadmap.week(3).map(|w| w.focus_skill.as_str()), Some("Skill 3"));
    assert!(roadmap.week(4).is_none());
    assert_eq!(roadmap.clamp_week(0), 1);
    assert_eq!(roadmap.clamp_week(9), 3);
    assert_eq!(clamp_week(5, 0), 1);
    assert!(!roadmap.is_final_week());
}

#[test]
fn test_materialize_tasks_assigns_keys_per_week() {
    let roadmap = roadmap(1, 3);
    let tasks = materialize_tasks(&roadmap.phases);

    let keys: Vec<&str> = tasks.iter().map(|t| t.task_key.as_str()).collect();
    assert_eq!(keys, vec!["w1_t1", "w1_t2", "w2_t1", "w3_t1"]);
    assert_eq!(tasks[1].title, "Practice");
    assert_eq!(roadmap.body().task_count(), 4);
    assert_eq!(roadmap.body().week_count(), 3);
}

#[test]
fn test_progress_snapshot_counts_and_pace() {
    let roadmap = roadmap(1, 4);
    let tasks = vec![
        task(1, 1, TaskStatus::Completed),
        task(2, 1, TaskStatus::Completed),
        task(3, 2, TaskStatus::Skipped),
        task(4, 3, TaskStatus::Pending),
        task(5, 3, TaskStatus::Pending),
        task(6, 3, TaskStatus::Pending),
    ];

    let snapshot = ProgressSnapshot::from_tasks(&roadmap, &tasks);

    assert_eq!(snapshot.total_tasks_count, 6);
    assert_eq!(snapshot.completed_tasks_count, 2);
    assert_eq!(snapshot.missed_tasks_count, 1);
    assert_eq!(snapshot.pending_tasks_count(), 3);
    assert_eq!(snapshot.completion_percentage, 33.3);
    assert_eq!(snapshot.expected_percentage, 25.0);
    assert_eq!(snapshot.pace_status, PaceStatus::OnTrack);
}

#[test]
fn test_progress_snapshot_with_no_tasks() {
    let snapshot = ProgressSnapshot::from_tasks(&roadmap(1, 0), &[]);
    assert_eq!(snapshot.completion_percentage, 0.0);
    assert_eq!(snapshot.expected_percentage, 0.0);
    assert_eq!(snapshot.pace_status, PaceStatus::OnTrack);
}

#[test]
fn test_missed_percentage_in_window() {
    let tasks = vec![
        task(1, 1, TaskStatus::Skipped),
        task(2, 2, TaskStatus::Skipped),
        task(3, 3, TaskStatus::Completed),
        task(4, 3, TaskStatus::Pending),
    ];

    // Weeks 2..=3 hold three tasks, one skipped.
    let pct = missed_percentage_in_window(&tasks, 3, MISSED_TASK_WINDOW_WEEKS);
    assert!((pct - 100.0 / 3.0).abs() < 1e-9);

    // The window never reaches below week 1.
    assert_eq!(missed_percentage_in_window(&tasks, 1, 5), 100.0);
    assert_eq!(missed_percentage_in_window(&tasks, 9, 2), 0.0);
}

#[test]
fn test_life_event_parses_menu_keys_and_labels_reason() {
    let event: LifeEvent = "Health Break".parse().unwrap();
    assert_eq!(event, LifeEvent::HealthBreak);
    assert_eq!(event.hours_change(), -6);
    assert_eq!(
        event.reason(),
        "Life Event: Health/Medical - Need extended recovery time"
    );
    assert!("vacation".parse::<LifeEvent>().is_err());

    for event in LifeEvent::all() {
        assert_eq!(event.as_str().parse::<LifeEvent>(), Ok(event));
    }
}

#[test]
fn test_life_event_hours_stay_within_policy_bounds() {
    assert_eq!(LifeEvent::Burnout.adjusted_hours(5), Some(3));
    assert_eq!(LifeEvent::MoreTime.adjusted_hours(38), Some(40));
    assert_eq!(LifeEvent::MotivationHigh.adjusted_hours(10), Some(13));
    assert_eq!(LifeEvent::CareerPivot.adjusted_hours(10), None);
}

#[test]
fn test_rebalance_reason_defaults_and_life_event_wording() {
    let plain = RebalanceRequest::user_requested();
    assert_eq!(plain.compose_reason(10), "User requested rebalance");

    let unchanged_hours = RebalanceRequest {
        reason: Some("  New job  ".to_string()),
        new_weekly_hours: Some(10),
        timeline_change_weeks: -4,
        ..RebalanceRequest::user_requested()
    };
    assert_eq!(
        unchanged_hours.compose_reason(10),
        "New job | Timeline: -4 weeks"
    );

    let event = RebalanceRequest::life_event(LifeEvent::NewJob);
    assert_eq!(
        event.compose_reason(10),
        "Life Event: Started New Job - Less time for learning, need to adjust pace"
    );
}
