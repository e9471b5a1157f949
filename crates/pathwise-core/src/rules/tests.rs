//! Tests for the rule engine.

use jiff::Timestamp;

use super::*;
use crate::models::{
    Deadline, FinancialConstraint, PaceStatus, Situation, SkillLevel, UserProfile,
};

fn user(weekly_hours: u32) -> UserProfile {
    UserProfile {
        id: "ada".to_string(),
        name: "Ada".to_string(),
        email: None,
        target_role: "Data Analyst".to_string(),
        skill_level: SkillLevel::Beginner,
        weekly_hours,
        deadline: Deadline::Weeks(12),
        financial_constraint: FinancialConstraint::FreeOnly,
        situation: Situation::WorkingProfessional,
        background: String::new(),
        onboarding_completed: true,
        active_roadmap_id: Some(1),
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
    }
}

fn roadmap(current_week: u32, total_weeks: u32) -> RoadmapVersion {
    RoadmapVersion {
        id: 1,
        user_id: "ada".to_string(),
        version: Timestamp::now(),
        total_weeks,
        current_week,
        phases: vec![],
        is_active: true,
        rebalance_reason: None,
        last_rebalanced_at: None,
    }
}

fn progress(total: u32, missed: u32, completion_percentage: f64) -> ProgressSnapshot {
    ProgressSnapshot {
        user_id: "ada".to_string(),
        roadmap_id: 1,
        completion_percentage,
        completed_tasks_count: 0,
        missed_tasks_count: missed,
        total_tasks_count: total,
        expected_percentage: 0.0,
        pace_status: PaceStatus::OnTrack,
        current_week: 1,
        total_weeks: 12,
        last_updated: Timestamp::now(),
    }
}

#[test]
fn test_no_checks_fire_returns_on_track() {
    let engine = RuleEngine::default();
    let rec = engine.evaluate(&progress(20, 0, 10.0), &user(10), &roadmap(2, 12), None);

    assert!(!rec.should_rebalance);
    assert_eq!(rec.trigger, None);
    assert_eq!(rec.severity, Severity::None);
    assert!(rec.suggested_actions.is_empty());
}

#[test]
fn test_missed_tasks_medium_severity() {
    let engine = RuleEngine::default();
    let rec = engine.evaluate(&progress(20, 7, 0.0), &user(10), &roadmap(4, 12), None);

    assert!(rec.should_rebalance);
    assert_eq!(rec.trigger, Some(RebalanceTrigger::MissedTasks));
    assert_eq!(rec.severity, Severity::Medium);
    assert!(rec.message.contains("35%"));
    assert_eq!(rec.suggested_actions.len(), 4);
}

#[test]
fn test_missed_tasks_high_severity() {
    let engine = RuleEngine::default();
    let rec = engine.evaluate(&progress(20, 11, 0.0), &user(10), &roadmap(4, 12), None);

    assert_eq!(rec.trigger, Some(RebalanceTrigger::MissedTasks));
    assert_eq!(rec.severity, Severity::High);
    assert!(rec.message.contains("55%"));
}

#[test]
fn test_missed_tasks_threshold_is_inclusive() {
    let engine = RuleEngine::default();
    let rec = engine.evaluate(&progress(10, 3, 0.0), &user(10), &roadmap(4, 12), None);
    assert_eq!(rec.trigger, Some(RebalanceTrigger::MissedTasks));

    let rec = engine.evaluate(&progress(10, 2, 0.0), &user(10), &roadmap(4, 12), None);
    assert!(!rec.should_rebalance);
}

#[test]
fn test_zero_tasks_never_reports_missed_tasks() {
    let engine = RuleEngine::default();
    let rec = engine.evaluate(&progress(0, 5, 0.0), &user(10), &roadmap(1, 12), None);

    assert_ne!(rec.trigger, Some(RebalanceTrigger::MissedTasks));
    assert!(!rec.should_rebalance);
}

#[test]
fn test_ahead_of_schedule_low_severity() {
    let engine = RuleEngine::default();
    let rec = engine.evaluate(&progress(20, 0, 75.0), &user(10), &roadmap(6, 12), None);

    assert_eq!(rec.trigger, Some(RebalanceTrigger::AheadOfSchedule));
    assert_eq!(rec.severity, Severity::Low);
    assert!(rec.message.contains("ahead of schedule"));
}

#[test]
fn test_ahead_check_skipped_for_zero_week_roadmap() {
    let engine = RuleEngine::default();
    let rec = engine.evaluate(&progress(20, 0, 90.0), &user(10), &roadmap(1, 0), None);
    assert!(!rec.should_rebalance);
}

#[test]
fn test_missed_tasks_outranks_ahead_of_schedule() {
    let engine = RuleEngine::default();
    // 35% missed and 65% complete against an expected 8.3%.
    let rec = engine.evaluate(&progress(20, 7, 65.0), &user(10), &roadmap(1, 12), None);

    assert_eq!(rec.trigger, Some(RebalanceTrigger::MissedTasks));
    assert_eq!(rec.severity, Severity::Medium);
}

#[test]
fn test_hours_decrease_reports_direction() {
    let engine = RuleEngine::default();
    let previous = user(10);
    let current = user(6);
    let rec = engine.evaluate(&progress(20, 0, 10.0), &current, &roadmap(2, 12), Some(&previous));

    assert_eq!(rec.trigger, Some(RebalanceTrigger::HoursChanged));
    assert_eq!(rec.severity, Severity::Medium);
    assert!(rec.message.contains("decreased"));
    assert!(rec.suggested_actions[0].contains("6 hours/week"));
}

#[test]
fn test_hours_increase_below_threshold_is_ignored() {
    let engine = RuleEngine::default();
    let rec = engine.evaluate(
        &progress(20, 0, 10.0),
        &user(12),
        &roadmap(2, 12),
        Some(&user(10)),
    );
    assert!(!rec.should_rebalance);

    let rec = engine.evaluate(
        &progress(20, 0, 10.0),
        &user(15),
        &roadmap(2, 12),
        Some(&user(10)),
    );
    assert!(rec.message.contains("increased"));
}

#[test]
fn test_hours_check_skipped_when_previous_hours_zero() {
    let engine = RuleEngine::default();
    let rec = engine.evaluate(
        &progress(20, 0, 10.0),
        &user(10),
        &roadmap(2, 12),
        Some(&user(0)),
    );
    assert!(!rec.should_rebalance);
}

#[test]
fn test_deadline_change_is_high_and_beats_missed_medium() {
    let engine = RuleEngine::default();
    let previous = user(10);
    let mut current = user(10);
    current.deadline = Deadline::Flexible;

    let rec = engine.evaluate(&progress(20, 7, 0.0), &current, &roadmap(2, 12), Some(&previous));

    assert_eq!(rec.trigger, Some(RebalanceTrigger::DeadlineChanged));
    assert_eq!(rec.severity, Severity::High);
}

#[test]
fn test_missed_high_wins_tie_against_deadline_by_order() {
    let engine = RuleEngine::default();
    let previous = user(10);
    let mut current = user(10);
    current.deadline = Deadline::Weeks(26);

    let rec = engine.evaluate(&progress(20, 11, 0.0), &current, &roadmap(2, 12), Some(&previous));

    assert_eq!(rec.trigger, Some(RebalanceTrigger::MissedTasks));
    assert_eq!(rec.severity, Severity::High);
}

#[test]
fn test_hours_wins_tie_against_situation_by_order() {
    let engine = RuleEngine::default();
    let previous = user(10);
    let mut current = user(5);
    current.situation = Situation::CareerBreak;

    let rec = engine.evaluate(&progress(20, 0, 10.0), &current, &roadmap(2, 12), Some(&previous));
    assert_eq!(rec.trigger, Some(RebalanceTrigger::HoursChanged));

    current.weekly_hours = 10;
    let rec = engine.evaluate(&progress(20, 0, 10.0), &current, &roadmap(2, 12), Some(&previous));
    assert_eq!(rec.trigger, Some(RebalanceTrigger::SituationChanged));
    assert_eq!(rec.severity, Severity::Medium);
}

#[test]
fn test_profile_checks_need_previous_profile() {
    let engine = RuleEngine::default();
    let mut current = user(4);
    current.deadline = Deadline::Flexible;
    current.situation = Situation::Student;

    let rec = engine.evaluate(&progress(20, 0, 10.0), &current, &roadmap(2, 12), None);
    assert!(!rec.should_rebalance);
}

#[test]
fn test_custom_thresholds() {
    let engine = RuleEngine::new(Thresholds {
        missed_percent: 10.0,
        ahead_percent: 5.0,
        ..Thresholds::default()
    });

    let rec = engine.evaluate(&progress(20, 3, 0.0), &user(10), &roadmap(2, 12), None);
    assert_eq!(rec.trigger, Some(RebalanceTrigger::MissedTasks));

    let rec = engine.evaluate(&progress(20, 0, 60.0), &user(10), &roadmap(6, 12), None);
    assert_eq!(rec.trigger, Some(RebalanceTrigger::AheadOfSchedule));
}

#[test]
fn test_severity_ordering_and_trigger_parsing() {
    assert!(Severity::High < Severity::Medium);
    assert!(Severity::Medium < Severity::Low);
    assert!(Severity::Low < Severity::None);
    assert_eq!(
        "user-requested".parse::<RebalanceTrigger>(),
        Ok(RebalanceTrigger::UserRequested)
    );
    assert!("bored".parse::<RebalanceTrigger>().is_err());
}
