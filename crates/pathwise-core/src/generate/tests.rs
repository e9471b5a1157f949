//! Tests for the generation pipeline and the fallback generator.

use jiff::Timestamp;

use super::*;
use crate::error::PathwiseError;
use crate::models::{Deadline, FinancialConstraint, Situation, SkillLevel, Week};

fn user(weekly_hours: u32, deadline: Deadline) -> UserProfile {
    UserProfile {
        id: "ada".to_string(),
        name: "Ada".to_string(),
        email: None,
        target_role: "Data Analyst".to_string(),
        skill_level: SkillLevel::Beginner,
        weekly_hours,
        deadline,
        financial_constraint: FinancialConstraint::FreeOnly,
        situation: Situation::Student,
        background: String::new(),
        onboarding_completed: true,
        active_roadmap_id: Some(1),
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
    }
}

fn initial(user: &UserProfile) -> RoadmapBody {
    RegenerationPipeline::default()
        .run(&GenerationContext::initial(user.clone()))
        .body
}

fn version(body: RoadmapBody, current_week: u32) -> RoadmapVersion {
    RoadmapVersion {
        id: 1,
        user_id: "ada".to_string(),
        version: Timestamp::now(),
        total_weeks: body.total_weeks,
        current_week,
        phases: body.phases,
        is_active: true,
        rebalance_reason: None,
        last_rebalanced_at: None,
    }
}

fn rebalance_context(
    user: UserProfile,
    roadmap: RoadmapVersion,
    previous_weekly_hours: u32,
    deadline_changed: bool,
    timeline_change_weeks: i32,
) -> GenerationContext {
    let progress = ProgressSnapshot::from_tasks(&roadmap, &[]);
    GenerationContext::rebalance(
        user,
        RebalanceContext {
            roadmap,
            progress,
            trigger: RebalanceTrigger::UserRequested,
            reason: "User requested rebalance".to_string(),
            previous_weekly_hours,
            deadline_changed,
            timeline_change_weeks,
        },
    )
}

fn week_numbers(body: &RoadmapBody) -> Vec<u32> {
    body.weeks().map(|week| week.week_number).collect()
}

struct FailingGenerator;

impl RoadmapGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    fn generate(&self, _context: &GenerationContext) -> Result<RawRoadmap> {
        Err(PathwiseError::generation("model unreachable"))
    }
}

#[test]
fn test_initial_fallback_uses_deadline_and_three_phases() {
    let body = initial(&user(10, Deadline::Weeks(12)));

    assert_eq!(body.total_weeks, 12);
    assert_eq!(week_numbers(&body), (1..=12).collect::<Vec<_>>());
    let names: Vec<&str> = body.phases.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Phase 1: Foundation",
            "Phase 2: Building",
            "Phase 3: Mastery & Interview Prep"
        ]
    );
    assert!(body.phases.iter().all(|p| p.weeks.len() == 4));

    let mastery = &body.phases[2].weeks;
    assert_eq!(mastery[0].focus_skill, "Advanced Topic 1");
    assert_eq!(mastery[2].focus_skill, "Interview Preparation");
    assert_eq!(mastery[3].focus_skill, "Interview Preparation");
    assert_eq!(body.task_count(), 36);
}

#[test]
fn test_initial_fallback_length_from_hours_when_flexible() {
    assert_eq!(initial(&user(10, Deadline::Flexible)).total_weeks, 20);
    assert_eq!(initial(&user(40, Deadline::Flexible)).total_weeks, 8);
    assert_eq!(initial(&user(3, Deadline::Flexible)).total_weeks, 52);
}

#[test]
fn test_initial_fallback_skips_empty_phases() {
    let body = initial(&user(10, Deadline::Weeks(2)));
    assert_eq!(body.phases.len(), 1);
    assert_eq!(week_numbers(&body), vec![1, 2]);
}

#[test]
fn test_pipeline_without_primary_uses_fallback() {
    let generated = RegenerationPipeline::new(None)
        .run(&GenerationContext::initial(user(10, Deadline::Weeks(9))));

    assert_eq!(generated.source, GenerationSource::Fallback);
    assert_eq!(generated.body.week_count(), 9);
    assert!(generated.summary.is_none());
}

#[test]
fn test_pipeline_falls_back_when_primary_fails() {
    let pipeline = RegenerationPipeline::new(Some(Arc::new(FailingGenerator)));
    let generated = pipeline.run(&GenerationContext::initial(user(10, Deadline::Weeks(6))));

    assert_eq!(generated.source, GenerationSource::Fallback);
    assert_eq!(generated.body.total_weeks, 6);
}

#[test]
fn test_pipeline_falls_back_when_primary_has_no_weeks() {
    let primary = ResponseGenerator::text(r#"{"total_weeks": 10, "phases": []}"#);
    let pipeline = RegenerationPipeline::new(Some(Arc::new(primary)));
    let generated = pipeline.run(&GenerationContext::initial(user(10, Deadline::Weeks(6))));

    assert_eq!(generated.source, GenerationSource::Fallback);
    assert_eq!(generated.body.total_weeks, 6);
}

#[test]
fn test_pipeline_sanitizes_primary_output() {
    let primary = ResponseGenerator::text(
        r#"```json
        {"total_weeks": "2",
         "phases": [{"phase_name": "Sprint", "weeks": [
            {"week_number": 7, "tasks": ["Learn SQL joins"]},
            {"week_number": 7}
         ]}],
         "rebalance_summary": {"weeks_added_or_removed": -1, "key_changes": ["Shorter"]}}
        ```"#,
    );
    let pipeline = RegenerationPipeline::new(Some(Arc::new(primary)));
    let generated = pipeline.run(&GenerationContext::initial(user(10, Deadline::Flexible)));

    assert_eq!(generated.source, GenerationSource::Primary);
    assert_eq!(week_numbers(&generated.body), vec![1, 2]);
    assert_eq!(generated.body.phases[0].weeks[1].milestone, "Complete weekly tasks");

    let summary = generated.summary.unwrap();
    assert_eq!(summary.weeks_added_or_removed, -1);
    assert_eq!(summary.key_changes, vec!["Shorter"]);
    assert!(summary.user_message.is_empty());
}

#[test]
fn test_fallback_rebalance_extends_for_fewer_hours() {
    let before = user(10, Deadline::Weeks(12));
    let roadmap = version(initial(&before), 4);
    let original_first_weeks: Vec<Week> = roadmap.body().weeks().take(4).cloned().collect();

    let after = user(5, Deadline::Weeks(12));
    let generated = RegenerationPipeline::new(None).run(&rebalance_context(after, roadmap, 10, false, 0));

    // 8 remaining weeks at half the hours become 16.
    assert_eq!(generated.body.total_weeks, 20);
    assert_eq!(week_numbers(&generated.body), (1..=20).collect::<Vec<_>>());
    let kept: Vec<Week> = generated.body.weeks().take(4).cloned().collect();
    assert_eq!(kept, original_first_weeks);

    let last_phase = generated.body.phases.last().unwrap();
    assert_eq!(last_phase.name, "Phase 3: Mastery & Interview Prep");
    assert_eq!(last_phase.weeks.last().unwrap().focus_skill, "Consolidation & Review 8");

    let summary = generated.summary.unwrap();
    assert_eq!(summary.weeks_added_or_removed, 8);
    assert_eq!(summary.tasks_redistributed, 0);
    assert_eq!(
        summary.user_message,
        "Your roadmap has been adjusted to match your new availability. Keep going!"
    );
}

#[test]
fn test_fallback_rebalance_merges_without_dropping_tasks() {
    let before = user(6, Deadline::Weeks(12));
    let roadmap = version(initial(&before), 4);
    let tasks_before = roadmap.body().task_count();

    let after = user(12, Deadline::Weeks(12));
    let generated = RegenerationPipeline::new(None).run(&rebalance_context(after, roadmap, 6, false, 0));

    assert_eq!(generated.body.total_weeks, 8);
    assert_eq!(generated.body.week_count(), 8);
    assert_eq!(generated.body.task_count(), tasks_before);

    let summary = generated.summary.unwrap();
    assert_eq!(summary.weeks_added_or_removed, -4);
    assert_eq!(summary.tasks_redistributed, 12);
}

#[test]
fn test_fallback_rebalance_timeline_adjustment_has_floor() {
    let current = user(10, Deadline::Weeks(12));
    let roadmap = version(initial(&current), 1);

    let generated =
        RegenerationPipeline::new(None).run(&rebalance_context(current.clone(), roadmap.clone(), 10, false, -20));
    assert_eq!(generated.body.total_weeks, MIN_REBALANCED_WEEKS);

    let generated = RegenerationPipeline::new(None).run(&rebalance_context(current, roadmap, 10, false, 2));
    assert_eq!(generated.body.total_weeks, 14);
}

#[test]
fn test_fallback_rebalance_follows_new_deadline() {
    let before = user(10, Deadline::Weeks(12));
    let roadmap = version(initial(&before), 2);

    let after = user(10, Deadline::Weeks(6));
    let generated = RegenerationPipeline::new(None).run(&rebalance_context(after, roadmap, 10, true, 0));

    assert_eq!(generated.body.total_weeks, 6);
    assert_eq!(week_numbers(&generated.body), (1..=6).collect::<Vec<_>>());
}

#[test]
fn test_fallback_rebalance_without_changes_keeps_length() {
    let current = user(10, Deadline::Weeks(12));
    let roadmap = version(initial(&current), 5);
    let expected = roadmap.body();

    let generated = RegenerationPipeline::new(None).run(&rebalance_context(current, roadmap, 10, false, 0));

    assert_eq!(generated.body, expected);
    assert_eq!(
        generated.summary.unwrap().key_changes,
        vec!["Kept the current timeline"]
    );
}

#[test]
fn test_response_generator_reports_unusable_text() {
    let generator = ResponseGenerator::text("I could not build a roadmap, sorry.");
    assert!(matches!(
        generator.generate(&GenerationContext::initial(user(10, Deadline::Flexible))),
        Err(PathwiseError::Generation { .. })
    ));
}
