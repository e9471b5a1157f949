#![allow(dead_code)]

use pathwise_core::{
    models::{NewRoadmapVersion, Phase, RoadmapBody, UserProfile, Week},
    params::SaveUser,
    Navigator, NavigatorBuilder,
};
use tempfile::TempDir;

/// Helper function to create a test navigator over a throwaway database
pub async fn create_test_navigator() -> (TempDir, Navigator) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let navigator = NavigatorBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create navigator");
    (temp_dir, navigator)
}

pub fn save_user(user_id: &str, weekly_hours: u32) -> SaveUser {
    SaveUser {
        user_id: user_id.to_string(),
        name: "Grace".to_string(),
        target_role: "Backend Engineer".to_string(),
        weekly_hours,
        ..SaveUser::default()
    }
}

pub fn profile(user_id: &str) -> UserProfile {
    save_user(user_id, 10)
        .validate()
        .expect("Failed to build profile")
}

/// A roadmap body with `weeks` weeks of two tasks each, split into two phases.
pub fn body(weeks: u32) -> RoadmapBody {
    let make_week = |number: u32| Week {
        week_number: number,
        focus_skill: format!("Skill {number}"),
        tasks: vec![format!("Read chapter {number}"), format!("Build exercise {number}")],
        milestone: format!("Milestone {number}"),
        success_metric: "Exercise passes".to_string(),
        resources: vec![],
    };
    let split = weeks.div_ceil(2);

    RoadmapBody {
        total_weeks: weeks,
        phases: vec![
            Phase {
                name: "Foundations".to_string(),
                description: None,
                weeks: (1..=split).map(make_week).collect(),
            },
            Phase {
                name: "Projects".to_string(),
                description: None,
                weeks: (split + 1..=weeks).map(make_week).collect(),
            },
        ],
    }
}

pub fn new_version(weeks: u32) -> NewRoadmapVersion {
    NewRoadmapVersion::initial(body(weeks))
}
