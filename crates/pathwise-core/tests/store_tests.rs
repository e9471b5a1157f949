mod common;

use common::{body, new_version, profile};
use pathwise_core::{
    models::{NewRoadmapVersion, ProgressSnapshot, TaskStatus},
    Database, MemoryStore, PathwiseError, RoadmapStore, SqliteStore,
};
use rusqlite::{params, Connection};
use tempfile::TempDir;

/// Runs `check` against a fresh SQLite store and a fresh memory store.
fn for_each_store(check: impl Fn(&dyn RoadmapStore)) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let sqlite =
        SqliteStore::open(temp_dir.path().join("store.db")).expect("Failed to open sqlite store");
    check(&sqlite);

    let memory = MemoryStore::new();
    check(&memory);
}

#[test]
fn test_sqlite_store_creates_parent_directories() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested").join("deeper").join("store.db");

    let store = SqliteStore::open(&path).expect("Failed to open sqlite store");
    assert!(path.exists());
    assert_eq!(store.path(), path.as_path());
    assert_eq!(store.backend(), "sqlite");
}

#[test]
fn test_only_latest_version_is_active() {
    for_each_store(|store| {
        store.upsert_user(&profile("grace")).expect("Failed to save user");

        let first = store
            .create_version("grace", &new_version(4))
            .expect("Failed to create first version");
        let second = store
            .create_version("grace", &new_version(6))
            .expect("Failed to create second version");
        let third = store
            .create_version("grace", &new_version(8))
            .expect("Failed to create third version");
        assert!(third.is_active);

        let history = store.get_history("grace").expect("Failed to get history");
        let ids: Vec<u64> = history.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id], "{}", store.backend());

        let active: Vec<u64> = history.iter().filter(|v| v.is_active).map(|v| v.id).collect();
        assert_eq!(active, vec![third.id]);

        let current = store
            .get_active("grace")
            .expect("Failed to get active version")
            .expect("Active version should exist");
        assert_eq!(current.id, third.id);
        assert_eq!(current.total_weeks, 8);

        let earlier = store
            .get_version(first.id)
            .expect("Failed to get version")
            .expect("Version should exist");
        assert!(!earlier.is_active);

        let user = store
            .get_user("grace")
            .expect("Failed to get user")
            .expect("User should exist");
        assert_eq!(user.active_roadmap_id, Some(third.id));
    });
}

#[test]
fn test_versions_are_scoped_per_user() {
    for_each_store(|store| {
        store.upsert_user(&profile("grace")).expect("Failed to save user");
        store.upsert_user(&profile("linus")).expect("Failed to save user");

        let graces = store
            .create_version("grace", &new_version(4))
            .expect("Failed to create version");
        let linus = store
            .create_version("linus", &new_version(5))
            .expect("Failed to create version");

        assert_eq!(
            store.get_active("grace").unwrap().map(|v| v.id),
            Some(graces.id)
        );
        assert_eq!(
            store.get_active("linus").unwrap().map(|v| v.id),
            Some(linus.id)
        );
        assert_eq!(store.get_history("grace").unwrap().len(), 1);
    });
}

#[test]
fn test_create_version_requires_user() {
    for_each_store(|store| {
        let result = store.create_version("nobody", &new_version(4));
        match result {
            Err(PathwiseError::UserNotFound { id }) => assert_eq!(id, "nobody"),
            other => panic!("Expected UserNotFound, got {other:?}"),
        }
        assert!(store.get_history("nobody").unwrap().is_empty());
    });
}

#[test]
fn test_upsert_keeps_active_pointer() {
    for_each_store(|store| {
        store.upsert_user(&profile("grace")).expect("Failed to save user");
        let version = store
            .create_version("grace", &new_version(4))
            .expect("Failed to create version");

        let mut edited = profile("grace");
        edited.weekly_hours = 6;
        let saved = store.upsert_user(&edited).expect("Failed to update user");

        assert_eq!(saved.weekly_hours, 6);
        assert_eq!(saved.active_roadmap_id, Some(version.id));
    });
}

#[test]
fn test_tasks_materialized_per_week() {
    for_each_store(|store| {
        store.upsert_user(&profile("grace")).expect("Failed to save user");
        let version = store
            .create_version("grace", &new_version(4))
            .expect("Failed to create version");

        let tasks = store.get_tasks(version.id, None).expect("Failed to get tasks");
        assert_eq!(tasks.len(), 8);
        assert!(tasks.iter().all(|t| t.status == TaskStatus::Pending));
        assert!(tasks.iter().all(|t| t.completed_at.is_none()));
        assert_eq!(tasks[0].task_key, "w1_t1");
        assert_eq!(tasks[1].task_key, "w1_t2");
        assert_eq!(tasks[7].task_key, "w4_t2");
        assert_eq!(tasks[7].title, "Build exercise 4");

        let week_three = store
            .get_tasks(version.id, Some(3))
            .expect("Failed to get tasks");
        assert_eq!(week_three.len(), 2);
        assert!(week_three.iter().all(|t| t.week_number == 3));
    });
}

#[test]
fn test_rebalanced_version_gets_fresh_tasks() {
    for_each_store(|store| {
        store.upsert_user(&profile("grace")).expect("Failed to save user");
        let first = store
            .create_version("grace", &new_version(4))
            .expect("Failed to create version");
        let first_task = store.get_tasks(first.id, None).unwrap()[0].clone();
        store
            .update_task_status(first_task.id, TaskStatus::Completed)
            .expect("Failed to complete task");

        let second = store
            .create_version("grace", &new_version(4))
            .expect("Failed to create version");
        let tasks = store.get_tasks(second.id, None).unwrap();
        assert_eq!(tasks.len(), 8);
        assert!(tasks.iter().all(|t| t.status == TaskStatus::Pending));

        let old = store.get_task(first_task.id).unwrap().expect("Task should exist");
        assert_eq!(old.status, TaskStatus::Completed);
        assert_eq!(old.roadmap_id, first.id);
    });
}

#[test]
fn test_current_week_is_clamped() {
    for_each_store(|store| {
        store.upsert_user(&profile("grace")).expect("Failed to save user");
        assert!(!store.set_current_week("grace", 2).unwrap());

        let clamped_on_create = store
            .create_version(
                "grace",
                &NewRoadmapVersion {
                    current_week: 9,
                    ..new_version(4)
                },
            )
            .expect("Failed to create version");
        assert_eq!(clamped_on_create.current_week, 4);

        assert!(store.set_current_week("grace", 100).unwrap());
        assert_eq!(store.get_active("grace").unwrap().unwrap().current_week, 4);

        assert!(store.set_current_week("grace", 0).unwrap());
        assert_eq!(store.get_active("grace").unwrap().unwrap().current_week, 1);

        assert!(store.set_current_week("grace", 3).unwrap());
        assert_eq!(store.get_active("grace").unwrap().unwrap().current_week, 3);
    });
}

#[test]
fn test_task_lifecycle() {
    for_each_store(|store| {
        store.upsert_user(&profile("grace")).expect("Failed to save user");
        let version = store
            .create_version("grace", &new_version(2))
            .expect("Failed to create version");
        let tasks = store.get_tasks(version.id, None).unwrap();

        let done = store
            .update_task_status(tasks[0].id, TaskStatus::Completed)
            .expect("Failed to complete task");
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed_at.is_some());

        let skipped = store
            .update_task_status(tasks[1].id, TaskStatus::Skipped)
            .expect("Failed to skip task");
        assert_eq!(skipped.status, TaskStatus::Skipped);
        assert!(skipped.completed_at.is_none());

        match store.update_task_status(tasks[0].id, TaskStatus::Skipped) {
            Err(PathwiseError::InvalidTransition { id, from, to }) => {
                assert_eq!(id, tasks[0].id);
                assert_eq!(from, TaskStatus::Completed);
                assert_eq!(to, TaskStatus::Skipped);
            }
            other => panic!("Expected InvalidTransition, got {other:?}"),
        }

        assert!(matches!(
            store.update_task_status(tasks[2].id, TaskStatus::Pending),
            Err(PathwiseError::InvalidTransition { .. })
        ));
        assert!(matches!(
            store.update_task_status(9_999, TaskStatus::Completed),
            Err(PathwiseError::TaskNotFound { id: 9_999 })
        ));

        let stored = store.get_task(tasks[0].id).unwrap().expect("Task should exist");
        assert_eq!(stored.status, TaskStatus::Completed);
    });
}

#[test]
fn test_progress_snapshot_is_replaced() {
    for_each_store(|store| {
        store.upsert_user(&profile("grace")).expect("Failed to save user");
        let version = store
            .create_version("grace", &new_version(4))
            .expect("Failed to create version");
        assert!(store.get_progress("grace").unwrap().is_none());

        let tasks = store.get_tasks(version.id, None).unwrap();
        store.save_progress(&ProgressSnapshot::from_tasks(&version, &tasks)).unwrap();

        store
            .update_task_status(tasks[0].id, TaskStatus::Completed)
            .unwrap();
        let tasks = store.get_tasks(version.id, None).unwrap();
        store.save_progress(&ProgressSnapshot::from_tasks(&version, &tasks)).unwrap();

        let progress = store
            .get_progress("grace")
            .unwrap()
            .expect("Progress should exist");
        assert_eq!(progress.roadmap_id, version.id);
        assert_eq!(progress.completed_tasks_count, 1);
        assert_eq!(progress.total_tasks_count, 8);
        assert_eq!(progress.completion_percentage, 12.5);
        assert_eq!(progress.expected_percentage, 25.0);
    });
}

#[test]
fn test_database_survives_reopen() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("store.db");

    let version_id = {
        let store = SqliteStore::open(&path).expect("Failed to open sqlite store");
        store.upsert_user(&profile("grace")).unwrap();
        store.create_version("grace", &new_version(4)).unwrap().id
    };

    let store = SqliteStore::open(&path).expect("Failed to reopen sqlite store");
    let active = store
        .get_active("grace")
        .unwrap()
        .expect("Active version should survive reopen");
    assert_eq!(active.id, version_id);
    assert_eq!(active.phases, body(4).phases);
}

/// Tables as written by releases that flagged the active version on the
/// version row.
const LEGACY_SCHEMA: &str = "
CREATE TABLE users (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    target_role TEXT NOT NULL,
    skill_level TEXT NOT NULL DEFAULT 'beginner',
    weekly_hours INTEGER NOT NULL,
    deadline TEXT NOT NULL DEFAULT 'flexible',
    financial_constraint TEXT NOT NULL DEFAULT 'free_only',
    situation TEXT NOT NULL DEFAULT 'working_professional',
    background TEXT NOT NULL DEFAULT '',
    onboarding_completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE roadmap_versions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    total_weeks INTEGER NOT NULL,
    current_week INTEGER NOT NULL DEFAULT 1,
    body TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 0,
    rebalance_reason TEXT,
    created_at TEXT NOT NULL,
    last_rebalanced_at TEXT
);
";

#[test]
fn test_legacy_active_flag_is_migrated() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("legacy.db");

    {
        let connection = Connection::open(&path).expect("Failed to open legacy database");
        connection.execute_batch(LEGACY_SCHEMA).unwrap();
        connection
            .execute(
                "INSERT INTO users (id, name, target_role, weekly_hours, onboarding_completed, created_at, updated_at)
                 VALUES ('grace', 'Grace', 'Backend Engineer', 10, 1, ?1, ?1)",
                params!["2024-03-01T10:00:00Z"],
            )
            .unwrap();
        let phases = serde_json::to_string(&body(4).phases).unwrap();
        for (is_active, created_at) in [(0, "2024-03-01T10:00:00Z"), (1, "2024-04-01T10:00:00Z")] {
            connection
                .execute(
                    "INSERT INTO roadmap_versions (user_id, total_weeks, current_week, body, is_active, created_at)
                     VALUES ('grace', 4, 2, ?1, ?2, ?3)",
                    params![phases, is_active, created_at],
                )
                .unwrap();
        }
    }

    Database::new(&path).expect("Failed to migrate legacy database");
    let store = SqliteStore::open(&path).expect("Failed to open migrated database");

    let user = store
        .get_user("grace")
        .unwrap()
        .expect("Legacy user should be readable");
    assert_eq!(user.email, None);
    assert_eq!(user.active_roadmap_id, Some(2));

    let active = store.get_active("grace").unwrap().expect("Active version should exist");
    assert_eq!(active.id, 2);
    assert_eq!(active.current_week, 2);

    // New versions take over the pointer after migration.
    store.upsert_user(&profile("grace")).unwrap();
    let next = store.create_version("grace", &new_version(6)).unwrap();
    let history = store.get_history("grace").unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(
        history.iter().filter(|v| v.is_active).map(|v| v.id).collect::<Vec<_>>(),
        vec![next.id]
    );
}
