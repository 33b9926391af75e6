use chrono::{Duration, TimeZone, Utc};
use taskdesk_core::{
    Category, ModelValidationError, Priority, RepoError, Status, StoreError, Task, TaskListQuery, TaskStore,
    DEFAULT_CATEGORIES,
};
use tempfile::TempDir;

fn new_store() -> (TempDir, TaskStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path().join("tasks.db"));
    store.initialize().unwrap();
    (dir, store)
}

#[test]
fn initialize_is_idempotent_and_seeds_once() {
    let (_dir, store) = new_store();
    store.initialize().unwrap();

    let names: Vec<_> = store
        .get_categories()
        .into_iter()
        .map(|category| category.name)
        .collect();
    let expected: Vec<_> = DEFAULT_CATEGORIES
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    assert_eq!(names, expected);
}

#[test]
fn initialize_fails_when_the_file_cannot_be_created() {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path().join("missing").join("nested").join("tasks.db"));

    let err = store.initialize().unwrap_err();
    assert!(matches!(err, StoreError::Initialization(_)));
}

#[test]
fn added_task_is_listed_once_with_assigned_identifier() {
    let (_dir, store) = new_store();
    let due = Utc::now() + Duration::days(3);
    let task = Task::new("Write tests")
        .with_description("store level")
        .with_priority(Priority::High)
        .with_due_date(due);

    let id = store.add_task(&task).unwrap();
    let all = store.get_all_tasks();

    assert_eq!(all.len(), 1);
    let stored = &all[0];
    assert_eq!(stored.id, Some(id));
    assert_eq!(stored.title, task.title);
    assert_eq!(stored.description, task.description);
    assert_eq!(stored.priority, task.priority);
    assert_eq!(stored.status, task.status);
    assert_eq!(stored.due_date, task.due_date);
    assert!(stored.created_at.is_some());
}

#[test]
fn sub_millisecond_due_date_reads_back_equal() {
    let (_dir, store) = new_store();
    let due = Utc.timestamp_opt(1_893_456_000, 1_500_000).unwrap();
    let task = Task::new("precise").with_due_date(due);

    let id = store.add_task(&task).unwrap();
    let stored = store.get_task(id).unwrap();

    assert_eq!(stored.due_date, task.due_date);
    assert_eq!(
        stored.due_date.map(|value| value.timestamp_subsec_millis()),
        Some(1)
    );
}

#[test]
fn far_future_due_date_is_rejected_instead_of_lost() {
    let (_dir, store) = new_store();
    let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();

    let err = store
        .add_task(&Task::new("far").with_due_date(far))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Storage(RepoError::Validation(
            ModelValidationError::TimestampOutOfRange { year: 10000, .. }
        ))
    ));
    assert!(store.get_all_tasks().is_empty());
}

#[test]
fn write_errors_propagate() {
    let (_dir, store) = new_store();

    let err = store.add_task(&Task::new("")).unwrap_err();
    assert!(matches!(err, StoreError::Storage(RepoError::Validation(_))));

    let err = store
        .add_task(&Task::new("dangling").with_category(9_999))
        .unwrap_err();
    assert!(matches!(err, StoreError::Storage(RepoError::Db(_))));
    assert!(store.get_all_tasks().is_empty());
}

#[test]
fn update_missing_task_returns_false_and_changes_nothing() {
    let (_dir, store) = new_store();
    let id = store.add_task(&Task::new("keep")).unwrap();
    let before = store.get_all_tasks();

    let mut ghost = Task::new("ghost");
    ghost.id = Some(id + 100);
    assert!(!store.update_task(&ghost).unwrap());
    assert_eq!(store.get_all_tasks(), before);
}

#[test]
fn non_positive_ids_are_reported_as_missing_by_every_write() {
    let (_dir, store) = new_store();
    store.add_task(&Task::new("keep")).unwrap();
    let before = store.get_all_tasks();

    for id in [0, -5] {
        let mut ghost = Task::new("ghost");
        ghost.id = Some(id);
        assert!(!store.update_task(&ghost).unwrap());
        assert!(!store.complete_task(id).unwrap());
        assert!(!store.delete_task(id).unwrap());
        assert!(!store.delete_category(id).unwrap());
    }
    assert_eq!(store.get_all_tasks(), before);
}

#[test]
fn update_complete_and_delete_report_success() {
    let (_dir, store) = new_store();
    let id = store.add_task(&Task::new("draft")).unwrap();

    let mut task = store.get_task(id).unwrap();
    task.title = "final".to_string();
    task.status = Status::InProgress;
    assert!(store.update_task(&task).unwrap());
    assert_eq!(store.get_task(id).unwrap().title, "final");

    assert!(store.complete_task(id).unwrap());
    assert!(store.get_task(id).unwrap().is_completed());

    assert!(store.delete_task(id).unwrap());
    assert!(!store.delete_task(id).unwrap());
    assert!(!store.complete_task(id).unwrap());
    assert!(store.get_task(id).is_none());
}

#[test]
fn add_category_rejects_case_insensitive_duplicates() {
    let (_dir, store) = new_store();

    let err = store
        .add_category(&Category::with_default_color("work"))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Storage(RepoError::DuplicateCategoryName(name)) if name == "Work"
    ));

    let id = store
        .add_category(&Category::new("Garden", "#00aa00"))
        .unwrap();
    assert!(store
        .get_categories()
        .iter()
        .any(|category| category.id == Some(id)));
}

#[test]
fn delete_missing_category_returns_false() {
    let (_dir, store) = new_store();
    assert!(!store.delete_category(12_345).unwrap());
    assert_eq!(store.get_categories().len(), DEFAULT_CATEGORIES.len());
}

#[test]
fn blank_search_is_the_same_as_listing_everything() {
    let (_dir, store) = new_store();
    store.add_task(&Task::new("alpha")).unwrap();
    store
        .add_task(&Task::new("beta").with_description("second"))
        .unwrap();

    assert_eq!(store.search_tasks(""), store.get_all_tasks());
    assert_eq!(store.search_tasks("   "), store.get_all_tasks());
    assert_eq!(store.search_tasks(" alp ").len(), 1);
    assert!(store.search_tasks("gamma").is_empty());
}

#[test]
fn filter_and_statistics_follow_stored_state() {
    let (_dir, store) = new_store();
    let high = store
        .add_task(&Task::new("fix prod").with_priority(Priority::High))
        .unwrap();
    store
        .add_task(&Task::new("tidy desk").with_priority(Priority::Low))
        .unwrap();
    store.complete_task(high).unwrap();

    let query = TaskListQuery {
        priority: Some(Priority::High),
        status: Some(Status::Completed),
        ..TaskListQuery::default()
    };
    let filtered = store.filter_tasks(&query);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, Some(high));

    let stats = store.statistics();
    assert_eq!((stats.total, stats.completed), (2, 1));
    assert_eq!(stats.progress_percent(), 50);
}

#[test]
fn reads_degrade_to_empty_when_the_store_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path().join("no").join("such").join("tasks.db"));

    assert!(store.get_all_tasks().is_empty());
    assert!(store.get_categories().is_empty());
    assert!(store.search_tasks("x").is_empty());
    assert!(store.get_task(1).is_none());
    assert_eq!(store.statistics().total, 0);
    assert!(store.add_task(&Task::new("nowhere")).is_err());
}

#[test]
fn categorized_task_survives_category_deletion_without_reference() {
    let dir = tempfile::tempdir().unwrap();
    // Not initialized, so no defaults are seeded; the schema is still created.
    let store = TaskStore::new(dir.path().join("scenario.db"));

    let work = store
        .add_category(&Category::new("Work", "#FF0000"))
        .unwrap();
    let personal = store
        .add_category(&Category::new("Personal", "#4ECDC4"))
        .unwrap();
    let tomorrow = Utc::now() + Duration::days(1);
    let milk = store
        .add_task(
            &Task::new("Buy milk")
                .with_priority(Priority::Low)
                .with_status(Status::Pending)
                .with_due_date(tomorrow)
                .with_category(personal),
        )
        .unwrap();

    let in_personal = store.get_tasks_by_category(personal);
    assert_eq!(in_personal.len(), 1);
    assert_eq!(in_personal[0].id, Some(milk));
    assert!(store.get_tasks_by_category(work).is_empty());

    assert!(store.delete_category(personal).unwrap());

    let all = store.get_all_tasks();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, Some(milk));
    assert_eq!(all[0].category_id, None);
    assert!(store
        .get_categories()
        .iter()
        .all(|category| category.id != Some(personal)));
}
