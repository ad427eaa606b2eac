//! Snapshot export, seeding and git sync tests
mod common;

use common::{create_project, get_test_handler, get_test_handler_with};
use git2::Repository;
use std::fs;

#[tokio::test]
async fn test_export_without_snapshot_fails() {
    let (handler, _dir) = get_test_handler();
    assert!(handler.handle_export_snapshot().await.is_err());
}

#[tokio::test]
async fn test_mutations_write_snapshot() {
    let (handler, dir) = get_test_handler_with(|dir, config| {
        config.snapshot = Some(dir.path().join("board.toml"));
    });
    create_project(&handler, "Apollo", Some("2030-01-01")).await;
    handler
        .handle_set_setting("theme".to_string(), "dark".to_string())
        .await
        .unwrap();

    let content = fs::read_to_string(dir.path().join("board.toml")).unwrap();
    assert!(content.contains("name = \"Apollo\""));
    assert!(content.contains("status = \"Planning\""));
    assert!(content.contains("key = \"theme\""));

    let response = handler.handle_export_snapshot().await.unwrap();
    assert!(response.contains("board.toml"));
}

#[tokio::test]
async fn test_fresh_database_is_seeded_from_snapshot() {
    let (handler, dir) = get_test_handler_with(|dir, config| {
        config.snapshot = Some(dir.path().join("board.toml"));
    });
    create_project(&handler, "Apollo", None).await;
    create_project(&handler, "Gemini", None).await;
    drop(handler);

    let (seeded, _) = get_test_handler_with(|_, config| {
        config.database = dir.path().join("fresh.sqlite");
        config.snapshot = Some(dir.path().join("board.toml"));
    });
    let list = seeded
        .handle_list_projects(None, None, None, None, None)
        .await
        .unwrap();
    assert!(list.contains("[1] Apollo"));
    assert!(list.contains("[2] Gemini"));

    // ids continue after the imported rows
    let next = create_project(&seeded, "Mercury", None).await;
    assert_eq!(next, 3);
}

#[tokio::test]
async fn test_git_sync_commits_each_change() {
    let (handler, dir) = get_test_handler_with(|dir, config| {
        let repo = Repository::init(dir.path()).unwrap();
        let mut git_config = repo.config().unwrap();
        git_config.set_str("user.name", "Test User").unwrap();
        git_config.set_str("user.email", "test@example.com").unwrap();
        config.snapshot = Some(dir.path().join("board.toml"));
        config.sync_git = true;
    });
    create_project(&handler, "Apollo", None).await;
    handler
        .handle_star_project(1, Some(true))
        .await
        .unwrap();

    let repo = Repository::open(dir.path()).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message(), Some("Star project 1"));
    assert_eq!(head.parent(0).unwrap().message(), Some("Add project 1"));

    let settings = handler.handle_settings().await.unwrap();
    assert!(settings.contains("git sync: on"));
}
