//! Common test utilities for integration tests

#![allow(dead_code)]

use tempfile::TempDir;
use workboard::{Config, WorkboardServerHandler};

/// Create a test handler with a fresh database in a temporary directory
pub fn get_test_handler() -> (WorkboardServerHandler, TempDir) {
    get_test_handler_with(|_, _| {})
}

/// Create a test handler after adjusting the default config. The temporary
/// directory is passed along for placing snapshot or config files.
pub fn get_test_handler_with(
    adjust: impl FnOnce(&TempDir, &mut Config),
) -> (WorkboardServerHandler, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut config = Config::for_database(dir.path().join("board.sqlite"));
    adjust(&dir, &mut config);
    let handler = WorkboardServerHandler::new(config).unwrap();
    (handler, dir)
}

/// Extract the numeric ID from a "... created with ID: <id> (...)" response
pub fn extract_id(response: &str) -> i64 {
    let start = response.find("ID: ").expect("response has no ID") + 4;
    response[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap()
}

pub async fn create_project(
    handler: &WorkboardServerHandler,
    name: &str,
    due: Option<&str>,
) -> i64 {
    let response = handler
        .handle_create_project(name.to_string(), None, None, due.map(str::to_string))
        .await
        .unwrap();
    extract_id(&response)
}

pub async fn create_task(
    handler: &WorkboardServerHandler,
    title: &str,
    importance: u8,
    urgency: u8,
) -> i64 {
    let response = handler
        .handle_create_task(
            title.to_string(),
            None,
            None,
            None,
            None,
            None,
            None,
            Some(importance),
            Some(urgency),
            None,
        )
        .await
        .unwrap();
    extract_id(&response)
}

pub async fn add_member(handler: &WorkboardServerHandler, name: &str, department: &str) -> i64 {
    let response = handler
        .handle_add_team_member(
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            "Engineer".to_string(),
            department.to_string(),
            None,
            None,
        )
        .await
        .unwrap();
    extract_id(&response)
}
