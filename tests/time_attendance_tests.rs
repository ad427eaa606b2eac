//! Team, attendance and time tracking tool tests
mod common;

use common::{add_member, create_project, extract_id, get_test_handler, get_test_handler_with};

#[tokio::test]
async fn test_team_directory_and_stats() {
    let (handler, _dir) = get_test_handler();
    add_member(&handler, "Zoe", "Product").await;
    add_member(&handler, "Adam", "Engineering").await;
    add_member(&handler, "Bea", "Engineering").await;

    let duplicate = handler
        .handle_add_team_member(
            "Zoe Again".to_string(),
            "ZOE@example.com".to_string(),
            "Designer".to_string(),
            "Product".to_string(),
            None,
            None,
        )
        .await;
    assert!(duplicate.is_err());

    let engineers = handler
        .handle_list_team(None, Some("Engineering".to_string()))
        .await
        .unwrap();
    assert!(engineers.contains("Found 2 team member(s)"));
    assert!(engineers.find("Adam").unwrap() < engineers.find("Bea").unwrap());

    let stats = handler.handle_team_stats().await.unwrap();
    assert!(stats.contains("Team (3 member(s), 3 active)"));
    assert!(stats.contains("  Engineering: 2"));
}

#[tokio::test]
async fn test_check_in_late_and_check_out() {
    let (handler, _dir) = get_test_handler();
    let member = add_member(&handler, "Ada", "Engineering").await;

    let response = handler
        .handle_check_in(Some(member), Some("2025-03-10".to_string()), Some("09:20".to_string()))
        .await
        .unwrap();
    assert!(response.contains("(Late)"));

    let again = handler
        .handle_check_in(Some(member), Some("2025-03-10".to_string()), Some("09:30".to_string()))
        .await;
    assert!(again.is_err());

    let out = handler
        .handle_check_out(Some(member), Some("2025-03-10".to_string()), Some("17:50".to_string()))
        .await
        .unwrap();
    assert!(out.contains("worked 8h 30m"));

    let never = handler
        .handle_check_out(Some(member), Some("2025-03-11".to_string()), Some("17:00".to_string()))
        .await;
    assert!(never.is_err());

    handler
        .handle_check_in(Some(member), Some("2025-03-11".to_string()), Some("08:45".to_string()))
        .await
        .unwrap();

    let summary = handler
        .handle_attendance_summary(
            Some(member),
            Some("2025-03-01".to_string()),
            Some("2025-03-31".to_string()),
        )
        .await
        .unwrap();
    assert!(summary.contains("Attendance (2 record(s))"));
    assert!(summary.contains("Attendance rate: 100%"));
    assert!(summary.contains("  Late: 1"));
    assert!(summary.contains("  Present: 1"));
}

#[tokio::test]
async fn test_check_in_without_member_or_current_user_fails() {
    let (handler, _dir) = get_test_handler();
    assert!(handler.handle_check_in(None, None, None).await.is_err());
    assert!(handler.handle_check_in(Some(5), None, None).await.is_err());
}

#[tokio::test]
async fn test_log_time_and_summary() {
    let (handler, _dir) = get_test_handler();
    let project = create_project(&handler, "Apollo", None).await;

    let from_span = handler
        .handle_log_time(
            Some("2025-03-10".to_string()),
            Some(project),
            None,
            Some("Design review".to_string()),
            Some("09:00".to_string()),
            Some("10:30".to_string()),
            None,
            None,
            None,
            None,
        )
        .await
        .unwrap();
    assert!(from_span.contains("1h 30m"));
    assert!(from_span.contains("Pending"));

    let explicit = handler
        .handle_log_time(
            Some("2025-03-11".to_string()),
            None,
            None,
            Some("Email".to_string()),
            None,
            None,
            Some(30),
            Some(false),
            None,
            None,
        )
        .await
        .unwrap();
    let explicit_id = extract_id(&explicit);

    let missing = handler
        .handle_log_time(
            None,
            None,
            None,
            None,
            Some("09:00".to_string()),
            None,
            None,
            None,
            None,
            None,
        )
        .await;
    assert!(missing.is_err());

    let backwards = handler
        .handle_log_time(
            None,
            None,
            None,
            None,
            Some("11:00".to_string()),
            Some("10:00".to_string()),
            None,
            None,
            None,
            None,
        )
        .await;
    assert!(backwards.is_err());

    handler
        .handle_review_time_entry(explicit_id, "approved".to_string())
        .await
        .unwrap();
    assert!(
        handler
            .handle_review_time_entry(explicit_id, "maybe".to_string())
            .await
            .is_err()
    );

    let summary = handler
        .handle_time_summary(None, None, None, None)
        .await
        .unwrap();
    assert!(summary.contains("Total: 2h"));
    assert!(summary.contains("Billable: 1h 30m (75%)"));
    assert!(summary.contains("  Approved: 1"));

    let listed = handler
        .handle_list_time_entries(None, None, None, None, Some("Approved".to_string()), None, None)
        .await
        .unwrap();
    assert!(listed.contains("Email"));
    assert!(!listed.contains("Design review"));

    let searched = handler
        .handle_list_time_entries(None, None, None, None, None, Some("REVIEW".to_string()), None)
        .await
        .unwrap();
    assert!(searched.contains("Design review"));
    assert!(searched.contains("09:00-10:30"));
}

#[tokio::test]
async fn test_timer_lifecycle() {
    let (handler, _dir) = get_test_handler();

    assert_eq!(
        handler.handle_timer("status".to_string(), None, None, None, None).await.unwrap(),
        "No timer is running"
    );
    assert!(handler.handle_timer("stop".to_string(), None, None, None, None).await.is_err());
    assert!(handler.handle_timer("rewind".to_string(), None, None, None, None).await.is_err());

    handler
        .handle_timer("start".to_string(), None, None, Some("Focus block".to_string()), None)
        .await
        .unwrap();
    assert!(handler.handle_timer("start".to_string(), None, None, None, None).await.is_err());

    let paused = handler
        .handle_timer("pause".to_string(), None, None, None, None)
        .await
        .unwrap();
    assert!(paused.starts_with("Timer paused"));
    let status = handler
        .handle_timer("status".to_string(), None, None, None, None)
        .await
        .unwrap();
    assert!(status.starts_with("Timer paused"));

    let stopped = handler
        .handle_timer("stop".to_string(), None, None, None, None)
        .await
        .unwrap();
    assert!(stopped.contains("logged as time entry 1"));

    let entries = handler
        .handle_list_time_entries(None, None, None, None, None, None, None)
        .await
        .unwrap();
    assert!(entries.contains("Focus block"));
}

#[tokio::test]
async fn test_running_timer_is_logged_on_drop() {
    let (handler, dir) = get_test_handler();
    handler
        .handle_timer("start".to_string(), None, None, Some("Left running".to_string()), None)
        .await
        .unwrap();
    drop(handler);

    let (reopened, _) = get_test_handler_with(|_, config| {
        config.database = dir.path().join("board.sqlite");
    });
    let entries = reopened
        .handle_list_time_entries(None, None, None, None, None, None, None)
        .await
        .unwrap();
    assert!(entries.contains("Left running"));
}

#[tokio::test]
async fn test_pomodoro_uses_configured_lengths() {
    let (handler, _dir) = get_test_handler_with(|_, config| {
        config.pomodoro.work_minutes = 50;
    });
    assert_eq!(
        handler.handle_pomodoro("status".to_string()).await.unwrap(),
        "No pomodoro is running"
    );
    let started = handler.handle_pomodoro("start".to_string()).await.unwrap();
    assert!(started.contains("50m work"));
    let status = handler.handle_pomodoro("status".to_string()).await.unwrap();
    assert!(status.starts_with("Work:"));
    let stopped = handler.handle_pomodoro("stop".to_string()).await.unwrap();
    assert!(stopped.contains("0 work session(s)"));
    assert!(handler.handle_pomodoro("snooze".to_string()).await.is_err());
}

#[tokio::test]
async fn test_current_user_from_config() {
    let (handler, dir) = get_test_handler();
    add_member(&handler, "Ada", "Engineering").await;
    drop(handler);

    let (handler, _) = get_test_handler_with(|_, config| {
        config.database = dir.path().join("board.sqlite");
        config.current_user = Some("ADA@example.com".to_string());
    });
    let checked_in = handler
        .handle_check_in(None, Some("2025-03-10".to_string()), Some("08:00".to_string()))
        .await
        .unwrap();
    assert!(checked_in.contains("Member 1 checked in"));
    assert!(checked_in.contains("(Present)"));

    let settings = handler.handle_settings().await.unwrap();
    assert!(settings.contains("Current user: Ada <ada@example.com>"));
}

#[tokio::test]
async fn test_activity_feed() {
    let (handler, _dir) = get_test_handler();
    assert_eq!(
        handler.handle_activity_feed(None, None).await.unwrap(),
        "No recent activity"
    );
    create_project(&handler, "Apollo", None).await;
    handler
        .handle_log_time(
            None,
            None,
            None,
            Some("Standup".to_string()),
            None,
            None,
            Some(15),
            None,
            None,
            None,
        )
        .await
        .unwrap();

    let feed = handler.handle_activity_feed(Some(10), None).await.unwrap();
    assert!(feed.contains("Recent activity (2)"));
    assert!(feed.contains("created project: Apollo"));
    assert!(feed.contains("logged time: 15 min on Standup"));
    assert!(handler.handle_activity_feed(Some(0), None).await.is_err());
}

#[tokio::test]
async fn test_activity_feed_orders_time_by_logging_moment() {
    let (handler, _dir) = get_test_handler();
    let logged_in_order = [
        ("2025-03-10", "Sprint planning"),
        ("2025-03-01", "Late expense notes"),
    ];
    for (date, description) in logged_in_order {
        handler
            .handle_log_time(
                Some(date.to_string()),
                None,
                None,
                Some(description.to_string()),
                None,
                None,
                Some(30),
                None,
                None,
                None,
            )
            .await
            .unwrap();
    }

    let feed = handler.handle_activity_feed(Some(1), None).await.unwrap();
    assert!(feed.contains("Recent activity (1)"));
    assert!(feed.contains("Late expense notes"));
    assert!(!feed.contains("Sprint planning"));
}

#[tokio::test]
async fn test_log_time_rejects_more_than_a_day() {
    let (handler, _dir) = get_test_handler();
    let huge = handler
        .handle_log_time(
            None,
            None,
            None,
            None,
            None,
            None,
            Some(i64::MAX),
            None,
            None,
            None,
        )
        .await;
    assert!(huge.is_err());
    let over = handler
        .handle_log_time(
            None,
            None,
            None,
            None,
            None,
            None,
            Some(24 * 60 + 1),
            None,
            None,
            None,
        )
        .await;
    assert!(over.is_err());

    handler
        .handle_log_time(
            None,
            None,
            None,
            None,
            None,
            None,
            Some(24 * 60),
            None,
            None,
            None,
        )
        .await
        .unwrap();
    handler
        .handle_log_time(
            None,
            None,
            None,
            None,
            None,
            None,
            Some(1),
            None,
            None,
            None,
        )
        .await
        .unwrap();

    let summary = handler
        .handle_time_summary(None, None, None, None)
        .await
        .unwrap();
    assert!(summary.contains("Total: 24h 1m"));
}

#[tokio::test]
async fn test_current_user_setting_switches_and_persists() {
    let (handler, dir) = get_test_handler();
    add_member(&handler, "Ada", "Engineering").await;
    let grace = add_member(&handler, "Grace", "Engineering").await;

    assert!(
        handler
            .handle_set_setting("current_user".to_string(), "nobody@example.com".to_string())
            .await
            .is_err()
    );
    handler
        .handle_set_setting("current_user".to_string(), " GRACE@example.com ".to_string())
        .await
        .unwrap();
    let checked_in = handler
        .handle_check_in(None, Some("2025-03-10".to_string()), Some("08:30".to_string()))
        .await
        .unwrap();
    assert!(checked_in.contains(&format!("Member {} checked in", grace)));
    drop(handler);

    let (reopened, _) = get_test_handler_with(|_, config| {
        config.database = dir.path().join("board.sqlite");
    });
    let settings = reopened.handle_settings().await.unwrap();
    assert!(settings.contains("Current user: Grace <grace@example.com>"));
    assert!(settings.contains("current_user = grace@example.com"));
}
