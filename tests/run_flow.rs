// File: tests/run_flow.rs
use anyhow::{Result, bail};
use chrono::Weekday;
use mockito::{Matcher, Server};
use serde_json::json;
use weektodo::config::Config;
use weektodo::context::TestContext;
use weektodo::controller::{self, Outcome, RunOptions, TaskSink};
use weektodo::model::{DayNames, DueItem};

const SCHEDULE: &str = r#"{
    "Home": {"Trash": ["Mon", "Thu"], "Laundry": ["Sat"]},
    "Work": {"Timesheet": ["Fri"], "Inbox zero": ["Mon"]}
}"#;

#[derive(Default)]
struct RecordingSink {
    added: Vec<DueItem>,
    fail_on: Option<String>,
}

impl TaskSink for RecordingSink {
    async fn add(&mut self, item: &DueItem) -> Result<()> {
        if self.fail_on.as_deref() == Some(item.task.as_str()) {
            bail!("remote refused '{}'", item.task);
        }
        self.added.push(item.clone());
        Ok(())
    }
}

#[test]
fn test_plan_from_file() {
    let ctx = TestContext::new();
    let path = ctx.write_data_file("tasks.json", SCHEDULE).unwrap();

    let due = controller::plan(&path, &DayNames::posix(), Weekday::Mon).unwrap();
    assert_eq!(
        due,
        vec![
            DueItem::new("Home", "Trash"),
            DueItem::new("Work", "Inbox zero")
        ]
    );
}

#[test]
fn test_check_lists_all_problems() {
    let ctx = TestContext::new();
    let path = ctx
        .write_data_file("tasks.json", r#"{"A": {"x": ["Mon", "Mo"], "y": ["Sunday"]}}"#)
        .unwrap();
    let invalid = controller::check(&path, &DayNames::posix()).unwrap();
    let days: Vec<&str> = invalid.iter().map(|i| i.day.as_str()).collect();
    assert_eq!(days, vec!["Mo", "Sunday"]);
}

#[tokio::test]
async fn test_sync_pushes_in_order() {
    let items = vec![DueItem::new("Home", "Trash"), DueItem::new("Work", "Inbox zero")];
    let mut sink = RecordingSink::default();

    let report = controller::sync(&items, &mut sink).await.unwrap();

    assert_eq!(report.added, items);
    assert_eq!(sink.added, items);
}

#[tokio::test]
async fn test_sync_stops_at_first_failure() {
    let items = vec![
        DueItem::new("Home", "Trash"),
        DueItem::new("Home", "Broken"),
        DueItem::new("Work", "Inbox zero"),
    ];
    let mut sink = RecordingSink {
        fail_on: Some("Broken".to_string()),
        ..Default::default()
    };

    let err = controller::sync(&items, &mut sink).await.unwrap_err();

    assert_eq!(sink.added, vec![DueItem::new("Home", "Trash")]);
    let msg = format!("{:#}", err);
    assert!(msg.contains("1 of 3 added"), "{}", msg);
    assert!(msg.contains("remote refused"), "{}", msg);
}

#[test]
fn test_resolve_today_override() {
    let names = DayNames::posix();
    assert_eq!(
        controller::resolve_today(&names, Some("Sat")).unwrap(),
        Weekday::Sat
    );
    let err = controller::resolve_today(&names, Some("Caturday")).unwrap_err();
    assert!(err.to_string().contains("Mon, Tue, Wed, Thu, Fri, Sat, Sun"));
}

#[tokio::test]
async fn test_dry_run_needs_no_credentials() {
    let ctx = TestContext::new();
    ctx.write_data_file("tasks.json", SCHEDULE).unwrap();

    let options = RunOptions {
        day: Some("Sat".to_string()),
        dry_run: true,
        ..Default::default()
    };
    let outcome = controller::run(&ctx, &Config::default(), &options)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::DryRun(vec![DueItem::new("Home", "Laundry")])
    );
}

#[tokio::test]
async fn test_nothing_due_skips_remote() {
    let ctx = TestContext::new();
    ctx.write_data_file("tasks.json", SCHEDULE).unwrap();

    // No credentials at all: the run must not try to authenticate.
    let options = RunOptions {
        day: Some("Sun".to_string()),
        ..Default::default()
    };
    let outcome = controller::run(&ctx, &Config::default(), &options)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Synced(Default::default()));
}

#[tokio::test]
async fn test_missing_credentials_is_an_error() {
    let ctx = TestContext::new();
    ctx.write_data_file("tasks.json", SCHEDULE).unwrap();

    let options = RunOptions {
        day: Some("Mon".to_string()),
        ..Default::default()
    };
    let err = controller::run(&ctx, &Config::default(), &options)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("No credentials configured"));
}

#[tokio::test]
async fn test_invalid_schedule_never_reaches_server() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let any_post = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let ctx = TestContext::new();
    let path = ctx
        .write_data_file(
            "bad.json",
            r#"{"Home": {"Trash": ["Mon"]}, "Work": {"Standup": ["Everyday"]}}"#,
        )
        .unwrap();
    let config = Config {
        api_url: server.url(),
        access_token: Some("t".to_string()),
        ..Default::default()
    };
    let options = RunOptions {
        schedule_path: Some(path),
        day: Some("Mon".to_string()),
        dry_run: false,
    };

    let err = controller::run(&ctx, &config, &options).await.unwrap_err();
    assert!(err.to_string().contains("Everyday"));

    any.assert_async().await;
    any_post.assert_async().await;
}

#[tokio::test]
async fn test_full_run_against_mock_server() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(json!({ "access_token": "fresh" }).to_string())
        .expect(1)
        .create_async()
        .await;
    let lists = server
        .mock("GET", "/users/@me/lists")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer fresh")
        .with_status(200)
        .with_body(json!({ "items": [{ "id": "H", "title": "Home" }] }).to_string())
        .expect(1)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/users/@me/lists")
        .match_body(Matcher::PartialJson(json!({ "title": "Work" })))
        .with_status(200)
        .with_body(json!({ "id": "W", "title": "Work" }).to_string())
        .expect(1)
        .create_async()
        .await;
    let home_task = server
        .mock("POST", "/lists/H/tasks")
        .match_body(Matcher::PartialJson(json!({ "title": "Trash" })))
        .with_status(200)
        .with_body(json!({ "id": "1", "title": "Trash" }).to_string())
        .expect(1)
        .create_async()
        .await;
    let work_task = server
        .mock("POST", "/lists/W/tasks")
        .match_body(Matcher::PartialJson(json!({ "title": "Inbox zero" })))
        .with_status(200)
        .with_body(json!({ "id": "2", "title": "Inbox zero" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let ctx = TestContext::new();
    let schedule = ctx
        .write_data_file(
            "week.toml",
            "[Home]\nTrash = [\"Mon\"]\n[Work]\n\"Inbox zero\" = [\"Mon\", \"Tue\"]\n",
        )
        .unwrap();
    let config = Config {
        api_url: server.url(),
        token_url: format!("{}/token", server.url()),
        refresh_token: "rtok".to_string(),
        create_missing_lists: true,
        schedule_path: Some(schedule.to_string_lossy().to_string()),
        ..Default::default()
    };

    let options = RunOptions {
        day: Some("Mon".to_string()),
        ..Default::default()
    };
    let outcome = controller::run(&ctx, &config, &options).await.unwrap();

    match outcome {
        Outcome::Synced(report) => assert_eq!(
            report.added,
            vec![
                DueItem::new("Home", "Trash"),
                DueItem::new("Work", "Inbox zero")
            ]
        ),
        other => panic!("Expected a sync, got {:?}", other),
    }
    token.assert_async().await;
    lists.assert_async().await;
    create.assert_async().await;
    home_task.assert_async().await;
    work_task.assert_async().await;
}
