// File: tests/schedule_loading.rs
use chrono::Weekday;
use std::path::PathBuf;
use weektodo::context::TestContext;
use weektodo::model::{DayNames, InvalidDayToken, Schedule, ScheduleError};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn names() -> DayNames {
    DayNames::posix()
}

#[test]
fn test_good_fixture_loads() {
    let schedule = Schedule::load_file(&fixture("tasks_good.json"), &names()).unwrap();

    let list_names: Vec<&str> = schedule.lists().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(list_names, vec!["Home", "Work", "Someday"]);
    assert_eq!(schedule.task_count(), 6);

    let home = &schedule.lists()[0];
    let task_names: Vec<&str> = home.tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(task_names, vec!["Trash", "Laundry", "Water plants"]);
    assert_eq!(home.tasks[0].days, vec![Weekday::Mon, Weekday::Thu]);

    let someday = &schedule.lists()[2];
    assert!(someday.tasks[0].days.is_empty());
}

#[test]
fn test_bad_fixture_is_rejected() {
    let err = Schedule::load_file(&fixture("tasks_bad.json"), &names()).unwrap_err();
    match err {
        ScheduleError::InvalidDayToken(invalid) => {
            assert_eq!(
                invalid,
                InvalidDayToken {
                    list: "Work".to_string(),
                    task: "Standup".to_string(),
                    day: "Everyday".to_string(),
                }
            );
        }
        other => panic!("Expected InvalidDayToken, got {:?}", other),
    }
}

#[test]
fn test_invalid_token_message_names_location() {
    let err = Schedule::from_json_str(r#"{"Work": {"Standup": ["Everyday"]}}"#, &names())
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Everyday"), "{}", msg);
    assert!(msg.contains("Standup"), "{}", msg);
    assert!(msg.contains("Work"), "{}", msg);
}

#[test]
fn test_invalid_token_after_valid_lists_still_fails() {
    // The bad token sits in the last list; nothing from the earlier lists leaks out.
    let doc = r#"{
        "A": {"one": ["Mon"]},
        "B": {"two": ["Tue"]},
        "C": {"three": ["Wed", "Thursday"]}
    }"#;
    let result = Schedule::from_json_str(doc, &names());
    assert!(matches!(result, Err(ScheduleError::InvalidDayToken(ref t)) if t.day == "Thursday"));
}

#[test]
fn test_day_tokens_are_case_sensitive() {
    let result = Schedule::from_json_str(r#"{"Home": {"Trash": ["mon"]}}"#, &names());
    assert!(matches!(result, Err(ScheduleError::InvalidDayToken(_))));
}

#[test]
fn test_duplicate_days_are_kept() {
    let schedule =
        Schedule::from_json_str(r#"{"Home": {"Trash": ["Mon", "Mon"]}}"#, &names()).unwrap();
    assert_eq!(
        schedule.lists()[0].tasks[0].days,
        vec![Weekday::Mon, Weekday::Mon]
    );
}

#[test]
fn test_empty_schedule() {
    let schedule = Schedule::from_json_str("{}", &names()).unwrap();
    assert!(schedule.is_empty());
    assert_eq!(schedule.task_count(), 0);
}

#[test]
fn test_malformed_shapes() {
    let cases = [
        ("[]", "top level array"),
        (r#""Mon""#, "top level string"),
        (r#"{"Home": ["Mon"]}"#, "list is an array"),
        (r#"{"Home": "Trash"}"#, "list is a string"),
        (r#"{"Home": {"Trash": "Mon"}}"#, "days is a string"),
        (r#"{"Home": {"Trash": {"Mon": true}}}"#, "days is an object"),
        (r#"{"Home": {"Trash": null}}"#, "days is null"),
        (r#"{"Home": {"Trash": [1, 2]}}"#, "day is a number"),
        (r#"{"Home": {"Trash": [["Mon"]]}}"#, "day is nested"),
        (r#"{"Home": {"Trash": ["Mon"]"#, "truncated"),
        ("", "empty input"),
    ];
    for (doc, label) in cases {
        let result = Schedule::from_json_str(doc, &names());
        assert!(
            matches!(result, Err(ScheduleError::Malformed(_))),
            "{}: expected Malformed, got {:?}",
            label,
            result
        );
    }
}

#[test]
fn test_shape_error_wins_over_bad_day() {
    // A shape problem anywhere rejects the document before any day is looked at.
    let doc = r#"{"Work": {"Standup": ["Everyday"]}, "Home": {"Trash": "Mon"}}"#;
    let result = Schedule::from_json_str(doc, &names());
    assert!(matches!(result, Err(ScheduleError::Malformed(_))));
}

#[test]
fn test_malformed_message_points_at_task() {
    let err = Schedule::from_json_str(r#"{"Home": {"Trash": "Mon"}}"#, &names()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Trash") && msg.contains("Home"), "{}", msg);
    assert!(msg.contains("a string"), "{}", msg);
}

#[test]
fn test_missing_file_is_io_error() {
    let ctx = TestContext::new();
    let path = ctx.root.join("nope.json");
    let err = Schedule::load_file(&path, &names()).unwrap_err();
    assert!(matches!(err, ScheduleError::Io { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn test_toml_schedule_keeps_document_order() {
    let schedule = Schedule::load_file(&fixture("tasks_good.toml"), &names()).unwrap();
    let list_names: Vec<&str> = schedule.lists().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(list_names, vec!["Work", "Home"]);
    assert_eq!(schedule.lists()[0].tasks[1].name, "Standup notes");
    assert_eq!(schedule.lists()[0].tasks[1].days.len(), 5);
}

#[test]
fn test_toml_shape_errors() {
    let result = Schedule::from_toml_str("Home = [\"Mon\"]", &names());
    assert!(matches!(result, Err(ScheduleError::Malformed(_))));

    let result = Schedule::from_toml_str("[Home]\nTrash = \"Mon\"", &names());
    assert!(matches!(result, Err(ScheduleError::Malformed(_))));

    let result = Schedule::from_toml_str("[Home\n", &names());
    assert!(matches!(result, Err(ScheduleError::Malformed(_))));
}

#[test]
fn test_extension_picks_parser() {
    let ctx = TestContext::new();
    let toml_path = ctx
        .write_data_file("week.TOML", "[Home]\nTrash = [\"Mon\"]\n")
        .unwrap();
    assert!(Schedule::load_file(&toml_path, &names()).is_ok());

    // Same content under a non-TOML name goes through the JSON parser.
    let txt_path = ctx
        .write_data_file("week.txt", "[Home]\nTrash = [\"Mon\"]\n")
        .unwrap();
    assert!(matches!(
        Schedule::load_file(&txt_path, &names()),
        Err(ScheduleError::Malformed(_))
    ));
}

#[test]
fn test_lint_reports_every_bad_token() {
    let invalid = Schedule::lint_file(&fixture("tasks_bad.json"), &names()).unwrap();
    let found: Vec<(&str, &str, &str)> = invalid
        .iter()
        .map(|i| (i.list.as_str(), i.task.as_str(), i.day.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![("Work", "Standup", "Everyday"), ("Work", "Review", "tue")]
    );
}

#[test]
fn test_lint_clean_schedule() {
    let invalid = Schedule::lint_file(&fixture("tasks_good.json"), &names()).unwrap();
    assert!(invalid.is_empty());
}

#[test]
fn test_lint_still_rejects_bad_shape() {
    let doc: serde_json::Value = serde_json::json!({"Home": {"Trash": 3}});
    let result = Schedule::lint_value(&doc, &names());
    assert!(matches!(result, Err(ScheduleError::Malformed(_))));
}
