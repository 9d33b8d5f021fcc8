/*! Loading and validation of the weekly schedule document.

A schedule is a three-level document:

```json
{ "Home": { "Trash": ["Mon", "Thu"], "Laundry": ["Sat"] } }
```

list name → task name → days the task recurs on. Every day token is checked
against a [`DayNames`] table while loading, so a `Schedule` value only ever
holds valid days. Lists and tasks keep the order they have in the document.
*/
use crate::model::weekday::DayNames;
use chrono::Weekday;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub name: String,
    /// In document order. Duplicates are kept.
    pub days: Vec<Weekday>,
}

impl ScheduledTask {
    pub fn is_due(&self, today: Weekday) -> bool {
        self.days.contains(&today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskList {
    pub name: String,
    pub tasks: Vec<ScheduledTask>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    lists: Vec<TaskList>,
}

/// A day token that is not one of the seven accepted abbreviations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDayToken {
    pub list: String,
    pub task: String,
    pub day: String,
}

impl fmt::Display for InvalidDayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unexpected day name '{}' for task '{}' in list '{}'",
            self.day, self.task, self.list
        )
    }
}

#[derive(Debug)]
pub enum ScheduleError {
    Io { path: PathBuf, source: io::Error },
    /// The document is not an object of objects of day arrays.
    Malformed(String),
    InvalidDayToken(InvalidDayToken),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::Io { path, source } => {
                write!(f, "Failed to read schedule '{}': {}", path.display(), source)
            }
            ScheduleError::Malformed(msg) => write!(f, "Malformed schedule: {}", msg),
            ScheduleError::InvalidDayToken(invalid) => write!(f, "{}", invalid),
        }
    }
}

impl std::error::Error for ScheduleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScheduleError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<InvalidDayToken> for ScheduleError {
    fn from(e: InvalidDayToken) -> Self {
        Self::InvalidDayToken(e)
    }
}

// Shape-checked but not yet day-validated view of a document.
struct RawTask<'a> {
    name: &'a str,
    days: Vec<&'a str>,
}

struct RawList<'a> {
    name: &'a str,
    tasks: Vec<RawTask<'a>>,
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, ScheduleError> {
    value.as_object().ok_or_else(|| {
        ScheduleError::Malformed(format!("{} must be an object, found {}", what, kind(value)))
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn walk(doc: &Value) -> Result<Vec<RawList<'_>>, ScheduleError> {
    let mut lists = Vec::new();
    for (list_name, tasks) in as_object(doc, "the schedule")? {
        let tasks_obj = as_object(tasks, &format!("list '{}'", list_name))?;
        let mut raw_tasks = Vec::with_capacity(tasks_obj.len());
        for (task_name, days) in tasks_obj {
            let Value::Array(items) = days else {
                return Err(ScheduleError::Malformed(format!(
                    "days of task '{}' in list '{}' must be an array, found {}",
                    task_name,
                    list_name,
                    kind(days)
                )));
            };
            let mut tokens = Vec::with_capacity(items.len());
            for item in items {
                let token = item.as_str().ok_or_else(|| {
                    ScheduleError::Malformed(format!(
                        "day of task '{}' in list '{}' must be a string, found {}",
                        task_name,
                        list_name,
                        kind(item)
                    ))
                })?;
                tokens.push(token);
            }
            raw_tasks.push(RawTask {
                name: task_name,
                days: tokens,
            });
        }
        lists.push(RawList {
            name: list_name,
            tasks: raw_tasks,
        });
    }
    Ok(lists)
}

fn parse_json(contents: &str) -> Result<Value, ScheduleError> {
    serde_json::from_str(contents)
        .map_err(|e| ScheduleError::Malformed(format!("invalid JSON: {}", e)))
}

fn parse_toml(contents: &str) -> Result<Value, ScheduleError> {
    let table: toml::Table = toml::from_str(contents)
        .map_err(|e| ScheduleError::Malformed(format!("invalid TOML: {}", e)))?;
    serde_json::to_value(table).map_err(|e| ScheduleError::Malformed(e.to_string()))
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Reads a schedule file once and parses it by extension (`.toml`, otherwise JSON).
fn read_document(path: &Path) -> Result<Value, ScheduleError> {
    let contents = fs::read_to_string(path).map_err(|source| ScheduleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if is_toml(path) {
        parse_toml(&contents)
    } else {
        parse_json(&contents)
    }
}

impl Schedule {
    pub fn load_file(path: &Path, names: &DayNames) -> Result<Self, ScheduleError> {
        let doc = read_document(path)?;
        Self::from_value(&doc, names)
    }

    pub fn from_json_str(contents: &str, names: &DayNames) -> Result<Self, ScheduleError> {
        Self::from_value(&parse_json(contents)?, names)
    }

    pub fn from_toml_str(contents: &str, names: &DayNames) -> Result<Self, ScheduleError> {
        Self::from_value(&parse_toml(contents)?, names)
    }

    /// Builds a schedule from an already parsed document.
    ///
    /// Fails on the first invalid day token; nothing is returned for a schedule
    /// that is only partly valid.
    pub fn from_value(doc: &Value, names: &DayNames) -> Result<Self, ScheduleError> {
        let raw = walk(doc)?;
        let mut lists = Vec::with_capacity(raw.len());
        for list in raw {
            let mut tasks = Vec::with_capacity(list.tasks.len());
            for task in list.tasks {
                let days = task
                    .days
                    .iter()
                    .map(|token| {
                        names.parse(token).ok_or_else(|| InvalidDayToken {
                            list: list.name.to_string(),
                            task: task.name.to_string(),
                            day: token.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                tasks.push(ScheduledTask {
                    name: task.name.to_string(),
                    days,
                });
            }
            lists.push(TaskList {
                name: list.name.to_string(),
                tasks,
            });
        }
        Ok(Self { lists })
    }

    /// Every invalid day token in the file, in document order.
    ///
    /// Shape errors still fail immediately since there is nothing to walk past them.
    pub fn lint_file(path: &Path, names: &DayNames) -> Result<Vec<InvalidDayToken>, ScheduleError> {
        let doc = read_document(path)?;
        Self::lint_value(&doc, names)
    }

    pub fn lint_value(doc: &Value, names: &DayNames) -> Result<Vec<InvalidDayToken>, ScheduleError> {
        let mut invalid = Vec::new();
        for list in walk(doc)? {
            for task in &list.tasks {
                for token in task.days.iter().filter(|t| names.parse(t).is_none()) {
                    invalid.push(InvalidDayToken {
                        list: list.name.to_string(),
                        task: task.name.to_string(),
                        day: token.to_string(),
                    });
                }
            }
        }
        Ok(invalid)
    }

    pub fn lists(&self) -> &[TaskList] {
        &self.lists
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.lists.iter().map(|l| l.tasks.len()).sum()
    }
}
