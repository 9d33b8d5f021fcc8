// Picks the scheduled tasks that fall on a given weekday.
use crate::model::schedule::Schedule;
use chrono::Weekday;
use std::fmt;

/// A task that should be added to its list today.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DueItem {
    pub list: String,
    pub task: String,
}

impl DueItem {
    pub fn new(list: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            list: list.into(),
            task: task.into(),
        }
    }
}

impl fmt::Display for DueItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.list, self.task)
    }
}

/// Returns every task whose days include `today`, once per task, in schedule order.
pub fn resolve(schedule: &Schedule, today: Weekday) -> Vec<DueItem> {
    schedule
        .lists()
        .iter()
        .flat_map(|list| {
            list.tasks
                .iter()
                .filter(move |task| task.is_due(today))
                .map(move |task| DueItem::new(&list.name, &task.name))
        })
        .collect()
}
