// Schedule model: day names, the schedule document, due-task resolution and API payloads.
pub mod payload;
pub mod resolver;
pub mod schedule;
pub mod weekday;

pub use payload::{RemoteTask, TaskBody, TaskListBody, TaskListEntry, TaskStatus};
pub use resolver::{DueItem, resolve};
pub use schedule::{InvalidDayToken, Schedule, ScheduleError, ScheduledTask, TaskList};
pub use weekday::DayNames;
