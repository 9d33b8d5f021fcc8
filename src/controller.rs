// File: ./src/controller.rs
// Orchestrates a run: load and validate the schedule, resolve today's tasks, push them.
use crate::client::{TasksClient, fetch_access_token};
use crate::config::Config;
use crate::context::AppContext;
use crate::model::weekday;
use crate::model::{DayNames, DueItem, InvalidDayToken, Schedule, resolve};
use anyhow::{Context, Result, anyhow, bail};
use chrono::Weekday;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Something due items can be pushed to.
pub trait TaskSink {
    fn add(&mut self, item: &DueItem) -> impl Future<Output = Result<()>>;
}

impl TaskSink for TasksClient {
    async fn add(&mut self, item: &DueItem) -> Result<()> {
        let created = self.add_task(&item.list, &item.task).await?;
        log::debug!("Task '{}' created with id {}", created.title, created.id);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Overrides the configured schedule location.
    pub schedule_path: Option<PathBuf>,
    /// Day abbreviation to use instead of today's.
    pub day: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: Vec<DueItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was sent; these are the items a real run would add.
    DryRun(Vec<DueItem>),
    Synced(SyncReport),
}

/// Loads and validates the whole schedule, then resolves it for `today`.
pub fn plan(path: &Path, names: &DayNames, today: Weekday) -> Result<Vec<DueItem>> {
    let schedule = Schedule::load_file(path, names)?;
    log::info!(
        "Loaded {} task(s) in {} list(s) from {}",
        schedule.task_count(),
        schedule.lists().len(),
        path.display()
    );
    let due = resolve(&schedule, today);
    log::info!("{} task(s) due on {}", due.len(), names.abbreviation(today));
    Ok(due)
}

/// Every invalid day token in the schedule file.
pub fn check(path: &Path, names: &DayNames) -> Result<Vec<InvalidDayToken>> {
    Ok(Schedule::lint_file(path, names)?)
}

/// Pushes `items` in order, stopping at the first failure.
pub async fn sync<S: TaskSink>(items: &[DueItem], sink: &mut S) -> Result<SyncReport> {
    let mut report = SyncReport::default();
    for item in items {
        sink.add(item).await.with_context(|| {
            format!(
                "Failed to add '{}' to '{}' ({} of {} added)",
                item.task,
                item.list,
                report.added.len(),
                items.len()
            )
        })?;
        log::info!("Added '{}' to '{}'", item.task, item.list);
        report.added.push(item.clone());
    }
    Ok(report)
}

pub fn resolve_today(names: &DayNames, day: Option<&str>) -> Result<Weekday> {
    match day {
        Some(token) => names.parse(token).ok_or_else(|| {
            anyhow!("Unknown day '{}', expected one of: {}", token, names.expected())
        }),
        None => Ok(weekday::today()),
    }
}

/// An access token from the config, or one obtained with the refresh token.
pub async fn access_token(config: &Config, ctx: &dyn AppContext) -> Result<String> {
    if let Some(token) = config.access_token.as_deref().filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }
    if !config.has_credentials() {
        bail!(
            "No credentials configured; set refresh_token (or access_token) in {}",
            Config::get_path_string(ctx)?
        );
    }
    let token = fetch_access_token(&config.token_url, &config.credentials()).await?;
    Ok(token.access_token)
}

pub async fn run(ctx: &dyn AppContext, config: &Config, options: &RunOptions) -> Result<Outcome> {
    let names = config.day_names()?;
    let today = resolve_today(&names, options.day.as_deref())?;
    let path = match &options.schedule_path {
        Some(p) => p.clone(),
        None => config.schedule_path(ctx)?,
    };

    let due = plan(&path, &names, today)?;
    if options.dry_run {
        return Ok(Outcome::DryRun(due));
    }
    if due.is_empty() {
        return Ok(Outcome::Synced(SyncReport::default()));
    }

    let token = access_token(config, ctx).await?;
    let mut client =
        TasksClient::new(&config.api_url, &token)?.with_create_missing(config.create_missing_lists);
    let report = sync(&due, &mut client).await?;
    Ok(Outcome::Synced(report))
}
