//! Steward CLI library
//!
//! Command definitions, output formatting, and the dispatch loop. The
//! print functions take a `Write` sink so tests can capture output.

pub mod logging;
pub mod store;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use steward_common::{format_date, format_datetime, parse_date, truncate_string};
use steward_core::{
    AdvancedFilterState, CreateTaskRequest, SavedFilter, SavedFilterStore, StewardConfig, Task,
    TaskBoard, TaskPriority, TaskQueryBuilder, TaskStats, TaskStatus, TaskType,
};

use crate::store::{JsonFilterStorage, JsonTaskStore};

/// Saved-filter scope used by the CLI
const FILTER_SCOPE: &str = "board";

#[derive(Parser, Debug)]
#[command(name = "steward")]
#[command(about = "Donor-relations task board and saved filters")]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to ~/.steward)
    #[arg(long, short, env = "STEWARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List tasks
    List {
        /// Filter by status (not_started, in_progress, waiting, completed, deferred)
        #[arg(long)]
        status: Option<String>,
        /// Filter by priority (none, low, medium, high)
        #[arg(long)]
        priority: Option<String>,
        /// Filter by task type (call, email, thank_you, follow_up, visit, other)
        #[arg(long)]
        task_type: Option<String>,
        /// Filter by donor UUID
        #[arg(long)]
        donor: Option<String>,
        /// Case-insensitive text search over title, description, and notes
        #[arg(long, short)]
        search: Option<String>,
        /// Limit number of results
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
        /// Task type (call, email, thank_you, follow_up, visit, other)
        #[arg(long)]
        task_type: Option<String>,
        /// Priority (none, low, medium, high)
        #[arg(long, short)]
        priority: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Donor UUID the task relates to
        #[arg(long)]
        donor: Option<String>,
    },
    /// Move a task to a position within a status column
    Move {
        /// Task UUID
        id: String,
        /// Target status column
        status: String,
        /// Zero-based position within the column
        index: usize,
    },
    /// Mark a task completed
    Complete {
        /// Task UUID
        id: String,
    },
    /// Reopen a completed task
    Reopen {
        /// Task UUID
        id: String,
    },
    /// Delete a task permanently
    Delete {
        /// Task UUID
        id: String,
    },
    /// Show board statistics
    Stats,
    /// Manage saved filters
    Filters {
        #[command(subcommand)]
        command: FilterCommand,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum FilterCommand {
    /// Save a filter state under a name
    Save {
        /// Filter name
        name: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Filter state as JSON; defaults to an empty state
        #[arg(long)]
        state: Option<String>,
    },
    /// List saved filters
    List,
    /// Show a saved filter as JSON
    Show {
        /// Filter UUID
        id: String,
    },
    /// Delete a saved filter
    Delete {
        /// Filter UUID
        id: String,
    },
    /// Mark a saved filter as the default
    SetDefault {
        /// Filter UUID
        id: String,
    },
    /// Clear the default filter
    ClearDefault,
}

/// Parse a status name as used on the wire
///
/// # Errors
/// Returns an error for unknown names
pub fn parse_status(value: &str) -> anyhow::Result<TaskStatus> {
    match value {
        "not_started" => Ok(TaskStatus::NotStarted),
        "in_progress" => Ok(TaskStatus::InProgress),
        "waiting" => Ok(TaskStatus::Waiting),
        "completed" => Ok(TaskStatus::Completed),
        "deferred" => Ok(TaskStatus::Deferred),
        other => bail!("unknown status: {other}"),
    }
}

/// Parse a priority name
///
/// # Errors
/// Returns an error for unknown names
pub fn parse_priority(value: &str) -> anyhow::Result<TaskPriority> {
    match value {
        "none" => Ok(TaskPriority::None),
        "low" => Ok(TaskPriority::Low),
        "medium" => Ok(TaskPriority::Medium),
        "high" => Ok(TaskPriority::High),
        other => bail!("unknown priority: {other}"),
    }
}

/// Parse a task type name
///
/// # Errors
/// Returns an error for unknown names
pub fn parse_task_type(value: &str) -> anyhow::Result<TaskType> {
    match value {
        "call" => Ok(TaskType::Call),
        "email" => Ok(TaskType::Email),
        "thank_you" => Ok(TaskType::ThankYou),
        "follow_up" => Ok(TaskType::FollowUp),
        "visit" => Ok(TaskType::Visit),
        "other" => Ok(TaskType::Other),
        unknown => bail!("unknown task type: {unknown}"),
    }
}

fn parse_id(value: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(value).with_context(|| format!("invalid UUID: {value}"))
}

fn parse_due(value: &str) -> anyhow::Result<NaiveDate> {
    parse_date(value).with_context(|| format!("invalid date: {value}"))
}

const fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::NotStarted => "not started",
        TaskStatus::InProgress => "in progress",
        TaskStatus::Waiting => "waiting",
        TaskStatus::Completed => "completed",
        TaskStatus::Deferred => "deferred",
    }
}

/// Print tasks to the given writer
///
/// # Errors
/// Returns an error if writing fails
pub fn print_tasks<W: Write>(tasks: &[&Task], writer: &mut W) -> anyhow::Result<()> {
    if tasks.is_empty() {
        writeln!(writer, "No tasks found")?;
        return Ok(());
    }

    writeln!(writer, "Found {} tasks:", tasks.len())?;
    for task in tasks {
        writeln!(writer, "  • {} ({})", task.title, status_label(task.status))?;
        writeln!(writer, "    Id: {}", task.id)?;
        if let Some(description) = &task.description {
            writeln!(writer, "    Description: {}", truncate_string(description, 80))?;
        }
        if let Some(due) = &task.due_date {
            writeln!(writer, "    Due: {}", format_date(due))?;
        }
        if task.priority != TaskPriority::None {
            writeln!(writer, "    Priority: {:?}", task.priority)?;
        }
        if let Some(donor) = &task.donor {
            writeln!(writer, "    Donor: {}", donor.name)?;
        }
        if let Some(completed_at) = &task.completed_at {
            writeln!(writer, "    Completed: {}", format_datetime(completed_at))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Print board statistics to the given writer
///
/// # Errors
/// Returns an error if writing fails
pub fn print_stats<W: Write>(stats: &TaskStats, writer: &mut W) -> anyhow::Result<()> {
    writeln!(writer, "Tasks: {}", stats.total)?;
    writeln!(writer, "  Not started:   {}", stats.not_started)?;
    writeln!(writer, "  In progress:   {}", stats.in_progress)?;
    writeln!(writer, "  Completed:     {}", stats.completed)?;
    writeln!(writer, "  Overdue:       {}", stats.overdue)?;
    writeln!(writer, "  Due today:     {}", stats.due_today)?;
    writeln!(writer, "  High priority: {}", stats.high_priority)?;
    Ok(())
}

/// Print saved filters to the given writer
///
/// # Errors
/// Returns an error if writing fails
pub fn print_saved_filters<W: Write>(
    filters: &[SavedFilter],
    writer: &mut W,
) -> anyhow::Result<()> {
    if filters.is_empty() {
        writeln!(writer, "No saved filters")?;
        return Ok(());
    }

    writeln!(writer, "Found {} saved filters:", filters.len())?;
    for filter in filters {
        let marker = if filter.is_default { " (default)" } else { "" };
        writeln!(writer, "  • {}{marker}", filter.name)?;
        writeln!(writer, "    Id: {}", filter.id)?;
        if let Some(description) = &filter.description {
            writeln!(writer, "    Description: {description}")?;
        }
        writeln!(
            writer,
            "    Conditions: {} ({:?})",
            filter.filter.conditions.len(),
            filter.filter.logic
        )?;
    }
    Ok(())
}

fn open_board(config: &StewardConfig) -> anyhow::Result<TaskBoard<JsonTaskStore>> {
    let store = JsonTaskStore::open(config)?;
    // The JSON data file is single-user; the owner id is a formality here
    Ok(TaskBoard::new(store, Uuid::nil()))
}

async fn loaded_board(config: &StewardConfig) -> anyhow::Result<TaskBoard<JsonTaskStore>> {
    let board = open_board(config)?;
    if !board.refresh().await {
        bail!("failed to load tasks from {}", config.tasks_file().display());
    }
    Ok(board)
}

fn open_filters(config: &StewardConfig) -> anyhow::Result<SavedFilterStore<JsonFilterStorage>> {
    let storage = JsonFilterStorage::open(config)?;
    Ok(SavedFilterStore::new(storage, FILTER_SCOPE))
}

/// Execute one command against the configured data directory
///
/// # Errors
/// Returns an error for invalid arguments, unknown ids, or persistence
/// failures.
pub async fn run<W: Write>(
    command: Commands,
    config: &StewardConfig,
    writer: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::List {
            status,
            priority,
            task_type,
            donor,
            search,
            limit,
        } => {
            let board = loaded_board(config).await?;

            let mut builder = TaskQueryBuilder::new();
            if let Some(status) = status {
                builder = builder.status(parse_status(&status)?);
            }
            if let Some(priority) = priority {
                builder = builder.priority(parse_priority(&priority)?);
            }
            if let Some(task_type) = task_type {
                builder = builder.task_type(parse_task_type(&task_type)?);
            }
            if let Some(donor) = donor {
                builder = builder.donor(parse_id(&donor)?);
            }
            if let Some(search) = search {
                builder = builder.search(&search);
            }
            if let Some(limit) = limit {
                builder = builder.limit(limit);
            }
            let filters = builder.build();

            let tasks = board.tasks();
            print_tasks(&filters.apply(&tasks), writer)?;
        }
        Commands::Add {
            title,
            description,
            task_type,
            priority,
            due,
            donor,
        } => {
            let board = loaded_board(config).await?;

            let mut request = CreateTaskRequest::new(title);
            request.description = description;
            if let Some(task_type) = task_type {
                request.task_type = Some(parse_task_type(&task_type)?);
            }
            if let Some(priority) = priority {
                request.priority = Some(parse_priority(&priority)?);
            }
            if let Some(due) = due {
                request.due_date = Some(parse_due(&due)?);
            }
            if let Some(donor) = donor {
                request.donor_id = Some(parse_id(&donor)?);
            }

            match board.create_task(request).await {
                Some(task) => writeln!(writer, "Created task {}", task.id)?,
                None => bail!("failed to create task"),
            }
        }
        Commands::Move { id, status, index } => {
            let board = loaded_board(config).await?;
            let id = parse_id(&id)?;
            let status = parse_status(&status)?;
            if !board.move_task(id, status, index).await {
                bail!("failed to move task {id}");
            }
            writeln!(writer, "Moved task {id}")?;
        }
        Commands::Complete { id } => {
            let board = loaded_board(config).await?;
            let id = parse_id(&id)?;
            if !board.complete_task(id).await {
                bail!("failed to complete task {id}");
            }
            writeln!(writer, "Completed task {id}")?;
        }
        Commands::Reopen { id } => {
            let board = loaded_board(config).await?;
            let id = parse_id(&id)?;
            if !board.reopen_task(id).await {
                bail!("failed to reopen task {id}");
            }
            writeln!(writer, "Reopened task {id}")?;
        }
        Commands::Delete { id } => {
            let board = loaded_board(config).await?;
            let id = parse_id(&id)?;
            if !board.delete_task(id).await {
                bail!("failed to delete task {id}");
            }
            writeln!(writer, "Deleted task {id}")?;
        }
        Commands::Stats => {
            let board = loaded_board(config).await?;
            print_stats(&board.stats(Local::now().date_naive()), writer)?;
        }
        Commands::Filters { command } => run_filters(command, config, writer)?,
    }
    Ok(())
}

fn run_filters<W: Write>(
    command: FilterCommand,
    config: &StewardConfig,
    writer: &mut W,
) -> anyhow::Result<()> {
    let store = open_filters(config)?;
    match command {
        FilterCommand::Save {
            name,
            description,
            state,
        } => {
            let state = match state {
                Some(raw) => {
                    serde_json::from_str::<AdvancedFilterState>(&raw)
                        .context("invalid filter state JSON")?
                }
                None => AdvancedFilterState::default(),
            };
            match store.save_filter(&name, description, state) {
                Some(saved) => writeln!(writer, "Saved filter '{}' ({})", saved.name, saved.id)?,
                None => bail!("failed to save filter (is the name empty?)"),
            }
        }
        FilterCommand::List => print_saved_filters(&store.filters(), writer)?,
        FilterCommand::Show { id } => {
            let id = parse_id(&id)?;
            let Some(filter) = store.get(id) else {
                bail!("no saved filter with id {id}");
            };
            writeln!(writer, "{}", serde_json::to_string_pretty(&filter)?)?;
        }
        FilterCommand::Delete { id } => {
            let id = parse_id(&id)?;
            if !store.delete_filter(id) {
                bail!("failed to delete filter {id}");
            }
            writeln!(writer, "Deleted filter {id}")?;
        }
        FilterCommand::SetDefault { id } => {
            let id = parse_id(&id)?;
            if !store.set_default(Some(id)) {
                bail!("failed to set default filter {id}");
            }
            writeln!(writer, "Default filter set to {id}")?;
        }
        FilterCommand::ClearDefault => {
            if !store.set_default(None) {
                bail!("failed to clear default filter");
            }
            writeln!(writer, "Default filter cleared")?;
        }
    }
    Ok(())
}
