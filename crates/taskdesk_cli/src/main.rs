//! Command-line launcher for the TaskDesk store.
//!
//! # Responsibility
//! - Resolve config from the environment, start logging and initialize the
//!   store before any command runs.
//! - Run one command and print plain-text results.

use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use taskdesk_core::{
    init_logging_from_config, Category, CategoryId, Language, Priority, Status, StoreConfig, Task,
    TaskId, TaskListQuery, TaskStore,
};

#[derive(Parser, Debug)]
#[command(name = "taskdesk", version, about = "Personal task tracker")]
struct Cli {
    /// Data file path; overrides TASKDESK_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Check that the core library is linked.
    Ping,
    /// List tasks, optionally filtered.
    List {
        #[arg(long)]
        category: Option<CategoryId>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Add a task.
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
        /// Due date as YYYY-MM-DD.
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        category: Option<CategoryId>,
    },
    /// Search task titles and descriptions.
    Search { text: String },
    /// Mark a task as completed.
    Done { id: TaskId },
    /// Delete a task.
    Delete { id: TaskId },
    /// List categories.
    Categories,
    /// Add a category.
    AddCategory {
        name: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category; its tasks become uncategorized.
    DeleteCategory { id: CategoryId },
    /// Show total/completed counters.
    Stats,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Pending,
    InProgress,
    Completed,
}

impl From<StatusArg> for Status {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => Status::Pending,
            StatusArg::InProgress => Status::InProgress,
            StatusArg::Completed => Status::Completed,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = StoreConfig::from_env();
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }

    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    if let Commands::Ping = cli.command {
        println!("taskdesk_core ping={}", taskdesk_core::ping());
        println!("taskdesk_core version={}", taskdesk_core::core_version());
        return ExitCode::SUCCESS;
    }

    let store = TaskStore::from_config(&config);
    if let Err(err) = store.initialize() {
        error!("event=cli_start module=cli status=error error={err}");
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match run(&store, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(store: &TaskStore, command: Commands) -> Result<(), String> {
    match command {
        Commands::Ping => {}
        Commands::List {
            category,
            priority,
            status,
        } => {
            let query = TaskListQuery {
                category_id: category,
                priority: priority.map(Priority::from),
                status: status.map(Status::from),
                ..TaskListQuery::default()
            };
            print_tasks(&store.filter_tasks(&query));
        }
        Commands::Add {
            title,
            description,
            priority,
            due,
            category,
        } => {
            let mut task = Task::new(title)
                .with_description(description)
                .with_priority(priority.into());
            if let Some(date) = due.and_then(|date| date.and_hms_opt(0, 0, 0)) {
                task = task.with_due_date(Utc.from_utc_datetime(&date));
            }
            task.category_id = category;
            let id = store.add_task(&task).map_err(|err| err.to_string())?;
            println!("Task added with ID {id}");
        }
        Commands::Search { text } => print_tasks(&store.search_tasks(&text)),
        Commands::Done { id } => {
            report(store.complete_task(id), "task", id)?;
        }
        Commands::Delete { id } => {
            report(store.delete_task(id), "task", id)?;
        }
        Commands::Categories => {
            for category in store.get_categories() {
                println!(
                    "{:>4}  {:<8} {}",
                    category.id.unwrap_or_default(),
                    category.color,
                    category.name
                );
            }
        }
        Commands::AddCategory { name, color } => {
            let category = match color {
                Some(color) => Category::new(name, color),
                None => Category::with_default_color(name),
            };
            let id = store.add_category(&category).map_err(|err| err.to_string())?;
            println!("Category added with ID {id}");
        }
        Commands::DeleteCategory { id } => {
            report(store.delete_category(id), "category", id)?;
        }
        Commands::Stats => {
            let stats = store.statistics();
            println!(
                "total={} completed={} progress={}%",
                stats.total,
                stats.completed,
                stats.progress_percent()
            );
        }
    }
    Ok(())
}

fn report(
    result: taskdesk_core::StoreResult<bool>,
    entity: &str,
    id: i64,
) -> Result<(), String> {
    match result {
        Ok(true) => {
            println!("ok");
            Ok(())
        }
        Ok(false) => Err(format!("{entity} {id} not found")),
        Err(err) => Err(err.to_string()),
    }
}

fn print_tasks(tasks: &[Task]) {
    let now = Utc::now();
    for task in tasks {
        let marker = if task.is_completed() { "x" } else { " " };
        let due = task
            .due_date
            .map(|due| due.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let overdue = if task.is_overdue(now) { " !" } else { "" };
        println!(
            "{:>4} [{}] {:<7} {:<10}{} {}",
            task.id.unwrap_or_default(),
            marker,
            task.priority.label(Language::English),
            due,
            overdue,
            task.title
        );
    }
}
