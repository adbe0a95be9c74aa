use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use taskflow_core::time::parse_deadline;
use taskflow_core::{ScheduleRequest, Scheduler, TaskId, TaskStatus};

mod config;
mod render;
mod state;
mod store;

use crate::config::{Config, load_config};
use crate::store::{JsonTaskStore, NewTask};

#[derive(Parser, Debug)]
#[command(
    name = "taskflow",
    version,
    about = "Deadline-aware task scheduling against a daily time budget"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the task list
    Tasks {
        #[command(subcommand)]
        command: TasksCommand,
    },

    /// Order pending tasks with one strategy and project completion times
    Schedule {
        /// EDF or WEIGHTED_GREEDY (default: engine.default_strategy)
        #[arg(long)]
        strategy: Option<String>,

        /// Minutes available per day, 30-1440 (default: engine.default_minutes_per_day)
        #[arg(long)]
        minutes: Option<i64>,

        /// Simulate from this instant instead of the current time
        #[arg(long)]
        now: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run both strategies side by side over the same tasks
    Compare {
        /// Minutes available per day, 30-1440 (default: engine.default_minutes_per_day)
        #[arg(long)]
        minutes: Option<i64>,

        /// Simulate from this instant instead of the current time
        #[arg(long)]
        now: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or create ~/.taskflow/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TasksCommand {
    /// List all tasks, including completed ones
    List {
        #[arg(long)]
        json: bool,
    },

    /// Add a task (status starts as TODO)
    Add {
        #[arg(long)]
        title: String,

        /// RFC3339, or "YYYY-MM-DD HH:MM" in the configured timezone
        #[arg(long)]
        deadline: String,

        /// Estimated effort in minutes
        #[arg(long)]
        minutes: u32,

        /// 1-5, 5 is most urgent
        #[arg(long, default_value_t = 3)]
        priority: u8,

        #[arg(long)]
        description: Option<String>,
    },

    /// Set a task's status: TODO, IN_PROGRESS or DONE
    Status { id: TaskId, status: TaskStatus },

    /// Delete a task
    Delete { id: TaskId },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Tasks { command } => run_tasks(command)?,

        Command::Schedule {
            strategy,
            minutes,
            now,
            json,
        } => {
            let cfg = load_config()?;
            let request = ScheduleRequest::new(
                strategy.unwrap_or_else(|| cfg.engine.default_strategy.clone()),
                minutes.unwrap_or(cfg.engine.default_minutes_per_day),
            );
            let (strategy, capacity) = request.validate()?;

            let engine = cfg.engine_config()?;
            let now = resolve_now(now.as_deref(), &cfg)?;
            let store = open_store()?;

            info!(%strategy, %capacity, "scheduling");
            let result = Scheduler::new(engine).schedule_snapshot(&store, strategy, capacity, now)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render::schedule_text(&result, engine.timezone));
            }
        }

        Command::Compare { minutes, now, json } => {
            let cfg = load_config()?;
            let request = ScheduleRequest {
                strategy: None,
                available_minutes_per_day: minutes.unwrap_or(cfg.engine.default_minutes_per_day),
            };
            let capacity = request.validate_for_compare()?;

            let engine = cfg.engine_config()?;
            let now = resolve_now(now.as_deref(), &cfg)?;
            let store = open_store()?;

            info!(%capacity, "comparing strategies");
            let result = Scheduler::new(engine).compare_snapshot(&store, capacity, now)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render::comparison_text(&result, engine.timezone));
            }
        }
    }

    Ok(())
}

fn run_tasks(command: TasksCommand) -> Result<()> {
    let cfg = load_config()?;
    let tz = cfg.engine_config()?.timezone;
    let store = open_store()?;

    match command {
        TasksCommand::List { json } => {
            let tasks = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print!("{}", render::tasks_text(&tasks, tz));
            }
        }

        TasksCommand::Add {
            title,
            deadline,
            minutes,
            priority,
            description,
        } => {
            let deadline = parse_deadline(&deadline, tz)?;
            let task = store.add(NewTask {
                title,
                description,
                deadline,
                estimated_minutes: minutes,
                priority,
            })?;
            println!("Added task {}: {}", task.id, task.title);
        }

        TasksCommand::Status { id, status } => {
            let task = store.set_status(id, status)?;
            println!("Task {} is now {}", task.id, task.status);
        }

        TasksCommand::Delete { id } => {
            store.delete(id)?;
            println!("Deleted task {id}");
        }
    }

    Ok(())
}

fn open_store() -> Result<JsonTaskStore> {
    let store = JsonTaskStore::open(state::tasks_path()?);
    debug!(path = %store.path().display(), "task store");
    Ok(store)
}

fn resolve_now(flag: Option<&str>, cfg: &Config) -> Result<DateTime<Utc>> {
    match flag {
        Some(s) => Ok(parse_deadline(s, cfg.engine_config()?.timezone).context("--now")?),
        None => Ok(Utc::now()),
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
