//! Command-line interface for tasksheet
//!
//! This module defines the CLI structure using clap derive macros.
//! Each group of subcommands is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{Config, CONFIG_FILENAME};
use crate::error::Result;
use crate::output::OutputOptions;
use crate::repository::TaskRepository;
use crate::store::FileSheet;
use crate::task::{KanbanStatus, TaskType};

mod init;
mod stats;
mod task;

/// tasksheet - task tracking over a spreadsheet
///
/// Reads bug reports and feature requests from a form-response sheet, derives
/// cost, status and kanban column for each row, and writes hours and status
/// changes back to the sheet.
#[derive(Parser, Debug)]
#[command(name = "tasksheet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the workbook (defaults to sheet.path from the config)
    #[arg(long, global = true, env = "TASKSHEET_SHEET")]
    pub sheet: Option<PathBuf>,

    /// Path to the config file (defaults to ./.tasksheet.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Grouping key for `list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    Month,
    Bucket,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the workbook with its header row
    Init {
        /// Seed the sheet with sample tasks
        #[arg(long)]
        sample: bool,

        /// Replace an existing workbook
        #[arg(long)]
        force: bool,
    },

    /// List tasks
    List {
        /// Only tasks assigned to this developer (exact match)
        #[arg(long)]
        developer: Option<String>,

        /// Group tasks by month reported or bucket
        #[arg(long, value_enum)]
        group_by: Option<GroupBy>,
    },

    /// Show totals across all tasks
    Stats {
        /// Print only the summed cost
        #[arg(long, conflicts_with = "hours")]
        pending: bool,

        /// Print only the summed hours
        #[arg(long)]
        hours: bool,
    },

    /// Append a new task row
    Add {
        /// What needs doing
        #[arg(long)]
        description: Option<String>,

        /// bug or feature
        #[arg(long = "type")]
        task_type: Option<TaskType>,

        /// Month the task belongs to
        #[arg(long)]
        month: Option<String>,

        /// Developer assigned to the task
        #[arg(long)]
        developer: Option<String>,

        /// Reporter email address
        #[arg(long)]
        email: Option<String>,

        /// Date reported (defaults to today)
        #[arg(long)]
        date_reported: Option<String>,

        /// Reporter name
        #[arg(long)]
        reported_by: Option<String>,

        /// Urgency / severity
        #[arg(long)]
        severity: Option<String>,

        /// Screenshot link
        #[arg(long)]
        screenshot: Option<String>,

        /// Product area
        #[arg(long)]
        bucket: Option<String>,

        /// Hours already invested
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        hours: f64,

        /// Estimated deadline
        #[arg(long)]
        deadline: Option<String>,

        /// Priority note
        #[arg(long)]
        priority: Option<String>,

        /// Initial kanban column
        #[arg(long)]
        status: Option<KanbanStatus>,
    },

    /// Set the hours invested in a task
    Hours {
        /// Task id as shown by `list`
        id: String,

        /// Hours invested
        #[arg(allow_negative_numbers = true)]
        hours: f64,
    },

    /// Move a task to a kanban column (todo, in-progress, review, done)
    Status {
        /// Task id as shown by `list`
        id: String,

        /// Target column
        status: KanbanStatus,
    },
}

/// Resolved configuration and workbook location for one invocation
pub struct Session {
    pub config: Config,
    pub config_path: PathBuf,
    pub sheet_path: PathBuf,
    pub output: OutputOptions,
}

impl Session {
    fn resolve(cli: &Cli) -> Result<Self> {
        let (config, config_path) = match &cli.config {
            Some(path) if path.exists() => (Config::load(path)?, path.clone()),
            Some(path) => (Config::default(), path.clone()),
            None => {
                let cwd = std::env::current_dir()?;
                (Config::load_from_dir(&cwd), cwd.join(CONFIG_FILENAME))
            }
        };
        let sheet_path = cli
            .sheet
            .clone()
            .unwrap_or_else(|| config.sheet.path.clone());

        tracing::debug!(
            sheet = %sheet_path.display(),
            config = %config_path.display(),
            "resolved session"
        );

        Ok(Self {
            config,
            config_path,
            sheet_path,
            output: OutputOptions {
                json: cli.json,
                quiet: cli.quiet,
            },
        })
    }

    fn repository(&self) -> TaskRepository<FileSheet> {
        TaskRepository::from_config(FileSheet::open(&self.sheet_path), &self.config)
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let session = Session::resolve(&self)?;

        if let Commands::Init { sample, force } = self.command {
            return init::run(&session, init::InitOptions { sample, force });
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let repo = session.repository();
        let command = self.command;

        runtime.block_on(async {
            match command {
                Commands::Init { .. } => Ok(()),
                Commands::List {
                    developer,
                    group_by,
                } => {
                    task::run_list(
                        &repo,
                        &session,
                        task::ListOptions {
                            developer,
                            group_by,
                        },
                    )
                    .await
                }
                Commands::Stats { pending, hours } => {
                    stats::run(&repo, &session, stats::StatsOptions { pending, hours }).await
                }
                Commands::Add {
                    description,
                    task_type,
                    month,
                    developer,
                    email,
                    date_reported,
                    reported_by,
                    severity,
                    screenshot,
                    bucket,
                    hours,
                    deadline,
                    priority,
                    status,
                } => {
                    task::run_add(
                        &repo,
                        &session,
                        task::AddOptions {
                            description,
                            task_type,
                            month,
                            developer,
                            email,
                            date_reported,
                            reported_by,
                            severity,
                            screenshot,
                            bucket,
                            hours,
                            deadline,
                            priority,
                            status,
                        },
                    )
                    .await
                }
                Commands::Hours { id, hours } => {
                    task::run_hours(&repo, &session, task::HoursOptions { id, hours }).await
                }
                Commands::Status { id, status } => {
                    task::run_status(&repo, &session, task::StatusOptions { id, status }).await
                }
            }
        })
    }
}
