use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser, Subcommand};
use thiserror::Error;

use taskcli_core::config::resolve_tasks_file;
use taskcli_core::ops::{self, MarkOutcome, TaskError};
use taskcli_core::store::TaskStore;
use taskcli_core::task::{Status, StatusFilter};

#[derive(Parser)]
#[command(
    name = "task-cli",
    version = taskcli_core::version(),
    about = "Track short tasks in a local JSON file"
)]
struct Cli {
    /// Path to the tasks file (defaults to tasks.json in the working directory)
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new task
    Add {
        /// Task description; multiple words are joined with spaces
        description: Vec<String>,
    },
    /// List tasks, optionally filtered by status (all, todo, in-progress, done)
    List {
        /// Status filter
        status: Option<String>,
        /// Print the filtered tasks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace a task's description
    Update {
        /// Task id
        id: Option<String>,
        /// New description
        description: Vec<String>,
    },
    /// Delete a task
    Delete {
        /// Task id
        id: Option<String>,
    },
    /// Mark a task as in-progress
    MarkInProgress {
        /// Task id
        id: Option<String>,
    },
    /// Mark a task as done
    MarkDone {
        /// Task id
        id: Option<String>,
    },
}

const USAGE_ADD: &str = "task-cli add \"<description>\"";
const USAGE_LIST: &str = "task-cli list [all|todo|in-progress|done]";
const USAGE_UPDATE: &str = "task-cli update <id> \"<description>\"";
const USAGE_DELETE: &str = "task-cli delete <id>";
const USAGE_MARK_IN_PROGRESS: &str = "task-cli mark-in-progress <id>";
const USAGE_MARK_DONE: &str = "task-cli mark-done <id>";

#[derive(Debug, Error)]
enum CliError {
    #[error("{message}")]
    Usage {
        message: String,
        usage: &'static str,
    },
    #[error(transparent)]
    Task(#[from] TaskError),
}

fn usage_error(message: impl Into<String>, usage: &'static str) -> CliError {
    CliError::Usage {
        message: message.into(),
        usage,
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse_from(normalized_args()) {
        Ok(cli) => cli,
        Err(err) => return handle_parse_error(err),
    };

    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let store = TaskStore::new(resolve_tasks_file(&cwd, cli.file.as_deref()));

    let Some(command) = cli.command else {
        print_long_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match dispatch(command, &store) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("Error: {err}");
            if let CliError::Usage { usage, .. } = &err {
                println!("Usage: {usage}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Verb matching is case-insensitive: lower-case the first non-flag token
/// before clap sees it. Argument values pass through unmodified.
fn normalized_args() -> Vec<OsString> {
    let mut args: Vec<OsString> = std::env::args_os().collect();
    let mut index = 1;
    while index < args.len() {
        let Some(text) = args[index].to_str() else {
            break;
        };
        if text == "--file" {
            index += 2;
            continue;
        }
        if text.starts_with('-') {
            index += 1;
            continue;
        }
        args[index] = OsString::from(text.to_lowercase());
        break;
    }
    args
}

fn handle_parse_error(err: clap::Error) -> anyhow::Result<ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            err.print()?;
            Ok(ExitCode::SUCCESS)
        }
        ErrorKind::InvalidSubcommand => {
            let verb = err
                .get(ContextKind::InvalidSubcommand)
                .and_then(|value| match value {
                    ContextValue::String(raw) => Some(raw.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            eprintln!("Error: Unknown command \"{verb}\". Use 'help' to see the available commands.");
            print_long_help()?;
            Ok(ExitCode::FAILURE)
        }
        _ => {
            err.print()?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_long_help() -> anyhow::Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}

fn dispatch(command: Command, store: &TaskStore) -> Result<(), CliError> {
    match command {
        Command::Add { description } => cmd_add(store, &description),
        Command::List { status, json } => cmd_list(store, status.as_deref(), json),
        Command::Update { id, description } => cmd_update(store, id.as_deref(), &description),
        Command::Delete { id } => cmd_delete(store, id.as_deref()),
        Command::MarkInProgress { id } => {
            cmd_mark(store, id.as_deref(), Status::InProgress, USAGE_MARK_IN_PROGRESS)
        }
        Command::MarkDone { id } => cmd_mark(store, id.as_deref(), Status::Done, USAGE_MARK_DONE),
    }
}

fn cmd_add(store: &TaskStore, description: &[String]) -> Result<(), CliError> {
    if description.is_empty() {
        return Err(usage_error(
            "The \"add\" command requires a task description.",
            USAGE_ADD,
        ));
    }
    let description = description.join(" ").trim().to_string();
    if description.is_empty() {
        return Err(usage_error(
            "The task description must not be empty.",
            USAGE_ADD,
        ));
    }

    let mut data = store.load();
    let id = ops::add_task(&mut data, &description);
    store.save(&data);
    println!("Task added successfully (ID: {id})");
    Ok(())
}

fn cmd_list(store: &TaskStore, status: Option<&str>, json: bool) -> Result<(), CliError> {
    let filter = match status {
        None => StatusFilter::All,
        Some(raw) => raw
            .parse::<StatusFilter>()
            .map_err(|err| usage_error(err.to_string(), USAGE_LIST))?,
    };

    let data = store.load();
    let tasks = ops::filter_tasks(&data.tasks, filter);

    if json {
        println!("{}", ops::tasks_to_json(&tasks));
        return Ok(());
    }

    if tasks.is_empty() {
        match filter {
            StatusFilter::All => println!("No tasks found."),
            StatusFilter::Only(status) => println!("No tasks with status '{status}' found."),
        }
        return Ok(());
    }

    println!("Tasks ({}):", filter.as_str());
    for task in tasks {
        println!("{}", ops::render_task_line(task));
    }
    Ok(())
}

fn cmd_update(
    store: &TaskStore,
    id: Option<&str>,
    description: &[String],
) -> Result<(), CliError> {
    let Some(raw_id) = id else {
        return Err(usage_error(
            "The \"update\" command requires a task id and a new description.",
            USAGE_UPDATE,
        ));
    };
    if description.is_empty() {
        return Err(usage_error(
            "The \"update\" command requires a task id and a new description.",
            USAGE_UPDATE,
        ));
    }
    let id = parse_id(raw_id, USAGE_UPDATE)?;
    let description = description.join(" ").trim().to_string();
    if description.is_empty() {
        return Err(usage_error(
            "The new task description must not be empty.",
            USAGE_UPDATE,
        ));
    }

    let mut data = store.load();
    ops::update_description(&mut data, id, &description)?;
    store.save(&data);
    println!("Task with ID {id} updated successfully.");
    Ok(())
}

fn cmd_delete(store: &TaskStore, id: Option<&str>) -> Result<(), CliError> {
    let Some(raw_id) = id else {
        return Err(usage_error(
            "The \"delete\" command requires a task id.",
            USAGE_DELETE,
        ));
    };
    let id = parse_id(raw_id, USAGE_DELETE)?;

    let mut data = store.load();
    ops::delete_task(&mut data, id)?;
    store.save(&data);
    println!("Task with ID {id} deleted successfully.");
    Ok(())
}

fn cmd_mark(
    store: &TaskStore,
    id: Option<&str>,
    status: Status,
    usage: &'static str,
) -> Result<(), CliError> {
    let Some(raw_id) = id else {
        return Err(usage_error(
            format!("The \"mark-{status}\" command requires a task id."),
            usage,
        ));
    };
    let id = parse_id(raw_id, usage)?;

    let mut data = store.load();
    match ops::mark_status(&mut data, id, status)? {
        MarkOutcome::AlreadyMarked => {
            println!("Task with ID {id} is already marked as {status}.");
        }
        MarkOutcome::Updated => {
            store.save(&data);
            println!("Task with ID {id} marked as {status} successfully.");
        }
    }
    Ok(())
}

fn parse_id(raw: &str, usage: &'static str) -> Result<u64, CliError> {
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(usage_error(
            format!("Invalid task id \"{raw}\". The id must be a positive integer."),
            usage,
        )),
    }
}
