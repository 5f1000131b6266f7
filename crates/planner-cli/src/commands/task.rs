//! Task management commands for CLI.

use clap::Subcommand;
use planner_core::EntityKind;

use super::common::{delete, open_planner, print_json, toggle, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task title
        title: String,
    },
    /// List tasks
    List,
    /// Check or uncheck a task
    Toggle {
        /// Task ID
        id: i64,
        /// Set explicitly instead of flipping
        #[arg(long)]
        done: Option<bool>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
        /// Don't ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    match action {
        TaskAction::Add { title } => {
            let mut planner = open_planner()?;
            let id = planner.store.add_task(title);
            println!("Task created: {id}");
        }
        TaskAction::List => {
            let planner = open_planner()?;
            print_json(&planner.store.data().tasks)?;
        }
        TaskAction::Toggle { id, done } => toggle(EntityKind::Task, id, done)?,
        TaskAction::Delete { id, yes } => delete(EntityKind::Task, id, yes)?,
    }
    Ok(())
}
