//! Assignment commands for CLI.

use clap::Subcommand;
use planner_core::{EntityKind, NewAssignment, Priority};

use super::common::{check_course, delete, open_planner, print_json, toggle, CliResult};

#[derive(Subcommand)]
pub enum AssignmentAction {
    /// Add an assignment
    Add {
        /// Assignment title
        title: String,
        /// Course title (free text)
        #[arg(long, default_value = "")]
        course: String,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: String,
        /// Mark as high priority
        #[arg(long)]
        high: bool,
    },
    /// List assignments
    List,
    /// Check or uncheck an assignment
    Toggle {
        /// Assignment ID
        id: i64,
        /// Set explicitly instead of flipping
        #[arg(long)]
        done: Option<bool>,
    },
    /// Delete an assignment
    Delete {
        /// Assignment ID
        id: i64,
        /// Don't ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

pub fn run(action: AssignmentAction) -> CliResult {
    match action {
        AssignmentAction::Add {
            title,
            course,
            due,
            high,
        } => {
            let mut planner = open_planner()?;
            check_course(&planner.store, &course);
            let id = planner.store.add_assignment(NewAssignment {
                title,
                course,
                due_date: due,
                priority: if high { Priority::High } else { Priority::Normal },
            });
            println!("Assignment created: {id}");
        }
        AssignmentAction::List => {
            let planner = open_planner()?;
            print_json(&planner.store.data().assignments)?;
        }
        AssignmentAction::Toggle { id, done } => toggle(EntityKind::Assignment, id, done)?,
        AssignmentAction::Delete { id, yes } => delete(EntityKind::Assignment, id, yes)?,
    }
    Ok(())
}
