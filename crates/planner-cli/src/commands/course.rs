//! Course management commands for CLI.

use clap::Subcommand;
use planner_core::{EntityKind, NewCourse};

use super::common::{delete, open_planner, print_json, CliResult};

#[derive(Subcommand)]
pub enum CourseAction {
    /// Add a course
    Add {
        /// Course title
        title: String,
        /// Teacher name
        #[arg(long, default_value = "")]
        teacher: String,
        /// Comma-separated weekday names (e.g. "Monday,Wednesday")
        #[arg(long, value_delimiter = ',')]
        days: Vec<String>,
        /// Start time, HH:MM
        #[arg(long)]
        start: String,
        /// End time, HH:MM
        #[arg(long)]
        end: String,
    },
    /// List courses
    List,
    /// Delete a course
    Delete {
        /// Course ID
        id: i64,
        /// Don't ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

pub fn run(action: CourseAction) -> CliResult {
    match action {
        CourseAction::Add {
            title,
            teacher,
            days,
            start,
            end,
        } => {
            let mut planner = open_planner()?;
            let id = planner.store.add_course(NewCourse {
                title,
                teacher,
                days: days.into_iter().map(|d| d.trim().to_string()).collect(),
                start,
                end,
            });
            println!("Course created: {id}");
        }
        CourseAction::List => {
            let planner = open_planner()?;
            print_json(&planner.store.data().courses)?;
        }
        CourseAction::Delete { id, yes } => delete(EntityKind::Course, id, yes)?,
    }
    Ok(())
}
