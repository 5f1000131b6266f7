//! Daily habit commands for CLI.

use clap::Subcommand;
use planner_core::{EntityKind, NewHabit, StoreError};

use super::common::{delete, open_planner, print_json, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a daily habit
    Add {
        /// Habit title
        title: String,
        /// Daily target count
        #[arg(long)]
        target: i64,
        /// Unit label (e.g. "glasses")
        #[arg(long, default_value = "")]
        measure: String,
    },
    /// List habits with today's progress
    List,
    /// Add one to today's count
    Bump {
        /// Habit ID
        id: i64,
    },
    /// Delete a habit
    Delete {
        /// Habit ID
        id: i64,
        /// Don't ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

pub fn run(action: HabitAction) -> CliResult {
    match action {
        HabitAction::Add {
            title,
            target,
            measure,
        } => {
            let mut planner = open_planner()?;
            let id = planner.store.add_habit(NewHabit {
                title,
                target,
                measure,
            });
            println!("Habit created: {id}");
        }
        HabitAction::List => {
            let planner = open_planner()?;
            print_json(&planner.store.data().habits)?;
        }
        HabitAction::Bump { id } => {
            let mut planner = open_planner()?;
            let current = planner
                .store
                .bump_habit(id)
                .ok_or(StoreError::NotFound {
                    kind: EntityKind::Habit,
                    id,
                })?;
            let habit = planner.store.data().habits.iter().find(|h| h.id == id);
            match habit {
                Some(h) if h.reached_target() => {
                    println!("{}: {current}/{} {} (target reached)", h.title, h.target, h.measure)
                }
                Some(h) => println!("{}: {current}/{} {}", h.title, h.target, h.measure),
                None => println!("{current}"),
            }
        }
        HabitAction::Delete { id, yes } => delete(EntityKind::Habit, id, yes)?,
    }
    Ok(())
}
