use clap::Subcommand;
use planner_core::{EntityKind, NewExam};

use super::common::{check_course, delete, open_planner, print_json, toggle, CliResult};

#[derive(Subcommand)]
pub enum ExamAction {
    /// Add an exam
    Add {
        /// Exam title
        title: String,
        /// Course title (free text)
        #[arg(long, default_value = "")]
        course: String,
        /// Exam date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Start time, HH:MM
        #[arg(long, default_value = "")]
        time: String,
    },
    /// List exams
    List,
    /// Check or uncheck an exam
    Toggle {
        id: i64,
        #[arg(long)]
        done: Option<bool>,
    },
    /// Delete an exam
    Delete {
        id: i64,
        #[arg(long, short)]
        yes: bool,
    },
}

pub fn run(action: ExamAction) -> CliResult {
    match action {
        ExamAction::Add {
            title,
            course,
            date,
            time,
        } => {
            let mut planner = open_planner()?;
            check_course(&planner.store, &course);
            let id = planner.store.add_exam(NewExam {
                title,
                course,
                date,
                time,
            });
            println!("Exam created: {id}");
        }
        ExamAction::List => {
            let planner = open_planner()?;
            print_json(&planner.store.data().exams)?;
        }
        ExamAction::Toggle { id, done } => toggle(EntityKind::Exam, id, done)?,
        ExamAction::Delete { id, yes } => delete(EntityKind::Exam, id, yes)?,
    }
    Ok(())
}
