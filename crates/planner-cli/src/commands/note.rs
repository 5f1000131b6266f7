use clap::Subcommand;
use planner_core::EntityKind;

use super::common::{delete, open_planner, print_json, CliResult};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Add a note
    Add {
        /// Note text
        text: String,
    },
    /// List notes
    List,
    /// Delete a note
    Delete {
        id: i64,
        #[arg(long, short)]
        yes: bool,
    },
}

pub fn run(action: NoteAction) -> CliResult {
    match action {
        NoteAction::Add { text } => {
            let mut planner = open_planner()?;
            let id = planner.store.add_note(text);
            println!("Note created: {id}");
        }
        NoteAction::List => {
            let planner = open_planner()?;
            print_json(&planner.store.data().notes)?;
        }
        NoteAction::Delete { id, yes } => delete(EntityKind::Note, id, yes)?,
    }
    Ok(())
}
