use clap::Subcommand;

use super::common::{open_planner, CliResult};

#[derive(Subcommand)]
pub enum SyncAction {
    /// Fetch the cloud copy and merge it over the local record
    Pull,
    /// Overwrite the cloud copy with the local record
    Push,
}

pub fn run(action: SyncAction) -> CliResult {
    let mut planner = open_planner()?;
    let bridge = planner
        .bridge
        .clone()
        .ok_or("cloud sync is disabled; set sync.enabled and sync.endpoint")?;
    if planner.auth.user().is_none() {
        return Err("not signed in; run `student-planner auth login` first".into());
    }

    match action {
        SyncAction::Pull => {
            if bridge.pull(&mut planner.store)? {
                println!("merged cloud copy");
            } else {
                println!("no cloud copy yet");
            }
        }
        SyncAction::Push => {
            bridge.push(planner.store.data())?;
            println!("pushed");
        }
    }
    Ok(())
}
