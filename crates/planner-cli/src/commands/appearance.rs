use clap::ValueEnum;

use super::common::{open_planner, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum DarkModeState {
    On,
    Off,
    Toggle,
}

pub fn run(state: DarkModeState) -> CliResult {
    let mut planner = open_planner()?;
    let enabled = match state {
        DarkModeState::On => true,
        DarkModeState::Off => false,
        DarkModeState::Toggle => !planner.store.data().dark_mode,
    };
    planner.store.set_dark_mode(enabled);
    println!("dark mode {}", if enabled { "on" } else { "off" });
    Ok(())
}
