use clap::Args;
use planner_core::focus_course;

use super::common::{open_planner, parse_at, print_json, CliResult};

#[derive(Args)]
pub struct FocusArgs {
    /// Evaluate at this instant instead of now
    #[arg(long)]
    pub at: Option<String>,
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: FocusArgs) -> CliResult {
    let planner = open_planner()?;
    let now = parse_at(args.at.as_deref())?.unwrap_or_else(|| planner.store.clock().now());
    let focus = focus_course(&planner.store.data().courses, now);

    if args.json {
        return print_json(&focus);
    }
    if let Some(course) = focus.course() {
        println!("{}", course.title);
    }
    println!("{}", focus.subtitle());
    Ok(())
}
