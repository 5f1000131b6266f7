use clap::{Args, ValueEnum};
use planner_core::{project, render_dashboard, ViewMode};

use super::common::{open_planner, parse_at, print_json, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
}

#[derive(Args)]
pub struct ViewArgs {
    /// day, week, month or year (default from ui.default_view)
    #[arg(long)]
    pub mode: Option<ViewMode>,
    /// html page or the JSON render model
    #[arg(long, value_enum, default_value = "html")]
    pub format: OutputFormat,
    /// Render as of this instant instead of now
    #[arg(long)]
    pub at: Option<String>,
}

pub fn run(args: ViewArgs) -> CliResult {
    let planner = open_planner()?;
    let mode = args.mode.unwrap_or(planner.config.ui.default_view);
    let now = parse_at(args.at.as_deref())?.unwrap_or_else(|| planner.store.clock().now());
    let limit = planner.config.ui.upcoming_limit as usize;

    let dashboard = project(planner.store.data(), mode, now, limit);
    match args.format {
        OutputFormat::Html => println!("{}", render_dashboard(&dashboard)),
        OutputFormat::Json => print_json(&dashboard)?,
    }
    Ok(())
}
