use std::sync::{Arc, Mutex};

use clap::Args;
use planner_core::shell::{AssetServer, HeadlessWindow, StoreDashboard, WindowControls};
use planner_core::ViewMode;

use super::common::{open_planner, CliResult};

#[derive(Args)]
pub struct ServeArgs {
    /// Port on 127.0.0.1 (default from server.port)
    #[arg(long)]
    pub port: Option<u16>,
    /// Schedule view for the page
    #[arg(long)]
    pub mode: Option<ViewMode>,
}

pub fn run(args: ServeArgs) -> CliResult {
    let planner = open_planner()?;
    let port = args.port.unwrap_or(planner.config.server.port);
    let root = planner.config.asset_root(&planner.dir);

    let server = AssetServer::bind(port, root)?;
    println!("Serving on http://{}", server.local_addr()?);

    let dashboard = StoreDashboard {
        view: args.mode.unwrap_or(planner.config.ui.default_view),
        upcoming_limit: planner.config.ui.upcoming_limit as usize,
        store: planner.store,
    };
    let window: Arc<Mutex<dyn WindowControls>> = Arc::new(Mutex::new(HeadlessWindow::default()));
    server.serve(dashboard, window)?;
    Ok(())
}
