//! Desktop shell: the dashboard page served on loopback, plus the window
//! commands it can send back.

mod server;
mod window;

pub use server::{resolve_asset, ActionReply, AssetServer, PageAction, StoreDashboard};
pub use window::{dispatch, HeadlessWindow, WindowCommand, WindowControls};
