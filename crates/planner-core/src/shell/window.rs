use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::error::ShellError;

/// Window commands the page can send over IPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    Minimize,
    ToggleMaximize,
    Close,
}

impl WindowCommand {
    pub const ALL: [WindowCommand; 3] = [
        WindowCommand::Minimize,
        WindowCommand::ToggleMaximize,
        WindowCommand::Close,
    ];

    /// IPC channel name.
    pub fn channel(&self) -> &'static str {
        match self {
            WindowCommand::Minimize => "window-min",
            WindowCommand::ToggleMaximize => "window-max",
            WindowCommand::Close => "window-close",
        }
    }
}

impl fmt::Display for WindowCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.channel())
    }
}

impl FromStr for WindowCommand {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowCommand::ALL
            .into_iter()
            .find(|c| c.channel() == s)
            .ok_or_else(|| ShellError::UnknownChannel(s.to_string()))
    }
}

/// The native window, as far as the page is concerned.
pub trait WindowControls: Send {
    fn minimize(&mut self);
    fn maximize(&mut self);
    fn unmaximize(&mut self);
    fn is_maximized(&self) -> bool;
    fn close(&mut self);
    fn is_closed(&self) -> bool;
}

pub fn dispatch(command: WindowCommand, window: &mut dyn WindowControls) {
    match command {
        WindowCommand::Minimize => window.minimize(),
        WindowCommand::ToggleMaximize => {
            if window.is_maximized() {
                window.unmaximize();
            } else {
                window.maximize();
            }
        }
        WindowCommand::Close => window.close(),
    }
}

/// Window state without a window: the page is in the user's browser.
/// Close stops the server.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeadlessWindow {
    pub minimized: bool,
    pub maximized: bool,
    pub closed: bool,
}

impl WindowControls for HeadlessWindow {
    fn minimize(&mut self) {
        info!("window minimized");
        self.minimized = true;
    }

    fn maximize(&mut self) {
        info!("window maximized");
        self.minimized = false;
        self.maximized = true;
    }

    fn unmaximize(&mut self) {
        info!("window restored");
        self.maximized = false;
    }

    fn is_maximized(&self) -> bool {
        self.maximized
    }

    fn close(&mut self) {
        info!("window closed");
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_parse() {
        assert_eq!("window-min".parse::<WindowCommand>().unwrap(), WindowCommand::Minimize);
        assert_eq!("window-max".parse::<WindowCommand>().unwrap(), WindowCommand::ToggleMaximize);
        assert_eq!("window-close".parse::<WindowCommand>().unwrap(), WindowCommand::Close);
        assert!(matches!(
            "window-fullscreen".parse::<WindowCommand>(),
            Err(ShellError::UnknownChannel(_))
        ));
    }

    #[test]
    fn max_toggles() {
        let mut window = HeadlessWindow::default();
        dispatch(WindowCommand::ToggleMaximize, &mut window);
        assert!(window.maximized);
        dispatch(WindowCommand::ToggleMaximize, &mut window);
        assert!(!window.maximized);
        dispatch(WindowCommand::Close, &mut window);
        assert!(window.is_closed());
    }
}
