mod config;
pub mod medium;

pub use config::{
    AuthConfig, Config, LoggingConfig, MediaConfig, MediumKind, ServerConfig, StorageConfig,
    SyncConfig, UiConfig,
};
pub use medium::{FileMedium, MemoryMedium, StorageMedium};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the planner data directory, creating it if needed.
///
/// `STUDENT_PLANNER_HOME` wins when set. Otherwise `~/.config/student-planner`,
/// or `~/.config/student-planner-dev` when `STUDENT_PLANNER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("STUDENT_PLANNER_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("STUDENT_PLANNER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("student-planner-dev")
            } else {
                base_dir.join("student-planner")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
