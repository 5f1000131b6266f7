//! Now-playing lookup through an external helper program.
//!
//! The helper prints either `TITLE:`, `ARTIST:` and `STATUS:` lines, a lone
//! `NONE`, or `ERROR:<message>`.

use std::path::Path;
use std::process::Command;

use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MediaStatus {
    Playing {
        title: String,
        artist: String,
        playback_status: String,
    },
    None,
    Error {
        message: String,
    },
}

impl MediaStatus {
    fn error(message: impl Into<String>) -> Self {
        MediaStatus::Error { message: message.into() }
    }
}

pub fn parse_helper_output(output: &str) -> MediaStatus {
    let mut title = None;
    let mut artist = None;
    let mut status = None;

    for line in output.lines().map(str::trim) {
        if line == "NONE" {
            return MediaStatus::None;
        }
        if let Some(message) = line.strip_prefix("ERROR:") {
            return MediaStatus::error(message.trim());
        }
        if let Some(v) = line.strip_prefix("TITLE:") {
            title = Some(v.to_string());
        } else if let Some(v) = line.strip_prefix("ARTIST:") {
            artist = Some(v.to_string());
        } else if let Some(v) = line.strip_prefix("STATUS:") {
            status = Some(v.to_string());
        }
    }

    match title {
        Some(title) => MediaStatus::Playing {
            title,
            artist: artist.unwrap_or_default(),
            playback_status: status.unwrap_or_default(),
        },
        None => MediaStatus::error("unrecognized helper output"),
    }
}

/// Runs the helper once and waits for it. No helper configured, a helper
/// that won't start, or one that exits non-zero all come back as `Error`.
pub fn query(helper: Option<&Path>) -> MediaStatus {
    let Some(helper) = helper else {
        return MediaStatus::error("no media helper configured");
    };
    debug!(helper = %helper.display(), "querying media session");
    match Command::new(helper).output() {
        Ok(out) if out.status.success() => parse_helper_output(&String::from_utf8_lossy(&out.stdout)),
        Ok(out) => {
            let stderr = String::from_utf8_lossy(&out.stderr);
            warn!(status = %out.status, "media helper failed");
            MediaStatus::error(format!("helper exited with {}: {}", out.status, stderr.trim()))
        }
        Err(e) => {
            warn!(helper = %helper.display(), error = %e, "media helper did not start");
            MediaStatus::error(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_playing_session() {
        let out = "TITLE:Clair de Lune\nARTIST:Debussy\nSTATUS:Playing\n";
        assert_eq!(
            parse_helper_output(out),
            MediaStatus::Playing {
                title: "Clair de Lune".into(),
                artist: "Debussy".into(),
                playback_status: "Playing".into(),
            }
        );
    }

    #[test]
    fn parses_none_and_error() {
        assert_eq!(parse_helper_output("NONE\r\n"), MediaStatus::None);
        assert_eq!(
            parse_helper_output("ERROR:access denied"),
            MediaStatus::Error { message: "access denied".into() }
        );
        assert!(matches!(parse_helper_output(""), MediaStatus::Error { .. }));
    }

    #[test]
    fn missing_helper_is_an_error() {
        assert!(matches!(query(None), MediaStatus::Error { .. }));
        assert!(matches!(
            query(Some(Path::new("/definitely/not/a/helper"))),
            MediaStatus::Error { .. }
        ));
    }
}
