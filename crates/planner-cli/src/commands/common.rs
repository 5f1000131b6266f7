//! Shared plumbing for the CLI commands: opening the planner, confirmation
//! prompts and the delete/toggle flows every collection shares.

use std::error::Error;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime};
use planner_core::storage::data_dir;
use planner_core::{
    AuthState, CloudBridge, Config, DeleteOutcome, EntityId, EntityKind, HttpDocumentStore, Store,
    StoreError, SystemClock,
};
use tracing::{debug, warn};

pub type CliResult<T = ()> = Result<T, Box<dyn Error>>;

/// Everything a command may need, wired the way the app starts up.
pub struct Planner {
    pub dir: PathBuf,
    pub config: Config,
    pub store: Store,
    pub auth: AuthState,
    pub bridge: Option<CloudBridge>,
}

/// Loads config, opens the store (running the daily habit reset) and, when
/// cloud sync is on, restores the signed-in session.
pub fn open_planner() -> CliResult<Planner> {
    let dir = data_dir()?;
    let config = Config::load_from(&dir)?;
    let mut store = Store::open(config.store_medium(&dir), Arc::new(SystemClock));
    let mut auth = AuthState::new();

    let bridge = if config.sync_active() {
        let remote = HttpDocumentStore::from_config(&config.sync)?;
        let bridge = CloudBridge::new(Arc::new(remote));
        store.register_hook(Box::new(bridge.clone()));
        auth.subscribe(Box::new(bridge.clone()));
        auth.restore(&mut store);
        Some(bridge)
    } else {
        None
    };
    debug!(dir = %dir.display(), sync = bridge.is_some(), "planner opened");

    Ok(Planner {
        dir,
        config,
        store,
        auth,
        bridge,
    })
}

/// Asks a yes/no question on stdin. Anything but y/yes is a no.
pub fn confirm(question: &str) -> CliResult<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn ensure_exists(store: &Store, kind: EntityKind, id: EntityId) -> CliResult {
    if store.data().contains(kind, id) {
        Ok(())
    } else {
        Err(StoreError::NotFound { kind, id }.into())
    }
}

/// Completed or past-due entities go straight away; anything else is
/// confirmed first, unless `yes` already answered.
pub fn delete(kind: EntityKind, id: EntityId, yes: bool) -> CliResult {
    let mut planner = open_planner()?;
    ensure_exists(&planner.store, kind, id)?;

    let removed = match planner.store.request_delete(kind, id, true) {
        DeleteOutcome::Deleted(n) => Some(n),
        DeleteOutcome::AwaitingConfirmation(_) => {
            let affirmed = yes || confirm(&format!("Delete this {kind}?"))?;
            planner.store.confirm_delete(affirmed)
        }
    };
    match removed {
        Some(1) => println!("Deleted {kind} {id}"),
        Some(n) => println!("Deleted {kind} {id} ({n} entries shared the id)"),
        None => println!("Cancelled"),
    }
    Ok(())
}

/// Sets or flips `completed` on an assignment, exam or task.
pub fn toggle(kind: EntityKind, id: EntityId, done: Option<bool>) -> CliResult {
    let mut planner = open_planner()?;
    ensure_exists(&planner.store, kind, id)?;
    let completed = match done {
        Some(done) => {
            planner.store.set_completed(kind, id, done);
            done
        }
        None => planner
            .store
            .toggle_completed(kind, id)
            .ok_or(StoreError::NotFound { kind, id })?,
    };
    println!("{kind} {id}: {}", if completed { "done" } else { "open" });
    Ok(())
}

/// Course is free text; flag titles the course list doesn't know.
pub fn check_course(store: &Store, course: &str) {
    if !course.is_empty() && !store.course_titles().contains(&course) {
        warn!(course, known = ?store.course_titles(), "no course with this title");
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `--at` for view/focus: RFC 3339, or local `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_at(raw: Option<&str>) -> CliResult<Option<NaiveDateTime>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Local).naive_local()));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(Some(dt));
        }
    }
    Err(format!("invalid --at value: {raw} (expected RFC 3339 or YYYY-MM-DDTHH:MM)").into())
}
