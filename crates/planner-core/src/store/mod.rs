//! The persisted planner store.
//!
//! One [`Store`] per process owns the record, the medium it is persisted to
//! and the hooks that observe every save. Every mutation goes through a
//! method on the store and ends in [`Store::save`].
//!
//! I/O failures never reach the caller of `load`/`save`: they are logged and
//! the in-memory record stays as it was. Use `try_load`/`try_save` to see the
//! error.

mod collections;
mod data;
mod delete;
mod merge;

pub use collections::{NewAssignment, NewCourse, NewExam, NewHabit};
pub use data::StoreData;
pub use delete::{DeleteOutcome, DeleteRequest};
pub use merge::shallow_merge;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::calendar::{locale_date, Clock};
use crate::error::StoreError;
use crate::storage::StorageMedium;

/// Observer invoked after every save, in registration order.
///
/// Hooks run whether or not the local write succeeded; a failing hook is the
/// hook's business to log.
pub trait SaveHook: Send {
    fn name(&self) -> &str;

    fn after_save(&self, data: &StoreData);
}

/// What `try_load` found on the medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A record was read and merged over the defaults.
    Loaded,
    /// Nothing was stored; defaults were written.
    Initialized,
}

pub struct Store {
    data: StoreData,
    medium: Box<dyn StorageMedium>,
    clock: Arc<dyn Clock>,
    hooks: Vec<Box<dyn SaveHook>>,
    pending_delete: Option<DeleteRequest>,
}

impl Store {
    /// A store holding defaults. Nothing is read or written yet.
    pub fn new(medium: Box<dyn StorageMedium>, clock: Arc<dyn Clock>) -> Self {
        let today = locale_date(clock.today());
        Self {
            data: StoreData::defaults(&today),
            medium,
            clock,
            hooks: Vec::new(),
            pending_delete: None,
        }
    }

    /// Startup sequence: load, then the once-a-day habit reset.
    pub fn open(medium: Box<dyn StorageMedium>, clock: Arc<dyn Clock>) -> Self {
        let mut store = Self::new(medium, clock);
        store.load();
        store.roll_over_habits();
        store
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn register_hook(&mut self, hook: Box<dyn SaveHook>) {
        debug!(hook = hook.name(), "registered save hook");
        self.hooks.push(hook);
    }

    /// Reads the medium and shallow-merges the record over the defaults.
    /// Failures are logged; the in-memory store is left untouched.
    pub fn load(&mut self) {
        if let Err(e) = self.try_load() {
            error!(medium = %self.medium.describe(), error = %e, "failed to load planner data");
        }
    }

    /// # Errors
    ///
    /// Returns the read or parse error; the in-memory record is unchanged.
    pub fn try_load(&mut self) -> Result<LoadOutcome, StoreError> {
        match self.medium.read()? {
            Some(raw) => {
                let loaded: Value = serde_json::from_str(&raw)?;
                let today = locale_date(self.clock.today());
                let data = StoreData::defaults(&today).merged_with(&loaded)?;
                self.data = data;
                info!(medium = %self.medium.describe(), "loaded planner data");
                Ok(LoadOutcome::Loaded)
            }
            None => {
                info!(medium = %self.medium.describe(), "no planner data yet, writing defaults");
                self.save();
                Ok(LoadOutcome::Initialized)
            }
        }
    }

    /// Overwrites the medium with the full record, then runs the save hooks.
    /// A failed write is logged and swallowed.
    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            error!(medium = %self.medium.describe(), error = %e, "failed to save planner data");
        }
        for hook in &self.hooks {
            hook.after_save(&self.data);
        }
    }

    /// Writes the record without running hooks.
    ///
    /// # Errors
    ///
    /// Returns the serialization or write error.
    pub fn try_save(&self) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(&self.data)?;
        self.medium.write(&contents)
    }

    /// Zeroes every habit counter when the day has changed since the last
    /// reset, then persists. Returns whether a reset happened. Previous
    /// counts are not kept anywhere.
    pub fn roll_over_habits(&mut self) -> bool {
        let today = locale_date(self.clock.today());
        if self.data.last_habit_reset == today {
            return false;
        }
        info!(
            previous = %self.data.last_habit_reset,
            today = %today,
            habits = self.data.habits.len(),
            "new day, resetting habit counters"
        );
        for habit in &mut self.data.habits {
            habit.current = 0;
        }
        self.data.last_habit_reset = today;
        self.save();
        true
    }

    /// Applies a remote record: `{...local, ...remote}`, remote winning per
    /// top-level field (whole collections are replaced), then persists.
    ///
    /// # Errors
    ///
    /// A remote record that is not an object or breaks the schema is
    /// rejected and the local record is kept.
    pub fn merge_remote(&mut self, remote: &Value) -> Result<(), StoreError> {
        let merged = self.data.merged_with(remote)?;
        self.data = merged;
        // A pending delete may point at an entity the remote copy replaced.
        if let Some(pending) = self.pending_delete {
            if !self.data.contains(pending.kind, pending.id) {
                warn!(kind = %pending.kind, id = pending.id, "pending delete target vanished after merge");
                self.pending_delete = None;
            }
        }
        self.save();
        Ok(())
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.data.dark_mode = enabled;
        self.save();
    }
}
