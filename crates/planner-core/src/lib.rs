//! # Student Planner Core Library
//!
//! This library holds everything the Student Planner does apart from drawing
//! a window: the persisted record, the schedule projections, the dashboard
//! renderer and the optional cloud copy. The `student-planner` CLI and the
//! loopback desktop shell are thin layers over the same core.
//!
//! ## Architecture
//!
//! - **Store**: One JSON record (courses, assignments, exams, habits, tasks,
//!   notes, dark mode) persisted wholesale after every mutation
//! - **Schedule**: Per-weekday course lists, the merged dated-item list and
//!   the focus course
//! - **View**: Pure projection into a render model, then HTML
//! - **Sync / Auth**: Per-user cloud document, pulled on sign-in and pushed
//!   after every save
//! - **Shell**: Loopback asset server, window commands and media session
//!
//! ## Key Components
//!
//! - [`Store`]: The record plus its medium and save hooks
//! - [`Config`]: Application configuration management
//! - [`project`] / [`render_dashboard`]: One render cycle
//! - [`CloudBridge`]: Keeps the cloud copy in step with the store

pub mod auth;
pub mod calendar;
pub mod entities;
pub mod error;
pub mod focus;
pub mod media;
pub mod schedule;
pub mod shell;
pub mod storage;
pub mod store;
pub mod sync;
pub mod view;

pub use auth::{AuthListener, AuthState, AuthUser};
pub use calendar::{Clock, FixedClock, SystemClock};
pub use entities::{
    Assignment, Course, EntityId, EntityKind, Exam, Habit, Note, Priority, Task,
};
pub use error::{AuthError, ConfigError, CoreError, ShellError, StoreError, SyncError};
pub use focus::{focus_course, Focus};
pub use media::MediaStatus;
pub use storage::{Config, FileMedium, MemoryMedium, StorageMedium};
pub use store::{
    DeleteOutcome, DeleteRequest, NewAssignment, NewCourse, NewExam, NewHabit, SaveHook, Store,
    StoreData,
};
pub use sync::{CloudBridge, HttpDocumentStore, RemoteStore};
pub use view::html::render_dashboard;
pub use view::{project, Dashboard, ViewMode};
