//! Cloud copy of the planner record.
//!
//! One document per signed-in user. The document is pulled and merged over
//! the local record when a user signs in, and the full record is pushed
//! after every save while someone is signed in. Pushes are fire-and-forget:
//! a failure is logged and never retried.

mod bridge;
mod http;

pub use bridge::CloudBridge;
pub use http::HttpDocumentStore;

use serde_json::Value;
use tokio::runtime::{Builder, Runtime};

use crate::error::SyncError;

/// A keyed document store holding one planner record per user id.
pub trait RemoteStore: Send + Sync {
    /// Returns `None` when the user has no document yet.
    fn fetch(&self, uid: &str, token: &str) -> Result<Option<Value>, SyncError>;

    /// Replaces the user's document wholesale.
    fn push(&self, uid: &str, token: &str, document: &Value) -> Result<(), SyncError>;
}

/// Runtime used to drive async I/O (reqwest, the loopback server) from
/// synchronous callers.
pub(crate) fn runtime() -> std::io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}
