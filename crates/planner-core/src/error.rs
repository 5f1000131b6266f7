//! Core error types for planner-core.
//!
//! Most store and sync failures are logged and swallowed at the public
//! boundary (the planner never blocks the user on I/O). The fallible
//! `try_*` variants return these types so callers and tests can observe
//! what actually went wrong.

use std::path::PathBuf;
use thiserror::Error;

use crate::entities::{EntityId, EntityKind};

/// Core error type for planner-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persisted store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cloud document sync errors
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Sign-in / session errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Desktop shell (asset server, window commands, media helper) errors
    #[error("Shell error: {0}")]
    Shell(#[from] ShellError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors raised while reading, parsing or writing the persisted store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing medium could not be read
    #[error("Failed to read {medium}: {source}")]
    ReadFailed {
        medium: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing medium could not be written
    #[error("Failed to write {medium}: {source}")]
    WriteFailed {
        medium: String,
        #[source]
        source: std::io::Error,
    },

    /// The stored record is not valid JSON or does not match the schema
    #[error("Failed to parse stored record: {0}")]
    ParseFailed(#[from] serde_json::Error),

    /// A record (local or remote) was valid JSON but not an object
    #[error("Stored record is not a JSON object")]
    NotAnObject,

    /// No entity with the given id in the given collection
    #[error("No {kind} with id {id}")]
    NotFound { kind: EntityKind, id: EntityId },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Remote document store errors.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid sync endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Sync runtime unavailable: {0}")]
    Runtime(String),
}

/// Sign-in and session errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// OAuth client credentials missing
    #[error("OAuth client credentials not configured. Run `auth login --client-id --client-secret` first")]
    CredentialsNotConfigured,

    /// Authorization failed
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Token exchange failed
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Invalid callback
    #[error("Invalid OAuth callback: {0}")]
    InvalidCallback(String),

    /// Profile lookup failed
    #[error("Failed to fetch user profile: {0}")]
    ProfileFailed(String),

    /// OS keyring errors
    #[error("Keyring error: {0}")]
    Keyring(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Desktop shell errors.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Failed to bind the loopback listener
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Requested path resolves outside the asset root
    #[error("Forbidden path: {0}")]
    Forbidden(String),

    /// Requested asset does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unknown IPC channel
    #[error("Unknown IPC channel: {0}")]
    UnknownChannel(String),

    /// Malformed HTTP request
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<keyring::Error> for AuthError {
    fn from(err: keyring::Error) -> Self {
        AuthError::Keyring(err.to_string())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::TokenExchangeFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
