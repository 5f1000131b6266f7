//! Loopback HTTP server for the dashboard page, its assets and the actions
//! the page sends back.
//!
//! Routes:
//! - `GET /` renders the dashboard from the live store
//! - `POST /api/{kind}/{id}/delete?skip=`, `POST /api/delete/confirm?affirmed=`
//! - `POST /api/{kind}/{id}/toggle`, `POST /api/habit/{id}/bump`
//! - `POST /ipc/{channel}` for window commands
//! - anything else under `GET` is a file from the asset root

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::{Path as UrlPath, Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::window::{dispatch, WindowCommand, WindowControls};
use crate::entities::{EntityId, EntityKind};
use crate::error::ShellError;
use crate::store::{DeleteOutcome, Store};
use crate::view::{html::render_dashboard, project, ViewMode};

/// Page script and stylesheet served when the asset root has none.
const BUILTIN_ASSETS: [(&str, &str); 2] = [
    ("/renderer.js", include_str!("../../assets/renderer.js")),
    ("/style.css", include_str!("../../assets/style.css")),
];

/// The store behind the served page.
pub struct StoreDashboard {
    pub store: Store,
    pub view: ViewMode,
    pub upcoming_limit: usize,
}

/// A mutation requested by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Delete {
        kind: EntityKind,
        id: EntityId,
        skip_confirm: bool,
    },
    Confirm {
        affirmed: bool,
    },
    Toggle {
        kind: EntityKind,
        id: EntityId,
    },
    Bump {
        id: EntityId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionReply {
    Deleted { removed: usize },
    /// Staged; the page has to ask and then call confirm.
    Confirm { kind: EntityKind, id: EntityId },
    Cancelled,
    Toggled { completed: bool },
    Bumped { current: i64 },
}

impl StoreDashboard {
    /// Re-reads the medium so edits from another process show up, then runs
    /// the habit reset in case the day changed while serving.
    fn refresh(&mut self) {
        self.store.load();
        self.store.roll_over_habits();
    }

    pub fn render(&mut self) -> String {
        self.refresh();
        let now = self.store.clock().now();
        render_dashboard(&project(self.store.data(), self.view, now, self.upcoming_limit))
    }

    pub fn apply(&mut self, action: PageAction) -> Result<ActionReply, ShellError> {
        self.refresh();
        debug!(?action, "page action");
        match action {
            PageAction::Delete {
                kind,
                id,
                skip_confirm,
            } => {
                if !self.store.data().contains(kind, id) {
                    return Err(missing(kind, id));
                }
                Ok(match self.store.request_delete(kind, id, skip_confirm) {
                    DeleteOutcome::Deleted(removed) => ActionReply::Deleted { removed },
                    DeleteOutcome::AwaitingConfirmation(request) => ActionReply::Confirm {
                        kind: request.kind,
                        id: request.id,
                    },
                })
            }
            PageAction::Confirm { affirmed } => Ok(match self.store.confirm_delete(affirmed) {
                Some(removed) => ActionReply::Deleted { removed },
                None => ActionReply::Cancelled,
            }),
            PageAction::Toggle { kind, id } => self
                .store
                .toggle_completed(kind, id)
                .map(|completed| ActionReply::Toggled { completed })
                .ok_or_else(|| missing(kind, id)),
            PageAction::Bump { id } => self
                .store
                .bump_habit(id)
                .map(|current| ActionReply::Bumped { current })
                .ok_or_else(|| missing(EntityKind::Habit, id)),
        }
    }
}

fn missing(kind: EntityKind, id: EntityId) -> ShellError {
    ShellError::NotFound(format!("{kind} {id}"))
}

impl IntoResponse for ShellError {
    fn into_response(self) -> Response {
        let status = match &self {
            ShellError::Forbidden(_) => StatusCode::FORBIDDEN,
            ShellError::NotFound(_) | ShellError::UnknownChannel(_) => StatusCode::NOT_FOUND,
            ShellError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        } else {
            debug!(error = %self, status = status.as_u16(), "request refused");
        }
        (status, self.to_string()).into_response()
    }
}

struct ShellState {
    asset_root: PathBuf,
    dashboard: Mutex<StoreDashboard>,
    window: Arc<Mutex<dyn WindowControls>>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

type SharedState = Arc<ShellState>;

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Store work runs on the blocking pool: saves do file I/O and the cloud
/// hook drives its own runtime.
async fn with_dashboard<T, F>(state: SharedState, f: F) -> Result<T, ShellError>
where
    F: FnOnce(&mut StoreDashboard) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&mut *lock(&state.dashboard)))
        .await
        .map_err(|e| ShellError::Io(std::io::Error::other(e)))
}

async fn page(State(state): State<SharedState>) -> Result<Html<String>, ShellError> {
    let html = with_dashboard(state, StoreDashboard::render).await?;
    Ok(Html(html))
}

async fn run_action(state: SharedState, action: PageAction) -> Result<Json<ActionReply>, ShellError> {
    let reply = with_dashboard(state, move |dashboard| dashboard.apply(action)).await??;
    Ok(Json(reply))
}

fn parse_kind(kind: &str) -> Result<EntityKind, ShellError> {
    kind.parse().map_err(ShellError::NotFound)
}

#[derive(Deserialize)]
struct DeleteQuery {
    #[serde(default)]
    skip: bool,
}

#[derive(Deserialize)]
struct ConfirmQuery {
    affirmed: bool,
}

async fn delete_entity(
    State(state): State<SharedState>,
    UrlPath((kind, id)): UrlPath<(String, EntityId)>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<ActionReply>, ShellError> {
    let kind = parse_kind(&kind)?;
    run_action(
        state,
        PageAction::Delete {
            kind,
            id,
            skip_confirm: query.skip,
        },
    )
    .await
}

async fn confirm_delete(
    State(state): State<SharedState>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<ActionReply>, ShellError> {
    run_action(state, PageAction::Confirm { affirmed: query.affirmed }).await
}

async fn toggle_entity(
    State(state): State<SharedState>,
    UrlPath((kind, id)): UrlPath<(String, EntityId)>,
) -> Result<Json<ActionReply>, ShellError> {
    let kind = parse_kind(&kind)?;
    run_action(state, PageAction::Toggle { kind, id }).await
}

async fn bump_habit(
    State(state): State<SharedState>,
    UrlPath((kind, id)): UrlPath<(String, EntityId)>,
) -> Result<Json<ActionReply>, ShellError> {
    match parse_kind(&kind)? {
        EntityKind::Habit => run_action(state, PageAction::Bump { id }).await,
        other => Err(missing(other, id)),
    }
}

async fn window_command(
    State(state): State<SharedState>,
    UrlPath(channel): UrlPath<String>,
) -> Result<&'static str, ShellError> {
    let command: WindowCommand = channel.parse()?;
    let closed = {
        let mut window = lock(&state.window);
        dispatch(command, &mut *window);
        window.is_closed()
    };
    if closed {
        if let Some(tx) = lock(&state.shutdown).take() {
            let _ = tx.send(());
        }
    }
    Ok("ok")
}

async fn asset(State(state): State<SharedState>, uri: Uri) -> Result<Response, ShellError> {
    let path = uri.path();
    match resolve_asset(&state.asset_root, path) {
        Ok(file) => {
            let body = tokio::fs::read(&file).await?;
            let mime = mime_guess::from_path(&file).first_or_octet_stream();
            Ok(([(header::CONTENT_TYPE, mime.to_string())], body).into_response())
        }
        Err(ShellError::NotFound(not_found)) => builtin_asset(path)
            .map(|(name, body)| {
                let mime = mime_guess::from_path(name).first_or_octet_stream();
                ([(header::CONTENT_TYPE, mime.to_string())], body).into_response()
            })
            .ok_or(ShellError::NotFound(not_found)),
        Err(e) => Err(e),
    }
}

fn builtin_asset(path: &str) -> Option<(&'static str, &'static str)> {
    BUILTIN_ASSETS.into_iter().find(|(name, _)| *name == path)
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/index.html", get(page))
        .route("/api/delete/confirm", post(confirm_delete))
        .route("/api/{kind}/{id}/delete", post(delete_entity))
        .route("/api/{kind}/{id}/toggle", post(toggle_entity))
        .route("/api/{kind}/{id}/bump", post(bump_habit))
        .route("/ipc/{channel}", post(window_command))
        .route("/{*path}", get(asset))
        .with_state(state)
}

/// Loopback HTTP server for the dashboard page and its assets.
pub struct AssetServer {
    runtime: Runtime,
    listener: TcpListener,
    asset_root: PathBuf,
}

impl AssetServer {
    /// Binds `127.0.0.1:<port>`. Port 0 picks a free one.
    pub fn bind(port: u16, asset_root: impl Into<PathBuf>) -> Result<Self, ShellError> {
        let runtime = crate::sync::runtime()?;
        let addr = format!("127.0.0.1:{port}");
        let listener = runtime
            .block_on(TcpListener::bind(&addr))
            .map_err(|source| ShellError::Bind { addr, source })?;
        Ok(Self {
            runtime,
            listener,
            asset_root: asset_root.into(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ShellError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until the page sends `window-close`.
    pub fn serve(
        self,
        dashboard: StoreDashboard,
        window: Arc<Mutex<dyn WindowControls>>,
    ) -> Result<(), ShellError> {
        info!(addr = %self.local_addr()?, root = %self.asset_root.display(), "serving dashboard");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(Arc::new(ShellState {
            asset_root: self.asset_root,
            dashboard: Mutex::new(dashboard),
            window,
            shutdown: Mutex::new(Some(shutdown_tx)),
        }));

        let listener = self.listener;
        self.runtime.block_on(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                    info!("window closed, stopping server");
                })
                .await
        })?;
        Ok(())
    }
}

/// Maps a request path onto a file under `root`.
///
/// `..` segments are refused outright; anything that still lands outside the
/// root after resolving symlinks is refused too.
pub fn resolve_asset(root: &Path, request_path: &str) -> Result<PathBuf, ShellError> {
    let decoded = urlencoding::decode(request_path)
        .map_err(|e| ShellError::BadRequest(e.to_string()))?;
    let relative = Path::new(decoded.trim_start_matches('/'));

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(ShellError::Forbidden(request_path.to_string()));
    }

    let root = root
        .canonicalize()
        .map_err(|_| ShellError::NotFound(request_path.to_string()))?;
    let candidate = root
        .join(relative)
        .canonicalize()
        .map_err(|_| ShellError::NotFound(request_path.to_string()))?;

    if !candidate.starts_with(&root) {
        return Err(ShellError::Forbidden(request_path.to_string()));
    }
    if !candidate.is_file() {
        return Err(ShellError::NotFound(request_path.to_string()));
    }
    Ok(candidate)
}
