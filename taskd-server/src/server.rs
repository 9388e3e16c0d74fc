//! HTTP routing for the `/task` collection.
//!
//! Maps the five routes onto [`TaskStore`] operations and turns
//! [`StoreError`]s into status codes with an [`ErrorBody`]. Storage failures
//! are logged here with full detail; clients only see a fixed message naming
//! the operation that failed.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use taskd_proto::api::{ErrorBody, MSG_FIELDS_REQUIRED, MSG_TASK_NOT_FOUND, TaskFields};
use taskd_proto::task::Task;

use crate::backend::{InMemoryBackend, TaskBackend};
use crate::store::{StoreError, TaskStore};

/// Operation names used in `500` responses.
mod context {
    pub const LIST: &str = "Error reading tasks";
    pub const GET: &str = "Error reading task";
    pub const CREATE: &str = "Error creating task";
    pub const UPDATE: &str = "Error updating task";
    pub const DELETE: &str = "Error deleting task";
}

/// An error response of the task API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body missing, malformed, or failing the presence check.
    #[error("{0}")]
    BadRequest(String),
    /// No task has the requested id.
    #[error("{MSG_TASK_NOT_FOUND}")]
    NotFound,
    /// The backing store is unusable; carries the client-facing message.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Converts a store error, logging storage failures under `context`.
    fn from_store(err: StoreError, context: &'static str) -> Self {
        match err {
            StoreError::Validation(e) => Self::BadRequest(e.to_string()),
            StoreError::NotFound(id) => {
                tracing::debug!(id = %id, "task not found");
                Self::NotFound
            }
            other => {
                tracing::error!(error = %other, "{context}");
                Self::Internal(context)
            }
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "rejected request body");
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                Self::BadRequest(MSG_FIELDS_REQUIRED.to_string())
            }
            other => Self::BadRequest(other.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

type SharedStore<B> = State<Arc<TaskStore<B>>>;

/// Builds the router serving `/task` over `store`.
pub fn router<B: TaskBackend + 'static>(store: Arc<TaskStore<B>>) -> axum::Router {
    axum::Router::new()
        .route("/task", get(list_tasks::<B>).post(create_task::<B>))
        .route(
            "/task/{id}",
            get(get_task::<B>)
                .put(update_task::<B>)
                .delete(delete_task::<B>),
        )
        .with_state(store)
}

/// `GET /task`
async fn list_tasks<B: TaskBackend>(
    State(store): SharedStore<B>,
) -> Result<Json<Vec<Task>>, ApiError> {
    store
        .list()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(e, context::LIST))
}

/// `GET /task/{id}`
async fn get_task<B: TaskBackend>(
    State(store): SharedStore<B>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    store
        .get(&id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(e, context::GET))
}

/// `POST /task`
async fn create_task<B: TaskBackend>(
    State(store): SharedStore<B>,
    body: Result<Json<TaskFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(fields) = body?;
    let task = store
        .create(fields)
        .await
        .map_err(|e| ApiError::from_store(e, context::CREATE))?;
    tracing::info!(id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /task/{id}`
async fn update_task<B: TaskBackend>(
    State(store): SharedStore<B>,
    Path(id): Path<String>,
    body: Result<Json<TaskFields>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(fields) = body?;
    let task = store
        .update(&id, fields)
        .await
        .map_err(|e| ApiError::from_store(e, context::UPDATE))?;
    tracing::info!(id = %task.id, "task updated");
    Ok(Json(task))
}

/// `DELETE /task/{id}`
async fn delete_task<B: TaskBackend>(
    State(store): SharedStore<B>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = store
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_store(e, context::DELETE))?;
    tracing::info!(id = %id, removed, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Starts the server on `addr` over `store` and returns the bound address
/// and a join handle.
///
/// This is the entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server<B: TaskBackend + 'static>(
    addr: &str,
    store: Arc<TaskStore<B>>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(store);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task server error");
        }
    });

    Ok((bound_addr, handle))
}

/// Starts a server over an empty in-memory store for testing.
///
/// Binds to `127.0.0.1:0` (OS-assigned port).
///
/// # Errors
///
/// Returns an error if the loopback listener cannot be bound.
pub async fn start_in_memory_server() -> Result<
    (
        std::net::SocketAddr,
        Arc<TaskStore<InMemoryBackend>>,
        tokio::task::JoinHandle<()>,
    ),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let store = Arc::new(TaskStore::new(InMemoryBackend::new()));
    let (addr, handle) = start_server("127.0.0.1:0", Arc::clone(&store)).await?;
    Ok((addr, store, handle))
}
