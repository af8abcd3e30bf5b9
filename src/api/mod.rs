use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{Credential, NewTask, Session, Task, TaskChanges, User};

mod http;


pub use http::HttpApi;

/// Failure of a call to the task API.
///
/// The server's optional `detail` string is decoded here, once, so callers
/// never inspect raw response bodies.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized{}", suffix(.detail))]
    Unauthorized { detail: Option<String> },
    #[error("not found{}", suffix(.detail))]
    NotFound { detail: Option<String> },
    #[error("request failed with status {status}{}", suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

fn suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

impl ApiError {
    /// Human-readable detail supplied by the server, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail }
            | ApiError::NotFound { detail }
            | ApiError::Status { detail, .. } => detail.as_deref(),
            ApiError::Transport(_) => None,
        }
    }

    /// The server's detail, or `fallback` when it sent none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

/// Error payload convention of the task API.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Only string details are shown; structured validation payloads are not.
    pub(crate) fn into_detail(self) -> Option<String> {
        match self.detail {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }
}

/// Outbound operations against the task and auth endpoints.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError>;

    async fn register(&self, email: &str, password: &str) -> Result<User, ApiError>;

    async fn current_user(&self, credential: &Credential) -> Result<User, ApiError>;

    async fn list_tasks(&self, credential: &Credential) -> Result<Vec<Task>, ApiError>;

    async fn get_task(&self, credential: &Credential, id: &str) -> Result<Task, ApiError>;

    async fn create_task(&self, credential: &Credential, task: &NewTask)
    -> Result<Task, ApiError>;

    async fn update_task(
        &self,
        credential: &Credential,
        id: &str,
        changes: &TaskChanges,
    ) -> Result<Task, ApiError>;

    async fn delete_task(&self, credential: &Credential, id: &str) -> Result<(), ApiError>;

    async fn set_completed(
        &self,
        credential: &Credential,
        id: &str,
        completed: bool,
    ) -> Result<Task, ApiError> {
        self.update_task(credential, id, &TaskChanges::completion(completed))
            .await
    }
}
