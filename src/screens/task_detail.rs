use super::task_form::TaskForm;
use super::task_list::DELETE_PROMPT;
use super::widgets::{ErrorBanner, RetryAction};
use crate::api::{ApiError, TaskApi};
use crate::models::{Credential, Task};

pub const NOT_FOUND_MESSAGE: &str = "Task not found";

#[derive(Debug, Clone)]
pub enum DetailState {
    Loading,
    Loaded { task: Task, form: TaskForm },
    NotFound,
    Failed(ErrorBanner),
}

/// Single-task screen: an edit form plus delete.
#[derive(Debug)]
pub struct TaskDetailScreen {
    id: String,
    state: DetailState,
    // Inline failure from delete; the form keeps its own.
    error: Option<ErrorBanner>,
}

impl TaskDetailScreen {
    pub fn new(id: impl Into<String>) -> Self {
        TaskDetailScreen {
            id: id.into(),
            state: DetailState::Loading,
            error: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn task(&self) -> Option<&Task> {
        match &self.state {
            DetailState::Loaded { task, .. } => Some(task),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&TaskForm> {
        match &self.state {
            DetailState::Loaded { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorBanner> {
        self.error.as_ref()
    }

    /// Fetch the task. A 404 becomes the not-found view; other failures a
    /// banner pointing back to the list. Only a 401 is handed back to the
    /// caller, which owns the session.
    pub async fn load(
        &mut self,
        api: &dyn TaskApi,
        credential: &Credential,
    ) -> Result<(), ApiError> {
        self.state = DetailState::Loading;
        self.state = match api.get_task(credential, &self.id).await {
            Ok(task) => {
                let form = TaskForm::edit(&task);
                DetailState::Loaded { task, form }
            }
            Err(e) if e.is_not_found() => DetailState::NotFound,
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => DetailState::Failed(
                ErrorBanner::new(e.message_or("Failed to load task"))
                    .with_retry(RetryAction::BackToList),
            ),
        };
        Ok(())
    }

    /// Delete after confirmation. `Ok(true)` means the task is gone and the
    /// caller should navigate back to the list.
    pub async fn delete(
        &mut self,
        api: &dyn TaskApi,
        credential: &Credential,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<bool, ApiError> {
        if !confirm(DELETE_PROMPT) {
            return Ok(false);
        }
        self.error = None;
        match api.delete_task(credential, &self.id).await {
            Ok(()) => Ok(true),
            Err(e) => {
                self.error = Some(ErrorBanner::new(e.message_or("Failed to delete task")));
                Err(e)
            }
        }
    }
}
