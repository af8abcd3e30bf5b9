use tracing::debug;

use super::widgets::{ErrorBanner, RetryAction, TaskItem};
use crate::api::{ApiError, TaskApi};
use crate::models::{Credential, Task};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

/// A toggle that has been issued but not yet answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToggle {
    pub id: String,
    pub completed: bool,
    epoch: u64,
}

/// Tasks split by completion flag, each in fetch order.
#[derive(Debug, Default)]
pub struct Sections<'a> {
    pub pending: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

/// View state of the task list screen.
#[derive(Debug)]
pub struct TaskListScreen {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<ErrorBanner>,
    updating: Option<String>,
    // Bumped on every fetch; toggle answers from an older epoch are dropped.
    epoch: u64,
}

impl Default for TaskListScreen {
    fn default() -> Self {
        TaskListScreen {
            tasks: Vec::new(),
            loading: true,
            error: None,
            updating: None,
            epoch: 0,
        }
    }
}

impl TaskListScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn error(&self) -> Option<&ErrorBanner> {
        self.error.as_ref()
    }

    pub fn updating(&self) -> Option<&str> {
        self.updating.as_deref()
    }

    pub fn is_updating(&self, id: &str) -> bool {
        self.updating.as_deref() == Some(id)
    }

    /// Fetch every task. The error, if any, is also recorded as a banner
    /// whose retry re-issues this fetch.
    pub async fn load(
        &mut self,
        api: &dyn TaskApi,
        credential: &Credential,
    ) -> Result<(), ApiError> {
        self.epoch += 1;
        self.updating = None;
        self.error = None;
        let result = api.list_tasks(credential).await;
        self.loading = false;
        match result {
            Ok(tasks) => {
                debug!(count = tasks.len(), "loaded tasks");
                self.tasks = tasks;
                Ok(())
            }
            Err(e) => {
                self.fail(&e, "Failed to load tasks");
                Err(e)
            }
        }
    }

    /// Mark `id` as updating and return the call to issue. Returns `None` when
    /// the task is unknown or another toggle is still in flight.
    pub fn begin_toggle(&mut self, id: &str) -> Option<PendingToggle> {
        if self.updating.is_some() {
            return None;
        }
        let task = self.tasks.iter().find(|t| t.id == id)?;
        let pending = PendingToggle {
            id: task.id.clone(),
            completed: !task.completed,
            epoch: self.epoch,
        };
        self.updating = Some(pending.id.clone());
        Some(pending)
    }

    /// Apply the server's answer to a toggle issued by `begin_toggle`.
    pub fn finish_toggle(&mut self, pending: PendingToggle, result: &Result<Task, ApiError>) {
        if pending.epoch != self.epoch {
            debug!(id = %pending.id, "dropping stale toggle response");
            return;
        }
        self.updating = None;
        match result {
            Ok(updated) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == pending.id) {
                    *slot = updated.clone();
                }
            }
            Err(e) => self.fail(e, "Failed to update task"),
        }
    }

    /// Flip the completion flag of `id` and replace its entry with the
    /// server's record. Returns `Ok(false)` when the toggle was dropped.
    pub async fn toggle(
        &mut self,
        api: &dyn TaskApi,
        credential: &Credential,
        id: &str,
    ) -> Result<bool, ApiError> {
        let Some(pending) = self.begin_toggle(id) else {
            return Ok(false);
        };
        let result = api.set_completed(credential, &pending.id, pending.completed).await;
        self.finish_toggle(pending, &result);
        result.map(|_| true)
    }

    /// Delete `id` once `confirm` accepts [`DELETE_PROMPT`]. Returns
    /// `Ok(false)` without a request when the user declined or `id` is not
    /// on the screen (for instance because the list failed to load).
    pub async fn delete(
        &mut self,
        api: &dyn TaskApi,
        credential: &Credential,
        id: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<bool, ApiError> {
        if !self.tasks.iter().any(|t| t.id == id) {
            return Ok(false);
        }
        if !confirm(DELETE_PROMPT) {
            return Ok(false);
        }
        match api.delete_task(credential, id).await {
            Ok(()) => {
                self.tasks.retain(|t| t.id != id);
                Ok(true)
            }
            Err(e) => {
                self.fail(&e, "Failed to delete task");
                Err(e)
            }
        }
    }

    pub fn sections(&self) -> Sections<'_> {
        let (completed, pending): (Vec<&Task>, Vec<&Task>) =
            self.tasks.iter().partition(|t| t.completed);
        Sections { pending, completed }
    }

    /// Row views for one section, with the updating row disabled.
    pub fn items(&self, tasks: &[&Task]) -> Vec<TaskItem> {
        tasks
            .iter()
            .map(|t| TaskItem::new(t, self.is_updating(&t.id)))
            .collect()
    }

    fn fail(&mut self, e: &ApiError, fallback: &str) {
        let banner = ErrorBanner::new(e.message_or(fallback)).with_retry(RetryAction::ReloadTasks);
        self.error = Some(banner);
    }
}
