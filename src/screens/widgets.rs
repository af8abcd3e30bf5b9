use crate::models::Task;

/// Follow-up offered by an error banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    /// Re-issue the task list fetch.
    ReloadTasks,
    /// Leave the current screen for the task list.
    BackToList,
}

impl RetryAction {
    pub fn href(&self) -> &'static str {
        "/tasks"
    }

    pub fn label(&self) -> &'static str {
        match self {
            RetryAction::ReloadTasks => "Try again",
            RetryAction::BackToList => "Back to tasks",
        }
    }
}

/// Inline error message with an optional manual retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    pub retry: Option<RetryAction>,
}

impl ErrorBanner {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBanner {
            message: message.into(),
            retry: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryAction) -> Self {
        self.retry = Some(retry);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerSize {
    Small,
    Large,
}

impl SpinnerSize {
    pub fn class(&self) -> &'static str {
        match self {
            SpinnerSize::Small => "spinner spinner-sm",
            SpinnerSize::Large => "spinner spinner-lg",
        }
    }
}

/// Round completion button on a task row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionToggle {
    pub completed: bool,
    pub disabled: bool,
}

impl CompletionToggle {
    pub fn aria_label(&self) -> &'static str {
        if self.completed {
            "Mark as incomplete"
        } else {
            "Mark as complete"
        }
    }
}

/// Everything a task row renders, precomputed so templates only print fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created: String,
    pub toggle: CompletionToggle,
}

impl TaskItem {
    pub fn new(task: &Task, updating: bool) -> Self {
        TaskItem {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            completed: task.completed,
            created: task.created_label(),
            toggle: CompletionToggle {
                completed: task.completed,
                disabled: updating,
            },
        }
    }

    pub fn href(&self) -> String {
        format!("/tasks/{}", self.id)
    }
}
