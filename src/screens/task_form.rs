use crate::api::{ApiError, TaskApi};
use crate::models::{Credential, NewTask, Task, TaskChanges};

pub const SAVE_FAILED: &str = "Failed to save task. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create { user_id: String },
    Edit { task_id: String },
}

/// Normalized form fields, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// Surrounding whitespace is dropped; a blank description becomes absent.
pub fn normalize(title: &str, description: &str) -> (String, Option<String>) {
    let description = description.trim();
    let description = (!description.is_empty()).then(|| description.to_string());
    (title.trim().to_string(), description)
}

/// Create/edit form state.
#[derive(Debug, Clone)]
pub struct TaskForm {
    mode: FormMode,
    pub title: String,
    pub description: String,
    pub completed: bool,
    submitting: bool,
    error: Option<String>,
}

impl TaskForm {
    pub fn create(user_id: impl Into<String>) -> Self {
        TaskForm {
            mode: FormMode::Create {
                user_id: user_id.into(),
            },
            title: String::new(),
            description: String::new(),
            completed: false,
            submitting: false,
            error: None,
        }
    }

    /// Edit form prefilled from a loaded task.
    pub fn edit(task: &Task) -> Self {
        TaskForm {
            mode: FormMode::Edit {
                task_id: task.id.clone(),
            },
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            completed: task.completed,
            submitting: false,
            error: None,
        }
    }

    /// Edit form for `task_id` with fields taken from a submission.
    pub fn edit_fields(
        task_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        completed: bool,
    ) -> Self {
        TaskForm {
            mode: FormMode::Edit {
                task_id: task_id.into(),
            },
            title: title.into(),
            description: description.into(),
            completed,
            submitting: false,
            error: None,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() {
            "Update Task"
        } else {
            "Create Task"
        }
    }

    pub fn validate(&self) -> Result<TaskDraft, ValidationError> {
        let (title, description) = normalize(&self.title, &self.description);
        if title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        Ok(TaskDraft {
            title,
            description,
            completed: self.completed,
        })
    }

    /// Validate, then create or update. Validation failures never reach the
    /// network. On failure the message to show is kept in `error()`.
    pub async fn submit(
        &mut self,
        api: &dyn TaskApi,
        credential: &Credential,
    ) -> Result<Task, FormError> {
        self.error = None;
        let draft = match self.validate() {
            Ok(draft) => draft,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        self.submitting = true;
        let result = match &self.mode {
            FormMode::Create { user_id } => {
                let body = NewTask {
                    title: draft.title,
                    description: draft.description,
                    is_completed: draft.completed,
                    user_id: user_id.clone(),
                };
                api.create_task(credential, &body).await
            }
            FormMode::Edit { task_id } => {
                let changes = TaskChanges {
                    title: Some(draft.title),
                    description: Some(draft.description),
                    is_completed: Some(draft.completed),
                };
                api.update_task(credential, task_id, &changes).await
            }
        };
        self.submitting = false;

        result.map_err(|e| {
            self.error = Some(e.message_or(SAVE_FAILED));
            FormError::Api(e)
        })
    }
}
