//! Askama page and fragment templates.

use askama::Template;

use crate::models::Task;
use crate::screens::sign_in::SignInForm;
use crate::screens::sign_up::SignUpForm;
use crate::screens::task_detail::NOT_FOUND_MESSAGE;
use crate::screens::task_list::DELETE_PROMPT;
use crate::screens::{ErrorBanner, SpinnerSize, TaskForm, TaskItem, TaskListScreen};

/// Both task sections plus the list-level banner; swapped as one unit by htmx.
#[derive(Debug)]
pub struct SectionsView {
    pub pending: Vec<TaskItem>,
    pub completed: Vec<TaskItem>,
    pub error: Option<ErrorBanner>,
    pub empty: bool,
    pub prompt: &'static str,
}

impl SectionsView {
    pub fn new(screen: &TaskListScreen) -> Self {
        let sections = screen.sections();
        SectionsView {
            pending: screen.items(&sections.pending),
            completed: screen.items(&sections.completed),
            error: screen.error().cloned(),
            empty: screen.is_empty() && screen.error().is_none(),
            prompt: DELETE_PROMPT,
        }
    }
}

#[derive(Template)]
#[template(path = "tasks.html")]
pub struct TaskListPage {
    pub user_email: Option<String>,
    pub view: SectionsView,
}

#[derive(Template)]
#[template(path = "task_sections.html")]
pub struct TaskSectionsFragment {
    pub view: SectionsView,
}

#[derive(Template)]
#[template(path = "signin.html")]
pub struct SignInPage {
    pub user_email: Option<String>,
    pub email: String,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
}

impl SignInPage {
    pub fn new(form: &SignInForm) -> Self {
        SignInPage {
            user_email: None,
            email: form.email.clone(),
            notice: form.notice(),
            error: form.error().map(str::to_string),
        }
    }
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignUpPage {
    pub user_email: Option<String>,
    pub email: String,
    pub error: Option<String>,
}

impl SignUpPage {
    pub fn new(form: &SignUpForm) -> Self {
        SignUpPage {
            user_email: None,
            email: form.email.clone(),
            error: form.error().map(str::to_string),
        }
    }
}

#[derive(Template)]
#[template(path = "task_form.html")]
pub struct TaskFormPage {
    pub user_email: Option<String>,
    pub heading: &'static str,
    pub action: String,
    pub task_id: Option<String>,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub is_edit: bool,
    pub submit_label: &'static str,
    pub spinner: &'static str,
    pub error: Option<String>,
    pub delete_error: Option<ErrorBanner>,
}

impl TaskFormPage {
    pub fn new(user_email: Option<String>, task_id: Option<&str>, form: &TaskForm) -> Self {
        let (heading, action) = match task_id {
            Some(id) => ("Edit Task", format!("/tasks/{id}")),
            None => ("New Task", "/tasks/new".to_string()),
        };
        TaskFormPage {
            user_email,
            heading,
            action,
            task_id: task_id.map(str::to_string),
            title: form.title.clone(),
            description: form.description.clone(),
            completed: form.completed,
            is_edit: form.is_edit(),
            submit_label: form.submit_label(),
            spinner: SpinnerSize::Small.class(),
            error: form.error().map(str::to_string),
            delete_error: None,
        }
    }

    pub fn with_delete_error(mut self, banner: Option<&ErrorBanner>) -> Self {
        self.delete_error = banner.cloned();
        self
    }
}

#[derive(Template)]
#[template(path = "task_not_found.html")]
pub struct NotFoundPage {
    pub user_email: Option<String>,
    pub message: &'static str,
}

impl NotFoundPage {
    pub fn new(user_email: Option<String>) -> Self {
        NotFoundPage {
            user_email,
            message: NOT_FOUND_MESSAGE,
        }
    }
}

#[derive(Template)]
#[template(path = "task_error.html")]
pub struct TaskErrorPage {
    pub user_email: Option<String>,
    pub banner: ErrorBanner,
}

#[derive(Template)]
#[template(path = "confirm_delete.html")]
pub struct ConfirmDeletePage {
    pub user_email: Option<String>,
    pub id: String,
    pub title: String,
    pub prompt: &'static str,
}

impl ConfirmDeletePage {
    pub fn new(user_email: Option<String>, task: &Task) -> Self {
        ConfirmDeletePage {
            user_email,
            id: task.id.clone(),
            title: task.title.clone(),
            prompt: DELETE_PROMPT,
        }
    }
}

/// Neutral page shown while the session is still being resolved.
#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingPage {
    pub user_email: Option<String>,
    pub spinner: &'static str,
}

impl Default for LoadingPage {
    fn default() -> Self {
        LoadingPage {
            user_email: None,
            spinner: SpinnerSize::Large.class(),
        }
    }
}
