//! View state for each screen, shared by the browser and terminal shells.

pub mod sign_in;
pub mod sign_up;
pub mod task_detail;
pub mod task_form;
pub mod task_list;
pub mod widgets;

pub use sign_in::SignInForm;
pub use sign_up::SignUpForm;
pub use task_detail::{DetailState, TaskDetailScreen};
pub use task_form::{FormError, TaskForm, ValidationError};
pub use task_list::TaskListScreen;
pub use widgets::{ErrorBanner, RetryAction, SpinnerSize, TaskItem};
