use tracing::info;

use crate::api::TaskApi;
use crate::models::User;

pub const SIGN_UP_FAILED: &str = "Failed to create account. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignUpError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Account creation form state.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub email: String,
    error: Option<String>,
}

impl SignUpForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn validate(&self, password: &str, confirm: &str) -> Result<(), SignUpError> {
        if self.email.trim().is_empty() {
            return Err(SignUpError::EmailRequired);
        }
        if password.is_empty() {
            return Err(SignUpError::PasswordRequired);
        }
        if password != confirm {
            return Err(SignUpError::PasswordMismatch);
        }
        Ok(())
    }

    /// Register a new account. Does not sign in; the caller sends the user
    /// to the sign-in screen on success.
    pub async fn submit(
        &mut self,
        api: &dyn TaskApi,
        password: &str,
        confirm: &str,
    ) -> Option<User> {
        self.error = None;
        if let Err(e) = self.validate(password, confirm) {
            self.error = Some(e.to_string());
            return None;
        }
        match api.register(self.email.trim(), password).await {
            Ok(user) => {
                info!(email = %user.email, "registered");
                Some(user)
            }
            Err(e) => {
                self.error = Some(e.message_or(SIGN_UP_FAILED));
                None
            }
        }
    }
}
