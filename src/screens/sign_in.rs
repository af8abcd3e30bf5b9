use crate::auth::{AuthContext, TokenStore};
use crate::models::User;

pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please sign in again.";
pub const REGISTERED_NOTICE: &str = "Account created. Please sign in.";

/// Sign-in form state.
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    notice: Option<&'static str>,
    error: Option<String>,
}

impl SignInForm {
    pub fn new(session_expired: bool, registered: bool) -> Self {
        let notice = if session_expired {
            Some(SESSION_EXPIRED_NOTICE)
        } else if registered {
            Some(REGISTERED_NOTICE)
        } else {
            None
        };
        SignInForm {
            email: String::new(),
            notice,
            error: None,
        }
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Log in through the context. The password is never kept on the form.
    pub async fn submit<S: TokenStore>(
        &mut self,
        auth: &mut AuthContext<S>,
        password: &str,
    ) -> Option<User> {
        self.error = None;
        match auth.login(&self.email, password).await {
            Ok(user) => Some(user),
            Err(e) => {
                self.error = Some(e.message());
                None
            }
        }
    }
}
