//! Session state shared by every screen of one browser request or command run.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{ApiError, TaskApi};
use crate::models::{Credential, Session, User};

pub mod guard;
mod store;

pub use guard::{GuardOutcome, Route, RouteGuard};
#[cfg(test)]
pub use store::MemoryTokenStore;
pub use store::{FileTokenStore, StoreError, TokenStore};

pub const SIGN_IN_FAILED: &str = "Failed to sign in. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPhase {
    /// A persisted credential has not been checked yet.
    Loading,
    Authenticated(Session),
    /// `expired` is set when a credential existed but the server rejected it.
    Unauthenticated { expired: bool },
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("sign-in rejected")]
    Rejected { detail: Option<String> },
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Message for the sign-in form.
    pub fn message(&self) -> String {
        match self {
            AuthError::Rejected { detail } => {
                detail.clone().unwrap_or_else(|| SIGN_IN_FAILED.to_string())
            }
            AuthError::Api(e) => e.message_or(SIGN_IN_FAILED),
            AuthError::Store(_) => SIGN_IN_FAILED.to_string(),
        }
    }
}

/// Authentication state with an explicit lifecycle: `restore` on start,
/// `login` to replace, `logout`/`expire` to clear.
pub struct AuthContext<S> {
    api: Arc<dyn TaskApi>,
    store: S,
    phase: AuthPhase,
}

impl<S: TokenStore> AuthContext<S> {
    pub fn new(api: Arc<dyn TaskApi>, store: S) -> Self {
        AuthContext {
            api,
            store,
            phase: AuthPhase::Loading,
        }
    }

    pub fn phase(&self) -> &AuthPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, AuthPhase::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.phase, AuthPhase::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            AuthPhase::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|s| &s.user)
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.session().map(|s| &s.credential)
    }

    pub fn api(&self) -> &dyn TaskApi {
        self.api.as_ref()
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Validate any persisted credential and leave the `Loading` phase.
    pub async fn restore(&mut self) -> &AuthPhase {
        let credential = match self.store.load() {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                self.phase = AuthPhase::Unauthenticated { expired: false };
                return &self.phase;
            }
            Err(e) => {
                warn!("ignoring unreadable session: {e}");
                self.phase = AuthPhase::Unauthenticated { expired: false };
                return &self.phase;
            }
        };

        self.phase = match self.api.current_user(&credential).await {
            Ok(user) => AuthPhase::Authenticated(Session { credential, user }),
            Err(ApiError::Unauthorized { .. }) => {
                self.clear_store();
                AuthPhase::Unauthenticated { expired: true }
            }
            Err(e) => {
                warn!("could not validate session: {e}");
                AuthPhase::Unauthenticated { expired: false }
            }
        };
        &self.phase
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let session = self
            .api
            .login(email.trim(), password)
            .await
            .map_err(|e| match e {
                ApiError::Unauthorized { detail } => AuthError::Rejected { detail },
                other => AuthError::Api(other),
            })?;
        self.store.save(&session)?;
        info!(email = %session.user.email, "signed in");
        let user = session.user.clone();
        self.phase = AuthPhase::Authenticated(session);
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.clear_store();
        if let Some(user) = self.user() {
            info!(email = %user.email, "signed out");
        }
        self.phase = AuthPhase::Unauthenticated { expired: false };
    }

    /// Called when the server rejects the credential mid-screen.
    pub fn expire(&mut self) {
        self.clear_store();
        self.phase = AuthPhase::Unauthenticated { expired: true };
    }

    fn clear_store(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("failed to clear stored session: {e}");
        }
    }
}
