use super::AuthPhase;

/// Navigable screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SignIn { session_expired: bool },
    SignUp,
    TaskList,
    NewTask,
    TaskDetail(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::SignIn {
                session_expired: true,
            } => "/signin?session_expired=true".to_string(),
            Route::SignIn { .. } => "/signin".to_string(),
            Route::SignUp => "/signup".to_string(),
            Route::TaskList => "/tasks".to_string(),
            Route::NewTask => "/tasks/new".to_string(),
            Route::TaskDetail(id) => format!("/tasks/{id}"),
        }
    }

    /// Screens that only make sense without a session.
    pub fn is_auth_screen(&self) -> bool {
        matches!(self, Route::SignIn { .. } | Route::SignUp)
    }
}

/// What a screen shell should do after an auth state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Auth state is still being resolved: show a neutral placeholder.
    Placeholder,
    Render,
    Redirect(Route),
    /// A redirect has already been issued; render nothing.
    Blank,
}

/// Per-screen `LOADING -> {AUTHENTICATED, UNAUTHENTICATED}` machine.
///
/// Each guard issues at most one redirect, and never while loading.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    route: Route,
    redirected: bool,
}

impl RouteGuard {
    pub fn new(route: Route) -> Self {
        RouteGuard {
            route,
            redirected: false,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn evaluate(&mut self, phase: &AuthPhase) -> GuardOutcome {
        let target = match phase {
            AuthPhase::Loading => return GuardOutcome::Placeholder,
            AuthPhase::Unauthenticated { expired } if !self.route.is_auth_screen() => {
                Route::SignIn {
                    session_expired: *expired,
                }
            }
            AuthPhase::Authenticated(_) if self.route.is_auth_screen() => Route::TaskList,
            _ => return GuardOutcome::Render,
        };

        if self.redirected {
            return GuardOutcome::Blank;
        }
        self.redirected = true;
        GuardOutcome::Redirect(target)
    }
}
