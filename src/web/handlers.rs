use askama::Template;
use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use axum_htmx::{HX_REDIRECT, HxRequest};
use serde::Deserialize;
use tracing::debug;

use super::AppState;
use super::errors::AppError;
use super::pages::{
    ConfirmDeletePage, LoadingPage, NotFoundPage, SectionsView, SignInPage, SignUpPage,
    TaskErrorPage, TaskFormPage, TaskListPage, TaskSectionsFragment,
};
use super::session::CookieTokenStore;
use crate::auth::{AuthContext, GuardOutcome, Route, RouteGuard};
use crate::models::Session;
use crate::screens::{
    DetailState, FormError, SignInForm, SignUpForm, TaskDetailScreen, TaskForm, TaskListScreen,
};

type Auth = AuthContext<CookieTokenStore>;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Restore the session from the request cookie and run the route guard.
/// `Err` carries the response to send instead of the screen.
async fn enter(
    state: &AppState,
    jar: CookieJar,
    route: Route,
    hx: bool,
) -> Result<Auth, Response> {
    let mut auth = AuthContext::new(state.api.clone(), CookieTokenStore::new(jar));
    auth.restore().await;
    let mut guard = RouteGuard::new(route);
    match guard.evaluate(auth.phase()) {
        GuardOutcome::Render => Ok(auth),
        GuardOutcome::Redirect(target) => Err(redirect_hx(auth, &target.path(), hx)),
        GuardOutcome::Placeholder => Err(match LoadingPage::default().render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => AppError::from(e).into_response(),
        }),
        GuardOutcome::Blank => Err(StatusCode::NO_CONTENT.into_response()),
    }
}

/// `enter` for screens behind sign-in.
async fn signed_in(
    state: &AppState,
    jar: CookieJar,
    route: Route,
    hx: bool,
) -> Result<(Auth, Session), Response> {
    let auth = enter(state, jar, route, hx).await?;
    match auth.session().cloned() {
        Some(session) => Ok((auth, session)),
        None => {
            let target = Route::SignIn {
                session_expired: false,
            };
            Err(redirect_hx(auth, &target.path(), hx))
        }
    }
}

fn redirect(auth: Auth, route: &Route) -> Response {
    redirect_to(auth, &route.path())
}

fn redirect_to(auth: Auth, path: &str) -> Response {
    (auth.into_store().into_jar(), Redirect::to(path)).into_response()
}

/// htmx swaps redirected bodies into the target, so it gets `HX-Redirect`.
fn redirect_hx(auth: Auth, path: &str, hx: bool) -> Response {
    if !hx {
        return redirect_to(auth, path);
    }
    let jar = auth.into_store().into_jar();
    (jar, [(HX_REDIRECT, path.to_string())]).into_response()
}

/// The server rejected the credential mid-screen.
fn session_expired(mut auth: Auth, hx: bool) -> Response {
    auth.expire();
    let target = Route::SignIn {
        session_expired: true,
    };
    redirect_hx(auth, &target.path(), hx)
}

fn render(auth: Auth, status: StatusCode, page: impl Template) -> Result<Response, AppError> {
    let html = page.render()?;
    Ok((status, auth.into_store().into_jar(), Html(html)).into_response())
}

fn email(auth: &Auth) -> Option<String> {
    auth.user().map(|u| u.email.clone())
}

/// Response after a list action: the sections fragment for htmx, otherwise
/// back to the list (or the full page when there is a banner to show).
fn list_response(auth: Auth, hx: bool, screen: &TaskListScreen) -> Result<Response, AppError> {
    if hx {
        let fragment = TaskSectionsFragment {
            view: SectionsView::new(screen),
        };
        return render(auth, StatusCode::OK, fragment);
    }
    if screen.error().is_some() {
        let page = TaskListPage {
            user_email: email(&auth),
            view: SectionsView::new(screen),
        };
        return render(auth, StatusCode::OK, page);
    }
    Ok(redirect(auth, &Route::TaskList))
}

/// Page for a detail screen that did not load.
fn unloaded(auth: Auth, screen: &TaskDetailScreen) -> Result<Response, AppError> {
    match screen.state() {
        DetailState::Failed(banner) => {
            let page = TaskErrorPage {
                user_email: email(&auth),
                banner: banner.clone(),
            };
            render(auth, StatusCode::BAD_GATEWAY, page)
        }
        _ => {
            let page = NotFoundPage::new(email(&auth));
            render(auth, StatusCode::NOT_FOUND, page)
        }
    }
}

fn form_status(e: &FormError) -> StatusCode {
    match e {
        FormError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FormError::Api(e) if e.is_not_found() => StatusCode::NOT_FOUND,
        FormError::Api(_) => StatusCode::BAD_GATEWAY,
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct SignInQuery {
    #[serde(default)]
    session_expired: bool,
    #[serde(default)]
    registered: bool,
}

#[derive(Debug, Deserialize)]
pub struct SignInInput {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignUpInput {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    /// Checkbox: present only when ticked.
    completed: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteInput {
    confirm: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn index() -> Redirect {
    Redirect::to(&Route::TaskList.path())
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn sign_in_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<SignInQuery>,
) -> Result<Response, AppError> {
    let route = Route::SignIn {
        session_expired: query.session_expired,
    };
    let auth = match enter(&state, jar, route, false).await {
        Ok(auth) => auth,
        Err(resp) => return Ok(resp),
    };
    let form = SignInForm::new(query.session_expired, query.registered);
    render(auth, StatusCode::OK, SignInPage::new(&form))
}

pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(input): Form<SignInInput>,
) -> Result<Response, AppError> {
    let route = Route::SignIn {
        session_expired: false,
    };
    let mut auth = match enter(&state, jar, route, false).await {
        Ok(auth) => auth,
        Err(resp) => return Ok(resp),
    };
    let mut form = SignInForm::new(false, false);
    form.email = input.email;
    if form.submit(&mut auth, &input.password).await.is_some() {
        return Ok(redirect(auth, &Route::TaskList));
    }
    render(auth, StatusCode::UNAUTHORIZED, SignInPage::new(&form))
}

pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> Response {
    let mut auth = AuthContext::new(state.api.clone(), CookieTokenStore::new(jar));
    auth.logout();
    redirect(
        auth,
        &Route::SignIn {
            session_expired: false,
        },
    )
}

pub async fn sign_up_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let auth = match enter(&state, jar, Route::SignUp, false).await {
        Ok(auth) => auth,
        Err(resp) => return Ok(resp),
    };
    render(auth, StatusCode::OK, SignUpPage::new(&SignUpForm::new()))
}

pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(input): Form<SignUpInput>,
) -> Result<Response, AppError> {
    let auth = match enter(&state, jar, Route::SignUp, false).await {
        Ok(auth) => auth,
        Err(resp) => return Ok(resp),
    };
    let mut form = SignUpForm::new();
    form.email = input.email;
    if form
        .submit(auth.api(), &input.password, &input.confirm)
        .await
        .is_some()
    {
        return Ok(redirect_to(auth, "/signin?registered=true"));
    }
    render(auth, StatusCode::UNPROCESSABLE_ENTITY, SignUpPage::new(&form))
}

pub async fn task_list(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (auth, session) = match signed_in(&state, jar, Route::TaskList, false).await {
        Ok(v) => v,
        Err(resp) => return Ok(resp),
    };
    let mut screen = TaskListScreen::new();
    if screen
        .load(auth.api(), &session.credential)
        .await
        .is_err_and(|e| e.is_unauthorized())
    {
        return Ok(session_expired(auth, false));
    }
    let page = TaskListPage {
        user_email: Some(session.user.email),
        view: SectionsView::new(&screen),
    };
    render(auth, StatusCode::OK, page)
}

pub async fn toggle_task(
    State(state): State<AppState>,
    jar: CookieJar,
    HxRequest(hx): HxRequest,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (auth, session) = match signed_in(&state, jar, Route::TaskList, hx).await {
        Ok(v) => v,
        Err(resp) => return Ok(resp),
    };
    let credential = &session.credential;
    let mut screen = TaskListScreen::new();
    if screen
        .load(auth.api(), credential)
        .await
        .is_err_and(|e| e.is_unauthorized())
        || screen
            .toggle(auth.api(), credential, &id)
            .await
            .is_err_and(|e| e.is_unauthorized())
    {
        return Ok(session_expired(auth, hx));
    }
    debug!(%id, "toggled task");
    list_response(auth, hx, &screen)
}

pub async fn confirm_delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let route = Route::TaskDetail(id.clone());
    let (auth, session) = match signed_in(&state, jar, route, false).await {
        Ok(v) => v,
        Err(resp) => return Ok(resp),
    };
    let mut screen = TaskDetailScreen::new(id);
    if screen
        .load(auth.api(), &session.credential)
        .await
        .is_err_and(|e| e.is_unauthorized())
    {
        return Ok(session_expired(auth, false));
    }
    let Some(task) = screen.task() else {
        return unloaded(auth, &screen);
    };
    let page = ConfirmDeletePage::new(Some(session.user.email), task);
    render(auth, StatusCode::OK, page)
}

pub async fn delete_task(
    State(state): State<AppState>,
    jar: CookieJar,
    HxRequest(hx): HxRequest,
    Path(id): Path<String>,
    Form(input): Form<DeleteInput>,
) -> Result<Response, AppError> {
    let confirmed = input.confirm.is_some();
    let route = Route::TaskDetail(id.clone());
    let (auth, session) = match signed_in(&state, jar, route, hx).await {
        Ok(v) => v,
        Err(resp) => return Ok(resp),
    };
    let credential = &session.credential;

    if hx {
        let mut screen = TaskListScreen::new();
        match screen.load(auth.api(), credential).await {
            Err(e) if e.is_unauthorized() => return Ok(session_expired(auth, true)),
            // Nothing is deleted off a list that did not load.
            Err(_) => return list_response(auth, true, &screen),
            Ok(()) => {}
        }
        if screen
            .delete(auth.api(), credential, &id, |_| confirmed)
            .await
            .is_err_and(|e| e.is_unauthorized())
        {
            return Ok(session_expired(auth, true));
        }
        return list_response(auth, true, &screen);
    }

    let mut screen = TaskDetailScreen::new(id.clone());
    match screen.delete(auth.api(), credential, |_| confirmed).await {
        Ok(true) => {
            debug!(%id, "deleted task");
            Ok(redirect(auth, &Route::TaskList))
        }
        Ok(false) => Ok(redirect_to(auth, &format!("/tasks/{id}/delete"))),
        Err(e) if e.is_unauthorized() => Ok(session_expired(auth, false)),
        Err(_) => {
            if screen
                .load(auth.api(), credential)
                .await
                .is_err_and(|e| e.is_unauthorized())
            {
                return Ok(session_expired(auth, false));
            }
            let Some(form) = screen.form() else {
                return unloaded(auth, &screen);
            };
            let page = TaskFormPage::new(Some(session.user.email.clone()), Some(&id), form)
                .with_delete_error(screen.error());
            render(auth, StatusCode::BAD_GATEWAY, page)
        }
    }
}

pub async fn new_task_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (auth, session) = match signed_in(&state, jar, Route::NewTask, false).await {
        Ok(v) => v,
        Err(resp) => return Ok(resp),
    };
    let form = TaskForm::create(session.user.id);
    let page = TaskFormPage::new(Some(session.user.email), None, &form);
    render(auth, StatusCode::OK, page)
}

pub async fn create_task(
    State(state): State<AppState>,
    jar: CookieJar,
    HxRequest(hx): HxRequest,
    Form(input): Form<TaskInput>,
) -> Result<Response, AppError> {
    let (auth, session) = match signed_in(&state, jar, Route::NewTask, hx).await {
        Ok(v) => v,
        Err(resp) => return Ok(resp),
    };
    let mut form = TaskForm::create(session.user.id.clone());
    form.title = input.title;
    form.description = input.description;
    match form.submit(auth.api(), &session.credential).await {
        Ok(task) => {
            debug!(id = %task.id, "created task");
            Ok(redirect_hx(auth, &Route::TaskList.path(), hx))
        }
        Err(FormError::Api(e)) if e.is_unauthorized() => Ok(session_expired(auth, hx)),
        Err(e) => {
            let page = TaskFormPage::new(Some(session.user.email), None, &form);
            render(auth, form_status(&e), page)
        }
    }
}

pub async fn task_detail(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let route = Route::TaskDetail(id.clone());
    let (auth, session) = match signed_in(&state, jar, route, false).await {
        Ok(v) => v,
        Err(resp) => return Ok(resp),
    };
    let mut screen = TaskDetailScreen::new(id.clone());
    if screen
        .load(auth.api(), &session.credential)
        .await
        .is_err_and(|e| e.is_unauthorized())
    {
        return Ok(session_expired(auth, false));
    }
    let Some(form) = screen.form() else {
        return unloaded(auth, &screen);
    };
    let page = TaskFormPage::new(Some(session.user.email), Some(&id), form);
    render(auth, StatusCode::OK, page)
}

pub async fn update_task(
    State(state): State<AppState>,
    jar: CookieJar,
    HxRequest(hx): HxRequest,
    Path(id): Path<String>,
    Form(input): Form<TaskInput>,
) -> Result<Response, AppError> {
    let route = Route::TaskDetail(id.clone());
    let (auth, session) = match signed_in(&state, jar, route, hx).await {
        Ok(v) => v,
        Err(resp) => return Ok(resp),
    };
    let mut form = TaskForm::edit_fields(
        id.clone(),
        input.title,
        input.description,
        input.completed.is_some(),
    );
    match form.submit(auth.api(), &session.credential).await {
        Ok(_) => {
            debug!(%id, "updated task");
            Ok(redirect_hx(auth, &Route::TaskList.path(), hx))
        }
        Err(FormError::Api(e)) if e.is_unauthorized() => Ok(session_expired(auth, hx)),
        Err(FormError::Api(e)) if e.is_not_found() => {
            let page = NotFoundPage::new(Some(session.user.email));
            render(auth, StatusCode::NOT_FOUND, page)
        }
        Err(e) => {
            let page = TaskFormPage::new(Some(session.user.email), Some(&id), &form);
            render(auth, form_status(&e), page)
        }
    }
}
