//! In-process stand-in for the remote task REST API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use cucumber::{given, then};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::DeckWorld;

const TIMESTAMP: &str = "2026-01-05T09:30:00.123456";

#[derive(Debug, Clone)]
struct StubUser {
    id: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StubTodo {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Default)]
pub struct StubState {
    users: Vec<StubUser>,
    tokens: HashMap<String, String>,
    pub todos: Vec<StubTodo>,
    /// Successful create/update/delete calls.
    pub mutations: usize,
    /// When set, the next `/todos` request answers 500 without a detail.
    fail_next_todo_request: bool,
}

/// Handle to a running stub: its base URL and shared state.
#[derive(Debug, Clone)]
pub struct StubApi {
    pub base_url: String,
    state: Arc<Mutex<StubState>>,
}

impl StubApi {
    pub fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().expect("stub state poisoned")
    }

    pub fn todo(&self, id: &str) -> Option<StubTodo> {
        self.state().todos.iter().find(|t| t.id == id).cloned()
    }

    pub fn todo_titled(&self, title: &str) -> Option<StubTodo> {
        self.state().todos.iter().find(|t| t.title == title).cloned()
    }
}

type Shared = Arc<Mutex<StubState>>;

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn user_json(user: &StubUser) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "first_name": null,
        "last_name": null,
    })
}

/// Resolve the bearer token to a user id.
fn authorize(state: &StubState, headers: &HeaderMap) -> Result<String, Response> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| state.tokens.get(token))
        .cloned()
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

/// Authorize a `/todos` call, honouring a scheduled failure.
fn authorize_todos(state: &mut StubState, headers: &HeaderMap) -> Result<String, Response> {
    let user_id = authorize(state, headers)?;
    if std::mem::take(&mut state.fail_next_todo_request) {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))).into_response());
    }
    Ok(user_id)
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(State(state): State<Shared>, Json(body): Json<Credentials>) -> Response {
    let mut state = state.lock().expect("stub state poisoned");
    let Some(user) = state
        .users
        .iter()
        .find(|u| u.email == body.email && u.password == body.password)
        .cloned()
    else {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    };
    let token = uuid::Uuid::new_v4().to_string();
    state.tokens.insert(token.clone(), user.id.clone());
    Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "user": user_json(&user),
    }))
    .into_response()
}

async fn register(State(state): State<Shared>, Json(body): Json<Credentials>) -> Response {
    let mut state = state.lock().expect("stub state poisoned");
    if state.users.iter().any(|u| u.email == body.email) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    let user = StubUser {
        id: uuid::Uuid::new_v4().to_string(),
        email: body.email,
        password: body.password,
    };
    let body = user_json(&user);
    state.users.push(user);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().expect("stub state poisoned");
    let user_id = match authorize(&state, &headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.users.iter().find(|u| u.id == user_id) {
        Some(user) => Json(user_json(user)).into_response(),
        None => detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"),
    }
}

async fn list_todos(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().expect("stub state poisoned");
    let user_id = match authorize_todos(&mut state, &headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let todos: Vec<&StubTodo> = state.todos.iter().filter(|t| t.user_id == user_id).collect();
    Json(json!(todos)).into_response()
}

async fn create_todo(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().expect("stub state poisoned");
    let user_id = match authorize_todos(&mut state, &headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if body["user_id"].as_str() != Some(user_id.as_str()) {
        return detail(StatusCode::FORBIDDEN, "Cannot create todo for another user");
    }
    let title = body["title"].as_str().unwrap_or_default().to_string();
    if title.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [{ "loc": ["body", "title"], "msg": "field required" }] })),
        )
            .into_response();
    }
    let todo = StubTodo {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        description: body["description"].as_str().map(str::to_string),
        is_completed: body["is_completed"].as_bool().unwrap_or(false),
        user_id,
        created_at: TIMESTAMP.to_string(),
        updated_at: TIMESTAMP.to_string(),
    };
    state.todos.push(todo.clone());
    state.mutations += 1;
    (StatusCode::CREATED, Json(todo)).into_response()
}

/// The API types todo ids as UUIDs; anything else fails request validation.
fn malformed_id(id: &str) -> Option<Response> {
    if uuid::Uuid::parse_str(id).is_ok() {
        return None;
    }
    let body = json!({
        "detail": [{ "loc": ["path", "todo_id"], "msg": "Input should be a valid UUID" }]
    });
    Some((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response())
}

fn find_owned(state: &StubState, user_id: &str, id: &str) -> Option<usize> {
    state
        .todos
        .iter()
        .position(|t| t.id == id && t.user_id == user_id)
}

async fn get_todo(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Some(resp) = malformed_id(&id) {
        return resp;
    }
    let mut state = state.lock().expect("stub state poisoned");
    let user_id = match authorize_todos(&mut state, &headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match find_owned(&state, &user_id, &id) {
        Some(i) => Json(state.todos[i].clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Todo not found or access denied"),
    }
}

async fn update_todo(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(resp) = malformed_id(&id) {
        return resp;
    }
    let mut state = state.lock().expect("stub state poisoned");
    let user_id = match authorize_todos(&mut state, &headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Some(i) = find_owned(&state, &user_id, &id) else {
        return detail(StatusCode::NOT_FOUND, "Todo not found or access denied");
    };
    let todo = &mut state.todos[i];
    if let Some(title) = body.get("title").and_then(Value::as_str) {
        todo.title = title.to_string();
    }
    if let Some(description) = body.get("description") {
        todo.description = description.as_str().map(str::to_string);
    }
    if let Some(completed) = body.get("is_completed").and_then(Value::as_bool) {
        todo.is_completed = completed;
    }
    todo.updated_at = "2026-01-06T10:00:00.000000".to_string();
    let updated = todo.clone();
    state.mutations += 1;
    Json(updated).into_response()
}

async fn delete_todo(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Some(resp) = malformed_id(&id) {
        return resp;
    }
    let mut state = state.lock().expect("stub state poisoned");
    let user_id = match authorize_todos(&mut state, &headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Some(i) = find_owned(&state, &user_id, &id) else {
        return detail(StatusCode::NOT_FOUND, "Todo not found or access denied");
    };
    state.todos.remove(i);
    state.mutations += 1;
    StatusCode::NO_CONTENT.into_response()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/todos/", get(list_todos).post(create_todo))
        .route(
            "/api/v1/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(state)
}

/// Start the stub on an ephemeral port and record it on the world.
pub async fn start_stub(world: &mut DeckWorld) {
    let state: Shared = Arc::new(Mutex::new(StubState::default()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind to ephemeral port");
    let port = listener
        .local_addr()
        .expect("failed to get local addr")
        .port();
    let app = router(state.clone());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("stub API error in test");
    });

    world.server_handles.push(handle);
    world.stub = Some(StubApi {
        base_url: format!("http://127.0.0.1:{port}"),
        state,
    });
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("the task API is running")]
async fn the_task_api_is_running(world: &mut DeckWorld) {
    start_stub(world).await;
}

#[given(expr = "the task API has a user {string} with password {string}")]
async fn the_task_api_has_a_user(world: &mut DeckWorld, email: String, password: String) {
    let id = uuid::Uuid::new_v4().to_string();
    world.stub().state().users.push(StubUser {
        id,
        email,
        password,
    });
}

/// Seed a task for `email`; `status` is `pending` or `completed`.
#[given(expr = "{string} has a {word} task {string} titled {string}")]
async fn user_has_a_task(
    world: &mut DeckWorld,
    email: String,
    status: String,
    alias: String,
    title: String,
) {
    let id = uuid::Uuid::new_v4().to_string();
    {
        let mut state = world.stub().state();
        let user_id = state
            .users
            .iter()
            .find(|u| u.email == email)
            .unwrap_or_else(|| panic!("no stub user {email}"))
            .id
            .clone();
        state.todos.push(StubTodo {
            id: id.clone(),
            title,
            description: None,
            is_completed: status == "completed",
            user_id,
            created_at: TIMESTAMP.to_string(),
            updated_at: TIMESTAMP.to_string(),
        });
    }
    world.task_ids.insert(alias, id);
}

#[given("the task API fails the next task request")]
async fn the_task_api_fails_the_next_task_request(world: &mut DeckWorld) {
    world.stub().state().fail_next_todo_request = true;
}

#[given("the task API revokes all sessions")]
async fn the_task_api_revokes_all_sessions(world: &mut DeckWorld) {
    world.stub().state().tokens.clear();
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the task API received no task changes")]
async fn no_task_changes(world: &mut DeckWorld) {
    let mutations = world.stub().state().mutations;
    assert_eq!(mutations, 0, "expected no task mutations, saw {mutations}");
}

#[then(expr = "the task API has {int} task(s)")]
async fn the_task_api_has_n_tasks(world: &mut DeckWorld, expected: usize) {
    let actual = world.stub().state().todos.len();
    assert_eq!(actual, expected, "expected {expected} stored tasks, found {actual}");
}

#[then(expr = "the task API stored a task titled {string} without a description")]
async fn stored_task_without_description(world: &mut DeckWorld, title: String) {
    let todo = world
        .stub()
        .todo_titled(&title)
        .unwrap_or_else(|| panic!("no stored task titled {title:?}"));
    assert_eq!(todo.description, None, "description should be absent");
}

#[then(regex = r#"^task "([^"]*)" is (completed|pending) in the task API$"#)]
async fn task_state_in_api(world: &mut DeckWorld, alias: String, status: String) {
    let id = world.task_id(&alias);
    let todo = world
        .stub()
        .todo(&id)
        .unwrap_or_else(|| panic!("task {alias} missing from the API"));
    assert_eq!(
        todo.is_completed,
        status == "completed",
        "task {alias} expected {status}"
    );
}

#[then(expr = "task {string} is unchanged in the task API")]
async fn task_unchanged_in_api(world: &mut DeckWorld, alias: String) {
    let id = world.task_id(&alias);
    let todo = world
        .stub()
        .todo(&id)
        .unwrap_or_else(|| panic!("task {alias} missing from the API"));
    assert_eq!(todo.updated_at, TIMESTAMP, "task {alias} was modified");
}

#[then(expr = "task {string} no longer exists in the task API")]
async fn task_gone_from_api(world: &mut DeckWorld, alias: String) {
    let id = world.task_id(&alias);
    assert!(world.stub().todo(&id).is_none(), "task {alias} still exists");
}
