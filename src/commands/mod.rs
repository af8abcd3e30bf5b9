pub mod create;
pub mod delete;
pub mod edit;
pub mod list;
pub mod login;
pub mod logout;
pub mod register;
pub mod serve;
pub mod show;
pub mod toggle;
pub mod whoami;

use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use taskdeck::api::ApiError;
use taskdeck::auth::{AuthContext, FileTokenStore, GuardOutcome, Route, RouteGuard};
use taskdeck::config::Config;
use taskdeck::models::{Session, Task};

pub type Auth = AuthContext<FileTokenStore>;

/// Auth context over the configured API and session file, not yet restored.
pub fn context(config: &Config) -> anyhow::Result<Auth> {
    let api = config.api().context("failed to build HTTP client")?;
    Ok(AuthContext::new(
        Arc::new(api),
        FileTokenStore::new(&config.session_file),
    ))
}

/// Restore the stored session and run the guard for `route`.
pub async fn signed_in(config: &Config, route: Route) -> anyhow::Result<(Auth, Session)> {
    let mut auth = context(config)?;
    auth.restore().await;
    let mut guard = RouteGuard::new(route);
    match guard.evaluate(auth.phase()) {
        GuardOutcome::Redirect(Route::SignIn {
            session_expired: true,
        }) => bail!("session expired; run `td login` again"),
        GuardOutcome::Redirect(Route::SignIn { .. }) => bail!("not signed in; run `td login`"),
        _ => {}
    }
    let session = auth
        .session()
        .cloned()
        .ok_or_else(|| anyhow!("not signed in; run `td login`"))?;
    Ok((auth, session))
}

/// Turn a failed call into the command's error, dropping the stored
/// session when the server no longer accepts it.
pub fn api_failure(auth: &mut Auth, e: &ApiError, message: String) -> anyhow::Error {
    if e.is_unauthorized() {
        auth.expire();
        return anyhow!("session expired; run `td login` again");
    }
    anyhow!(message)
}

pub fn format_status(completed: bool) -> String {
    if completed {
        "done".bright_black().to_string()
    } else {
        "pending".green().to_string()
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "CREATED")]
    created: String,
}

impl Row {
    fn new(task: &Task) -> Self {
        let title = if task.title.chars().count() > 48 {
            let cut: String = task.title.chars().take(45).collect();
            format!("{cut}...")
        } else {
            task.title.clone()
        };
        Row {
            id: task.id.clone(),
            title,
            created: task.created_label(),
        }
    }
}

/// Print one section of the task list as a table.
pub fn print_section(heading: &str, tasks: &[&Task]) {
    println!("{} ({})", heading.bold(), tasks.len());
    if tasks.is_empty() {
        println!("  {}", "none".bright_black());
        return;
    }
    let mut table = Table::new(tasks.iter().map(|t| Row::new(t)));
    table.with(Style::psql());
    println!("{table}");
}

pub fn print_task(task: &Task) {
    println!("ID:          {}", task.id);
    println!("Title:       {}", task.title);
    println!("Status:      {}", format_status(task.completed));
    if let Some(ref desc) = task.description {
        println!("Description: {desc}");
    }
    println!("Created:     {}", task.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated:     {}", task.updated_at.format("%Y-%m-%d %H:%M"));
}
