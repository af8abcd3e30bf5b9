use cucumber::{given, then, when};
use predicates::prelude::*;

use crate::DeckWorld;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Split a command line on whitespace, keeping double-quoted runs intact.
fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;
    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}

/// Run `td` with the given args against the stub API and a scenario-local
/// session file. Stores stdout, stderr, and exit code on the world.
async fn run_td(world: &mut DeckWorld, args: Vec<String>) {
    if world.session_dir.is_none() {
        world.session_dir = Some(tempfile::TempDir::new().expect("create temp dir"));
    }
    let session_file = world
        .session_dir
        .as_ref()
        .expect("session dir just set")
        .path()
        .join("session.json");
    let api_url = world.stub().base_url.clone();

    // The stub API runs on this runtime; keep the blocking child off it.
    let output = tokio::task::spawn_blocking(move || {
        assert_cmd::Command::cargo_bin("td")
            .expect("td binary not found")
            .env("TASKDECK_API_URL", api_url)
            .env("TASKDECK_SESSION", session_file)
            .env_remove("TASKDECK_PASSWORD")
            .env("NO_COLOR", "1")
            .args(&args)
            .output()
            .expect("failed to run td")
    })
    .await
    .expect("td runner panicked");

    world.last_stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    world.last_stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    world.last_exit_code = output.status.code().unwrap_or(-1);
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given(expr = "I am logged in on the command line as {string} with password {string}")]
async fn i_am_logged_in(world: &mut DeckWorld, email: String, password: String) {
    let args = vec![
        "login".to_string(),
        "--email".to_string(),
        email,
        "--password".to_string(),
        password,
    ];
    run_td(world, args).await;
    assert_eq!(
        world.last_exit_code, 0,
        "td login failed: {}",
        world.last_stderr
    );
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

/// Run `td` with a command line; `<alias>` placeholders become task IDs.
#[when(expr = "I run td {string}")]
async fn i_run_td(world: &mut DeckWorld, line: String) {
    let args = split_args(&world.resolve(&line));
    run_td(world, args).await;
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the command succeeds")]
async fn the_command_succeeds(world: &mut DeckWorld) {
    assert_eq!(
        world.last_exit_code, 0,
        "expected success, stderr was:\n{}",
        world.last_stderr
    );
}

#[then("the command fails")]
async fn the_command_fails(world: &mut DeckWorld) {
    assert_ne!(
        world.last_exit_code, 0,
        "expected failure, stdout was:\n{}",
        world.last_stdout
    );
}

#[then(expr = "stdout contains {string}")]
async fn stdout_contains(world: &mut DeckWorld, expected: String) {
    assert!(
        predicate::str::contains(expected.as_str()).eval(&world.last_stdout),
        "expected stdout to contain {expected:?}, got:\n{}",
        world.last_stdout
    );
}

#[then(expr = "stderr contains {string}")]
async fn stderr_contains(world: &mut DeckWorld, expected: String) {
    assert!(
        predicate::str::contains(expected.as_str()).eval(&world.last_stderr),
        "expected stderr to contain {expected:?}, got:\n{}",
        world.last_stderr
    );
}

#[then("the session file exists")]
async fn the_session_file_exists(world: &mut DeckWorld) {
    let dir = world.session_dir.as_ref().expect("no session dir");
    assert!(dir.path().join("session.json").exists());
}

#[then("the session file does not exist")]
async fn the_session_file_does_not_exist(world: &mut DeckWorld) {
    let dir = world.session_dir.as_ref().expect("no session dir");
    assert!(!dir.path().join("session.json").exists());
}
