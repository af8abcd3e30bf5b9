mod steps;

use std::collections::HashMap;

use cucumber::World;
use tokio::task::JoinHandle;

use steps::stub_api::StubApi;

/// Shared state carried through each scenario.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct DeckWorld {
    /// In-process stand-in for the remote task API.
    pub stub: Option<StubApi>,
    /// Port of the `td serve` router under test.
    pub web_port: Option<u16>,
    /// Browser-like client: keeps cookies, never follows redirects.
    pub http_client: reqwest::Client,
    /// Servers spawned for this scenario; aborted on drop.
    pub server_handles: Vec<JoinHandle<()>>,
    /// Temporary directory that owns the terminal session file.
    pub session_dir: Option<tempfile::TempDir>,
    pub last_response_status: Option<u16>,
    pub last_response_body: Option<String>,
    pub last_location: Option<String>,
    pub last_hx_redirect: Option<String>,
    /// The raw stdout of the most recent `td` invocation.
    pub last_stdout: String,
    /// The raw stderr of the most recent `td` invocation.
    pub last_stderr: String,
    /// Exit code of the most recent `td` invocation.
    pub last_exit_code: i32,
    /// Alias to actual task ID map, populated by the task setup steps.
    pub task_ids: HashMap<String, String>,
}

impl DeckWorld {
    fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build HTTP client");
        DeckWorld {
            stub: None,
            web_port: None,
            http_client,
            server_handles: Vec::new(),
            session_dir: None,
            last_response_status: None,
            last_response_body: None,
            last_location: None,
            last_hx_redirect: None,
            last_stdout: String::new(),
            last_stderr: String::new(),
            last_exit_code: 0,
            task_ids: HashMap::new(),
        }
    }

    pub fn stub(&self) -> &StubApi {
        self.stub
            .as_ref()
            .expect("task API not started; add 'Given the task API is running'")
    }

    /// Replace `<alias>` placeholders with the recorded task IDs.
    pub fn resolve(&self, text: &str) -> String {
        let mut resolved = text.to_string();
        for (alias, id) in &self.task_ids {
            resolved = resolved.replace(&format!("<{alias}>"), id);
        }
        resolved
    }

    pub fn task_id(&self, alias: &str) -> String {
        self.task_ids
            .get(alias)
            .unwrap_or_else(|| panic!("no task with alias '{alias}'"))
            .clone()
    }
}

impl Drop for DeckWorld {
    fn drop(&mut self) {
        for handle in &self.server_handles {
            handle.abort();
        }
    }
}

#[tokio::main]
async fn main() {
    DeckWorld::run("tests/features").await;
}
