use anyhow::bail;

use super::{api_failure, print_json, print_task, signed_in};
use taskdeck::auth::Route;
use taskdeck::config::Config;
use taskdeck::screens::task_detail::NOT_FOUND_MESSAGE;
use taskdeck::screens::{DetailState, TaskDetailScreen};

pub async fn run(config: &Config, id: &str, json: bool) -> anyhow::Result<()> {
    let (mut auth, session) = signed_in(config, Route::TaskDetail(id.to_string())).await?;
    let mut screen = TaskDetailScreen::new(id);
    if let Err(e) = screen.load(auth.api(), &session.credential).await {
        return Err(api_failure(&mut auth, &e, e.to_string()));
    }
    match screen.state() {
        DetailState::Loaded { task, .. } if json => print_json(task),
        DetailState::Loaded { task, .. } => {
            print_task(task);
            Ok(())
        }
        DetailState::NotFound => bail!("{NOT_FOUND_MESSAGE}: {id}"),
        DetailState::Failed(banner) => bail!("{}", banner.message),
        DetailState::Loading => bail!("task {id} did not load"),
    }
}
