use anyhow::bail;

use super::{api_failure, format_status, print_json, signed_in};
use taskdeck::auth::Route;
use taskdeck::config::Config;
use taskdeck::screens::TaskListScreen;

pub async fn run(config: &Config, id: &str, json: bool) -> anyhow::Result<()> {
    let (mut auth, session) = signed_in(config, Route::TaskList).await?;
    let credential = &session.credential;
    let mut screen = TaskListScreen::new();
    if let Err(e) = screen.load(auth.api(), credential).await {
        return Err(api_failure(&mut auth, &e, e.message_or("Failed to load tasks")));
    }

    match screen.toggle(auth.api(), credential, id).await {
        Ok(true) => {}
        Ok(false) => bail!("task not found: {id}"),
        Err(e) => {
            let message = e.message_or("Failed to update task");
            return Err(api_failure(&mut auth, &e, message));
        }
    }
    let Some(task) = screen.tasks().iter().find(|t| t.id == id) else {
        bail!("task not found: {id}");
    };
    if json {
        print_json(task)?;
    } else {
        println!("{} {}", format_status(task.completed), task.title);
    }
    Ok(())
}
