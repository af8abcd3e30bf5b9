use colored::Colorize;

use super::{api_failure, print_json, print_section, signed_in};
use taskdeck::auth::Route;
use taskdeck::config::Config;
use taskdeck::screens::TaskListScreen;

pub async fn run(config: &Config, json: bool) -> anyhow::Result<()> {
    let (mut auth, session) = signed_in(config, Route::TaskList).await?;
    let mut screen = TaskListScreen::new();
    if let Err(e) = screen.load(auth.api(), &session.credential).await {
        let message = screen
            .error()
            .map(|b| b.message.clone())
            .unwrap_or_else(|| e.to_string());
        return Err(api_failure(&mut auth, &e, message));
    }

    if json {
        return print_json(screen.tasks());
    }
    if screen.is_empty() {
        println!("No tasks yet. Create one with `td create <title>`.");
        return Ok(());
    }
    let sections = screen.sections();
    print_section(&"Pending".green().to_string(), &sections.pending);
    println!();
    print_section(&"Completed".bright_black().to_string(), &sections.completed);
    Ok(())
}
