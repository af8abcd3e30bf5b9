use dialoguer::Confirm;

use super::{api_failure, signed_in};
use taskdeck::auth::Route;
use taskdeck::config::Config;
use taskdeck::screens::TaskDetailScreen;

pub async fn run(config: &Config, id: &str, yes: bool) -> anyhow::Result<()> {
    let (mut auth, session) = signed_in(config, Route::TaskDetail(id.to_string())).await?;
    let mut screen = TaskDetailScreen::new(id);
    let confirm = |prompt: &str| {
        yes || Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    };

    match screen.delete(auth.api(), &session.credential, confirm).await {
        Ok(true) => println!("Deleted task {id}"),
        Ok(false) => println!("Cancelled."),
        Err(e) => {
            let message = screen
                .error()
                .map(|b| b.message.clone())
                .unwrap_or_else(|| e.to_string());
            return Err(api_failure(&mut auth, &e, message));
        }
    }
    Ok(())
}
