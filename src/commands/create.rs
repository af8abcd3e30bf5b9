use super::{api_failure, print_json, signed_in};
use taskdeck::auth::Route;
use taskdeck::config::Config;
use taskdeck::screens::{FormError, TaskForm};

pub async fn run(
    config: &Config,
    title: &str,
    description: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let (mut auth, session) = signed_in(config, Route::NewTask).await?;
    let mut form = TaskForm::create(session.user.id.clone());
    form.title = title.to_string();
    form.description = description.unwrap_or_default().to_string();

    let task = match form.submit(auth.api(), &session.credential).await {
        Ok(task) => task,
        Err(FormError::Invalid(e)) => return Err(e.into()),
        Err(FormError::Api(e)) => {
            let message = form.error().unwrap_or_default().to_string();
            return Err(api_failure(&mut auth, &e, message));
        }
    };
    if json {
        print_json(&task)?;
    } else {
        println!("Created task {}: {}", task.id, task.title);
    }
    Ok(())
}
