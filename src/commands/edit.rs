use anyhow::bail;

use super::{api_failure, print_json, signed_in};
use taskdeck::auth::Route;
use taskdeck::config::Config;
use taskdeck::screens::task_detail::NOT_FOUND_MESSAGE;
use taskdeck::screens::{DetailState, FormError, TaskDetailScreen};

/// Fields to change; `None` keeps the current value.
#[derive(Debug, Default)]
pub struct Edits<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub completed: Option<bool>,
}

pub async fn run(config: &Config, id: &str, edits: Edits<'_>, json: bool) -> anyhow::Result<()> {
    let (mut auth, session) = signed_in(config, Route::TaskDetail(id.to_string())).await?;
    let mut screen = TaskDetailScreen::new(id);
    if let Err(e) = screen.load(auth.api(), &session.credential).await {
        return Err(api_failure(&mut auth, &e, e.to_string()));
    }
    let mut form = match screen.state() {
        DetailState::Loaded { form, .. } => form.clone(),
        DetailState::NotFound => bail!("{NOT_FOUND_MESSAGE}: {id}"),
        DetailState::Failed(banner) => bail!("{}", banner.message),
        DetailState::Loading => bail!("task {id} did not load"),
    };

    if let Some(title) = edits.title {
        form.title = title.to_string();
    }
    if let Some(description) = edits.description {
        form.description = description.to_string();
    }
    if let Some(completed) = edits.completed {
        form.completed = completed;
    }

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
        println!("Updated task {}: {}", task.id, task.title);
    }
    Ok(())
}
