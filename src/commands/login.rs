use anyhow::{Context, bail};
use dialoguer::Input;

use super::{context, print_json};
use taskdeck::auth::{GuardOutcome, Route, RouteGuard};
use taskdeck::config::Config;
use taskdeck::screens::SignInForm;

pub async fn run(
    config: &Config,
    email: Option<&str>,
    password: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let mut auth = context(config)?;
    auth.restore().await;
    let mut guard = RouteGuard::new(Route::SignIn {
        session_expired: false,
    });
    if let GuardOutcome::Redirect(_) = guard.evaluate(auth.phase()) {
        if let Some(user) = auth.user() {
            println!("Already signed in as {}. Run `td logout` first.", user.email);
        }
        return Ok(());
    }

    let mut form = SignInForm::new(false, false);
    form.email = match email {
        Some(email) => email.to_string(),
        None => Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .context("failed to read email")?,
    };
    let password = match password {
        Some(password) => password.to_string(),
        None => rpassword::prompt_password("Password: ").context("failed to read password")?,
    };

    let Some(user) = form.submit(&mut auth, &password).await else {
        bail!("{}", form.error().unwrap_or_default());
    };
    if json {
        print_json(&user)?;
    } else {
        println!("Signed in as {}", user.email);
    }
    Ok(())
}
