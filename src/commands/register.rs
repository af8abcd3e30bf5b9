use anyhow::{Context, bail};

use super::{context, print_json};
use taskdeck::config::Config;
use taskdeck::screens::SignUpForm;

pub async fn run(
    config: &Config,
    email: &str,
    password: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let auth = context(config)?;
    let (password, confirm) = match password {
        Some(password) => (password.to_string(), password.to_string()),
        None => (
            rpassword::prompt_password("Password: ").context("failed to read password")?,
            rpassword::prompt_password("Confirm password: ")
                .context("failed to read password")?,
        ),
    };

    let mut form = SignUpForm::new();
    form.email = email.to_string();
    let Some(user) = form.submit(auth.api(), &password, &confirm).await else {
        bail!("{}", form.error().unwrap_or_default());
    };
    if json {
        print_json(&user)?;
    } else {
        println!("Account created for {}. Run `td login` to sign in.", user.email);
    }
    Ok(())
}
