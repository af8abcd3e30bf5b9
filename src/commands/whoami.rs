use taskdeck::auth::Route;
use taskdeck::config::Config;

use super::{print_json, signed_in};

pub async fn run(config: &Config, json: bool) -> anyhow::Result<()> {
    let (_, session) = signed_in(config, Route::TaskList).await?;
    if json {
        return print_json(&session.user);
    }
    println!("{}", session.user.email);
    Ok(())
}
