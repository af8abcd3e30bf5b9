use taskdeck::auth::FileTokenStore;
use taskdeck::config::Config;

use super::context;

pub fn run(config: &Config) -> anyhow::Result<()> {
    let email = FileTokenStore::new(&config.session_file)
        .email()
        .ok()
        .flatten();
    let mut auth = context(config)?;
    auth.logout();
    match email {
        Some(email) => println!("Signed out {email}"),
        None => println!("Not signed in."),
    }
    Ok(())
}
