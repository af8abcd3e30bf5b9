use std::net::{IpAddr, SocketAddr};

use anyhow::Context;

use taskdeck::config::Config;
use taskdeck::web::{self, AppState};

pub async fn run(config: &Config, bind: IpAddr, port: u16) -> anyhow::Result<()> {
    let api = config.api().context("failed to build HTTP client")?;
    tracing::info!(api = %config.api_url, "proxying task API");
    let addr = SocketAddr::new(bind, port);
    web::serve(AppState::new(api), addr)
        .await
        .with_context(|| format!("failed to serve on {addr}"))
}
