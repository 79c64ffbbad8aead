use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const USER_AGENT: &str = concat!("scout_terminal/", env!("CARGO_PKG_VERSION"));

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Installs the shared client with the configured timeout. Returns `false`
/// when a client was already built, in which case its settings stay.
pub fn init_http_client(timeout: Option<Duration>) -> Result<bool> {
    if CLIENT.get().is_some() {
        return Ok(false);
    }
    let client = build_client(timeout).context("failed to build http client")?;
    Ok(CLIENT.set(client).is_ok())
}

/// Shared blocking client. Without `init_http_client` it has no timeout.
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| build_client(None).context("failed to build http client"))
}

fn build_client(timeout: Option<Duration>) -> reqwest::Result<Client> {
    // `None` lifts the blocking client's default 30s limit.
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}
