use std::env;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::github_provider::GithubProvider;
use crate::scope::{Scope, DEFAULT_HOST};

/// Connection settings shared by every command.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub token: Option<String>,
    /// Overrides the per-host API URL, mostly for proxies and tests.
    pub api_url: Option<String>,
    pub default_host: String,
}

impl Settings {
    pub fn new(token: Option<String>, api_url: Option<String>) -> Self {
        let token = token
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.is_empty());
        let default_host = env::var("GH_HOST")
            .ok()
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        Settings {
            token,
            api_url,
            default_host,
        }
    }

    pub fn provider_for(&self, scope: &Scope) -> Result<GithubProvider> {
        let provider = match &self.api_url {
            Some(url) => GithubProvider::new(self.token.clone(), url)?,
            None => GithubProvider::for_host(scope.host(), self.token.clone())?,
        };

        Ok(provider)
    }
}

/// Logs go to stderr so exported configs on stdout stay clean. `RUST_LOG`
/// wins over `--verbose`.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(anyhow::Error::msg)?;

    Ok(())
}
