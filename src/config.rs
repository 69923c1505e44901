use crate::cli::Cli;
use crate::error::{ClonerError, Result};
use colored::*;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Runtime settings, resolved once at startup and handed to each component.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub clone_dir: PathBuf,
    pub api_url: String,
    pub org: Option<String>,
    pub max_pages: usize,
    pub pause: Duration,
}

impl Config {
    /// Resolve a `Config` from parsed arguments.
    ///
    /// `home` is the value of `$HOME`, used when no clone directory was given.
    pub fn from_cli(cli: Cli, home: Option<String>) -> Result<Self> {
        let token = cli
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ClonerError::AuthError(
                    "GH_TOKEN is empty, please set it in your environment \
                     (https://docs.github.com/en/authentication/keeping-your-account-and-data-secure/managing-your-personal-access-tokens)"
                        .to_string(),
                )
            })?;

        let clone_dir = match cli.clone_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => {
                let home = home.filter(|h| !h.is_empty()).ok_or_else(|| {
                    ClonerError::ConfigError("neither CLONE_DIR nor HOME is set".to_string())
                })?;
                let dir = PathBuf::from(home).join("Documents");
                println!(
                    "{}",
                    format!("CLONE_DIR is not provided, falling back to {}", dir.display()).yellow()
                );
                dir
            }
        };

        let api_url = Url::parse(&cli.api_url)
            .map_err(|e| ClonerError::ConfigError(format!("invalid API URL '{}': {}", cli.api_url, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(ClonerError::ConfigError(format!("invalid API URL '{}'", cli.api_url)));
        }

        if cli.max_pages == 0 {
            return Err(ClonerError::ConfigError("max pages must be at least 1".to_string()));
        }

        Ok(Config {
            token,
            clone_dir,
            api_url: api_url.as_str().trim_end_matches('/').to_string(),
            org: cli.org.filter(|o| !o.is_empty()),
            max_pages: cli.max_pages,
            pause: Duration::from_secs(cli.pause_secs),
        })
    }
}
