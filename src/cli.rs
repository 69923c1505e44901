use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gh-org-clone")]
#[command(about = "Pick a GitHub organization and repository interactively, then clone it")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// GitHub token used for the API and the HTTPS clone fallback
    #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory repositories are cloned into (defaults to $HOME/Documents)
    #[arg(long, env = "CLONE_DIR")]
    pub clone_dir: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_url: String,

    /// Organization login; skips the organization prompt
    #[arg(long)]
    pub org: Option<String>,

    /// Maximum number of pages fetched for one listing
    #[arg(long, default_value_t = 100)]
    pub max_pages: usize,

    /// Seconds to pause after reporting a clone
    #[arg(long, default_value_t = 3)]
    pub pause_secs: u64,
}
