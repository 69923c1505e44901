use crate::config::Config;
use crate::error::{ClonerError, Result};
use crate::git::{https_fallback_url, redacted_fallback_url, Cloner, GitRunner};
use crate::github::{list_org_repositories, list_organizations, PageSource};
use crate::models::SessionSummary;
use crate::prompt::Selector;
use crate::types::Repository;
use crate::ui::{self, LoadingIndicator};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Wires the fetcher, the prompts and the cloner into one session:
/// pick an organization, then pick and clone repositories until the
/// user backs out of the repository prompt.
pub struct App<S, P, R>
where
    S: PageSource,
    P: Selector,
    R: GitRunner,
{
    config: Config,
    source: S,
    selector: P,
    cloner: Cloner<R>,
}

impl<S, P, R> App<S, P, R>
where
    S: PageSource,
    P: Selector,
    R: GitRunner,
{
    pub fn new(config: Config, source: S, selector: P, runner: R) -> Self {
        let cloner = Cloner::new(config.clone_dir.clone(), runner);
        Self {
            config,
            source,
            selector,
            cloner,
        }
    }

    /// Run the session. Cancelling any prompt ends it with `Ok`.
    pub async fn run(&self) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();

        let Some(org) = self.choose_organization().await? else {
            return Ok(summary);
        };

        let repos = self.load_repositories(&org).await?;
        if repos.is_empty() {
            return Err(ClonerError::NotFound(format!("no repositories in organization {}", org)));
        }
        let names: Vec<String> = repos.iter().map(|r| r.name.clone()).collect();

        ui::clear_screen();
        while let Some(choice) = self.prompt("Choose your repo:", &names)? {
            let Some(repo) = repos.iter().find(|r| r.name == choice) else {
                warn!("No repository named {}", choice);
                continue;
            };

            match self.clone_with_fallback(&org, repo).await {
                Ok(path) => {
                    ui::print_success(&path);
                    summary.cloned.push(path);
                }
                Err(e @ ClonerError::RepoAlreadyExists { .. }) => {
                    ui::print_warning(&e.to_string());
                    summary.failed += 1;
                }
                Err(e) => {
                    if let Some(output) = e.clone_output() {
                        debug!("git output: {}", output);
                    }
                    ui::print_error(&format!("Error in Cloning: {}", e));
                    summary.failed += 1;
                }
            }

            if !self.config.pause.is_zero() {
                tokio::time::sleep(self.config.pause).await;
            }
            ui::clear_screen();
        }

        Ok(summary)
    }

    /// The prompt blocks on terminal input, so hand the worker thread over
    /// to the runtime while it waits. Needs the multi-threaded runtime.
    fn prompt(&self, message: &str, options: &[String]) -> Result<Option<String>> {
        tokio::task::block_in_place(|| self.selector.select(message, options))
    }

    async fn choose_organization(&self) -> Result<Option<String>> {
        if let Some(org) = &self.config.org {
            info!("Using organization {} from the command line", org);
            return Ok(Some(org.clone()));
        }

        let orgs = list_organizations(&self.source, &self.config.api_url).await?;
        if orgs.is_empty() {
            return Err(ClonerError::NotFound(
                "the token does not belong to any organization".to_string(),
            ));
        }

        let logins: Vec<String> = orgs.into_iter().map(|o| o.login).collect();
        self.prompt("Choose your org:", &logins)
    }

    async fn load_repositories(&self, org: &str) -> Result<Vec<Repository>> {
        let loading = LoadingIndicator::start("Loading");
        let repos = list_org_repositories(
            &self.source,
            &self.config.api_url,
            org,
            self.config.max_pages,
        )
        .await;
        loading.stop();

        let repos = repos?;
        info!("Found {} repositories in {}", repos.len(), org);
        Ok(repos)
    }

    /// Clone over SSH, retrying once over HTTPS with the token when the SSH
    /// credentials are rejected. Repositories without an SSH URL go straight
    /// to HTTPS.
    async fn clone_with_fallback(&self, org: &str, repo: &Repository) -> Result<PathBuf> {
        let dest = self.cloner.destination(&repo.name);

        if let Some(ssh_url) = repo.ssh_url.as_deref().filter(|u| !u.is_empty()) {
            match self.cloner.clone(ssh_url, &repo.name).await {
                Ok(_) => return Ok(dest),
                Err(e) if e.is_credential_failure() => {
                    ui::print_warning(&format!("{}\nTrying with HTTP URL", e));
                }
                Err(e) => return Err(e),
            }
        }

        info!(url = %redacted_fallback_url(org, &repo.name), "Cloning over HTTPS");
        let url = https_fallback_url(&self.config.token, org, &repo.name);
        self.cloner.clone(&url, &repo.name).await?;
        Ok(dest)
    }
}
