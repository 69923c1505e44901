use crate::error::{ClonerError, Result};
use crate::models::{FailureKind, GitOutput};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Runs `git clone <url> <dest>` and reports what the process left behind.
#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn clone_repo(&self, url: &str, dest: &Path) -> std::io::Result<GitOutput>;
}

/// `GitRunner` backed by the git executable on `PATH`
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new() -> Self {
        Self::with_program("git")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitRunner for GitCli {
    async fn clone_repo(&self, url: &str, dest: &Path) -> std::io::Result<GitOutput> {
        let output = Command::new(&self.program)
            .arg("clone")
            .arg(url)
            .arg(dest)
            .output()
            .await?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(GitOutput {
            success: output.status.success(),
            code: output.status.code(),
            text,
        })
    }
}

/// Reads a failed clone's output to guess the cause.
///
/// git exits 128 for nearly every fatal error, so the exit code alone says
/// only that the clone failed. The cause comes from this table:
///
/// | output contains | kind                |
/// |-----------------|---------------------|
/// | `Permission`    | `CredentialInvalid` |
/// | anything else   | `AlreadyExists`     |
///
/// The second row also catches network errors, missing repositories and
/// every other failure. That is kept as-is; callers should treat
/// `AlreadyExists` as "failed, most likely because the path is taken".
pub fn classify_failure(output: &GitOutput) -> FailureKind {
    if output.text.contains("Permission") {
        FailureKind::CredentialInvalid
    } else {
        FailureKind::AlreadyExists
    }
}

/// HTTPS clone URL carrying the token, used when SSH credentials fail.
pub fn https_fallback_url(token: &str, org: &str, repo: &str) -> String {
    format!("https://{}@github.com/{}/{}.git", token, org, repo)
}

/// Same as `https_fallback_url`, with the token masked, for logs.
pub fn redacted_fallback_url(org: &str, repo: &str) -> String {
    https_fallback_url("***", org, repo)
}

/// Clones repositories into `{clone_dir}/{name}`.
pub struct Cloner<R: GitRunner> {
    clone_dir: PathBuf,
    runner: R,
}

impl<R: GitRunner> Cloner<R> {
    pub fn new(clone_dir: PathBuf, runner: R) -> Self {
        Self { clone_dir, runner }
    }

    pub fn destination(&self, name: &str) -> PathBuf {
        self.clone_dir.join(name)
    }

    /// Clone `url` into the directory for `name`, returning git's output.
    ///
    /// Fails with `MissingDirectory` before running git when the base
    /// directory is absent.
    pub async fn clone(&self, url: &str, name: &str) -> Result<String> {
        if !self.clone_dir.is_dir() {
            return Err(ClonerError::MissingDirectory(self.clone_dir.display().to_string()));
        }

        let dest = self.destination(name);
        debug!(dest = %dest.display(), "Running git clone");

        let output = self
            .runner
            .clone_repo(url, &dest)
            .await
            .map_err(|e| ClonerError::CloneFailed(e.to_string()))?;

        if output.success {
            info!(dest = %dest.display(), "Clone finished");
            return Ok(output.text);
        }

        warn!(code = ?output.code, "git clone exited with an error");
        match classify_failure(&output) {
            FailureKind::CredentialInvalid => Err(ClonerError::SshKeyInvalid { output: output.text }),
            FailureKind::AlreadyExists => Err(ClonerError::RepoAlreadyExists {
                path: dest.display().to_string(),
                output: output.text,
            }),
        }
    }
}
