use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClonerError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Directory {0} does not exist")]
    MissingDirectory(String),

    /// The remote refused the SSH credentials.
    #[error("SSH_KEY_INVALID")]
    SshKeyInvalid { output: String },

    #[error("Repo already exist at the given path {path}")]
    RepoAlreadyExists { path: String, output: String },

    #[error("git clone failed: {0}")]
    CloneFailed(String),

    #[error("Prompt error: {0}")]
    PromptError(String),
}

impl ClonerError {
    /// True when retrying the clone over HTTPS with the API token may help.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, ClonerError::SshKeyInvalid { .. })
    }

    /// Text captured from git, when the error came out of a clone run.
    pub fn clone_output(&self) -> Option<&str> {
        match self {
            ClonerError::SshKeyInvalid { output } => Some(output),
            ClonerError::RepoAlreadyExists { output, .. } => Some(output),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClonerError>;
