use serde::Deserialize;

// GitHub API response structures
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Organization {
    pub login: String,
    pub url: Option<String>,
    pub repos_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Repository {
    pub name: String,
    pub ssh_url: Option<String>,
}
