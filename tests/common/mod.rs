#![allow(dead_code)]

pub mod stub;

use async_trait::async_trait;
use gh_org_clone::config::Config;
use gh_org_clone::error::{ClonerError, Result};
use gh_org_clone::git::GitRunner;
use gh_org_clone::github::PageSource;
use gh_org_clone::models::{GitOutput, Page};
use gh_org_clone::prompt::Selector;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const API: &str = "https://api.test";

pub fn orgs_url() -> String {
    format!("{}/user/orgs?per_page=100&page=1", API)
}

pub fn repos_url(org: &str) -> String {
    format!("{}/orgs/{}/repos?per_page=100&page=1", API, org)
}

pub fn test_config(clone_dir: &Path) -> Config {
    Config {
        token: "tok123".to_string(),
        clone_dir: clone_dir.to_path_buf(),
        api_url: API.to_string(),
        org: None,
        max_pages: 100,
        pause: Duration::ZERO,
    }
}

/// Serves canned pages keyed by URL and records every request.
#[derive(Clone, Default)]
pub struct FakeSource {
    pages: Arc<HashMap<String, Page>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, records: Value, link: Option<&str>) -> Self {
        let records = records.as_array().cloned().expect("records must be a JSON array");
        Arc::make_mut(&mut self.pages).insert(url.to_string(), Page::new(records, link.map(str::to_string)));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for FakeSource {
    async fn fetch_page(&self, url: &str) -> Result<Page> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ClonerError::NotFound(url.to_string()))
    }
}

/// Answers prompts from a script; `None` entries and an empty script cancel.
#[derive(Clone, Default)]
pub struct ScriptedSelector {
    answers: Arc<Mutex<VecDeque<Result<Option<String>>>>>,
    prompts: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl ScriptedSelector {
    pub fn new(answers: &[Option<&str>]) -> Self {
        let selector = Self::default();
        selector
            .answers
            .lock()
            .unwrap()
            .extend(answers.iter().map(|a| Ok(a.map(str::to_string))));
        selector
    }

    pub fn then_fail(self, message: &str) -> Self {
        self.answers
            .lock()
            .unwrap()
            .push_back(Err(ClonerError::PromptError(message.to_string())));
        self
    }

    pub fn prompts(&self) -> Vec<(String, Vec<String>)> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Selector for ScriptedSelector {
    fn select(&self, message: &str, options: &[String]) -> Result<Option<String>> {
        self.prompts
            .lock()
            .unwrap()
            .push((message.to_string(), options.to_vec()));
        self.answers.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

/// Records clone calls and replays queued results; succeeds once the queue is empty.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    results: Arc<Mutex<VecDeque<std::io::Result<GitOutput>>>>,
    calls: Arc<Mutex<Vec<(String, PathBuf)>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_exit(self, code: i32, text: &str) -> Self {
        self.results.lock().unwrap().push_back(Ok(GitOutput {
            success: code == 0,
            code: Some(code),
            text: text.to_string(),
        }));
        self
    }

    pub fn then_launch_error(self, kind: std::io::ErrorKind) -> Self {
        self.results
            .lock()
            .unwrap()
            .push_back(Err(std::io::Error::new(kind, "cannot start git")));
        self
    }

    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GitRunner for RecordingRunner {
    async fn clone_repo(&self, url: &str, dest: &Path) -> std::io::Result<GitOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), dest.to_path_buf()));
        self.results.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(GitOutput {
                success: true,
                code: Some(0),
                text: format!("Cloning into '{}'...\n", dest.display()),
            })
        })
    }
}
