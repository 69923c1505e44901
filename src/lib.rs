pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod models;
pub mod prompt;
pub mod signals;
pub mod types;
pub mod ui;
