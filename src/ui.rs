use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// "Loading..." indicator shown while a listing is fetched.
///
/// Ticks on its own thread; `stop` (or drop) clears it.
pub struct LoadingIndicator {
    bar: ProgressBar,
}

impl LoadingIndicator {
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}{spinner}") {
            bar.set_style(style.tick_strings(&["", ".", "..", "...", "....", "....."]));
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(TICK_INTERVAL);
        Self { bar }
    }

    pub fn stop(self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

pub fn clear_screen() {
    print!("\x1B[H\x1B[2J");
    let _ = std::io::stdout().flush();
}

pub fn success_message(path: &Path) -> String {
    format!("Cloned Successfully under {}...", path.display())
}

pub fn print_success(path: &Path) {
    println!("\n{}", success_message(path).green().bold());
}

pub fn print_warning(message: &str) {
    println!("{}", message.yellow());
}

pub fn print_error(message: &str) {
    println!("{}", message.red());
}
