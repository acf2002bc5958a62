//! CLI presenter for output formatting
//!
//! Status lines and the spinner go to stderr; transcripts, replies, paths
//! and header fields go to stdout so they can be piped.

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Width of the recording progress bar in cells
const BAR_WIDTH: usize = 20;

/// Kind of status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Info,
    Success,
    Warn,
    Error,
}

impl Status {
    fn symbol(self) -> ColoredString {
        match self {
            Self::Info => "ℹ".cyan(),
            Self::Success => "✓".green(),
            Self::Warn => "⚠".yellow(),
            Self::Error => "✗".red(),
        }
    }
}

/// Presenter for CLI output formatting
#[derive(Default)]
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a spinner with message, replacing any running one
    pub fn start_spinner(&mut self, message: &str) {
        self.stop_spinner();

        let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    pub fn is_spinner_active(&self) -> bool {
        self.spinner.is_some()
    }

    /// Handle to the active spinner, for progress callbacks
    pub fn spinner_handle(&self) -> Option<ProgressBar> {
        self.spinner.clone()
    }

    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    pub fn spinner_success(&mut self, message: &str) {
        self.finish_spinner(Status::Success, message);
    }

    pub fn spinner_fail(&mut self, message: &str) {
        self.finish_spinner(Status::Error, message);
    }

    /// Remove the spinner without leaving a line behind
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn finish_spinner(&mut self, status: Status, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", status.symbol(), message));
        }
    }

    fn status(&self, status: Status, message: &str) {
        let line = format!("{} {}", status.symbol(), message);
        // Keep the spinner line intact while it is running
        match self.spinner {
            Some(ref spinner) => spinner.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }

    pub fn info(&self, message: &str) {
        self.status(Status::Info, message);
    }

    pub fn success(&self, message: &str) {
        self.status(Status::Success, message);
    }

    pub fn warn(&self, message: &str) {
        self.status(Status::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.status(Status::Error, message);
    }

    /// Plain result line on stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print what the caller said and the teller's answer to stdout
    pub fn conversation(&self, transcript: &str, reply: &str) {
        println!("{} {}", "You:".bold(), transcript);
        println!("{} {}", "Teller:".green().bold(), reply);
        let _ = io::stdout().flush();
    }

    /// Render `[████░░░░]  4s / 10s`
    pub fn format_progress(&self, elapsed_ms: u64, total_ms: u64) -> String {
        let fraction = if total_ms > 0 {
            (elapsed_ms as f64 / total_ms as f64).min(1.0)
        } else {
            0.0
        };
        let filled = (fraction * BAR_WIDTH as f64) as usize;

        format!(
            "[{}{}] {:>3}s / {}s",
            "█".repeat(filled).cyan(),
            "░".repeat(BAR_WIDTH - filled),
            elapsed_ms / 1000,
            total_ms / 1000
        )
    }

    pub fn update_recording_progress(&self, elapsed_ms: u64, total_ms: u64) {
        let progress = self.format_progress(elapsed_ms, total_ms);
        self.update_spinner(&format!("Recording... {}  (Ctrl+C to stop)", progress));
    }

    /// Print a key-value pair (config list, inspect)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}
