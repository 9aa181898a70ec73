//! Append-only plain-text run log (`setup_log.txt` in the project root).
//!
//! The log is a side channel: a line that cannot be written produces one
//! console warning and the run carries on.

use chrono::Utc;
use colored::*;
use std::cell::Cell;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

pub const LOG_FILE: &str = "setup_log.txt";

pub struct RunLog {
    path: PathBuf,
    warned: Cell<bool>,
}

impl RunLog {
    pub fn new(project_root: &Path) -> Self {
        Self {
            path: project_root.join(LOG_FILE),
            warned: Cell::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line.
    pub fn record(&self, message: impl AsRef<str>) {
        if let Err(e) = self.append(message.as_ref())
            && !self.warned.replace(true)
        {
            println!(
                "{} Could not write {}: {}",
                "!".yellow(),
                self.path.display(),
                e
            );
        }
    }

    pub fn start(&self, platform: &str) {
        self.record(format!(
            "=== Setup Started: {} (devstrap {}) ===",
            platform,
            env!("CARGO_PKG_VERSION")
        ));
    }

    pub fn complete(&self) {
        self.record("=== Setup Complete ===");
    }

    pub fn failed(&self, err: &PipelineError) {
        self.record(format!(
            "=== Setup Failed ({}): {} ===",
            err.stage, err.source
        ));
    }

    fn append(&self, message: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "[{}] {}", Utc::now().to_rfc3339(), message)
    }
}
