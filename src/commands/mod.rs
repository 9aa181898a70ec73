//! CLI command handlers
//!
//! Each handler builds the real runner and probe from the shared
//! [`Context`] and drives the pipeline (or a slice of it).

pub mod doctor;
pub mod setup;
pub mod setup_ide;

use std::ffi::OsString;

use crate::pipeline::SetupOptions;
use crate::platform::{OsFamily, SystemProbe, probe};
use crate::process::SystemRunner;

/// Host-facing objects shared by every command.
pub struct Context {
    pub options: SetupOptions,
    pub search_path: Option<OsString>,
}

impl Context {
    /// Compute the augmented search path once for the running host.
    pub fn new(options: SetupOptions) -> Self {
        let family = OsFamily::classify(std::env::consts::OS);
        Self {
            options,
            search_path: probe::augmented_search_path(family),
        }
    }

    pub fn probe(&self) -> SystemProbe {
        SystemProbe::new(self.search_path.clone(), &self.options.project_root)
    }

    pub fn runner(&self) -> SystemRunner {
        SystemRunner::new(self.search_path.clone(), self.options.verbose)
    }
}
