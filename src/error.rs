//! Error taxonomy for the setup pipeline.
//!
//! Probe failures never escape the platform module; they are converted to
//! conservative defaults and only surface as [`SetupError::ToolchainProbe`] in
//! verbose output. Everything else propagates to the pipeline, which tags it
//! with the failing [`Stage`].

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::toolchain::Generator;

/// One failed generator attempt, kept so a consolidated failure can report
/// every candidate that was tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorAttempt {
    pub generator: Generator,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("unsupported platform '{os}' (expected Windows, Linux or macOS)")]
    UnsupportedPlatform { os: String },

    #[error("probe for {tool} failed: {reason}")]
    ToolchainProbe { tool: String, reason: String },

    #[error("CMake configuration failed for every generator: {}", format_attempts(.attempts))]
    GeneratorInvocation { attempts: Vec<GeneratorAttempt> },

    #[error("failed to write {}: {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {}: {source}", .path.display())]
    ConfigSerialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to patch {}: {source}", .path.display())]
    ProjectPatch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not launch {program}: {reason}")]
    Launch { program: String, reason: String },

    #[error("git submodule update failed: {0}")]
    Submodules(String),

    #[error("build failed: {0}")]
    Build(String),
}

fn format_attempts(attempts: &[GeneratorAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("[{}] {}", a.generator, a.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Pipeline stages, used to name the point of failure in messages and the run log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Platform,
    Toolchain,
    Submodules,
    Configure,
    Patch,
    IdeConfig,
    Build,
    Launch,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Platform => "platform detection",
            Stage::Toolchain => "toolchain resolution",
            Stage::Submodules => "submodule update",
            Stage::Configure => "cmake configure",
            Stage::Patch => "project patch",
            Stage::IdeConfig => "IDE configuration",
            Stage::Build => "build",
            Stage::Launch => "IDE launch",
        };
        f.write_str(name)
    }
}

/// A fatal error tagged with the stage that raised it.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: SetupError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: SetupError) -> Self {
        Self { stage, source }
    }
}
