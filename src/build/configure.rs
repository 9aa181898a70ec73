//! CMake configuration with a single fallback generator.
//!
//! Candidates are tried in order and the first success wins. If every
//! candidate fails, one consolidated [`SetupError::GeneratorInvocation`]
//! carries each attempt's reason.

use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

use super::cmake;
use super::feedback::FeedbackAnalyzer;
use crate::error::{GeneratorAttempt, SetupError};
use crate::platform::OsFamily;
use crate::process::{CommandLine, CommandRunner};
use crate::toolchain::{Generator, ToolchainChoice};

/// Build tree, relative to the project root.
pub const BUILD_DIR: &str = "build";
/// Where executables and shared libraries land, relative to the project root.
pub const RUNTIME_DIR: &str = "bin";
/// Where static archives land, relative to the project root.
pub const ARCHIVE_DIR: &str = "lib";

/// A single `cmake` configure command. Consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorInvocation {
    pub generator: Generator,
    pub command: String,
    pub arguments: Vec<String>,
    pub working_directory: PathBuf,
    pub output_architecture_flag: Option<String>,
}

impl GeneratorInvocation {
    pub fn build_dir(&self) -> PathBuf {
        self.working_directory.join(BUILD_DIR)
    }

    pub fn command_line(&self) -> CommandLine {
        CommandLine::new(&self.command, &self.working_directory).args(self.arguments.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub success: bool,
    pub generator_used: Generator,
    /// Failed attempts that preceded the successful one.
    pub failed_attempts: Vec<GeneratorAttempt>,
}

/// Invocation for the chosen generator.
pub fn configure(choice: &ToolchainChoice, project_root: &Path) -> GeneratorInvocation {
    configure_for(choice, choice.generator, project_root)
}

/// Primary invocation followed by the fallback, if the choice has one.
pub fn candidates(choice: &ToolchainChoice, project_root: &Path) -> Vec<GeneratorInvocation> {
    std::iter::once(choice.generator)
        .chain(choice.fallback)
        .map(|generator| configure_for(choice, generator, project_root))
        .collect()
}

fn configure_for(
    choice: &ToolchainChoice,
    generator: Generator,
    project_root: &Path,
) -> GeneratorInvocation {
    let build_dir = project_root.join(BUILD_DIR);
    let runtime_dir = cmake_path(&project_root.join(RUNTIME_DIR));
    let archive_dir = cmake_path(&project_root.join(ARCHIVE_DIR));

    let mut arguments = vec![
        "-S".to_string(),
        cmake_path(project_root),
        "-B".to_string(),
        cmake_path(&build_dir),
        "-G".to_string(),
        generator.cmake_name().to_string(),
    ];

    let output_architecture_flag = architecture_flag(choice, generator);
    if let Some(flag) = &output_architecture_flag {
        arguments.extend(flag.split(' ').map(str::to_string));
    }

    for suffix in ["", "_DEBUG", "_RELEASE"] {
        arguments.push(format!("-DCMAKE_RUNTIME_OUTPUT_DIRECTORY{}={}", suffix, runtime_dir));
        arguments.push(format!("-DCMAKE_LIBRARY_OUTPUT_DIRECTORY{}={}", suffix, runtime_dir));
        arguments.push(format!("-DCMAKE_ARCHIVE_OUTPUT_DIRECTORY{}={}", suffix, archive_dir));
    }
    arguments.push("-DCMAKE_EXPORT_COMPILE_COMMANDS=ON".to_string());

    GeneratorInvocation {
        generator,
        command: "cmake".to_string(),
        arguments,
        working_directory: project_root.to_path_buf(),
        output_architecture_flag,
    }
}

fn architecture_flag(choice: &ToolchainChoice, generator: Generator) -> Option<String> {
    if choice.os_family == OsFamily::MacOs {
        return Some(format!("-DCMAKE_OSX_ARCHITECTURES={}", choice.architecture));
    }
    if matches!(generator, Generator::VisualStudioSolution(_)) {
        let platform = match choice.architecture.as_str() {
            "arm64" => "ARM64",
            "x86" => "Win32",
            _ => "x64",
        };
        return Some(format!("-A {}", platform));
    }
    None
}

fn cmake_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Runs generator candidates in order until one configures successfully.
pub struct BuildConfigurator<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> BuildConfigurator<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Configure `choice`, falling back once to its fallback generator.
    pub fn configure_project(
        &self,
        choice: &ToolchainChoice,
        project_root: &Path,
    ) -> Result<BuildOutcome, SetupError> {
        self.invoke(&candidates(choice, project_root))
    }

    pub fn invoke(&self, candidates: &[GeneratorInvocation]) -> Result<BuildOutcome, SetupError> {
        let mut failed_attempts = Vec::new();

        for (i, invocation) in candidates.iter().enumerate() {
            if i > 0 {
                println!(
                    "   {} Falling back to {} generator",
                    "⚠".yellow(),
                    invocation.generator.to_string().cyan()
                );
            }

            match self.attempt(invocation) {
                Ok(()) => {
                    return Ok(BuildOutcome {
                        success: true,
                        generator_used: invocation.generator,
                        failed_attempts,
                    });
                }
                Err(reason) => {
                    println!(
                        "   {} {} generator failed: {}",
                        "x".red(),
                        invocation.generator,
                        reason
                    );
                    failed_attempts.push(GeneratorAttempt {
                        generator: invocation.generator,
                        reason,
                    });
                }
            }
        }

        Err(SetupError::GeneratorInvocation {
            attempts: failed_attempts,
        })
    }

    fn attempt(&self, invocation: &GeneratorInvocation) -> Result<(), String> {
        let build_dir = invocation.build_dir();
        fs::create_dir_all(&build_dir)
            .map_err(|e| format!("cannot create {}: {}", build_dir.display(), e))?;

        if let Some(previous) = cmake::cached_generator(&build_dir)
            && previous != invocation.generator.cmake_name()
        {
            println!(
                "   {} Clearing CMake cache generated by {}",
                "!".yellow(),
                previous
            );
            cmake::clear_cache(&build_dir)
                .map_err(|e| format!("cannot clear stale CMake cache: {}", e))?;
        }

        println!(
            "   {} Generating with {}",
            "🛠".cyan(),
            invocation.generator.to_string().bold()
        );
        let output = self
            .runner
            .run(&invocation.command_line())
            .map_err(|e| format!("could not run {}: {}", invocation.command, e))?;

        if output.success() {
            return Ok(());
        }

        if let Some(hint) = FeedbackAnalyzer::analyze(&output.stderr) {
            println!("\n{} {}\n", "💡".yellow(), hint);
        }
        Err(output.describe())
    }
}
