//! Initial build of the configured tree.

use colored::*;
use std::path::Path;

use super::configure::BUILD_DIR;
use super::feedback::FeedbackAnalyzer;
use crate::error::SetupError;
use crate::process::{CommandLine, CommandRunner};
use crate::toolchain::Generator;

/// `cmake --build <root>/build`, with `--config Debug` for multi-config generators.
pub fn build_command(generator: Generator, project_root: &Path) -> CommandLine {
    let build_dir = project_root.join(BUILD_DIR).to_string_lossy().replace('\\', "/");
    let cmd = CommandLine::new("cmake", project_root).args(["--build".to_string(), build_dir]);
    if generator.is_multi_config() {
        cmd.args(["--config", "Debug"])
    } else {
        cmd
    }
}

/// Build the project with whichever generator configured it. Returns the exit code.
pub fn run(
    runner: &dyn CommandRunner,
    generator: Generator,
    project_root: &Path,
) -> Result<i32, SetupError> {
    println!("{} Building project...", "🔨".cyan());

    let output = runner
        .run(&build_command(generator, project_root))
        .map_err(|e| SetupError::Build(format!("could not run cmake: {}", e)))?;

    if !output.success() {
        if let Some(hint) = FeedbackAnalyzer::analyze(&output.stderr) {
            println!("\n{} {}\n", "💡".yellow(), hint);
        }
        return Err(SetupError::Build(output.describe()));
    }

    println!("{} Build finished", "✓".green());
    Ok(output.code.unwrap_or(0))
}
