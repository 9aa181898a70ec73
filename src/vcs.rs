//! Git submodule initialization.

use colored::*;
use std::path::Path;

use crate::error::SetupError;
use crate::process::{CommandLine, CommandRunner};

pub fn has_submodules(project_root: &Path) -> bool {
    project_root.join(".gitmodules").is_file()
}

/// `git submodule update --init --recursive`, only when `.gitmodules` exists.
/// Returns whether the update ran.
pub fn update_submodules(
    runner: &dyn CommandRunner,
    project_root: &Path,
) -> Result<bool, SetupError> {
    if !has_submodules(project_root) {
        println!("   {} No .gitmodules, skipping submodules", "!".yellow());
        return Ok(false);
    }

    println!("{} Initializing and updating submodules...", "📦".cyan());
    let cmd = CommandLine::new("git", project_root).args([
        "submodule",
        "update",
        "--init",
        "--recursive",
    ]);
    let output = runner
        .run(&cmd)
        .map_err(|e| SetupError::Submodules(format!("could not run git: {}", e)))?;

    if !output.success() {
        return Err(SetupError::Submodules(output.describe()));
    }

    println!("{} Submodules ready", "✓".green());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::FakeRunner;
    use std::fs;

    #[test]
    fn test_skipped_without_gitmodules() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::succeeding();
        assert!(!update_submodules(&runner, dir.path()).unwrap());
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_runs_in_project_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitmodules"), "[submodule \"glfw\"]\n").unwrap();
        let runner = FakeRunner::succeeding();

        assert!(update_submodules(&runner, dir.path()).unwrap());
        let calls = runner.calls.borrow();
        assert_eq!(calls[0].to_string(), "git submodule update --init --recursive");
        assert_eq!(calls[0].cwd, dir.path());
    }

    #[test]
    fn test_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitmodules"), "").unwrap();
        let runner = FakeRunner::with_codes(&[128]);

        let err = update_submodules(&runner, dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "git submodule update failed: exit code 128");
    }
}
