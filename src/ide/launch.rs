//! Opening the generated project in the native IDE and in VSCode.
//!
//! Everything here is best-effort: a missing IDE or a failed spawn becomes a
//! [`SetupError::Launch`] note, never a pipeline failure.

use colored::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::build::BUILD_DIR;
use crate::error::SetupError;
use crate::platform::{HostProbe, OsFamily};
use crate::process::{CommandLine, CommandRunner};
use crate::toolchain::Generator;

/// Native project file produced by a generator, if it produces one.
pub fn native_project(generator: Generator, project_root: &Path) -> Option<PathBuf> {
    let extension = match generator {
        Generator::Xcode => "xcodeproj",
        Generator::VisualStudioSolution(_) => "sln",
        _ => return None,
    };

    WalkDir::new(project_root.join(BUILD_DIR))
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .find(|p| p.extension().is_some_and(|ext| ext == extension))
}

/// Commands that open the IDEs for this run, in launch order.
pub fn launch_commands(
    generator: Generator,
    os_family: OsFamily,
    project_root: &Path,
    probe: &dyn HostProbe,
) -> (Vec<CommandLine>, Vec<SetupError>) {
    let mut commands = Vec::new();
    let mut notes = Vec::new();

    if let Some(project) = native_project(generator, project_root) {
        let project_arg = project.to_string_lossy().to_string();
        let cmd = match os_family {
            OsFamily::Windows => CommandLine::new("cmd", project_root)
                .args(["/C", "start", ""])
                .arg(project_arg),
            _ => CommandLine::new("open", project_root).arg(project_arg),
        };
        commands.push(cmd);
    } else if matches!(
        generator,
        Generator::Xcode | Generator::VisualStudioSolution(_)
    ) {
        notes.push(SetupError::Launch {
            program: generator.to_string(),
            reason: format!("no project file found under {}/", BUILD_DIR),
        });
    }

    if probe.find_program("code").is_some() {
        commands.push(
            CommandLine::new("code", project_root).arg(project_root.to_string_lossy().to_string()),
        );
    } else {
        notes.push(SetupError::Launch {
            program: "code".to_string(),
            reason: "not found on the search path".to_string(),
        });
    }

    (commands, notes)
}

/// Spawn every launch command without waiting. Returns the problems encountered.
pub fn open(
    runner: &dyn CommandRunner,
    probe: &dyn HostProbe,
    generator: Generator,
    os_family: OsFamily,
    project_root: &Path,
) -> Vec<SetupError> {
    println!("{} Opening IDE...", "🚀".cyan());

    let (commands, mut notes) = launch_commands(generator, os_family, project_root, probe);
    for cmd in commands {
        match runner.spawn_detached(&cmd) {
            Ok(()) => println!("   {} {}", "✓".green(), cmd),
            Err(e) => notes.push(SetupError::Launch {
                program: cmd.program.clone(),
                reason: e.to_string(),
            }),
        }
    }

    for note in &notes {
        println!("   {} {}", "!".yellow(), note);
    }
    notes
}
