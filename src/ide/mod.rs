//! IDE descriptor generation (VSCode) and IDE launching.
//!
//! `emit` writes `launch.json`, `tasks.json` and `c_cpp_properties.json`
//! into `.vscode/`, replacing any existing files. The three documents are
//! derived from one [`ToolchainChoice`], so the debugged program matches the
//! executable name and IntelliSense uses the resolved compiler.

pub mod launch;

use colored::*;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::build::{BUILD_DIR, RUNTIME_DIR};
use crate::error::SetupError;
use crate::fs_util::write_replacing;
use crate::platform::OsFamily;
use crate::toolchain::{DebuggerMode, ToolchainChoice};

pub const CONFIG_DIR: &str = ".vscode";
pub const LAUNCH_FILE: &str = "launch.json";
pub const TASKS_FILE: &str = "tasks.json";
pub const INTELLISENSE_FILE: &str = "c_cpp_properties.json";

const BUILD_TASK: &str = "build";

// --- launch.json ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchConfig {
    pub version: String,
    pub configurations: Vec<LaunchConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfiguration {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub request: String,
    pub program: String,
    pub args: Vec<String>,
    pub stop_at_entry: bool,
    pub cwd: String,
    pub environment: Vec<EnvironmentEntry>,
    pub external_console: bool,
    #[serde(rename = "MIMode", skip_serializing_if = "Option::is_none")]
    pub mi_mode: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub setup_commands: Vec<SetupCommand>,
    pub pre_launch_task: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentEntry {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupCommand {
    pub description: String,
    pub text: String,
    pub ignore_failures: bool,
}

// --- tasks.json ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskConfig {
    pub version: String,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub command: String,
    pub group: TaskGroup,
    pub presentation: Presentation,
    pub problem_matcher: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskGroup {
    pub kind: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub reveal: String,
}

// --- c_cpp_properties.json ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntelliSenseConfig {
    pub configurations: Vec<CppConfiguration>,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CppConfiguration {
    pub name: String,
    pub include_path: Vec<String>,
    pub defines: Vec<String>,
    pub compiler_path: String,
    pub c_standard: String,
    pub cpp_standard: String,
    pub intelli_sense_mode: String,
}

/// The three descriptors, derived together from one toolchain choice.
#[derive(Debug, Clone, PartialEq)]
pub struct IdeConfigSet {
    pub launch: LaunchConfig,
    pub tasks: TaskConfig,
    pub intellisense: IntelliSenseConfig,
}

impl IdeConfigSet {
    pub fn from_choice(choice: &ToolchainChoice) -> Self {
        Self {
            launch: launch_config(choice),
            tasks: task_config(choice),
            intellisense: intellisense_config(choice),
        }
    }

    /// Program path of the debug configuration.
    pub fn program(&self) -> Option<&str> {
        self.launch
            .configurations
            .first()
            .map(|c| c.program.as_str())
    }

    pub fn compiler_path(&self) -> Option<&str> {
        self.intellisense
            .configurations
            .first()
            .map(|c| c.compiler_path.as_str())
    }
}

fn launch_config(choice: &ToolchainChoice) -> LaunchConfig {
    let program = format!(
        "${{workspaceFolder}}/{}/{}",
        RUNTIME_DIR, choice.executable_name
    );

    // cppvsdbg is its own debugger type; gdb/lldb go through cppdbg's MI layer
    let (kind, mi_mode, setup_commands) = match choice.debugger_mode {
        DebuggerMode::Cppvsdbg => ("cppvsdbg", None, Vec::new()),
        mode => (
            "cppdbg",
            Some(mode.as_str().to_string()),
            vec![SetupCommand {
                description: "Enable pretty-printing".to_string(),
                text: "-enable-pretty-printing".to_string(),
                ignore_failures: true,
            }],
        ),
    };

    LaunchConfig {
        version: "0.2.0".to_string(),
        configurations: vec![LaunchConfiguration {
            name: "Debug".to_string(),
            kind: kind.to_string(),
            request: "launch".to_string(),
            program,
            args: Vec::new(),
            stop_at_entry: false,
            cwd: "${workspaceFolder}".to_string(),
            environment: Vec::new(),
            external_console: false,
            mi_mode,
            setup_commands,
            pre_launch_task: BUILD_TASK.to_string(),
        }],
    }
}

fn task_config(choice: &ToolchainChoice) -> TaskConfig {
    let mut command = format!("cmake --build ${{workspaceFolder}}/{}", BUILD_DIR);
    if choice.generator.is_multi_config() {
        command.push_str(" --config Debug");
    }

    let problem_matcher = if choice.debugger_mode == DebuggerMode::Cppvsdbg {
        "$msCompile"
    } else {
        "$gcc"
    };

    TaskConfig {
        version: "2.0.0".to_string(),
        tasks: vec![Task {
            label: BUILD_TASK.to_string(),
            kind: "shell".to_string(),
            command,
            group: TaskGroup {
                kind: "build".to_string(),
                is_default: true,
            },
            presentation: Presentation {
                reveal: "always".to_string(),
            },
            problem_matcher: vec![problem_matcher.to_string()],
        }],
    }
}

fn intellisense_config(choice: &ToolchainChoice) -> IntelliSenseConfig {
    let name = match choice.os_family {
        OsFamily::Windows => "Win32",
        OsFamily::MacOs => "Mac",
        OsFamily::Linux | OsFamily::Unknown => "Linux",
    };

    IntelliSenseConfig {
        configurations: vec![CppConfiguration {
            name: name.to_string(),
            include_path: choice.include_paths.clone(),
            defines: Vec::new(),
            compiler_path: choice.compiler_path.clone(),
            c_standard: choice.c_standard.clone(),
            cpp_standard: choice.cpp_standard.clone(),
            intelli_sense_mode: choice.intellisense_mode.clone(),
        }],
        version: 4,
    }
}

/// Write all three descriptors into `<project_root>/.vscode`, replacing existing ones.
pub fn emit(choice: &ToolchainChoice, project_root: &Path) -> Result<IdeConfigSet, SetupError> {
    println!("{} Setting up IDE configuration (VSCode)...", "⚙️".cyan());

    let config_dir = project_root.join(CONFIG_DIR);
    fs::create_dir_all(&config_dir).map_err(|source| SetupError::ConfigWrite {
        path: config_dir.clone(),
        source,
    })?;

    let set = IdeConfigSet::from_choice(choice);
    write_document(&config_dir.join(LAUNCH_FILE), &set.launch)?;
    write_document(&config_dir.join(TASKS_FILE), &set.tasks)?;
    write_document(&config_dir.join(INTELLISENSE_FILE), &set.intellisense)?;

    println!("{} VSCode configuration generated in {}/", "✓".green(), CONFIG_DIR);
    Ok(set)
}

fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), SetupError> {
    let mut formatted =
        serde_json::to_string_pretty(document).map_err(|source| SetupError::ConfigSerialize {
            path: path.to_path_buf(),
            source,
        })?;
    formatted.push('\n');

    write_replacing(path, formatted.as_bytes()).map_err(|source| SetupError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })?;
    println!("   {} Wrote {}", "+".green(), display_name(path));
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::Generator;

    fn linux_choice() -> ToolchainChoice {
        ToolchainChoice {
            os_family: OsFamily::Linux,
            architecture: "x86_64".to_string(),
            generator: Generator::UnixMakefiles,
            fallback: None,
            compiler_path: "/usr/bin/g++".to_string(),
            debugger_mode: DebuggerMode::Gdb,
            intellisense_mode: "gcc-x64".to_string(),
            executable_name: "Engine".to_string(),
            include_paths: vec![
                "${workspaceFolder}/**".to_string(),
                "/usr/include".to_string(),
            ],
            c_standard: "c11".to_string(),
            cpp_standard: "c++20".to_string(),
        }
    }

    fn windows_choice() -> ToolchainChoice {
        ToolchainChoice {
            os_family: OsFamily::Windows,
            generator: Generator::VisualStudioSolution(17),
            debugger_mode: DebuggerMode::Cppvsdbg,
            intellisense_mode: "msvc-x64".to_string(),
            executable_name: "Engine.exe".to_string(),
            compiler_path: "C:/VS/VC/Tools/Llvm/bin/clang++.exe".to_string(),
            ..linux_choice()
        }
    }

    #[test]
    fn test_cross_references_match_choice() {
        for choice in [linux_choice(), windows_choice()] {
            let set = IdeConfigSet::from_choice(&choice);
            let program = set.program().unwrap();
            assert_eq!(
                Path::new(program).file_name().unwrap().to_string_lossy(),
                choice.executable_name
            );
            assert_eq!(set.compiler_path(), Some(choice.compiler_path.as_str()));
            assert_eq!(
                set.launch.configurations[0].pre_launch_task,
                set.tasks.tasks[0].label
            );
        }
    }

    #[test]
    fn test_gdb_uses_cppdbg_with_mi_mode() {
        let set = IdeConfigSet::from_choice(&linux_choice());
        let launch = &set.launch.configurations[0];
        assert_eq!(launch.kind, "cppdbg");
        assert_eq!(launch.mi_mode.as_deref(), Some("gdb"));
        assert_eq!(set.tasks.tasks[0].problem_matcher, ["$gcc"]);
        assert_eq!(
            set.tasks.tasks[0].command,
            "cmake --build ${workspaceFolder}/build"
        );
    }

    #[test]
    fn test_windows_uses_cppvsdbg_without_mi_mode() {
        let set = IdeConfigSet::from_choice(&windows_choice());
        let launch = &set.launch.configurations[0];
        assert_eq!(launch.kind, "cppvsdbg");
        assert_eq!(launch.mi_mode, None);

        let json = serde_json::to_value(&set.launch).unwrap();
        assert!(json["configurations"][0].get("MIMode").is_none());
        assert!(json["configurations"][0].get("setupCommands").is_none());

        assert_eq!(
            set.tasks.tasks[0].command,
            "cmake --build ${workspaceFolder}/build --config Debug"
        );
        assert_eq!(set.tasks.tasks[0].problem_matcher, ["$msCompile"]);
        assert_eq!(set.intellisense.configurations[0].name, "Win32");
    }

    #[test]
    fn test_serialized_field_names() {
        let set = IdeConfigSet::from_choice(&linux_choice());
        let launch = serde_json::to_value(&set.launch).unwrap();
        assert_eq!(launch["configurations"][0]["type"], "cppdbg");
        assert_eq!(launch["configurations"][0]["MIMode"], "gdb");
        assert_eq!(launch["configurations"][0]["preLaunchTask"], "build");
        assert_eq!(launch["configurations"][0]["stopAtEntry"], false);

        let tasks = serde_json::to_value(&set.tasks).unwrap();
        assert_eq!(tasks["tasks"][0]["group"]["isDefault"], true);
        assert_eq!(tasks["tasks"][0]["problemMatcher"][0], "$gcc");

        let cpp = serde_json::to_value(&set.intellisense).unwrap();
        assert_eq!(cpp["version"], 4);
        assert_eq!(cpp["configurations"][0]["intelliSenseMode"], "gcc-x64");
        assert_eq!(cpp["configurations"][0]["compilerPath"], "/usr/bin/g++");
        assert_eq!(cpp["configurations"][0]["cppStandard"], "c++20");
    }

    #[test]
    fn test_emit_is_deterministic_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let vscode = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&vscode).unwrap();
        fs::write(vscode.join(LAUNCH_FILE), "{\"stale\": true}").unwrap();

        emit(&linux_choice(), dir.path()).unwrap();
        let first: Vec<Vec<u8>> = [LAUNCH_FILE, TASKS_FILE, INTELLISENSE_FILE]
            .iter()
            .map(|f| fs::read(vscode.join(f)).unwrap())
            .collect();

        emit(&linux_choice(), dir.path()).unwrap();
        let second: Vec<Vec<u8>> = [LAUNCH_FILE, TASKS_FILE, INTELLISENSE_FILE]
            .iter()
            .map(|f| fs::read(vscode.join(f)).unwrap())
            .collect();

        assert_eq!(first, second);
        let launch = String::from_utf8(first[0].clone()).unwrap();
        assert!(!launch.contains("stale"));
        assert!(launch.ends_with("}\n"));
    }

    #[test]
    fn test_emit_replaces_settings_from_previous_toolchain() {
        let dir = tempfile::tempdir().unwrap();
        emit(&windows_choice(), dir.path()).unwrap();
        emit(&linux_choice(), dir.path()).unwrap();

        let launch =
            fs::read_to_string(dir.path().join(CONFIG_DIR).join(LAUNCH_FILE)).unwrap();
        assert!(!launch.contains("cppvsdbg"));
        assert!(!launch.contains(".exe"));
    }

    #[test]
    fn test_unwritable_config_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the directory should be
        fs::write(dir.path().join(CONFIG_DIR), "").unwrap();

        let err = emit(&linux_choice(), dir.path()).unwrap_err();
        assert!(matches!(err, SetupError::ConfigWrite { .. }));
    }
}
