use std::fmt;

use crate::platform::OsFamily;

/// CMake generators the bootstrapper knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    Xcode,
    UnixMakefiles,
    Ninja,
    /// Carries the Visual Studio major version (16 = 2019, 17 = 2022, ...).
    VisualStudioSolution(u32),
    MinGWMakefiles,
}

/// Major version used when no installation reported one.
pub const DEFAULT_VISUAL_STUDIO_MAJOR: u32 = 17;

impl Generator {
    /// The name passed to `cmake -G`.
    pub fn cmake_name(&self) -> &'static str {
        match self {
            Generator::Xcode => "Xcode",
            Generator::UnixMakefiles => "Unix Makefiles",
            Generator::Ninja => "Ninja",
            Generator::VisualStudioSolution(15) => "Visual Studio 15 2017",
            Generator::VisualStudioSolution(16) => "Visual Studio 16 2019",
            Generator::VisualStudioSolution(18) => "Visual Studio 18 2026",
            Generator::VisualStudioSolution(_) => "Visual Studio 17 2022",
            Generator::MinGWMakefiles => "MinGW Makefiles",
        }
    }

    /// Multi-config generators pick the configuration at build time (`--config`).
    pub fn is_multi_config(&self) -> bool {
        matches!(self, Generator::Xcode | Generator::VisualStudioSolution(_))
    }

    /// Whether the generator writes an IDE project descriptor with embedded
    /// build settings that can be patched after generation.
    pub fn produces_patchable_project(&self) -> bool {
        matches!(self, Generator::Xcode)
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cmake_name())
    }
}

/// Debugger flavour used by the launch descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebuggerMode {
    Lldb,
    Gdb,
    Cppvsdbg,
}

impl DebuggerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebuggerMode::Lldb => "lldb",
            DebuggerMode::Gdb => "gdb",
            DebuggerMode::Cppvsdbg => "cppvsdbg",
        }
    }
}

impl fmt::Display for DebuggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved toolchain for this run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainChoice {
    pub os_family: OsFamily,
    pub architecture: String,
    pub generator: Generator,
    /// The single generator tried if `generator` fails to configure.
    pub fallback: Option<Generator>,
    pub compiler_path: String,
    pub debugger_mode: DebuggerMode,
    pub intellisense_mode: String,
    /// Executable basename, including `.exe` on Windows.
    pub executable_name: String,
    pub include_paths: Vec<String>,
    pub c_standard: String,
    pub cpp_standard: String,
}

/// User-facing knobs that refine the resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainRequest {
    /// Basename without extension.
    pub executable_name: String,
    pub prefer_ninja: bool,
    pub c_standard: String,
    pub cpp_standard: String,
}

impl Default for ToolchainRequest {
    fn default() -> Self {
        Self {
            executable_name: "app".to_string(),
            prefer_ninja: false,
            c_standard: "c11".to_string(),
            cpp_standard: "c++20".to_string(),
        }
    }
}
