//! Host platform detection.
//!
//! Produces an immutable [`PlatformProfile`] once per run. Only an
//! unclassifiable operating system is fatal; every tool probe degrades to
//! `false`/`None`, and an unreadable architecture degrades to the raw value.

pub mod probe;
pub mod visual_studio;

pub use probe::{HostProbe, SystemProbe};
pub use visual_studio::VisualStudioInstall;

use std::fmt;
use std::path::PathBuf;

use crate::error::SetupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Windows,
    Linux,
    MacOs,
    Unknown,
}

impl OsFamily {
    /// Classify an OS identifier (`std::env::consts::OS` style, or `uname -s`).
    pub fn classify(os: &str) -> Self {
        match os.trim().to_ascii_lowercase().as_str() {
            "windows" | "win32" => OsFamily::Windows,
            "linux" => OsFamily::Linux,
            "macos" | "darwin" => OsFamily::MacOs,
            _ => OsFamily::Unknown,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OsFamily::Windows => "Windows",
            OsFamily::Linux => "Linux",
            OsFamily::MacOs => "macOS",
            OsFamily::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    pub os_family: OsFamily,
    pub architecture: String,
    pub has_xcode: bool,
    pub has_visual_studio: bool,
    pub has_ninja: bool,
    /// Best C++ compiler found on the host, if any.
    pub compiler: Option<PathBuf>,
    pub visual_studio: Option<VisualStudioInstall>,
}

impl PlatformProfile {
    /// Inspect the running host.
    pub fn detect(probe: &dyn HostProbe) -> Result<Self, SetupError> {
        let family = OsFamily::classify(std::env::consts::OS);
        let raw_arch = read_architecture(family, probe);
        Self::resolve_with(std::env::consts::OS, &raw_arch, probe)
    }

    /// Build a profile from an OS identifier and a raw architecture reading.
    pub fn resolve_with(os: &str, raw_arch: &str, probe: &dyn HostProbe) -> Result<Self, SetupError> {
        let os_family = OsFamily::classify(os);
        let architecture = normalize_architecture(raw_arch);
        let has_ninja = probe.find_program("ninja").is_some();

        let profile = match os_family {
            OsFamily::MacOs => Self {
                os_family,
                architecture,
                has_xcode: detect_xcode(probe),
                has_visual_studio: false,
                has_ninja,
                compiler: detect_apple_clang(probe),
                visual_studio: None,
            },
            OsFamily::Linux => Self {
                os_family,
                architecture,
                has_xcode: false,
                has_visual_studio: false,
                has_ninja,
                compiler: probe
                    .find_program("g++")
                    .or_else(|| probe.find_program("clang++")),
                visual_studio: None,
            },
            OsFamily::Windows => {
                let visual_studio = visual_studio::detect_installations(probe)
                    .into_iter()
                    .next();
                let compiler = visual_studio::find_compiler(probe, visual_studio.as_ref());
                Self {
                    os_family,
                    architecture,
                    has_xcode: false,
                    has_visual_studio: visual_studio.is_some(),
                    has_ninja,
                    compiler,
                    visual_studio,
                }
            }
            OsFamily::Unknown => {
                return Err(SetupError::UnsupportedPlatform { os: os.to_string() });
            }
        };

        Ok(profile)
    }

    /// Probes that came back empty, as recoverable [`SetupError::ToolchainProbe`] notes.
    pub fn degraded_probes(&self) -> Vec<SetupError> {
        let mut notes = Vec::new();
        let mut note = |tool: &str, reason: &str| {
            notes.push(SetupError::ToolchainProbe {
                tool: tool.to_string(),
                reason: reason.to_string(),
            })
        };

        if self.os_family == OsFamily::MacOs && !self.has_xcode {
            note("Xcode", "xcode-select reports no full Xcode installation");
        }
        if self.os_family == OsFamily::Windows && !self.has_visual_studio {
            note("Visual Studio", "vswhere found no installation with C++ tools");
        }
        if !self.has_ninja {
            note("ninja", "not found on the search path");
        }
        if self.compiler.is_none() {
            note("C++ compiler", "none detected, using the platform default path");
        }
        notes
    }
}

/// Canonical architecture name, or the raw reading if it is not recognised.
pub fn normalize_architecture(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return normalize_architecture_known(std::env::consts::ARCH)
            .unwrap_or(std::env::consts::ARCH)
            .to_string();
    }
    normalize_architecture_known(trimmed)
        .map(str::to_string)
        .unwrap_or_else(|| trimmed.to_string())
}

fn normalize_architecture_known(raw: &str) -> Option<&'static str> {
    match raw.to_ascii_lowercase().as_str() {
        "aarch64" | "arm64" => Some("arm64"),
        "x86_64" | "amd64" | "x64" => Some("x86_64"),
        "i386" | "i686" | "x86" => Some("x86"),
        _ => None,
    }
}

fn read_architecture(family: OsFamily, probe: &dyn HostProbe) -> String {
    if family == OsFamily::Windows {
        return std::env::var("PROCESSOR_ARCHITEW6432")
            .or_else(|_| std::env::var("PROCESSOR_ARCHITECTURE"))
            .unwrap_or_default();
    }
    probe
        .find_program("uname")
        .and_then(|uname| probe.capture(&uname, &["-m"]))
        .unwrap_or_default()
}

fn detect_xcode(probe: &dyn HostProbe) -> bool {
    probe
        .find_program("xcode-select")
        .and_then(|tool| probe.capture(&tool, &["-p"]))
        .is_some_and(|dev_dir| !dev_dir.contains("CommandLineTools"))
}

fn detect_apple_clang(probe: &dyn HostProbe) -> Option<PathBuf> {
    probe
        .find_program("xcrun")
        .and_then(|xcrun| probe.capture(&xcrun, &["--find", "clang++"]))
        .map(PathBuf::from)
        .or_else(|| probe.find_program("clang++"))
}
