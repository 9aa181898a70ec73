//! Host inspection primitives.
//!
//! Probes are best-effort: a missing tool or a failing command is an answer
//! (`false` / `None`), never an error.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::OsFamily;

pub trait HostProbe {
    /// Locate a program on the search path.
    fn find_program(&self, name: &str) -> Option<PathBuf>;

    /// Trimmed stdout of a successful run.
    fn capture(&self, program: &Path, args: &[&str]) -> Option<String>;

    fn exists(&self, path: &Path) -> bool;

    /// Immediate subdirectories of `path`; empty when it cannot be read.
    fn list_dirs(&self, path: &Path) -> Vec<PathBuf>;

    /// Read a registry string value (`HKLM\<key>`, default value). Windows only.
    fn registry_value(&self, _key: &str) -> Option<String> {
        None
    }
}

pub struct SystemProbe {
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl SystemProbe {
    pub fn new(search_path: Option<OsString>, cwd: &Path) -> Self {
        Self {
            search_path,
            cwd: cwd.to_path_buf(),
        }
    }

    fn command(&self, program: &Path) -> Command {
        let mut command = Command::new(program);
        command
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stderr(Stdio::null());
        if let Some(path) = &self.search_path {
            command.env("PATH", path);
        }
        command
    }
}

impl HostProbe for SystemProbe {
    fn find_program(&self, name: &str) -> Option<PathBuf> {
        locate(name, self.search_path.as_ref(), &self.cwd)
    }

    fn capture(&self, program: &Path, args: &[&str]) -> Option<String> {
        let output = self.command(program).args(args).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!text.is_empty()).then_some(text)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dirs(&self, path: &Path) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(path) else {
            return Vec::new();
        };
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect()
    }

    #[cfg(windows)]
    fn registry_value(&self, key: &str) -> Option<String> {
        use winreg::RegKey;
        use winreg::enums::HKEY_LOCAL_MACHINE;

        RegKey::predef(HKEY_LOCAL_MACHINE)
            .open_subkey(key)
            .ok()?
            .get_value::<String, _>("")
            .ok()
    }
}

/// Resolve `name` against `search_path`, or the inherited `PATH` when none is given.
pub fn locate(name: &str, search_path: Option<&OsString>, cwd: &Path) -> Option<PathBuf> {
    let paths = search_path.cloned().or_else(|| env::var_os("PATH"));
    which::which_in(name, paths, cwd).ok()
}

/// Directories where package managers drop their binaries, per platform.
fn package_manager_dirs(family: OsFamily) -> Vec<PathBuf> {
    let home = dirs::home_dir();
    match family {
        OsFamily::MacOs => vec![
            PathBuf::from("/opt/homebrew/bin"),
            PathBuf::from("/usr/local/bin"),
        ],
        OsFamily::Linux => {
            let mut dirs = Vec::new();
            if let Some(home) = &home {
                dirs.push(home.join(".local").join("bin"));
            }
            dirs.push(PathBuf::from("/home/linuxbrew/.linuxbrew/bin"));
            dirs
        }
        OsFamily::Windows => {
            let mut dirs = vec![PathBuf::from(r"C:\ProgramData\chocolatey\bin")];
            if let Some(home) = &home {
                dirs.push(home.join("scoop").join("shims"));
            }
            dirs
        }
        OsFamily::Unknown => Vec::new(),
    }
}

/// The host `PATH` with existing package-manager directories prepended.
///
/// Returns `None` when nothing needs to be added, so callers keep inheriting
/// the environment untouched.
pub fn augmented_search_path(family: OsFamily) -> Option<OsString> {
    let current: Vec<PathBuf> = env::var_os("PATH")
        .map(|p| env::split_paths(&p).collect())
        .unwrap_or_default();

    let extra = prepend_missing(&current, package_manager_dirs(family), |p| p.is_dir());
    if extra.is_empty() {
        return None;
    }

    env::join_paths(extra.into_iter().chain(current)).ok()
}

fn prepend_missing(
    current: &[PathBuf],
    candidates: Vec<PathBuf>,
    present: impl Fn(&Path) -> bool,
) -> Vec<PathBuf> {
    candidates
        .into_iter()
        .filter(|dir| present(dir.as_path()) && !current.contains(dir))
        .collect()
}
