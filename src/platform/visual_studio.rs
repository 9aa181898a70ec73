//! Visual Studio discovery through vswhere.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::probe::HostProbe;

/// Known paths where vswhere.exe might be located
const VSWHERE_PATHS: &[&str] = &[
    r"C:\Program Files (x86)\Microsoft Visual Studio\Installer\vswhere.exe",
    r"C:\Program Files\Microsoft Visual Studio\Installer\vswhere.exe",
];

/// Known paths where standalone LLVM might be installed
const LLVM_PATHS: &[&str] = &[
    r"C:\Program Files\LLVM\bin",
    r"C:\Program Files (x86)\LLVM\bin",
];

const LLVM_REGISTRY_KEY: &str = r"SOFTWARE\LLVM\LLVM";

/// The component every usable installation must carry: the x86/x64 C++ tools.
const VC_TOOLS_COMPONENT: &str = "Microsoft.VisualStudio.Component.VC.Tools.x86.x64";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualStudioInstall {
    pub install_path: PathBuf,
    pub display_name: String,
    pub version: String,
}

impl VisualStudioInstall {
    /// Major version, e.g. `16` for "16.11.34931.43".
    pub fn major_version(&self) -> Option<u32> {
        self.version.split('.').next()?.trim().parse().ok()
    }
}

pub fn find_vswhere(probe: &dyn HostProbe) -> Option<PathBuf> {
    VSWHERE_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| probe.exists(p))
}

/// Query vswhere for installations with the C++ toolset, newest first as
/// vswhere reports them.
pub fn detect_installations(probe: &dyn HostProbe) -> Vec<VisualStudioInstall> {
    let Some(vswhere) = find_vswhere(probe) else {
        return Vec::new();
    };

    probe
        .capture(
            &vswhere,
            &[
                "-all",
                "-format",
                "json",
                "-utf8",
                "-products",
                "*",
                "-requires",
                VC_TOOLS_COMPONENT,
            ],
        )
        .map(|json| parse_vswhere_output(&json))
        .unwrap_or_default()
}

/// Parse vswhere JSON output, skipping malformed entries and duplicate paths.
pub fn parse_vswhere_output(json_str: &str) -> Vec<VisualStudioInstall> {
    let Ok(installations) = serde_json::from_str::<Vec<serde_json::Value>>(json_str) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for inst in installations {
        if let (Some(path), Some(name), Some(version)) = (
            inst.get("installationPath").and_then(|v| v.as_str()),
            inst.get("displayName").and_then(|v| v.as_str()),
            inst.get("installationVersion").and_then(|v| v.as_str()),
        ) {
            let install_path = PathBuf::from(path);
            if !seen.insert(install_path.clone()) {
                continue;
            }
            result.push(VisualStudioInstall {
                install_path,
                display_name: name.to_string(),
                version: version.to_string(),
            });
        }
    }

    result
}

/// clang++ bundled with Visual Studio under `VC\Tools\Llvm`.
pub fn find_bundled_clang(probe: &dyn HostProbe, vs_path: &Path) -> Option<PathBuf> {
    let llvm = vs_path.join("VC").join("Tools").join("Llvm");
    [
        llvm.join("x64").join("bin").join("clang++.exe"),
        llvm.join("bin").join("clang++.exe"),
    ]
    .into_iter()
    .find(|p| probe.exists(p))
}

/// Newest MSVC toolset directory under `VC\Tools\MSVC`, by numeric version.
pub fn find_msvc_toolset(probe: &dyn HostProbe, vs_path: &Path) -> Option<PathBuf> {
    let vc_tools = vs_path.join("VC").join("Tools").join("MSVC");
    probe
        .list_dirs(&vc_tools)
        .into_iter()
        .filter_map(|dir| {
            let version = toolset_version(dir.file_name()?.to_str()?)?;
            Some((version, dir))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, dir)| dir)
}

/// `14.38.33130` as comparable components. Non-numeric names are not toolsets.
fn toolset_version(name: &str) -> Option<Vec<u32>> {
    name.split('.').map(|part| part.parse().ok()).collect()
}

/// cl.exe within an MSVC toolset, x64 host preferred.
pub fn find_cl_exe(probe: &dyn HostProbe, toolset_path: &Path) -> Option<PathBuf> {
    for host in ["Hostx64", "Hostx86"] {
        for target in ["x64", "x86"] {
            let cl = toolset_path
                .join("bin")
                .join(host)
                .join(target)
                .join("cl.exe");
            if probe.exists(&cl) {
                return Some(cl);
            }
        }
    }
    None
}

/// clang++ from a standalone LLVM install: known directories, then the registry.
pub fn find_standalone_clang(probe: &dyn HostProbe) -> Option<PathBuf> {
    let known = LLVM_PATHS
        .iter()
        .map(|dir| PathBuf::from(dir).join("clang++.exe"))
        .find(|p| probe.exists(p));
    if known.is_some() {
        return known;
    }

    let root = probe.registry_value(LLVM_REGISTRY_KEY)?;
    let clang = PathBuf::from(root).join("bin").join("clang++.exe");
    probe.exists(&clang).then_some(clang)
}

/// Best C++ compiler for a Windows host.
pub fn find_compiler(
    probe: &dyn HostProbe,
    install: Option<&VisualStudioInstall>,
) -> Option<PathBuf> {
    if let Some(vs) = install {
        if let Some(clang) = find_bundled_clang(probe, &vs.install_path) {
            return Some(clang);
        }
        if let Some(cl) =
            find_msvc_toolset(probe, &vs.install_path).and_then(|t| find_cl_exe(probe, &t))
        {
            return Some(cl);
        }
    }
    find_standalone_clang(probe)
}
