//! Toolchain resolution
//!
//! Maps a [`PlatformProfile`] to a concrete [`ToolchainChoice`]: generator,
//! fallback generator, compiler, debugger and IntelliSense settings. This is a
//! pure function of the profile and the request; all probing happened earlier.

pub mod types;

pub use types::{
    DEFAULT_VISUAL_STUDIO_MAJOR, DebuggerMode, Generator, ToolchainChoice, ToolchainRequest,
};

use std::path::Path;

use crate::error::SetupError;
use crate::platform::{OsFamily, PlatformProfile};

const DEFAULT_VS_ROOT: &str = "C:/Program Files/Microsoft Visual Studio/2022/Community";
const WORKSPACE_GLOB: &str = "${workspaceFolder}/**";

/// Resolve with default request settings.
pub fn resolve(profile: &PlatformProfile) -> Result<ToolchainChoice, SetupError> {
    resolve_with(profile, &ToolchainRequest::default())
}

pub fn resolve_with(
    profile: &PlatformProfile,
    request: &ToolchainRequest,
) -> Result<ToolchainChoice, SetupError> {
    let (generator, debugger_mode, intellisense_mode) = match profile.os_family {
        OsFamily::Windows => {
            let generator = if profile.has_visual_studio {
                Generator::VisualStudioSolution(visual_studio_major(profile))
            } else {
                Generator::MinGWMakefiles
            };
            (generator, DebuggerMode::Cppvsdbg, "msvc-x64")
        }
        OsFamily::MacOs => {
            let generator = if profile.has_xcode {
                Generator::Xcode
            } else {
                Generator::UnixMakefiles
            };
            (generator, DebuggerMode::Lldb, "clang-x64")
        }
        OsFamily::Linux => {
            let generator = if request.prefer_ninja {
                Generator::Ninja
            } else {
                Generator::UnixMakefiles
            };
            (generator, DebuggerMode::Gdb, "gcc-x64")
        }
        OsFamily::Unknown => {
            return Err(SetupError::UnsupportedPlatform {
                os: profile.os_family.to_string(),
            });
        }
    };

    let compiler_path = profile
        .compiler
        .as_deref()
        .map(slash_path)
        .unwrap_or_else(|| default_compiler(profile.os_family).to_string());

    let executable_name = if profile.os_family == OsFamily::Windows {
        format!("{}.exe", request.executable_name)
    } else {
        request.executable_name.clone()
    };

    Ok(ToolchainChoice {
        os_family: profile.os_family,
        architecture: profile.architecture.clone(),
        generator,
        fallback: fallback_for(generator, profile),
        include_paths: include_paths(profile),
        compiler_path,
        debugger_mode,
        intellisense_mode: intellisense_mode.to_string(),
        executable_name,
        c_standard: request.c_standard.clone(),
        cpp_standard: request.cpp_standard.clone(),
    })
}

/// The one generator worth trying when `primary` fails on this host.
fn fallback_for(primary: Generator, profile: &PlatformProfile) -> Option<Generator> {
    match primary {
        Generator::Xcode | Generator::Ninja => Some(Generator::UnixMakefiles),
        Generator::UnixMakefiles => profile.has_ninja.then_some(Generator::Ninja),
        Generator::VisualStudioSolution(_) => Some(if profile.has_ninja {
            Generator::Ninja
        } else {
            Generator::MinGWMakefiles
        }),
        Generator::MinGWMakefiles => profile.has_ninja.then_some(Generator::Ninja),
    }
}

fn visual_studio_major(profile: &PlatformProfile) -> u32 {
    profile
        .visual_studio
        .as_ref()
        .and_then(|vs| vs.major_version())
        .unwrap_or(DEFAULT_VISUAL_STUDIO_MAJOR)
}

fn default_compiler(family: OsFamily) -> &'static str {
    match family {
        OsFamily::Windows => {
            "C:/Program Files/Microsoft Visual Studio/2022/Community/VC/Tools/Llvm/bin/clang++.exe"
        }
        OsFamily::MacOs => "/usr/bin/clang++",
        OsFamily::Linux | OsFamily::Unknown => "/usr/bin/g++",
    }
}

fn include_paths(profile: &PlatformProfile) -> Vec<String> {
    let mut paths = vec![WORKSPACE_GLOB.to_string()];

    match profile.os_family {
        OsFamily::Windows => {
            let vs_root = profile
                .visual_studio
                .as_ref()
                .map(|vs| slash_path(&vs.install_path))
                .unwrap_or_else(|| DEFAULT_VS_ROOT.to_string());
            paths.push(format!("{}/VC/Tools/MSVC/**/include", vs_root));
        }
        OsFamily::Linux => {
            paths.push("/usr/include".to_string());
            paths.push("/usr/local/include".to_string());
        }
        OsFamily::MacOs => {
            paths.push("/usr/local/include".to_string());
            paths.push("/opt/homebrew/include".to_string());
        }
        OsFamily::Unknown => {}
    }

    // <prefix>/bin/c++ ships its headers in <prefix>/include
    if let Some(include) = profile
        .compiler
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .map(|prefix| slash_path(&prefix.join("include")))
        && !paths.contains(&include)
    {
        paths.push(include);
    }

    paths
}

fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::VisualStudioInstall;
    use std::path::PathBuf;

    fn profile(os_family: OsFamily) -> PlatformProfile {
        PlatformProfile {
            os_family,
            architecture: "x86_64".to_string(),
            has_xcode: false,
            has_visual_studio: false,
            has_ninja: false,
            compiler: None,
            visual_studio: None,
        }
    }

    #[test]
    fn test_every_supported_combination_maps_into_family_set() {
        for family in [OsFamily::Windows, OsFamily::Linux, OsFamily::MacOs] {
            for has_xcode in [false, true] {
                for has_visual_studio in [false, true] {
                    let p = PlatformProfile {
                        has_xcode,
                        has_visual_studio,
                        ..profile(family)
                    };
                    let choice = resolve(&p).unwrap();
                    let allowed: &[Generator] = match family {
                        OsFamily::Windows => {
                            &[
                                Generator::VisualStudioSolution(DEFAULT_VISUAL_STUDIO_MAJOR),
                                Generator::MinGWMakefiles,
                            ]
                        }
                        OsFamily::MacOs => &[Generator::Xcode, Generator::UnixMakefiles],
                        _ => &[Generator::UnixMakefiles, Generator::Ninja],
                    };
                    assert!(allowed.contains(&choice.generator), "{:?}", p);
                }
            }
        }
    }

    #[test]
    fn test_macos_with_xcode() {
        let p = PlatformProfile {
            architecture: "arm64".to_string(),
            has_xcode: true,
            ..profile(OsFamily::MacOs)
        };
        let choice = resolve(&p).unwrap();
        assert_eq!(choice.generator, Generator::Xcode);
        assert_eq!(choice.fallback, Some(Generator::UnixMakefiles));
        assert_eq!(choice.debugger_mode, DebuggerMode::Lldb);
        assert_eq!(choice.intellisense_mode, "clang-x64");
        assert_eq!(choice.architecture, "arm64");
        assert_eq!(choice.compiler_path, "/usr/bin/clang++");
    }

    #[test]
    fn test_linux_defaults_to_makefiles_and_gdb() {
        let choice = resolve(&profile(OsFamily::Linux)).unwrap();
        assert_eq!(choice.generator, Generator::UnixMakefiles);
        assert_eq!(choice.debugger_mode, DebuggerMode::Gdb);
        assert_eq!(choice.fallback, None);
        assert_eq!(choice.executable_name, "app");
        assert_eq!(
            choice.include_paths,
            vec!["${workspaceFolder}/**", "/usr/include", "/usr/local/include"]
        );
    }

    #[test]
    fn test_linux_ninja_on_request() {
        let request = ToolchainRequest {
            prefer_ninja: true,
            ..ToolchainRequest::default()
        };
        let choice = resolve_with(&profile(OsFamily::Linux), &request).unwrap();
        assert_eq!(choice.generator, Generator::Ninja);
        assert_eq!(choice.fallback, Some(Generator::UnixMakefiles));
    }

    #[test]
    fn test_windows_visual_studio() {
        let p = PlatformProfile {
            has_visual_studio: true,
            visual_studio: Some(VisualStudioInstall {
                install_path: PathBuf::from(r"D:\VS\2022\Professional"),
                display_name: "Visual Studio Professional 2022".to_string(),
                version: "17.9".to_string(),
            }),
            ..profile(OsFamily::Windows)
        };
        let choice = resolve(&p).unwrap();
        assert_eq!(choice.generator, Generator::VisualStudioSolution(17));
        assert_eq!(choice.fallback, Some(Generator::MinGWMakefiles));
        assert_eq!(choice.debugger_mode, DebuggerMode::Cppvsdbg);
        assert_eq!(choice.executable_name, "app.exe");
        assert!(
            choice
                .include_paths
                .contains(&"D:/VS/2022/Professional/VC/Tools/MSVC/**/include".to_string())
        );
    }

    #[test]
    fn test_visual_studio_2019_selects_matching_generator() {
        let p = PlatformProfile {
            has_visual_studio: true,
            visual_studio: Some(VisualStudioInstall {
                install_path: PathBuf::from(r"C:\Program Files (x86)\Microsoft Visual Studio\2019\Community"),
                display_name: "Visual Studio Community 2019".to_string(),
                version: "16.11.34931.43".to_string(),
            }),
            ..profile(OsFamily::Windows)
        };
        let choice = resolve(&p).unwrap();
        assert_eq!(choice.generator, Generator::VisualStudioSolution(16));
        assert_eq!(choice.generator.cmake_name(), "Visual Studio 16 2019");
    }

    #[test]
    fn test_visual_studio_without_readable_version_uses_default() {
        let p = PlatformProfile {
            has_visual_studio: true,
            visual_studio: Some(VisualStudioInstall {
                install_path: PathBuf::from(r"C:\VS"),
                display_name: "Visual Studio Build Tools".to_string(),
                version: String::new(),
            }),
            ..profile(OsFamily::Windows)
        };
        let choice = resolve(&p).unwrap();
        assert_eq!(
            choice.generator,
            Generator::VisualStudioSolution(DEFAULT_VISUAL_STUDIO_MAJOR)
        );
    }

    #[test]
    fn test_windows_without_visual_studio_uses_mingw() {
        let p = PlatformProfile {
            has_ninja: true,
            ..profile(OsFamily::Windows)
        };
        let choice = resolve(&p).unwrap();
        assert_eq!(choice.generator, Generator::MinGWMakefiles);
        assert_eq!(choice.fallback, Some(Generator::Ninja));
    }

    #[test]
    fn test_unknown_family_is_rejected() {
        let err = resolve(&profile(OsFamily::Unknown)).unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn test_detected_compiler_adds_its_include_dir() {
        let p = PlatformProfile {
            compiler: Some(PathBuf::from("/opt/homebrew/opt/llvm/bin/clang++")),
            ..profile(OsFamily::MacOs)
        };
        let choice = resolve(&p).unwrap();
        assert_eq!(choice.compiler_path, "/opt/homebrew/opt/llvm/bin/clang++");
        assert_eq!(
            choice.include_paths.last().map(String::as_str),
            Some("/opt/homebrew/opt/llvm/include")
        );
    }

    #[test]
    fn test_system_compiler_include_dir_is_not_duplicated() {
        let p = PlatformProfile {
            compiler: Some(PathBuf::from("/usr/bin/g++")),
            ..profile(OsFamily::Linux)
        };
        let choice = resolve(&p).unwrap();
        let count = choice
            .include_paths
            .iter()
            .filter(|p| *p == "/usr/include")
            .count();
        assert_eq!(count, 1);
    }
}
