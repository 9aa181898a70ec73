//! The setup pipeline: one linear pass from host detection to IDE launch.
//!
//! Stages run strictly in order and each receives the project root
//! explicitly. Fatal failures are tagged with their [`Stage`]; the run log
//! always gets a terminal line, success or not.

use colored::*;
use std::path::{Path, PathBuf};

use crate::build::{self, BuildConfigurator, BuildOutcome, cmake};
use crate::error::{PipelineError, SetupError, Stage};
use crate::ide::{self, IdeConfigSet, launch};
use crate::patch::{self, PatchResult};
use crate::platform::{HostProbe, PlatformProfile};
use crate::process::CommandRunner;
use crate::runlog::RunLog;
use crate::toolchain::{self, ToolchainChoice, ToolchainRequest};
use crate::ui;
use crate::vcs;

/// User choices for one run.
#[derive(Debug, Clone)]
pub struct SetupOptions {
    pub project_root: PathBuf,
    /// Overrides the name derived from `CMakeLists.txt`.
    pub executable_name: Option<String>,
    pub prefer_ninja: bool,
    pub c_standard: String,
    pub cpp_standard: String,
    pub update_submodules: bool,
    pub build: bool,
    pub open_ide: bool,
    pub verbose: bool,
}

impl SetupOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            executable_name: None,
            prefer_ninja: false,
            c_standard: "c11".to_string(),
            cpp_standard: "c++20".to_string(),
            update_submodules: true,
            build: true,
            open_ide: true,
            verbose: false,
        }
    }

    /// `--exe`, else `project(...)` from `CMakeLists.txt`, else the directory name.
    pub fn resolved_executable_name(&self) -> String {
        self.executable_name
            .clone()
            .or_else(|| cmake::project_name(&self.project_root))
            .or_else(|| {
                self.project_root
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
            })
            .unwrap_or_else(|| ToolchainRequest::default().executable_name)
    }

    pub fn toolchain_request(&self) -> ToolchainRequest {
        ToolchainRequest {
            executable_name: self.resolved_executable_name(),
            prefer_ninja: self.prefer_ninja,
            c_standard: self.c_standard.clone(),
            cpp_standard: self.cpp_standard.clone(),
        }
    }
}

/// What a successful run produced.
#[derive(Debug)]
pub struct SetupReport {
    pub profile: PlatformProfile,
    pub choice: ToolchainChoice,
    pub configure: BuildOutcome,
    /// `None` unless the generator used produces a patchable project.
    pub patch: Option<PatchResult>,
    pub ide: IdeConfigSet,
    pub built: bool,
    pub launch_notes: Vec<SetupError>,
}

pub struct Pipeline<'a> {
    runner: &'a dyn CommandRunner,
    probe: &'a dyn HostProbe,
    options: SetupOptions,
    host: Option<(String, String)>,
    log: RunLog,
}

impl<'a> Pipeline<'a> {
    pub fn new(runner: &'a dyn CommandRunner, probe: &'a dyn HostProbe, options: SetupOptions) -> Self {
        let log = RunLog::new(&options.project_root);
        Self {
            runner,
            probe,
            options,
            host: None,
            log,
        }
    }

    /// Use a fixed OS identifier and raw architecture instead of inspecting the host.
    pub fn with_host(mut self, os: &str, architecture: &str) -> Self {
        self.host = Some((os.to_string(), architecture.to_string()));
        self
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// Detect the platform and resolve the toolchain. Writes nothing.
    pub fn resolve(&self) -> Result<(PlatformProfile, ToolchainChoice), PipelineError> {
        let profile = match &self.host {
            Some((os, arch)) => PlatformProfile::resolve_with(os, arch, self.probe),
            None => PlatformProfile::detect(self.probe),
        }
        .map_err(|e| PipelineError::new(Stage::Platform, e))?;

        if self.options.verbose {
            for note in profile.degraded_probes() {
                println!("   {} {}", "!".yellow(), note);
            }
        }

        let choice = toolchain::resolve_with(&profile, &self.options.toolchain_request())
            .map_err(|e| PipelineError::new(Stage::Toolchain, e))?;

        Ok((profile, choice))
    }

    /// Run every stage, recording the terminal state in the run log.
    pub fn run(&self) -> Result<SetupReport, PipelineError> {
        // Architecture is logged once detected, on the "Platform:" line
        let os = self
            .host
            .as_ref()
            .map_or(std::env::consts::OS, |(os, _)| os.as_str());
        self.log.start(os);

        let result = self.run_stages();
        match &result {
            Ok(_) => self.log.complete(),
            Err(e) => self.log.failed(e),
        }
        result
    }

    fn run_stages(&self) -> Result<SetupReport, PipelineError> {
        let root = self.options.project_root.as_path();

        self.stage(Stage::Platform);
        let (profile, choice) = self.resolve()?;
        self.log.record(format!(
            "Platform: {} {} (xcode: {}, visual studio: {}, ninja: {})",
            profile.os_family,
            profile.architecture,
            profile.has_xcode,
            profile.has_visual_studio,
            profile.has_ninja
        ));
        ui::profile_summary(&profile).print();
        ui::choice_summary(&choice).print();

        if self.options.update_submodules {
            self.stage(Stage::Submodules);
            vcs::update_submodules(self.runner, root)
                .map_err(|e| PipelineError::new(Stage::Submodules, e))?;
        }

        self.stage(Stage::Configure);
        let configure = BuildConfigurator::new(self.runner)
            .configure_project(&choice, root)
            .map_err(|e| PipelineError::new(Stage::Configure, e))?;
        for attempt in &configure.failed_attempts {
            self.log.record(format!(
                "Generator {} failed: {}",
                attempt.generator, attempt.reason
            ));
        }
        self.log
            .record(format!("Generator used: {}", configure.generator_used));

        let patch = if configure.generator_used.produces_patchable_project() {
            self.stage(Stage::Patch);
            let result = patch::patch(root).map_err(|e| PipelineError::new(Stage::Patch, e))?;
            self.log.record(format!("Patch result: {:?}", result.reason));
            Some(result)
        } else {
            None
        };

        self.stage(Stage::IdeConfig);
        let ide = ide::emit(&choice, root).map_err(|e| PipelineError::new(Stage::IdeConfig, e))?;

        let built = if self.options.build {
            self.stage(Stage::Build);
            build::runner::run(self.runner, configure.generator_used, root)
                .map_err(|e| PipelineError::new(Stage::Build, e))?;
            true
        } else {
            false
        };

        let launch_notes = if self.options.open_ide {
            self.stage(Stage::Launch);
            let notes = launch::open(
                self.runner,
                self.probe,
                configure.generator_used,
                profile.os_family,
                root,
            );
            for note in &notes {
                self.log.record(format!("Launch warning: {}", note));
            }
            notes
        } else {
            Vec::new()
        };

        Ok(SetupReport {
            profile,
            choice,
            configure,
            patch,
            ide,
            built,
            launch_notes,
        })
    }

    fn stage(&self, stage: Stage) {
        self.log.record(format!("Stage: {}", stage));
    }
}

/// Canonical form of a user-supplied project root.
pub fn canonical_root(path: &Path) -> std::io::Result<PathBuf> {
    let canonical = path.canonicalize()?;
    // Strip the verbatim prefix Windows adds; CMake and VSCode do not accept it
    let text = canonical.to_string_lossy();
    match text.strip_prefix(r"\\?\") {
        Some(stripped) => Ok(PathBuf::from(stripped)),
        None => Ok(canonical),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::FakeProbe;
    use crate::process::RunOutput;
    use crate::process::testing::FakeRunner;
    use crate::runlog::LOG_FILE;
    use crate::toolchain::Generator;
    use std::fs;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("CMakeLists.txt"),
            "cmake_minimum_required(VERSION 3.20)\nproject(Engine)\n",
        )
        .unwrap();
        dir
    }

    fn quiet_options(root: &Path) -> SetupOptions {
        SetupOptions {
            open_ide: false,
            ..SetupOptions::new(root)
        }
    }

    #[test]
    fn test_executable_name_sources() {
        let dir = project();
        let mut options = SetupOptions::new(dir.path());
        assert_eq!(options.resolved_executable_name(), "Engine");

        options.executable_name = Some("Game".to_string());
        assert_eq!(options.resolved_executable_name(), "Game");

        let bare = tempfile::tempdir().unwrap();
        let named = bare.path().join("sandbox");
        fs::create_dir_all(&named).unwrap();
        assert_eq!(SetupOptions::new(&named).resolved_executable_name(), "sandbox");
    }

    #[test]
    fn test_linux_run_configures_builds_and_emits() {
        let dir = project();
        let probe = FakeProbe::default().with_program("g++", "/usr/bin/g++");
        let runner = FakeRunner::succeeding();

        let report = Pipeline::new(&runner, &probe, quiet_options(dir.path()))
            .with_host("linux", "x86_64")
            .run()
            .unwrap();

        assert_eq!(report.configure.generator_used, Generator::UnixMakefiles);
        assert!(report.patch.is_none());
        assert!(report.built);
        assert_eq!(report.ide.program(), Some("${workspaceFolder}/bin/Engine"));

        // No .gitmodules: configure then build
        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].args.contains(&"Unix Makefiles".to_string()));
        assert_eq!(calls[1].args[0], "--build");

        let log = fs::read_to_string(dir.path().join(LOG_FILE)).unwrap();
        assert!(log.contains("Generator used: Unix Makefiles"));
        assert!(log.trim_end().ends_with("=== Setup Complete ==="));
    }

    #[test]
    fn test_xcode_failure_falls_back_and_skips_patch() {
        let dir = project();
        let probe = FakeProbe::default()
            .with_program("xcode-select", "/usr/bin/xcode-select")
            .with_capture(
                "/usr/bin/xcode-select",
                &["-p"],
                "/Applications/Xcode.app/Contents/Developer",
            );
        let runner = FakeRunner::with_codes(&[1]);

        let report = Pipeline::new(&runner, &probe, quiet_options(dir.path()))
            .with_host("macos", "arm64")
            .run()
            .unwrap();

        assert_eq!(report.choice.generator, Generator::Xcode);
        assert_eq!(report.configure.generator_used, Generator::UnixMakefiles);
        assert_eq!(report.configure.failed_attempts.len(), 1);
        assert!(report.patch.is_none());
    }

    #[test]
    fn test_consolidated_failure_is_logged_with_stage() {
        let dir = project();
        let probe = FakeProbe::default();
        let runner = FakeRunner::with_codes(&[1, 1]);

        let err = Pipeline::new(&runner, &probe, quiet_options(dir.path()))
            .with_host("darwin", "arm64")
            .run()
            .unwrap_err();

        assert_eq!(err.stage, Stage::Configure);
        assert!(matches!(err.source, SetupError::GeneratorInvocation { .. }));
        assert!(!dir.path().join(".vscode").exists());

        let log = fs::read_to_string(dir.path().join(LOG_FILE)).unwrap();
        assert!(log.contains("=== Setup Failed (cmake configure):"));
    }

    #[test]
    fn test_unknown_os_fails_in_platform_stage() {
        let dir = project();
        let runner = FakeRunner::succeeding();
        let err = Pipeline::new(&runner, &FakeProbe::default(), quiet_options(dir.path()))
            .with_host("plan9", "mips")
            .run()
            .unwrap_err();

        assert_eq!(err.stage, Stage::Platform);
        assert!(runner.calls.borrow().is_empty());
        let log = fs::read_to_string(dir.path().join(LOG_FILE)).unwrap();
        assert!(log.contains("=== Setup Failed (platform detection):"));
    }

    #[test]
    fn test_build_failure_keeps_ide_descriptors() {
        let dir = project();
        let runner = FakeRunner::succeeding();
        runner.push_outcome(Ok(RunOutput {
            code: Some(0),
            stderr: String::new(),
        }));
        runner.push_outcome(Ok(RunOutput {
            code: Some(2),
            stderr: "main.cpp:1: error".to_string(),
        }));

        let err = Pipeline::new(&runner, &FakeProbe::default(), quiet_options(dir.path()))
            .with_host("linux", "aarch64")
            .run()
            .unwrap_err();

        assert_eq!(err.stage, Stage::Build);
        assert!(dir.path().join(".vscode").join("launch.json").exists());
    }

    #[test]
    fn test_submodules_run_first_when_present() {
        let dir = project();
        fs::write(dir.path().join(".gitmodules"), "").unwrap();
        let runner = FakeRunner::succeeding();
        let options = SetupOptions {
            build: false,
            ..quiet_options(dir.path())
        };

        let report = Pipeline::new(&runner, &FakeProbe::default(), options)
            .with_host("linux", "x86_64")
            .run()
            .unwrap();

        assert!(!report.built);
        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, "git");
        assert_eq!(calls[1].program, "cmake");
    }

    #[test]
    fn test_resolve_writes_nothing() {
        let dir = project();
        let runner = FakeRunner::succeeding();
        let probe = FakeProbe::default();
        let pipeline = Pipeline::new(&runner, &probe, SetupOptions::new(dir.path()))
            .with_host("linux", "x86_64");

        let (profile, choice) = pipeline.resolve().unwrap();
        assert_eq!(profile.architecture, "x86_64");
        assert_eq!(choice.executable_name, "Engine");
        assert!(runner.calls.borrow().is_empty());
        assert!(!dir.path().join(LOG_FILE).exists());
    }

    #[test]
    fn test_log_start_line_leaves_architecture_to_platform_line() {
        let dir = project();
        let runner = FakeRunner::succeeding();
        let options = SetupOptions {
            build: false,
            ..quiet_options(dir.path())
        };

        Pipeline::new(&runner, &FakeProbe::default(), options)
            .with_host("linux", "aarch64")
            .run()
            .unwrap();

        let log = fs::read_to_string(dir.path().join(LOG_FILE)).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert!(lines[0].contains("=== Setup Started: linux (devstrap "));
        assert!(!lines[0].contains("x86_64"));
        assert!(log.contains("Platform: Linux arm64"));
    }
}
