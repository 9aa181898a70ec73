//! # devstrap CLI Entry Point
//!
//! Parses arguments with clap and hands a [`commands::Context`] to the
//! selected handler. Without a subcommand the full setup pipeline runs:
//! submodules, CMake configure, Xcode patch, VSCode descriptors, build, and
//! IDE launch.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use devstrap::commands::{self, Context};
use devstrap::pipeline::{SetupOptions, canonical_root};

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn SetConsoleOutputCP(wCodePageID: u32) -> i32;
}

#[cfg(windows)]
fn enable_windows_utf8_console() {
    unsafe {
        SetConsoleOutputCP(65001);
    }
}

#[cfg(not(windows))]
fn enable_windows_utf8_console() {}

#[derive(Parser)]
#[command(name = "devstrap")]
#[command(about = "Bootstrap a CMake C/C++ project: configure, build and set up the IDE", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    project_root: Option<PathBuf>,

    /// Use the Ninja generator (Linux)
    #[arg(long, global = true)]
    ninja: bool,

    /// Executable name to debug (defaults to the CMake project name)
    #[arg(long, global = true, value_name = "NAME")]
    exe: Option<String>,

    /// C++ standard for IntelliSense
    #[arg(long, global = true, default_value = "c++20")]
    cpp_std: String,

    /// C standard for IntelliSense
    #[arg(long, global = true, default_value = "c11")]
    c_std: String,

    /// Do not run `git submodule update`
    #[arg(long)]
    skip_submodules: bool,

    /// Configure only, skip `cmake --build`
    #[arg(long)]
    no_build: bool,

    /// Do not open Xcode, Visual Studio or VSCode afterwards
    #[arg(long)]
    no_open: bool,

    /// Print every external command before running it
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the detected platform and toolchain without changing anything
    Doctor,
    /// Regenerate the VSCode configuration only
    SetupIde,
}

impl Cli {
    fn options(&self) -> Result<SetupOptions> {
        let root = match &self.project_root {
            Some(path) => path.clone(),
            None => std::env::current_dir().context("reading current directory")?,
        };
        let project_root = canonical_root(&root)
            .with_context(|| format!("project root {} is not accessible", root.display()))?;

        Ok(SetupOptions {
            executable_name: self.exe.clone(),
            prefer_ninja: self.ninja,
            c_standard: self.c_std.clone(),
            cpp_standard: self.cpp_std.clone(),
            update_submodules: !self.skip_submodules,
            build: !self.no_build,
            open_ide: !self.no_open,
            verbose: self.verbose,
            ..SetupOptions::new(project_root)
        })
    }
}

fn main() -> Result<()> {
    enable_windows_utf8_console();

    let cli = Cli::parse();
    let ctx = Context::new(cli.options()?);

    match &cli.command {
        None => commands::setup::run_setup(&ctx),
        Some(Commands::Doctor) => commands::doctor::run_doctor(&ctx),
        Some(Commands::SetupIde) => commands::setup_ide::run_setup_ide(&ctx),
    }
}
