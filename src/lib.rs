//! # devstrap - C/C++ Development Environment Bootstrapper
//!
//! devstrap takes a CMake project from a fresh checkout to a debuggable IDE
//! session in one command.
//!
//! ## What a run does
//!
//! 1. Detects the host (OS family, architecture, Xcode, Visual Studio, Ninja, compiler)
//! 2. Resolves a toolchain: generator, fallback generator, debugger, IntelliSense mode
//! 3. Updates git submodules when `.gitmodules` exists
//! 4. Configures with CMake, falling back once to a second generator
//! 5. Patches the Xcode project's working directory (Xcode only)
//! 6. Writes `.vscode/launch.json`, `tasks.json` and `c_cpp_properties.json`
//! 7. Builds once and opens the IDE
//!
//! ## Quick Start
//!
//! ```bash
//! # Full setup in the current directory
//! devstrap
//!
//! # Only report what would be used
//! devstrap doctor
//! ```
//!
//! ## Module Organization
//!
//! - [`platform`] - Host detection ([`platform::PlatformProfile`])
//! - [`toolchain`] - Generator and compiler selection ([`toolchain::ToolchainChoice`])
//! - [`build`] - CMake configure with fallback, and the initial build
//! - [`ide`] - VSCode descriptors and IDE launching
//! - [`pipeline`] - Stage orchestration

/// CMake configure (with generator fallback) and build.
pub mod build;

/// CLI command handlers.
pub mod commands;

/// Error taxonomy and pipeline stages.
pub mod error;

/// Whole-file replacement writes.
pub mod fs_util;

/// VSCode configuration and IDE launching.
pub mod ide;

/// Xcode project working-directory patch.
pub mod patch;

/// Stage orchestration.
pub mod pipeline;

/// Host platform detection.
pub mod platform;

/// External command execution.
pub mod process;

/// Append-only run log.
pub mod runlog;

/// Toolchain resolution.
pub mod toolchain;

/// Terminal summaries.
pub mod ui;

/// Git submodules.
pub mod vcs;
