//! Post-generation patch of the Xcode project descriptor.
//!
//! CMake's Xcode generator does not set a working directory, so programs that
//! load assets relative to the project root fail when run from Xcode. The
//! patch adds `WORKING_DIRECTORY = "<root>";` to every build configuration.
//!
//! There is no structured pbxproj parser in the dependency stack, so the
//! setting is inserted as text after a known anchor line. The idempotence
//! guard is the only thing keeping repeated runs from stacking duplicates.

use colored::*;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

use crate::build::BUILD_DIR;
use crate::error::SetupError;
use crate::fs_util::write_replacing;

pub const MARKER_KEY: &str = "WORKING_DIRECTORY";

const DESCRIPTOR_NAME: &str = "project.pbxproj";

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([ \t]*)DEBUG_INFORMATION_FORMAT = [^;]+;[ \t]*$").expect("valid anchor regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchReason {
    Applied,
    AlreadyPresent,
    NoProjectFound,
    /// A descriptor exists but has no anchor line to insert after.
    AnchorMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    pub applied: bool,
    pub reason: PatchReason,
    pub descriptor: Option<PathBuf>,
}

impl PatchResult {
    fn skipped(reason: PatchReason, descriptor: Option<PathBuf>) -> Self {
        Self {
            applied: false,
            reason,
            descriptor,
        }
    }
}

/// First `*.xcodeproj/project.pbxproj` directly under the build directory.
pub fn find_descriptor(project_root: &Path) -> Option<PathBuf> {
    WalkDir::new(project_root.join(BUILD_DIR))
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "xcodeproj"))
        .map(|e| e.path().join(DESCRIPTOR_NAME))
        .find(|p| p.is_file())
}

/// Set the working directory in the generated Xcode project to `project_root`.
pub fn patch(project_root: &Path) -> Result<PatchResult, SetupError> {
    let Some(descriptor) = find_descriptor(project_root) else {
        println!("   {} No Xcode project found to patch", "!".yellow());
        return Ok(PatchResult::skipped(PatchReason::NoProjectFound, None));
    };

    let io_err = |source| SetupError::ProjectPatch {
        path: descriptor.clone(),
        source,
    };

    let content = fs::read_to_string(&descriptor).map_err(io_err)?;
    if content.contains(MARKER_KEY) {
        println!("   {} Xcode working directory already set", "ℹ".blue());
        return Ok(PatchResult::skipped(
            PatchReason::AlreadyPresent,
            Some(descriptor),
        ));
    }

    let working_dir = project_root.to_string_lossy().replace('\\', "/");
    let Some(patched) = patch_text(&content, &working_dir) else {
        println!(
            "   {} No build configuration anchor in {}",
            "!".yellow(),
            descriptor.display()
        );
        return Ok(PatchResult::skipped(
            PatchReason::AnchorMissing,
            Some(descriptor),
        ));
    };

    write_replacing(&descriptor, patched.as_bytes()).map_err(io_err)?;
    println!("   {} Xcode working directory set", "✓".green());

    Ok(PatchResult {
        applied: true,
        reason: PatchReason::Applied,
        descriptor: Some(descriptor),
    })
}

/// Insert the marker after every anchor line, keeping the anchor's
/// indentation and line ending. `None` if there is no anchor.
pub fn patch_text(content: &str, working_dir: &str) -> Option<String> {
    let escaped = working_dir.replace('\\', "\\\\").replace('"', "\\\"");
    let mut out = String::with_capacity(content.len() + 256);
    let mut inserted = false;

    for line in content.split_inclusive('\n') {
        out.push_str(line);

        let body = line.trim_end_matches(['\r', '\n']);
        let Some(caps) = ANCHOR_RE.captures(body) else {
            continue;
        };

        let eol = if line.ends_with("\r\n") { "\r\n" } else { "\n" };
        if !line.ends_with('\n') {
            out.push_str(eol);
        }
        out.push_str(&format!(
            "{}{} = \"{}\";{}",
            &caps[1], MARKER_KEY, escaped, eol
        ));
        inserted = true;
    }

    inserted.then_some(out)
}
