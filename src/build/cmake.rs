//! Reading the bits of CMake state the pipeline cares about: the project
//! name declared in `CMakeLists.txt` and the generator recorded in an
//! existing `CMakeCache.txt`.

use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

static PROJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?im)^\s*project\s*\(\s*"?([A-Za-z0-9_.+-]+)"?"#).expect("valid project() regex")
});

static GENERATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^CMAKE_GENERATOR:INTERNAL=(.*?)\r?$").expect("valid cache regex")
});

/// Name from the first `project(...)` call in the root `CMakeLists.txt`.
pub fn project_name(project_root: &Path) -> Option<String> {
    let content = fs::read_to_string(project_root.join("CMakeLists.txt")).ok()?;
    parse_project_name(&content)
}

pub fn parse_project_name(content: &str) -> Option<String> {
    let uncommented: String = content
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");
    PROJECT_RE
        .captures(&uncommented)
        .map(|c| c[1].to_string())
}

/// Generator recorded by a previous configure in `build_dir`, if any.
pub fn cached_generator(build_dir: &Path) -> Option<String> {
    let content = fs::read_to_string(build_dir.join("CMakeCache.txt")).ok()?;
    parse_cached_generator(&content)
}

pub fn parse_cached_generator(content: &str) -> Option<String> {
    GENERATOR_RE
        .captures(content)
        .map(|c| c[1].trim().to_string())
}

/// Remove `CMakeCache.txt` and `CMakeFiles/` so a different generator can be used.
pub fn clear_cache(build_dir: &Path) -> io::Result<()> {
    let cache = build_dir.join("CMakeCache.txt");
    if cache.exists() {
        fs::remove_file(&cache)?;
    }
    let files = build_dir.join("CMakeFiles");
    if files.exists() {
        fs::remove_dir_all(&files)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project_name() {
        let cmake = "cmake_minimum_required(VERSION 3.20)\n\
                     # project(Commented)\n\
                     project(Engine VERSION 0.1 LANGUAGES CXX)\n";
        assert_eq!(parse_project_name(cmake), Some("Engine".to_string()));
    }

    #[test]
    fn test_parse_project_name_quoted_and_spaced() {
        assert_eq!(
            parse_project_name("PROJECT ( \"my-app\" )"),
            Some("my-app".to_string())
        );
        assert_eq!(parse_project_name("add_executable(foo main.cpp)"), None);
    }

    #[test]
    fn test_parse_cached_generator() {
        let cache = "# This is the CMakeCache file.\r\n\
                     CMAKE_GENERATOR:INTERNAL=Unix Makefiles\r\n\
                     CMAKE_GENERATOR_PLATFORM:INTERNAL=\r\n";
        assert_eq!(
            parse_cached_generator(cache),
            Some("Unix Makefiles".to_string())
        );
    }

    #[test]
    fn test_clear_cache_removes_state() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("CMakeCache.txt"), "CMAKE_GENERATOR:INTERNAL=Xcode\n").unwrap();
        fs::create_dir_all(dir.path().join("CMakeFiles").join("3.28")).unwrap();

        assert_eq!(cached_generator(dir.path()), Some("Xcode".to_string()));
        clear_cache(dir.path()).unwrap();
        assert_eq!(cached_generator(dir.path()), None);
        assert!(!dir.path().join("CMakeFiles").exists());
    }
}
