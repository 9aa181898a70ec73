use colored::*;

/// Turns CMake and compiler stderr into a short actionable hint.
pub struct FeedbackAnalyzer;

impl FeedbackAnalyzer {
    pub fn analyze(output: &str) -> Option<String> {
        // 1. Generator not available (e.g. Xcode without a full install)
        if output.contains("Could not create named generator") {
            return Some(format!(
                "CMake does not know this {}.\nUpgrade CMake or let the fallback generator take over.",
                "generator".bold().yellow()
            ));
        }

        // 2. Build tree configured by something else earlier
        // CMake starts the sentence at line start ("Does not match ...")
        if output.contains("match the generator used previously") {
            return Some(format!(
                "The build directory was configured with a different generator.\nDelete {} and re-run.",
                "build/".bold().yellow()
            ));
        }

        // 3. make / ninja missing
        if output.contains("CMAKE_MAKE_PROGRAM is not set")
            || output.contains("Running 'nmake' '-?' failed")
        {
            return Some(format!(
                "No {} was found for this generator.\nInstall make or ninja (or pass {}).",
                "build program".bold().red(),
                "--ninja".bold().green()
            ));
        }

        // 4. No compiler at all
        if output.contains("No CMAKE_CXX_COMPILER could be found")
            || output.contains("No CMAKE_C_COMPILER could be found")
        {
            return Some(format!(
                "No {} was found.\nInstall clang or gcc (or Visual Studio Build Tools on Windows).",
                "C/C++ compiler".bold().red()
            ));
        }

        // 5. Missing header during the build
        if output.contains("fatal error: ") && output.contains("No such file or directory")
            || output.contains("cannot open include file")
        {
            return Some(format!(
                "It looks like a {} error.\nRun {} if the project vendors headers as submodules.",
                "Missing Header".bold().red(),
                "git submodule update --init --recursive".bold().green()
            ));
        }

        None
    }
}
