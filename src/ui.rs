//! Terminal summary output.
//!
//! A two-column box-drawn table, used to show the resolved platform profile
//! and toolchain choice before anything is written.

use colored::*;

use crate::platform::PlatformProfile;
use crate::toolchain::ToolchainChoice;

const MAX_VALUE_WIDTH: usize = 72;

pub struct Summary {
    title: String,
    rows: Vec<(String, String)>,
}

impl Summary {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, key: &str, value: impl Into<String>) -> Self {
        self.rows.push((key.to_string(), sanitize(&value.into())));
        self
    }

    /// Render without colors, one line per entry.
    pub fn render(&self) -> String {
        let key_width = self
            .rows
            .iter()
            .map(|(k, _)| k.chars().count())
            .max()
            .unwrap_or(0);
        let value_width = self
            .rows
            .iter()
            .map(|(_, v)| v.chars().count().min(MAX_VALUE_WIDTH))
            .max()
            .unwrap_or(0)
            .max(self.title.chars().count().saturating_sub(key_width + 3));

        let inner = key_width + value_width + 5;
        let mut out = String::new();
        out.push_str(&format!("  ┌{}┐\n", "─".repeat(inner)));
        out.push_str(&format!(
            "  │ {}{} │\n",
            self.title,
            " ".repeat(inner - 2 - self.title.chars().count().min(inner - 2))
        ));
        out.push_str(&format!(
            "  ├{}┬{}┤\n",
            "─".repeat(key_width + 2),
            "─".repeat(value_width + 2)
        ));
        for (key, value) in &self.rows {
            let value = truncate(value, value_width);
            out.push_str(&format!(
                "  │ {:<kw$} │ {:<vw$} │\n",
                key,
                value,
                kw = key_width,
                vw = value_width
            ));
        }
        out.push_str(&format!(
            "  └{}┴{}┘\n",
            "─".repeat(key_width + 2),
            "─".repeat(value_width + 2)
        ));
        out
    }

    pub fn print(&self) {
        print!("{}", self.render().cyan());
    }
}

pub fn profile_summary(profile: &PlatformProfile) -> Summary {
    let vs = profile
        .visual_studio
        .as_ref()
        .map(|vs| format!("{} ({})", vs.display_name, vs.version))
        .unwrap_or_else(|| yes_no(profile.has_visual_studio).to_string());

    Summary::new("Platform")
        .row("OS", profile.os_family.to_string())
        .row("Architecture", profile.architecture.as_str())
        .row("Xcode", yes_no(profile.has_xcode))
        .row("Visual Studio", vs)
        .row("Ninja", yes_no(profile.has_ninja))
        .row(
            "Compiler",
            profile
                .compiler
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "not found".to_string()),
        )
}

pub fn choice_summary(choice: &ToolchainChoice) -> Summary {
    Summary::new("Toolchain")
        .row("Generator", choice.generator.to_string())
        .row(
            "Fallback",
            choice
                .fallback
                .map(|g| g.to_string())
                .unwrap_or_else(|| "none".to_string()),
        )
        .row("Compiler", choice.compiler_path.as_str())
        .row("Debugger", choice.debugger_mode.as_str())
        .row("IntelliSense", choice.intellisense_mode.as_str())
        .row("Executable", choice.executable_name.as_str())
        .row(
            "Standards",
            format!("{} / {}", choice.c_standard, choice.cpp_standard),
        )
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let mut result: String = s.chars().take(max_width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    } else {
        s.to_string()
    }
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            _ => c,
        })
        .collect()
}
