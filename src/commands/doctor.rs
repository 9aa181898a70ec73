//! Doctor command handler
//!
//! Handles `devstrap doctor`: resolve and report, write nothing.

use anyhow::Result;
use colored::*;

use super::Context;
use crate::build;
use crate::pipeline::Pipeline;
use crate::platform::HostProbe;

/// External tools the pipeline may drive, and whether each is required.
const TOOLS: &[(&str, bool, &str)] = &[
    ("cmake", true, "Install CMake 3.20+"),
    ("git", false, "Install Git to fetch submodules"),
    ("ninja", false, "Optional, enables --ninja"),
    ("code", false, "Optional, VSCode is opened after setup"),
];

/// Run the `devstrap doctor` command to diagnose the host
pub fn run_doctor(ctx: &Context) -> Result<()> {
    println!("{} Running Setup Doctor...", "🚑".red());
    println!("-------------------------------");

    let probe = ctx.probe();
    let runner = ctx.runner();
    let pipeline = Pipeline::new(&runner, &probe, ctx.options.clone());
    let (profile, choice) = pipeline.resolve()?;

    crate::ui::profile_summary(&profile).print();
    crate::ui::choice_summary(&choice).print();

    let mut missing_required = false;
    for (tool, required, hint) in TOOLS {
        print!("Checking {}... ", tool);
        match probe.find_program(tool) {
            Some(path) => println!("{} ({})", "Found".green(), path.display()),
            None if *required => {
                missing_required = true;
                println!("{}", format!("Not Found ({})", hint).red());
            }
            None => println!("{}", format!("Not Found ({})", hint).yellow()),
        }
    }

    for note in profile.degraded_probes() {
        println!("{} {}", "!".yellow(), note);
    }

    let candidates = build::candidates(&choice, &ctx.options.project_root);
    println!("\n{} Configure commands, in order:", "🛠".cyan());
    for invocation in &candidates {
        println!("   {}", invocation.command_line());
    }

    if missing_required {
        println!("\n{} Required tools are missing", "x".red());
    } else {
        println!("\n{} Ready to run setup", "✓".green());
    }
    Ok(())
}
