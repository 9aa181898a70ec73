//! Handles the default command: the full setup pipeline.

use anyhow::Result;
use colored::*;

use super::Context;
use crate::pipeline::Pipeline;

pub fn run_setup(ctx: &Context) -> Result<()> {
    println!(
        "{} Setting up {}",
        "🚀".cyan(),
        ctx.options.project_root.display().to_string().bold()
    );

    let probe = ctx.probe();
    let runner = ctx.runner();
    let pipeline = Pipeline::new(&runner, &probe, ctx.options.clone());

    match pipeline.run() {
        Ok(report) => {
            if let Some(patch) = &report.patch {
                println!("   {} Xcode patch: {:?}", "ℹ".blue(), patch.reason);
            }
            println!(
                "\n{} Setup complete (generator: {})",
                "🎉".green(),
                report.configure.generator_used.to_string().bold()
            );
            Ok(())
        }
        Err(e) => {
            println!("\n{} {}", "x".red(), e);
            println!("   See {} for details", pipeline.log().path().display());
            Err(e.into())
        }
    }
}
