//! Handles `devstrap setup-ide`: regenerate `.vscode/` only.

use anyhow::{Context as _, Result};
use colored::*;

use super::Context;
use crate::ide;
use crate::pipeline::Pipeline;

pub fn run_setup_ide(ctx: &Context) -> Result<()> {
    let probe = ctx.probe();
    let runner = ctx.runner();
    let pipeline = Pipeline::new(&runner, &probe, ctx.options.clone());

    let (_, choice) = pipeline.resolve()?;
    let set = ide::emit(&choice, &ctx.options.project_root)
        .with_context(|| format!("writing {}", ide::CONFIG_DIR))?;

    if let Some(program) = set.program() {
        println!("   {} Debug target: {}", "→".cyan(), program);
    }
    Ok(())
}
