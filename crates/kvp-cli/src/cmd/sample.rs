use crate::RunContext;
use anyhow::Context;
use kvp_core::{export, session::Session};
use std::path::Path;

pub fn run(ctx: &RunContext, export_dir: Option<&Path>) -> anyhow::Result<()> {
    let mut session = Session::with_config(&ctx.config);
    session.set_role(ctx.role);
    let id = session.load_sample();
    tracing::info!(project = %id, role = %ctx.role, "loaded sample project");

    let project = session.active().context("no active project")?;
    super::dashboard::print(ctx, project)?;

    if let Some(dir) = export_dir {
        let path = export::write_export(project, dir)
            .with_context(|| format!("failed to export to '{}'", dir.display()))?;
        tracing::info!(path = %path.display(), "wrote export");
        if !ctx.json {
            println!();
            println!("Exported to {}", path.display());
        }
    }
    Ok(())
}
