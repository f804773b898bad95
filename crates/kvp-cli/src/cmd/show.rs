use crate::RunContext;
use anyhow::Context;
use kvp_core::{export, session::Session};
use std::path::Path;

pub fn run(ctx: &RunContext, file: &Path) -> anyhow::Result<()> {
    let project = export::read_export(file)
        .with_context(|| format!("failed to read export '{}'", file.display()))?;

    let mut session = Session::with_config(&ctx.config);
    session.set_role(ctx.role);
    let id = session
        .import_project(project)
        .context("failed to import project")?;
    tracing::debug!(project = %id, "imported export");

    super::dashboard::print(ctx, session.active()?)
}
