use crate::context::ExecutionContext;
use crate::output;
use anyhow::Result;
use logtable_types::Reply;

pub fn handle(ctx: &ExecutionContext) -> Result<()> {
    let workspace = ctx.workspace()?;
    workspace.cleanup().vacuum()?;

    let msg = format!("Vacuumed {}", workspace.database_path().display());
    output::emit(ctx, &Reply::ok((), msg), |_, _| {})
}
