use crate::context::ExecutionContext;
use crate::output;
use anyhow::Result;
use logtable_runtime::api;

pub fn handle(ctx: &ExecutionContext, table: &str) -> Result<()> {
    let reply = api::delete_log(ctx.workspace()?, table);
    output::emit(ctx, &reply, |_, _| {})
}
