use crate::context::ExecutionContext;
use crate::output::{self, Tone, paint};
use anyhow::Result;
use logtable_runtime::api;

pub fn handle(ctx: &ExecutionContext) -> Result<()> {
    let reply = api::clear_all_log(ctx.workspace()?);
    output::emit(ctx, &reply, |entries, color| {
        for entry in entries {
            println!("{} {}", paint("dropped", color, Tone::Dim), entry.table_name);
        }
    })
}
