use crate::context::ExecutionContext;
use crate::output::{self, Tone, paint};
use anyhow::Result;
use logtable_types::Reply;

pub fn handle(ctx: &ExecutionContext) -> Result<()> {
    let pruned = ctx.workspace()?.cleanup().prune()?;
    let msg = match pruned.len() {
        0 => "Registry is consistent".to_string(),
        n => format!("Removed {} orphaned registry entries", n),
    };

    output::emit(ctx, &Reply::ok(pruned, msg), |entries, color| {
        for entry in entries {
            println!("{} {}", paint("pruned", color, Tone::Warn), entry.table_name);
        }
    })
}
