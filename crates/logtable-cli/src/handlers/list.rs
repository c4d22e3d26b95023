use crate::context::ExecutionContext;
use crate::output::{self, Tone, paint};
use anyhow::Result;
use logtable_index::TableStatus;
use logtable_types::Reply;

pub fn handle(ctx: &ExecutionContext) -> Result<()> {
    let statuses = ctx.workspace()?.cleanup().list()?;
    let msg = format!("{} sessions", statuses.len());
    output::emit(ctx, &Reply::ok(statuses, msg), |statuses, color| {
        print_statuses(statuses, color)
    })
}

fn print_statuses(statuses: &[TableStatus], color: bool) {
    for status in statuses {
        let created = status.entry.created_at.as_deref().unwrap_or("-");
        let rows = match status.rows {
            Some(rows) => format!("{} rows", rows),
            None => paint("missing", color, Tone::Bad),
        };
        println!(
            "{}  {}  {}",
            paint(&status.entry.table_name, color, Tone::Accent),
            paint(created, color, Tone::Dim),
            rows
        );
    }
}
