use crate::args::QueryArgs;
use crate::context::ExecutionContext;
use crate::output::{self, Tone, paint};
use anyhow::Result;
use logtable_runtime::api::{self, QueryRequest};
use logtable_types::{LogRow, QueryFilter};

pub fn handle(ctx: &ExecutionContext, args: QueryArgs) -> Result<()> {
    let filter = QueryFilter {
        start_time: args.start,
        end_time: args.end,
        search_text: args.search,
        sort: args.sort.map(Into::into),
        limit: args.limit,
        offset: args.offset,
    };

    let reply = api::query_log(
        ctx.workspace()?,
        QueryRequest {
            table_name: args.table,
            filter,
        },
    );

    output::emit(ctx, &reply, |rows, color| print_rows(rows, color))
}

fn print_rows(rows: &[LogRow], color: bool) {
    for row in rows {
        println!(
            "{}  {}",
            paint(&row.timestamp, color, Tone::Accent),
            row.content
        );
    }
}
