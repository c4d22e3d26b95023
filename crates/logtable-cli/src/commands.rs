use super::args::{Cli, Commands};
use super::context::ExecutionContext;
use super::handlers;
use super::logging;
use anyhow::Result;
use logtable_runtime::resolve_workspace_path;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let data_dir = resolve_workspace_path(cli.data_dir.as_deref())?;
    tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");
    let ctx = ExecutionContext::new(data_dir, cli.format);

    match cli.command {
        Commands::Ingest(args) => handlers::ingest::handle(&ctx, args),
        Commands::Query(args) => handlers::query::handle(&ctx, args),
        Commands::List => handlers::list::handle(&ctx),
        Commands::Delete { table } => handlers::delete::handle(&ctx, &table),
        Commands::Clear => handlers::clear::handle(&ctx),
        Commands::Prune => handlers::prune::handle(&ctx),
        Commands::Vacuum => handlers::vacuum::handle(&ctx),
        Commands::Config { command } => handlers::config::handle(&ctx, command),
    }
}
