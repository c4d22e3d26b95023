use crate::args::ConfigCommand;
use crate::context::ExecutionContext;
use crate::output;
use anyhow::{Context, Result};
use logtable_runtime::config::Config;
use logtable_types::Reply;

pub fn handle(ctx: &ExecutionContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Init { force } => init(ctx, force),
    }
}

fn show(ctx: &ExecutionContext) -> Result<()> {
    let config = ctx.config()?;
    if ctx.is_json() {
        let msg = ctx.config_path().display().to_string();
        return output::emit(ctx, &Reply::ok(config, msg), |_, _| {});
    }

    let rendered = toml::to_string_pretty(config).context("rendering config")?;
    println!("# {}", ctx.config_path().display());
    print!("{}", rendered);
    Ok(())
}

fn init(ctx: &ExecutionContext, force: bool) -> Result<()> {
    let path = ctx.config_path();
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(&path)?;
    let msg = format!("Wrote {}", path.display());
    output::emit(ctx, &Reply::ok(path.display().to_string(), msg), |_, _| {})
}
