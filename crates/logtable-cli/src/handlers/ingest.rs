use crate::args::IngestArgs;
use crate::context::ExecutionContext;
use crate::output::{self, Tone, paint};
use anyhow::{Context, Result, anyhow};
use is_terminal::IsTerminal;
use logtable_engine::ParseStrategy;
use logtable_index::Atomicity;
use logtable_runtime::{CancelToken, IngestStatus, IngestSummary, progress_channel};
use logtable_types::Reply;
use std::io::Write;
use std::thread;

pub fn handle(ctx: &ExecutionContext, args: IngestArgs) -> Result<()> {
    let mut config = ctx.config()?.clone();
    if let Some(chunk_size) = args.chunk_size {
        config.ingest.chunk_size = chunk_size;
    }
    if let Some(batch_size) = args.batch_size {
        config.ingest.batch_size = batch_size;
    }
    if args.atomic_chunks {
        config.ingest.atomicity = Atomicity::PerChunk;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.ingest.timeout_secs = Some(timeout_secs);
    }
    if let Some(path) = &args.strategy {
        let strategy = ParseStrategy::load(path)?;
        config.parser = strategy.into_config(config.parser.time_basis);
    }

    let workspace = ctx.workspace_with(config)?;
    let ingest_config = &workspace.config().ingest;

    let cancel = match ingest_config.timeout() {
        Some(timeout) => CancelToken::with_timeout(timeout),
        None => CancelToken::new(),
    };
    let on_interrupt = cancel.clone();
    ctrlc::set_handler(move || {
        tracing::info!("interrupt received, stopping at the next chunk boundary");
        on_interrupt.cancel();
    })
    .context("installing Ctrl-C handler")?;

    let show_progress = !ctx.is_json() && std::io::stderr().is_terminal();
    let (tx, rx) = progress_channel(ingest_config.progress_capacity);
    let printer = thread::spawn(move || {
        let mut stderr = std::io::stderr();
        let mut events = 0u64;
        for event in rx {
            events += 1;
            if show_progress {
                let _ = write!(stderr, "\r{} {:>3}%", event.table_name, event.progress);
                let _ = stderr.flush();
            }
        }
        if show_progress {
            let _ = writeln!(stderr);
        }
        tracing::debug!(events, "progress printer finished");
    });

    let result = workspace
        .ingest()
        .run(&args.file, &cancel, |event| tx.send(event));
    drop(tx);
    printer
        .join()
        .map_err(|_| anyhow!("progress printer panicked"))?;

    let summary = result?;
    let msg = summary.message();
    let reply = if summary.is_partial() {
        Reply::failed(summary, msg)
    } else {
        Reply::ok(summary, msg)
    };

    output::emit(ctx, &reply, print_summary)
}

fn print_summary(summary: &IngestSummary, color: bool) {
    println!(
        "{} {}",
        paint("table:", color, Tone::Dim),
        paint(summary.session.table_name.as_str(), color, Tone::Accent)
    );
    println!(
        "{} {} lines in {} chunks",
        paint("read:", color, Tone::Dim),
        summary.processed_lines,
        summary.chunks
    );
    if summary.unmatched_lines > 0 {
        println!(
            "{} {} lines before the first record were skipped",
            paint("note:", color, Tone::Warn),
            summary.unmatched_lines
        );
    }
    if summary.status != IngestStatus::Completed && summary.discarded_carry_over {
        println!(
            "{} the record open at the stop point was discarded",
            paint("note:", color, Tone::Warn)
        );
    }
    for error in &summary.errors {
        println!("{} {}", paint("failed:", color, Tone::Bad), error);
    }
}
