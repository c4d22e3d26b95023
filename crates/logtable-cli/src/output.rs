use anyhow::Result;
use logtable_types::Reply;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::context::ExecutionContext;

/// Print `reply` in the selected format and turn a failed reply into an
/// error, so the process exits non-zero.
///
/// `plain` renders `data` for humans. The message follows it on success; on
/// failure it becomes the error text.
pub fn emit<T, F>(ctx: &ExecutionContext, reply: &Reply<T>, plain: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T, bool),
{
    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(reply)?);
    } else {
        let color = ctx.use_color();
        plain(&reply.data, color);
        if reply.ok && !reply.msg.is_empty() {
            println!("{}", paint(&reply.msg, color, Tone::Ok));
        }
    }

    if !reply.ok {
        anyhow::bail!("{}", reply.msg);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub enum Tone {
    Ok,
    Warn,
    Bad,
    Dim,
    Accent,
}

pub fn paint(text: &str, color: bool, tone: Tone) -> String {
    if !color {
        return text.to_string();
    }
    match tone {
        Tone::Ok => text.green().to_string(),
        Tone::Warn => text.yellow().to_string(),
        Tone::Bad => text.red().to_string(),
        Tone::Dim => text.dimmed().to_string(),
        Tone::Accent => text.cyan().to_string(),
    }
}
