use logtable_types::ProgressEvent;
use std::sync::mpsc::{self, Receiver, SyncSender};

/// Sending half of a bounded progress channel.
///
/// `send` blocks while the buffer is full, which slows ingestion down to the
/// consumer's pace. Once the receiver is gone, events are silently dropped.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: SyncSender<ProgressEvent>,
}

impl ProgressSender {
    pub fn send(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("progress receiver dropped; event discarded");
        }
    }
}

/// Bounded channel carrying one event per loaded chunk.
pub fn progress_channel(capacity: usize) -> (ProgressSender, Receiver<ProgressEvent>) {
    let (tx, rx) = mpsc::sync_channel(capacity.max(1));
    (ProgressSender { tx }, rx)
}
