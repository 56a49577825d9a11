use crate::domain::model::ProgressEvent;
use crate::domain::ports::ProgressSink;
use tokio::sync::mpsc::UnboundedSender;

/// Writes the status line and completion fraction to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match &event {
            ProgressEvent::Processing {
                user_id,
                position,
                total,
            } => {
                tracing::info!("🗑️  [{}/{}] Processing user ID: {}", position, total, user_id);
            }
            ProgressEvent::Completed { processed, total } => {
                tracing::debug!(
                    "Progress: {}/{} ({:.0}%)",
                    processed,
                    total,
                    event.fraction() * 100.0
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Forwards events to a receiver owned by the embedding application.
/// A dropped receiver is ignored; progress never affects the run.
impl ProgressSink for UnboundedSender<ProgressEvent> {
    fn report(&self, event: ProgressEvent) {
        let _ = self.send(event);
    }
}
