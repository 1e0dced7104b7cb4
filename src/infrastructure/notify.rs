use crate::domain::ports::Notifier;
use tracing::warn;

/// Surfaces notifications through the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        warn!(notification = message, "User notification");
    }
}
