use std::sync::Arc;
use tracing::{info, warn};

/// User-facing toast surface.
pub trait Notifier: Send + Sync {
    fn success(&self, text: &str);
    fn error(&self, text: &str, title: &str);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn success(&self, text: &str) {
        (**self).success(text)
    }

    fn error(&self, text: &str, title: &str) {
        (**self).error(text, title)
    }
}

/// Reports notifications as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, text: &str) {
        info!(target: "notify", "{text}");
    }

    fn error(&self, text: &str, title: &str) {
        warn!(target: "notify", title, "{text}");
    }
}
