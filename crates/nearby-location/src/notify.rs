use nearby_core::NoticeLevel;

/// Fire-and-forget notification surface (toasts in a UI host).
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Headless notifier that turns notices into log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success => tracing::info!(notice = message, "location notice"),
            NoticeLevel::Warning => tracing::warn!(notice = message, "location notice"),
            NoticeLevel::Error => tracing::error!(notice = message, "location notice"),
        }
    }
}
