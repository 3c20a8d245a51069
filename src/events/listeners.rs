//! Built-in event listeners.

use async_trait::async_trait;

use super::{ClientEvent, Listener};

/// Logs every client event using the `log` crate.
///
/// # Example
///
/// ```rust,ignore
/// use skillmart::register_event_listeners;
/// use skillmart::events::listeners::LoggingListener;
///
/// register_event_listeners(|registry| {
///     registry.listen(LoggingListener::new());
/// });
/// ```
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    /// Creates a new logging listener at INFO level.
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    /// Creates a new logging listener at the specified level.
    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &ClientEvent) {
        log::log!(
            target: "skillmart::events",
            self.level,
            "event={} {:?}",
            event.name(),
            event
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_logging_listener_levels() {
        let listener = LoggingListener::new();
        assert_eq!(listener.level, log::Level::Info);

        let listener = LoggingListener::with_level(log::Level::Debug);
        assert_eq!(listener.level, log::Level::Debug);
    }

    #[tokio::test]
    async fn test_handle_does_not_panic() {
        let listener = LoggingListener::default();
        listener
            .handle(&ClientEvent::CartHydrated { at: Utc::now() })
            .await;
    }
}
