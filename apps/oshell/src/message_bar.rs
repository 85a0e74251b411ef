//! Notifications printed to stdout.

use oshell_core::{
    Notification, NotificationConfig, NotificationLevel, Notifier, QueueNotifier, TracingNotifier,
};
use std::time::Duration;
use tokio::task::JoinHandle;

const PRINT_INTERVAL: Duration = Duration::from_millis(100);

/// Queues notifications and logs them; a printer task drains the queue.
#[derive(Clone)]
pub struct MessageBar {
    queue: QueueNotifier,
}

impl MessageBar {
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            queue: QueueNotifier::new(config),
        }
    }

    /// Take the visible notifications off the queue.
    pub fn drain(&self) -> Vec<Notification> {
        let queue = self.queue.queue();
        let mut queue = queue.lock();
        queue.process_auto_dismiss();

        let visible: Vec<Notification> = queue.get_visible().into_iter().cloned().collect();
        for notification in &visible {
            queue.dismiss(notification.id);
        }
        visible
    }

    /// Take every notification at or above the shown level, in batches of
    /// `max_visible`, then drop the hidden rest.
    pub fn drain_all(&self) -> Vec<Notification> {
        let mut all = Vec::new();
        loop {
            let batch = self.drain();
            if batch.is_empty() {
                break;
            }
            all.extend(batch);
        }
        self.queue.queue().lock().dismiss_all();
        all
    }

    /// Print everything visible now.
    pub fn flush(&self) {
        print_all(self.drain());
    }

    /// Print every pending notification. Used at shutdown.
    pub fn flush_all(&self) {
        print_all(self.drain_all());
    }

    /// Print notifications periodically until aborted.
    pub fn spawn_printer(&self) -> JoinHandle<()> {
        let bar = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(PRINT_INTERVAL);
            loop {
                interval.tick().await;
                bar.flush();
            }
        })
    }
}

impl Notifier for MessageBar {
    fn notify(&self, level: NotificationLevel, message: &str) {
        TracingNotifier.notify(level, message);
        self.queue.notify(level, message);
    }
}

fn print_all(notifications: Vec<Notification>) {
    for notification in notifications {
        println!("{}", format_line(&notification));
    }
}

fn format_line(notification: &Notification) -> String {
    let message = notification.message.trim_end_matches(['\r', '\n']);
    match notification.level {
        NotificationLevel::Info => message.replace("\r\n", "\n"),
        level => format!("[{}] {}", level.name(), message.replace("\r\n", "\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_visible() {
        let bar = MessageBar::new(NotificationConfig::default());
        bar.info("border = 1\r\n");
        bar.error("help: unknown command x");

        let drained = bar.drain();
        assert_eq!(drained.len(), 2);
        assert!(bar.drain().is_empty());
    }

    #[test]
    fn test_drain_all_takes_more_than_max_visible() {
        let config = NotificationConfig::default();
        let max_visible = config.max_visible;
        let bar = MessageBar::new(config);
        for i in 0..max_visible * 2 {
            bar.info(&format!("v{} = <undefined>\r\n", i));
        }
        bar.debug("hidden");

        let drained = bar.drain_all();
        assert_eq!(drained.len(), max_visible * 2);
        let mut messages: Vec<String> = drained.into_iter().map(|n| n.message).collect();
        messages.sort();
        assert_eq!(messages[0], "v0 = <undefined>\r\n");
        assert_eq!(bar.queue.queue().lock().count(), 0);
    }

    #[test]
    fn test_format_line() {
        let info = Notification::new(NotificationLevel::Info, "a = 1\r\nb = 2\r\n");
        assert_eq!(format_line(&info), "a = 1\nb = 2");

        let err = Notification::new(NotificationLevel::Error, "boom");
        assert_eq!(format_line(&err), "[error] boom");
    }
}
