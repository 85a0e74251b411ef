//! Notification sink and message-bar queue.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Unique notification ID.
pub type NotificationId = u64;

/// A message for the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique ID.
    pub id: NotificationId,
    /// Notification level.
    pub level: NotificationLevel,
    /// Message content.
    pub message: String,
    /// Timestamp.
    pub timestamp: DateTime<Utc>,
    /// Priority (higher = stays visible longer).
    pub priority: u8,
}

impl Notification {
    /// Create a new notification.
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: 0, // Set by queue
            level,
            message: message.into(),
            timestamp: Utc::now(),
            priority: level.default_priority(),
        }
    }
}

/// Notification level/severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    /// Diagnostic detail.
    Debug,
    /// Informational.
    Info,
    /// Warning.
    Warning,
    /// Error.
    Error,
}

impl NotificationLevel {
    /// Get default priority for this level.
    pub fn default_priority(&self) -> u8 {
        match self {
            Self::Debug => 0,
            Self::Info => 1,
            Self::Warning => 3,
            Self::Error => 4,
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// One-way text reporting to the user.
pub trait Notifier: Send + Sync {
    /// Deliver a message at `level`.
    fn notify(&self, level: NotificationLevel, message: &str);

    fn debug(&self, message: &str) {
        self.notify(NotificationLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.notify(NotificationLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.notify(NotificationLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationLevel::Error, message);
    }
}

/// Forwards notifications to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Debug => debug!(target: "oshell::notify", "{}", message),
            NotificationLevel::Info => info!(target: "oshell::notify", "{}", message),
            NotificationLevel::Warning => warn!(target: "oshell::notify", "{}", message),
            NotificationLevel::Error => error!(target: "oshell::notify", "{}", message),
        }
    }
}

/// Stores notifications in a shared [`NotificationQueue`] for the message bar.
#[derive(Clone, Default)]
pub struct QueueNotifier {
    queue: Arc<Mutex<NotificationQueue>>,
}

impl QueueNotifier {
    /// Create a notifier over a new queue.
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            queue: Arc::new(Mutex::new(NotificationQueue::new(config))),
        }
    }

    /// Shared handle to the underlying queue.
    pub fn queue(&self) -> Arc<Mutex<NotificationQueue>> {
        Arc::clone(&self.queue)
    }
}

impl Notifier for QueueNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.queue.lock().push(Notification::new(level, message));
    }
}

/// Configuration for notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    /// Minimum level to display.
    #[serde(default = "default_show_level")]
    pub show_level: NotificationLevel,
    /// Maximum notifications in the message bar.
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
    /// Maximum notifications in history.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    /// Auto-dismiss times by level name (0 = never).
    #[serde(default = "default_auto_dismiss")]
    pub auto_dismiss_secs: HashMap<String, u64>,
}

fn default_show_level() -> NotificationLevel {
    NotificationLevel::Info
}

fn default_max_visible() -> usize {
    3
}

fn default_max_history() -> usize {
    100
}

fn default_auto_dismiss() -> HashMap<String, u64> {
    let mut auto_dismiss = HashMap::new();
    auto_dismiss.insert("debug".to_string(), 2);
    auto_dismiss.insert("info".to_string(), 5);
    auto_dismiss.insert("warning".to_string(), 10);
    auto_dismiss.insert("error".to_string(), 0);
    auto_dismiss
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            show_level: default_show_level(),
            max_visible: default_max_visible(),
            max_history: default_max_history(),
            auto_dismiss_secs: default_auto_dismiss(),
        }
    }
}

/// Queue of notifications, highest priority first.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    notifications: VecDeque<Notification>,
    config: NotificationConfig,
    next_id: NotificationId,
}

impl NotificationQueue {
    /// Create a new notification queue.
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            notifications: VecDeque::new(),
            config,
            next_id: 1,
        }
    }

    /// Push a notification.
    pub fn push(&mut self, mut notif: Notification) {
        notif.id = self.next_id.max(1);
        self.next_id = notif.id + 1;

        // Insert by priority (higher priority first)
        let pos = self
            .notifications
            .iter()
            .position(|n| n.priority < notif.priority)
            .unwrap_or(self.notifications.len());

        self.notifications.insert(pos, notif);

        while self.notifications.len() > self.config.max_history {
            self.notifications.pop_back();
        }
    }

    /// Dismiss a notification.
    pub fn dismiss(&mut self, id: NotificationId) {
        self.notifications.retain(|n| n.id != id);
    }

    /// Dismiss all notifications.
    pub fn dismiss_all(&mut self) {
        self.notifications.clear();
    }

    /// Get visible notifications (priority-sorted).
    pub fn get_visible(&self) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| n.level >= self.config.show_level)
            .take(self.config.max_visible)
            .collect()
    }

    /// Get notification count.
    pub fn count(&self) -> usize {
        self.notifications.len()
    }

    /// Check if there are notifications.
    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    /// Get the highest-priority notification.
    pub fn latest(&self) -> Option<&Notification> {
        self.notifications.front()
    }

    /// Drop notifications older than their level's auto-dismiss time.
    pub fn process_auto_dismiss(&mut self) {
        let now = Utc::now();
        let config = &self.config;

        self.notifications.retain(|n| {
            let dismiss_secs = config
                .auto_dismiss_secs
                .get(n.level.name())
                .copied()
                .unwrap_or(0);

            if dismiss_secs == 0 {
                return true;
            }

            let age = now.signed_duration_since(n.timestamp);
            age.num_seconds() < dismiss_secs as i64
        });
    }
}
