use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Info => "ℹ️",
            Severity::Success => "✅",
            Severity::Warning => "⚠️",
            Severity::Error => "❌",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub generation: u64,
}

/// A single notification slot. Each `show` replaces whatever is displayed;
/// a hide timer only clears the slot if no newer notification arrived since.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    current: Option<Notification>,
    generation: u64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Displays `message` and returns the generation the caller should pass
    /// to [`NotificationCenter::expire`] once the TTL elapses.
    pub fn show(&mut self, message: impl Into<String>, severity: Severity) -> u64 {
        self.generation += 1;
        let message = message.into();
        log::debug!("notify [{}] {}", severity, message);
        self.current = Some(Notification {
            message,
            severity,
            generation: self.generation,
        });
        self.generation
    }

    /// Hides the notification if it is still the one shown at `generation`.
    pub fn expire(&mut self, generation: u64) -> bool {
        match &self.current {
            Some(n) if n.generation == generation => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}
