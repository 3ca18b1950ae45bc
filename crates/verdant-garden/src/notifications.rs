//! Player-facing notification messages.
//!
//! Notifications are display strings for a UI layer. Whether anybody listens
//! never changes garden behavior.

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

/// Severity used by the UI to style a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// Neutral information.
    Info,
    /// Something went well.
    Success,
    /// An action was refused.
    Warning,
}

/// A human-readable garden notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,
    /// Display text.
    pub message: String,
}

impl Notification {
    /// Create a notification.
    #[must_use]
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A seed was planted.
    #[must_use]
    pub fn planted(plant_name: &str) -> Self {
        Self::new(NotificationKind::Success, format!("Planted {plant_name}"))
    }

    /// A plant was watered.
    #[must_use]
    pub fn watered() -> Self {
        Self::new(
            NotificationKind::Info,
            "Plant watered! Growth speed increased.",
        )
    }

    /// A plot was harvested.
    #[must_use]
    pub fn harvested(plant_name: &str, quantity: u32) -> Self {
        let message = if quantity > 1 {
            format!("Harvested {quantity}x {plant_name}!")
        } else {
            format!("Harvested {plant_name}!")
        };
        Self::new(NotificationKind::Success, message)
    }

    /// A plant reached the harvestable stage.
    #[must_use]
    pub fn ready(plant_name: &str) -> Self {
        Self::new(
            NotificationKind::Success,
            format!("{plant_name} is ready to harvest!"),
        )
    }

    /// A planting attempt was refused.
    #[must_use]
    pub fn cannot_plant() -> Self {
        Self::new(NotificationKind::Warning, "Cannot plant here!")
    }

    /// Result of harvesting every ready plot.
    #[must_use]
    pub fn auto_harvested(total: u32) -> Self {
        Self::new(
            NotificationKind::Success,
            format!("Auto-harvested {total} herbs!"),
        )
    }

    /// Result of watering every thirsty plot.
    #[must_use]
    pub fn watered_many(count: u32) -> Self {
        Self::new(NotificationKind::Info, format!("Watered {count} plants!"))
    }
}

/// Receiver of notifications.
pub trait NotificationSink: Send {
    /// Displays or records a notification.
    fn notify(&mut self, notification: &Notification);
}

impl NotificationSink for Sender<Notification> {
    fn notify(&mut self, notification: &Notification) {
        let _ = self.try_send(notification.clone());
    }
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: &Notification) {
        self.push(notification.clone());
    }
}
