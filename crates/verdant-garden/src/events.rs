//! Garden event bus and observers.
//!
//! Events are delivered two ways: synchronously to registered
//! [`EventHandler`]s, and into a bounded queue that the host drains.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use verdant_common::{ItemId, PlotId};

use crate::garden::GardenStats;
use crate::plants::GrowthStage;

/// Events produced by plots and the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GardenEvent {
    /// A plot's growth stage changed.
    StageChanged {
        /// Plot ID
        plot: PlotId,
        /// New stage
        stage: GrowthStage,
    },
    /// A plot was harvested.
    Harvested {
        /// Plot ID
        plot: PlotId,
        /// Item delivered to the inventory
        item: ItemId,
        /// Quantity delivered
        quantity: u32,
    },
    /// Aggregate statistics were recomputed.
    StatsChanged(GardenStats),
}

/// Event bus for queueing events until the host drains them.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for publishing events
    sender: Sender<GardenEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GardenEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: GardenEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GardenEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Observer notified synchronously of every published event.
pub trait EventHandler: Send + Sync {
    /// Handles an event.
    fn handle(&self, event: &GardenEvent);
}

/// Forwards events into a channel, for hosts that consume them elsewhere.
impl EventHandler for Sender<GardenEvent> {
    fn handle(&self, event: &GardenEvent) {
        let _ = self.try_send(event.clone());
    }
}
