//! Inventory sink and a simple inventory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;
use verdant_common::ItemId;

/// Receiver of harvested items.
///
/// Delivery is fire-and-forget: the garden never retries or inspects the
/// outcome.
pub trait InventorySink {
    /// Receives `quantity` units of `item`.
    fn receive(&mut self, item: &ItemId, quantity: u32);
}

/// Inventory error types.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Not enough items
    #[error("Not enough items: need {needed}, have {have}")]
    NotEnough {
        /// Amount needed
        needed: u32,
        /// Amount available
        have: u32,
    },
    /// Inventory full
    #[error("Inventory full: capacity {capacity}")]
    Full {
        /// Inventory capacity
        capacity: u32,
    },
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// An inventory container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Items and their quantities
    items: HashMap<ItemId, u32>,
    /// Maximum unique item types
    capacity: u32,
}

impl Inventory {
    /// Creates a new inventory with the given capacity.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        Self {
            items: HashMap::new(),
            capacity,
        }
    }

    /// Returns the number of unique item types.
    #[must_use]
    pub fn slot_count(&self) -> u32 {
        self.items.len() as u32
    }

    /// Returns the capacity.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the count of a specific item.
    #[must_use]
    pub fn count(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Checks if the inventory contains at least the given amount.
    #[must_use]
    pub fn has(&self, item: &str, amount: u32) -> bool {
        self.count(item) >= amount
    }

    /// Adds items to the inventory.
    pub fn add(&mut self, item: &ItemId, amount: u32) -> InventoryResult<()> {
        if amount == 0 {
            return Ok(());
        }
        let current = self.items.get(item).copied().unwrap_or(0);
        if current == 0 && self.slot_count() >= self.capacity {
            return Err(InventoryError::Full {
                capacity: self.capacity,
            });
        }
        self.items.insert(item.clone(), current.saturating_add(amount));
        Ok(())
    }

    /// Removes items from the inventory.
    pub fn remove(&mut self, item: &ItemId, amount: u32) -> InventoryResult<()> {
        let current = self.items.get(item).copied().unwrap_or(0);
        if current < amount {
            return Err(InventoryError::NotEnough {
                needed: amount,
                have: current,
            });
        }
        if current == amount {
            self.items.remove(item);
        } else {
            self.items.insert(item.clone(), current - amount);
        }
        Ok(())
    }

    /// Returns an iterator over all items.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u32)> + '_ {
        self.items.iter().map(|(id, &count)| (id, count))
    }
}

impl InventorySink for Inventory {
    fn receive(&mut self, item: &ItemId, quantity: u32) {
        if let Err(e) = self.add(item, quantity) {
            warn!("Dropped {quantity}x {item}: {e}");
        }
    }
}

/// Records every delivery, one entry per call.
impl InventorySink for Vec<(ItemId, u32)> {
    fn receive(&mut self, item: &ItemId, quantity: u32) {
        self.push((item.clone(), quantity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_add_remove() {
        let mut inv = Inventory::new(10);
        let item = ItemId::from("basil_leaf");

        assert!(inv.add(&item, 5).is_ok());
        assert_eq!(inv.count("basil_leaf"), 5);

        assert!(inv.remove(&item, 3).is_ok());
        assert_eq!(inv.count("basil_leaf"), 2);
        assert!(inv.has("basil_leaf", 2));

        assert!(matches!(
            inv.remove(&item, 3),
            Err(InventoryError::NotEnough { needed: 3, have: 2 })
        ));
    }

    #[test]
    fn test_inventory_capacity() {
        let mut inv = Inventory::new(1);
        assert!(inv.add(&ItemId::from("a"), 1).is_ok());
        assert!(inv.add(&ItemId::from("a"), 1).is_ok());
        assert!(matches!(
            inv.add(&ItemId::from("b"), 1),
            Err(InventoryError::Full { capacity: 1 })
        ));
    }

    #[test]
    fn test_sink_drops_overflow() {
        let mut inv = Inventory::new(1);
        inv.receive(&ItemId::from("a"), 2);
        inv.receive(&ItemId::from("b"), 4);
        assert_eq!(inv.count("a"), 2);
        assert_eq!(inv.count("b"), 0);
        assert_eq!(inv.iter().count(), 1);
    }
}
