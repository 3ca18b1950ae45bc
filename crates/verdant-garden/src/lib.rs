//! # Verdant Garden
//!
//! Plant growth and garden plots for Verdant.
//!
//! This crate provides the garden core, driven entirely by the host's loop:
//! - In-game clock with hour/day notifications and save/restore
//! - Plant definitions and a read-only plant catalog
//! - Growth stage calculation
//! - Plot state machine (plant, water, harvest)
//! - Garden registry with batch actions and aggregate statistics
//! - Event bus, observers, and player-facing notifications
//! - Inventory sink for harvested items
//! - Blob framing and garden snapshots
//! - TOML configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod events;
pub mod garden;
pub mod growth;
pub mod inventory;
pub mod notifications;
pub mod plants;
pub mod plot;
pub mod save;
pub mod time;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::events::*;
    pub use crate::garden::*;
    pub use crate::growth::*;
    pub use crate::inventory::*;
    pub use crate::notifications::*;
    pub use crate::plants::*;
    pub use crate::plot::*;
    pub use crate::save::*;
    pub use crate::time::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use verdant_common::PlotId;

    #[test]
    fn test_clock_drives_registry() {
        let catalog = Arc::new(PlantCatalog::with_defaults());
        let mut registry = GardenRegistry::with_plot_count(catalog, 2);
        let mut clock = Clock::default();

        registry
            .plant(PlotId::new(0), "basil", clock.now())
            .expect("plant");

        // Basil takes 6 in-game hours unwatered.
        let events = clock.advance(6.0 * 60.0, 1.0);
        registry.handle_time_events(&events);

        assert!(registry.plot(PlotId::new(0)).is_some_and(PlotState::can_harvest));
        assert_eq!(registry.stats().harvestable, 1);
    }
}
