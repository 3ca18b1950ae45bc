//! Scripted player loop over the garden core.
//!
//! The host owns the frame loop: it feeds a fixed real-time delta to the
//! clock, forwards clock notifications to the registry, and tends the garden
//! once per in-game hour.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver};
use serde::Serialize;
use tracing::{debug, info, warn};
use verdant_common::PlotId;
use verdant_garden::{
    Clock, GardenConfig, GardenEvent, GardenRegistry, GardenSnapshot, GardenStats, Interaction,
    Inventory, Notification, PlantCatalog, TimeEvent,
};

/// Real seconds per simulated frame.
const FRAME_DT: f32 = 1.0 / 60.0;
/// Distinct item types the player can carry.
const INVENTORY_SLOTS: u32 = 32;
/// Frames the seed menu stays open before the player picks.
const SEED_MENU_FRAMES: u32 = 45;

/// Summary printed when the run ends.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Final date
    pub date: String,
    /// Final time of day
    pub time: String,
    /// In-game hours simulated
    pub hours: u32,
    /// Frames executed
    pub frames: u64,
    /// Frames spent with the seed menu open
    pub menu_frames: u64,
    /// Final garden statistics
    pub stats: GardenStats,
    /// Harvested items by ID
    pub inventory: BTreeMap<String, u32>,
    /// Harvests performed
    pub harvests: u32,
    /// Notifications shown to the player
    pub notifications: Vec<String>,
    /// Garden events observed
    pub events: usize,
    /// Size of the saved clock blob in bytes
    pub clock_blob_bytes: usize,
    /// Size of the saved garden blob in bytes
    pub garden_blob_bytes: usize,
}

/// Plots waiting on the open seed menu.
#[derive(Debug)]
struct SeedMenu {
    plots: Vec<PlotId>,
    frames_left: u32,
}

/// A garden, its clock, and a player's inventory.
pub struct Simulation {
    config: GardenConfig,
    catalog: Arc<PlantCatalog>,
    clock: Clock,
    registry: GardenRegistry,
    inventory: Inventory,
    notifications: Receiver<Notification>,
    /// Index into the catalog for the next seed to plant.
    next_seed: usize,
    menu: Option<SeedMenu>,
    menu_frames: u64,
    harvests: u32,
    events_seen: usize,
}

impl Simulation {
    /// Build a simulation from configuration.
    pub fn new(config: GardenConfig, catalog: Arc<PlantCatalog>) -> Self {
        let clock = Clock::from_config(&config.clock);
        let mut registry = GardenRegistry::from_config(Arc::clone(&catalog), &config.garden);
        let (tx, notifications) = unbounded();
        registry.set_notification_sink(tx);

        Self {
            config,
            catalog,
            clock,
            registry,
            inventory: Inventory::new(INVENTORY_SLOTS),
            notifications,
            next_seed: 0,
            menu: None,
            menu_frames: 0,
            harvests: 0,
            events_seen: 0,
        }
    }

    /// Run for `hours` in-game hours and report the outcome.
    pub fn run(&mut self, hours: u32) -> Result<Report> {
        let start = self.clock.now();
        let target = f64::from(hours);
        let mut frames = 0u64;

        info!(
            "Simulating {hours} h on {} plots from {} {}",
            self.registry.plots().len(),
            self.clock.date_string(),
            self.clock.time_string()
        );

        self.tend();
        while self.clock.hours_since(start) < target {
            let events = self.clock.update(FRAME_DT);
            frames += 1;
            self.step_menu();
            if events.is_empty() {
                continue;
            }

            for event in &events {
                if matches!(event, TimeEvent::DayChanged(_)) {
                    info!("{}", event.description());
                }
            }
            self.registry.handle_time_events(&events);
            self.tend();
        }
        self.close_menu();

        let clock_blob = self.clock.save()?;
        let garden_blob = self.registry.snapshot().to_bytes()?;
        self.verify_blobs(&clock_blob, &garden_blob)?;

        Ok(Report {
            date: self.clock.date_string(),
            time: self.clock.time_string(),
            hours,
            frames,
            menu_frames: self.menu_frames,
            stats: self.registry.stats(),
            inventory: self
                .inventory
                .iter()
                .map(|(id, count)| (id.to_string(), count))
                .collect(),
            harvests: self.harvests,
            notifications: self.notifications.try_iter().map(|n| n.message).collect(),
            events: self.events_seen,
            clock_blob_bytes: clock_blob.len(),
            garden_blob_bytes: garden_blob.len(),
        })
    }

    /// One round of player actions: interact with every plot, then water
    /// anything still thirsty.
    fn tend(&mut self) {
        let now = self.clock.now();
        let ids: Vec<PlotId> = self.registry.plots().iter().map(|p| p.id()).collect();

        for id in ids {
            match self.registry.interact(id, now, &mut self.inventory) {
                Ok(Interaction::Harvested(result)) => {
                    self.harvests += 1;
                    debug!("{id}: harvested {}x {}", result.quantity, result.item);
                },
                Ok(Interaction::ChooseSeed) => self.open_menu(id),
                Ok(Interaction::Watered | Interaction::Nothing) => {},
                Err(e) => warn!("{id}: {e}"),
            }
        }
        self.registry.water_all_needing(now);
        self.observe_events();
    }

    fn observe_events(&mut self) {
        for event in self.registry.drain_events() {
            if let GardenEvent::StatsChanged(stats) = event {
                debug!(
                    "Plants: {}, ready: {}, thirsty: {}",
                    stats.total, stats.harvestable, stats.needs_watering
                );
            }
            self.events_seen += 1;
        }
    }

    /// Queue a plot for seed selection, opening the menu if needed. The
    /// clock stops while the menu is open when configured to.
    fn open_menu(&mut self, plot: PlotId) {
        match &mut self.menu {
            Some(menu) => {
                if !menu.plots.contains(&plot) {
                    menu.plots.push(plot);
                }
            },
            None => {
                if self.config.clock.pause_when_ui_open {
                    self.clock.set_paused(true);
                }
                debug!("Seed menu opened for {plot}");
                self.menu = Some(SeedMenu {
                    plots: vec![plot],
                    frames_left: SEED_MENU_FRAMES,
                });
            },
        }
    }

    /// Count down one frame of the open menu.
    fn step_menu(&mut self) {
        let Some(menu) = self.menu.as_mut() else {
            return;
        };
        self.menu_frames += 1;
        menu.frames_left = menu.frames_left.saturating_sub(1);
        if menu.frames_left == 0 {
            self.close_menu();
        }
    }

    /// Plant the chosen seeds and resume the clock.
    fn close_menu(&mut self) {
        let Some(menu) = self.menu.take() else {
            return;
        };
        let now = self.clock.now();
        for plot in menu.plots {
            let Some(plant_id) = self
                .catalog
                .all()
                .nth(self.next_seed % self.catalog.len().max(1))
                .map(|d| d.id.clone())
            else {
                break;
            };
            self.next_seed += 1;
            if let Err(e) = self.registry.plant(plot, plant_id.as_str(), now) {
                warn!("{plot}: {e}");
            }
        }
        self.clock.set_paused(false);
        self.observe_events();
    }

    /// Confirm the saved state restores to what was saved.
    fn verify_blobs(&self, clock_blob: &[u8], garden_blob: &[u8]) -> Result<()> {
        let mut clock = Clock::from_config(&self.config.clock);
        anyhow::ensure!(
            clock.restore(clock_blob).is_some() && clock.state() == self.clock.state(),
            "clock state did not survive save/restore"
        );

        let snapshot = GardenSnapshot::from_bytes(garden_blob)?;
        let mut registry =
            GardenRegistry::from_config(Arc::clone(&self.catalog), &self.config.garden);
        registry.restore(&snapshot);
        anyhow::ensure!(
            registry.snapshot() == self.registry.snapshot(),
            "garden state did not survive save/restore"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation(pause_when_ui_open: bool) -> Simulation {
        let mut config = GardenConfig::default();
        config.clock.pause_when_ui_open = pause_when_ui_open;
        config.garden.plot_count = 2;
        Simulation::new(config, Arc::new(PlantCatalog::with_defaults()))
    }

    #[test]
    fn test_seed_menu_holds_clock_across_frames() {
        let mut sim = simulation(true);
        let start = sim.clock.now();

        sim.tend();
        assert!(sim.clock.is_paused());
        assert_eq!(sim.menu.as_ref().map(|m| m.plots.len()), Some(2));

        for _ in 1..SEED_MENU_FRAMES {
            assert!(sim.clock.update(60.0).is_empty());
            sim.step_menu();
        }
        assert!(sim.registry.plots().iter().all(|p| p.is_empty()));
        assert_eq!(sim.clock.now(), start);

        sim.step_menu();
        assert!(sim.menu.is_none());
        assert!(!sim.clock.is_paused());
        assert_eq!(sim.registry.total_plant_count(), 2);
        assert_eq!(sim.menu_frames, u64::from(SEED_MENU_FRAMES));
    }

    #[test]
    fn test_seed_menu_without_pause_keeps_time_running() {
        let mut sim = simulation(false);
        let start = sim.clock.now();

        sim.tend();
        assert!(!sim.clock.is_paused());
        assert!(!sim.clock.update(3600.0).is_empty());
        assert!(sim.clock.now() > start);
    }

    #[test]
    fn test_run_plants_and_reports() {
        let mut sim = simulation(true);
        let report = sim.run(24).expect("run");
        assert!(report.menu_frames >= u64::from(SEED_MENU_FRAMES));
        assert!(report.stats.total > 0);
        assert!(report.frames > report.menu_frames);
    }
}
