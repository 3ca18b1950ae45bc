//! Garden registry.
//!
//! The registry owns every plot, routes catalog lookups, runs batch actions
//! and keeps aggregate statistics current. Each mutation publishes its plot
//! events first and the refreshed statistics last, so observers never see
//! counts that lag behind the events they just received.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use verdant_common::PlotId;

use crate::config::GardenSettings;
use crate::events::{EventBus, EventHandler, GardenEvent};
use crate::inventory::InventorySink;
use crate::notifications::{Notification, NotificationSink};
use crate::plants::{GrowthStage, PlantCatalog};
use crate::plot::{HarvestResult, PlotAction, PlotError, PlotState};
use crate::save::GardenSnapshot;
use crate::time::{GameTimestamp, TimeEvent};

/// Aggregate plot counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenStats {
    /// Occupied plots.
    pub total: u32,
    /// Plots ready to harvest.
    pub harvestable: u32,
    /// Occupied, unwatered plots whose plant requires watering.
    pub needs_watering: u32,
}

/// Errors from registry calls addressed by plot ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GardenError {
    /// No plot with this ID.
    #[error("Unknown plot: {0}")]
    UnknownPlot(PlotId),

    /// The plot refused the action.
    #[error(transparent)]
    Plot(#[from] PlotError),
}

/// Result type for registry calls.
pub type GardenResult<T> = Result<T, GardenError>;

/// Outcome of [`GardenRegistry::interact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// The ready plant was harvested.
    Harvested(HarvestResult),
    /// The plant was watered.
    Watered,
    /// The plot is empty; the host should offer a seed selection.
    ChooseSeed,
    /// Nothing to do right now.
    Nothing,
}

/// Owner of all plots in a garden.
pub struct GardenRegistry {
    catalog: Arc<PlantCatalog>,
    plots: Vec<PlotState>,
    /// Source of harvest quantities.
    rng: fastrand::Rng,
    bus: EventBus,
    handlers: Vec<Box<dyn EventHandler>>,
    notifier: Option<Box<dyn NotificationSink>>,
    /// Last published statistics.
    stats: GardenStats,
}

impl fmt::Debug for GardenRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GardenRegistry")
            .field("plots", &self.plots.len())
            .field("plants", &self.catalog.len())
            .field("handlers", &self.handlers.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl GardenRegistry {
    /// Create a registry with one empty plot per ID. Duplicate IDs are
    /// skipped with a warning.
    pub fn new(catalog: Arc<PlantCatalog>, plot_ids: impl IntoIterator<Item = PlotId>) -> Self {
        let mut plots: Vec<PlotState> = Vec::new();
        for id in plot_ids {
            if plots.iter().any(|p| p.id() == id) {
                warn!("Duplicate plot ID {id} skipped");
                continue;
            }
            plots.push(PlotState::new(id));
        }
        info!("Found {} garden plots", plots.len());

        Self {
            catalog,
            plots,
            rng: fastrand::Rng::new(),
            bus: EventBus::default(),
            handlers: Vec::new(),
            notifier: None,
            stats: GardenStats::default(),
        }
    }

    /// Create a registry with plots `0..count`.
    pub fn with_plot_count(catalog: Arc<PlantCatalog>, count: u32) -> Self {
        Self::new(catalog, (0..count).map(PlotId::new))
    }

    /// Create a registry from configuration.
    pub fn from_config(catalog: Arc<PlantCatalog>, settings: &GardenSettings) -> Self {
        let mut registry = Self::with_plot_count(catalog, settings.plot_count);
        registry.bus = EventBus::new(settings.event_capacity);
        if let Some(seed) = settings.rng_seed {
            registry.rng = fastrand::Rng::with_seed(seed);
        }
        registry
    }

    /// Replace the harvest random source.
    #[must_use]
    pub fn with_rng(mut self, rng: fastrand::Rng) -> Self {
        self.rng = rng;
        self
    }

    /// Route player-facing notifications to `sink`.
    pub fn set_notification_sink(&mut self, sink: impl NotificationSink + 'static) {
        self.notifier = Some(Box::new(sink));
    }

    /// Stop sending notifications.
    pub fn clear_notification_sink(&mut self) {
        self.notifier = None;
    }

    /// Register an observer called synchronously for every event.
    pub fn subscribe(&mut self, handler: impl EventHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Drain the queued events.
    pub fn drain_events(&self) -> Vec<GardenEvent> {
        self.bus.drain()
    }

    /// The drainable event queue.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// The plant catalog.
    #[must_use]
    pub fn catalog(&self) -> &PlantCatalog {
        &self.catalog
    }

    /// Last published statistics.
    #[must_use]
    pub fn stats(&self) -> GardenStats {
        self.stats
    }

    /// Statistics computed from the current plot states.
    #[must_use]
    pub fn compute_stats(&self) -> GardenStats {
        let mut stats = GardenStats::default();
        for plot in &self.plots {
            if plot.is_empty() {
                continue;
            }
            stats.total += 1;
            if plot.can_harvest() {
                stats.harvestable += 1;
            }
            if plot.needs_watering() {
                stats.needs_watering += 1;
            }
        }
        stats
    }

    /// Look up a plot.
    #[must_use]
    pub fn plot(&self, id: PlotId) -> Option<&PlotState> {
        self.plots.iter().find(|p| p.id() == id)
    }

    /// All plots in registration order.
    #[must_use]
    pub fn plots(&self) -> &[PlotState] {
        &self.plots
    }

    /// Plots ready to harvest.
    pub fn harvestable_plots(&self) -> impl Iterator<Item = &PlotState> {
        self.plots.iter().filter(|p| p.can_harvest())
    }

    /// Plots whose plant wants water.
    pub fn plots_needing_water(&self) -> impl Iterator<Item = &PlotState> {
        self.plots.iter().filter(|p| p.needs_watering())
    }

    /// Number of occupied plots.
    #[must_use]
    pub fn total_plant_count(&self) -> usize {
        self.plots.iter().filter(|p| !p.is_empty()).count()
    }

    /// Plant a seed in a plot.
    ///
    /// A refused planting sends a "Cannot plant here!" notification.
    pub fn plant(&mut self, plot_id: PlotId, plant_id: &str, now: GameTimestamp) -> GardenResult<()> {
        let index = self.index_of(plot_id)?;
        if let Err(e) = self.plots[index].plant_seed(plant_id, &self.catalog, now) {
            debug!("Cannot plant {plant_id} in {plot_id}: {e}");
            self.notify(&Notification::cannot_plant());
            return Err(e.into());
        }

        if let Some(definition) = self.catalog.get(plant_id) {
            let notification = Notification::planted(&definition.name);
            self.notify(&notification);
        }
        self.flush(index);
        self.refresh_stats();
        Ok(())
    }

    /// Water a plot.
    pub fn water(&mut self, plot_id: PlotId, now: GameTimestamp) -> GardenResult<()> {
        let index = self.index_of(plot_id)?;
        self.water_index(index, now)?;
        Ok(())
    }

    /// Harvest a plot into `inventory`.
    pub fn harvest(
        &mut self,
        plot_id: PlotId,
        now: GameTimestamp,
        inventory: &mut dyn InventorySink,
    ) -> GardenResult<HarvestResult> {
        let index = self.index_of(plot_id)?;
        Ok(self.harvest_index(index, now, inventory)?)
    }

    /// Perform the plot's primary action: harvest, water, or ask for a seed.
    pub fn interact(
        &mut self,
        plot_id: PlotId,
        now: GameTimestamp,
        inventory: &mut dyn InventorySink,
    ) -> GardenResult<Interaction> {
        let index = self.index_of(plot_id)?;
        let interaction = match self.plots[index].primary_action() {
            Some(PlotAction::Harvest) => {
                Interaction::Harvested(self.harvest_index(index, now, inventory)?)
            },
            Some(PlotAction::Water) => {
                self.water_index(index, now)?;
                Interaction::Watered
            },
            Some(PlotAction::Plant) => Interaction::ChooseSeed,
            None => Interaction::Nothing,
        };
        Ok(interaction)
    }

    /// Harvest every ready plot. Returns the total quantity harvested.
    ///
    /// Plots that refuse are skipped.
    pub fn harvest_all_ready(&mut self, now: GameTimestamp, inventory: &mut dyn InventorySink) -> u32 {
        let ready: Vec<usize> = (0..self.plots.len())
            .filter(|&i| self.plots[i].can_harvest())
            .collect();

        let mut total = 0u32;
        for index in ready {
            match self.harvest_index(index, now, inventory) {
                Ok(result) => total = total.saturating_add(result.quantity),
                Err(e) => debug!("Skipping {}: {e}", self.plots[index].id()),
            }
        }

        if total > 0 {
            info!("Auto-harvested {total} items");
            self.notify(&Notification::auto_harvested(total));
        }
        total
    }

    /// Water every plot that needs it. Returns the number watered.
    ///
    /// Plots that refuse are skipped.
    pub fn water_all_needing(&mut self, now: GameTimestamp) -> u32 {
        let thirsty: Vec<usize> = (0..self.plots.len())
            .filter(|&i| self.plots[i].needs_watering())
            .collect();

        let mut count = 0u32;
        for index in thirsty {
            match self.water_index(index, now) {
                Ok(()) => count += 1,
                Err(e) => debug!("Skipping {}: {e}", self.plots[index].id()),
            }
        }

        if count > 0 {
            info!("Watered {count} plants");
            self.notify(&Notification::watered_many(count));
        }
        count
    }

    /// Advance every plot to `now`. Returns the number of plots whose stage
    /// changed.
    ///
    /// All plot events are published before the refreshed statistics.
    pub fn on_clock_tick(&mut self, now: GameTimestamp) -> usize {
        let mut changed = 0;
        for plot in &mut self.plots {
            if plot.on_clock_tick(now) {
                changed += 1;
            }
        }
        for index in 0..self.plots.len() {
            self.flush(index);
        }
        if changed > 0 {
            debug!("Clock tick at {} changed {changed} plots", now.time_string());
        }
        // Expired watering changes the counts without a stage change.
        if changed > 0 || self.compute_stats() != self.stats {
            self.refresh_stats();
        }
        changed
    }

    /// React to a clock notification. Only time changes drive growth.
    pub fn handle_time_event(&mut self, event: &TimeEvent) -> usize {
        match event {
            TimeEvent::TimeChanged(now) => self.on_clock_tick(*now),
            TimeEvent::HourChanged(_) | TimeEvent::DayChanged(_) => 0,
        }
    }

    /// React to a batch of clock notifications in order.
    pub fn handle_time_events(&mut self, events: &[TimeEvent]) -> usize {
        events.iter().map(|e| self.handle_time_event(e)).sum()
    }

    /// Persistent plot state as plain data.
    #[must_use]
    pub fn snapshot(&self) -> GardenSnapshot {
        GardenSnapshot {
            plots: self.plots.iter().map(PlotState::snapshot).collect(),
        }
    }

    /// Restore plot state. Plots missing from the snapshot come back empty;
    /// snapshot entries for unknown plots are ignored.
    pub fn restore(&mut self, snapshot: &GardenSnapshot) {
        for plot in &mut self.plots {
            *plot = match snapshot.plots.iter().find(|s| s.id == plot.id()) {
                Some(saved) => PlotState::from_snapshot(saved, &self.catalog),
                None => PlotState::new(plot.id()),
            };
        }
        for saved in &snapshot.plots {
            if self.plot(saved.id).is_none() {
                warn!("Saved plot {} has no counterpart, ignoring", saved.id);
            }
        }
        info!("Restored {} garden plots", self.plots.len());
        self.refresh_stats();
    }

    fn index_of(&self, plot_id: PlotId) -> GardenResult<usize> {
        self.plots
            .iter()
            .position(|p| p.id() == plot_id)
            .ok_or(GardenError::UnknownPlot(plot_id))
    }

    fn water_index(&mut self, index: usize, now: GameTimestamp) -> Result<(), PlotError> {
        if !self.plots[index].water_plant(now) {
            return Err(PlotError::CannotWater);
        }
        self.notify(&Notification::watered());
        self.refresh_stats();
        Ok(())
    }

    fn harvest_index(
        &mut self,
        index: usize,
        now: GameTimestamp,
        inventory: &mut dyn InventorySink,
    ) -> Result<HarvestResult, PlotError> {
        let result = self.plots[index].harvest_plant(now, &mut self.rng, inventory)?;
        self.flush(index);
        self.notify(&Notification::harvested(&result.plant_name, result.quantity));
        self.refresh_stats();
        Ok(result)
    }

    /// Publish a plot's queued events, announcing plants that became ready.
    fn flush(&mut self, index: usize) {
        for event in self.plots[index].take_events() {
            if let GardenEvent::StageChanged {
                stage: GrowthStage::Harvestable,
                ..
            } = event
            {
                if let Some(plant) = self.plots[index].plant() {
                    let notification = Notification::ready(&plant.definition().name);
                    self.notify(&notification);
                }
            }
            self.publish(event);
        }
    }

    fn publish(&self, event: GardenEvent) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
        self.bus.publish(event);
    }

    fn notify(&mut self, notification: &Notification) {
        if let Some(sink) = self.notifier.as_mut() {
            sink.notify(notification);
        }
    }

    fn refresh_stats(&mut self) {
        self.stats = self.compute_stats();
        self.publish(GardenEvent::StatsChanged(self.stats));
    }
}
