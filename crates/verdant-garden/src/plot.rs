//! Garden plots and the plants growing in them.
//!
//! A [`PlotState`] owns at most one [`PlantInstance`]. All mutation goes
//! through the plot's own methods; stage and harvest events are queued on
//! the plot and collected by the registry with [`PlotState::take_events`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace, warn};
use verdant_common::{ItemId, PlantId, PlotId};

use crate::events::GardenEvent;
use crate::growth::compute_stage;
use crate::inventory::InventorySink;
use crate::plants::{GrowthStage, PlantCatalog, PlantDefinition, StageVisual};
use crate::save::{PlantSnapshot, PlotSnapshot};
use crate::time::GameTimestamp;

/// Game hours a watering lasts.
pub const WATERING_DURATION_HOURS: f64 = 8.0;

/// Errors from plot actions. All are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlotError {
    /// The plot already holds a plant.
    #[error("Plot is not empty")]
    NotEmpty,

    /// The plant ID is not in the catalog.
    #[error("Unknown plant: {0}")]
    UnknownPlant(PlantId),

    /// The plant has not reached the harvestable stage.
    #[error("Plant is not ready to harvest")]
    NotHarvestable,

    /// Nothing to water, watering not required, or already watered.
    #[error("Plant cannot be watered")]
    CannotWater,
}

/// Result type for plot actions.
pub type PlotResult<T> = Result<T, PlotError>;

/// A live plant, owned by exactly one plot.
#[derive(Debug, Clone)]
pub struct PlantInstance {
    definition: Arc<PlantDefinition>,
    planted_at: GameTimestamp,
    stage: GrowthStage,
    times_harvested: u32,
    last_growth_update: GameTimestamp,
}

impl PlantInstance {
    fn new(definition: Arc<PlantDefinition>, now: GameTimestamp) -> Self {
        Self {
            definition,
            planted_at: now,
            stage: GrowthStage::Planted,
            times_harvested: 0,
            last_growth_update: now,
        }
    }

    /// Definition this plant was grown from.
    #[must_use]
    pub fn definition(&self) -> &PlantDefinition {
        &self.definition
    }

    /// Catalog ID.
    #[must_use]
    pub fn plant_id(&self) -> &PlantId {
        &self.definition.id
    }

    /// When the seed was planted.
    #[must_use]
    pub fn planted_at(&self) -> GameTimestamp {
        self.planted_at
    }

    /// Current growth stage.
    #[must_use]
    pub fn stage(&self) -> GrowthStage {
        self.stage
    }

    /// Harvests performed so far.
    #[must_use]
    pub fn times_harvested(&self) -> u32 {
        self.times_harvested
    }

    /// Harvests left before the plant is exhausted.
    #[must_use]
    pub fn harvests_remaining(&self) -> u32 {
        self.definition
            .max_harvests
            .saturating_sub(self.times_harvested)
    }

    /// Time of the last growth recalculation or harvest.
    #[must_use]
    pub fn last_growth_update(&self) -> GameTimestamp {
        self.last_growth_update
    }

    /// Stage implied by the time elapsed since planting.
    ///
    /// Harvests do not move the reference point, so a regrowing plant that
    /// already passed its growth duration is harvestable on the next tick.
    fn computed_stage(&self, now: GameTimestamp, watered: bool) -> GrowthStage {
        compute_stage(now.hours_since(self.planted_at), &self.definition, watered)
    }
}

/// Outcome of a successful harvest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestResult {
    /// Harvested plot.
    pub plot: PlotId,
    /// Item delivered to the inventory.
    pub item: ItemId,
    /// Quantity delivered.
    pub quantity: u32,
    /// Display name of the plant.
    pub plant_name: String,
    /// Whether the plant was exhausted and removed.
    pub exhausted: bool,
}

/// The action a player interaction on a plot would perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotAction {
    /// Harvest the ready plant.
    Harvest,
    /// Water the plant.
    Water,
    /// Plant a seed.
    Plant,
}

impl PlotAction {
    /// Prompt shown to the player.
    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Harvest => "Press E to harvest",
            Self::Water => "Press E to water",
            Self::Plant => "Press E to plant",
        }
    }
}

/// A single growing location.
#[derive(Debug, Clone)]
pub struct PlotState {
    id: PlotId,
    plant: Option<PlantInstance>,
    watered: bool,
    last_watered_at: Option<GameTimestamp>,
    /// Events not yet collected by the registry.
    pending: Vec<GardenEvent>,
}

impl PlotState {
    /// Create an empty plot.
    #[must_use]
    pub fn new(id: PlotId) -> Self {
        Self {
            id,
            plant: None,
            watered: false,
            last_watered_at: None,
            pending: Vec::new(),
        }
    }

    /// Plot ID.
    #[must_use]
    pub fn id(&self) -> PlotId {
        self.id
    }

    /// The live plant, if any.
    #[must_use]
    pub fn plant(&self) -> Option<&PlantInstance> {
        self.plant.as_ref()
    }

    /// Whether the plot holds no plant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plant.is_none()
    }

    /// Whether the watering bonus is active.
    #[must_use]
    pub fn is_watered(&self) -> bool {
        self.watered
    }

    /// Time of the last watering.
    #[must_use]
    pub fn last_watered_at(&self) -> Option<GameTimestamp> {
        self.last_watered_at
    }

    /// Current stage; [`GrowthStage::Empty`] without a plant.
    #[must_use]
    pub fn current_stage(&self) -> GrowthStage {
        self.plant
            .as_ref()
            .map_or(GrowthStage::Empty, PlantInstance::stage)
    }

    /// Visual metadata for the current stage, if the definition has any.
    #[must_use]
    pub fn current_visual(&self) -> Option<&StageVisual> {
        let plant = self.plant.as_ref()?;
        plant.definition.stage_visual(plant.stage)
    }

    /// True iff no plant is growing here.
    #[must_use]
    pub fn can_plant(&self) -> bool {
        self.plant.is_none()
    }

    /// Plant a seed from the catalog.
    pub fn plant_seed(
        &mut self,
        plant_id: &str,
        catalog: &PlantCatalog,
        now: GameTimestamp,
    ) -> PlotResult<()> {
        if !self.can_plant() {
            return Err(PlotError::NotEmpty);
        }
        let definition = catalog
            .get(plant_id)
            .ok_or_else(|| PlotError::UnknownPlant(PlantId::from(plant_id)))?;

        self.plant = Some(PlantInstance::new(Arc::clone(definition), now));
        self.watered = false;
        self.last_watered_at = None;
        debug!("Planted {plant_id} in {}", self.id);
        self.emit_stage(GrowthStage::Planted);
        Ok(())
    }

    /// True iff occupied by an unwatered plant that requires watering.
    #[must_use]
    pub fn can_water(&self) -> bool {
        !self.watered
            && self
                .plant
                .as_ref()
                .is_some_and(|p| p.definition.requires_watering)
    }

    /// Same condition as [`PlotState::can_water`], read as a status.
    #[must_use]
    pub fn needs_watering(&self) -> bool {
        self.can_water()
    }

    /// Water the plant. Returns false if [`PlotState::can_water`] is false.
    pub fn water_plant(&mut self, now: GameTimestamp) -> bool {
        if !self.can_water() {
            return false;
        }
        self.watered = true;
        self.last_watered_at = Some(now);
        debug!("Watered {}", self.id);
        true
    }

    /// True iff the plant is harvestable.
    #[must_use]
    pub fn can_harvest(&self) -> bool {
        self.current_stage().is_harvestable()
    }

    /// Harvest the plant and deliver the yield to `inventory`.
    ///
    /// The quantity is drawn uniformly from the definition's inclusive range.
    /// The inventory receives exactly one delivery per successful call.
    pub fn harvest_plant(
        &mut self,
        now: GameTimestamp,
        rng: &mut fastrand::Rng,
        inventory: &mut dyn InventorySink,
    ) -> PlotResult<HarvestResult> {
        if !self.can_harvest() {
            return Err(PlotError::NotHarvestable);
        }
        let plant = self.plant.as_mut().ok_or(PlotError::NotHarvestable)?;
        let definition = Arc::clone(&plant.definition);

        let low = definition.base_harvest_amount;
        let quantity = rng.u32(low..=definition.max_harvest_amount.max(low));

        plant.times_harvested += 1;
        let exhausted = plant.times_harvested >= definition.max_harvests;
        let next_stage = if exhausted {
            self.plant = None;
            self.last_watered_at = None;
            GrowthStage::Empty
        } else {
            plant.stage = GrowthStage::Growing;
            plant.last_growth_update = now;
            GrowthStage::Growing
        };
        self.watered = false;

        inventory.receive(&definition.harvest_item, quantity);
        debug!(
            "Harvested {quantity}x {} from {} (exhausted: {exhausted})",
            definition.harvest_item, self.id
        );

        self.pending.push(GardenEvent::Harvested {
            plot: self.id,
            item: definition.harvest_item.clone(),
            quantity,
        });
        self.emit_stage(next_stage);

        Ok(HarvestResult {
            plot: self.id,
            item: definition.harvest_item.clone(),
            quantity,
            plant_name: definition.name.clone(),
            exhausted,
        })
    }

    /// Recompute growth at `now` and expire an old watering.
    ///
    /// The stage never moves backward within a cycle. Returns true if the
    /// stage changed, in which case a stage event is queued. An expired
    /// watering alone does not count as a change.
    pub fn on_clock_tick(&mut self, now: GameTimestamp) -> bool {
        let Some(plant) = self.plant.as_mut() else {
            return false;
        };

        let stage = plant.computed_stage(now, self.watered).max(plant.stage);
        plant.last_growth_update = now;
        let changed = stage != plant.stage;
        plant.stage = stage;

        if self.watered
            && self
                .last_watered_at
                .map_or(true, |t| now.hours_since(t) >= WATERING_DURATION_HOURS)
        {
            trace!("Watering expired on {}", self.id);
            self.watered = false;
        }

        if changed {
            self.emit_stage(stage);
        }
        changed
    }

    /// Highest-priority action available: harvest, then water, then plant.
    #[must_use]
    pub fn primary_action(&self) -> Option<PlotAction> {
        if self.can_harvest() {
            Some(PlotAction::Harvest)
        } else if self.can_water() {
            Some(PlotAction::Water)
        } else if self.can_plant() {
            Some(PlotAction::Plant)
        } else {
            None
        }
    }

    /// Prompt for [`PlotState::primary_action`], or an empty string.
    #[must_use]
    pub fn interaction_prompt(&self) -> &'static str {
        self.primary_action().map_or("", PlotAction::prompt)
    }

    /// Take the queued events in emission order.
    pub fn take_events(&mut self) -> Vec<GardenEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Persistent state as plain data.
    #[must_use]
    pub fn snapshot(&self) -> PlotSnapshot {
        PlotSnapshot {
            id: self.id,
            plant: self.plant.as_ref().map(|p| PlantSnapshot {
                plant_id: p.definition.id.clone(),
                planted_at: p.planted_at,
                stage: p.stage,
                times_harvested: p.times_harvested,
                last_growth_update: p.last_growth_update,
            }),
            watered: self.watered,
            last_watered_at: self.last_watered_at,
        }
    }

    /// Rebuild a plot from a snapshot.
    ///
    /// A plant whose ID is missing from the catalog, or whose state is
    /// impossible for its definition, is dropped with a warning and the plot
    /// comes back empty.
    #[must_use]
    pub fn from_snapshot(snapshot: &PlotSnapshot, catalog: &PlantCatalog) -> Self {
        let mut plot = Self::new(snapshot.id);
        let Some(saved) = &snapshot.plant else {
            return plot;
        };

        let Some(definition) = catalog.get(saved.plant_id.as_str()) else {
            warn!(
                "Plant data not found for ID {} in {}, leaving plot empty",
                saved.plant_id, snapshot.id
            );
            return plot;
        };
        if saved.times_harvested >= definition.max_harvests || saved.stage == GrowthStage::Empty {
            warn!(
                "Invalid saved state for {} in {}, leaving plot empty",
                saved.plant_id, snapshot.id
            );
            return plot;
        }

        plot.plant = Some(PlantInstance {
            definition: Arc::clone(definition),
            planted_at: saved.planted_at,
            stage: saved.stage,
            times_harvested: saved.times_harvested,
            last_growth_update: saved.last_growth_update,
        });
        plot.watered = snapshot.watered && definition.requires_watering;
        plot.last_watered_at = snapshot.last_watered_at;
        plot
    }

    fn emit_stage(&mut self, stage: GrowthStage) {
        self.pending.push(GardenEvent::StageChanged {
            plot: self.id,
            stage,
        });
    }
}
