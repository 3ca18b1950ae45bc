//! Growth stage calculation.
//!
//! Pure functions mapping elapsed game time, watering state, and a plant
//! definition to a [`GrowthStage`]. Progress is the fraction of the effective
//! growth duration that has elapsed and is unbounded above.

use crate::plants::{GrowthStage, PlantDefinition};

/// Seconds in one game hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Progress at which a plant becomes a sprout.
pub const SPROUT_PROGRESS: f64 = 0.2;
/// Progress at which a plant is growing.
pub const GROWING_PROGRESS: f64 = 0.5;
/// Progress at which a plant is mature.
pub const MATURE_PROGRESS: f64 = 0.8;
/// Progress at which a plant is harvestable.
pub const HARVESTABLE_PROGRESS: f64 = 1.0;

/// Growth duration in seconds after applying the watering bonus.
#[must_use]
pub fn effective_duration_secs(definition: &PlantDefinition, is_watered: bool) -> f64 {
    if is_watered {
        definition.growth_duration_secs / definition.watering_bonus
    } else {
        definition.growth_duration_secs
    }
}

/// Fraction of the effective growth duration covered by `elapsed_hours`.
#[must_use]
pub fn progress(elapsed_hours: f64, definition: &PlantDefinition, is_watered: bool) -> f64 {
    let duration = effective_duration_secs(definition, is_watered);
    if duration <= 0.0 {
        return f64::INFINITY;
    }
    (elapsed_hours * SECONDS_PER_HOUR) / duration
}

/// Map a progress value to a stage.
#[must_use]
pub fn stage_for_progress(progress: f64) -> GrowthStage {
    if progress >= HARVESTABLE_PROGRESS {
        GrowthStage::Harvestable
    } else if progress >= MATURE_PROGRESS {
        GrowthStage::Mature
    } else if progress >= GROWING_PROGRESS {
        GrowthStage::Growing
    } else if progress >= SPROUT_PROGRESS {
        GrowthStage::Sprout
    } else {
        GrowthStage::Planted
    }
}

/// Stage of a plant `elapsed_hours` after planting.
#[must_use]
pub fn compute_stage(
    elapsed_hours: f64,
    definition: &PlantDefinition,
    is_watered: bool,
) -> GrowthStage {
    stage_for_progress(progress(elapsed_hours, definition, is_watered))
}
