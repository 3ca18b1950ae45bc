//! Plant definitions and the plant catalog.
//!
//! This module provides:
//! - Growth stages shared by the growth engine and plots
//! - Immutable plant definitions with a builder API
//! - Stage visual metadata passed through to presentation untouched
//! - A read-only catalog keyed by plant ID, loadable from TOML

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use verdant_common::{ItemId, PlantId};

/// Growth stage of a plot, strictly ordered from empty to harvestable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum GrowthStage {
    /// No plant.
    #[default]
    Empty = 0,
    /// Just planted seed.
    Planted = 1,
    /// Small sprout.
    Sprout = 2,
    /// Getting bigger.
    Growing = 3,
    /// Almost ready.
    Mature = 4,
    /// Ready to harvest.
    Harvestable = 5,
}

impl GrowthStage {
    /// All stages in order.
    pub const ALL: [Self; 6] = [
        Self::Empty,
        Self::Planted,
        Self::Sprout,
        Self::Growing,
        Self::Mature,
        Self::Harvestable,
    ];

    /// Numeric index of the stage (0-5).
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Get the display name of this stage.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Planted => "Planted",
            Self::Sprout => "Sprout",
            Self::Growing => "Growing",
            Self::Mature => "Mature",
            Self::Harvestable => "Harvestable",
        }
    }

    /// Check if a plant in this stage can be harvested.
    #[must_use]
    pub fn is_harvestable(self) -> bool {
        matches!(self, Self::Harvestable)
    }
}

/// Presentation metadata for one growth stage.
///
/// The garden never interprets these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageVisual {
    /// Stage this visual applies to.
    pub stage: GrowthStage,
    /// Sprite asset reference.
    #[serde(default)]
    pub sprite: String,
    /// Local scale.
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    /// RGBA tint.
    #[serde(default = "default_tint")]
    pub tint: [f32; 4],
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_tint() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

impl StageVisual {
    /// Create a visual with default scale and tint.
    #[must_use]
    pub fn new(stage: GrowthStage, sprite: impl Into<String>) -> Self {
        Self {
            stage,
            sprite: sprite.into(),
            scale: default_scale(),
            tint: default_tint(),
        }
    }
}

/// Definition of a plant type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantDefinition {
    /// Unique identifier.
    pub id: PlantId,
    /// Display name.
    pub name: String,
    /// Flavor text.
    pub description: String,
    /// Seconds of game time from planting to harvestable when unwatered.
    pub growth_duration_secs: f64,
    /// Harvests before the plant is exhausted and removed.
    pub max_harvests: u32,
    /// Whether the plant can (and should) be watered.
    pub requires_watering: bool,
    /// Growth speed multiplier while watered.
    pub watering_bonus: f64,
    /// Item produced on harvest.
    pub harvest_item: ItemId,
    /// Minimum harvest quantity (inclusive).
    pub base_harvest_amount: u32,
    /// Maximum harvest quantity (inclusive).
    pub max_harvest_amount: u32,
    /// Per-stage presentation metadata.
    pub stage_visuals: Vec<StageVisual>,
}

impl Default for PlantDefinition {
    fn default() -> Self {
        Self {
            id: PlantId::default(),
            name: String::new(),
            description: String::new(),
            growth_duration_secs: 24.0 * 3600.0,
            max_harvests: 3,
            requires_watering: true,
            watering_bonus: 1.5,
            harvest_item: ItemId::default(),
            base_harvest_amount: 1,
            max_harvest_amount: 3,
            stage_visuals: Vec::new(),
        }
    }
}

impl PlantDefinition {
    /// Create a new plant definition builder.
    #[must_use]
    pub fn builder(id: impl Into<PlantId>, name: &str) -> PlantDefinitionBuilder {
        PlantDefinitionBuilder::new(id.into(), name)
    }

    /// Growth duration in game hours.
    #[must_use]
    pub fn growth_hours(&self) -> f64 {
        self.growth_duration_secs / 3600.0
    }

    /// Get the visual metadata for a stage, if any.
    #[must_use]
    pub fn stage_visual(&self, stage: GrowthStage) -> Option<&StageVisual> {
        self.stage_visuals.iter().find(|v| v.stage == stage)
    }

    /// Check the definition for values the growth engine cannot use.
    pub fn validate(&self) -> Result<(), CatalogWarning> {
        let invalid = |reason: &str| CatalogWarning::Invalid {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.is_empty() {
            return Err(invalid("empty plant id"));
        }
        if !self.growth_duration_secs.is_finite() || self.growth_duration_secs <= 0.0 {
            return Err(invalid("growth duration must be positive"));
        }
        if !self.watering_bonus.is_finite() || self.watering_bonus < 1.0 {
            return Err(invalid("watering bonus must be at least 1.0"));
        }
        if self.max_harvests == 0 {
            return Err(invalid("max harvests must be at least 1"));
        }
        if self.base_harvest_amount > self.max_harvest_amount {
            return Err(invalid("base harvest amount exceeds maximum"));
        }
        Ok(())
    }
}

/// Builder for plant definitions.
#[derive(Debug)]
pub struct PlantDefinitionBuilder {
    def: PlantDefinition,
}

impl PlantDefinitionBuilder {
    /// Create a new builder with default growth settings.
    #[must_use]
    pub fn new(id: PlantId, name: &str) -> Self {
        Self {
            def: PlantDefinition {
                id,
                name: name.to_string(),
                ..PlantDefinition::default()
            },
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, text: &str) -> Self {
        self.def.description = text.to_string();
        self
    }

    /// Set growth duration in seconds.
    #[must_use]
    pub fn growth_secs(mut self, seconds: f64) -> Self {
        self.def.growth_duration_secs = seconds;
        self
    }

    /// Set growth duration in hours.
    #[must_use]
    pub fn growth_hours(self, hours: f64) -> Self {
        self.growth_secs(hours * 3600.0)
    }

    /// Set watering requirement and bonus.
    #[must_use]
    pub fn water(mut self, requires_watering: bool, bonus: f64) -> Self {
        self.def.requires_watering = requires_watering;
        self.def.watering_bonus = bonus;
        self
    }

    /// Set the number of harvest cycles.
    #[must_use]
    pub fn max_harvests(mut self, harvests: u32) -> Self {
        self.def.max_harvests = harvests;
        self
    }

    /// Set harvest output.
    #[must_use]
    pub fn harvest(mut self, item: impl Into<ItemId>, base: u32, max: u32) -> Self {
        self.def.harvest_item = item.into();
        self.def.base_harvest_amount = base;
        self.def.max_harvest_amount = max;
        self
    }

    /// Add a stage visual.
    #[must_use]
    pub fn visual(mut self, visual: StageVisual) -> Self {
        self.def.stage_visuals.push(visual);
        self
    }

    /// Build the plant definition.
    #[must_use]
    pub fn build(self) -> PlantDefinition {
        self.def
    }
}

/// Non-fatal problems found while building a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogWarning {
    /// A later definition reused an ID and was discarded.
    #[error("Duplicate plant ID found: {0}")]
    Duplicate(PlantId),

    /// A definition failed validation and was skipped.
    #[error("Invalid plant '{id}': {reason}")]
    Invalid {
        /// Plant ID
        id: PlantId,
        /// What was wrong
        reason: String,
    },
}

/// Errors that abort catalog loading.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read file.
    #[error("Failed to read plant catalog {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("Failed to parse plant catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for catalog loading.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// On-disk catalog layout: a list of `[[plant]]` tables.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    plant: Vec<PlantDefinition>,
}

/// Read-only lookup from plant ID to definition.
///
/// Definitions are shared as `Arc` so plant instances can hold onto them
/// without borrowing the catalog.
#[derive(Debug, Default, Clone)]
pub struct PlantCatalog {
    /// Definitions by ID.
    definitions: HashMap<PlantId, Arc<PlantDefinition>>,
    /// Insertion order, for listing.
    order: Vec<PlantId>,
}

impl PlantCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog; the first definition of an ID wins.
    ///
    /// Duplicates and invalid definitions are skipped and returned as
    /// warnings for the caller to report.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = PlantDefinition>,
    ) -> (Self, Vec<CatalogWarning>) {
        let mut catalog = Self::new();
        let mut warnings = Vec::new();
        for def in definitions {
            if let Err(w) = catalog.try_register(def) {
                warnings.push(w);
            }
        }
        (catalog, warnings)
    }

    /// Create a catalog with the built-in herbs.
    #[must_use]
    pub fn with_defaults() -> Self {
        let (catalog, _) = Self::from_definitions(default_plants());
        catalog
    }

    /// Parse a TOML catalog. Warnings are logged and returned.
    pub fn load_from_str(contents: &str) -> CatalogResult<(Self, Vec<CatalogWarning>)> {
        let file: CatalogFile = toml::from_str(contents)?;
        let (catalog, warnings) = Self::from_definitions(file.plant);
        for w in &warnings {
            warn!("{w}");
        }
        Ok((catalog, warnings))
    }

    /// Load a TOML catalog from disk.
    pub fn load_from_file(path: impl AsRef<Path>) -> CatalogResult<(Self, Vec<CatalogWarning>)> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let loaded = Self::load_from_str(&contents)?;
        info!(
            "Loaded {} plants from {}",
            loaded.0.len(),
            path.display()
        );
        Ok(loaded)
    }

    /// Add a definition unless its ID is taken or it fails validation.
    pub fn try_register(&mut self, definition: PlantDefinition) -> Result<(), CatalogWarning> {
        definition.validate()?;
        if self.definitions.contains_key(&definition.id) {
            return Err(CatalogWarning::Duplicate(definition.id));
        }
        debug!("Registered plant {}", definition.id);
        self.order.push(definition.id.clone());
        self.definitions
            .insert(definition.id.clone(), Arc::new(definition));
        Ok(())
    }

    /// Look up a definition by exact ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<PlantDefinition>> {
        self.definitions.get(id)
    }

    /// Check if an ID is present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate definitions in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &Arc<PlantDefinition>> {
        self.order.iter().filter_map(|id| self.definitions.get(id))
    }
}

/// Built-in herb definitions.
fn default_plants() -> Vec<PlantDefinition> {
    vec![
        PlantDefinition::builder("basil", "Basil")
            .description("Fragrant leaves, quick to grow.")
            .growth_hours(6.0)
            .water(true, 1.5)
            .max_harvests(3)
            .harvest("basil_leaf", 1, 3)
            .build(),
        PlantDefinition::builder("mint", "Mint")
            .description("Spreads eagerly and regrows after cutting.")
            .growth_hours(8.0)
            .water(true, 2.0)
            .max_harvests(5)
            .harvest("mint_leaf", 2, 4)
            .build(),
        PlantDefinition::builder("lavender", "Lavender")
            .description("Hardy and drought tolerant.")
            .growth_hours(24.0)
            .water(false, 1.0)
            .max_harvests(2)
            .harvest("lavender_sprig", 1, 2)
            .build(),
        PlantDefinition::builder("chamomile", "Chamomile")
            .description("Small daisy-like flowers for tea.")
            .growth_hours(12.0)
            .water(true, 1.5)
            .max_harvests(1)
            .harvest("chamomile_flower", 2, 5)
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_stage_ordering() {
        assert!(GrowthStage::Empty < GrowthStage::Planted);
        assert!(GrowthStage::Mature < GrowthStage::Harvestable);
        assert_eq!(GrowthStage::Growing.index(), 3);
        assert!(GrowthStage::Harvestable.is_harvestable());
        assert!(!GrowthStage::Mature.is_harvestable());
    }

    #[test]
    fn test_plant_definition_builder() {
        let def = PlantDefinition::builder("test", "Test Plant")
            .growth_hours(10.0)
            .harvest("leaf", 2, 4)
            .visual(StageVisual::new(GrowthStage::Sprout, "sprout.png"))
            .build();

        assert_eq!(def.name, "Test Plant");
        assert!((def.growth_duration_secs - 36_000.0).abs() < 1e-9);
        assert!((def.growth_hours() - 10.0).abs() < 1e-9);
        assert_eq!(def.stage_visual(GrowthStage::Sprout).map(|v| v.sprite.as_str()), Some("sprout.png"));
        assert!(def.stage_visual(GrowthStage::Mature).is_none());
        assert!(def.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let zero_growth = PlantDefinition::builder("a", "A").growth_secs(0.0).build();
        assert!(zero_growth.validate().is_err());

        let slow_water = PlantDefinition::builder("b", "B").water(true, 0.5).build();
        assert!(slow_water.validate().is_err());

        let no_harvest = PlantDefinition::builder("c", "C").max_harvests(0).build();
        assert!(no_harvest.validate().is_err());

        let inverted = PlantDefinition::builder("d", "D").harvest("x", 5, 1).build();
        assert!(inverted.validate().is_err());

        let unnamed = PlantDefinition::builder("", "E").build();
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_catalog_first_wins_on_duplicates() {
        let first = PlantDefinition::builder("basil", "First").build();
        let second = PlantDefinition::builder("basil", "Second").build();
        let (catalog, warnings) = PlantCatalog::from_definitions([first, second]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("basil").map(|d| d.name.as_str()), Some("First"));
        assert_eq!(warnings, vec![CatalogWarning::Duplicate(PlantId::from("basil"))]);
    }

    #[test]
    fn test_catalog_exact_match() {
        let catalog = PlantCatalog::with_defaults();
        assert!(catalog.contains("basil"));
        assert!(!catalog.contains("Basil"));
        assert!(catalog.get("unknown_id").is_none());
    }

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = PlantCatalog::with_defaults();
        let ids: Vec<&str> = catalog.all().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["basil", "mint", "lavender", "chamomile"]);
    }

    #[test]
    fn test_load_from_str() {
        let toml = r#"
            [[plant]]
            id = "sage"
            name = "Sage"
            growth_duration_secs = 7200.0
            harvest_item = "sage_leaf"
            max_harvests = 2

            [[plant.stage_visuals]]
            stage = "Mature"
            sprite = "sage_mature.png"

            [[plant]]
            id = "sage"
            name = "Sage Again"

            [[plant]]
            id = "bad"
            watering_bonus = 0.0
        "#;

        let (catalog, warnings) = PlantCatalog::load_from_str(toml).expect("parse");
        assert_eq!(catalog.len(), 1);
        assert_eq!(warnings.len(), 2);

        let sage = catalog.get("sage").expect("sage");
        assert_eq!(sage.max_harvests, 2);
        assert!(sage.requires_watering);
        assert_eq!(sage.base_harvest_amount, 1);
        assert_eq!(
            sage.stage_visual(GrowthStage::Mature).map(|v| v.scale),
            Some([1.0, 1.0, 1.0])
        );
    }

    #[test]
    fn test_load_from_str_parse_error() {
        assert!(matches!(
            PlantCatalog::load_from_str("[[plant]\nid ="),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plants.toml");
        fs::write(&path, "[[plant]]\nid = \"thyme\"\nname = \"Thyme\"\n").expect("write");

        let (catalog, warnings) = PlantCatalog::load_from_file(&path).expect("load");
        assert!(warnings.is_empty());
        assert!(catalog.contains("thyme"));

        assert!(matches!(
            PlantCatalog::load_from_file(dir.path().join("missing.toml")),
            Err(CatalogError::Read { .. })
        ));
    }
}
