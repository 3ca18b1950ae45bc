//! End-to-end garden scenarios driven through the registry and the clock.

use std::sync::Arc;

use verdant_common::{ItemId, PlotId};
use verdant_garden::prelude::*;

const PLOT: PlotId = PlotId::new(0);

/// 10 hour growth, double speed when watered.
fn scenario_catalog(max_harvests: u32) -> Arc<PlantCatalog> {
    let definition = PlantDefinition::builder("herb", "Herb")
        .growth_secs(36_000.0)
        .water(true, 2.0)
        .max_harvests(max_harvests)
        .harvest("herb_leaf", 1, 1)
        .build();
    let (catalog, warnings) = PlantCatalog::from_definitions([definition]);
    assert!(warnings.is_empty());
    Arc::new(catalog)
}

fn setup(max_harvests: u32) -> (GardenRegistry, Clock) {
    let registry = GardenRegistry::with_plot_count(scenario_catalog(max_harvests), 1)
        .with_rng(fastrand::Rng::with_seed(42));
    (registry, Clock::new(0, 0))
}

fn advance_hours(clock: &mut Clock, registry: &mut GardenRegistry, hours: u32) {
    let event = clock.advance_by(hours);
    registry.handle_time_event(&event);
}

fn stage(registry: &GardenRegistry) -> GrowthStage {
    registry
        .plot(PLOT)
        .map_or(GrowthStage::Empty, PlotState::current_stage)
}

fn grow_to_harvest(clock: &mut Clock, registry: &mut GardenRegistry) {
    registry.water(PLOT, clock.now()).expect("water");
    advance_hours(clock, registry, 5);
    assert_eq!(stage(registry), GrowthStage::Harvestable);
}

#[test]
fn scenario_a_unwatered_half_way_is_growing() {
    let (mut registry, mut clock) = setup(1);
    registry.plant(PLOT, "herb", clock.now()).expect("plant");

    advance_hours(&mut clock, &mut registry, 5);
    assert_eq!(stage(&registry), GrowthStage::Growing);

    registry.water(PLOT, clock.now()).expect("water");
    assert_eq!(stage(&registry), GrowthStage::Growing);

    advance_hours(&mut clock, &mut registry, 0);
    assert_eq!(stage(&registry), GrowthStage::Harvestable);
}

#[test]
fn scenario_b_watered_from_start_is_harvestable() {
    let (mut registry, mut clock) = setup(1);
    registry.plant(PLOT, "herb", clock.now()).expect("plant");
    registry.water(PLOT, clock.now()).expect("water");

    advance_hours(&mut clock, &mut registry, 5);
    assert_eq!(stage(&registry), GrowthStage::Harvestable);
}

#[test]
fn scenario_c_and_d_regrow_then_exhaust() {
    let (mut registry, mut clock) = setup(2);
    let mut inventory = Inventory::new(4);
    registry.plant(PLOT, "herb", clock.now()).expect("plant");
    grow_to_harvest(&mut clock, &mut registry);

    let first = registry
        .harvest(PLOT, clock.now(), &mut inventory)
        .expect("first harvest");
    assert!(!first.exhausted);
    let plot = registry.plot(PLOT).expect("plot");
    assert_eq!(plot.current_stage(), GrowthStage::Growing);
    assert_eq!(plot.plant().map(PlantInstance::times_harvested), Some(1));
    assert!(!plot.is_empty());

    grow_to_harvest(&mut clock, &mut registry);
    let second = registry
        .harvest(PLOT, clock.now(), &mut inventory)
        .expect("second harvest");
    assert!(second.exhausted);
    let plot = registry.plot(PLOT).expect("plot");
    assert!(plot.is_empty());
    assert!(!plot.is_watered());
    assert_eq!(inventory.count("herb_leaf"), 2);
}

#[test]
fn regrown_plant_is_ready_on_next_tick() {
    let (mut registry, mut clock) = setup(2);
    let mut inventory = Inventory::new(4);
    registry.plant(PLOT, "herb", clock.now()).expect("plant");
    advance_hours(&mut clock, &mut registry, 10);
    assert_eq!(stage(&registry), GrowthStage::Harvestable);

    registry.harvest(PLOT, clock.now(), &mut inventory).expect("harvest");
    assert_eq!(stage(&registry), GrowthStage::Growing);

    advance_hours(&mut clock, &mut registry, 1);
    assert_eq!(stage(&registry), GrowthStage::Harvestable);
}

#[test]
fn scenario_e_unknown_plant_leaves_plot_empty() {
    let (mut registry, clock) = setup(1);
    assert_eq!(
        registry.plant(PLOT, "unknown_id", clock.now()),
        Err(GardenError::Plot(PlotError::UnknownPlant("unknown_id".into())))
    );
    assert!(registry.plot(PLOT).is_some_and(PlotState::is_empty));
    assert_eq!(registry.stats(), GardenStats::default());
}

#[test]
fn exhaustion_happens_exactly_on_last_harvest() {
    for max_harvests in 1..=4 {
        let (mut registry, mut clock) = setup(max_harvests);
        let mut delivered: Vec<(ItemId, u32)> = Vec::new();
        registry.plant(PLOT, "herb", clock.now()).expect("plant");

        for n in 1..=max_harvests {
            grow_to_harvest(&mut clock, &mut registry);
            let result = registry
                .harvest(PLOT, clock.now(), &mut delivered)
                .expect("harvest");
            assert_eq!(result.exhausted, n == max_harvests);
            assert_eq!(registry.plot(PLOT).is_some_and(PlotState::is_empty), n == max_harvests);
        }
        assert_eq!(delivered.len(), max_harvests as usize);
    }
}

#[test]
fn failed_harvest_delivers_nothing() {
    let (mut registry, clock) = setup(1);
    let mut delivered: Vec<(ItemId, u32)> = Vec::new();
    registry.plant(PLOT, "herb", clock.now()).expect("plant");

    for _ in 0..3 {
        assert_eq!(
            registry.harvest(PLOT, clock.now(), &mut delivered),
            Err(GardenError::Plot(PlotError::NotHarvestable))
        );
    }
    assert!(delivered.is_empty());
}

#[test]
fn repeated_tick_emits_no_duplicate_events() {
    let (mut registry, mut clock) = setup(1);
    registry.plant(PLOT, "herb", clock.now()).expect("plant");
    advance_hours(&mut clock, &mut registry, 2);
    registry.drain_events();

    registry.on_clock_tick(clock.now());
    assert!(registry.drain_events().is_empty());
    assert_eq!(stage(&registry), GrowthStage::Sprout);
}

#[test]
fn observers_see_harvest_then_stats() {
    let (mut registry, mut clock) = setup(1);
    let (tx, rx) = crossbeam_channel::unbounded();
    registry.subscribe(tx);
    let mut inventory = Inventory::new(4);

    registry.plant(PLOT, "herb", clock.now()).expect("plant");
    grow_to_harvest(&mut clock, &mut registry);
    rx.try_iter().for_each(drop);

    registry
        .harvest(PLOT, clock.now(), &mut inventory)
        .expect("harvest");
    let events: Vec<GardenEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            GardenEvent::Harvested {
                plot: PLOT,
                item: ItemId::from("herb_leaf"),
                quantity: 1,
            },
            GardenEvent::StageChanged {
                plot: PLOT,
                stage: GrowthStage::Empty,
            },
            GardenEvent::StatsChanged(GardenStats::default()),
        ]
    );
}

#[test]
fn real_time_loop_grows_plants() {
    let (mut registry, mut clock) = setup(1);
    registry.plant(PLOT, "herb", clock.now()).expect("plant");

    // 10 in-game hours at 60 real seconds per hour, in 0.5 s frames.
    for _ in 0..1200 {
        let events = clock.update(0.5);
        registry.handle_time_events(&events);
    }
    assert_eq!(clock.hour(), 10);
    assert_eq!(stage(&registry), GrowthStage::Harvestable);
}

#[test]
fn garden_snapshot_survives_binary_round_trip() {
    let (mut registry, mut clock) = setup(3);
    registry.plant(PLOT, "herb", clock.now()).expect("plant");
    advance_hours(&mut clock, &mut registry, 3);

    let bytes = registry.snapshot().to_bytes().expect("encode");
    let decoded = GardenSnapshot::from_bytes(&bytes).expect("decode");

    let (mut restored, _) = setup(3);
    restored.restore(&decoded);
    assert_eq!(restored.snapshot(), registry.snapshot());
    assert_eq!(stage(&restored), GrowthStage::Sprout);
}
