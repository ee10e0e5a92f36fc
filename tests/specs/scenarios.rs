// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios exercising the full event → hook loop.

use crate::common::{engine, mill, Good};
use pw_core::{Priority, Storage, StorageRole, WorkerState, WorkstationConfig, WorkstationStatus};

/// Scenario: one unit travels the whole pipeline in a single cycle.
#[test]
fn basic_cycle() {
    let mut engine = mill();
    engine.add_worker(10).unwrap();

    assert_eq!(engine.get_workstation_status(&100), Some(WorkstationStatus::Active));
    assert_eq!(engine.get_worker_state(&10), Some(WorkerState::Working));

    assert!(engine.pickup_completed(&10));
    assert!(!engine.get_storage_has_item(&1));
    assert!(engine.get_storage_has_item(&2));

    assert!(engine.work_completed(&100));
    assert!(!engine.get_storage_has_item(&2));
    assert!(engine.get_storage_has_item(&3));

    assert!(engine.store_completed(&10));
    assert!(!engine.get_storage_has_item(&3));
    assert!(engine.get_storage_has_item(&4));
    assert_eq!(engine.get_workstation_info(&100).unwrap().cycles_completed, 1);
    assert_eq!(engine.get_worker_state(&10), Some(WorkerState::Idle));
}

/// Scenario: the single idle worker goes to the highest-priority station.
#[test]
fn priority_selection() {
    let mut engine = engine();
    for (base, ws_id, priority) in
        [(10, 100, Priority::Low), (20, 200, Priority::Critical)]
    {
        engine
            .add_storage(base, Storage::new(StorageRole::ExternalInput).item(Good::Flour))
            .unwrap();
        engine
            .add_storage(base + 1, Storage::new(StorageRole::InternalInput).accepts(Good::Flour))
            .unwrap();
        engine
            .add_storage(base + 2, Storage::new(StorageRole::InternalOutput).accepts(Good::Bread))
            .unwrap();
        engine.add_storage(base + 3, Storage::new(StorageRole::ExternalOutput)).unwrap();
        engine
            .add_workstation(
                ws_id,
                WorkstationConfig::builder()
                    .eis([base])
                    .iis([base + 1])
                    .ios([base + 2])
                    .eos([base + 3])
                    .priority(priority)
                    .build(),
            )
            .unwrap();
    }
    engine.add_worker(1).unwrap();

    assert_eq!(engine.get_workstation_status(&200), Some(WorkstationStatus::Active));
    assert_eq!(engine.get_workstation_status(&100), Some(WorkstationStatus::Queued));
}

/// Scenario: abandonment mid-pickup preserves progress; a different worker
/// resumes with a fresh slot selection.
#[test]
fn abandonment_and_resume() {
    let mut engine = mill();
    engine.add_worker(10).unwrap();
    assert_eq!(engine.get_workstation_info(&100).unwrap().selected_eis, Some(1));

    assert!(engine.worker_unavailable(&10));
    let ws = engine.get_workstation_info(&100).unwrap();
    assert_eq!(ws.status, WorkstationStatus::Queued);
    assert!(ws.selected_eis.is_none());
    assert!(engine.get_storage_has_item(&1));

    engine.add_worker(11).unwrap();
    let ws = engine.get_workstation_info(&100).unwrap();
    assert_eq!(ws.status, WorkstationStatus::Active);
    assert_eq!(ws.selected_eis, Some(1));
    assert_eq!(ws.assigned_worker, Some(11));
}

/// Scenario: an orphan item is ferried into an accepting empty slot.
#[test]
fn dangling_delivery() {
    let mut engine = engine();
    engine
        .add_storage(1, Storage::new(StorageRole::ExternalInput).accepts(Good::Flour))
        .unwrap();
    engine.add_worker(10).unwrap();
    engine.add_dangling_item(50, Good::Flour).unwrap();

    assert!(engine.hooks().names().contains(&"pickup_dangling_started"));
    assert_eq!(engine.get_worker_state(&10), Some(WorkerState::Working));

    assert!(engine.pickup_completed(&10));
    assert!(engine.store_completed(&10));
    assert!(engine.get_storage_has_item(&1));
    assert_eq!(engine.get_dangling_item_type(&50), None);
}

/// Scenario: a freed slot triggers the pending dangling assignment without
/// any explicit re-evaluation call.
#[test]
fn emptied_slot_triggers_dangling_assignment() {
    let mut engine = mill();
    engine.add_worker(10).unwrap(); // bound to the mill, in Pickup
    engine.add_worker(11).unwrap(); // idle
    engine.add_dangling_item(50, Good::Flour).unwrap();

    // the only accepting slot still holds the mill's input
    assert_eq!(engine.get_worker_state(&11), Some(WorkerState::Idle));

    // the mill's pickup empties the slot; the scheduler fans out
    assert!(engine.pickup_completed(&10));
    assert_eq!(engine.get_worker_state(&11), Some(WorkerState::Working));
    let task = engine.get_worker_info(&11).unwrap().dangling_task.clone().unwrap();
    assert_eq!(task.target, 1);
}

/// Scenario: a two-ingredient recipe runs one pickup leg per ingredient.
#[test]
fn multi_slot_pickup() {
    let mut engine = engine();
    engine.add_storage(1, Storage::new(StorageRole::ExternalInput).item(Good::Veg)).unwrap();
    engine.add_storage(2, Storage::new(StorageRole::ExternalInput).item(Good::Meat)).unwrap();
    engine.add_storage(5, Storage::new(StorageRole::InternalInput).accepts(Good::Veg)).unwrap();
    engine.add_storage(6, Storage::new(StorageRole::InternalInput).accepts(Good::Meat)).unwrap();
    engine
        .add_storage(3, Storage::new(StorageRole::InternalOutput).accepts(Good::Stew))
        .unwrap();
    engine.add_storage(4, Storage::new(StorageRole::ExternalOutput)).unwrap();
    engine
        .add_workstation(
            100,
            WorkstationConfig::builder().eis([1, 2]).iis([5, 6]).ios([3]).eos([4]).build(),
        )
        .unwrap();
    engine.add_worker(10).unwrap();

    engine.pickup_completed(&10);
    engine.pickup_completed(&10);

    let pickups =
        engine.hooks().names().iter().filter(|name| **name == "pickup_started").count();
    assert_eq!(pickups, 2);
    assert!(engine.get_storage_has_item(&5));
    assert!(engine.get_storage_has_item(&6));
    assert!(engine.hooks().names().contains(&"process_started"));
}
