// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Round-trip laws, boundary behaviors, and ordering guarantees.

use crate::common::{engine, mill, Good};
use pw_core::{Storage, StorageRole, StepType, WorkerState, WorkstationConfig, WorkstationStatus};

// ============================================================================
// round-trip laws
// ============================================================================

#[test]
fn full_cycle_conserves_exactly_one_unit() {
    let mut engine = mill();
    engine.add_worker(10).unwrap();
    engine.pickup_completed(&10);
    engine.work_completed(&100);
    engine.store_completed(&10);

    assert!(!engine.get_storage_has_item(&1));
    assert!(!engine.get_storage_has_item(&2));
    assert!(!engine.get_storage_has_item(&3));
    assert!(engine.get_storage_has_item(&4));
    assert_eq!(engine.get_workstation_info(&100).unwrap().cycles_completed, 1);
}

#[test]
fn unavailable_then_available_resumes_and_completes() {
    let mut engine = mill();
    engine.add_worker(10).unwrap();
    engine.pickup_completed(&10); // flour staged in the recipe slot

    assert!(engine.worker_unavailable(&10));
    assert!(engine.get_storage_has_item(&2));
    assert_eq!(engine.get_workstation_status(&100), Some(WorkstationStatus::Queued));

    assert!(engine.worker_available(&10));
    // storage contents dictate the resume point: straight to Process
    assert_eq!(engine.get_workstation_info(&100).unwrap().step, StepType::Process);
    engine.work_completed(&100);
    engine.store_completed(&10);
    assert_eq!(engine.get_workstation_info(&100).unwrap().cycles_completed, 1);
    assert!(engine.get_storage_has_item(&4));
}

// ============================================================================
// boundary behaviors
// ============================================================================

#[test]
fn producer_begins_at_process_on_assignment() {
    let mut engine = engine();
    engine
        .add_storage(3, Storage::new(StorageRole::InternalOutput).accepts(Good::Bread))
        .unwrap();
    engine.add_storage(4, Storage::new(StorageRole::ExternalOutput)).unwrap();
    engine.add_workstation(100, WorkstationConfig::builder().ios([3]).eos([4]).build()).unwrap();
    engine.add_worker(10).unwrap();

    assert_eq!(engine.get_workstation_info(&100).unwrap().step, StepType::Process);
    assert!(engine.hooks().names().contains(&"process_started"));
}

#[test]
fn station_without_sinks_closes_the_cycle_at_process_end() {
    let mut engine = engine();
    engine.add_storage(1, Storage::new(StorageRole::ExternalInput).item(Good::Flour)).unwrap();
    engine.add_storage(2, Storage::new(StorageRole::InternalInput).accepts(Good::Flour)).unwrap();
    engine
        .add_storage(3, Storage::new(StorageRole::InternalOutput).accepts(Good::Bread))
        .unwrap();
    engine
        .add_workstation(100, WorkstationConfig::builder().eis([1]).iis([2]).ios([3]).build())
        .unwrap();
    engine.add_worker(10).unwrap();

    engine.pickup_completed(&10);
    engine.work_completed(&100);
    assert_eq!(engine.get_workstation_info(&100).unwrap().cycles_completed, 1);
    assert_eq!(engine.get_worker_state(&10), Some(WorkerState::Idle));
}

#[test]
fn dangling_item_waits_for_an_accepting_slot() {
    let mut engine = engine();
    engine
        .add_storage(
            1,
            Storage::new(StorageRole::ExternalInput).accepts(Good::Flour).item(Good::Flour),
        )
        .unwrap();
    engine.add_worker(10).unwrap();
    engine.add_dangling_item(50, Good::Flour).unwrap();
    assert_eq!(engine.get_worker_state(&10), Some(WorkerState::Idle));

    assert!(engine.item_removed(&1));
    assert_eq!(engine.get_worker_state(&10), Some(WorkerState::Working));
}

// ============================================================================
// ordering and idempotency guarantees
// ============================================================================

#[test]
fn assignment_hook_order_is_fixed() {
    let mut engine = mill();
    engine.add_worker(10).unwrap();
    let names = engine.hooks().names();
    let assigned = names.iter().position(|n| *n == "worker_assigned").unwrap();
    let activated = names.iter().position(|n| *n == "workstation_activated").unwrap();
    let started = names.iter().position(|n| *n == "pickup_started").unwrap();
    assert!(assigned < activated && activated < started, "order was {names:?}");
}

#[test]
fn scheduler_reruns_are_silent_without_new_events() {
    let mut engine = mill();
    engine.add_worker(10).unwrap();
    engine.hooks_mut().clear();

    assert!(!engine.evaluate_dangling_items());
    assert!(engine.hooks().log.is_empty());

    assert!(!engine.evaluate_dangling_items());
    assert!(engine.hooks().log.is_empty());
}

#[test]
fn cycles_completed_is_monotonic_across_interruptions() {
    let mut engine = mill();
    engine.add_worker(10).unwrap();
    let mut last = 0;
    for _ in 0..3 {
        engine.worker_unavailable(&10);
        engine.worker_available(&10);
        let cycles = engine.get_workstation_info(&100).unwrap().cycles_completed;
        assert!(cycles >= last);
        last = cycles;
    }
}
