// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Universal invariants checked against arbitrary event sequences.

use crate::common::{engine, Good, TestEngine};
use proptest::prelude::*;
use pw_core::{
    Assignment, Storage, StorageRole, Transport, WorkstationConfig, WorkstationStatus,
};
use std::collections::BTreeMap;

const WORKERS: [u32; 2] = [10, 11];
const WORKSTATIONS: [u32; 2] = [100, 200];
const STORAGES: [u32; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

/// Two chained stations, a transport bridging them, one orphan, two workers.
/// Station 100 mills Flour into Bread; transport 70 carries Bread from the
/// mill's sink into station 200's staging slot; station 200 cooks Bread into
/// Stew.
fn world() -> TestEngine {
    let mut engine = engine();
    engine.add_storage(1, Storage::new(StorageRole::ExternalInput).item(Good::Flour)).unwrap();
    engine.add_storage(2, Storage::new(StorageRole::InternalInput).accepts(Good::Flour)).unwrap();
    engine
        .add_storage(3, Storage::new(StorageRole::InternalOutput).accepts(Good::Bread))
        .unwrap();
    engine.add_storage(4, Storage::new(StorageRole::ExternalOutput)).unwrap();
    engine
        .add_storage(5, Storage::new(StorageRole::ExternalInput).accepts(Good::Bread))
        .unwrap();
    engine.add_storage(6, Storage::new(StorageRole::InternalInput).accepts(Good::Bread)).unwrap();
    engine
        .add_storage(7, Storage::new(StorageRole::InternalOutput).accepts(Good::Stew))
        .unwrap();
    engine.add_storage(8, Storage::new(StorageRole::ExternalOutput)).unwrap();
    engine
        .add_workstation(
            100,
            WorkstationConfig::builder().eis([1]).iis([2]).ios([3]).eos([4]).build(),
        )
        .unwrap();
    engine
        .add_workstation(
            200,
            WorkstationConfig::builder().eis([5]).iis([6]).ios([7]).eos([8]).build(),
        )
        .unwrap();
    engine.add_transport(70, Transport::new(4, 5, Good::Bread)).unwrap();
    engine.add_dangling_item(50, Good::Flour).unwrap();
    engine.add_worker(WORKERS[0]).unwrap();
    engine.add_worker(WORKERS[1]).unwrap();
    engine
}

#[derive(Debug, Clone)]
enum Op {
    WorkerAvailable(u32),
    WorkerUnavailable(u32),
    PickupCompleted(u32),
    WorkCompleted(u32),
    ProcessTick(u32),
    StoreCompleted(u32),
    ItemAdded(u32, Good),
    ItemRemoved(u32),
    Disable(u32),
    Enable(u32),
    Evaluate,
}

fn arb_good() -> impl Strategy<Value = Good> {
    prop_oneof![
        Just(Good::Flour),
        Just(Good::Bread),
        Just(Good::Veg),
        Just(Good::Meat),
        Just(Good::Stew),
    ]
}

fn arb_worker() -> impl Strategy<Value = u32> {
    // includes an id the engine has never seen
    prop_oneof![Just(10), Just(11), Just(99)]
}

fn arb_workstation() -> impl Strategy<Value = u32> {
    prop_oneof![Just(100), Just(200), Just(999)]
}

fn arb_storage() -> impl Strategy<Value = u32> {
    prop_oneof![(1u32..=8).boxed(), Just(999).boxed()]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_worker().prop_map(Op::WorkerAvailable),
        arb_worker().prop_map(Op::WorkerUnavailable),
        arb_worker().prop_map(Op::PickupCompleted),
        arb_workstation().prop_map(Op::WorkCompleted),
        arb_workstation().prop_map(Op::ProcessTick),
        arb_worker().prop_map(Op::StoreCompleted),
        (arb_storage(), arb_good()).prop_map(|(id, good)| Op::ItemAdded(id, good)),
        arb_storage().prop_map(Op::ItemRemoved),
        arb_workstation().prop_map(Op::Disable),
        arb_workstation().prop_map(Op::Enable),
        Just(Op::Evaluate),
    ]
}

fn apply(engine: &mut TestEngine, op: &Op) {
    match op {
        Op::WorkerAvailable(id) => engine.worker_available(id),
        Op::WorkerUnavailable(id) => engine.worker_unavailable(id),
        Op::PickupCompleted(id) => engine.pickup_completed(id),
        Op::WorkCompleted(id) => engine.work_completed(id),
        Op::ProcessTick(id) => engine.process_tick(id),
        Op::StoreCompleted(id) => engine.store_completed(id),
        Op::ItemAdded(id, good) => engine.item_added(id, *good),
        Op::ItemRemoved(id) => engine.item_removed(id),
        Op::Disable(id) => engine.workstation_disabled(id),
        Op::Enable(id) => engine.workstation_enabled(id),
        Op::Evaluate => engine.evaluate_dangling_items(),
    };
}

/// The eligibility rule, recomputed independently from the public query
/// surface: FLUSH, PRODUCE, or PICKUP must hold (producers and degenerate
/// wirings per their own rules).
fn eligible(engine: &TestEngine, ws_id: u32) -> bool {
    let Some(ws) = engine.get_workstation_info(&ws_id) else {
        return false;
    };
    let slots = |ids: &[u32]| -> Vec<(Option<Good>, Option<Good>)> {
        ids.iter()
            .filter_map(|id| engine.get_storage_info(id))
            .map(|s| (s.item, s.accepts))
            .collect()
    };
    let eis = slots(&ws.eis);
    let iis = slots(&ws.iis);
    let ios = slots(&ws.ios);
    let eos = slots(&ws.eos);
    let takes = |(item, accepts): &(Option<Good>, Option<Good>), good: &Good| {
        item.is_none() && accepts.map_or(true, |a| a == *good)
    };

    let flush = ios.iter().any(|(item, _)| {
        item.as_ref().is_some_and(|good| eos.iter().any(|slot| takes(slot, good)))
    });
    if iis.is_empty() && ios.is_empty() {
        return false;
    }
    if eis.is_empty() && iis.is_empty() {
        return flush || ios.iter().any(|(item, _)| item.is_none());
    }
    let produce = iis.iter().all(|(item, _)| item.is_some())
        && ios.iter().all(|(item, _)| item.is_none());
    let space = eos.is_empty() || eos.iter().any(|(item, _)| item.is_none());
    let pickup = space
        && eis.iter().any(|(item, _)| {
            item.as_ref().is_some_and(|good| iis.iter().any(|slot| takes(slot, good)))
        });
    flush || produce || pickup
}

fn check_invariants(engine: &TestEngine, cycles_seen: &mut BTreeMap<u32, u64>) {
    // status matches the eligibility predicate, and Active means a live,
    // back-pointing worker binding
    for ws_id in WORKSTATIONS {
        let ws = engine.get_workstation_info(&ws_id).expect("workstation exists");
        match ws.status {
            WorkstationStatus::Active => {
                let worker_id = ws.assigned_worker.expect("active implies a worker");
                let worker = engine.get_worker_info(&worker_id).expect("bound worker exists");
                assert_eq!(
                    worker.assignment,
                    Some(Assignment::Workstation { workstation: ws_id }),
                    "worker {worker_id} does not point back at {ws_id}"
                );
            }
            WorkstationStatus::Queued => {
                assert!(ws.assigned_worker.is_none());
                assert!(ws.enabled && eligible(engine, ws_id), "queued but not eligible");
            }
            WorkstationStatus::Blocked => {
                assert!(ws.assigned_worker.is_none());
                assert!(
                    !ws.enabled || !eligible(engine, ws_id),
                    "blocked but eligible and enabled"
                );
            }
        }
        // cycle counter only ever grows
        let seen = cycles_seen.entry(ws_id).or_insert(0);
        assert!(ws.cycles_completed >= *seen, "cycles went backwards");
        *seen = ws.cycles_completed;
    }

    // a worker is idle exactly when unassigned
    for worker_id in WORKERS {
        let worker = engine.get_worker_info(&worker_id).expect("worker exists");
        assert_eq!(
            worker.state == pw_core::WorkerState::Idle,
            worker.assignment.is_none(),
            "idle/assignment mismatch on worker {worker_id}"
        );
    }

    // typed slots only ever hold their declared item
    for storage_id in STORAGES {
        let storage = engine.get_storage_info(&storage_id).expect("storage exists");
        if let (Some(item), Some(accepts)) = (&storage.item, &storage.accepts) {
            assert_eq!(item, accepts, "slot {storage_id} holds a foreign item");
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn invariants_hold_under_arbitrary_event_sequences(
        ops in proptest::collection::vec(arb_op(), 1..60)
    ) {
        let mut engine = world();
        let mut cycles_seen = BTreeMap::new();
        check_invariants(&engine, &mut cycles_seen);
        for op in &ops {
            apply(&mut engine, op);
            check_invariants(&engine, &mut cycles_seen);
        }
    }

    #[test]
    fn scheduler_is_idempotent_after_any_sequence(
        ops in proptest::collection::vec(arb_op(), 1..40)
    ) {
        let mut engine = world();
        for op in &ops {
            apply(&mut engine, op);
        }
        // settle, then a re-run must neither bind nor notify
        engine.evaluate_dangling_items();
        engine.hooks_mut().clear();
        prop_assert!(!engine.evaluate_dangling_items());
        prop_assert!(engine.hooks().log.is_empty());
    }
}
