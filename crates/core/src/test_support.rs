// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers, available to other crates via the `test-support` feature.

use crate::hooks::{
    CycleCompleted, EngineHooks, ItemDelivered, PickupDanglingStarted, PickupStarted,
    ProcessCompleted, ProcessStarted, StatusChange, StoreStarted, TransportCompleted,
    TransportStarted, WorkerAssigned, WorkerReleased,
};
use std::fmt::Debug;

/// Hook sink recording every notification in arrival order.
///
/// Entries are compact one-liners (`"worker_assigned w=10 ws=100"`) so
/// ordering assertions stay readable; [`RecordingHooks::names`] strips them
/// down to the hook names.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    pub log: Vec<String>,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook names in emission order.
    pub fn names(&self) -> Vec<&str> {
        self.log.iter().map(|line| line.split(' ').next().unwrap_or(line)).collect()
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl<Id: Debug, It: Debug> EngineHooks<Id, It> for RecordingHooks {
    fn pickup_started(&mut self, p: PickupStarted<Id, It>) {
        self.log.push(format!(
            "pickup_started w={:?} ws={:?} eis={:?} item={:?}",
            p.worker, p.workstation, p.eis_storage, p.item
        ));
    }

    fn process_started(&mut self, p: ProcessStarted<Id>) {
        self.log.push(format!("process_started w={:?} ws={:?}", p.worker, p.workstation));
    }

    fn process_completed(&mut self, p: ProcessCompleted<Id>) {
        self.log.push(format!("process_completed w={:?} ws={:?}", p.worker, p.workstation));
    }

    fn store_started(&mut self, p: StoreStarted<Id, It>) {
        self.log.push(format!(
            "store_started w={:?} ws={:?} eos={:?} item={:?}",
            p.worker, p.workstation, p.eos_storage, p.item
        ));
    }

    fn worker_assigned(&mut self, p: WorkerAssigned<Id>) {
        self.log.push(format!("worker_assigned w={:?} ws={:?}", p.worker, p.workstation));
    }

    fn worker_released(&mut self, p: WorkerReleased<Id>) {
        self.log.push(format!("worker_released w={:?} ws={:?}", p.worker, p.workstation));
    }

    fn workstation_blocked(&mut self, p: StatusChange<Id>) {
        self.log.push(format!("workstation_blocked ws={:?} prio={}", p.workstation, p.priority));
    }

    fn workstation_queued(&mut self, p: StatusChange<Id>) {
        self.log.push(format!("workstation_queued ws={:?} prio={}", p.workstation, p.priority));
    }

    fn workstation_activated(&mut self, p: StatusChange<Id>) {
        self.log.push(format!("workstation_activated ws={:?} prio={}", p.workstation, p.priority));
    }

    fn transport_started(&mut self, p: TransportStarted<Id, It>) {
        self.log.push(format!(
            "transport_started w={:?} from={:?} to={:?} item={:?}",
            p.worker, p.from, p.to, p.item
        ));
    }

    fn transport_completed(&mut self, p: TransportCompleted<Id, It>) {
        self.log.push(format!(
            "transport_completed w={:?} from={:?} to={:?} item={:?}",
            p.worker, p.from, p.to, p.item
        ));
    }

    fn cycle_completed(&mut self, p: CycleCompleted<Id>) {
        self.log.push(format!(
            "cycle_completed ws={:?} w={:?} cycles={}",
            p.workstation, p.worker, p.cycles_completed
        ));
    }

    fn pickup_dangling_started(&mut self, p: PickupDanglingStarted<Id>) {
        self.log.push(format!(
            "pickup_dangling_started w={:?} item={:?} target={:?}",
            p.worker, p.item, p.target_eis
        ));
    }

    fn item_delivered(&mut self, p: ItemDelivered<Id>) {
        self.log.push(format!(
            "item_delivered w={:?} item={:?} target={:?}",
            p.worker, p.item, p.target_eis
        ));
    }
}

/// Proptest strategies for core types.
pub mod strategies {
    use crate::priority::Priority;
    use crate::storage::StorageRole;
    use proptest::prelude::*;

    pub fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Low),
            Just(Priority::Normal),
            Just(Priority::High),
            Just(Priority::Critical),
        ]
    }

    pub fn arb_role() -> impl Strategy<Value = StorageRole> {
        prop_oneof![
            Just(StorageRole::ExternalInput),
            Just(StorageRole::InternalInput),
            Just(StorageRole::InternalOutput),
            Just(StorageRole::ExternalOutput),
        ]
    }
}
