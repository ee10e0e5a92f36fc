// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-to-host notifications.
//!
//! The engine announces every observable transition through [`EngineHooks`].
//! Hosts implement only the methods they care about; the defaults do nothing
//! and cost nothing. Payloads arrive by value.

use crate::priority::Priority;
use serde::{Deserialize, Serialize};

/// A worker started carrying from an external input slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupStarted<Id, It> {
    pub worker: Id,
    pub workstation: Id,
    pub eis_storage: Id,
    pub item: It,
}

/// Processing began at a workstation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStarted<Id> {
    pub worker: Id,
    pub workstation: Id,
}

/// Processing finished; recipe outputs are now staged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessCompleted<Id> {
    pub worker: Id,
    pub workstation: Id,
}

/// A worker started moving an output to an external sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStarted<Id, It> {
    pub worker: Id,
    pub workstation: Id,
    pub eos_storage: Id,
    pub item: It,
}

/// A worker was bound to a workstation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerAssigned<Id> {
    pub worker: Id,
    pub workstation: Id,
}

/// A workstation let go of its worker (cycle end, abandonment, disable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReleased<Id> {
    pub worker: Id,
    pub workstation: Id,
}

/// A workstation moved between Blocked, Queued, and Active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange<Id> {
    pub workstation: Id,
    pub priority: Priority,
}

/// A worker took on a transport run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportStarted<Id, It> {
    pub worker: Id,
    pub from: Id,
    pub to: Id,
    pub item: It,
}

/// A transport run delivered its unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportCompleted<Id, It> {
    pub worker: Id,
    pub from: Id,
    pub to: Id,
    pub item: It,
}

/// A workstation finished one full cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCompleted<Id> {
    pub workstation: Id,
    pub worker: Id,
    pub cycles_completed: u64,
}

/// A worker set off to fetch an orphan item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupDanglingStarted<Id> {
    pub worker: Id,
    pub item: Id,
    pub target_eis: Id,
}

/// An orphan item landed in its target slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDelivered<Id> {
    pub worker: Id,
    pub item: Id,
    pub target_eis: Id,
}

/// Host's answer when the scheduler asks which idle worker to place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerChoice<Id> {
    /// Let the engine pick (distance tiebreak when available, else smallest id).
    Auto,
    /// Use this worker; a stale pick (unknown or busy) skips the work item.
    Pick(Id),
    /// Leave the work item unassigned for the rest of this pass.
    Skip,
}

/// Host-side sink for engine notifications.
///
/// Within one event call the emission order is fixed: mutations land before
/// their notification, and `worker_assigned` precedes
/// `workstation_activated` precedes the entry step's `*_started` hook.
pub trait EngineHooks<Id, It> {
    fn pickup_started(&mut self, _payload: PickupStarted<Id, It>) {}

    fn process_started(&mut self, _payload: ProcessStarted<Id>) {}

    fn process_completed(&mut self, _payload: ProcessCompleted<Id>) {}

    fn store_started(&mut self, _payload: StoreStarted<Id, It>) {}

    fn worker_assigned(&mut self, _payload: WorkerAssigned<Id>) {}

    fn worker_released(&mut self, _payload: WorkerReleased<Id>) {}

    fn workstation_blocked(&mut self, _payload: StatusChange<Id>) {}

    fn workstation_queued(&mut self, _payload: StatusChange<Id>) {}

    fn workstation_activated(&mut self, _payload: StatusChange<Id>) {}

    fn transport_started(&mut self, _payload: TransportStarted<Id, It>) {}

    fn transport_completed(&mut self, _payload: TransportCompleted<Id, It>) {}

    fn cycle_completed(&mut self, _payload: CycleCompleted<Id>) {}

    fn pickup_dangling_started(&mut self, _payload: PickupDanglingStarted<Id>) {}

    fn item_delivered(&mut self, _payload: ItemDelivered<Id>) {}

    /// Pick an idle worker for a work item. `workstation` is `None` for
    /// transports and dangling deliveries; `candidates` is sorted by id and
    /// never empty.
    fn find_best_worker(
        &mut self,
        _workstation: Option<&Id>,
        _candidates: &[Id],
    ) -> WorkerChoice<Id> {
        WorkerChoice::Auto
    }
}

/// Hook sink that ignores everything.
pub struct NoHooks;

impl<Id, It> EngineHooks<Id, It> for NoHooks {}

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;
