// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host-to-engine event types.

use serde::{Deserialize, Serialize};

/// Notifications the host feeds into the engine.
///
/// Serializes with `{"type": "kind:verb", ...fields}` tags. Every event
/// answers with a did-anything-change bool; unknown ids and stale
/// combinations are silently ignored. Structural mutations (creating
/// entities, attaching storages) are fallible engine methods instead, since
/// they can be rejected outright.
///
/// Hooks must not call back into the engine; a host that needs to react
/// from a hook queues these values and drains the queue after the handler
/// returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event<Id, It> {
    // -- worker --
    #[serde(rename = "worker:available")]
    WorkerAvailable { id: Id },

    #[serde(rename = "worker:unavailable")]
    WorkerUnavailable { id: Id },

    // -- cycle steps --
    /// The assigned worker finished carrying a unit out of its pickup source.
    #[serde(rename = "step:pickup_completed")]
    PickupCompleted { worker: Id },

    /// Processing finished at a workstation, regardless of the timer.
    #[serde(rename = "step:work_completed")]
    WorkCompleted { workstation: Id },

    /// One host tick toward `process_duration`.
    #[serde(rename = "step:process_tick")]
    ProcessTick { workstation: Id },

    /// The assigned worker finished placing a unit at its destination.
    #[serde(rename = "step:store_completed")]
    StoreCompleted { worker: Id },

    // -- storage --
    #[serde(rename = "storage:item_added")]
    ItemAdded { storage: Id, item: It },

    #[serde(rename = "storage:item_removed")]
    ItemRemoved { storage: Id },

    // -- workstation --
    #[serde(rename = "workstation:disabled")]
    WorkstationDisabled { workstation: Id },

    #[serde(rename = "workstation:enabled")]
    WorkstationEnabled { workstation: Id },

    // -- dangling --
    /// Re-run assignment so deliverable orphans get picked up.
    #[serde(rename = "dangling:evaluate")]
    EvaluateDanglingItems,
}

impl<Id, It> Event<Id, It> {
    /// Event name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Event::WorkerAvailable { .. } => "worker:available",
            Event::WorkerUnavailable { .. } => "worker:unavailable",
            Event::PickupCompleted { .. } => "step:pickup_completed",
            Event::WorkCompleted { .. } => "step:work_completed",
            Event::ProcessTick { .. } => "step:process_tick",
            Event::StoreCompleted { .. } => "step:store_completed",
            Event::ItemAdded { .. } => "storage:item_added",
            Event::ItemRemoved { .. } => "storage:item_removed",
            Event::WorkstationDisabled { .. } => "workstation:disabled",
            Event::WorkstationEnabled { .. } => "workstation:enabled",
            Event::EvaluateDanglingItems => "dangling:evaluate",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
