// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workers and their bindings to work.

use serde::{Deserialize, Serialize};

/// Availability of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    /// Ready for assignment.
    Idle,
    /// Bound to a workstation, transport, or dangling delivery.
    Working,
    /// Withdrawn by the host; ignored by the scheduler.
    Unavailable,
}

crate::simple_display! {
    WorkerState {
        Idle => "idle",
        Working => "working",
        Unavailable => "unavailable",
    }
}

/// Leg of a two-step carry task (transport run or dangling delivery).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarryPhase {
    /// Walking to the source; nothing in hand yet.
    Pickup,
    /// Unit in hand, heading for the destination.
    Deliver,
}

crate::simple_display! {
    CarryPhase {
        Pickup => "pickup",
        Deliver => "deliver",
    }
}

/// What a working worker is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignment<Id> {
    /// Running cycles at a workstation. The current step lives on the
    /// workstation record.
    Workstation { workstation: Id },
    /// Serving a recurring transport route.
    Transport { route: Id, phase: CarryPhase },
    /// Ferrying a dangling item to its target slot.
    Dangling { item: Id, phase: CarryPhase },
}

/// Routing latched when a dangling delivery is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingTask<Id> {
    pub item: Id,
    /// External input slot chosen at assignment time.
    pub target: Id,
}

/// A worker instance.
///
/// Invariant: `state == Idle` exactly when `assignment` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker<Id> {
    pub state: WorkerState,
    pub assignment: Option<Assignment<Id>>,
    pub dangling_task: Option<DanglingTask<Id>>,
}

impl<Id> Worker<Id> {
    /// New workers start idle.
    pub fn new() -> Self {
        Self { state: WorkerState::Idle, assignment: None, dangling_task: None }
    }

    pub fn is_idle(&self) -> bool {
        self.state == WorkerState::Idle
    }

    /// Workstation this worker is bound to, if any.
    pub fn workstation(&self) -> Option<&Id> {
        match &self.assignment {
            Some(Assignment::Workstation { workstation }) => Some(workstation),
            _ => None,
        }
    }

    /// Drop any binding and return to idle.
    pub fn release(&mut self) {
        self.state = WorkerState::Idle;
        self.assignment = None;
        self.dangling_task = None;
    }
}

impl<Id> Default for Worker<Id> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
