// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workstations: slot-wired machines workers run cycles at.

use crate::priority::Priority;
use serde::{Deserialize, Serialize};

/// Whether a workstation can take, is waiting for, or has a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkstationStatus {
    /// Cannot progress; not offered to the scheduler.
    Blocked,
    /// Ready for a worker.
    Queued,
    /// A worker is running its cycle.
    Active,
}

crate::simple_display! {
    WorkstationStatus {
        Blocked => "blocked",
        Queued => "queued",
        Active => "active",
    }
}

/// Step of the workstation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    /// Move staged input into the recipe slots.
    Pickup,
    /// Convert ingredients into outputs.
    Process,
    /// Move outputs into the external sinks.
    Store,
}

crate::simple_display! {
    StepType {
        Pickup => "pickup",
        Process => "process",
        Store => "store",
    }
}

/// Wiring and tuning for a new workstation.
///
/// The four lists name storages by id; order matters only as the positional
/// "first" used when draining outputs. Lists may be empty; a workstation
/// with no external inputs and no recipe inputs is a producer and starts its
/// cycles at [`StepType::Process`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkstationConfig<Id> {
    pub eis: Vec<Id>,
    pub iis: Vec<Id>,
    pub ios: Vec<Id>,
    pub eos: Vec<Id>,
    pub priority: Priority,
    /// Host tick count a process step nominally takes; `0` leaves completion
    /// entirely to `work_completed`.
    pub process_duration: u32,
}

impl<Id> WorkstationConfig<Id> {
    pub fn builder() -> WorkstationConfigBuilder<Id> {
        WorkstationConfigBuilder {
            eis: Vec::new(),
            iis: Vec::new(),
            ios: Vec::new(),
            eos: Vec::new(),
            priority: Priority::Normal,
            process_duration: 0,
        }
    }
}

pub struct WorkstationConfigBuilder<Id> {
    eis: Vec<Id>,
    iis: Vec<Id>,
    ios: Vec<Id>,
    eos: Vec<Id>,
    priority: Priority,
    process_duration: u32,
}

impl<Id> WorkstationConfigBuilder<Id> {
    crate::setters! {
        into {
            eis: Vec<Id>,
            iis: Vec<Id>,
            ios: Vec<Id>,
            eos: Vec<Id>,
        }
        set {
            priority: Priority,
            process_duration: u32,
        }
    }

    pub fn build(self) -> WorkstationConfig<Id> {
        WorkstationConfig {
            eis: self.eis,
            iis: self.iis,
            ios: self.ios,
            eos: self.eos,
            priority: self.priority,
            process_duration: self.process_duration,
        }
    }
}

/// A workstation instance.
///
/// Invariants:
/// - `status == Active` exactly when `assigned_worker` is set, and the named
///   worker's assignment points back here.
/// - `selected_eis` / `selected_eos` are latched while the corresponding step
///   runs and cleared on step end or cycle reset.
/// - `process_timer` is meaningful only while `step == Process` and Active.
/// - `cycles_completed` only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workstation<Id> {
    pub eis: Vec<Id>,
    pub iis: Vec<Id>,
    pub ios: Vec<Id>,
    pub eos: Vec<Id>,
    pub priority: Priority,
    pub status: WorkstationStatus,
    pub assigned_worker: Option<Id>,
    pub step: StepType,
    pub process_duration: u32,
    pub process_timer: u32,
    pub cycles_completed: u64,
    pub selected_eis: Option<Id>,
    pub selected_eos: Option<Id>,
    /// Cleared by `workstation_disabled`; a disabled workstation is forced
    /// Blocked until re-enabled.
    pub enabled: bool,
}

impl<Id> Workstation<Id> {
    pub fn new(config: WorkstationConfig<Id>) -> Self {
        Self {
            eis: config.eis,
            iis: config.iis,
            ios: config.ios,
            eos: config.eos,
            priority: config.priority,
            status: WorkstationStatus::Blocked,
            assigned_worker: None,
            step: StepType::Pickup,
            process_duration: config.process_duration,
            process_timer: 0,
            cycles_completed: 0,
            selected_eis: None,
            selected_eos: None,
            enabled: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == WorkstationStatus::Active
    }

    /// Forget latched slot choices.
    pub fn clear_selections(&mut self) {
        self.selected_eis = None;
        self.selected_eos = None;
    }

    /// Return the cycle to its nominal entry; slot contents are untouched.
    pub fn reset_cycle(&mut self) {
        self.step = StepType::Pickup;
        self.process_timer = 0;
        self.clear_selections();
    }
}

#[cfg(test)]
#[path = "workstation_tests.rs"]
mod tests;
