// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pw-core: entity model and host contracts for the piecework engine.
//!
//! Everything here is plain data: workers, workstations, single-slot
//! storages, transport routes, dangling items, the host event enum, and the
//! hook trait the engine notifies the host through. The state machine that
//! moves this data lives in `pw-engine`.

pub mod macros;

pub mod dangling;
pub mod event;
pub mod hooks;
pub mod id;
pub mod priority;
pub mod storage;
pub mod transport;
pub mod worker;
pub mod workstation;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use dangling::DanglingItem;
pub use event::Event;
pub use hooks::{
    CycleCompleted, EngineHooks, ItemDelivered, NoHooks, PickupDanglingStarted, PickupStarted,
    ProcessCompleted, ProcessStarted, StatusChange, StoreStarted, TransportCompleted,
    TransportStarted, WorkerAssigned, WorkerChoice, WorkerReleased,
};
pub use id::{EntityId, ItemKind};
pub use priority::Priority;
pub use storage::{Storage, StorageRole};
#[cfg(any(test, feature = "test-support"))]
pub use test_support::RecordingHooks;
pub use transport::Transport;
pub use worker::{Assignment, CarryPhase, DanglingTask, Worker, WorkerState};
pub use workstation::{
    StepType, Workstation, WorkstationConfig, WorkstationConfigBuilder, WorkstationStatus,
};
