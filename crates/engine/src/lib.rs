// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pw-engine: the task orchestration state machine.
//!
//! One [`Engine`] value owns every worker, workstation, storage, transport
//! route, and dangling item, and advances them purely in reaction to host
//! events. Each handler mutates state, re-evaluates whatever the mutation
//! touched, runs one assignment pass, and notifies the host through its
//! [`EngineHooks`](pw_core::EngineHooks) sink, all before returning.
//!
//! The engine is single-threaded by contract: handlers take `&mut self`,
//! nothing suspends, and hooks cannot re-enter (they only ever receive the
//! hook sink itself). Hosts driving several worlds use one engine per world.

mod cycle;
mod eligibility;
mod error;
mod events;
mod queries;
mod scheduler;
mod store;

#[cfg(test)]
mod test_helpers;

pub use error::EngineError;
pub use queries::Counts;

use pw_core::{
    DanglingItem, EngineHooks, EntityId, ItemKind, Storage, Transport, Worker, Workstation,
};
use std::collections::BTreeMap;

/// Distance oracle consulted by the default worker selection: distance from a
/// worker to a workstation, `None` when unmeasurable.
pub type DistanceFn<Id> = Box<dyn Fn(&Id, &Id) -> Option<f32>>;

/// The task orchestration engine.
///
/// Entities live in ordered maps so every iteration, and with it every
/// smallest-id tiebreak, is deterministic. All cross-references are ids;
/// removing a referenced entity is legal and the reference simply falls out
/// of eligibility on the next re-evaluation.
pub struct Engine<Id, It, H> {
    workers: BTreeMap<Id, Worker<Id>>,
    storages: BTreeMap<Id, Storage<Id, It>>,
    workstations: BTreeMap<Id, Workstation<Id>>,
    transports: BTreeMap<Id, Transport<Id, It>>,
    dangling: BTreeMap<Id, DanglingItem<Id, It>>,
    hooks: H,
    distance: Option<DistanceFn<Id>>,
}

impl<Id, It, H> Engine<Id, It, H>
where
    Id: EntityId,
    It: ItemKind,
    H: EngineHooks<Id, It>,
{
    /// Engine with the host's hook sink and no distance oracle.
    pub fn new(hooks: H) -> Self {
        Self {
            workers: BTreeMap::new(),
            storages: BTreeMap::new(),
            workstations: BTreeMap::new(),
            transports: BTreeMap::new(),
            dangling: BTreeMap::new(),
            hooks,
            distance: None,
        }
    }

    /// Engine whose default worker selection prefers the nearest candidate
    /// according to `distance_fn`.
    pub fn new_with_distance(hooks: H, distance_fn: DistanceFn<Id>) -> Self {
        let mut engine = Self::new(hooks);
        engine.distance = Some(distance_fn);
        engine
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Tear down the engine and hand the hook sink back.
    pub fn into_hooks(self) -> H {
        self.hooks
    }
}
