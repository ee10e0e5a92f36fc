// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only introspection. No query has side effects.

use crate::Engine;
use pw_core::{
    EngineHooks, EntityId, ItemKind, Storage, Worker, WorkerState, Workstation, WorkstationStatus,
};
use std::io;

/// Entity population snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub workers: usize,
    pub workstations: usize,
    pub storages: usize,
    pub transports: usize,
    pub dangling_items: usize,
}

impl<Id, It, H> Engine<Id, It, H>
where
    Id: EntityId,
    It: ItemKind,
    H: EngineHooks<Id, It>,
{
    pub fn get_worker_state(&self, id: &Id) -> Option<WorkerState> {
        self.workers.get(id).map(|worker| worker.state)
    }

    pub fn get_worker_info(&self, id: &Id) -> Option<&Worker<Id>> {
        self.workers.get(id)
    }

    pub fn get_workstation_status(&self, id: &Id) -> Option<WorkstationStatus> {
        self.workstations.get(id).map(|ws| ws.status)
    }

    pub fn get_workstation_info(&self, id: &Id) -> Option<&Workstation<Id>> {
        self.workstations.get(id)
    }

    /// `false` for unknown storages.
    pub fn get_storage_has_item(&self, id: &Id) -> bool {
        self.storages.get(id).is_some_and(Storage::has_item)
    }

    pub fn get_storage_item_type(&self, id: &Id) -> Option<It> {
        self.storages.get(id).and_then(|storage| storage.item.clone())
    }

    pub fn get_storage_info(&self, id: &Id) -> Option<&Storage<Id, It>> {
        self.storages.get(id)
    }

    /// Slots hold one unit, so full just means occupied.
    pub fn is_storage_full(&self, id: &Id) -> bool {
        self.get_storage_has_item(id)
    }

    /// `None` once the orphan has been delivered (or was never added).
    pub fn get_dangling_item_type(&self, id: &Id) -> Option<It> {
        self.dangling.get(id).map(|orphan| orphan.item.clone())
    }

    pub fn get_counts(&self) -> Counts {
        Counts {
            workers: self.workers.len(),
            workstations: self.workstations.len(),
            storages: self.storages.len(),
            transports: self.transports.len(),
            dangling_items: self.dangling.len(),
        }
    }

    /// Write a line-per-entity snapshot for diagnostics.
    pub fn dump_state<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for (id, worker) in &self.workers {
            writeln!(
                out,
                "worker {:?} state={} assignment={:?}",
                id, worker.state, worker.assignment
            )?;
        }
        for (id, ws) in &self.workstations {
            writeln!(
                out,
                "workstation {:?} status={} step={} worker={:?} cycles={} enabled={}",
                id, ws.status, ws.step, ws.assigned_worker, ws.cycles_completed, ws.enabled
            )?;
        }
        for (id, storage) in &self.storages {
            writeln!(
                out,
                "storage {:?} role={} item={:?} accepts={:?} priority={} workstation={:?}",
                id, storage.role, storage.item, storage.accepts, storage.priority,
                storage.workstation
            )?;
        }
        for (id, transport) in &self.transports {
            writeln!(
                out,
                "transport {:?} from={:?} to={:?} item={:?} priority={} worker={:?}",
                id, transport.from, transport.to, transport.item, transport.priority,
                transport.active_worker
            )?;
        }
        for (id, orphan) in &self.dangling {
            writeln!(out, "dangling {:?} item={:?} worker={:?}", id, orphan.item, orphan.assigned_worker)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "queries_tests.rs"]
mod tests;
