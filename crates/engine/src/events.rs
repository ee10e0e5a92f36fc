// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host event intake.
//!
//! Every handler returns whether any state changed. Unknown ids and stale
//! combinations (a completion for a worker not in the matching step, a
//! redundant availability flip) are silently ignored and answer `false`.
//! Handlers finish with one scheduler pass, so a single event both settles
//! its own consequences and hands out any work it freed up.

use crate::Engine;
use pw_core::{EngineHooks, EntityId, Event, ItemKind, WorkerState};
use tracing::debug;

impl<Id, It, H> Engine<Id, It, H>
where
    Id: EntityId,
    It: ItemKind,
    H: EngineHooks<Id, It>,
{
    /// Route one typed event to its handler.
    pub fn handle_event(&mut self, event: Event<Id, It>) -> bool {
        debug!(event = event.name(), "event");
        match event {
            Event::WorkerAvailable { id } => self.worker_available(&id),
            Event::WorkerUnavailable { id } => self.worker_unavailable(&id),
            Event::PickupCompleted { worker } => self.pickup_completed(&worker),
            Event::WorkCompleted { workstation } => self.work_completed(&workstation),
            Event::ProcessTick { workstation } => self.process_tick(&workstation),
            Event::StoreCompleted { worker } => self.store_completed(&worker),
            Event::ItemAdded { storage, item } => self.item_added(&storage, item),
            Event::ItemRemoved { storage } => self.item_removed(&storage),
            Event::WorkstationDisabled { workstation } => self.workstation_disabled(&workstation),
            Event::WorkstationEnabled { workstation } => self.workstation_enabled(&workstation),
            Event::EvaluateDanglingItems => self.evaluate_dangling_items(),
        }
    }

    /// The worker is back; offer it work right away.
    pub fn worker_available(&mut self, id: &Id) -> bool {
        match self.workers.get_mut(id) {
            Some(worker) if worker.state == WorkerState::Unavailable => {
                worker.state = WorkerState::Idle;
                debug!(worker = ?id, "worker available");
                self.run_scheduler();
                true
            }
            _ => false,
        }
    }

    /// Withdraw a worker. A working worker abandons its task: the
    /// workstation keeps its slot progress and re-queues, a carried
    /// transport unit goes back to its source when possible, a dangling
    /// delivery returns to the pool.
    pub fn worker_unavailable(&mut self, id: &Id) -> bool {
        let Some(state) = self.workers.get(id).map(|worker| worker.state) else {
            return false;
        };
        match state {
            WorkerState::Unavailable => false,
            WorkerState::Idle => {
                if let Some(worker) = self.workers.get_mut(id) {
                    worker.state = WorkerState::Unavailable;
                }
                debug!(worker = ?id, "worker unavailable");
                true
            }
            WorkerState::Working => {
                self.unbind_worker(id);
                if let Some(worker) = self.workers.get_mut(id) {
                    worker.state = WorkerState::Unavailable;
                }
                debug!(worker = ?id, "worker unavailable, task abandoned");
                self.run_scheduler();
                true
            }
        }
    }

    /// The worker finished its pickup leg (workstation, transport, or
    /// dangling). No-op unless the worker is in a matching step.
    pub fn pickup_completed(&mut self, worker: &Id) -> bool {
        let changed = self.handle_pickup_completed(worker);
        if changed {
            self.run_scheduler();
        }
        changed
    }

    /// Processing finished at the workstation. No-op unless it is actively
    /// processing.
    pub fn work_completed(&mut self, workstation: &Id) -> bool {
        let changed = self.handle_work_completed(workstation);
        if changed {
            self.run_scheduler();
        }
        changed
    }

    /// One host tick toward the workstation's `process_duration`.
    pub fn process_tick(&mut self, workstation: &Id) -> bool {
        let changed = self.handle_process_tick(workstation);
        if changed {
            self.run_scheduler();
        }
        changed
    }

    /// The worker finished its store leg. No-op unless the worker is in a
    /// matching step.
    pub fn store_completed(&mut self, worker: &Id) -> bool {
        let changed = self.handle_store_completed(worker);
        if changed {
            self.run_scheduler();
        }
        changed
    }

    /// The host placed an item into a storage slot. Refused (returning
    /// `false`) when the slot is unknown, occupied, or typed differently.
    pub fn item_added(&mut self, storage: &Id, item: It) -> bool {
        let placed = self.storages.get_mut(storage).is_some_and(|slot| slot.put(item));
        if !placed {
            return false;
        }
        debug!(storage = ?storage, "item added");
        self.fan_out(storage);
        self.run_scheduler();
        true
    }

    /// The host took the item out of a storage slot.
    pub fn item_removed(&mut self, storage: &Id) -> bool {
        let removed = self.storages.get_mut(storage).and_then(|slot| slot.take()).is_some();
        if !removed {
            return false;
        }
        debug!(storage = ?storage, "item removed");
        self.fan_out(storage);
        self.run_scheduler();
        true
    }

    /// Force the workstation Blocked, releasing any worker. Slot contents
    /// survive for when it is re-enabled.
    pub fn workstation_disabled(&mut self, workstation: &Id) -> bool {
        {
            let Some(ws) = self.workstations.get_mut(workstation) else {
                return false;
            };
            if !ws.enabled {
                return false;
            }
            ws.enabled = false;
        }
        debug!(workstation = ?workstation, "workstation disabled");
        let active_worker =
            self.workstations.get(workstation).and_then(|ws| ws.assigned_worker.clone());
        if let Some(worker) = active_worker {
            self.release_workstation_worker(workstation, &worker);
        } else {
            self.refresh_status(workstation);
        }
        self.run_scheduler();
        true
    }

    /// Lift a disable and re-evaluate.
    pub fn workstation_enabled(&mut self, workstation: &Id) -> bool {
        {
            let Some(ws) = self.workstations.get_mut(workstation) else {
                return false;
            };
            if ws.enabled {
                return false;
            }
            ws.enabled = true;
        }
        debug!(workstation = ?workstation, "workstation enabled");
        self.refresh_status(workstation);
        self.run_scheduler();
        true
    }

    /// Re-run assignment so deliverable orphans get picked up.
    pub fn evaluate_dangling_items(&mut self) -> bool {
        self.run_scheduler()
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
