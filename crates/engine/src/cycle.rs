// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The cycle state machine: Pickup, Process, Store.
//!
//! Steps advance only on host completion events. Pickup and Store repeat
//! while more recipe slots can be filled or drained; Process is one shot.
//! When a step's preconditions vanish mid-cycle (a slot mutated externally),
//! the worker is handed back with slot contents preserved, and the next
//! assignment resumes from whatever step the contents dictate.

use crate::Engine;
use pw_core::{
    Assignment, CarryPhase, CycleCompleted, EngineHooks, EntityId, ItemDelivered, ItemKind,
    PickupStarted, ProcessCompleted, ProcessStarted, StatusChange, StepType, StoreStarted,
    TransportCompleted, WorkerReleased, WorkstationStatus,
};
use tracing::{debug, warn};

impl<Id, It, H> Engine<Id, It, H>
where
    Id: EntityId,
    It: ItemKind,
    H: EngineHooks<Id, It>,
{
    /// Start `step` for the bound worker: latch slot choices and emit the
    /// `*_started` hook. `false` when the step has nothing to work on.
    pub(crate) fn enter_step(&mut self, ws_id: &Id, worker_id: &Id, step: StepType) -> bool {
        match step {
            StepType::Pickup => {
                let Some(eis_id) =
                    self.workstations.get(ws_id).and_then(|ws| self.select_eis(ws))
                else {
                    return false;
                };
                let Some(item) = self.storages.get(&eis_id).and_then(|s| s.item.clone()) else {
                    return false;
                };
                if let Some(ws) = self.workstations.get_mut(ws_id) {
                    ws.step = StepType::Pickup;
                    ws.selected_eis = Some(eis_id.clone());
                }
                debug!(workstation = ?ws_id, eis = ?eis_id, "pickup started");
                self.hooks.pickup_started(PickupStarted {
                    worker: worker_id.clone(),
                    workstation: ws_id.clone(),
                    eis_storage: eis_id,
                    item,
                });
                true
            }
            StepType::Process => {
                if let Some(ws) = self.workstations.get_mut(ws_id) {
                    ws.step = StepType::Process;
                    ws.process_timer = 0;
                }
                debug!(workstation = ?ws_id, "process started");
                self.hooks.process_started(ProcessStarted {
                    worker: worker_id.clone(),
                    workstation: ws_id.clone(),
                });
                true
            }
            StepType::Store => {
                let staged = self.workstations.get(ws_id).and_then(|ws| {
                    self.resolved(&ws.ios).find_map(|(_, slot)| slot.item.clone())
                });
                let Some(item) = staged else {
                    return false;
                };
                let Some(eos_id) =
                    self.workstations.get(ws_id).and_then(|ws| self.select_eos(ws, &item))
                else {
                    return false;
                };
                if let Some(ws) = self.workstations.get_mut(ws_id) {
                    ws.step = StepType::Store;
                    ws.selected_eos = Some(eos_id.clone());
                }
                debug!(workstation = ?ws_id, eos = ?eos_id, "store started");
                self.hooks.store_started(StoreStarted {
                    worker: worker_id.clone(),
                    workstation: ws_id.clone(),
                    eos_storage: eos_id,
                    item,
                });
                true
            }
        }
    }

    /// The worker finished carrying a unit out of its pickup source.
    pub(crate) fn handle_pickup_completed(&mut self, worker_id: &Id) -> bool {
        let Some(assignment) = self.workers.get(worker_id).and_then(|w| w.assignment.clone())
        else {
            return false;
        };
        match assignment {
            Assignment::Workstation { workstation } => {
                self.workstation_pickup_completed(&workstation, worker_id)
            }
            Assignment::Transport { route, phase: CarryPhase::Pickup } => {
                self.transport_pickup_completed(&route, worker_id)
            }
            Assignment::Dangling { item, phase: CarryPhase::Pickup } => {
                if let Some(worker) = self.workers.get_mut(worker_id) {
                    worker.assignment =
                        Some(Assignment::Dangling { item, phase: CarryPhase::Deliver });
                }
                true
            }
            _ => false,
        }
    }

    fn workstation_pickup_completed(&mut self, ws_id: &Id, worker_id: &Id) -> bool {
        let selected = {
            let Some(ws) = self.workstations.get(ws_id) else {
                return false;
            };
            if ws.step != StepType::Pickup {
                return false;
            }
            ws.selected_eis.clone()
        };
        let Some(eis_id) = selected else {
            return false;
        };
        if let Some(ws) = self.workstations.get_mut(ws_id) {
            ws.selected_eis = None;
        }

        let Some(item) = self.storages.get_mut(&eis_id).and_then(|slot| slot.take()) else {
            // source emptied under us; resume from whatever is still possible
            self.advance_or_park(ws_id, worker_id);
            return true;
        };
        let dest = self.workstations.get(ws_id).and_then(|ws| self.select_iis(ws, &item));
        match dest {
            Some(iis_id) => {
                if let Some(slot) = self.storages.get_mut(&iis_id) {
                    if !slot.put(item) {
                        warn!(storage = ?iis_id, "recipe slot rejected staged unit");
                    }
                }
                self.fan_out(&eis_id);
                self.fan_out(&iis_id);
            }
            None => {
                // no recipe slot left for it; put the unit back where it was
                if let Some(slot) = self.storages.get_mut(&eis_id) {
                    if !slot.put(item) {
                        warn!(storage = ?eis_id, "unit lost: source slot refilled");
                    }
                }
            }
        }
        self.advance_or_park(ws_id, worker_id);
        true
    }

    fn transport_pickup_completed(&mut self, route_id: &Id, worker_id: &Id) -> bool {
        let Some(transport) = self.transports.get(route_id) else {
            if let Some(worker) = self.workers.get_mut(worker_id) {
                worker.release();
            }
            return true;
        };
        let from = transport.from.clone();
        let expected = transport.item.clone();
        let took = self.storages.get_mut(&from).is_some_and(|slot| {
            if slot.item.as_ref() == Some(&expected) {
                slot.take();
                true
            } else {
                false
            }
        });
        if !took {
            // source changed under us; abort the run and let it re-qualify
            if let Some(transport) = self.transports.get_mut(route_id) {
                transport.active_worker = None;
            }
            if let Some(worker) = self.workers.get_mut(worker_id) {
                worker.release();
            }
            return true;
        }
        if let Some(worker) = self.workers.get_mut(worker_id) {
            worker.assignment =
                Some(Assignment::Transport { route: route_id.clone(), phase: CarryPhase::Deliver });
        }
        self.fan_out(&from);
        true
    }

    /// Processing finished at a workstation: clear every recipe input, stage
    /// the declared output in every output slot, move on.
    pub(crate) fn handle_work_completed(&mut self, ws_id: &Id) -> bool {
        let (worker_id, iis, ios) = {
            let Some(ws) = self.workstations.get(ws_id) else {
                return false;
            };
            if ws.status != WorkstationStatus::Active || ws.step != StepType::Process {
                return false;
            }
            let Some(worker_id) = ws.assigned_worker.clone() else {
                return false;
            };
            (worker_id, ws.iis.clone(), ws.ios.clone())
        };
        for id in &iis {
            if let Some(slot) = self.storages.get_mut(id) {
                slot.take();
            }
        }
        for id in &ios {
            if let Some(slot) = self.storages.get_mut(id) {
                if slot.is_empty() {
                    slot.item = slot.accepts.clone();
                }
            }
        }
        if let Some(ws) = self.workstations.get_mut(ws_id) {
            ws.process_timer = 0;
        }
        debug!(workstation = ?ws_id, "process completed");
        self.hooks.process_completed(ProcessCompleted {
            worker: worker_id.clone(),
            workstation: ws_id.clone(),
        });
        for id in iis.iter().chain(ios.iter()) {
            self.fan_out(id);
        }

        let (staged, has_sinks) = {
            let Some(ws) = self.workstations.get(ws_id) else {
                return true;
            };
            (
                self.resolved(&ws.ios).any(|(_, slot)| slot.has_item()),
                self.resolved(&ws.eos).next().is_some(),
            )
        };
        if staged && has_sinks {
            if !self.enter_step(ws_id, &worker_id, StepType::Store) {
                // no sink free right now; hand the worker back, outputs stay
                self.release_workstation_worker(ws_id, &worker_id);
            }
        } else {
            // nothing to store (or nowhere to): the cycle is done
            self.complete_cycle(ws_id, &worker_id);
        }
        true
    }

    /// One host tick toward `process_duration`; completion fires when the
    /// timer fills. `work_completed` remains the unconditional signal.
    pub(crate) fn handle_process_tick(&mut self, ws_id: &Id) -> bool {
        let ready = {
            let Some(ws) = self.workstations.get_mut(ws_id) else {
                return false;
            };
            if ws.status != WorkstationStatus::Active || ws.step != StepType::Process {
                return false;
            }
            ws.process_timer = ws.process_timer.saturating_add(1);
            ws.process_duration > 0 && ws.process_timer >= ws.process_duration
        };
        if ready {
            self.handle_work_completed(ws_id);
        }
        true
    }

    /// The worker finished placing a unit at its destination.
    pub(crate) fn handle_store_completed(&mut self, worker_id: &Id) -> bool {
        let Some(assignment) = self.workers.get(worker_id).and_then(|w| w.assignment.clone())
        else {
            return false;
        };
        match assignment {
            Assignment::Workstation { workstation } => {
                self.workstation_store_completed(&workstation, worker_id)
            }
            Assignment::Transport { route, phase: CarryPhase::Deliver } => {
                self.transport_store_completed(&route, worker_id)
            }
            Assignment::Dangling { item, phase: CarryPhase::Deliver } => {
                self.dangling_store_completed(&item, worker_id)
            }
            _ => false,
        }
    }

    fn workstation_store_completed(&mut self, ws_id: &Id, worker_id: &Id) -> bool {
        let selected = {
            let Some(ws) = self.workstations.get(ws_id) else {
                return false;
            };
            if ws.step != StepType::Store {
                return false;
            }
            ws.selected_eos.clone()
        };
        let Some(eos_id) = selected else {
            return false;
        };

        // first staged output, matching the choice made at store_started
        let source = self.workstations.get(ws_id).and_then(|ws| {
            self.resolved(&ws.ios).find(|(_, slot)| slot.has_item()).map(|(id, _)| id.clone())
        });
        if let Some(ws) = self.workstations.get_mut(ws_id) {
            ws.selected_eos = None;
        }
        let Some(ios_id) = source else {
            // outputs drained under us; resume from whatever is possible
            self.advance_or_park(ws_id, worker_id);
            return true;
        };
        let deliverable = {
            let item = self.storages.get(&ios_id).and_then(|s| s.item.as_ref());
            match item {
                Some(item) => self.storages.get(&eos_id).is_some_and(|s| s.can_accept(item)),
                None => false,
            }
        };
        if !deliverable {
            // sink filled up under us; pick another sink or park
            self.advance_or_park(ws_id, worker_id);
            return true;
        }
        if let Some(item) = self.storages.get_mut(&ios_id).and_then(|slot| slot.take()) {
            if let Some(slot) = self.storages.get_mut(&eos_id) {
                if !slot.put(item) {
                    warn!(storage = ?eos_id, "unit lost: sink refused after check");
                }
            }
        }
        self.fan_out(&ios_id);
        self.fan_out(&eos_id);

        let more = self
            .workstations
            .get(ws_id)
            .is_some_and(|ws| self.resolved(&ws.ios).any(|(_, slot)| slot.has_item()));
        if more {
            if !self.enter_step(ws_id, worker_id, StepType::Store) {
                self.release_workstation_worker(ws_id, worker_id);
            }
        } else {
            self.complete_cycle(ws_id, worker_id);
        }
        true
    }

    fn transport_store_completed(&mut self, route_id: &Id, worker_id: &Id) -> bool {
        let Some(transport) = self.transports.get(route_id) else {
            if let Some(worker) = self.workers.get_mut(worker_id) {
                worker.release();
            }
            return true;
        };
        let from = transport.from.clone();
        let to = transport.to.clone();
        let item = transport.item.clone();
        let delivered =
            self.storages.get_mut(&to).is_some_and(|slot| slot.put(item.clone()));
        if !delivered {
            // destination busy; the host retries after space frees
            return false;
        }
        if let Some(transport) = self.transports.get_mut(route_id) {
            transport.active_worker = None;
        }
        if let Some(worker) = self.workers.get_mut(worker_id) {
            worker.release();
        }
        debug!(route = ?route_id, "transport completed");
        self.hooks.transport_completed(TransportCompleted {
            worker: worker_id.clone(),
            from,
            to: to.clone(),
            item,
        });
        self.fan_out(&to);
        true
    }

    fn dangling_store_completed(&mut self, item_id: &Id, worker_id: &Id) -> bool {
        let Some(target) = self
            .workers
            .get(worker_id)
            .and_then(|w| w.dangling_task.as_ref().map(|task| task.target.clone()))
        else {
            return false;
        };
        let Some(item) = self.dangling.get(item_id).map(|orphan| orphan.item.clone()) else {
            // orphan removed mid-flight
            if let Some(worker) = self.workers.get_mut(worker_id) {
                worker.release();
            }
            return true;
        };
        let delivered = self.storages.get_mut(&target).is_some_and(|slot| slot.put(item));
        if !delivered {
            // target filled; the host retries once space frees
            return false;
        }
        self.dangling.remove(item_id);
        if let Some(worker) = self.workers.get_mut(worker_id) {
            worker.release();
        }
        debug!(item = ?item_id, target = ?target, "dangling item delivered");
        self.hooks.item_delivered(ItemDelivered {
            worker: worker_id.clone(),
            item: item_id.clone(),
            target_eis: target.clone(),
        });
        self.fan_out(&target);
        true
    }

    /// After a completed leg: enter the next runnable step, or hand the
    /// worker back while keeping slot progress.
    fn advance_or_park(&mut self, ws_id: &Id, worker_id: &Id) {
        let next = self.workstations.get(ws_id).and_then(|ws| self.entry_step(ws));
        if let Some(step) = next {
            if self.enter_step(ws_id, worker_id, step) {
                return;
            }
        }
        self.release_workstation_worker(ws_id, worker_id);
    }

    fn complete_cycle(&mut self, ws_id: &Id, worker_id: &Id) {
        let cycles = {
            let Some(ws) = self.workstations.get_mut(ws_id) else {
                return;
            };
            ws.cycles_completed += 1;
            ws.cycles_completed
        };
        debug!(workstation = ?ws_id, cycles, "cycle completed");
        self.hooks.cycle_completed(CycleCompleted {
            workstation: ws_id.clone(),
            worker: worker_id.clone(),
            cycles_completed: cycles,
        });
        self.release_workstation_worker(ws_id, worker_id);
    }

    /// Unbind the worker from its workstation, preserving slot contents, and
    /// announce where the freed workstation lands (Queued or Blocked).
    pub(crate) fn release_workstation_worker(&mut self, ws_id: &Id, worker_id: &Id) {
        if let Some(worker) = self.workers.get_mut(worker_id) {
            worker.release();
        }
        {
            let Some(ws) = self.workstations.get_mut(ws_id) else {
                return;
            };
            ws.assigned_worker = None;
            ws.reset_cycle();
            ws.status = WorkstationStatus::Blocked;
        }
        self.hooks.worker_released(WorkerReleased {
            worker: worker_id.clone(),
            workstation: ws_id.clone(),
        });
        let (next, priority) = {
            let Some(ws) = self.workstations.get(ws_id) else {
                return;
            };
            let next = if ws.enabled && self.eligible(ws) {
                WorkstationStatus::Queued
            } else {
                WorkstationStatus::Blocked
            };
            (next, ws.priority)
        };
        if let Some(ws) = self.workstations.get_mut(ws_id) {
            ws.status = next;
        }
        debug!(workstation = ?ws_id, status = %next, "worker released");
        let payload = StatusChange { workstation: ws_id.clone(), priority };
        match next {
            WorkstationStatus::Queued => self.hooks.workstation_queued(payload),
            WorkstationStatus::Blocked => self.hooks.workstation_blocked(payload),
            WorkstationStatus::Active => {}
        }
    }

    /// Detach `worker` from whatever it is doing, preserving progress.
    /// The worker ends idle; callers adjust its state afterwards.
    pub(crate) fn unbind_worker(&mut self, worker_id: &Id) {
        let Some(assignment) = self.workers.get(worker_id).and_then(|w| w.assignment.clone())
        else {
            return;
        };
        match assignment {
            Assignment::Workstation { workstation } => {
                self.release_workstation_worker(&workstation, worker_id);
            }
            Assignment::Transport { route, phase } => {
                if phase == CarryPhase::Deliver {
                    self.return_carried_unit(&route);
                }
                if let Some(transport) = self.transports.get_mut(&route) {
                    transport.active_worker = None;
                }
                if let Some(worker) = self.workers.get_mut(worker_id) {
                    worker.release();
                }
            }
            Assignment::Dangling { item, .. } => {
                if let Some(orphan) = self.dangling.get_mut(&item) {
                    orphan.assigned_worker = None;
                }
                if let Some(worker) = self.workers.get_mut(worker_id) {
                    worker.release();
                }
            }
        }
    }

    /// An abandoned delivery puts its unit back into the source slot when it
    /// is still free; otherwise the unit is gone (the engine cannot mint an
    /// id for a new dangling item).
    fn return_carried_unit(&mut self, route_id: &Id) {
        let Some(transport) = self.transports.get(route_id) else {
            return;
        };
        let from = transport.from.clone();
        let item = transport.item.clone();
        let returned = self.storages.get_mut(&from).is_some_and(|slot| slot.put(item));
        if returned {
            self.fan_out(&from);
        } else {
            warn!(route = ?route_id, "carried unit lost: source slot no longer free");
        }
    }
}

#[cfg(test)]
#[path = "cycle_tests.rs"]
mod tests;
